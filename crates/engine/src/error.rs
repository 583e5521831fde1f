//! The module contains the errors the engine can throw.
//!
//! Validation failures are detected before any aggregation work begins; the
//! engine never computes a partial result on invalid input. Store failures
//! propagate unchanged through [`Database`].
//!
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("wallet not found")]
    WalletNotFound,
    #[error("transaction not found")]
    TransactionNotFound,
    #[error("invalid period unit: {0}")]
    InvalidPeriodUnit(String),
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    #[error("invalid description: {0}")]
    InvalidDescription(String),
    #[error("invalid wallet: {0}")]
    InvalidWallet(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::WalletNotFound, Self::WalletNotFound) => true,
            (Self::TransactionNotFound, Self::TransactionNotFound) => true,
            (Self::InvalidPeriodUnit(a), Self::InvalidPeriodUnit(b)) => a == b,
            (Self::InvalidTimezone(a), Self::InvalidTimezone(b)) => a == b,
            (Self::InvalidLimit(a), Self::InvalidLimit(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::InvalidDescription(a), Self::InvalidDescription(b)) => a == b,
            (Self::InvalidWallet(a), Self::InvalidWallet(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
