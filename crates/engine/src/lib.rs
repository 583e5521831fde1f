//! Spending engine: wallet/transaction domain, persistence ops, and the
//! aggregation pipeline (period boundaries, bucket fills, dashboard folds).
//!
//! The engine holds a database connection and nothing else: every operation
//! reads the current store state, computes synchronously, and returns. No
//! state is shared or cached between requests, and the reference instant
//! ("now") is always supplied by the caller.

use sea_orm::DatabaseConnection;

pub use buckets::{PeriodBucket, fill_buckets};
pub use categories::Category;
pub use dashboard::{DashboardRow, WalletAggregate, fold_rows};
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::transactions::{NewTransaction, TransactionChanges, TransactionFilter};
pub use ops::wallets::{NewWallet, WalletChanges};
pub use period::{
    BucketBounds, PeriodUnit, WeekStart, bucket_series, current_period_start, resolve_timezone,
};
pub use scope::WalletScope;
pub use transactions::{Transaction, TransactionWithWallet};
pub use wallets::Wallet;

mod buckets;
mod categories;
mod dashboard;
mod error;
mod money;
mod ops;
mod period;
mod scope;
mod settings;
mod transactions;
mod wallets;

pub type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    week_start: WeekStart,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    week_start: WeekStart,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the first day of the week used for WEEK truncation.
    pub fn week_start(mut self, week_start: WeekStart) -> EngineBuilder {
        self.week_start = week_start;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            week_start: self.week_start,
        }
    }
}
