use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod server;
mod transactions;
mod user;
mod wallets;

pub mod types {
    pub mod wallet {
        pub use api_types::wallet::{
            ChartBucket, ChartQuery, ChartTransaction, DashboardQuery, DashboardWallet,
            MainWalletsQuery, SpendingQuery, WalletArchive, WalletNew, WalletSpending,
            WalletUpdate, WalletView, WalletsQuery,
        };
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionNew, TransactionUpdate, TransactionView, TransactionWithWallet,
            TransactionsQuery,
        };
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::WalletNotFound | EngineError::TransactionNotFound => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidPeriodUnit(_)
        | EngineError::InvalidTimezone(_)
        | EngineError::InvalidLimit(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidCategory(_)
        | EngineError::InvalidDescription(_)
        | EngineError::InvalidWallet(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Parses a request-level index parameter (`limit`/`offset`).
///
/// These arrive as decimal-digit strings; anything else is the caller's
/// mistake, not an engine error.
fn parse_index_param(raw: &str, name: &str) -> Result<u64, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ServerError::Generic(format!(
            "{name} must be a non-negative integer"
        )));
    }
    raw.parse::<u64>()
        .map_err(|_| ServerError::Generic(format!("{name} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::WalletNotFound).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InvalidPeriodUnit("FORTNIGHT".to_string()),
            EngineError::InvalidTimezone("Not/AZone".to_string()),
            EngineError::InvalidLimit("0".to_string()),
            EngineError::InvalidWallet("bad".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn index_params_must_be_digit_strings() {
        assert_eq!(parse_index_param("25", "limit").unwrap(), 25);
        assert_eq!(parse_index_param(" 7 ", "offset").unwrap(), 7);
        assert!(parse_index_param("-1", "limit").is_err());
        assert!(parse_index_param("+1", "limit").is_err());
        assert!(parse_index_param("ten", "limit").is_err());
        assert!(parse_index_param("", "limit").is_err());
    }
}
