//! Wallets API endpoints.

use api_types::wallet::{
    ChartBucket, ChartQuery, ChartTransaction, DashboardQuery, DashboardWallet, MainWalletsQuery,
    SpendingQuery, WalletArchive, WalletNew, WalletSpending, WalletUpdate, WalletView,
    WalletsQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    ServerError, parse_index_param, server::ServerState, transactions::transaction_view, user,
};

pub(crate) fn engine_unit(unit: api_types::PeriodUnit) -> engine::PeriodUnit {
    match unit {
        api_types::PeriodUnit::Day => engine::PeriodUnit::Day,
        api_types::PeriodUnit::Week => engine::PeriodUnit::Week,
        api_types::PeriodUnit::Month => engine::PeriodUnit::Month,
        api_types::PeriodUnit::Year => engine::PeriodUnit::Year,
        api_types::PeriodUnit::All => engine::PeriodUnit::All,
    }
}

pub(crate) fn api_unit(unit: engine::PeriodUnit) -> api_types::PeriodUnit {
    match unit {
        engine::PeriodUnit::Day => api_types::PeriodUnit::Day,
        engine::PeriodUnit::Week => api_types::PeriodUnit::Week,
        engine::PeriodUnit::Month => api_types::PeriodUnit::Month,
        engine::PeriodUnit::Year => api_types::PeriodUnit::Year,
        engine::PeriodUnit::All => api_types::PeriodUnit::All,
    }
}

fn wallet_view(wallet: engine::Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        currency: wallet.currency,
        country: wallet.country,
        spending_period_unit: api_unit(wallet.spending_period_unit),
        parent_wallet_id: wallet.parent_wallet_id,
        order_index: wallet.order_index,
        archived_at: wallet.archived_at.map(|at| at.fixed_offset()),
        created_at: wallet.created_at.fixed_offset(),
        updated_at: wallet.updated_at.map(|at| at.fixed_offset()),
    }
}

fn dashboard_wallet(aggregate: engine::WalletAggregate) -> DashboardWallet {
    let wallet = aggregate.wallet;
    DashboardWallet {
        id: wallet.id,
        name: wallet.name,
        currency: wallet.currency,
        country: wallet.country,
        spending_period_unit: api_unit(wallet.spending_period_unit),
        parent_wallet_id: wallet.parent_wallet_id,
        order_index: wallet.order_index,
        archived_at: wallet.archived_at.map(|at| at.fixed_offset()),
        created_at: wallet.created_at.fixed_offset(),
        updated_at: wallet.updated_at.map(|at| at.fixed_offset()),
        spending_period_total: aggregate.spending_period_total.cents(),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let wallet = state
        .engine
        .new_wallet(
            &user.username,
            engine::NewWallet {
                name: payload.name,
                currency: payload.currency,
                country: payload.country,
                spending_period_unit: payload.spending_period_unit.map(engine_unit),
                parent_wallet_id: payload.parent_wallet_id,
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(wallet_view(wallet))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<WalletsQuery>,
) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state
        .engine
        .wallets(&user.username, query.search_phrase.as_deref())
        .await?;

    Ok(Json(wallets.into_iter().map(wallet_view).collect()))
}

pub async fn list_main(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<MainWalletsQuery>,
) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state
        .engine
        .main_wallets(
            &user.username,
            query.search_phrase.as_deref(),
            query.currency.as_deref(),
        )
        .await?;

    Ok(Json(wallets.into_iter().map(wallet_view).collect()))
}

/// Current-period totals for every wallet the user owns.
///
/// The stored per-user timezone wins; the request's one seeds it on first
/// use.
pub async fn dashboard(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<DashboardWallet>>, ServerError> {
    let timezone = state
        .engine
        .user_timezone_or_init(&user.username, &query.timezone)
        .await?;
    let aggregates = state
        .engine
        .dashboard(&user.username, &timezone, Utc::now())
        .await?;

    Ok(Json(aggregates.into_iter().map(dashboard_wallet).collect()))
}

pub async fn get_one(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(&user.username, wallet_id).await?;
    Ok(Json(wallet_view(wallet)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<WalletUpdate>,
) -> Result<Json<WalletView>, ServerError> {
    if payload.name.is_none()
        && payload.spending_period_unit.is_none()
        && payload.parent_wallet_id.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one of name, spendingPeriodUnit or parentWalletId".to_string(),
        ));
    }

    let wallet = state
        .engine
        .update_wallet(
            &user.username,
            wallet_id,
            engine::WalletChanges {
                name: payload.name,
                spending_period_unit: payload.spending_period_unit.map(engine_unit),
                parent_wallet_id: payload.parent_wallet_id,
            },
            Utc::now(),
        )
        .await?;

    Ok(Json(wallet_view(wallet)))
}

pub async fn archive(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<WalletArchive>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .set_wallet_archived(&user.username, wallet_id, payload.archived, Utc::now())
        .await?;

    Ok(StatusCode::OK)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_wallet(&user.username, wallet_id, Utc::now())
        .await?;

    Ok(StatusCode::OK)
}

/// Current-period aggregate for a single wallet, transactions included.
pub async fn spending(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
    Query(query): Query<SpendingQuery>,
) -> Result<Json<WalletSpending>, ServerError> {
    let aggregate = state
        .engine
        .current_period_total(&user.username, wallet_id, &query.timezone, Utc::now())
        .await?;

    let wallet = aggregate.wallet;
    Ok(Json(WalletSpending {
        id: wallet.id,
        name: wallet.name,
        currency: wallet.currency,
        country: wallet.country,
        spending_period_unit: api_unit(wallet.spending_period_unit),
        parent_wallet_id: wallet.parent_wallet_id,
        order_index: wallet.order_index,
        spending_period_total: aggregate.spending_period_total.cents(),
        transactions: aggregate
            .transactions
            .into_iter()
            .map(transaction_view)
            .collect(),
    }))
}

/// Historical bucket series for the chart view, most recent first.
pub async fn chart(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Vec<ChartBucket>>, ServerError> {
    let unit = engine::PeriodUnit::try_from(query.unit.as_str())?;
    let limit = parse_index_param(&query.limit, "limit")?;
    let limit = u32::try_from(limit)
        .map_err(|_| ServerError::Generic("limit is out of range".to_string()))?;
    let offset = match query.offset.as_deref() {
        Some(raw) => u32::try_from(parse_index_param(raw, "offset")?)
            .map_err(|_| ServerError::Generic("offset is out of range".to_string()))?,
        None => 0,
    };

    // Charts render in the caller's stored timezone.
    let timezone = state.engine.user_timezone(&user.username).await?;
    let tz = engine::resolve_timezone(&timezone)?;

    let (scope, buckets) = state
        .engine
        .wallet_chart(
            &user.username,
            wallet_id,
            unit,
            &timezone,
            Utc::now(),
            limit,
            offset,
        )
        .await?;

    let series = buckets
        .into_iter()
        .map(|bucket| ChartBucket {
            start_period: bucket.start_period.with_timezone(&tz).fixed_offset(),
            spending_period_total: bucket.total.cents(),
            transactions: bucket
                .transactions
                .into_iter()
                .map(|tx| ChartTransaction {
                    id: tx.id,
                    wallet_id: tx.wallet_id,
                    amount_minor: tx.amount.cents(),
                    // A sub-wallet's transactions chart under the sub-wallet
                    // name instead of the category tag.
                    category: scope
                        .sub_wallet_name(tx.wallet_id)
                        .map(str::to_string)
                        .unwrap_or_else(|| tx.category.as_str().to_string()),
                    description: tx.description,
                    paid_at: tx.paid_at.fixed_offset(),
                })
                .collect(),
        })
        .collect();

    Ok(Json(series))
}
