//! Transactions API endpoints.

use api_types::transaction::{
    TransactionNew, TransactionUpdate, TransactionView, TransactionWithWallet, TransactionsQuery,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, parse_index_param, server::ServerState, user};

pub(crate) fn engine_category(category: api_types::Category) -> engine::Category {
    match category {
        api_types::Category::Accommodation => engine::Category::Accommodation,
        api_types::Category::Entertainment => engine::Category::Entertainment,
        api_types::Category::Fitness => engine::Category::Fitness,
        api_types::Category::Food => engine::Category::Food,
        api_types::Category::Games => engine::Category::Games,
        api_types::Category::Gifts => engine::Category::Gifts,
        api_types::Category::Grooming => engine::Category::Grooming,
        api_types::Category::Hobbies => engine::Category::Hobbies,
        api_types::Category::Insurance => engine::Category::Insurance,
        api_types::Category::Medical => engine::Category::Medical,
        api_types::Category::Others => engine::Category::Others,
        api_types::Category::Pet => engine::Category::Pet,
        api_types::Category::Shopping => engine::Category::Shopping,
        api_types::Category::Transfers => engine::Category::Transfers,
        api_types::Category::Transport => engine::Category::Transport,
        api_types::Category::Travel => engine::Category::Travel,
        api_types::Category::Utilities => engine::Category::Utilities,
        api_types::Category::Work => engine::Category::Work,
    }
}

pub(crate) fn api_category(category: engine::Category) -> api_types::Category {
    match category {
        engine::Category::Accommodation => api_types::Category::Accommodation,
        engine::Category::Entertainment => api_types::Category::Entertainment,
        engine::Category::Fitness => api_types::Category::Fitness,
        engine::Category::Food => api_types::Category::Food,
        engine::Category::Games => api_types::Category::Games,
        engine::Category::Gifts => api_types::Category::Gifts,
        engine::Category::Grooming => api_types::Category::Grooming,
        engine::Category::Hobbies => api_types::Category::Hobbies,
        engine::Category::Insurance => api_types::Category::Insurance,
        engine::Category::Medical => api_types::Category::Medical,
        engine::Category::Others => api_types::Category::Others,
        engine::Category::Pet => api_types::Category::Pet,
        engine::Category::Shopping => api_types::Category::Shopping,
        engine::Category::Transfers => api_types::Category::Transfers,
        engine::Category::Transport => api_types::Category::Transport,
        engine::Category::Travel => api_types::Category::Travel,
        engine::Category::Utilities => api_types::Category::Utilities,
        engine::Category::Work => api_types::Category::Work,
    }
}

pub(crate) fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        amount_minor: tx.amount.cents(),
        category: api_category(tx.category),
        description: tx.description,
        paid_at: tx.paid_at.fixed_offset(),
        created_at: tx.created_at.fixed_offset(),
        updated_at: tx.updated_at.map(|at| at.fixed_offset()),
    }
}

fn transaction_with_wallet(row: engine::TransactionWithWallet) -> TransactionWithWallet {
    let tx = row.transaction;
    TransactionWithWallet {
        id: tx.id,
        wallet_id: tx.wallet_id,
        amount_minor: tx.amount.cents(),
        category: api_category(tx.category),
        description: tx.description,
        paid_at: tx.paid_at.fixed_offset(),
        created_at: tx.created_at.fixed_offset(),
        updated_at: tx.updated_at.map(|at| at.fixed_offset()),
        name: row.wallet_name,
        currency: row.currency,
        country: row.country,
        parent_wallet_id: row.parent_wallet_id,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .new_transaction(
            &user.username,
            engine::NewTransaction {
                wallet_id: payload.wallet_id,
                amount: engine::MoneyCents::new(payload.amount_minor),
                category: payload.category.map(engine_category),
                description: payload.description,
                paid_at: payload.paid_at.map(|at| at.with_timezone(&Utc)),
            },
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

/// Newest-first page of a wallet's transactions, sub-wallets included.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<Vec<TransactionWithWallet>>, ServerError> {
    let limit = parse_index_param(&query.limit, "limit")?;
    let offset = match query.offset.as_deref() {
        Some(raw) => parse_index_param(raw, "offset")?,
        None => 0,
    };

    let rows = state
        .engine
        .transactions_for_wallet(
            &user.username,
            query.wallet_id,
            engine::TransactionFilter {
                date: query.date.map(|at| at.with_timezone(&Utc)),
                search_phrase: query.search_phrase,
            },
            limit,
            offset,
        )
        .await?;

    Ok(Json(rows.into_iter().map(transaction_with_wallet).collect()))
}

pub async fn get_one(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionWithWallet>, ServerError> {
    let row = state
        .engine
        .transaction(&user.username, transaction_id)
        .await?;

    Ok(Json(transaction_with_wallet(row)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state
        .engine
        .update_transaction(
            &user.username,
            transaction_id,
            engine::TransactionChanges {
                wallet_id: payload.wallet_id,
                amount: engine::MoneyCents::new(payload.amount_minor),
                category: payload.category.map(engine_category),
                description: payload.description,
                paid_at: payload.paid_at.map(|at| at.with_timezone(&Utc)),
            },
            Utc::now(),
        )
        .await?;

    Ok(Json(transaction_view(tx)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(&user.username, transaction_id, Utc::now())
        .await?;

    Ok(StatusCode::OK)
}
