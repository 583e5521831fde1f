//! Transaction operations.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    Category, Engine, EngineError, MoneyCents, ResultEngine, Transaction, TransactionWithWallet,
    transactions, wallets,
};

/// Fields accepted when creating a transaction.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub wallet_id: Uuid,
    pub amount: MoneyCents,
    /// Defaults to [`Category::Others`] when absent.
    pub category: Option<Category>,
    pub description: String,
    /// Defaults to the reference instant when absent.
    pub paid_at: Option<DateTime<Utc>>,
}

/// Full-record transaction update; optional fields keep their value.
#[derive(Clone, Debug)]
pub struct TransactionChanges {
    pub wallet_id: Uuid,
    pub amount: MoneyCents,
    pub category: Option<Category>,
    pub description: String,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Optional restrictions on transaction listings.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    /// Restrict to the UTC day containing this instant.
    pub date: Option<DateTime<Utc>>,
    /// Substring match on the description.
    pub search_phrase: Option<String>,
}

impl Engine {
    /// Records a transaction against a wallet owned by the user.
    pub async fn new_transaction(
        &self,
        user_id: &str,
        new: NewTransaction,
        now: DateTime<Utc>,
    ) -> ResultEngine<Transaction> {
        self.require_wallet(user_id, new.wallet_id).await?;

        let tx = Transaction::new(
            new.wallet_id,
            new.amount,
            new.category.unwrap_or_default(),
            &new.description,
            new.paid_at.unwrap_or(now),
            now,
        )?;
        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;

        Ok(tx)
    }

    /// Newest-first page of transactions for a wallet and its direct
    /// sub-wallets, joined with wallet identity fields.
    pub async fn transactions_for_wallet(
        &self,
        user_id: &str,
        wallet_id: Uuid,
        filter: TransactionFilter,
        limit: u64,
        offset: u64,
    ) -> ResultEngine<Vec<TransactionWithWallet>> {
        let scope = self.wallet_scope(user_id, wallet_id).await?;
        let ids: Vec<String> = scope.ids().iter().map(ToString::to_string).collect();

        let mut query = transactions::Entity::find()
            .find_also_related(wallets::Entity)
            .filter(transactions::Column::WalletId.is_in(ids))
            .filter(transactions::Column::DeletedAt.is_null())
            .order_by_desc(transactions::Column::PaidAt)
            .limit(limit)
            .offset(offset);

        if let Some(date) = filter.date {
            let day_start = Utc.from_utc_datetime(&date.date_naive().and_time(NaiveTime::MIN));
            let day_end = day_start + Duration::days(1);
            query = query
                .filter(transactions::Column::PaidAt.gte(day_start))
                .filter(transactions::Column::PaidAt.lt(day_end));
        }
        if let Some(phrase) = filter.search_phrase.as_deref() {
            query = query.filter(transactions::Column::Description.contains(phrase));
        }

        let rows = query.all(&self.database).await?;

        let mut out = Vec::with_capacity(rows.len());
        for (tx_model, wallet_model) in rows {
            let Some(wallet_model) = wallet_model else {
                continue;
            };
            out.push(joined(tx_model, wallet_model)?);
        }
        Ok(out)
    }

    /// Fetches one transaction joined with its wallet.
    pub async fn transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<TransactionWithWallet> {
        let row = transactions::Entity::find_by_id(transaction_id.to_string())
            .find_also_related(wallets::Entity)
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::DeletedAt.is_null())
            .one(&self.database)
            .await?;

        let Some((tx_model, Some(wallet_model))) = row else {
            return Err(EngineError::TransactionNotFound);
        };
        joined(tx_model, wallet_model)
    }

    /// Rewrites an existing transaction.
    pub async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        changes: TransactionChanges,
        now: DateTime<Utc>,
    ) -> ResultEngine<Transaction> {
        let existing = self.transaction(user_id, transaction_id).await?;
        if changes.wallet_id != existing.transaction.wallet_id {
            self.require_wallet(user_id, changes.wallet_id).await?;
        }

        let description = changes.description.trim();
        if description.is_empty() || description.chars().count() > 255 {
            return Err(EngineError::InvalidDescription(
                "description must be 1 to 255 characters".to_string(),
            ));
        }

        let mut active = transactions::ActiveModel {
            id: ActiveValue::Set(transaction_id.to_string()),
            wallet_id: ActiveValue::Set(changes.wallet_id.to_string()),
            amount_minor: ActiveValue::Set(changes.amount.cents()),
            description: ActiveValue::Set(description.to_string()),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        if let Some(category) = changes.category {
            active.category = ActiveValue::Set(category.as_str().to_string());
        }
        if let Some(paid_at) = changes.paid_at {
            active.paid_at = ActiveValue::Set(paid_at);
        }

        let model = active.update(&self.database).await?;
        Transaction::try_from(model)
    }

    /// Soft-deletes a transaction.
    pub async fn delete_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        self.transaction(user_id, transaction_id).await?;

        let active = transactions::ActiveModel {
            id: ActiveValue::Set(transaction_id.to_string()),
            deleted_at: ActiveValue::Set(Some(now)),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        active.update(&self.database).await?;

        Ok(())
    }
}

fn joined(
    tx_model: transactions::Model,
    wallet_model: wallets::Model,
) -> ResultEngine<TransactionWithWallet> {
    Ok(TransactionWithWallet {
        transaction: Transaction::try_from(tx_model)?,
        wallet_name: wallet_model.name,
        currency: wallet_model.currency,
        country: wallet_model.country,
        parent_wallet_id: wallet_model
            .parent_wallet_id
            .and_then(|s| Uuid::parse_str(&s).ok()),
    })
}
