//! Wallet operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Engine, EngineError, PeriodUnit, ResultEngine, Wallet, WalletScope, transactions, wallets,
};

/// Fields accepted when creating a wallet.
#[derive(Clone, Debug)]
pub struct NewWallet {
    pub name: String,
    pub currency: String,
    pub country: String,
    pub spending_period_unit: Option<PeriodUnit>,
    pub parent_wallet_id: Option<Uuid>,
}

/// Partial wallet update; `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct WalletChanges {
    pub name: Option<String>,
    pub spending_period_unit: Option<PeriodUnit>,
    pub parent_wallet_id: Option<Uuid>,
}

impl Engine {
    /// Fetches a non-deleted wallet owned by `user_id`.
    ///
    /// Not-found and not-owned are indistinguishable on purpose.
    pub(crate) async fn require_wallet(
        &self,
        user_id: &str,
        wallet_id: Uuid,
    ) -> ResultEngine<Wallet> {
        let model = wallets::Entity::find_by_id(wallet_id.to_string())
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::DeletedAt.is_null())
            .one(&self.database)
            .await?
            .ok_or(EngineError::WalletNotFound)?;

        Wallet::try_from(model)
    }

    /// Resolves the aggregation scope of a wallet: itself plus its direct,
    /// non-deleted sub-wallets. Sub-wallets resolve to themselves only.
    pub(crate) async fn wallet_scope(
        &self,
        user_id: &str,
        wallet_id: Uuid,
    ) -> ResultEngine<WalletScope> {
        let wallet = self.require_wallet(user_id, wallet_id).await?;
        if wallet.is_sub_wallet() {
            return Ok(WalletScope::resolve(wallet, Vec::new()));
        }

        let children = wallets::Entity::find()
            .filter(wallets::Column::ParentWalletId.eq(wallet_id.to_string()))
            .filter(wallets::Column::DeletedAt.is_null())
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(WalletScope::resolve(wallet, children))
    }

    /// Creates a wallet, assigning the owner's next display order index.
    pub async fn new_wallet(
        &self,
        user_id: &str,
        new: NewWallet,
        now: DateTime<Utc>,
    ) -> ResultEngine<Wallet> {
        if let Some(parent_id) = new.parent_wallet_id {
            let parent = self.require_wallet(user_id, parent_id).await?;
            if parent.is_sub_wallet() {
                return Err(EngineError::InvalidWallet(
                    "a sub-wallet cannot have sub-wallets of its own".to_string(),
                ));
            }
        }

        // Display order is the owner's wallet row count, soft-deleted rows
        // included, so indexes stay unique after deletions.
        let count = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .count(&self.database)
            .await?;
        let order_index = i32::try_from(count)
            .map_err(|_| EngineError::InvalidWallet("too many wallets".to_string()))?;

        let wallet = Wallet::new(
            user_id.to_string(),
            &new.name,
            &new.currency,
            &new.country,
            new.spending_period_unit.unwrap_or_default(),
            new.parent_wallet_id,
            order_index,
            now,
        )?;
        wallets::ActiveModel::from(&wallet)
            .insert(&self.database)
            .await?;

        Ok(wallet)
    }

    /// Non-deleted, non-archived wallets ordered by display index.
    pub async fn wallets(
        &self,
        user_id: &str,
        search_phrase: Option<&str>,
    ) -> ResultEngine<Vec<Wallet>> {
        let mut query = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::DeletedAt.is_null())
            .filter(wallets::Column::ArchivedAt.is_null())
            .order_by_asc(wallets::Column::OrderIndex);

        if let Some(phrase) = search_phrase {
            query = query.filter(wallets::Column::Name.contains(phrase));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect()
    }

    /// Top-level wallets only, ordered by creation time.
    pub async fn main_wallets(
        &self,
        user_id: &str,
        search_phrase: Option<&str>,
        currency: Option<&str>,
    ) -> ResultEngine<Vec<Wallet>> {
        let mut query = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::ParentWalletId.is_null())
            .filter(wallets::Column::DeletedAt.is_null())
            .filter(wallets::Column::ArchivedAt.is_null())
            .order_by_asc(wallets::Column::CreatedAt);

        if let Some(phrase) = search_phrase {
            query = query.filter(wallets::Column::Name.contains(phrase));
        }
        if let Some(currency) = currency {
            query = query.filter(wallets::Column::Currency.eq(currency.to_ascii_uppercase()));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect()
    }

    /// Returns a wallet owned by the user.
    pub async fn wallet(&self, user_id: &str, wallet_id: Uuid) -> ResultEngine<Wallet> {
        self.require_wallet(user_id, wallet_id).await
    }

    /// Applies a partial update. Currency and country are immutable.
    pub async fn update_wallet(
        &self,
        user_id: &str,
        wallet_id: Uuid,
        changes: WalletChanges,
        now: DateTime<Utc>,
    ) -> ResultEngine<Wallet> {
        self.require_wallet(user_id, wallet_id).await?;

        if let Some(parent_id) = changes.parent_wallet_id {
            if parent_id == wallet_id {
                return Err(EngineError::InvalidWallet(
                    "a wallet cannot be its own parent".to_string(),
                ));
            }
            let parent = self.require_wallet(user_id, parent_id).await?;
            if parent.is_sub_wallet() {
                return Err(EngineError::InvalidWallet(
                    "a sub-wallet cannot have sub-wallets of its own".to_string(),
                ));
            }
            let children = self.live_sub_wallet_count(wallet_id).await?;
            if children > 0 {
                return Err(EngineError::InvalidWallet(
                    "a wallet with sub-wallets cannot become a sub-wallet".to_string(),
                ));
            }
        }

        let mut active = wallets::ActiveModel {
            id: ActiveValue::Set(wallet_id.to_string()),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        if let Some(name) = changes.name.as_deref() {
            let name = name.trim();
            if name.is_empty() || name.chars().count() > 50 {
                return Err(EngineError::InvalidWallet(
                    "name must be 1 to 50 characters".to_string(),
                ));
            }
            active.name = ActiveValue::Set(name.to_string());
        }
        if let Some(unit) = changes.spending_period_unit {
            active.spending_period_unit = ActiveValue::Set(unit.as_str().to_string());
        }
        if let Some(parent_id) = changes.parent_wallet_id {
            active.parent_wallet_id = ActiveValue::Set(Some(parent_id.to_string()));
        }

        let model = active.update(&self.database).await?;
        Wallet::try_from(model)
    }

    /// Archives or un-archives a wallet. Archived wallets disappear from
    /// listings and the dashboard but keep counting toward their parent.
    pub async fn set_wallet_archived(
        &self,
        user_id: &str,
        wallet_id: Uuid,
        archived: bool,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        self.require_wallet(user_id, wallet_id).await?;

        let active = wallets::ActiveModel {
            id: ActiveValue::Set(wallet_id.to_string()),
            archived_at: ActiveValue::Set(archived.then_some(now)),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        active.update(&self.database).await?;

        Ok(())
    }

    /// Soft-deletes a wallet together with its transactions.
    ///
    /// A wallet that still has live sub-wallets cannot be deleted.
    pub async fn delete_wallet(
        &self,
        user_id: &str,
        wallet_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        self.require_wallet(user_id, wallet_id).await?;

        let children = self.live_sub_wallet_count(wallet_id).await?;
        if children > 0 {
            return Err(EngineError::InvalidWallet(
                "wallet still has sub-wallets".to_string(),
            ));
        }

        let active = wallets::ActiveModel {
            id: ActiveValue::Set(wallet_id.to_string()),
            deleted_at: ActiveValue::Set(Some(now)),
            updated_at: ActiveValue::Set(Some(now)),
            ..Default::default()
        };
        active.update(&self.database).await?;

        transactions::Entity::update_many()
            .col_expr(transactions::Column::DeletedAt, Expr::value(now))
            .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
            .filter(transactions::Column::DeletedAt.is_null())
            .exec(&self.database)
            .await?;

        Ok(())
    }

    async fn live_sub_wallet_count(&self, wallet_id: Uuid) -> ResultEngine<u64> {
        let count = wallets::Entity::find()
            .filter(wallets::Column::ParentWalletId.eq(wallet_id.to_string()))
            .filter(wallets::Column::DeletedAt.is_null())
            .count(&self.database)
            .await?;
        Ok(count)
    }
}
