//! The module contains the `Wallet` struct and its persistence model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, PeriodUnit, ResultEngine};

/// A wallet.
///
/// A wallet is a spending container: a bank account, a card, a cash stash.
/// A top-level wallet may own sub-wallets; the hierarchy is exactly one
/// level deep, so a sub-wallet can never have sub-wallets of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    /// Stable identifier for this wallet.
    ///
    /// This is a UUID generated once and persisted in the database, so the
    /// wallet can be renamed without breaking references.
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    /// ISO 4217 code, e.g. "EUR".
    pub currency: String,
    /// ISO 3166-1 alpha-2 code, e.g. "IT".
    pub country: String,
    pub spending_period_unit: PeriodUnit,
    /// Set only on sub-wallets; the referenced wallet is always top-level.
    pub parent_wallet_id: Option<Uuid>,
    /// Display order, unique per owner, assigned at creation.
    pub order_index: i32,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Wallet {
    pub fn new(
        user_id: String,
        name: &str,
        currency: &str,
        country: &str,
        spending_period_unit: PeriodUnit,
        parent_wallet_id: Option<Uuid>,
        order_index: i32,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > 50 {
            return Err(EngineError::InvalidWallet(
                "name must be 1 to 50 characters".to_string(),
            ));
        }
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidWallet(
                "currency must be a 3-letter code".to_string(),
            ));
        }
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidWallet(
                "country must be a 2-letter code".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            currency: currency.to_ascii_uppercase(),
            country: country.to_ascii_uppercase(),
            spending_period_unit,
            parent_wallet_id,
            order_index,
            archived_at: None,
            created_at,
            updated_at: None,
            deleted_at: None,
        })
    }

    /// Returns `true` if this wallet belongs to a top-level wallet.
    pub fn is_sub_wallet(&self) -> bool {
        self.parent_wallet_id.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub currency: String,
    pub country: String,
    pub spending_period_unit: String,
    pub parent_wallet_id: Option<String>,
    pub order_index: i32,
    pub archived_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            currency: ActiveValue::Set(value.currency.clone()),
            country: ActiveValue::Set(value.country.clone()),
            spending_period_unit: ActiveValue::Set(value.spending_period_unit.as_str().to_string()),
            parent_wallet_id: ActiveValue::Set(
                value.parent_wallet_id.map(|id| id.to_string()),
            ),
            order_index: ActiveValue::Set(value.order_index),
            archived_at: ActiveValue::Set(value.archived_at),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
            deleted_at: ActiveValue::Set(value.deleted_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id).map_err(|_| EngineError::WalletNotFound)?,
            user_id: model.user_id,
            name: model.name,
            currency: model.currency,
            country: model.country,
            spending_period_unit: PeriodUnit::try_from(model.spending_period_unit.as_str())?,
            parent_wallet_id: model
                .parent_wallet_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            order_index: model.order_index,
            archived_at: model.archived_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn wallet(name: &str, currency: &str, country: &str) -> ResultEngine<Wallet> {
        Wallet::new(
            "alice".to_string(),
            name,
            currency,
            country,
            PeriodUnit::Month,
            None,
            0,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    #[test]
    fn new_wallet_normalizes_codes() {
        let wallet = wallet("Everyday", "eur", "it").unwrap();
        assert_eq!(wallet.currency, "EUR");
        assert_eq!(wallet.country, "IT");
        assert!(!wallet.is_sub_wallet());
    }

    #[test]
    fn rejects_bad_name_and_codes() {
        assert!(wallet("", "EUR", "IT").is_err());
        assert!(wallet(&"x".repeat(51), "EUR", "IT").is_err());
        assert!(wallet("Everyday", "EURO", "IT").is_err());
        assert!(wallet("Everyday", "EUR", "ITA").is_err());
        assert!(wallet("Everyday", "E1R", "IT").is_err());
    }
}
