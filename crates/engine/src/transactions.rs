//! Transaction primitives.
//!
//! A `Transaction` is a single ledger entry against exactly one wallet.
//! Deletion is always soft: a set `deleted_at` removes the row from every
//! listing and every aggregate.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{Category, EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub amount: MoneyCents,
    pub category: Category,
    pub description: String,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn new(
        wallet_id: Uuid,
        amount: MoneyCents,
        category: Category,
        description: &str,
        paid_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(EngineError::InvalidDescription(
                "description must not be empty".to_string(),
            ));
        }
        if description.chars().count() > 255 {
            return Err(EngineError::InvalidDescription(
                "description must be at most 255 characters".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            wallet_id,
            amount,
            category,
            description: description.to_string(),
            paid_at,
            created_at,
            updated_at: None,
            deleted_at: None,
        })
    }
}

/// A transaction joined with identifying fields of its wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionWithWallet {
    pub transaction: Transaction,
    pub wallet_name: String,
    pub currency: String,
    pub country: String,
    pub parent_wallet_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub wallet_id: String,
    pub amount_minor: i64,
    pub category: String,
    pub description: String,
    pub paid_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            category: ActiveValue::Set(tx.category.as_str().to_string()),
            description: ActiveValue::Set(tx.description.clone()),
            paid_at: ActiveValue::Set(tx.paid_at),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
            deleted_at: ActiveValue::Set(tx.deleted_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id).map_err(|_| EngineError::TransactionNotFound)?,
            wallet_id: Uuid::parse_str(&model.wallet_id)
                .map_err(|_| EngineError::WalletNotFound)?,
            amount: MoneyCents::new(model.amount_minor),
            category: Category::try_from(model.category.as_str())?,
            description: model.description,
            paid_at: model.paid_at,
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

    #[test]
    fn new_transaction_trims_description() {
        let tx = Transaction::new(
            Uuid::new_v4(),
            MoneyCents::new(1040),
            Category::Food,
            "  lunch  ",
            Utc.timestamp_opt(0, 0).unwrap(),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap();

        assert_eq!(tx.description, "lunch");
        assert_eq!(tx.amount.cents(), 1040);
        assert!(tx.deleted_at.is_none());
    }

    #[test]
    fn rejects_empty_description() {
        let result = Transaction::new(
            Uuid::new_v4(),
            MoneyCents::new(100),
            Category::Others,
            "   ",
            Utc.timestamp_opt(0, 0).unwrap(),
            Utc.timestamp_opt(0, 0).unwrap(),
        );
        assert!(result.is_err());
    }
}
