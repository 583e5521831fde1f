use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Granularity over which a wallet's spending is totalled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PeriodUnit {
    Day,
    Week,
    #[default]
    Month,
    Year,
    All,
}

/// Closed set of transaction category tags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Accommodation,
    Entertainment,
    Fitness,
    Food,
    Games,
    Gifts,
    Grooming,
    Hobbies,
    Insurance,
    Medical,
    #[default]
    Others,
    Pet,
    Shopping,
    Transfers,
    Transport,
    Travel,
    Utilities,
    Work,
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletNew {
        pub name: String,
        /// ISO 4217 code, e.g. "EUR".
        pub currency: String,
        /// ISO 3166-1 alpha-2 code, e.g. "IT".
        pub country: String,
        pub spending_period_unit: Option<PeriodUnit>,
        /// Present only when creating a sub-wallet of a top-level wallet.
        pub parent_wallet_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletUpdate {
        pub name: Option<String>,
        pub spending_period_unit: Option<PeriodUnit>,
        pub parent_wallet_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletView {
        pub id: Uuid,
        pub name: String,
        pub currency: String,
        pub country: String,
        pub spending_period_unit: PeriodUnit,
        pub parent_wallet_id: Option<Uuid>,
        /// Display order, unique per owner.
        pub order_index: i32,
        pub archived_at: Option<DateTime<FixedOffset>>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletsQuery {
        pub search_phrase: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MainWalletsQuery {
        pub search_phrase: Option<String>,
        pub currency: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardQuery {
        /// IANA timezone identifier, e.g. "Europe/Rome".
        pub timezone: String,
    }

    /// A wallet plus its spending total for the current period.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DashboardWallet {
        pub id: Uuid,
        pub name: String,
        pub currency: String,
        pub country: String,
        pub spending_period_unit: PeriodUnit,
        pub parent_wallet_id: Option<Uuid>,
        pub order_index: i32,
        pub archived_at: Option<DateTime<FixedOffset>>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: Option<DateTime<FixedOffset>>,
        /// Minor units (cents).
        pub spending_period_total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpendingQuery {
        pub timezone: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletArchive {
        pub archived: bool,
    }

    /// Single-wallet current-period aggregate, including the matching
    /// transactions.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletSpending {
        pub id: Uuid,
        pub name: String,
        pub currency: String,
        pub country: String,
        pub spending_period_unit: PeriodUnit,
        pub parent_wallet_id: Option<Uuid>,
        pub order_index: i32,
        /// Minor units (cents).
        pub spending_period_total: i64,
        /// Current-period transactions in encounter order. Empty when there
        /// are none; never null.
        pub transactions: Vec<super::transaction::TransactionView>,
    }

    /// Chart requests use the caller's stored timezone, so none is supplied
    /// here.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChartQuery {
        /// Period unit tag, e.g. "MONTH" or "ALL".
        pub unit: String,
        /// Bucket count as a decimal-digit string (search params are
        /// strings).
        pub limit: String,
        /// Buckets to skip from the most recent one; defaults to 0.
        pub offset: Option<String>,
    }

    /// One time-bounded aggregation window of a chart series.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChartBucket {
        /// Bucket start, reported in the requested timezone's offset.
        pub start_period: DateTime<FixedOffset>,
        /// Minor units (cents).
        pub spending_period_total: i64,
        /// Empty when no transaction falls inside the bucket; never null.
        pub transactions: Vec<ChartTransaction>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChartTransaction {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub amount_minor: i64,
        /// Category tag, or the sub-wallet's name for transactions that
        /// belong to a sub-wallet of the charted wallet.
        pub category: String,
        pub description: String,
        pub paid_at: DateTime<FixedOffset>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub wallet_id: Uuid,
        /// Minor units (cents).
        pub amount_minor: i64,
        pub category: Option<Category>,
        pub description: String,
        /// RFC3339 timestamp; the server defaults it to "now" when absent.
        pub paid_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        pub wallet_id: Uuid,
        pub amount_minor: i64,
        pub category: Option<Category>,
        pub description: String,
        pub paid_at: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub amount_minor: i64,
        pub category: Category,
        pub description: String,
        pub paid_at: DateTime<FixedOffset>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: Option<DateTime<FixedOffset>>,
    }

    /// A transaction joined with identifying fields of its wallet.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionWithWallet {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub amount_minor: i64,
        pub category: Category,
        pub description: String,
        pub paid_at: DateTime<FixedOffset>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: Option<DateTime<FixedOffset>>,
        pub name: String,
        pub currency: String,
        pub country: String,
        pub parent_wallet_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionsQuery {
        pub wallet_id: Uuid,
        /// Page size as a decimal-digit string (search params are strings).
        pub limit: String,
        pub offset: Option<String>,
        /// Restrict to the UTC day containing this instant.
        pub date: Option<DateTime<FixedOffset>>,
        pub search_phrase: Option<String>,
    }
}
