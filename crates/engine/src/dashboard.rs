//! Dashboard aggregation.
//!
//! The input is a flattened row collection: one row per (wallet,
//! transaction) pair, with wallet fields repeated, or a single row with an
//! empty transaction slot for a wallet that has no matching transactions.
//! The fold groups rows by wallet id in first-seen order and produces one
//! typed aggregate per wallet.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{MoneyCents, Transaction, Wallet};

/// One row of the flattened dashboard row set.
///
/// `wallet` is the *aggregating* wallet: for a top-level wallet the
/// transaction may actually belong to one of its sub-wallets.
#[derive(Clone, Debug)]
pub struct DashboardRow {
    pub wallet: Wallet,
    pub transaction: Option<Transaction>,
}

/// A wallet with its spending total for the current period and the matched
/// transactions in encounter order.
#[derive(Clone, Debug)]
pub struct WalletAggregate {
    pub wallet: Wallet,
    pub spending_period_total: MoneyCents,
    pub transactions: Vec<Transaction>,
}

impl WalletAggregate {
    fn empty(wallet: Wallet) -> Self {
        Self {
            wallet,
            spending_period_total: MoneyCents::ZERO,
            transactions: Vec::new(),
        }
    }
}

/// Folds the flattened rows into one aggregate per distinct wallet.
///
/// Wallet identity comes from the group's first row; groups appear in
/// first-seen order; no wallet is duplicated or dropped. A group whose only
/// rows carry no transaction yields a total of 0 and an empty list.
pub fn fold_rows(rows: Vec<DashboardRow>) -> Vec<WalletAggregate> {
    let mut aggregates: Vec<WalletAggregate> = Vec::new();
    let mut index_by_wallet: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let index = match index_by_wallet.get(&row.wallet.id) {
            Some(index) => *index,
            None => {
                index_by_wallet.insert(row.wallet.id, aggregates.len());
                aggregates.push(WalletAggregate::empty(row.wallet));
                aggregates.len() - 1
            }
        };

        if let Some(tx) = row.transaction {
            aggregates[index].spending_period_total += tx.amount;
            aggregates[index].transactions.push(tx);
        }
    }

    aggregates
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Category, PeriodUnit};

    fn wallet(name: &str, order_index: i32) -> Wallet {
        Wallet::new(
            "alice".to_string(),
            name,
            "EUR",
            "IT",
            PeriodUnit::Month,
            None,
            order_index,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap()
    }

    fn tx(wallet_id: Uuid, cents: i64) -> Transaction {
        Transaction::new(
            wallet_id,
            MoneyCents::new(cents),
            Category::Food,
            "test",
            Utc.timestamp_opt(0, 0).unwrap(),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn groups_by_wallet_in_first_seen_order() {
        let first = wallet("First", 0);
        let second = wallet("Second", 1);

        let rows = vec![
            DashboardRow {
                wallet: first.clone(),
                transaction: Some(tx(first.id, 1000)),
            },
            DashboardRow {
                wallet: first.clone(),
                transaction: Some(tx(first.id, 550)),
            },
            DashboardRow {
                wallet: second.clone(),
                transaction: Some(tx(second.id, 325)),
            },
        ];

        let aggregates = fold_rows(rows);

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].wallet.id, first.id);
        assert_eq!(aggregates[0].spending_period_total, MoneyCents::new(1550));
        assert_eq!(aggregates[0].transactions.len(), 2);
        assert_eq!(aggregates[1].wallet.id, second.id);
        assert_eq!(aggregates[1].spending_period_total, MoneyCents::new(325));
    }

    #[test]
    fn sentinel_row_yields_zero_total_and_empty_list() {
        let lonely = wallet("Lonely", 0);
        let rows = vec![DashboardRow {
            wallet: lonely.clone(),
            transaction: None,
        }];

        let aggregates = fold_rows(rows);

        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].spending_period_total, MoneyCents::ZERO);
        assert!(aggregates[0].transactions.is_empty());
    }

    #[test]
    fn no_wallet_is_duplicated_or_dropped() {
        let a = wallet("A", 0);
        let b = wallet("B", 1);
        let rows = vec![
            DashboardRow {
                wallet: a.clone(),
                transaction: Some(tx(a.id, 1)),
            },
            DashboardRow {
                wallet: b.clone(),
                transaction: None,
            },
            DashboardRow {
                wallet: a.clone(),
                transaction: Some(tx(a.id, 2)),
            },
        ];

        let aggregates = fold_rows(rows);

        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].spending_period_total, MoneyCents::new(3));
        assert_eq!(aggregates[1].spending_period_total, MoneyCents::ZERO);
    }

    #[test]
    fn sub_wallet_rows_fold_into_the_aggregating_wallet() {
        let parent = wallet("Parent", 0);
        let child_tx_owner = Uuid::new_v4();

        let rows = vec![
            DashboardRow {
                wallet: parent.clone(),
                transaction: Some(tx(parent.id, 1550)),
            },
            // A sub-wallet's transaction, delivered under the parent.
            DashboardRow {
                wallet: parent.clone(),
                transaction: Some(tx(child_tx_owner, 325)),
            },
        ];

        let aggregates = fold_rows(rows);

        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].spending_period_total, MoneyCents::new(1875));
    }
}
