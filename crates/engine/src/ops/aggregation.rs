//! Aggregation reads: dashboard totals and chart series.
//!
//! These operations compose the period calculator, the hierarchy scope, and
//! the bucket/dashboard folds over a single fetch of the relevant rows. All
//! validation happens before any transaction row is read.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    Engine, MoneyCents, PeriodBucket, PeriodUnit, ResultEngine, Transaction, Wallet,
    WalletAggregate, WalletScope,
    dashboard::{DashboardRow, fold_rows},
    fill_buckets,
    period::{bucket_series, resolve_timezone},
    transactions, wallets,
};

impl Engine {
    /// Current-period aggregates for every non-deleted, non-archived wallet
    /// the user owns, ordered by display index.
    ///
    /// Each top-level wallet's total includes its sub-wallets' transactions;
    /// every sub-wallet also appears on its own with just its own. Wallets
    /// without matching transactions report a total of 0 and an empty list.
    pub async fn dashboard(
        &self,
        user_id: &str,
        timezone: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<WalletAggregate>> {
        let tz = resolve_timezone(timezone)?;

        // One fetch of the full (non-deleted) wallet set: the visible ones
        // drive the output, the rest only resolve hierarchy scopes. Archived
        // sub-wallets keep counting toward their parent.
        let all_wallets = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::DeletedAt.is_null())
            .order_by_asc(wallets::Column::OrderIndex)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        if all_wallets.is_empty() {
            return Ok(Vec::new());
        }

        let visible: Vec<&Wallet> = all_wallets
            .iter()
            .filter(|w| w.archived_at.is_none())
            .collect();

        // Window bounds per visible wallet, and the loosest lower bound for
        // the single transaction fetch. Any all-time wallet makes the fetch
        // unbounded.
        let mut bounds_by_wallet = HashMap::new();
        let mut fetch_from: Option<DateTime<Utc>> = None;
        let mut unbounded = false;
        for wallet in &visible {
            let bounds = bucket_series(
                wallet.spending_period_unit,
                tz,
                now,
                1,
                0,
                self.week_start,
            )?;
            match bounds.first().and_then(|b| b.start) {
                None => unbounded = true,
                Some(start) => {
                    fetch_from = Some(match fetch_from {
                        Some(existing) => existing.min(start),
                        None => start,
                    });
                }
            }
            bounds_by_wallet.insert(wallet.id, bounds);
        }

        let scope_ids: Vec<Uuid> = all_wallets.iter().map(|w| w.id).collect();
        let fetched = self
            .fetch_for_bucketing(scope_ids, if unbounded { None } else { fetch_from }, None)
            .await?;

        let children_by_parent: HashMap<Uuid, HashSet<Uuid>> = {
            let mut map: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
            for wallet in &all_wallets {
                if let Some(parent_id) = wallet.parent_wallet_id {
                    map.entry(parent_id).or_default().insert(wallet.id);
                }
            }
            map
        };

        // Flatten into one row per (wallet, matching transaction), with a
        // sentinel row for wallets that matched nothing, then fold.
        let mut rows = Vec::new();
        for wallet in visible {
            let Some(bounds) = bounds_by_wallet.get(&wallet.id) else {
                continue;
            };
            let in_scope = |id: Uuid| {
                id == wallet.id
                    || (!wallet.is_sub_wallet()
                        && children_by_parent
                            .get(&wallet.id)
                            .is_some_and(|children| children.contains(&id)))
            };

            let mut matched = fetched
                .iter()
                .filter(|tx| {
                    in_scope(tx.wallet_id)
                        && bounds.first().is_some_and(|b| b.contains(tx.paid_at))
                })
                .peekable();

            if matched.peek().is_none() {
                rows.push(DashboardRow {
                    wallet: wallet.clone(),
                    transaction: None,
                });
            } else {
                for tx in matched {
                    rows.push(DashboardRow {
                        wallet: wallet.clone(),
                        transaction: Some(tx.clone()),
                    });
                }
            }
        }

        Ok(fold_rows(rows))
    }

    /// Current-period aggregate for a single wallet (and its sub-wallets).
    ///
    /// Absence of data is never an error: a wallet without matching
    /// transactions yields a zero total and an empty list.
    pub async fn current_period_total(
        &self,
        user_id: &str,
        wallet_id: Uuid,
        timezone: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletAggregate> {
        let tz = resolve_timezone(timezone)?;
        let scope = self.wallet_scope(user_id, wallet_id).await?;
        let bounds = bucket_series(
            scope.wallet.spending_period_unit,
            tz,
            now,
            1,
            0,
            self.week_start,
        )?;

        let fetched = self
            .fetch_for_bucketing(
                scope.ids(),
                bounds.first().and_then(|b| b.start),
                bounds.first().and_then(|b| b.end),
            )
            .await?;

        let mut buckets = fill_buckets(&bounds, fetched);
        let Some(bucket) = buckets.pop() else {
            return Ok(WalletAggregate {
                wallet: scope.wallet,
                spending_period_total: MoneyCents::ZERO,
                transactions: Vec::new(),
            });
        };

        Ok(WalletAggregate {
            wallet: scope.wallet,
            spending_period_total: bucket.total,
            transactions: bucket.transactions,
        })
    }

    /// Historical bucket series for one wallet (chart view), most recent
    /// first.
    ///
    /// For [`PeriodUnit::All`] the series is a single bucket covering all of
    /// history, regardless of `limit`/`offset`. The scope is returned along
    /// with the buckets so callers can label sub-wallet transactions.
    pub async fn wallet_chart(
        &self,
        user_id: &str,
        wallet_id: Uuid,
        unit: PeriodUnit,
        timezone: &str,
        now: DateTime<Utc>,
        limit: u32,
        offset: u32,
    ) -> ResultEngine<(WalletScope, Vec<PeriodBucket>)> {
        let tz = resolve_timezone(timezone)?;
        let scope = self.wallet_scope(user_id, wallet_id).await?;
        let bounds = bucket_series(unit, tz, now, limit, offset, self.week_start)?;

        let fetched = self
            .fetch_for_bucketing(
                scope.ids(),
                bounds.last().and_then(|b| b.start),
                bounds.first().and_then(|b| b.end),
            )
            .await?;

        let buckets = fill_buckets(&bounds, fetched);
        Ok((scope, buckets))
    }

    /// Store fetch: non-deleted transactions of the given wallets, newest
    /// first, optionally pre-filtered to a half-open time range.
    ///
    /// The callers still clip whatever comes back; the range filter only
    /// keeps the row set small.
    async fn fetch_for_bucketing(
        &self,
        wallet_ids: Vec<Uuid>,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<Transaction>> {
        let ids: Vec<String> = wallet_ids.iter().map(ToString::to_string).collect();

        let mut query = transactions::Entity::find()
            .filter(transactions::Column::WalletId.is_in(ids))
            .filter(transactions::Column::DeletedAt.is_null())
            .order_by_desc(transactions::Column::PaidAt);

        if let Some(from) = from {
            query = query.filter(transactions::Column::PaidAt.gte(from));
        }
        if let Some(until) = until {
            query = query.filter(transactions::Column::PaidAt.lt(until));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }
}
