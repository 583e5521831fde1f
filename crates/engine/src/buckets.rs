//! Assignment of transactions to period buckets.
//!
//! The fill is a pure fold: transactions have already been restricted to the
//! relevant wallet scope by the caller, and whatever still falls outside the
//! series is clipped here rather than trusted to the store's pre-filter.

use chrono::{DateTime, Utc};

use crate::{MoneyCents, Transaction, period::BucketBounds};

/// One aggregation window of a series, with its total and the matched
/// transactions in encounter order.
///
/// A bucket with no matching transactions reports a total of 0 and an empty
/// list, never null.
#[derive(Clone, Debug)]
pub struct PeriodBucket {
    pub start_period: DateTime<Utc>,
    pub total: MoneyCents,
    pub transactions: Vec<Transaction>,
}

/// Distributes `transactions` over `bounds` (most recent first) and sums
/// per-bucket totals.
///
/// Each transaction lands in the unique half-open window containing its
/// `paid_at`; transactions older than the oldest bucket or at/after the
/// newest bucket's end are dropped silently. The sum of all bucket totals
/// equals the sum of all matched amounts exactly.
pub fn fill_buckets(bounds: &[BucketBounds], transactions: Vec<Transaction>) -> Vec<PeriodBucket> {
    let mut buckets: Vec<PeriodBucket> = bounds
        .iter()
        .map(|b| PeriodBucket {
            start_period: b.report_start,
            total: MoneyCents::ZERO,
            transactions: Vec::new(),
        })
        .collect();

    for tx in transactions {
        let Some(index) = locate(bounds, tx.paid_at) else {
            continue;
        };
        buckets[index].total += tx.amount;
        buckets[index].transactions.push(tx);
    }

    buckets
}

/// Index of the bucket containing `at`, by binary search over the start
/// boundaries (the series is sorted most recent first).
fn locate(bounds: &[BucketBounds], at: DateTime<Utc>) -> Option<usize> {
    let newest = bounds.first()?;
    if newest.start.is_none() {
        // Single all-time bucket.
        return Some(0);
    }
    if let Some(end) = newest.end
        && at >= end
    {
        return None;
    }

    // Starts strictly decrease, so "start after `at`" holds for a prefix;
    // the first bucket past that prefix is the containing one. Contiguity
    // guarantees `at` is before its end.
    let index = bounds.partition_point(|b| b.start.is_some_and(|start| start > at));
    if index >= bounds.len() {
        return None;
    }
    Some(index)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::UTC;
    use uuid::Uuid;

    use super::*;
    use crate::period::{PeriodUnit, WeekStart, bucket_series};
    use crate::Category;

    fn tx(cents: i64, paid_at: DateTime<Utc>) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            MoneyCents::new(cents),
            Category::Food,
            "test",
            paid_at,
            paid_at,
        )
        .unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn month_series(now: DateTime<Utc>, limit: u32) -> Vec<BucketBounds> {
        bucket_series(PeriodUnit::Month, UTC, now, limit, 0, WeekStart::Monday).unwrap()
    }

    #[test]
    fn totals_are_conserved() {
        let now = utc(2026, 3, 25, 12);
        let bounds = month_series(now, 3);
        let transactions = vec![
            tx(1000, utc(2026, 3, 3, 9)),
            tx(550, utc(2026, 3, 20, 18)),
            tx(10_000, utc(2026, 2, 14, 7)),
            tx(125, utc(2026, 1, 31, 23)),
        ];
        let input_total: i64 = transactions.iter().map(|t| t.amount.cents()).sum();

        let buckets = fill_buckets(&bounds, transactions);

        let bucket_total: i64 = buckets.iter().map(|b| b.total.cents()).sum();
        assert_eq!(bucket_total, input_total);
        assert_eq!(buckets[0].total, MoneyCents::new(1550));
        assert_eq!(buckets[1].total, MoneyCents::new(10_000));
        assert_eq!(buckets[2].total, MoneyCents::new(125));
    }

    #[test]
    fn out_of_range_transactions_are_dropped() {
        let now = utc(2026, 3, 25, 12);
        let bounds = month_series(now, 2);
        let buckets = fill_buckets(
            &bounds,
            vec![
                // Older than the oldest bucket.
                tx(100, utc(2025, 12, 31, 23)),
                // At the newest bucket's end (exclusive).
                tx(200, utc(2026, 4, 1, 0)),
                tx(300, utc(2026, 3, 1, 0)),
            ],
        );

        let total: i64 = buckets.iter().map(|b| b.total.cents()).sum();
        assert_eq!(total, 300);
    }

    #[test]
    fn boundary_instant_belongs_to_the_newer_bucket() {
        let now = utc(2026, 3, 25, 12);
        let bounds = month_series(now, 2);

        // Exactly at March 1st: inside March, not February.
        let buckets = fill_buckets(&bounds, vec![tx(100, utc(2026, 3, 1, 0))]);
        assert_eq!(buckets[0].total, MoneyCents::new(100));
        assert_eq!(buckets[1].total, MoneyCents::ZERO);
    }

    #[test]
    fn empty_buckets_report_zero_and_empty_list() {
        let now = utc(2026, 3, 25, 12);
        let bounds = month_series(now, 4);
        let buckets = fill_buckets(&bounds, vec![tx(999, utc(2026, 3, 10, 10))]);

        for bucket in &buckets[1..] {
            assert_eq!(bucket.total, MoneyCents::ZERO);
            assert!(bucket.transactions.is_empty());
        }
    }

    #[test]
    fn all_time_bucket_matches_everything() {
        let now = utc(2026, 3, 25, 12);
        let bounds =
            bucket_series(PeriodUnit::All, UTC, now, 7, 3, WeekStart::Monday).unwrap();
        let buckets = fill_buckets(
            &bounds,
            vec![
                tx(1, utc(1999, 1, 1, 0)),
                tx(2, utc(2026, 3, 25, 11)),
                tx(4, utc(2030, 6, 1, 0)),
            ],
        );

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total, MoneyCents::new(7));
        assert_eq!(buckets[0].transactions.len(), 3);
        assert_eq!(buckets[0].start_period, now);
    }

    #[test]
    fn encounter_order_is_preserved() {
        let now = utc(2026, 3, 25, 12);
        let bounds = month_series(now, 1);
        let first = tx(1, utc(2026, 3, 20, 0));
        let second = tx(2, utc(2026, 3, 3, 0));

        let buckets = fill_buckets(&bounds, vec![first.clone(), second.clone()]);
        assert_eq!(buckets[0].transactions, vec![first, second]);
    }
}
