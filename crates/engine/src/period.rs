//! Period boundary math.
//!
//! Everything in this module is a pure function of its inputs: the reference
//! instant ("now") is always passed in by the caller and the ambient clock is
//! never read, so boundary computations stay deterministic and testable.
//!
//! All truncation and stepping happens in the wall-clock frame of the
//! requested timezone. Month and year steps use calendar arithmetic, never
//! fixed durations, and every boundary is derived independently from the
//! truncated anchor so a long series cannot drift.

use chrono::{DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::EngineError;

/// Granularity over which a wallet's spending is totalled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PeriodUnit {
    Day,
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl PeriodUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Year => "YEAR",
            Self::All => "ALL",
        }
    }
}

impl TryFrom<&str> for PeriodUnit {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "DAY" => Ok(Self::Day),
            "WEEK" => Ok(Self::Week),
            "MONTH" => Ok(Self::Month),
            "YEAR" => Ok(Self::Year),
            "ALL" => Ok(Self::All),
            other => Err(EngineError::InvalidPeriodUnit(other.to_string())),
        }
    }
}

/// First day of the week used for `WEEK` truncation.
///
/// The sources disagree on this convention, so it is engine configuration
/// rather than a constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// Half-open aggregation window `[start, end)`.
///
/// `start`/`end` are `None` for the single all-time bucket, which is
/// unbounded on both sides. `report_start` is the instant exposed as the
/// bucket's `start_period`; for the all-time bucket it is the reference
/// instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketBounds {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub report_start: DateTime<Utc>,
}

impl BucketBounds {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at < end)
    }
}

/// Resolves an IANA timezone identifier.
pub fn resolve_timezone(timezone: &str) -> Result<Tz, EngineError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(timezone.to_string()))
}

/// Start of the period containing `now`, in `tz`'s wall-clock frame.
///
/// Returns `None` for [`PeriodUnit::All`]: all-time spending has no lower
/// bound.
pub fn current_period_start(
    unit: PeriodUnit,
    tz: Tz,
    now: DateTime<Utc>,
    week_start: WeekStart,
) -> Result<Option<DateTime<Utc>>, EngineError> {
    if unit == PeriodUnit::All {
        return Ok(None);
    }

    let local_date = now.with_timezone(&tz).date_naive();
    let anchor = truncate_date(local_date, unit, week_start).ok_or_else(out_of_range)?;
    Ok(Some(local_midnight_to_utc(tz, anchor)))
}

/// Builds `limit` consecutive unit-width windows, most recent first.
///
/// The most recent window starts `offset` units before the period containing
/// `now`; each predecessor steps back one more unit. For
/// [`PeriodUnit::All`] the series is exactly one unbounded bucket and
/// `limit`/`offset` are ignored.
pub fn bucket_series(
    unit: PeriodUnit,
    tz: Tz,
    now: DateTime<Utc>,
    limit: u32,
    offset: u32,
    week_start: WeekStart,
) -> Result<Vec<BucketBounds>, EngineError> {
    if limit < 1 {
        return Err(EngineError::InvalidLimit(limit.to_string()));
    }

    if unit == PeriodUnit::All {
        return Ok(vec![BucketBounds {
            start: None,
            end: None,
            report_start: now,
        }]);
    }

    let local_date = now.with_timezone(&tz).date_naive();
    let anchor = truncate_date(local_date, unit, week_start).ok_or_else(out_of_range)?;

    let mut series = Vec::with_capacity(limit as usize);
    for j in 0..limit {
        let back = i64::from(offset) + i64::from(j);
        let start_date = shift_back(anchor, unit, back).ok_or_else(out_of_range)?;
        let end_date = shift_back(anchor, unit, back - 1).ok_or_else(out_of_range)?;
        let start = local_midnight_to_utc(tz, start_date);
        let end = local_midnight_to_utc(tz, end_date);
        series.push(BucketBounds {
            start: Some(start),
            end: Some(end),
            report_start: start,
        });
    }

    Ok(series)
}

fn out_of_range() -> EngineError {
    EngineError::InvalidLimit("limit/offset out of calendar range".to_string())
}

/// Truncates a local date to the start of its period.
fn truncate_date(date: NaiveDate, unit: PeriodUnit, week_start: WeekStart) -> Option<NaiveDate> {
    match unit {
        PeriodUnit::Day => Some(date),
        PeriodUnit::Week => {
            let back = match week_start {
                WeekStart::Monday => date.weekday().num_days_from_monday(),
                WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            };
            date.checked_sub_days(Days::new(u64::from(back)))
        }
        PeriodUnit::Month => date.with_day(1),
        PeriodUnit::Year => date.with_day(1).and_then(|d| d.with_month(1)),
        PeriodUnit::All => Some(date),
    }
}

/// Steps a period start `n` units back (negative `n` steps forward).
fn shift_back(date: NaiveDate, unit: PeriodUnit, n: i64) -> Option<NaiveDate> {
    match unit {
        PeriodUnit::Day => shift_days(date, n),
        PeriodUnit::Week => shift_days(date, n.checked_mul(7)?),
        PeriodUnit::Month => shift_months(date, n),
        PeriodUnit::Year => shift_months(date, n.checked_mul(12)?),
        PeriodUnit::All => Some(date),
    }
}

fn shift_days(date: NaiveDate, back: i64) -> Option<NaiveDate> {
    if back >= 0 {
        date.checked_sub_days(Days::new(back.unsigned_abs()))
    } else {
        date.checked_add_days(Days::new(back.unsigned_abs()))
    }
}

fn shift_months(date: NaiveDate, back: i64) -> Option<NaiveDate> {
    let months = Months::new(u32::try_from(back.unsigned_abs()).ok()?);
    if back >= 0 {
        date.checked_sub_months(months)
    } else {
        date.checked_add_months(months)
    }
}

/// Converts a local midnight to the UTC instant it names.
///
/// A DST gap can swallow local midnight; in that case the earliest existing
/// instant after it is used. Ambiguous local times resolve to the earlier
/// mapping.
fn local_midnight_to_utc(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let mut naive = NaiveDateTime::new(date, NaiveTime::MIN);
    for _ in 0..8 {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => naive += Duration::minutes(15),
        }
    }
    Utc.from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;
    use chrono_tz::Europe::Rome;
    use chrono_tz::UTC;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    // 2026-03-15 is a Sunday.
    const NOW_Y: i32 = 2026;

    #[test]
    fn truncates_to_unit_start_in_utc() {
        let now = utc(NOW_Y, 3, 15, 10, 30);

        let day = current_period_start(PeriodUnit::Day, UTC, now, WeekStart::Monday).unwrap();
        assert_eq!(day, Some(utc(NOW_Y, 3, 15, 0, 0)));

        let week = current_period_start(PeriodUnit::Week, UTC, now, WeekStart::Monday).unwrap();
        assert_eq!(week, Some(utc(NOW_Y, 3, 9, 0, 0)));

        let month = current_period_start(PeriodUnit::Month, UTC, now, WeekStart::Monday).unwrap();
        assert_eq!(month, Some(utc(NOW_Y, 3, 1, 0, 0)));

        let year = current_period_start(PeriodUnit::Year, UTC, now, WeekStart::Monday).unwrap();
        assert_eq!(year, Some(utc(NOW_Y, 1, 1, 0, 0)));
    }

    #[test]
    fn week_start_is_configurable() {
        // Sunday: a Sunday-start week begins on the day itself.
        let now = utc(NOW_Y, 3, 15, 10, 30);
        let week = current_period_start(PeriodUnit::Week, UTC, now, WeekStart::Sunday).unwrap();
        assert_eq!(week, Some(utc(NOW_Y, 3, 15, 0, 0)));
    }

    #[test]
    fn all_has_no_lower_bound() {
        let now = utc(NOW_Y, 3, 15, 10, 30);
        let start = current_period_start(PeriodUnit::All, UTC, now, WeekStart::Monday).unwrap();
        assert_eq!(start, None);
    }

    #[test]
    fn truncation_follows_the_wall_clock() {
        // 02:00Z on March 1st is still February 28th in New York, so the
        // month starts at Feb 1st local time (05:00Z in EST).
        let now = utc(NOW_Y, 3, 1, 2, 0);
        let month = current_period_start(PeriodUnit::Month, New_York, now, WeekStart::Monday)
            .unwrap()
            .unwrap();
        assert_eq!(month, utc(NOW_Y, 2, 1, 5, 0));
    }

    #[test]
    fn series_is_contiguous_and_most_recent_first() {
        let now = utc(NOW_Y, 3, 15, 10, 30);
        let series =
            bucket_series(PeriodUnit::Month, Rome, now, 14, 0, WeekStart::Monday).unwrap();

        assert_eq!(series.len(), 14);
        for pair in series.windows(2) {
            // Older bucket ends exactly where the newer one starts.
            assert_eq!(pair[1].end, pair[0].start);
            assert!(pair[1].start < pair[0].start);
        }
        // The newest bucket is the current period.
        assert_eq!(series[0].start, Some(utc(NOW_Y, 2, 28, 23, 0)));
    }

    #[test]
    fn offset_skips_most_recent_buckets() {
        let now = utc(NOW_Y, 3, 15, 10, 30);
        let series = bucket_series(PeriodUnit::Month, UTC, now, 2, 3, WeekStart::Monday).unwrap();

        assert_eq!(series[0].start, Some(utc(2025, 12, 1, 0, 0)));
        assert_eq!(series[0].end, Some(utc(NOW_Y, 1, 1, 0, 0)));
        assert_eq!(series[1].start, Some(utc(2025, 11, 1, 0, 0)));
    }

    #[test]
    fn month_steps_use_calendar_arithmetic() {
        // Stepping back from March must land on Feb 1st / Jan 1st, not on
        // "28 days ago".
        let now = utc(NOW_Y, 3, 31, 12, 0);
        let series = bucket_series(PeriodUnit::Month, UTC, now, 3, 0, WeekStart::Monday).unwrap();
        assert_eq!(series[0].start, Some(utc(NOW_Y, 3, 1, 0, 0)));
        assert_eq!(series[1].start, Some(utc(NOW_Y, 2, 1, 0, 0)));
        assert_eq!(series[2].start, Some(utc(NOW_Y, 1, 1, 0, 0)));
    }

    #[test]
    fn all_returns_one_unbounded_bucket() {
        let now = utc(NOW_Y, 3, 15, 10, 30);
        let series = bucket_series(PeriodUnit::All, UTC, now, 5, 2, WeekStart::Monday).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].start, None);
        assert_eq!(series[0].end, None);
        assert_eq!(series[0].report_start, now);
        assert!(series[0].contains(utc(1970, 1, 1, 0, 0)));
        assert!(series[0].contains(utc(2999, 1, 1, 0, 0)));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let now = utc(NOW_Y, 3, 15, 10, 30);
        let err = bucket_series(PeriodUnit::Day, UTC, now, 0, 0, WeekStart::Monday).unwrap_err();
        assert_eq!(err, EngineError::InvalidLimit("0".to_string()));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = resolve_timezone("Not/AZone").unwrap_err();
        assert_eq!(err, EngineError::InvalidTimezone("Not/AZone".to_string()));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = PeriodUnit::try_from("FORTNIGHT").unwrap_err();
        assert_eq!(err, EngineError::InvalidPeriodUnit("FORTNIGHT".to_string()));
    }

    #[test]
    fn dst_gap_does_not_break_the_series() {
        // America/Santiago starts DST at midnight: local 00:00 does not exist
        // on the switch day and the bucket start resolves to the first valid
        // instant after it.
        let tz: Tz = "America/Santiago".parse().unwrap();
        let now = utc(2024, 9, 10, 12, 0);
        let series = bucket_series(PeriodUnit::Day, tz, now, 5, 0, WeekStart::Monday).unwrap();

        assert_eq!(series.len(), 5);
        for pair in series.windows(2) {
            assert_eq!(pair[1].end, pair[0].start);
            assert!(pair[1].start < pair[0].start);
        }
    }
}
