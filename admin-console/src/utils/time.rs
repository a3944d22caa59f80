//! Business time zone helpers
//!
//! Every calendar computation (statistics buckets, range filters) goes through
//! these functions; the rest of the crate only handles `i64` Unix millis.

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Millis → local date-time in the business time zone
pub fn local_datetime(millis: i64, tz: Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz))
}

/// Current time in Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Date + hour/min/sec → Unix millis (business time zone)
///
/// A wall time inside a DST gap is read with the offset in effect before the
/// gap, which lands on the first instant after the transition.
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    match naive.and_local_timezone(tz) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp_millis(),
        LocalResult::None => {
            let before_gap = tz
                .offset_from_local_datetime(&(naive - TimeDelta::hours(24)))
                .earliest()
                .map(|offset| offset.fix().local_minus_utc())
                .unwrap_or(0);
            naive.and_utc().timestamp_millis() - i64::from(before_gap) * 1000
        }
    }
}

/// Local midnight of `date` → Unix millis
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// First day of the month
pub fn month_start(year: i32, month: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}-{}", year, month)))
}

/// First day of the following month
pub fn next_month_start(year: i32, month: u32) -> AppResult<NaiveDate> {
    let (y, m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    month_start(y, m)
}

/// Number of days in the month
pub fn days_in_month(year: i32, month: u32) -> AppResult<u32> {
    let start = month_start(year, month)?;
    let next = next_month_start(year, month)?;
    Ok((next - start).num_days() as u32)
}

/// Year/month of `millis` in the business time zone
pub fn year_month_of(millis: i64, tz: Tz) -> Option<(i32, u32)> {
    local_datetime(millis, tz).map(|dt| (dt.year(), dt.month()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 12).unwrap(), 31);
        assert!(days_in_month(2024, 13).is_err());
    }

    #[test]
    fn test_day_start_in_zone() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_start_millis(date, Tz::UTC), 1_704_067_200_000);
        // Madrid is UTC+1 in winter
        assert_eq!(
            day_start_millis(date, chrono_tz::Europe::Madrid),
            1_704_067_200_000 - 3_600_000
        );
    }

    #[test]
    fn test_year_month_of_respects_zone() {
        // 2024-01-31T23:30:00Z is already February in Madrid
        let millis = 1_706_743_800_000;
        assert_eq!(year_month_of(millis, Tz::UTC), Some((2024, 1)));
        assert_eq!(year_month_of(millis, chrono_tz::Europe::Madrid), Some((2024, 2)));
    }

    #[test]
    fn test_midnight_in_dst_gap_moves_forward() {
        // Santiago skips 2022-09-11 00:00..01:00; the day starts at 01:00 -03
        let tz = chrono_tz::America::Santiago;
        let date = NaiveDate::from_ymd_opt(2022, 9, 11).unwrap();
        assert_eq!(day_start_millis(date, tz), 1_662_868_800_000);

        let start = local_datetime(day_start_millis(date, tz), tz).unwrap();
        assert_eq!(start.date_naive(), date);
        assert_eq!(start.hour(), 1);

        // Instants after the gap are unaffected
        assert_eq!(date_hms_to_millis(date, 2, 0, 0, tz), 1_662_872_400_000);
    }
}
