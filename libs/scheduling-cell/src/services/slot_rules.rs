// libs/scheduling-cell/src/services/slot_rules.rs
//
// Pure slot policy: no clock reads, no I/O. Callers pass "today" in, which
// keeps every predicate deterministic and directly testable.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::models::SlotRuleViolation;

/// Bookings may be placed at most this many days ahead, inclusive.
pub const BOOKING_HORIZON_DAYS: i64 = 20;

/// First bookable hour of the day.
pub const OPENING_HOUR: u32 = 9;

/// Last bookable hour of the day, inclusive.
pub const CLOSING_HOUR: u32 = 18;

/// Parse a calendar date from the formats the front end is known to send:
/// plain `YYYY-MM-DD`, `DD/MM/YYYY`, or a full RFC 3339 timestamp (the
/// time-of-day part is discarded). Returns `None` on anything else.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    None
}

/// Parse an `HH:MM`-like string. A bare hour is accepted and the minute
/// defaults to zero; hours outside 0..=23 fail.
pub fn normalize_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.splitn(3, ':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(text) if !text.trim().is_empty() => text.trim().parse().ok()?,
        _ => 0,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Strictly after today; the comparison is between calendar days, so a
/// booking for later today is rejected regardless of wall-clock time.
pub fn is_future_day(date: NaiveDate, today: NaiveDate) -> bool {
    date > today
}

/// Within the rolling booking window, end of the last day inclusive.
pub fn is_within_horizon(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today + Duration::days(BOOKING_HORIZON_DAYS)
}

/// Hour within opening hours, 09:00 through 18:00 inclusive.
pub fn is_business_hour(time: NaiveTime) -> bool {
    let hour = chrono::Timelike::hour(&time);
    (OPENING_HOUR..=CLOSING_HOUR).contains(&hour)
}

/// Run every policy predicate over an already-normalized candidate and
/// report the first violation. Each failure carries its own user-facing
/// message; none is ever coerced into a pass.
pub fn validate_slot(
    date: NaiveDate,
    time: NaiveTime,
    today: NaiveDate,
) -> Result<(), SlotRuleViolation> {
    if !is_business_day(date) {
        return Err(SlotRuleViolation::NotBusinessDay);
    }
    if !is_future_day(date, today) {
        return Err(SlotRuleViolation::NotFuture);
    }
    if !is_within_horizon(date, today) {
        return Err(SlotRuleViolation::BeyondHorizon);
    }
    if !is_business_hour(time) {
        return Err(SlotRuleViolation::OutsideBusinessHours);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn normalize_date_accepts_known_formats() {
        assert_eq!(normalize_date("2025-11-10"), Some(date(2025, 11, 10)));
        assert_eq!(normalize_date("10/11/2025"), Some(date(2025, 11, 10)));
        assert_eq!(
            normalize_date("2025-11-10T14:30:00"),
            Some(date(2025, 11, 10))
        );
        assert_eq!(
            normalize_date("2025-11-10T14:30:00-03:00"),
            Some(date(2025, 11, 10))
        );
    }

    #[test]
    fn normalize_date_fails_on_garbage() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("mañana"), None);
        assert_eq!(normalize_date("2025-13-40"), None);
    }

    #[test]
    fn normalize_time_defaults_missing_minute() {
        assert_eq!(normalize_time("8"), Some(time(8, 0)));
        assert_eq!(normalize_time("09:30"), Some(time(9, 30)));
        assert_eq!(normalize_time("18:00:00"), Some(time(18, 0)));
    }

    #[test]
    fn normalize_time_rejects_out_of_range_hours() {
        assert_eq!(normalize_time("25:00"), None);
        assert_eq!(normalize_time("24"), None);
        assert_eq!(normalize_time("-1:00"), None);
        assert_eq!(normalize_time(""), None);
    }

    #[test]
    fn weekends_are_not_business_days() {
        // 2025-11-08 is a Saturday, 2025-11-09 a Sunday, 2025-11-10 a Monday.
        assert!(!is_business_day(date(2025, 11, 8)));
        assert!(!is_business_day(date(2025, 11, 9)));
        assert!(is_business_day(date(2025, 11, 10)));
        assert!(is_business_day(date(2025, 11, 14)));
    }

    #[test]
    fn future_comparison_is_midnight_aligned() {
        let today = date(2025, 11, 10);
        assert!(!is_future_day(today, today));
        assert!(!is_future_day(date(2025, 11, 9), today));
        assert!(is_future_day(date(2025, 11, 11), today));
    }

    #[test]
    fn horizon_is_inclusive_at_twenty_days() {
        let today = date(2025, 11, 10);
        assert!(is_within_horizon(date(2025, 11, 30), today));
        assert!(!is_within_horizon(date(2025, 12, 1), today));
    }

    #[test]
    fn business_hours_cover_nine_to_eighteen_inclusive() {
        for hour in 0..24u32 {
            let expected = (9..=18).contains(&hour);
            assert_eq!(is_business_hour(time(hour, 0)), expected, "hour {hour}");
        }
        // Only the hour matters; 18:30 still falls inside the last slot hour.
        assert!(is_business_hour(time(18, 30)));
        assert!(!is_business_hour(time(8, 30)));
    }

    #[test]
    fn validate_slot_reports_the_first_violation() {
        let today = date(2025, 11, 10); // Monday

        assert_matches!(
            validate_slot(date(2025, 11, 15), time(10, 0), today),
            Err(SlotRuleViolation::NotBusinessDay)
        );
        assert_matches!(
            validate_slot(today, time(10, 0), today),
            Err(SlotRuleViolation::NotFuture)
        );
        assert_matches!(
            validate_slot(date(2025, 12, 2), time(10, 0), today),
            Err(SlotRuleViolation::BeyondHorizon)
        );
        assert_matches!(
            validate_slot(date(2025, 11, 11), time(8, 30), today),
            Err(SlotRuleViolation::OutsideBusinessHours)
        );
        assert!(validate_slot(date(2025, 11, 11), time(9, 0), today).is_ok());
    }
}
