//! Form field checks. Each returns the user-facing message on failure.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MAX_LOOKAHEAD_DAYS;

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit".to_string());
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }

    Ok(())
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| "Invalid date format, expected YYYY-MM-DD".to_string())
}

/// Parses `HH:MM`.
pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| "Invalid time format, expected HH:MM".to_string())
}

pub fn parse_date_time(date: &str, time: &str) -> Result<NaiveDateTime, String> {
    Ok(parse_date(date)?.and_time(parse_time(time)?))
}

const OUT_OF_RANGE: &str = "Date is out of range";

pub fn add_minutes(start: NaiveDateTime, minutes: i64) -> Result<NaiveDateTime, String> {
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| OUT_OF_RANGE.to_string())
}

pub fn add_days(start: NaiveDateTime, days: i64) -> Result<NaiveDateTime, String> {
    TimeDelta::try_days(days)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| OUT_OF_RANGE.to_string())
}

/// End of a look-ahead window of `days` days starting at `now`.
pub fn lookahead_end(now: NaiveDateTime, days: i64) -> Result<NaiveDateTime, String> {
    if !(0..=MAX_LOOKAHEAD_DAYS).contains(&days) {
        return Err(format!("days must be between 0 and {}", MAX_LOOKAHEAD_DAYS));
    }
    add_days(now, days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_emails() {
        for email in ["student@example.com", "a.b+c@mail.school.org", "x_y%z@d-e.io"] {
            assert_eq!(validate_email(email), Ok(()), "{email}");
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        assert_eq!(
            validate_email(""),
            Err("Email cannot be empty".to_string())
        );
        for email in [
            "no-at-sign.com",
            "@example.com",
            "user@nodot",
            "user@example.c",
            "user@exa mple.com",
            "us er@example.com",
            "user@.com",
        ] {
            assert_eq!(
                validate_email(email),
                Err("Invalid email format".to_string()),
                "{email}"
            );
        }
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("").is_err());
        assert_eq!(
            validate_password("abc123"),
            Err("Password must be at least 8 characters long".to_string())
        );
        assert_eq!(
            validate_password("abcdefgh"),
            Err("Password must contain at least one digit".to_string())
        );
        assert_eq!(
            validate_password("12345678"),
            Err("Password must contain at least one letter".to_string())
        );
        assert_eq!(validate_password("secret123"), Ok(()));
    }

    #[test]
    fn parses_lesson_date_and_time() {
        let parsed = parse_date_time("2026-10-20", "09:30").unwrap();
        assert_eq!(parsed.to_string(), "2026-10-20 09:30:00");

        assert!(parse_date_time("20.10.2026", "09:30").is_err());
        assert!(parse_date_time("2026-10-20", "9.30").is_err());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn date_arithmetic_reports_overflow_instead_of_panicking() {
        let last_day = NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap();
        assert_eq!(
            add_minutes(last_day, 120),
            Err("Date is out of range".to_string())
        );
        assert_eq!(add_days(last_day, 1), Err("Date is out of range".to_string()));
        assert!(add_days(NaiveDateTime::MIN, i64::MAX).is_err());

        let start = parse_date_time("2026-10-20", "09:30").unwrap();
        assert_eq!(add_minutes(start, 90).unwrap().to_string(), "2026-10-20 11:00:00");
    }

    #[test]
    fn lookahead_window_is_bounded() {
        let now = parse_date_time("2026-10-20", "09:30").unwrap();
        assert_eq!(lookahead_end(now, 0), Ok(now));
        assert_eq!(
            lookahead_end(now, MAX_LOOKAHEAD_DAYS).unwrap().to_string(),
            "2027-10-21 09:30:00"
        );
        for days in [-1, MAX_LOOKAHEAD_DAYS + 1, 1_000_000_000, i64::MAX] {
            assert_eq!(
                lookahead_end(now, days),
                Err("days must be between 0 and 366".to_string()),
                "{days}"
            );
        }
    }
}
