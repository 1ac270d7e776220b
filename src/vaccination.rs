//! Vaccination due-date classification
//!
//! A health record's `next_due_date` is the only input. The status is
//! derived on every read and never stored.

use std::fmt;

use chrono::{DateTime, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DUE_SOON_DAYS: i64 = 30;
pub const UPCOMING_DAYS: i64 = 60;
pub const NO_DUE_DATE_MESSAGE: &str = "No due date set";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Overdue,
    DueSoon,
    Upcoming,
    Current,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Overdue => write!(f, "overdue"),
            Status::DueSoon => write!(f, "due-soon"),
            Status::Upcoming => write!(f, "upcoming"),
            Status::Current => write!(f, "current"),
        }
    }
}

impl Status {
    pub fn color(&self) -> Color {
        match self {
            Status::Overdue => Color::Red,
            Status::DueSoon => Color::Orange,
            Status::Upcoming => Color::Blue,
            Status::Current => Color::Green,
        }
    }

    /// Statuses the reminder pass pushes to the owner.
    pub fn needs_reminder(&self) -> bool {
        matches!(self, Status::Overdue | Status::DueSoon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Blue,
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationStatus {
    pub status: Status,
    pub days_until_due: i64,
    pub message: String,
    pub color: Color,
}

/// Classifies a due date against the local calendar day.
pub fn classify(next_due_date: Option<NaiveDate>) -> VaccinationStatus {
    classify_at(next_due_date, Local::now().date_naive())
}

/// Classifies a due date against `today`. First match wins: overdue,
/// due within 30 days (today included), due within 60 days, later.
pub fn classify_at(
    next_due_date: Option<NaiveDate>,
    today: NaiveDate,
) -> VaccinationStatus {
    let due = match next_due_date {
        Some(date) => date,
        None => {
            return VaccinationStatus {
                status: Status::Current,
                days_until_due: 0,
                message: String::from(NO_DUE_DATE_MESSAGE),
                color: Status::Current.color(),
            };
        },
    };

    let days_until = days_between(due, today);

    let (status, message) = if days_until < 0 {
        (
            Status::Overdue,
            format!("Overdue by {} days", days_until.abs()),
        )
    } else if days_until <= DUE_SOON_DAYS {
        (Status::DueSoon, format!("Due in {} days", days_until))
    } else if days_until <= UPCOMING_DAYS {
        (Status::Upcoming, format!("Due in {} days", days_until))
    } else {
        (Status::Current, String::from("Up to date"))
    };

    VaccinationStatus {
        status,
        days_until_due: days_until,
        message,
        color: status.color(),
    }
}

/// Signed whole days from `today` to `due`; negative when `due` is past.
pub fn days_between(due: NaiveDate, today: NaiveDate) -> i64 {
    due.signed_duration_since(today).num_days()
}

/// Adds `frequency_in_months` calendar months to the last administered
/// date. Day-of-month is clamped to the end of shorter months.
pub fn next_due(
    last_administered: NaiveDate,
    frequency_in_months: u32,
) -> Result<NaiveDate, Error> {
    last_administered
        .checked_add_months(Months::new(frequency_in_months))
        .ok_or_else(|| Error::InvalidOption {
            option: format!(
                "frequency {} months from {}",
                frequency_in_months, last_administered
            ),
        })
}

/// Accepts a bare `YYYY-MM-DD` date or an RFC 3339 timestamp; the
/// time-of-day is discarded.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, Error> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|at| at.date_naive())
        .map_err(|_| {
            Error::DecodeDateTimeError(format!("Due date parse {}", value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn in_days(days: i64) -> Option<NaiveDate> {
        Some(today() + Duration::days(days))
    }

    #[test]
    fn test_missing_due_date_is_current() {
        let status = classify_at(None, today());
        assert_eq!(status.status, Status::Current);
        assert_eq!(status.days_until_due, 0);
        assert_eq!(status.message, NO_DUE_DATE_MESSAGE);
        assert_eq!(status.color, Color::Green);
    }

    #[test]
    fn test_past_dates_are_overdue() {
        for days in [-1, -2, -30, -365] {
            let status = classify_at(in_days(days), today());
            assert_eq!(status.status, Status::Overdue);
            assert!(status.days_until_due < 0);
            assert_eq!(status.color, Color::Red);
        }

        let status = classify_at(in_days(-5), today());
        assert_eq!(status.message, "Overdue by 5 days");
    }

    #[test]
    fn test_due_today_through_thirty_days_is_due_soon() {
        for days in 0..=30 {
            let status = classify_at(in_days(days), today());
            assert_eq!(status.status, Status::DueSoon, "day {}", days);
            assert_eq!(status.color, Color::Orange);
        }

        let status = classify_at(in_days(0), today());
        assert_eq!(status.message, "Due in 0 days");
    }

    #[test]
    fn test_thirty_one_through_sixty_days_is_upcoming() {
        for days in 31..=60 {
            let status = classify_at(in_days(days), today());
            assert_eq!(status.status, Status::Upcoming, "day {}", days);
            assert_eq!(status.color, Color::Blue);
        }
    }

    #[test]
    fn test_beyond_sixty_days_is_current() {
        for days in [61, 90, 400] {
            let status = classify_at(in_days(days), today());
            assert_eq!(status.status, Status::Current);
            assert_eq!(status.days_until_due, days);
            assert_ne!(status.message, NO_DUE_DATE_MESSAGE);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let a = classify_at(in_days(12), today());
        let b = classify_at(in_days(12), today());
        assert_eq!(a, b);
    }

    #[test]
    fn test_next_due_adds_calendar_months() {
        let last = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            next_due(last, 12).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_next_due_clamps_to_month_end() {
        let last = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            next_due(last, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_parse_due_date_discards_time() {
        assert_eq!(
            parse_due_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_due_date("2024-01-15T23:10:00+00:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_due_date("next tuesday").is_err());
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let status = classify_at(in_days(3), today());
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "due-soon");
        assert_eq!(json["daysUntilDue"], 3);
        assert_eq!(json["color"], "orange");
    }
}
