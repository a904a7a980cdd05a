use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn parse(query: &ReportQuery) -> Result<Self, ApiError> {
        let (start, end) = match (query.start_date.as_deref(), query.end_date.as_deref()) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ApiError::validation("start_date and end_date are required")),
        };

        let start = parse_report_date(start)?;
        let end = parse_report_date(end)?;

        if start > end {
            return Err(ApiError::validation("start_date must not be after end_date"));
        }

        Ok(Self { start, end })
    }

    /// Lower bound (inclusive) and upper bound (exclusive) in timestamp terms
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        let from = self.start.and_time(NaiveTime::MIN);
        let to = self
            .end
            .succ_opt()
            .map(|next| next.and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX);
        (from, to)
    }
}

fn parse_report_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), REPORT_DATE_FORMAT)
        .map_err(|_| ApiError::validation("Invalid date format, expected YYYY-MM-DD"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutReport {
    pub total_workouts: i64,
    pub completed_workouts: i64,
    pub completion_percentage: f64,
}

impl WorkoutReport {
    pub fn from_counts(total_workouts: i64, completed_workouts: i64) -> Self {
        let completion_percentage = if total_workouts == 0 {
            0.0
        } else {
            completed_workouts as f64 / total_workouts as f64 * 100.0
        };

        Self {
            total_workouts,
            completed_workouts,
            completion_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn query(start: Option<&str>, end: Option<&str>) -> ReportQuery {
        ReportQuery {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_report_has_zero_percentage() {
        let report = WorkoutReport::from_counts(0, 0);
        assert_eq!(report.completion_percentage, 0.0);
    }

    #[test]
    fn test_three_of_four_is_seventy_five_percent() {
        let report = WorkoutReport::from_counts(4, 3);
        assert_eq!(report.total_workouts, 4);
        assert_eq!(report.completed_workouts, 3);
        assert_eq!(report.completion_percentage, 75.0);
    }

    proptest! {
        #[test]
        fn percentage_stays_within_bounds(total in 0i64..10_000, done_ratio in 0.0f64..=1.0) {
            let done = (total as f64 * done_ratio).floor() as i64;
            let report = WorkoutReport::from_counts(total, done);
            prop_assert!(report.completion_percentage >= 0.0);
            prop_assert!(report.completion_percentage <= 100.0);
        }
    }

    #[test]
    fn test_range_is_inclusive_of_both_days() {
        let range = DateRange::parse(&query(Some("2024-03-01"), Some("2024-03-31"))).unwrap();
        let (from, to) = range.bounds();
        let contains = |at: NaiveDateTime| at >= from && at < to;

        let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap().and_hms_opt(23, 59, 59).unwrap();
        let after = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let before = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(23, 59, 59).unwrap();

        assert!(contains(first));
        assert!(contains(last));
        assert!(!contains(after));
        assert!(!contains(before));
    }

    #[test]
    fn test_range_validation() {
        assert_matches!(
            DateRange::parse(&query(Some("2024-03-01"), None)),
            Err(ApiError::Validation(msg)) if msg == "start_date and end_date are required"
        );
        assert_matches!(
            DateRange::parse(&query(Some("03/01/2024"), Some("2024-03-31"))),
            Err(ApiError::Validation(_))
        );
        assert_matches!(
            DateRange::parse(&query(Some("2024-04-01"), Some("2024-03-01"))),
            Err(ApiError::Validation(_))
        );
    }
}
