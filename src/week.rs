//! Monday-Sunday week windows
//!
//! Entries are bucketed by the calendar week that contains their date. The
//! week list offered for selection only contains weeks that have at least one
//! entry, newest first.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ParseError;
use crate::models::{parse_date, Entry};

/// Monday-Sunday span of one calendar week
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
}

impl WeekWindow {
    /// Week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday();
        let monday = date - Duration::days(i64::from(offset));
        WeekWindow {
            monday,
            sunday: monday + Duration::days(6),
        }
    }

    /// Inclusive on both ends
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.monday <= date && date <= self.sunday
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.monday.format("%Y-%m-%d"),
            self.sunday.format("%Y-%m-%d")
        )
    }
}

/// Week bounds for a `YYYY-MM-DD` date string
pub fn week_bounds(date: &str) -> Result<WeekWindow, ParseError> {
    parse_date(date).map(WeekWindow::containing)
}

/// Distinct weeks that contain at least one entry, most recent first
pub fn available_weeks(entries: &[Entry]) -> Vec<WeekWindow> {
    let weeks: BTreeSet<WeekWindow> = entries
        .iter()
        .map(|entry| WeekWindow::containing(entry.date))
        .collect();

    tracing::debug!(entries = entries.len(), weeks = weeks.len(), "Enumerated weeks");

    weeks.into_iter().rev().collect()
}

/// Week at `index` in the newest-first list; an out-of-range index falls back to the latest week.
///
/// Returns `None` only when there are no weeks at all.
pub fn select_week(weeks: &[WeekWindow], index: usize) -> Option<WeekWindow> {
    weeks.get(index).or_else(|| weeks.first()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use chrono::Weekday;
    use proptest::prelude::*;

    fn entry(date: &str) -> Entry {
        Entry::new(parse_date(date).unwrap(), EntryType::Easy)
    }

    #[test]
    fn test_week_bounds() {
        // 2024-01-03 is a Wednesday
        let week = week_bounds("2024-01-03").unwrap();
        assert_eq!(week.monday, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(week.sunday, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());

        // Monday and Sunday map to their own week
        assert_eq!(week_bounds("2024-01-01").unwrap(), week);
        assert_eq!(week_bounds("2024-01-07").unwrap(), week);
    }

    #[test]
    fn test_week_bounds_crosses_year_boundary() {
        let week = week_bounds("2025-01-01").unwrap();
        assert_eq!(week.monday, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_eq!(week.sunday, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
    }

    #[test]
    fn test_week_bounds_rejects_malformed_date() {
        assert!(matches!(
            week_bounds("03/01/2024"),
            Err(ParseError::InvalidDate { .. })
        ));
        assert!(week_bounds("2024-02-31").is_err());
    }

    #[test]
    fn test_available_weeks_are_distinct_and_descending() {
        let entries = vec![
            entry("2024-01-02"),
            entry("2024-01-16"),
            entry("2024-01-03"),
            entry("2024-01-15"),
            entry("2023-12-31"),
        ];

        let weeks = available_weeks(&entries);
        let mondays: Vec<String> = weeks
            .iter()
            .map(|w| w.monday.format("%Y-%m-%d").to_string())
            .collect();

        assert_eq!(mondays, vec!["2024-01-15", "2024-01-01", "2023-12-25"]);
    }

    #[test]
    fn test_select_week_clamps_out_of_range_index() {
        let entries = vec![entry("2024-01-02"), entry("2024-01-16")];
        let weeks = available_weeks(&entries);

        assert_eq!(select_week(&weeks, 1), Some(weeks[1]));
        assert_eq!(select_week(&weeks, 7), Some(weeks[0]));
        assert_eq!(select_week(&[], 0), None);
    }

    proptest! {
        #[test]
        fn test_week_bounds_properties(days in 0i64..60_000) {
            let base = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap();
            let date = base + Duration::days(days);
            let week = week_bounds(&date.format("%Y-%m-%d").to_string()).unwrap();

            prop_assert_eq!(week.sunday, week.monday + Duration::days(6));
            prop_assert!(week.monday <= date && date <= week.sunday);
            prop_assert_eq!(week.monday.weekday(), Weekday::Mon);
            prop_assert!(week.contains(date));
        }
    }
}
