//! Weekly aggregation
//!
//! Summarizes the entries of one [`WeekWindow`]. Averages are left unrounded
//! and are `None` when nothing in the relevant set recorded the field, which
//! keeps "no data" apart from "averaged to zero".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Entry, Pace};
use crate::stats::mean;
use crate::week::{available_weeks, WeekWindow};

/// Aggregate statistics for one calendar week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    /// Week the statistics cover
    pub window: WeekWindow,

    /// Sum of miles over all entries (rest days add zero)
    pub total_miles: Decimal,

    /// Number of non-rest entries
    pub num_runs: usize,

    /// Number of rest entries
    pub rest_days: usize,

    /// Resting heart rate, over all entries
    pub avg_rhr: Option<Decimal>,

    /// Heart rate variability, over all entries
    pub avg_hrv: Option<Decimal>,

    /// Run heart rate, over runs only
    pub avg_hr: Option<Decimal>,

    /// Perceived exertion, over runs only
    pub avg_rpe: Option<Decimal>,

    /// Sleep quality, over all entries
    pub avg_sleep: Option<Decimal>,

    /// Stress, over all entries
    pub avg_stress: Option<Decimal>,

    /// Mean pace of the runs that recorded one
    pub avg_pace: Option<Pace>,
}

impl WeeklyStats {
    /// True when no entry fell inside the window
    pub fn is_empty(&self) -> bool {
        self.num_runs == 0 && self.rest_days == 0
    }
}

/// Aggregate the entries falling inside `window`
pub fn aggregate(entries: &[Entry], window: WeekWindow) -> WeeklyStats {
    let week_entries: Vec<&Entry> = entries
        .iter()
        .filter(|entry| window.contains(entry.date))
        .collect();

    let (run_entries, rest_entries): (Vec<&Entry>, Vec<&Entry>) =
        week_entries.iter().copied().partition(|entry| !entry.is_rest());

    let total_miles: Decimal = week_entries.iter().map(|entry| entry.miles).sum();

    let avg_pace = Pace::average(run_entries.iter().filter_map(|entry| entry.pace.as_ref()));

    let stats = WeeklyStats {
        window,
        total_miles,
        num_runs: run_entries.len(),
        rest_days: rest_entries.len(),
        avg_rhr: mean(week_entries.iter().filter_map(|e| e.rhr.map(Decimal::from))),
        avg_hrv: mean(week_entries.iter().filter_map(|e| e.hrv.map(Decimal::from))),
        avg_hr: mean(run_entries.iter().filter_map(|e| e.hr.map(Decimal::from))),
        avg_rpe: mean(run_entries.iter().filter_map(|e| e.rpe.map(Decimal::from))),
        avg_sleep: mean(week_entries.iter().filter_map(|e| e.sleep_quality.map(Decimal::from))),
        avg_stress: mean(week_entries.iter().filter_map(|e| e.stress.map(Decimal::from))),
        avg_pace,
    };

    tracing::debug!(
        week = %window,
        entries = week_entries.len(),
        total_miles = %stats.total_miles,
        "Aggregated week"
    );

    stats
}

/// Statistics for every week that has entries, most recent first
pub fn weekly_summaries(entries: &[Entry]) -> Vec<WeeklyStats> {
    available_weeks(entries)
        .into_iter()
        .map(|window| aggregate(entries, window))
        .collect()
}
