//! Derived insights
//!
//! Builds on [`impact`] and the same dead-zone constant to produce the
//! insights report (factor impacts, sleep banding, caffeine banding), the
//! single dashboard headline, and the dashboard summary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::impact::{impact, ImpactResult};
use crate::models::{Entry, Factor, Metric};
use crate::stats::{format_mean, mean, MIN_GROUP_SIZE, SIGNIFICANCE_THRESHOLD};
use crate::week::WeekWindow;

/// Entries needed before the insights report is built
pub const MIN_INSIGHT_ENTRIES: usize = 5;

/// Entries needed before a headline is picked
pub const MIN_HEADLINE_ENTRIES: usize = 3;

/// Sleep quality at or above this is good sleep
pub const GOOD_SLEEP_MIN: u8 = 7;

/// Sleep quality at or below this is poor sleep
pub const POOR_SLEEP_MAX: u8 = 4;

/// Shown when no headline rule produced a sentence
pub const HEADLINE_FALLBACK: &str = "Add more entries to see insights";

/// Which way a metric moves in the affected band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
    Higher,
    Lower,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Higher => write!(f, "higher"),
            Change::Lower => write!(f, "lower"),
        }
    }
}

/// A metric whose mean differs between two bands by more than the dead zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandDifference {
    pub metric: Metric,

    /// Direction of `affected_avg` relative to `baseline_avg`
    pub change: Change,

    /// Mean in the band under study (poor sleep, with caffeine)
    pub affected_avg: Decimal,

    /// Mean in the comparison band (good sleep, no caffeine)
    pub baseline_avg: Decimal,
}

/// Result of a two-band comparison over several metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "findings", rename_all = "snake_case")]
pub enum BandComparison {
    /// A band held fewer than two entries
    InsufficientData,

    /// Metrics that differ; empty when nothing cleared the dead zone
    Findings(Vec<BandDifference>),
}

impl BandComparison {
    pub fn findings(&self) -> &[BandDifference] {
        match self {
            BandComparison::InsufficientData => &[],
            BandComparison::Findings(findings) => findings,
        }
    }
}

fn compare_bands(affected: &[&Entry], baseline: &[&Entry], metrics: &[Metric]) -> BandComparison {
    if affected.len() < MIN_GROUP_SIZE || baseline.len() < MIN_GROUP_SIZE {
        return BandComparison::InsufficientData;
    }

    let findings = metrics
        .iter()
        .filter_map(|&metric| {
            let affected_avg = mean(affected.iter().filter_map(|e| e.metric(metric)))?;
            let baseline_avg = mean(baseline.iter().filter_map(|e| e.metric(metric)))?;
            let diff = affected_avg - baseline_avg;

            if diff.abs() <= SIGNIFICANCE_THRESHOLD {
                return None;
            }

            Some(BandDifference {
                metric,
                change: if diff > Decimal::ZERO { Change::Higher } else { Change::Lower },
                affected_avg,
                baseline_avg,
            })
        })
        .collect();

    BandComparison::Findings(findings)
}

fn is_good_sleep(entry: &Entry) -> bool {
    entry.sleep_quality.is_some_and(|q| q >= GOOD_SLEEP_MIN)
}

fn is_poor_sleep(entry: &Entry) -> bool {
    entry.sleep_quality.is_some_and(|q| q <= POOR_SLEEP_MAX)
}

/// How RPE, RHR and HRV differ after poor sleep compared with good sleep
pub fn sleep_impact(entries: &[Entry]) -> BandComparison {
    let good: Vec<&Entry> = entries.iter().filter(|e| is_good_sleep(e)).collect();
    let poor: Vec<&Entry> = entries.iter().filter(|e| is_poor_sleep(e)).collect();

    tracing::debug!(good = good.len(), poor = poor.len(), "Sleep bands");

    compare_bands(&poor, &good, &Metric::ALL)
}

/// How RPE and RHR differ on caffeine days compared with caffeine-free days
pub fn caffeine_impact(entries: &[Entry]) -> BandComparison {
    let (with, without): (Vec<&Entry>, Vec<&Entry>) = entries
        .iter()
        .partition(|e| e.caffeine.is_some_and(|cups| cups > 0));

    tracing::debug!(with = with.len(), without = without.len(), "Caffeine bands");

    compare_bands(&with, &without, &[Metric::Rpe, Metric::Rhr])
}

/// Defined impact of one factor on one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricImpact {
    pub metric: Metric,
    pub result: ImpactResult,
}

/// All defined impacts of one factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorImpacts {
    pub factor: Factor,
    pub impacts: Vec<MetricImpact>,
}

/// Impacts of every factor on every metric, skipping undefined comparisons
pub fn factor_impacts(entries: &[Entry]) -> Vec<FactorImpacts> {
    Factor::ALL
        .iter()
        .filter_map(|&factor| {
            let impacts: Vec<MetricImpact> = Metric::ALL
                .iter()
                .filter_map(|&metric| {
                    impact(entries, factor, metric, metric.higher_is_worse())
                        .map(|result| MetricImpact { metric, result })
                })
                .collect();

            if impacts.is_empty() {
                None
            } else {
                Some(FactorImpacts { factor, impacts })
            }
        })
        .collect()
}

/// Full insights for a sufficiently large entry set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub factors: Vec<FactorImpacts>,
    pub sleep: BandComparison,
    pub caffeine: BandComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsightsReport {
    /// Too few entries; `needed` more are required
    InsufficientData { needed: usize },
    Ready(Insights),
}

/// Build the insights report
pub fn analyze_insights(entries: &[Entry]) -> InsightsReport {
    if entries.len() < MIN_INSIGHT_ENTRIES {
        return InsightsReport::InsufficientData {
            needed: MIN_INSIGHT_ENTRIES - entries.len(),
        };
    }

    let insights = Insights {
        factors: factor_impacts(entries),
        sleep: sleep_impact(entries),
        caffeine: caffeine_impact(entries),
    };

    tracing::info!(
        entries = entries.len(),
        factors = insights.factors.len(),
        sleep_findings = insights.sleep.findings().len(),
        caffeine_findings = insights.caffeine.findings().len(),
        "Insights report built"
    );

    InsightsReport::Ready(insights)
}

fn mean_rpe<'a, I>(entries: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Entry>,
{
    mean(entries.into_iter().filter_map(|e| e.metric(Metric::Rpe)))
}

fn alcohol_headline(entries: &[Entry]) -> Option<String> {
    let drank = mean_rpe(entries.iter().filter(|e| e.alcohol == Some(true)))?;
    let sober = mean_rpe(entries.iter().filter(|e| e.alcohol == Some(false)))?;
    let diff = drank - sober;

    if diff > SIGNIFICANCE_THRESHOLD {
        Some(format!("RPE is {} points higher after alcohol", format_mean(diff, 1)))
    } else if diff < -SIGNIFICANCE_THRESHOLD {
        Some(format!("RPE is {} points lower after alcohol", format_mean(diff.abs(), 1)))
    } else {
        None
    }
}

fn sleep_headline(entries: &[Entry]) -> Option<String> {
    let good = mean_rpe(entries.iter().filter(|e| is_good_sleep(e)))?;
    let poor = mean_rpe(entries.iter().filter(|e| is_poor_sleep(e)))?;
    let diff = poor - good;

    (diff > SIGNIFICANCE_THRESHOLD)
        .then(|| format!("Poor sleep increases RPE by {} points", format_mean(diff, 1)))
}

/// One-sentence headline for the dashboard.
///
/// Tries alcohol against RPE, then sleep against RPE, then falls back to a
/// prompt for more data. Returns `None` below [`MIN_HEADLINE_ENTRIES`].
pub fn headline_insight(entries: &[Entry]) -> Option<String> {
    if entries.len() < MIN_HEADLINE_ENTRIES {
        return None;
    }

    let headline = alcohol_headline(entries)
        .or_else(|| sleep_headline(entries))
        .unwrap_or_else(|| HEADLINE_FALLBACK.to_string());

    Some(headline)
}

/// Home view numbers for the week containing `today`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub entry_count: usize,
    pub week: WeekWindow,
    pub week_miles: Decimal,

    /// Unrounded mean resting heart rate this week
    pub avg_rhr: Option<Decimal>,

    pub headline: Option<String>,
}

pub fn dashboard_summary(entries: &[Entry], today: NaiveDate) -> DashboardSummary {
    let week = WeekWindow::containing(today);
    let this_week: Vec<&Entry> = entries.iter().filter(|e| week.contains(e.date)).collect();

    DashboardSummary {
        entry_count: entries.len(),
        week,
        week_miles: this_week.iter().map(|e| e.miles).sum(),
        avg_rhr: mean(this_week.iter().filter_map(|e| e.metric(Metric::Rhr))),
        headline: headline_insight(entries),
    }
}
