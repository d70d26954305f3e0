//! Lifestyle factor impact analysis
//!
//! Compares a metric between entries where a factor was explicitly present and
//! entries where it was explicitly absent. Entries where the factor or the
//! metric is unknown take no part. The result is a plain mean difference with
//! a direction and a coarse strength label; no significance testing is done.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Entry, Factor, Metric};
use crate::stats::{mean, MIN_GROUP_SIZE, MODERATE_THRESHOLD, SIGNIFICANCE_THRESHOLD, STRONG_THRESHOLD};

/// Whether the factor moves the metric in a good or bad direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactDirection {
    Positive,
    Negative,
    None,
}

impl ImpactDirection {
    /// Classify a mean difference (`with - without`).
    ///
    /// Differences of at most [`SIGNIFICANCE_THRESHOLD`] in magnitude are `None`.
    pub fn classify(diff: Decimal, higher_is_worse: bool) -> Self {
        let raised = if diff > SIGNIFICANCE_THRESHOLD {
            true
        } else if diff < -SIGNIFICANCE_THRESHOLD {
            false
        } else {
            return ImpactDirection::None;
        };

        if raised == higher_is_worse {
            ImpactDirection::Negative
        } else {
            ImpactDirection::Positive
        }
    }
}

impl fmt::Display for ImpactDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactDirection::Positive => write!(f, "positive"),
            ImpactDirection::Negative => write!(f, "negative"),
            ImpactDirection::None => write!(f, "none"),
        }
    }
}

/// Magnitude bucket of a significant difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStrength {
    Minor,
    Moderate,
    Strong,
}

impl ImpactStrength {
    pub fn from_magnitude(magnitude: Decimal) -> Self {
        if magnitude > STRONG_THRESHOLD {
            ImpactStrength::Strong
        } else if magnitude > MODERATE_THRESHOLD {
            ImpactStrength::Moderate
        } else {
            ImpactStrength::Minor
        }
    }
}

impl fmt::Display for ImpactStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactStrength::Minor => write!(f, "minor"),
            ImpactStrength::Moderate => write!(f, "moderate"),
            ImpactStrength::Strong => write!(f, "strong"),
        }
    }
}

/// Outcome of one factor-vs-metric comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub direction: ImpactDirection,

    /// `None` exactly when `direction` is `None`
    pub strength: Option<ImpactStrength>,

    /// Mean metric with the factor present (unrounded)
    pub avg_with: Decimal,

    /// Mean metric with the factor absent (unrounded)
    pub avg_without: Decimal,
}

impl ImpactResult {
    /// Build a result from the two group means
    pub fn from_means(avg_with: Decimal, avg_without: Decimal, higher_is_worse: bool) -> Self {
        let diff = avg_with - avg_without;
        let direction = ImpactDirection::classify(diff, higher_is_worse);
        let strength = match direction {
            ImpactDirection::None => None,
            _ => Some(ImpactStrength::from_magnitude(diff.abs())),
        };

        ImpactResult {
            direction,
            strength,
            avg_with,
            avg_without,
        }
    }

    pub fn diff(&self) -> Decimal {
        self.avg_with - self.avg_without
    }
}

/// Compare `metric` between entries with `factor` explicitly true and explicitly false.
///
/// Returns `None` when either group has fewer than [`MIN_GROUP_SIZE`] entries.
pub fn impact(
    entries: &[Entry],
    factor: Factor,
    metric: Metric,
    higher_is_worse: bool,
) -> Option<ImpactResult> {
    let group = |present: bool| -> Vec<Decimal> {
        entries
            .iter()
            .filter(|entry| entry.factor(factor) == Some(present))
            .filter_map(|entry| entry.metric(metric))
            .collect()
    };

    let with_factor = group(true);
    let without_factor = group(false);

    if with_factor.len() < MIN_GROUP_SIZE || without_factor.len() < MIN_GROUP_SIZE {
        tracing::debug!(
            factor = factor.key(),
            metric = metric.key(),
            with = with_factor.len(),
            without = without_factor.len(),
            "Insufficient data for impact"
        );
        return None;
    }

    let avg_with = mean(with_factor)?;
    let avg_without = mean(without_factor)?;
    let result = ImpactResult::from_means(avg_with, avg_without, higher_is_worse);

    tracing::debug!(
        factor = factor.key(),
        metric = metric.key(),
        direction = %result.direction,
        diff = %result.diff(),
        "Classified impact"
    );

    Some(result)
}
