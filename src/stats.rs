//! Shared numeric helpers and analysis constants

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Mean differences at or below this magnitude are reported as no impact.
///
/// Applied in absolute units to every metric, whatever its natural scale.
pub const SIGNIFICANCE_THRESHOLD: Decimal = dec!(0.5);

/// Magnitude above which a difference is `moderate`
pub const MODERATE_THRESHOLD: Decimal = dec!(1);

/// Magnitude above which a difference is `strong`
pub const STRONG_THRESHOLD: Decimal = dec!(2);

/// Smallest group that may take part in a two-group comparison
pub const MIN_GROUP_SIZE: usize = 2;

/// Arithmetic mean, `None` for an empty input
pub fn mean<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    let (sum, count) = values
        .into_iter()
        .fold((Decimal::ZERO, 0u32), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / Decimal::from(count))
    }
}

/// Round an unrounded mean for display
pub fn display_mean(value: Decimal, places: u32) -> Decimal {
    value.round_dp(places)
}

/// Format a mean with a fixed number of decimal places
pub fn format_mean(value: Decimal, places: u32) -> String {
    format!("{:.*}", places as usize, display_mean(value, places))
}
