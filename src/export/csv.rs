use super::ExportError;
use crate::insights::FactorImpacts;
use crate::stats::format_mean;
use crate::weekly::WeeklyStats;
use rust_decimal::Decimal;
use std::path::Path;

fn optional_mean(value: Option<Decimal>) -> String {
    value.map_or_else(String::new, |v| format_mean(v, 1))
}

/// Export weekly statistics, one row per week; undefined means are left empty
pub fn export_weekly_summaries<P: AsRef<Path>>(
    summaries: &[WeeklyStats],
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_path(output_path)?;

    writer.write_record([
        "Week_Start",
        "Week_End",
        "Total_Miles",
        "Runs",
        "Rest_Days",
        "Avg_Pace",
        "Avg_HR",
        "Avg_RPE",
        "Avg_RHR",
        "Avg_HRV",
        "Avg_Sleep",
        "Avg_Stress",
    ])?;

    for week in summaries {
        writer.write_record([
            week.window.monday.format("%Y-%m-%d").to_string(),
            week.window.sunday.format("%Y-%m-%d").to_string(),
            week.total_miles.normalize().to_string(),
            week.num_runs.to_string(),
            week.rest_days.to_string(),
            week.avg_pace.map_or_else(String::new, |p| p.to_string()),
            optional_mean(week.avg_hr),
            optional_mean(week.avg_rpe),
            optional_mean(week.avg_rhr),
            optional_mean(week.avg_hrv),
            optional_mean(week.avg_sleep),
            optional_mean(week.avg_stress),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Export factor impacts, one row per factor/metric pair
pub fn export_factor_impacts<P: AsRef<Path>>(
    factors: &[FactorImpacts],
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_path(output_path)?;

    writer.write_record([
        "Factor",
        "Metric",
        "Direction",
        "Strength",
        "Avg_With",
        "Avg_Without",
    ])?;

    for factor in factors {
        for impact in &factor.impacts {
            writer.write_record([
                factor.factor.label().to_string(),
                impact.metric.label().to_string(),
                impact.result.direction.to_string(),
                impact
                    .result
                    .strength
                    .map_or_else(String::new, |s| s.to_string()),
                format_mean(impact.result.avg_with, 1),
                format_mean(impact.result.avg_without, 1),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
