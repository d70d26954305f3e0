//! Export of derived reports to files

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::insights::{analyze_insights, InsightsReport};
use crate::models::Entry;
use crate::weekly::weekly_summaries;

pub mod csv;
pub mod json;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportType {
    /// One row per week with entries
    WeeklySummaries,
    /// Factor impacts plus sleep and caffeine banding
    Insights,
}

impl FromStr for ExportType {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" | "weeks" => Ok(ExportType::WeeklySummaries),
            "insights" => Ok(ExportType::Insights),
            _ => Err(ExportError::UnsupportedType(s.to_string())),
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Unsupported export type: {0}")]
    UnsupportedType(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

/// Compute the requested report from `entries` and write it to `output_path`
pub fn export_report<P: AsRef<Path>>(
    entries: &[Entry],
    export_type: ExportType,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    match export_type {
        ExportType::WeeklySummaries => {
            let summaries = weekly_summaries(entries);
            match format {
                ExportFormat::Csv => csv::export_weekly_summaries(&summaries, output_path)?,
                ExportFormat::Json => json::export_json(&summaries, output_path)?,
            }
        }
        ExportType::Insights => {
            let report = analyze_insights(entries);
            match (format, &report) {
                (ExportFormat::Json, _) => json::export_json(&report, output_path)?,
                (ExportFormat::Csv, InsightsReport::Ready(insights)) => {
                    csv::export_factor_impacts(&insights.factors, output_path)?
                }
                (ExportFormat::Csv, InsightsReport::InsufficientData { needed }) => {
                    return Err(ExportError::InsufficientData(format!(
                        "{} more entries needed for insights",
                        needed
                    )));
                }
            }
        }
    }

    tracing::info!(?export_type, ?format, entries = entries.len(), "Export completed");
    Ok(())
}
