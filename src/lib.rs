// Library interface for TrainLog modules
// The analytics functions are pure over a `&[Entry]` snapshot; the binary and
// integration tests drive them through the store.

pub mod config;
pub mod error;
pub mod export;
pub mod impact;
pub mod insights;
pub mod logging;
pub mod models;
pub mod stats;
pub mod store;
pub mod week;
pub mod weekly;

// Re-export commonly used types for convenience
pub use models::*;
pub use error::{ParseError, Result, StoreError, TrainLogError};
pub use impact::{impact, ImpactDirection, ImpactResult, ImpactStrength};
pub use insights::{
    analyze_insights, caffeine_impact, dashboard_summary, headline_insight, sleep_impact,
    BandComparison, BandDifference, InsightsReport,
};
pub use store::{EntryStore, JsonFileStore, MemoryStore};
pub use week::{available_weeks, select_week, week_bounds, WeekWindow};
pub use weekly::{aggregate, weekly_summaries, WeeklyStats};
pub use logging::{LogConfig, LogFormat, LogLevel};
