use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use trainlog::config::{AppConfig, CONFIG_KEYS};
use trainlog::error::ErrorSeverity;
use trainlog::export::{export_report, ExportFormat, ExportType};
use trainlog::insights::{BandComparison, InsightsReport};
use trainlog::logging::{init_logging, LogLevel};
use trainlog::stats::format_mean;
use trainlog::store::{entry_at, sorted_by_date_desc};
use trainlog::{
    aggregate, analyze_insights, available_weeks, dashboard_summary, parse_date, select_week,
    Entry, EntryStore, EntryType, JsonFileStore, Pace, ParseError, TrainLogError,
};

/// TrainLog - Personal Training Journal
///
/// Log daily training and lifestyle entries, review weekly summaries and see
/// how alcohol, sleep, caffeine and other factors line up with effort,
/// resting heart rate and HRV.
#[derive(Parser)]
#[command(name = "trainlog")]
#[command(version)]
#[command(about = "Personal training journal", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Entry file to use instead of the configured one
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a new entry
    Add {
        /// Date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Time of day label (morning, evening, ...)
        #[arg(long)]
        time_of_day: Option<String>,

        /// Entry type (workout, easy, rest)
        #[arg(short = 't', long = "type", default_value = "easy")]
        entry_type: EntryType,

        /// Distance in miles
        #[arg(short, long)]
        miles: Option<Decimal>,

        /// Pace per mile (M:SS)
        #[arg(short, long)]
        pace: Option<String>,

        /// Finish time (H:MM:SS), used to compute pace when --pace is absent
        #[arg(long)]
        time: Option<String>,

        /// Average heart rate during the run
        #[arg(long)]
        hr: Option<u16>,

        /// Resting heart rate
        #[arg(long)]
        rhr: Option<u16>,

        /// Heart rate variability
        #[arg(long)]
        hrv: Option<u16>,

        /// Rate of perceived exertion (1-10)
        #[arg(long)]
        rpe: Option<u8>,

        /// Sleep quality (1-10)
        #[arg(long)]
        sleep: Option<u8>,

        /// Stress (1-10)
        #[arg(long)]
        stress: Option<u8>,

        /// Cups of caffeine
        #[arg(long)]
        caffeine: Option<u16>,

        #[arg(long)]
        alcohol: Option<bool>,

        #[arg(long)]
        nicotine: Option<bool>,

        #[arg(long)]
        travel: Option<bool>,

        #[arg(long)]
        stretch: Option<bool>,

        #[arg(long)]
        music: Option<bool>,
    },

    /// List entries, newest first
    History {
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one entry by its position in the history list
    Show {
        /// Zero-based index, newest first
        index: usize,
    },

    /// Weekly summary
    Weekly {
        /// Week to show, 0 = most recent week with entries
        #[arg(short, long, default_value = "0")]
        week: usize,
    },

    /// Lifestyle factor insights
    Insights,

    /// Goal, this week's numbers and the headline insight
    Dashboard,

    /// Pace calculator
    Pace {
        /// Distance in miles
        #[arg(short, long)]
        miles: Decimal,

        /// Finish time (H:MM:SS)
        #[arg(short, long)]
        time: String,
    },

    /// Export weekly summaries or insights
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json)
        #[arg(short = 'f', long, default_value = "csv")]
        format: String,

        /// What to export (weekly, insights)
        #[arg(short, long, default_value = "weekly")]
        what: String,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

/// Log a library error at its severity and turn it into the user-facing message
fn friendly(err: impl Into<TrainLogError>) -> anyhow::Error {
    let err = err.into();
    match err.severity() {
        ErrorSeverity::Critical => tracing::error!(error = %err, "Stored data unusable"),
        ErrorSeverity::Error => tracing::error!(error = %err, "Operation failed"),
        ErrorSeverity::Warning => tracing::warn!(error = %err, "Input rejected"),
    }
    anyhow::anyhow!(err.user_message())
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

fn mean_or_dash(value: Option<Decimal>, places: u32) -> String {
    value.map_or_else(|| "—".to_string(), |v| format_mean(v, places))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    entry_type: String,
    #[tabled(rename = "Miles")]
    miles: String,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "RPE")]
    rpe: String,
    #[tabled(rename = "RHR")]
    rhr: String,
    #[tabled(rename = "HRV")]
    hrv: String,
    #[tabled(rename = "Sleep")]
    sleep: String,
}

impl HistoryRow {
    fn new(index: usize, entry: &Entry) -> Self {
        HistoryRow {
            index,
            date: entry.date.format("%Y-%m-%d").to_string(),
            entry_type: entry.entry_type.to_string(),
            miles: entry.miles.normalize().to_string(),
            pace: or_dash(entry.pace),
            rpe: or_dash(entry.rpe),
            rhr: or_dash(entry.rhr),
            hrv: or_dash(entry.hrv),
            sleep: or_dash(entry.sleep_quality),
        }
    }
}

fn print_entry(index: usize, entry: &Entry) {
    let flag = |value: Option<bool>| match value {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => "—".to_string(),
    };

    println!("{}", format!("Entry #{}", index).bold());
    println!("  Date:          {}", entry.date.format("%Y-%m-%d"));
    if let Some(time_of_day) = &entry.time_of_day {
        println!("  Time of day:   {}", time_of_day);
    }
    println!("  Type:          {}", entry.entry_type);
    if !entry.is_rest() {
        println!("  Distance:      {} miles", entry.miles.normalize());
        println!("  Pace:          {}", or_dash(entry.pace.map(|p| format!("{}/mile", p))));
        println!("  Heart rate:    {}", or_dash(entry.hr));
    }
    println!("  Resting HR:    {}", or_dash(entry.rhr));
    println!("  HRV:           {}", or_dash(entry.hrv));
    println!("  RPE:           {}", or_dash(entry.rpe));
    println!("  Sleep quality: {}", or_dash(entry.sleep_quality));
    println!("  Stress:        {}", or_dash(entry.stress));
    println!("  Caffeine:      {}", or_dash(entry.caffeine));
    println!("  Alcohol:       {}", flag(entry.alcohol));
    println!("  Nicotine:      {}", flag(entry.nicotine));
    println!("  Travel:        {}", flag(entry.travel));
    println!("  Stretched:     {}", flag(entry.stretch));
    println!("  Music:         {}", flag(entry.music));
    if let Some(created_at) = entry.created_at {
        println!("  Logged at:     {}", created_at.format("%Y-%m-%d %H:%M"));
    }
}

/// Wording for one two-band comparison
struct BandText<'a> {
    title: &'a str,
    subject: &'a str,
    condition: &'a str,
    nothing_found: &'a str,
}

fn print_band(text: &BandText, comparison: &BandComparison, places: u32) {
    println!("{}", text.title.bold());
    match comparison {
        BandComparison::InsufficientData => {
            println!("  Not enough varied {} data yet", text.subject);
        }
        BandComparison::Findings(findings) if findings.is_empty() => {
            println!("  {}", text.nothing_found);
        }
        BandComparison::Findings(findings) => {
            for finding in findings {
                println!(
                    "  {}: {} with {} ({} vs {})",
                    finding.metric,
                    finding.change,
                    text.condition,
                    format_mean(finding.affected_avg, places),
                    format_mean(finding.baseline_avg, places)
                );
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)?;

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(cli.verbose, log_config.level);
    init_logging(&log_config).context("Failed to initialize logging")?;

    let data_file = cli.data.clone().unwrap_or_else(|| config.settings.data_file.clone());
    let store = JsonFileStore::new(&data_file);
    let detail = config.display.detail_precision;
    let summary = config.display.summary_precision;

    match cli.command {
        Commands::Add {
            date,
            time_of_day,
            entry_type,
            miles,
            pace,
            time,
            hr,
            rhr,
            hrv,
            rpe,
            sleep,
            stress,
            caffeine,
            alcohol,
            nicotine,
            travel,
            stretch,
            music,
        } => {
            let date = match date {
                Some(raw) => parse_date(&raw).map_err(friendly)?,
                None => today(),
            };
            let miles = miles.unwrap_or(Decimal::ZERO);

            let pace = match (pace, time) {
                (Some(raw), _) => Some(raw.parse::<Pace>().map_err(friendly)?),
                (None, Some(raw)) => match Pace::for_run(miles, &raw) {
                    Ok(pace) => Some(pace),
                    Err(ParseError::InvalidRun { reason }) => {
                        println!("{}", format!("⚠ No pace recorded: {}", reason).yellow());
                        None
                    }
                    Err(err) => return Err(friendly(err)),
                },
                (None, None) => None,
            };

            let entry = Entry {
                time_of_day,
                miles,
                pace,
                hr,
                rhr,
                hrv,
                rpe,
                sleep_quality: sleep,
                stress,
                caffeine,
                alcohol,
                nicotine,
                travel,
                stretch,
                music,
                created_at: Some(Local::now().naive_local()),
                ..Entry::new(date, entry_type)
            };

            store.append(entry).map_err(friendly)?;
            println!("{}", "✓ Entry saved".green().bold());
            if let Some(pace) = pace.filter(|_| entry_type.is_run()) {
                println!("  Pace: {}/mile", pace);
            }
        }

        Commands::History { limit } => {
            let entries = store.load().map_err(friendly)?;
            if entries.is_empty() {
                println!("No entries logged yet.");
                return Ok(());
            }

            let rows: Vec<HistoryRow> = sorted_by_date_desc(&entries)
                .into_iter()
                .enumerate()
                .take(limit.unwrap_or(usize::MAX))
                .map(|(index, entry)| HistoryRow::new(index, entry))
                .collect();

            println!("{}", "HISTORY".cyan().bold());
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Show { index } => {
            let entries = store.load().map_err(friendly)?;
            match entry_at(&entries, index) {
                Some(entry) => print_entry(index, entry),
                None => println!("No entry at index {} ({} entries logged).", index, entries.len()),
            }
        }

        Commands::Weekly { week } => {
            let entries = store.load().map_err(friendly)?;
            let weeks = available_weeks(&entries);
            let Some(window) = select_week(&weeks, week) else {
                println!("No entries logged yet.");
                return Ok(());
            };
            let selected = if week < weeks.len() { week } else { 0 };

            println!("{}", "WEEKS".cyan().bold());
            for (i, w) in weeks.iter().enumerate() {
                let marker = if i == selected { "▶" } else { " " };
                println!("{} {:>2}  {}", marker, i, w);
            }
            println!();

            let stats = aggregate(&entries, window);
            println!("{}", format!("WEEK OF {}", stats.window).cyan().bold());
            println!("  Total miles:  {}", stats.total_miles.normalize());
            println!("  Runs:         {}", stats.num_runs);
            println!("  Rest days:    {}", stats.rest_days);
            println!("  Avg pace:     {}", or_dash(stats.avg_pace.map(|p| format!("{}/mile", p))));
            println!("  Avg HR:       {}", mean_or_dash(stats.avg_hr, detail));
            println!("  Avg RPE:      {}", mean_or_dash(stats.avg_rpe, detail));
            println!("  Avg RHR:      {}", mean_or_dash(stats.avg_rhr, detail));
            println!("  Avg HRV:      {}", mean_or_dash(stats.avg_hrv, detail));
            println!("  Avg sleep:    {}", mean_or_dash(stats.avg_sleep, detail));
            println!("  Avg stress:   {}", mean_or_dash(stats.avg_stress, detail));
        }

        Commands::Insights => {
            let entries = store.load().map_err(friendly)?;
            match analyze_insights(&entries) {
                InsightsReport::InsufficientData { needed } => {
                    println!(
                        "{}",
                        format!("Log {} more entries to unlock insights.", needed).yellow()
                    );
                }
                InsightsReport::Ready(insights) => {
                    println!("{}", "LIFESTYLE FACTORS".cyan().bold());
                    if insights.factors.is_empty() {
                        println!("  Not enough data for any factor yet");
                    }
                    for factor in &insights.factors {
                        println!("{}", factor.factor.label().bold());
                        for impact in &factor.impacts {
                            let result = &impact.result;
                            let text = match result.strength {
                                Some(strength) => format!(
                                    "{} {} ({} vs {})",
                                    strength,
                                    result.direction,
                                    format_mean(result.avg_with, detail),
                                    format_mean(result.avg_without, detail)
                                ),
                                None => "no significant impact".to_string(),
                            };
                            println!("  {}: {}", impact.metric, text);
                        }
                    }
                    println!();
                    let sleep = BandText {
                        title: "SLEEP",
                        subject: "sleep",
                        condition: "poor sleep",
                        nothing_found: "No significant correlations found",
                    };
                    let caffeine = BandText {
                        title: "CAFFEINE",
                        subject: "caffeine",
                        condition: "caffeine",
                        nothing_found: "No significant impact detected",
                    };
                    print_band(&sleep, &insights.sleep, detail);
                    println!();
                    print_band(&caffeine, &insights.caffeine, detail);
                }
            }
        }

        Commands::Dashboard => {
            let entries = store.load().map_err(friendly)?;
            let dashboard = dashboard_summary(&entries, today());

            println!("{}", "============================".bold());
            println!("{}", "  TRAINING JOURNAL".bold());
            println!("  Goal: {}", config.settings.goal);
            println!("{}", "============================".bold());
            println!("  Entries logged:  {}", dashboard.entry_count);
            println!("  This week:       {} miles", dashboard.week_miles.normalize());
            println!("  Avg RHR:         {}", mean_or_dash(dashboard.avg_rhr, summary));
            if let Some(headline) = dashboard.headline {
                println!();
                println!("  {}", headline.green());
            }
        }

        Commands::Pace { miles, time } => {
            let pace = Pace::for_run(miles, &time).map_err(friendly)?;
            println!("Pace: {}/mile", pace);
        }

        Commands::Export { output, format, what } => {
            let format: ExportFormat = format.parse().map_err(friendly)?;
            let export_type: ExportType = what.parse().map_err(friendly)?;
            let entries = store.load().map_err(friendly)?;

            export_report(&entries, export_type, format, &output).map_err(friendly)?;
            println!("{}", format!("✓ Exported to {}", output.display()).green());
        }

        Commands::Config { list, set, get } => {
            if list {
                for key in CONFIG_KEYS {
                    println!("{} = {}", key, config.get(key)?);
                }
                println!("config file = {}", config_path.display());
            } else if let Some(key_value) = set {
                let (key, value) = key_value
                    .split_once('=')
                    .context("Expected KEY=VALUE")?;
                config.set(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                println!("{}", format!("✓ {} updated", key.trim()).green());
            } else if let Some(key) = get {
                println!("{}", config.get(&key)?);
            } else {
                println!("Nothing to do. Use --list, --get KEY or --set KEY=VALUE.");
            }
        }
    }

    Ok(())
}
