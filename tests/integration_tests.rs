use rust_decimal_macros::dec;
use trainlog::{models, week, weekly, insights, impact, store};

/// Integration tests that exercise the full load -> analyze -> export path

#[cfg(test)]
mod integration_tests {
    use super::*;
    use tempfile::tempdir;
    use trainlog::export::{export_report, ExportFormat, ExportType};
    use trainlog::insights::{BandComparison, Change, InsightsReport, HEADLINE_FALLBACK};
    use trainlog::models::{Entry, EntryType, Factor, Metric};
    use trainlog::{EntryStore, ImpactDirection, ImpactStrength, JsonFileStore, MemoryStore};

    fn entry(date: &str, entry_type: EntryType) -> Entry {
        Entry::new(models::parse_date(date).unwrap(), entry_type)
    }

    fn run(date: &str, entry_type: EntryType, miles: rust_decimal::Decimal, pace: &str) -> Entry {
        let mut e = entry(date, entry_type);
        e.miles = miles;
        e.pace = Some(pace.parse().unwrap());
        e
    }

    /// Two training weeks with a mix of factors, sleep and caffeine
    fn create_training_log() -> Vec<Entry> {
        let mut monday = run("2024-03-18", EntryType::Workout, dec!(8), "6:50");
        monday.rpe = Some(7);
        monday.rhr = Some(50);
        monday.hrv = Some(60);
        monday.sleep_quality = Some(8);
        monday.alcohol = Some(false);
        monday.caffeine = Some(1);

        let mut tuesday = run("2024-03-19", EntryType::Easy, dec!(5), "8:00");
        tuesday.rpe = Some(4);
        tuesday.rhr = Some(48);
        tuesday.sleep_quality = Some(8);
        tuesday.alcohol = Some(false);
        tuesday.caffeine = Some(0);

        let mut wednesday = entry("2024-03-20", EntryType::Rest);
        wednesday.rhr = Some(47);
        wednesday.sleep_quality = Some(7);
        wednesday.alcohol = Some(true);

        let mut thursday = run("2024-03-21", EntryType::Easy, dec!(6), "7:50");
        thursday.rpe = Some(6);
        thursday.rhr = Some(53);
        thursday.sleep_quality = Some(3);
        thursday.alcohol = Some(true);
        thursday.caffeine = Some(2);

        let mut friday = run("2024-03-22", EntryType::Workout, dec!(10), "6:40");
        friday.rpe = Some(8);
        friday.rhr = Some(54);
        friday.sleep_quality = Some(4);
        friday.alcohol = Some(true);
        friday.caffeine = Some(2);

        let mut previous_week = run("2024-03-11", EntryType::Easy, dec!(4), "8:10");
        previous_week.rpe = Some(3);
        previous_week.rhr = Some(49);
        previous_week.sleep_quality = Some(9);
        previous_week.alcohol = Some(false);
        previous_week.caffeine = Some(0);

        vec![monday, tuesday, wednesday, thursday, friday, previous_week]
    }

    /// Alcohol raises RPE by exactly two points: moderate, not strong
    #[test]
    fn test_alcohol_rpe_impact() {
        let mut entries = Vec::new();
        for (date, rpe, alcohol) in [
            ("2024-01-01", 5, true),
            ("2024-01-02", 5, true),
            ("2024-01-03", 3, false),
            ("2024-01-04", 3, false),
        ] {
            let mut e = entry(date, EntryType::Easy);
            e.rpe = Some(rpe);
            e.alcohol = Some(alcohol);
            entries.push(e);
        }

        let result = impact::impact(&entries, Factor::Alcohol, Metric::Rpe, true).unwrap();
        assert_eq!(result.direction, ImpactDirection::Negative);
        assert_eq!(result.strength, Some(ImpactStrength::Moderate));
        assert_eq!(result.avg_with, dec!(5.0));
        assert_eq!(result.avg_without, dec!(3.0));

        // Four entries are enough for a headline but not for the report
        assert_eq!(
            insights::headline_insight(&entries).as_deref(),
            Some("RPE is 2.0 points higher after alcohol")
        );
        assert_eq!(
            insights::analyze_insights(&entries),
            InsightsReport::InsufficientData { needed: 1 }
        );
    }

    #[test]
    fn test_pace_averaging_across_week() {
        let entries = vec![
            run("2024-03-18", EntryType::Easy, dec!(5), "7:30"),
            run("2024-03-19", EntryType::Easy, dec!(5), "8:00"),
        ];

        let window = week::week_bounds("2024-03-20").unwrap();
        let stats = weekly::aggregate(&entries, window);
        assert_eq!(stats.avg_pace.unwrap().to_string(), "7:45");
        assert_eq!(stats.num_runs, 2);
        assert_eq!(stats.total_miles, dec!(10));
    }

    #[test]
    fn test_small_log_never_reports_direction() {
        let entries: Vec<Entry> = create_training_log().into_iter().take(4).collect();

        assert!(matches!(
            insights::analyze_insights(&entries),
            InsightsReport::InsufficientData { needed: 1 }
        ));
        assert_eq!(insights::analyze_insights(&[]), InsightsReport::InsufficientData { needed: 5 });
        assert_eq!(insights::headline_insight(&entries[..2]), None);
    }

    #[test]
    fn test_empty_week_has_undefined_averages() {
        let entries = create_training_log();
        let stats = weekly::aggregate(&entries, week::week_bounds("2023-01-04").unwrap());

        assert!(stats.is_empty());
        assert_eq!(stats.total_miles, dec!(0));
        assert_eq!(stats.num_runs, 0);
        assert_eq!(stats.rest_days, 0);
        assert_eq!(stats.avg_rhr, None);
        assert_eq!(stats.avg_hrv, None);
        assert_eq!(stats.avg_rpe, None);
        assert_eq!(stats.avg_pace, None);
    }

    #[test]
    fn test_week_selection_clamps_to_latest() {
        let entries = create_training_log();
        let weeks = week::available_weeks(&entries);

        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].to_string(), "2024-03-18 to 2024-03-24");
        assert_eq!(weeks[1].to_string(), "2024-03-11 to 2024-03-17");
        assert_eq!(week::select_week(&weeks, 1), Some(weeks[1]));
        assert_eq!(week::select_week(&weeks, 7), Some(weeks[0]));
        assert_eq!(week::select_week(&[], 0), None);
    }

    /// Append through the file store, reload, analyze and export
    #[test]
    fn test_complete_journal_workflow() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("training_data.json"));
        for e in create_training_log() {
            store.append(e).unwrap();
        }

        let entries = store.load().unwrap();
        assert_eq!(entries.len(), 6);

        // Weekly view
        let summaries = weekly::weekly_summaries(&entries);
        assert_eq!(summaries.len(), 2);
        let latest = &summaries[0];
        assert_eq!(latest.total_miles, dec!(29));
        assert_eq!(latest.num_runs, 4);
        assert_eq!(latest.rest_days, 1);
        assert_eq!(latest.avg_rhr, Some(dec!(50.4)));
        assert_eq!(latest.avg_pace.unwrap().to_string(), "7:20");

        // Insights
        let report = insights::analyze_insights(&entries);
        let InsightsReport::Ready(found) = &report else {
            panic!("expected a full report, got {:?}", report);
        };

        let alcohol = found
            .factors
            .iter()
            .find(|f| f.factor == Factor::Alcohol)
            .unwrap();
        let rpe = alcohol.impacts.iter().find(|i| i.metric == Metric::Rpe).unwrap();
        assert_eq!(rpe.result.direction, ImpactDirection::Negative);
        assert_eq!(rpe.result.strength, Some(ImpactStrength::Strong));
        assert_eq!(rpe.result.avg_with, dec!(7));

        let sleep_rpe = found
            .sleep
            .findings()
            .iter()
            .find(|d| d.metric == Metric::Rpe)
            .unwrap();
        assert_eq!(sleep_rpe.change, Change::Higher);
        assert_eq!(sleep_rpe.affected_avg, dec!(7));

        let BandComparison::Findings(caffeine) = &found.caffeine else {
            panic!("caffeine bands should both hold three entries");
        };
        assert_eq!(caffeine[0].metric, Metric::Rpe);
        assert_eq!(caffeine[0].baseline_avg, dec!(3.5));

        // Dashboard
        let today = models::parse_date("2024-03-20").unwrap();
        let dashboard = insights::dashboard_summary(&entries, today);
        assert_eq!(dashboard.entry_count, 6);
        assert_eq!(dashboard.week_miles, dec!(29));
        assert_eq!(dashboard.avg_rhr, Some(dec!(50.4)));
        assert_eq!(
            dashboard.headline.as_deref(),
            Some("RPE is 2.3 points higher after alcohol")
        );

        // Exports
        let weekly_csv = dir.path().join("weekly.csv");
        export_report(&entries, ExportType::WeeklySummaries, ExportFormat::Csv, &weekly_csv).unwrap();
        let content = std::fs::read_to_string(&weekly_csv).unwrap();
        assert!(content.starts_with("Week_Start,Week_End,Total_Miles"));
        assert!(content.contains("2024-03-18,2024-03-24,29,4,1,7:20,"));

        let insights_csv = dir.path().join("insights.csv");
        export_report(&entries, ExportType::Insights, ExportFormat::Csv, &insights_csv).unwrap();
        let content = std::fs::read_to_string(&insights_csv).unwrap();
        assert!(content.contains("Alcohol,RPE,negative,strong,7.0,4.7"));

        let insights_json = dir.path().join("insights.json");
        export_report(&entries, ExportType::Insights, ExportFormat::Json, &insights_json).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&insights_json).unwrap()).unwrap();
        assert_eq!(value["status"], "ready");
    }

    #[test]
    fn test_headline_falls_back_without_signal() {
        let entries: Vec<Entry> = ["2024-03-18", "2024-03-19", "2024-03-20"]
            .iter()
            .map(|d| {
                let mut e = entry(d, EntryType::Easy);
                e.rpe = Some(5);
                e
            })
            .collect();

        assert_eq!(insights::headline_insight(&entries).as_deref(), Some(HEADLINE_FALLBACK));
    }

    #[test]
    fn test_memory_store_history() {
        let store = MemoryStore::default();
        for e in create_training_log() {
            store.append(e).unwrap();
        }

        let entries = store.load().unwrap();
        let newest = store::entry_at(&entries, 0).unwrap();
        assert_eq!(newest.date, models::parse_date("2024-03-22").unwrap());
        let oldest = store::entry_at(&entries, 5).unwrap();
        assert_eq!(oldest.date, models::parse_date("2024-03-11").unwrap());
        assert!(store::entry_at(&entries, 6).is_none());
    }
}
