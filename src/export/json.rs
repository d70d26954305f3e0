use super::ExportError;
use std::io::Write;
use std::path::Path;

/// Export any serializable data structure to JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<(), ExportError>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let json_data = serde_json::to_string_pretty(data)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, Entry, EntryType};
    use crate::weekly::weekly_summaries;
    use rust_decimal_macros::dec;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_weekly_summaries_json() {
        let mut run = Entry::new(parse_date("2024-09-03").unwrap(), EntryType::Workout);
        run.miles = dec!(9);
        run.pace = Some("6:40".parse().unwrap());

        let summaries = weekly_summaries(&[run]);
        let temp_file = NamedTempFile::new().unwrap();
        export_json(&summaries, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["window"]["monday"], "2024-09-02");
        assert_eq!(parsed[0]["avg_pace"], "6:40");
        assert_eq!(parsed[0]["num_runs"], 1);
        assert!(parsed[0]["avg_rhr"].is_null());
    }
}
