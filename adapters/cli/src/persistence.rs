//! Load and save of the flat lifetime-statistics record.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rampart_system_analytics::SaveRecord;

/// Default file the statistics record is written to.
pub(crate) const DEFAULT_STATS_FILE: &str = "rampart_stats.json";

/// Reads the persisted record, falling back to a fresh one when absent.
pub(crate) fn load_record(path: &Path) -> Result<SaveRecord> {
    if !path.exists() {
        return Ok(SaveRecord::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("could not read statistics file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("could not parse statistics file {}", path.display()))
}

/// Writes the record, replacing any previous contents.
pub(crate) fn save_record(path: &Path, record: &SaveRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("could not serialize statistics")?;
    fs::write(path, json)
        .with_context(|| format!("could not write statistics file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_a_fresh_record() {
        let path = Path::new("definitely-missing-rampart-stats.json");
        let record = load_record(path).expect("missing file is not an error");
        assert_eq!(record, SaveRecord::default());
    }

    #[test]
    fn records_survive_a_save_and_load_cycle() {
        let mut path = std::env::temp_dir();
        path.push(format!("rampart-stats-test-{}.json", std::process::id()));

        let mut record = SaveRecord::default();
        record.statistics.total_kills = 42;
        record.statistics.highest_wave = 7;

        save_record(&path, &record).expect("record saves");
        let restored = load_record(&path).expect("record loads");
        let _ = fs::remove_file(&path);

        assert_eq!(restored, record);
    }
}
