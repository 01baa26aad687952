//! Where final records and run metadata are written.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::collect::range::{DateRange, DATE_FORMAT};
use crate::collect::record::EnrichedRecord;
use crate::collect::report::{CollectionReport, RunSummary};
use crate::error::{Error, Result};

/// Destination for collection results.
pub trait RecordSink: Send + Sync {
    /// Persist one source's final rows. Returns the artifact written, or
    /// `None` when there was nothing to write.
    fn write_source(
        &self,
        source: &str,
        range: &DateRange,
        rows: &[EnrichedRecord],
        report: &CollectionReport,
    ) -> Result<Option<PathBuf>>;

    /// Persist the run summary. Returns where it was written.
    fn write_run_summary(&self, summary: &RunSummary) -> Result<PathBuf>;
}

/// Writes pretty-printed JSON files into one directory.
#[derive(Debug, Clone)]
pub struct JsonSink {
    directory: PathBuf,
}

impl JsonSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// `<dir>/<source>_data_<start>_to_<end>.json`
    pub fn source_path(&self, source: &str, range: &DateRange) -> PathBuf {
        self.directory
            .join(format!("{}_data_{}.json", source, range_suffix(range)))
    }

    /// `<dir>/collection_metadata_<start>_to_<end>.json`
    pub fn metadata_path(&self, range: &DateRange) -> PathBuf {
        self.directory
            .join(format!("collection_metadata_{}.json", range_suffix(range)))
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.directory).map_err(|e| {
            Error::Output(format!(
                "Cannot create output directory {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let file = File::create(path)
            .map_err(|e| Error::Output(format!("Cannot create {}: {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }
}

impl RecordSink for JsonSink {
    fn write_source(
        &self,
        source: &str,
        range: &DateRange,
        rows: &[EnrichedRecord],
        report: &CollectionReport,
    ) -> Result<Option<PathBuf>> {
        if rows.is_empty() {
            tracing::info!("No records for r/{}, nothing written", source);
            return Ok(None);
        }

        let path = self.source_path(source, range);
        self.write_json(&path, rows)?;
        tracing::info!(
            "Wrote {} records for r/{} ({}% of target) to {}",
            rows.len(),
            source,
            report.coverage_percent,
            path.display()
        );
        Ok(Some(path))
    }

    fn write_run_summary(&self, summary: &RunSummary) -> Result<PathBuf> {
        let path = self.metadata_path(&summary.date_range);
        self.write_json(&path, summary)?;
        tracing::info!("Wrote run metadata to {}", path.display());
        Ok(path)
    }
}

fn range_suffix(range: &DateRange) -> String {
    format!(
        "{}_to_{}",
        range.start.format(DATE_FORMAT),
        range.end.format(DATE_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::record::fixtures::record;
    use crate::collect::strategy::StrategyKind;
    use chrono::Utc;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn january() -> DateRange {
        DateRange::parse("2025-01-01", "2025-01-31").unwrap()
    }

    #[test]
    fn test_writes_rows_under_expected_name() {
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path().join("out"));
        let records = vec![record("b", 1_735_700_100), record("a", 1_735_700_000)];
        let report = CollectionReport::new(
            "testsub",
            &records,
            2,
            january(),
            BTreeSet::from([StrategyKind::Listing]),
            None,
        );
        let rows: Vec<_> = records.into_iter().map(EnrichedRecord::bare).collect();

        let path = sink
            .write_source("testsub", &january(), &rows, &report)
            .unwrap()
            .unwrap();

        assert_eq!(
            path,
            dir.path()
                .join("out")
                .join("testsub_data_2025-01-01_to_2025-01-31.json")
        );
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let items = written.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "b");
        assert_eq!(items[0]["permalink"], "https://reddit.com/r/testsub/comments/b/post/");
        assert!(items[0].get("comments").is_none());
    }

    #[test]
    fn test_zero_rows_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path());
        let report = CollectionReport::new("testsub", &[], 10, january(), BTreeSet::new(), None);

        let artifact = sink.write_source("testsub", &january(), &[], &report).unwrap();

        assert!(artifact.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_summary_file() {
        let dir = TempDir::new().unwrap();
        let sink = JsonSink::new(dir.path());
        let now = Utc::now();
        let summary = RunSummary::new(now, now, january(), 10, Vec::new());

        let path = sink.write_run_summary(&summary).unwrap();

        assert!(path.ends_with("collection_metadata_2025-01-01_to_2025-01-31.json"));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["total_records"], 0);
        assert_eq!(written["date_range"]["start"], "2025-01-01");
    }
}
