use std::{
    fs,
    path::{Path, PathBuf},
};

use energy_client::{
    domain::{format_timestamp, EnergyRecord},
    queries::BuildingSummary,
};
use serde::Serialize;

use super::summary_report::CampusSummary;
use crate::{
    config::ExportConfig,
    pipeline::{Aggregates, PipelineError, Sink},
};

const CLEANED_HEADER: [&str; 6] = ["timestamp", "kwh", "building", "date", "week", "hour"];

/// One line of the cleaned export. kWh goes through serde like the summary
/// rows, so both files render floats the same way.
#[derive(Serialize)]
struct CleanedRow<'a> {
    timestamp: String,
    kwh: f64,
    building: &'a str,
    date: String,
    week: String,
    hour: u8,
}

impl<'a> From<&'a EnergyRecord> for CleanedRow<'a> {
    fn from(r: &'a EnergyRecord) -> Self {
        Self {
            timestamp: format_timestamp(r.timestamp),
            kwh: r.kwh,
            building: &r.building,
            date: r.date().to_string(),
            week: r.week().to_string(),
            hour: r.hour(),
        }
    }
}

/// Writes the cleaned table, the building summary and `summary.txt`.
///
/// The three files are written independently: one failing does not stop or
/// undo the others.
pub struct CsvExportSink {
    output_dir: PathBuf,
    files: ExportConfig,
}

impl CsvExportSink {
    pub fn new<P: Into<PathBuf>>(output_dir: P, files: ExportConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            files,
        }
    }
}

/// Cleaned table plus the columns derived from each timestamp.
pub fn write_cleaned_csv(path: &Path, records: &[EnergyRecord]) -> csv::Result<()> {
    // Header written up front so an empty table still gets one.
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(CLEANED_HEADER)?;
    for r in records {
        wtr.serialize(CleanedRow::from(r))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_summary_csv(path: &Path, summary: &[BuildingSummary]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for s in summary {
        wtr.serialize(s)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_report(path: &Path, records: &[EnergyRecord], summary: &[BuildingSummary]) -> std::io::Result<()> {
    let text = CampusSummary::compute(records, summary)
        .map(|c| c.render())
        .unwrap_or_default();
    fs::write(path, text)
}

impl Sink for CsvExportSink {
    fn name(&self) -> &'static str {
        "export"
    }

    fn run(&self, records: &[EnergyRecord], aggregates: &Aggregates) -> Result<(), PipelineError> {
        let cleaned = self.output_dir.join(&self.files.cleaned_file);
        let summary = self.output_dir.join(&self.files.summary_file);
        let report = self.output_dir.join(&self.files.report_file);

        let results = [
            (&cleaned, write_cleaned_csv(&cleaned, records).map_err(|e| e.to_string())),
            (&summary, write_summary_csv(&summary, &aggregates.summary).map_err(|e| e.to_string())),
            (&report, write_report(&report, records, &aggregates.summary).map_err(|e| e.to_string())),
        ];

        let mut failed = Vec::new();
        for (path, res) in &results {
            match res {
                Ok(()) => tracing::info!(path = %path.display(), "exported"),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "export write failed");
                    metrics::counter!("export_write_errors_total").increment(1);
                    failed.push(path.display().to_string());
                }
            }
        }

        if failed.is_empty() {
            tracing::info!(dir = %self.output_dir.display(), "data exported");
            Ok(())
        } else {
            Err(PipelineError::Sink(format!("failed to write {}", failed.join(", "))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn records() -> Vec<EnergyRecord> {
        vec![
            EnergyRecord::new(datetime!(2024-01-01 00:00:00), 150.0, "B1"),
            EnergyRecord::new(datetime!(2024-01-01 01:00:00), 145.5, "B1"),
            EnergyRecord::new(datetime!(2024-01-08 13:00:00), 200.0, "B2"),
        ]
    }

    #[test]
    fn writes_all_three_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let records = records();
        let aggregates = Aggregates::compute(&records);

        CsvExportSink::new(tmp.path(), ExportConfig::default())
            .run(&records, &aggregates)
            .expect("export");

        let cleaned = fs::read_to_string(tmp.path().join("cleaned_energy_data.csv")).expect("cleaned");
        assert_eq!(
            cleaned,
            "timestamp,kwh,building,date,week,hour\n\
             2024-01-01 00:00:00,150.0,B1,2024-01-01,2024-W01,0\n\
             2024-01-01 01:00:00,145.5,B1,2024-01-01,2024-W01,1\n\
             2024-01-08 13:00:00,200.0,B2,2024-01-08,2024-W02,13\n"
        );

        let summary = fs::read_to_string(tmp.path().join("building_summary.csv")).expect("summary");
        assert_eq!(
            summary,
            "building,avg_kwh,min_kwh,max_kwh,total_kwh\n\
             B1,147.75,145.5,150.0,295.5\n\
             B2,200.0,200.0,200.0,200.0\n"
        );

        let report = fs::read_to_string(tmp.path().join("summary.txt")).expect("report");
        assert!(report.starts_with("CAMPUS ENERGY CONSUMPTION REPORT\n"));
        assert!(report.contains("Highest Consuming Building: B1\n"));
    }

    #[test]
    fn both_exports_render_kwh_alike() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let records = vec![EnergyRecord::new(datetime!(2024-01-01 00:00:00), 150.0, "B1")];
        let aggregates = Aggregates::compute(&records);

        CsvExportSink::new(tmp.path(), ExportConfig::default())
            .run(&records, &aggregates)
            .expect("export");

        let cleaned = fs::read_to_string(tmp.path().join("cleaned_energy_data.csv")).expect("cleaned");
        let summary = fs::read_to_string(tmp.path().join("building_summary.csv")).expect("summary");
        assert!(cleaned.contains(",150.0,B1,"));
        assert!(summary.contains("B1,150.0,150.0,150.0,150.0\n"));
    }

    #[test]
    fn empty_table_still_gets_cleaned_header() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("cleaned.csv");

        write_cleaned_csv(&path, &[]).expect("write");
        assert_eq!(
            fs::read_to_string(&path).expect("read"),
            "timestamp,kwh,building,date,week,hour\n"
        );
    }

    #[test]
    fn missing_output_dir_is_a_sink_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let records = records();
        let aggregates = Aggregates::compute(&records);

        let res = CsvExportSink::new(tmp.path().join("missing"), ExportConfig::default())
            .run(&records, &aggregates);
        assert!(matches!(res, Err(PipelineError::Sink(_))));
    }

    #[test]
    fn one_failed_write_does_not_block_the_others() {
        let tmp = tempfile::tempdir().expect("tempdir");
        // A directory where the summary CSV should go makes only that write fail.
        fs::create_dir(tmp.path().join("building_summary.csv")).expect("blocker");
        let records = records();
        let aggregates = Aggregates::compute(&records);

        let res = CsvExportSink::new(tmp.path(), ExportConfig::default()).run(&records, &aggregates);

        assert!(matches!(res, Err(PipelineError::Sink(_))));
        assert!(tmp.path().join("cleaned_energy_data.csv").is_file());
        assert!(tmp.path().join("summary.txt").is_file());
    }
}
