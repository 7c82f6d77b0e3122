use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::StringRecord;
use energy_client::domain::EnergyRecord;

use crate::{
    pipeline::{PipelineError, Source},
    transform::{self, RawReading},
};

/// Directory source for per-building meter CSVs.
///
/// Every `*.csv` file directly inside the directory is read. Expected header
/// columns (by name):
/// - timestamp (`YYYY-MM-DD HH:MM:SS`)
/// - kwh
///
/// The building label is the file stem up to its first underscore, so
/// `building1_jan.csv` becomes `building1`.
pub struct MeterReadingCsvDirSource {
    dir: PathBuf,
}

impl MeterReadingCsvDirSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// CSV files in the directory, sorted so repeated runs see the same order.
    fn csv_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

pub fn building_label(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.split_once('_') {
        Some((label, _)) => label.to_string(),
        None => stem,
    }
}

fn column(headers: &StringRecord, name: &str) -> Result<usize, PipelineError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| PipelineError::Source(format!("missing column '{name}' in CSV header")))
}

fn cell(record: &StringRecord, idx: usize) -> Option<String> {
    record.get(idx).map(str::to_string)
}

/// Read one file into raw rows.
///
/// Lines with more fields than the header are skipped; short lines keep
/// their missing cells as `None` and are dropped later during cleaning.
pub fn read_meter_csv(path: &Path) -> Result<Vec<RawReading>, PipelineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::Source(format!("failed to open CSV file: {e}")))?;
    let headers = rdr
        .headers()
        .map_err(|e| PipelineError::Source(format!("failed to read CSV headers: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(PipelineError::Source("no columns to parse".to_string()));
    }

    let ts_idx = column(&headers, "timestamp")?;
    let kwh_idx = column(&headers, "kwh")?;
    let building = building_label(path);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(r) if r.len() <= headers.len() => r,
            _ => {
                metrics::counter!("meter_reading_csv_bad_lines_total").increment(1);
                continue;
            }
        };

        rows.push(RawReading {
            timestamp: cell(&record, ts_idx),
            kwh: cell(&record, kwh_idx),
            building: building.clone(),
        });
    }

    Ok(rows)
}

impl Source for MeterReadingCsvDirSource {
    fn load(&self) -> Result<Vec<EnergyRecord>, PipelineError> {
        if !self.dir.is_dir() {
            tracing::error!(dir = %self.dir.display(), "data directory not found");
            return Ok(Vec::new());
        }

        let files = match self.csv_files() {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(dir = %self.dir.display(), error = %e, "failed to list data directory");
                return Ok(Vec::new());
            }
        };

        let mut raw = Vec::new();
        let mut loaded_files = 0usize;
        for path in &files {
            match read_meter_csv(path) {
                Ok(rows) => {
                    tracing::info!(path = %path.display(), rows = rows.len(), "loaded CSV file");
                    metrics::counter!("meter_reading_csv_files_loaded_total").increment(1);
                    loaded_files += 1;
                    raw.extend(rows);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load CSV file, skipping");
                    metrics::counter!("meter_reading_csv_files_failed_total").increment(1);
                }
            }
        }

        if loaded_files == 0 {
            tracing::warn!(dir = %self.dir.display(), "no CSV files found");
            return Ok(Vec::new());
        }

        let raw_rows = raw.len();
        let records = transform::clean_readings(raw);
        tracing::info!(
            rows = records.len(),
            columns = 3,
            dropped = raw_rows - records.len(),
            files = loaded_files,
            "combined table"
        );

        Ok(records)
    }
}
