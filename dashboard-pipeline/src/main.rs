use std::{fs, process::ExitCode};

use anyhow::Result;
use dashboard_pipeline::{
    config::AppConfig,
    observability,
    pipeline::{Pipeline, PipelineError, Sink},
    sinks::{CsvExportSink, DashboardSvgSink},
    sources::MeterReadingCsvDirSource,
};

fn main() -> Result<ExitCode> {
    observability::init_tracing();
    tracing::info!("starting campus energy dashboard pipeline");

    let cfg = AppConfig::load()?;
    fs::create_dir_all(&cfg.output_dir)?;

    let pipeline = Pipeline {
        source: MeterReadingCsvDirSource::new(&cfg.data_dir),
        sinks: vec![
            Box::new(DashboardSvgSink::new(cfg.dashboard_path(), &cfg.dashboard)) as Box<dyn Sink>,
            Box::new(CsvExportSink::new(&cfg.output_dir, cfg.export.clone())),
        ],
    };

    let outcome = match pipeline.run() {
        Ok(outcome) => outcome,
        Err(PipelineError::NoData) => {
            tracing::error!("no data to process, exiting");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    for line in &outcome.reports {
        println!("{line}");
    }

    if !outcome.is_success() {
        tracing::error!(failed = ?outcome.failed_sinks, "pipeline finished with errors");
        return Ok(ExitCode::FAILURE);
    }

    tracing::info!(
        rows = outcome.rows,
        buildings = outcome.buildings,
        "pipeline completed successfully"
    );
    Ok(ExitCode::SUCCESS)
}
