use std::path::Path;

use anyhow::Result;
use dashboard_pipeline::{config::AppConfig, observability, sample_data};

fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;
    let written = sample_data::write_sample_data(Path::new(&cfg.data_dir))?;

    println!("CSV files created in {}:", cfg.data_dir.display());
    for (i, path) in written.iter().enumerate() {
        println!("{}. {}", i + 1, path.display());
    }

    Ok(())
}
