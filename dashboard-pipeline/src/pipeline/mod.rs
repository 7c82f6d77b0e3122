use energy_client::{
    domain::{BuildingManager, EnergyRecord},
    queries::{self, BuildingSummary, DailyTotal, WeeklyTotal},
};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(String),
    #[error("no data to process")]
    NoData,
    #[error("sink error: {0}")]
    Sink(String),
}

/// Produces the combined, cleaned table.
pub trait Source {
    fn load(&self) -> Result<Vec<EnergyRecord>, PipelineError>;
}

/// Consumes the cleaned table and its aggregates.
pub trait Sink {
    fn name(&self) -> &'static str;

    fn run(&self, records: &[EnergyRecord], aggregates: &Aggregates) -> Result<(), PipelineError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub daily: Vec<DailyTotal>,
    pub weekly: Vec<WeeklyTotal>,
    pub summary: Vec<BuildingSummary>,
}

impl Aggregates {
    pub fn compute(records: &[EnergyRecord]) -> Self {
        Self {
            daily: queries::daily_totals(records),
            weekly: queries::weekly_totals(records),
            summary: queries::building_summary(records),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub rows: usize,
    pub buildings: usize,
    /// One `generate_report` line per building, in first-seen order.
    pub reports: Vec<String>,
    pub failed_sinks: Vec<&'static str>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failed_sinks.is_empty()
    }
}

pub struct Pipeline<S> {
    pub source: S,
    pub sinks: Vec<Box<dyn Sink>>,
}

impl<S> Pipeline<S>
where
    S: Source,
{
    pub fn run(self) -> Result<RunOutcome, PipelineError> {
        let records = self.source.load()?;
        if records.is_empty() {
            return Err(PipelineError::NoData);
        }

        let aggregates = Aggregates::compute(&records);
        let manager = BuildingManager::from_records(&records);

        // A failing sink does not stop the ones after it.
        let mut failed_sinks = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.run(&records, &aggregates) {
                tracing::error!(sink = sink.name(), error = %e, "sink failed");
                failed_sinks.push(sink.name());
            }
        }

        Ok(RunOutcome {
            rows: records.len(),
            buildings: manager.len(),
            reports: manager.reports(),
            failed_sinks,
        })
    }
}
