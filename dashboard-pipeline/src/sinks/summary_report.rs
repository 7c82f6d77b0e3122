use energy_client::{
    domain::{format_timestamp, total_kwh, EnergyRecord},
    queries::BuildingSummary,
};
use time::PrimitiveDateTime;

/// Campus-wide figures for `summary.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct CampusSummary {
    pub total_kwh: f64,
    pub highest_building: String,
    pub peak_time: PrimitiveDateTime,
    pub building_count: usize,
    pub first_timestamp: PrimitiveDateTime,
    pub last_timestamp: PrimitiveDateTime,
}

impl CampusSummary {
    /// `None` when there is nothing to summarise.
    ///
    /// Ties keep the first candidate: the first summary row for the highest
    /// building, the first record in table order for the peak reading.
    pub fn compute(records: &[EnergyRecord], summary: &[BuildingSummary]) -> Option<Self> {
        let first = records.first()?;
        let highest = summary.iter().reduce(|best, s| if s.total_kwh > best.total_kwh { s } else { best })?;
        let peak = records.iter().reduce(|best, r| if r.kwh > best.kwh { r } else { best })?;

        let mut first_timestamp = first.timestamp;
        let mut last_timestamp = first.timestamp;
        for r in records {
            first_timestamp = first_timestamp.min(r.timestamp);
            last_timestamp = last_timestamp.max(r.timestamp);
        }

        Some(Self {
            total_kwh: total_kwh(records.iter().map(|r| r.kwh)),
            highest_building: highest.building.clone(),
            peak_time: peak.timestamp,
            building_count: summary.len(),
            first_timestamp,
            last_timestamp,
        })
    }

    pub fn render(&self) -> String {
        format!(
            "CAMPUS ENERGY CONSUMPTION REPORT\n\
             {rule}\n\
             Total Campus Consumption: {total:.2} kWh\n\
             Highest Consuming Building: {highest}\n\
             Peak Load Time: {peak}\n\
             Number of Buildings: {count}\n\
             Date Range: {first} to {last}\n",
            rule = "=".repeat(40),
            total = self.total_kwh,
            highest = self.highest_building,
            peak = format_timestamp(self.peak_time),
            count = self.building_count,
            first = format_timestamp(self.first_timestamp),
            last = format_timestamp(self.last_timestamp),
        )
    }
}
