use std::collections::HashMap;

use time::PrimitiveDateTime;

use super::{
    energy_record::EnergyRecord,
    meter_reading::{total_kwh, MeterReading},
};

/// A building and its readings, kept in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    name: String,
    readings: Vec<MeterReading>,
}

impl Building {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn readings(&self) -> &[MeterReading] {
        &self.readings
    }

    pub fn add_reading(&mut self, timestamp: PrimitiveDateTime, kwh: f64) {
        self.readings.push(MeterReading::new(timestamp, kwh));
    }

    /// Sum of all readings. Recomputed on every call.
    pub fn total_consumption(&self) -> f64 {
        total_kwh(self.readings.iter().map(MeterReading::kwh))
    }

    pub fn generate_report(&self) -> String {
        format!(
            "Building: {}, Total Consumption: {:.2} kWh",
            self.name,
            self.total_consumption()
        )
    }
}

/// Registry of buildings for a single pipeline run.
///
/// Iteration yields buildings in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct BuildingManager {
    buildings: Vec<Building>,
    index: HashMap<String, usize>,
}

impl BuildingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[EnergyRecord]) -> Self {
        let mut manager = Self::new();
        for r in records {
            manager.add_reading_to_building(&r.building, r.timestamp, r.kwh);
        }
        manager
    }

    /// Register a building. Returns the existing one if the name is already known.
    pub fn add_building(&mut self, name: &str) -> &mut Building {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.buildings.push(Building::new(name));
                let idx = self.buildings.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.buildings[idx]
    }

    pub fn add_reading_to_building(&mut self, name: &str, timestamp: PrimitiveDateTime, kwh: f64) {
        self.add_building(name).add_reading(timestamp, kwh);
    }

    pub fn get(&self, name: &str) -> Option<&Building> {
        self.index.get(name).map(|&idx| &self.buildings[idx])
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn reports(&self) -> Vec<String> {
        self.buildings.iter().map(Building::generate_report).collect()
    }
}
