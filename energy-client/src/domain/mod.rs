pub mod building;
pub mod energy_record;
pub mod meter_reading;
pub mod timestamp;

pub use building::{Building, BuildingManager};
pub use energy_record::EnergyRecord;
pub use meter_reading::{total_kwh, MeterReading};
pub use timestamp::{format_timestamp, parse_timestamp, IsoWeek, TimestampError};
