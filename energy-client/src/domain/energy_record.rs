use time::{Date, PrimitiveDateTime};

use super::timestamp::IsoWeek;

/// A row of the combined, cleaned table.
///
/// Every record carries a parsed timestamp and a finite kWh value; rows that
/// cannot satisfy this never become an `EnergyRecord`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRecord {
    pub timestamp: PrimitiveDateTime,
    pub kwh: f64,
    pub building: String,
}

impl EnergyRecord {
    pub fn new(timestamp: PrimitiveDateTime, kwh: f64, building: impl Into<String>) -> Self {
        Self {
            timestamp,
            kwh,
            building: building.into(),
        }
    }

    pub fn date(&self) -> Date {
        self.timestamp.date()
    }

    pub fn week(&self) -> IsoWeek {
        IsoWeek::of(self.timestamp.date())
    }

    pub fn hour(&self) -> u8 {
        self.timestamp.hour()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn derived_columns_come_from_the_timestamp() {
        let record = EnergyRecord::new(datetime!(2024-01-03 17:45:00), 12.5, "library");

        assert_eq!(record.date(), date!(2024-01-03));
        assert_eq!(record.week().to_string(), "2024-W01");
        assert_eq!(record.hour(), 17);
    }
}
