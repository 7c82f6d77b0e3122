use time::PrimitiveDateTime;

/// One meter sample for a single building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterReading {
    timestamp: PrimitiveDateTime,
    kwh: f64,
}

impl MeterReading {
    pub fn new(timestamp: PrimitiveDateTime, kwh: f64) -> Self {
        Self { timestamp, kwh }
    }

    pub fn timestamp(&self) -> PrimitiveDateTime {
        self.timestamp
    }

    pub fn kwh(&self) -> f64 {
        self.kwh
    }
}

/// Sum of kWh values. An empty input totals `0.0`, never `-0.0`.
pub fn total_kwh<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(0.0, |acc, kwh| acc + kwh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_total_is_positive_zero() {
        let total = total_kwh(std::iter::empty());
        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
        assert_eq!(format!("{total:.2}"), "0.00");
    }

    #[test]
    fn total_adds_every_value() {
        assert_eq!(total_kwh([150.0, 145.0, 0.5]), 295.5);
    }
}
