use energy_client::domain::{parse_timestamp, EnergyRecord};

/// A row as it came out of a CSV file, before any coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReading {
    pub timestamp: Option<String>,
    pub kwh: Option<String>,
    pub building: String,
}

/// Parse a kWh cell. Empty, non-numeric and non-finite values are missing.
pub fn parse_kwh(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Pure cleaning of one raw row.
///
/// Rules:
/// - the timestamp must parse; anything else is treated as missing.
/// - kWh must be present and numeric.
///
/// Returns `None` for rows that fail either rule.
pub fn clean_reading(raw: RawReading) -> Option<EnergyRecord> {
    let timestamp = raw.timestamp.as_deref().and_then(|s| parse_timestamp(s).ok())?;
    let kwh = raw.kwh.as_deref().and_then(parse_kwh)?;
    Some(EnergyRecord::new(timestamp, kwh, raw.building))
}

/// Clean the concatenated rows of every file, preserving order.
///
/// Dropped rows are not logged one by one; they are only counted.
pub fn clean_readings(rows: Vec<RawReading>) -> Vec<EnergyRecord> {
    let total = rows.len();
    let cleaned: Vec<EnergyRecord> = rows.into_iter().filter_map(clean_reading).collect();

    let dropped = total - cleaned.len();
    if dropped > 0 {
        metrics::counter!("meter_reading_rows_dropped_total").increment(dropped as u64);
    }

    cleaned
}
