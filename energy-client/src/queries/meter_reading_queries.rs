use std::collections::BTreeMap;

use time::Date;

use crate::domain::{EnergyRecord, IsoWeek};

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: Date,
    pub building: String,
    pub kwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyTotal {
    pub week: IsoWeek,
    pub building: String,
    pub kwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuildingSummary {
    pub building: String,
    pub avg_kwh: f64,
    pub min_kwh: f64,
    pub max_kwh: f64,
    pub total_kwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyAverage {
    pub building: String,
    pub avg_kwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeakHour {
    pub building: String,
    pub hour: u8,
    pub kwh: f64,
}

/// Sum kWh per (calendar date, building), ordered by date then building.
pub fn daily_totals(records: &[EnergyRecord]) -> Vec<DailyTotal> {
    let mut groups: BTreeMap<(Date, &str), f64> = BTreeMap::new();
    for r in records {
        *groups.entry((r.date(), r.building.as_str())).or_default() += r.kwh;
    }

    groups
        .into_iter()
        .map(|((date, building), kwh)| DailyTotal {
            date,
            building: building.to_string(),
            kwh,
        })
        .collect()
}

/// Sum kWh per (ISO week, building), ordered by week then building.
pub fn weekly_totals(records: &[EnergyRecord]) -> Vec<WeeklyTotal> {
    let mut groups: BTreeMap<(IsoWeek, &str), f64> = BTreeMap::new();
    for r in records {
        *groups.entry((r.week(), r.building.as_str())).or_default() += r.kwh;
    }

    groups
        .into_iter()
        .map(|((week, building), kwh)| WeeklyTotal {
            week,
            building: building.to_string(),
            kwh,
        })
        .collect()
}

/// Mean, min, max and sum of kWh per building, ordered by building.
pub fn building_summary(records: &[EnergyRecord]) -> Vec<BuildingSummary> {
    struct Acc {
        count: usize,
        min: f64,
        max: f64,
        sum: f64,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for r in records {
        let acc = groups.entry(r.building.as_str()).or_insert(Acc {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
        });
        acc.count += 1;
        acc.min = acc.min.min(r.kwh);
        acc.max = acc.max.max(r.kwh);
        acc.sum += r.kwh;
    }

    groups
        .into_iter()
        .map(|(building, acc)| BuildingSummary {
            building: building.to_string(),
            avg_kwh: acc.sum / acc.count as f64,
            min_kwh: acc.min,
            max_kwh: acc.max,
            total_kwh: acc.sum,
        })
        .collect()
}

/// Mean of each building's weekly totals.
///
/// This averages the already-aggregated weekly values, so partial weeks at
/// either end of the data weigh the same as full ones.
pub fn weekly_average(weekly: &[WeeklyTotal]) -> Vec<WeeklyAverage> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for w in weekly {
        let (sum, count) = groups.entry(w.building.as_str()).or_default();
        *sum += w.kwh;
        *count += 1;
    }

    groups
        .into_iter()
        .map(|(building, (sum, count))| WeeklyAverage {
            building: building.to_string(),
            avg_kwh: sum / count as f64,
        })
        .collect()
}

/// Highest single reading per (building, hour of day).
pub fn peak_hours(records: &[EnergyRecord]) -> Vec<PeakHour> {
    let mut groups: BTreeMap<(&str, u8), f64> = BTreeMap::new();
    for r in records {
        groups
            .entry((r.building.as_str(), r.hour()))
            .and_modify(|peak| *peak = peak.max(r.kwh))
            .or_insert(r.kwh);
    }

    groups
        .into_iter()
        .map(|((building, hour), kwh)| PeakHour {
            building: building.to_string(),
            hour,
            kwh,
        })
        .collect()
}
