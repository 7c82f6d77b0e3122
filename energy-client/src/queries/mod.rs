pub mod meter_reading_queries;

pub use meter_reading_queries::{
    building_summary, daily_totals, peak_hours, weekly_average, weekly_totals, BuildingSummary,
    DailyTotal, PeakHour, WeeklyAverage, WeeklyTotal,
};
