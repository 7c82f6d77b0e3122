pub mod csv_export;
pub mod dashboard_svg;
pub mod summary_report;

pub use csv_export::CsvExportSink;
pub use dashboard_svg::DashboardSvgSink;
pub use summary_report::CampusSummary;
