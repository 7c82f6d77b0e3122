pub mod meter_reading_csv_dir;

pub use meter_reading_csv_dir::MeterReadingCsvDirSource;
