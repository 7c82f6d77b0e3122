use std::{
    fs,
    path::{Path, PathBuf},
};

/// Fixed January fixture: two buildings, four days, midnight and 01:00.
pub const SAMPLE_FILES: [(&str, &str); 2] = [
    (
        "building1_jan.csv",
        "timestamp,kwh
2024-01-01 00:00:00,150
2024-01-01 01:00:00,145
2024-01-02 00:00:00,160
2024-01-02 01:00:00,155
2024-01-03 00:00:00,170
2024-01-03 01:00:00,165
2024-01-04 00:00:00,180
2024-01-04 01:00:00,175",
    ),
    (
        "building2_jan.csv",
        "timestamp,kwh
2024-01-01 00:00:00,200
2024-01-01 01:00:00,190
2024-01-02 00:00:00,210
2024-01-02 01:00:00,205
2024-01-03 00:00:00,220
2024-01-03 01:00:00,215
2024-01-04 00:00:00,230
2024-01-04 01:00:00,225",
    ),
];

/// Write the sample CSVs into `dir`, creating it if needed.
pub fn write_sample_data(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(SAMPLE_FILES.len());
    for (name, contents) in SAMPLE_FILES {
        let path = dir.join(name);
        fs::write(&path, contents)?;
        tracing::info!(path = %path.display(), "sample file written");
        written.push(path);
    }
    Ok(written)
}
