use clap::ValueEnum;
use log::trace;
use serde::Deserialize;
use surfsup_core::is_file;

pub const MEASUREMENTS_CSV: &str = "hawaii_measurements.csv";
pub const STATIONS_CSV: &str = "hawaii_stations.csv";
pub const SQLITE_DB: &str = "hawaii.sqlite";

/// Which storage the dataset is read from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `hawaii.sqlite` with `measurement` and `station` tables
    #[default]
    Sqlite,
    /// `hawaii_measurements.csv` and `hawaii_stations.csv`
    Csv,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Csv => write!(f, "csv"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Dataset file not found: {0}")]
    NotFound(String),
}

/// Locates the dataset files inside the configured data directory.
pub struct DatasetFiles {
    data_dir: String,
}

impl DatasetFiles {
    pub fn new(data_dir: String) -> Self {
        Self { data_dir }
    }

    pub fn build_file_path(&self, filename: &str) -> String {
        format!("{}/{}", self.data_dir.trim_end_matches('/'), filename)
    }

    /// Path to `filename`, failing if it is not a readable file
    pub fn existing_file(&self, filename: &str) -> Result<String, Error> {
        let path = self.build_file_path(filename);
        trace!("checking dataset file: {}", path);
        if is_file(&path) {
            Ok(path)
        } else {
            Err(Error::NotFound(path))
        }
    }

    pub fn sqlite_db(&self) -> Result<String, Error> {
        self.existing_file(SQLITE_DB)
    }

    /// Measurement and station CSV paths, in that order
    pub fn csv_files(&self) -> Result<(String, String), Error> {
        Ok((
            self.existing_file(MEASUREMENTS_CSV)?,
            self.existing_file(STATIONS_CSV)?,
        ))
    }
}
