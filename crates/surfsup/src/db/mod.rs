pub mod csv_data;
pub mod sqlite;

pub use csv_data::*;
pub use sqlite::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query duckdb: {0}")]
    Query(#[from] duckdb::Error),
    #[error("Blocking read task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Failed to query sqlite: {0}")]
    Sqlite(#[from] sqlx::Error),
    #[error("Column {0} has an unexpected type")]
    ColumnType(&'static str),
    #[error("Column {column} is empty in row {row}")]
    MissingValue { column: &'static str, row: usize },
}

/// Read-only access to the measurement and station tables, independent of
/// the storage backing them.
#[async_trait]
pub trait Dataset: Send + Sync {
    /// Every measurement row, in storage order
    async fn measurements(&self) -> Result<Vec<Measurement>, Error>;
    /// Every station row, in storage order
    async fn stations(&self) -> Result<Vec<Station>, Error>;
}

/// One daily observation taken at a station.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Measurement {
    pub station: String,
    /// `YYYY-MM-DD`, compared lexicographically
    pub date: String,
    /// Temperature observation
    pub tobs: f64,
    /// Precipitation in inches, `None` when not reported
    pub prcp: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Station {
    pub station: String,
    pub name: String,
}
