use async_trait::async_trait;
use duckdb::{
    arrow::array::{Array, Float64Array, RecordBatch, StringArray},
    Connection,
};
use log::trace;
use scooby::postgres::{select, Aliasable};
use tokio::task;

use super::{Dataset, Error, Measurement, Station};

/// Dataset backed by the measurement and station CSV exports, read through an
/// in-memory duckdb connection.
#[derive(Clone)]
pub struct CsvAccess {
    measurements_path: String,
    stations_path: String,
}

impl CsvAccess {
    pub fn new(measurements_path: String, stations_path: String) -> Self {
        Self {
            measurements_path,
            stations_path,
        }
    }

    /// Creates new in-memory connection, making it so we always start with a fresh slate and no possible locking issues
    pub fn open_connection(&self) -> Result<Connection, duckdb::Error> {
        Connection::open_in_memory()
    }

    pub fn query(&self, sql: &str) -> Result<Vec<RecordBatch>, duckdb::Error> {
        trace!("duckdb query: {}", sql);
        let conn = self.open_connection()?;
        let mut stmt = conn.prepare(sql)?;
        let records: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(records)
    }

    /// duckdb reads are synchronous, so they run on tokio's blocking pool
    async fn query_blocking(&self, sql: String) -> Result<Vec<RecordBatch>, Error> {
        let access = self.clone();
        let records = task::spawn_blocking(move || access.query(&sql)).await??;
        Ok(records)
    }
}

fn read_csv(path: &str) -> String {
    format!(
        "read_csv('{}', header = true, auto_detect = true)",
        path.replace('\'', "''")
    )
}

#[async_trait]
impl Dataset for CsvAccess {
    async fn measurements(&self) -> Result<Vec<Measurement>, Error> {
        // Casts pin the arrow types regardless of what duckdb sniffs from the file,
        // and turn a detected DATE back into its YYYY-MM-DD text form
        let sql = select((
            "CAST(station AS VARCHAR)".as_("station"),
            "CAST(date AS VARCHAR)".as_("date"),
            "CAST(tobs AS DOUBLE)".as_("tobs"),
            "CAST(prcp AS DOUBLE)".as_("prcp"),
        ))
        .from(read_csv(&self.measurements_path))
        .to_string();

        let records = self.query_blocking(sql).await?;
        let measurements = records
            .iter()
            .try_fold(Measurements::new(), |mut acc, record| {
                acc.merge(Measurements::try_from(record)?);
                Ok::<_, Error>(acc)
            })?;

        Ok(measurements.values)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let sql = select((
            "CAST(station AS VARCHAR)".as_("station"),
            "CAST(name AS VARCHAR)".as_("name"),
        ))
        .from(read_csv(&self.stations_path))
        .to_string();

        let records = self.query_blocking(sql).await?;
        let stations = records
            .iter()
            .try_fold(Stations::new(), |mut acc, record| {
                acc.merge(Stations::try_from(record)?);
                Ok::<_, Error>(acc)
            })?;

        Ok(stations.values)
    }
}

fn column<'a, T: Array + 'static>(
    record_batch: &'a RecordBatch,
    index: usize,
    name: &'static str,
) -> Result<&'a T, Error> {
    record_batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or(Error::ColumnType(name))
}

fn required_str(arr: &StringArray, row: usize, column: &'static str) -> Result<String, Error> {
    if arr.is_null(row) {
        return Err(Error::MissingValue { column, row });
    }
    Ok(arr.value(row).to_owned())
}

struct Measurements {
    values: Vec<Measurement>,
}

impl Measurements {
    pub fn new() -> Self {
        Measurements { values: Vec::new() }
    }

    pub fn merge(&mut self, measurements: Measurements) -> &Measurements {
        self.values.extend(measurements.values);
        self
    }
}

impl TryFrom<&RecordBatch> for Measurements {
    type Error = Error;

    fn try_from(record_batch: &RecordBatch) -> Result<Self, Self::Error> {
        let station_arr = column::<StringArray>(record_batch, 0, "station")?;
        let date_arr = column::<StringArray>(record_batch, 1, "date")?;
        let tobs_arr = column::<Float64Array>(record_batch, 2, "tobs")?;
        let prcp_arr = column::<Float64Array>(record_batch, 3, "prcp")?;

        let mut measurements = Vec::with_capacity(record_batch.num_rows());
        for row_index in 0..record_batch.num_rows() {
            if tobs_arr.is_null(row_index) {
                return Err(Error::MissingValue {
                    column: "tobs",
                    row: row_index,
                });
            }
            let prcp = if prcp_arr.is_null(row_index) {
                None
            } else {
                Some(prcp_arr.value(row_index))
            };

            measurements.push(Measurement {
                station: required_str(station_arr, row_index, "station")?,
                date: required_str(date_arr, row_index, "date")?,
                tobs: tobs_arr.value(row_index),
                prcp,
            });
        }

        Ok(Self {
            values: measurements,
        })
    }
}

struct Stations {
    values: Vec<Station>,
}

impl Stations {
    pub fn new() -> Self {
        Stations { values: Vec::new() }
    }

    pub fn merge(&mut self, stations: Stations) -> &Stations {
        self.values.extend(stations.values);
        self
    }
}

impl TryFrom<&RecordBatch> for Stations {
    type Error = Error;

    fn try_from(record_batch: &RecordBatch) -> Result<Self, Self::Error> {
        let station_arr = column::<StringArray>(record_batch, 0, "station")?;
        let name_arr = column::<StringArray>(record_batch, 1, "name")?;

        let mut stations = Vec::with_capacity(record_batch.num_rows());
        for row_index in 0..record_batch.num_rows() {
            stations.push(Station {
                station: required_str(station_arr, row_index, "station")?,
                name: required_str(name_arr, row_index, "name")?,
            });
        }

        Ok(Self { values: stations })
    }
}
