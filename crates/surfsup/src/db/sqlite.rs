use async_trait::async_trait;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};
use std::time::Duration;

use super::{Dataset, Error, Measurement, Station};

/// Dataset backed by the `measurement` and `station` tables of the SQLite
/// snapshot. The database is opened read-only and shared through a pool.
#[derive(Clone)]
pub struct SqliteAccess {
    pool: SqlitePool,
}

impl SqliteAccess {
    pub async fn new(path: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        info!("sqlite dataset opened: {}", path);
        Ok(Self { pool })
    }
}

fn measurement_from_row(row: &SqliteRow) -> Result<Measurement, sqlx::Error> {
    Ok(Measurement {
        station: row.try_get("station")?,
        date: row.try_get("date")?,
        tobs: row.try_get("tobs")?,
        prcp: row.try_get("prcp")?,
    })
}

fn station_from_row(row: &SqliteRow) -> Result<Station, sqlx::Error> {
    Ok(Station {
        station: row.try_get("station")?,
        name: row.try_get("name")?,
    })
}

#[async_trait]
impl Dataset for SqliteAccess {
    async fn measurements(&self) -> Result<Vec<Measurement>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                CAST(station AS TEXT) AS station,
                CAST(date AS TEXT) AS date,
                CAST(tobs AS REAL) AS tobs,
                CAST(prcp AS REAL) AS prcp
            FROM measurement
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let measurements = rows
            .iter()
            .map(measurement_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(measurements)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                CAST(station AS TEXT) AS station,
                CAST(name AS TEXT) AS name
            FROM station
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let stations = rows
            .iter()
            .map(station_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stations)
    }
}
