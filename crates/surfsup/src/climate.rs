//! Query and aggregation over the climate dataset.
//!
//! Every operation does its own read pass through the injected [`Dataset`];
//! nothing is cached between calls.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use itertools::Itertools;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Duration,
};
use utoipa::ToSchema;

use crate::db::{self, Dataset, Measurement};

/// Length of the trailing window ending at the most recent observation
pub const LOOKBACK_DAYS: i64 = 366;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Date {0} not found.")]
    DateNotFound(String),
    #[error("Date ({0}, {1}) not found.")]
    RangeNotFound(String, String),
    #[error("Stored date {0} is not a valid YYYY-MM-DD date: {1}")]
    InvalidDate(String, time::error::Parse),
    #[error("Lookback window from {0} falls outside the supported calendar")]
    WindowOutOfRange(String),
    #[error("Failed to format date: {0}")]
    TimeFormat(#[from] time::error::Format),
    #[error("Failed to read dataset: {0}")]
    Dataset(#[from] db::Error),
}

#[derive(Serialize, Deserialize, Debug, PartialEq, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::DateNotFound(_) | Error::RangeNotFound(_, _) => StatusCode::NOT_FOUND,
            _ => {
                error!("error answering climate query: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PrecipitationReading {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Inches")]
    pub inches: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct StationListing {
    pub station: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TobsReading {
    pub tobs: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, ToSchema)]
pub struct TemperatureStats {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl TemperatureStats {
    /// Min, arithmetic mean and max of the observations, `None` when there are none
    pub fn from_observations(observations: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for tobs in observations {
            count += 1;
            sum += tobs;
            min = min.min(tobs);
            max = max.max(tobs);
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            min,
            mean: sum / count as f64,
            max,
        })
    }
}

/// Temperature aggregate keyed the way the API has always returned it
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, ToSchema)]
pub struct TemperatureSummary {
    pub tobs: TemperatureStats,
}

/// Latest date across all measurements
pub fn latest_date(measurements: &[Measurement]) -> Option<&str> {
    measurements.iter().map(|m| m.date.as_str()).max()
}

/// First date inside the trailing window ending at `anchor`
pub fn window_start(anchor: &str) -> Result<String, Error> {
    let anchor_date =
        Date::parse(anchor, DATE_FORMAT).map_err(|e| Error::InvalidDate(anchor.to_owned(), e))?;
    let start = anchor_date
        .checked_sub(Duration::days(LOOKBACK_DAYS))
        .ok_or_else(|| Error::WindowOutOfRange(anchor.to_owned()))?;
    Ok(start.format(DATE_FORMAT)?)
}

/// Station with the most measurement rows. Equal counts go to the lowest station id.
pub fn busiest_station(measurements: &[Measurement]) -> Option<&str> {
    let counts: BTreeMap<&str, usize> = measurements
        .iter()
        .map(|m| m.station.as_str())
        .counts()
        .into_iter()
        .collect();

    let mut best: Option<(&str, usize)> = None;
    for (station, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((station, count));
        }
    }
    best.map(|(station, _)| station)
}

pub struct Climate {
    dataset: Arc<dyn Dataset>,
}

impl Climate {
    pub fn new(dataset: Arc<dyn Dataset>) -> Self {
        Self { dataset }
    }

    pub async fn most_recent_date(&self) -> Result<Option<String>, Error> {
        let measurements = self.dataset.measurements().await?;
        Ok(latest_date(&measurements).map(str::to_owned))
    }

    /// Reported precipitation over the trailing window, oldest first
    pub async fn precipitation_last_year(&self) -> Result<Vec<PrecipitationReading>, Error> {
        let measurements = self.dataset.measurements().await?;
        let Some(anchor) = latest_date(&measurements) else {
            return Ok(vec![]);
        };
        let start = window_start(anchor)?;
        debug!("precipitation window: {} to {}", start, anchor);

        let readings = measurements
            .iter()
            .filter(|m| m.date >= start)
            .filter_map(|m| {
                m.prcp.map(|inches| PrecipitationReading {
                    date: m.date.clone(),
                    inches,
                })
            })
            .sorted_by(|a, b| a.date.cmp(&b.date))
            .collect();

        Ok(readings)
    }

    pub async fn stations(&self) -> Result<Vec<StationListing>, Error> {
        let stations = self.dataset.stations().await?;
        Ok(stations
            .into_iter()
            .map(|s| StationListing {
                station: s.station,
                name: s.name,
            })
            .collect())
    }

    pub async fn most_active_station(&self) -> Result<Option<String>, Error> {
        let measurements = self.dataset.measurements().await?;
        Ok(busiest_station(&measurements).map(str::to_owned))
    }

    /// Temperature observations of the busiest station over the trailing window,
    /// in storage order
    pub async fn most_active_station_tobs_last_year(&self) -> Result<Vec<TobsReading>, Error> {
        let measurements = self.dataset.measurements().await?;
        let (Some(anchor), Some(station)) =
            (latest_date(&measurements), busiest_station(&measurements))
        else {
            return Ok(vec![]);
        };
        let start = window_start(anchor)?;
        debug!("most active station {} since {}", station, start);

        Ok(measurements
            .iter()
            .filter(|m| m.station == station && m.date >= start)
            .map(|m| TobsReading { tobs: m.tobs })
            .collect())
    }

    pub async fn temperature_stats_for_date(&self, date: &str) -> Result<TemperatureSummary, Error> {
        let measurements = self.dataset.measurements().await?;
        summarize(&measurements, |d| d == date)
            .ok_or_else(|| Error::DateNotFound(date.to_owned()))
    }

    pub async fn temperature_stats_from(&self, start: &str) -> Result<TemperatureSummary, Error> {
        let measurements = self.dataset.measurements().await?;
        summarize(&measurements, |d| d >= start)
            .ok_or_else(|| Error::DateNotFound(start.to_owned()))
    }

    /// Aggregate over `start < date <= end`
    pub async fn temperature_stats_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureSummary, Error> {
        let measurements = self.dataset.measurements().await?;
        summarize(&measurements, |d| d > start && d <= end)
            .ok_or_else(|| Error::RangeNotFound(start.to_owned(), end.to_owned()))
    }
}

fn summarize(
    measurements: &[Measurement],
    keep: impl Fn(&str) -> bool,
) -> Option<TemperatureSummary> {
    TemperatureStats::from_observations(
        measurements
            .iter()
            .filter(|m| keep(m.date.as_str()))
            .map(|m| m.tobs),
    )
    .map(|tobs| TemperatureSummary { tobs })
}
