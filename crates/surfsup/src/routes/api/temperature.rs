use axum::{
    extract::{Path, State},
    Json,
};
use log::debug;
use std::sync::Arc;

use crate::{
    climate::{Error, ErrorResponse, TemperatureSummary},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "Date to summarize, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, mean and max temperature on the date", body = TemperatureSummary),
        (status = NOT_FOUND, description = "No observations on the date", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorResponse)
    ))]
pub async fn temperature_for_date(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<TemperatureSummary>, Error> {
    debug!("temperature stats for {}", start);
    let summary = state.climate.temperature_stats_for_date(&start).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/1/{start2}",
    params(
         ("start2" = String, Path, description = "First date to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, mean and max temperature from the date onward", body = TemperatureSummary),
        (status = NOT_FOUND, description = "No observations on or after the date", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorResponse)
    ))]
pub async fn temperature_from(
    State(state): State<Arc<AppState>>,
    Path(start2): Path<String>,
) -> Result<Json<TemperatureSummary>, Error> {
    debug!("temperature stats from {}", start2);
    let summary = state.climate.temperature_stats_from(&start2).await?;
    Ok(Json(summary))
}

/// `start` itself is excluded, `end` is included
#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "Exclusive lower bound, YYYY-MM-DD"),
         ("end" = String, Path, description = "Inclusive upper bound, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, mean and max temperature after start up to end", body = TemperatureSummary),
        (status = NOT_FOUND, description = "No observations in the range", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorResponse)
    ))]
pub async fn temperature_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TemperatureSummary>, Error> {
    debug!("temperature stats for ({}, {}]", start, end);
    let summary = state.climate.temperature_stats_range(&start, &end).await?;
    Ok(Json(summary))
}
