use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    climate::{Error, ErrorResponse, StationListing},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every weather station in the dataset", body = Vec<StationListing>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorResponse)
    ))]
pub async fn get_stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StationListing>>, Error> {
    let stations = state.climate.stations().await?;
    Ok(Json(stations))
}
