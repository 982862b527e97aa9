use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    climate::{Error, ErrorResponse, TobsReading},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Temperature observations of the most active station over the last year", body = Vec<TobsReading>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorResponse)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TobsReading>>, Error> {
    let observations = state.climate.most_active_station_tobs_last_year().await?;
    Ok(Json(observations))
}
