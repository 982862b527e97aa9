use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    climate::{Error, ErrorResponse, PrecipitationReading},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation over the year ending at the most recent observation, oldest first", body = Vec<PrecipitationReading>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to read the dataset", body = ErrorResponse)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PrecipitationReading>>, Error> {
    let readings = state.climate.precipitation_last_year().await?;
    Ok(Json(readings))
}
