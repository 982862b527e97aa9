use crate::{
    climate::{self, Climate},
    get_stations, index_handler, precipitation, routes, temperature_for_date, temperature_from,
    temperature_range, tobs, Backend, CsvAccess, Dataset, DatasetFiles, SqliteAccess,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{header::ACCEPT, Method};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub climate: Arc<Climate>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::api::precipitation::precipitation,
        routes::api::stations::get_stations,
        routes::api::tobs::tobs,
        routes::api::temperature::temperature_for_date,
        routes::api::temperature::temperature_from,
        routes::api::temperature::temperature_range,
    ),
    components(
        schemas(
                climate::ErrorResponse,
                climate::PrecipitationReading,
                climate::StationListing,
                climate::TobsReading,
                climate::TemperatureStats,
                climate::TemperatureSummary,
        )
    ),
    tags(
        (name = "surfsup climate api", description = "a read-only RESTful api answering fixed questions over historical Hawaii weather station data")
    )
)]
struct ApiDoc;

/// Opens the dataset in `data_dir` with the requested backend
pub async fn build_dataset(
    backend: Backend,
    data_dir: String,
) -> Result<Arc<dyn Dataset>, anyhow::Error> {
    let files = DatasetFiles::new(data_dir);
    let dataset: Arc<dyn Dataset> = match backend {
        Backend::Sqlite => {
            let path = files.sqlite_db()?;
            Arc::new(
                SqliteAccess::new(&path)
                    .await
                    .map_err(|e| anyhow!("error opening sqlite dataset {}: {}", path, e))?,
            )
        }
        Backend::Csv => {
            let (measurements, stations) = files.csv_files()?;
            info!("reading measurements from {}", measurements);
            info!("reading stations from {}", stations);
            Arc::new(CsvAccess::new(measurements, stations))
        }
    };
    Ok(dataset)
}

pub async fn build_app_state(
    remote_url: String,
    data_dir: String,
    backend: Backend,
) -> Result<AppState, anyhow::Error> {
    let dataset = build_dataset(backend, data_dir).await?;
    Ok(AppState {
        remote_url,
        climate: Arc::new(Climate::new(dataset)),
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(get_stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_for_date))
        .route("/api/v1.0/1/{start2}", get(temperature_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request", "new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, path: {}, time: {}", response.status().as_str(), path, response_time);

    response
}
