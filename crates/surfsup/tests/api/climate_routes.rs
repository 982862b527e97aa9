use crate::helpers::{
    get, get_json, measurement, mock_measurements, spawn_app, station, MockDatasetAccess,
};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use surfsup::{db, Climate, Measurement};

/// Two stations spread over more than a year, stored out of date order
fn hawaii_rows() -> Vec<Measurement> {
    vec![
        measurement("USC00519281", "2017-08-23", 77.0, Some(0.45)),
        measurement("USC00519281", "2016-08-21", 79.0, Some(0.02)),
        measurement("USC00519281", "2016-08-22", 78.0, Some(0.40)),
        measurement("USC00519397", "2017-08-23", 81.0, Some(0.0)),
        measurement("USC00519397", "2016-08-22", 80.0, None),
        measurement("USC00519281", "2017-01-10", 68.0, None),
        measurement("USC00519281", "2017-01-10", 66.0, Some(0.0)),
        measurement("USC00519281", "2010-01-01", 65.0, Some(0.08)),
    ]
}

#[tokio::test]
async fn index_lists_available_routes() {
    let test_app = spawn_app(Arc::new(MockDatasetAccess::new())).await;

    let (status, body) = get(&test_app, "/").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Available Routes:"));
    assert!(html.contains("/api/v1.0/precipitation"));
    assert!(html.contains("/api/v1.0/stations"));
    assert!(html.contains("/api/v1.0/tobs"));
    assert!(html.contains("/api/v1.0/&lt;start&gt;"));
    assert!(html.contains("/api/v1.0/1/&lt;start2&gt;"));
    assert!(html.contains("/api/v1.0/&lt;start&gt;/&lt;end&gt;"));
}

#[tokio::test]
async fn precipitation_covers_trailing_year_sorted_by_date() {
    let test_app = spawn_app(Arc::new(mock_measurements(hawaii_rows()))).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::OK);
    // 2016-08-21 is outside the window, rows without precipitation are dropped,
    // equal dates keep one entry per row
    assert_eq!(
        body,
        json!([
            {"Date": "2016-08-22", "Inches": 0.40},
            {"Date": "2017-01-10", "Inches": 0.0},
            {"Date": "2017-08-23", "Inches": 0.45},
            {"Date": "2017-08-23", "Inches": 0.0},
        ])
    );
}

#[tokio::test]
async fn precipitation_on_empty_dataset_is_empty() {
    let test_app = spawn_app(Arc::new(mock_measurements(vec![]))).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/precipitation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn stations_are_listed_in_source_order() {
    let mut dataset = MockDatasetAccess::new();
    dataset.expect_stations().times(1).returning(|| {
        Ok(vec![
            station("USC00519397", "WAIKIKI 717.2, HI US"),
            station("USC00513117", "KANEOHE 838.1, HI US"),
            station("USC00514830", "KUALOA RANCH HEADQUARTERS 886.9, HI US"),
        ])
    });
    let test_app = spawn_app(Arc::new(dataset)).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"station": "USC00519397", "name": "WAIKIKI 717.2, HI US"},
            {"station": "USC00513117", "name": "KANEOHE 838.1, HI US"},
            {"station": "USC00514830", "name": "KUALOA RANCH HEADQUARTERS 886.9, HI US"},
        ])
    );
}

#[tokio::test]
async fn tobs_uses_most_active_station_in_storage_order() {
    let test_app = spawn_app(Arc::new(mock_measurements(hawaii_rows()))).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"tobs": 77.0},
            {"tobs": 78.0},
            {"tobs": 68.0},
            {"tobs": 66.0},
        ])
    );
}

#[tokio::test]
async fn tobs_breaks_ties_with_lowest_station_id() {
    let rows = vec![
        measurement("USC00519397", "2017-08-22", 81.0, None),
        measurement("USC00513117", "2017-08-22", 72.0, None),
        measurement("USC00519397", "2017-08-23", 82.0, None),
        measurement("USC00513117", "2017-08-23", 73.0, None),
    ];
    let test_app = spawn_app(Arc::new(mock_measurements(rows))).await;

    let (_, body) = get_json(&test_app, "/api/v1.0/tobs").await;
    assert_eq!(body, json!([{"tobs": 72.0}, {"tobs": 73.0}]));
}

#[tokio::test]
async fn stats_for_single_date() {
    let rows = vec![
        measurement("USC00519397", "2017-08-23", 70.0, None),
        measurement("USC00519281", "2017-08-23", 80.0, None),
        measurement("USC00519281", "2017-08-22", 50.0, None),
    ];
    let test_app = spawn_app(Arc::new(mock_measurements(rows))).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/2017-08-23").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"tobs": {"min": 70.0, "mean": 75.0, "max": 80.0}})
    );
}

#[tokio::test]
async fn stats_for_missing_date_is_not_found() {
    let test_app = spawn_app(Arc::new(mock_measurements(hawaii_rows()))).await;

    let (status, body) = get(&test_app, "/api/v1.0/2099-01-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        r#"{"error":"Date 2099-01-01 not found."}"#
    );
}

#[tokio::test]
async fn stats_from_start_include_start_date() {
    let test_app = spawn_app(Arc::new(mock_measurements(hawaii_rows()))).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/1/2017-01-10").await;
    assert_eq!(status, StatusCode::OK);
    // 68, 66, 77, 81
    assert_eq!(
        body,
        json!({"tobs": {"min": 66.0, "mean": 73.0, "max": 81.0}})
    );
}

#[tokio::test]
async fn stats_from_after_last_date_is_not_found() {
    let test_app = spawn_app(Arc::new(mock_measurements(hawaii_rows()))).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/1/2018-01-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Date 2018-01-01 not found."}));
}

#[tokio::test]
async fn range_excludes_start_and_includes_end() {
    let rows = vec![
        measurement("USC00519397", "2017-01-01", 10.0, None),
        measurement("USC00519397", "2017-01-03", 20.0, None),
        measurement("USC00519397", "2017-01-05", 30.0, None),
        measurement("USC00519397", "2017-01-06", 99.0, None),
    ];
    let test_app = spawn_app(Arc::new(mock_measurements(rows))).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/2017-01-01/2017-01-05").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"tobs": {"min": 20.0, "mean": 25.0, "max": 30.0}})
    );
}

#[tokio::test]
async fn empty_range_is_not_found() {
    let test_app = spawn_app(Arc::new(mock_measurements(hawaii_rows()))).await;

    let (status, body) = get(&test_app, "/api/v1.0/2017-08-23/2017-09-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        r#"{"error":"Date (2017-08-23, 2017-09-01) not found."}"#
    );
}

#[tokio::test]
async fn dataset_failure_is_server_error() {
    let mut dataset = MockDatasetAccess::new();
    dataset
        .expect_measurements()
        .times(1)
        .returning(|| Err(db::Error::ColumnType("tobs")));
    let test_app = spawn_app(Arc::new(dataset)).await;

    let (status, body) = get_json(&test_app, "/api/v1.0/2017-08-23").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Failed to read dataset: Column tobs has an unexpected type"})
    );
}

#[tokio::test]
async fn anchor_and_busiest_station_come_from_measurements() {
    let climate = Climate::new(Arc::new(mock_measurements(hawaii_rows())));

    assert_eq!(
        climate.most_recent_date().await.unwrap().as_deref(),
        Some("2017-08-23")
    );
    assert_eq!(
        climate.most_active_station().await.unwrap().as_deref(),
        Some("USC00519281")
    );
}
