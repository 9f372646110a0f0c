use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use predixa::config::ServiceConfig;
use predixa::domain::errors::ArtifactError;
use predixa::domain::services::artifact::{ArtifactMetadata, ModelArtifact};
use predixa::domain::services::regression::{LinearRegression, PriceModel};
use predixa::domain::services::training::{self, TrainingConfig};
use predixa::persistence::DatabaseConfig;
use predixa::server::{build_app, StartupError};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

fn config_in(dir: &Path) -> ServiceConfig {
    ServiceConfig {
        model_path: dir.join("model").join("price_model.json"),
        database: DatabaseConfig {
            url: format!("sqlite://{}", dir.join("data").join("predixa.db").display()),
            max_connections: 2,
            log_queries: false,
        },
        ..ServiceConfig::default()
    }
}

/// predict(days) = 3 * days + 11.234, so predict(30) = 101.234
fn write_linear_artifact(path: &Path) {
    ModelArtifact {
        model: PriceModel::Linear(LinearRegression::from_coefficients(3.0, 11.234)),
        metadata: ArtifactMetadata {
            model_name: "LinearRegression".to_string(),
            training_mae: 0.0,
            samples: 2,
            trained_at: Utc::now(),
            candidates: vec![],
        },
    }
    .save(path)
    .unwrap();
}

async fn app_with_linear_model() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_linear_artifact(&config.model_path);
    let app = build_app(&config).await.unwrap();
    (app, dir)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn history(app: &Router) -> Vec<Value> {
    let (status, body) = get(app, "/history").await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = app_with_linear_model().await;

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Predixa API is running"}));
}

#[tokio::test]
async fn test_predict_returns_rounded_price_and_records_it() {
    let (app, _dir) = app_with_linear_model().await;

    let (status, body) = get(&app, "/predict?days=30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"days_ahead": 30, "predicted_price": 101.23, "saved": true})
    );

    let records = history(&app).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["days_ahead"], 30);
    assert!(records[0]["id"].as_i64().unwrap() > 0);
    // Stored unrounded
    let stored = records[0]["predicted_price"].as_f64().unwrap();
    assert!((stored - 101.234).abs() < 1e-9);
    assert!(records[0]["created_at"]
        .as_str()
        .unwrap()
        .parse::<DateTime<Utc>>()
        .is_ok());
}

#[tokio::test]
async fn test_negative_days_rejected_and_history_unchanged() {
    let (app, _dir) = app_with_linear_model().await;
    get(&app, "/predict?days=7").await;
    let before = history(&app).await;

    let (status, body) = get(&app, "/predict?days=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "Days must be > 0"}));

    let (status, _) = get(&app, "/predict?days=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(history(&app).await, before);
}

#[tokio::test]
async fn test_malformed_days_rejected() {
    let (app, _dir) = app_with_linear_model().await;

    for uri in ["/predict", "/predict?days=abc", "/predict?days=1.5"] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
    assert!(history(&app).await.is_empty());
}

#[tokio::test]
async fn test_n_predictions_most_recent_first() {
    let (app, _dir) = app_with_linear_model().await;

    for days in [3, 10, 1, 45] {
        let (status, _) = get(&app, &format!("/predict?days={}", days)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let records = history(&app).await;
    let days: Vec<i64> = records
        .iter()
        .map(|r| r["days_ahead"].as_i64().unwrap())
        .collect();
    assert_eq!(days, vec![45, 1, 10, 3]);

    let timestamps: Vec<DateTime<Utc>> = records
        .iter()
        .map(|r| r["created_at"].as_str().unwrap().parse().unwrap())
        .collect();
    for pair in timestamps.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[tokio::test]
async fn test_trailing_slash_routes() {
    let (app, _dir) = app_with_linear_model().await;

    let (status, _) = get(&app, "/predict/?days=2").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get(&app, "/history/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _dir) = app_with_linear_model().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "https://dashboard.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn test_missing_artifact_prevents_startup() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let result = build_app(&config).await;
    assert!(matches!(
        result,
        Err(StartupError::Artifact(ArtifactError::Missing(_)))
    ));
    // Nothing else was opened
    assert!(!dir.path().join("data").exists());
}

#[tokio::test]
async fn test_restart_gives_identical_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::create_dir_all(dir.path().join("csv")).unwrap();
    let data_path = dir.path().join("csv").join("prices.csv");
    std::fs::write(
        &data_path,
        "day,price\n1,100\n2,103\n3,101\n4,106\n5,108\n6,104\n7,111\n8,115\n",
    )
    .unwrap();

    training::run(&TrainingConfig {
        data_path,
        artifact_path: config.model_path.clone(),
        n_estimators: 20,
        seed: 42,
    })
    .unwrap();

    let first = build_app(&config).await.unwrap();
    let (_, a) = get(&first, "/predict?days=12").await;
    drop(first);

    let second = build_app(&config).await.unwrap();
    let (_, b) = get(&second, "/predict?days=12").await;

    assert_eq!(a, b);
    assert_eq!(history(&second).await.len(), 2);
}
