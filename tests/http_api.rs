// tests/http_api.rs


use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use hydrorisk::predictor::Predictor;
use hydrorisk::server::{create_router, state::AppState};

fn create_test_app() -> axum::Router {
    let (_dir, paths) = test_helpers::trained_artifacts();
    // Artifacts are read eagerly, so the temp dir can go away afterwards
    let predictor = Predictor::load(&paths).expect("load predictor");
    create_router(AppState::new(predictor))
}

async fn post_predict(app: axum::Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_index_reports_running() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Water Quality Disease Risk API is running!");
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_reference_sample() {
    let app = create_test_app();
    let (status, json) = post_predict(
        app,
        json!({ "pH": 7.0, "turbidity": 1.0, "tds": 300 }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["input"], json!({ "pH": 7.0, "turbidity": 1.0, "tds": 300.0 }));

    let predicted = json["predicted_risk"].as_str().unwrap();
    let scores = json["confidence_scores"].as_object().unwrap();
    assert_eq!(scores.len(), 6);
    assert!(scores.contains_key(predicted));

    let sum: f64 = scores.values().map(|v| v.as_f64().unwrap()).sum();
    assert!((sum - 1.0).abs() < 0.01, "scores summed to {sum}");

    let category: hydrorisk::RiskCategory = predicted.parse().unwrap();
    assert_eq!(json["advice"], category.advice());
}

#[tokio::test]
async fn test_predict_uses_defaults_for_missing_fields() {
    let app = create_test_app();
    let (status, json) = post_predict(app, "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["input"], json!({ "pH": 7.0, "turbidity": 1.0, "tds": 300.0 }));
}

#[tokio::test]
async fn test_predict_accepts_numeric_strings() {
    let app = create_test_app();
    let (status, json) = post_predict(app, r#"{"pH": "8.1", "tds": "1200"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["input"]["pH"], 8.1);
    assert_eq!(json["input"]["tds"], 1200.0);
}

#[tokio::test]
async fn test_predict_non_numeric_field_is_400() {
    let app = create_test_app();
    let (status, json) = post_predict(app, r#"{"pH": "bad"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("bad"));
}

#[tokio::test]
async fn test_predict_nan_string_is_400() {
    let app = create_test_app();
    let (status, json) = post_predict(app, r#"{"pH": "nan", "tds": 400}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("finite"));
}

#[tokio::test]
async fn test_predict_malformed_json_is_400() {
    let app = create_test_app();
    let (status, json) = post_predict(app, "{\"pH\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_predict_non_object_body_is_400() {
    let app = create_test_app();
    let (status, json) = post_predict(app, "[7.0, 1.0, 300]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_out_of_range_input_is_still_served() {
    let app = create_test_app();
    let (status, json) = post_predict(app, r#"{"pH": 100, "turbidity": -4, "tds": 9000}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["predicted_risk"].is_string());
}
