//! End-to-end tests for the HTTP API against fixture artifacts.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use sleep_quality::http::{create_router, AppState};
use sleep_quality::ArtifactPaths;

fn fixture_paths() -> ArtifactPaths {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    ArtifactPaths::new(
        format!("{dir}/sleep_scaler.json"),
        format!("{dir}/sleep_model.json"),
    )
}

fn loaded_app() -> Router {
    create_router(AppState::load(&fixture_paths()))
}

/// Same scaler, but the network output is not squashed into [0, 1]
fn unbounded_output_app() -> Router {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    let paths = ArtifactPaths::new(
        format!("{dir}/sleep_scaler.json"),
        format!("{dir}/sleep_model_linear.json"),
    );
    create_router(AppState::load(&paths))
}

fn unloaded_app() -> Router {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths::new(
        dir.path().join("missing_scaler.json"),
        dir.path().join("missing_model.json"),
    );
    create_router(AppState::load(&paths))
}

fn survey(durations: [&str; 3]) -> Value {
    json!({
        "age": 20,
        "time_of_day_pattern": "Morning",
        "sleep_delay_bucket": "Kurang dari 30 menit",
        "fomo_scores": [1, 2, 1, 2, 1, 2, 1, 2, 1, 2],
        "app_duration_1": durations[0],
        "app_duration_2": durations[1],
        "app_duration_3": durations[2]
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_root_welcome() {
    let (status, body) = get(loaded_app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("API is running"));
}

#[tokio::test]
async fn test_health_ignores_artifacts() {
    let (status, body) = get(unloaded_app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_ready_when_loaded() {
    let (status, body) = get(loaded_app(), "/api/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["model_loaded"], true);
    assert!(body["instance_id"].is_string());
}

#[tokio::test]
async fn test_not_ready_without_artifacts() {
    let (status, body) = get(unloaded_app(), "/api/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["model_loaded"], false);
    assert!(body["detail"].as_str().unwrap().contains("missing_scaler.json"));
}

#[tokio::test]
async fn test_predict_good_sleep() {
    // Total 90 minutes: z = -1.5, p = 0.1824
    let payload = survey(["1:00", "0:20", "0:10"]).to_string();
    let (status, body) = post_json(loaded_app(), "/api/predict", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "Good");
    assert_eq!(body["confidence"], "81.76");
    assert_eq!(
        body["message"]["recommendations"],
        Value::Array(Vec::new())
    );
}

#[tokio::test]
async fn test_predict_poor_sleep() {
    // Total 360 minutes: z = 3, p = 0.9526
    let payload = survey(["3:00", "2:00", "1:00"]).to_string();
    let (status, body) = post_json(loaded_app(), "/api/predict", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "Poor");
    assert_eq!(body["confidence"], "95.26");
    assert_eq!(body["message"]["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_predict_accepts_survey_form_field_names() {
    let payload = json!({
        "usia": 20,
        "pola_waktu": "Pagi",
        "jeda_tidur": "Kurang dari 30 menit",
        "fomo_scores": [1, 2, 1, 2, 1, 2, 1, 2, 1, 2],
        "durasi_app1": "1:00",
        "durasi_app2": "0:20",
        "durasi_app3": "0:10"
    })
    .to_string();
    let (status, body) = post_json(loaded_app(), "/api/predict", payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "Good");
}

#[tokio::test]
async fn test_predict_unknown_delay_label_is_lenient() {
    let mut payload = survey(["1:00", "0:20", "0:10"]);
    payload["sleep_delay_bucket"] = json!("sometime later");
    let (status, body) = post_json(loaded_app(), "/api/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("prediction").is_some());
}

#[tokio::test]
async fn test_predict_rejects_age_out_of_range() {
    let mut payload = survey(["1:00", "0:20", "0:10"]);
    payload["age"] = json!(30);
    let (status, body) = post_json(loaded_app(), "/api/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("30"));
}

#[tokio::test]
async fn test_predict_reports_every_violation() {
    let mut payload = survey(["90", "0:20", "0:10"]);
    payload["fomo_scores"] = json!([1, 2, 3]);
    let (status, body) = post_json(loaded_app(), "/api/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("app_duration_1"));
}

#[tokio::test]
async fn test_predict_rejects_missing_field() {
    let mut payload = survey(["1:00", "0:20", "0:10"]);
    payload.as_object_mut().unwrap().remove("fomo_scores");
    let (status, body) = post_json(loaded_app(), "/api/predict", payload.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("fomo_scores"));
}

#[tokio::test]
async fn test_predict_rejects_malformed_json() {
    let (status, body) =
        post_json(loaded_app(), "/api/predict", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_predict_without_artifacts_returns_error_payload() {
    let payload = survey(["1:00", "0:20", "0:10"]).to_string();
    let (status, body) = post_json(unloaded_app(), "/api/predict", payload).await;

    assert_eq!(status, StatusCode::OK);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Failed to load model files on the server."));
    assert!(body.get("prediction").is_none());
}

#[tokio::test]
async fn test_predict_inference_failure_returns_error_payload() {
    // Total 570 minutes: the linear output is 6.5
    let payload = survey(["9:00", "0:20", "0:10"]).to_string();
    let (status, body) = post_json(unbounded_output_app(), "/api/predict", payload).await;

    assert_eq!(status, StatusCode::OK);
    let message = body["error"].as_str().unwrap();
    assert!(
        message.starts_with("Failed during scaling or prediction"),
        "{message}"
    );
    assert!(body.get("prediction").is_none());
}
