mod common;

use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;

use textlens::api::{recognition_router, RecognitionState};
use textlens::ocr::OcrProvider;

async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_recognition(dir: &TempDir) -> (String, bool) {
    let config = common::test_config(dir.path(), "unused");
    let ocr = OcrProvider::new(&config.ocr).unwrap();
    let available = ocr.is_available();
    let state = RecognitionState::new(config, ocr).unwrap();
    (spawn_app(recognition_router(state)).await, available)
}

async fn request_ocr(base: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/ocr"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn missing_file_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (base, _) = spawn_recognition(&dir).await;

    let resp = request_ocr(&base, json!({})).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No file path provided");
}

#[tokio::test]
async fn empty_file_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (base, _) = spawn_recognition(&dir).await;

    let resp = request_ocr(&base, json!({ "file_path": "" })).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn traversal_reference_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (base, _) = spawn_recognition(&dir).await;

    let resp = request_ocr(&base, json!({ "file_path": "../etc/passwd" })).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body.get("error").is_some(), "{body}");
}

#[tokio::test]
async fn unknown_file_reference_is_a_server_error() {
    let dir = TempDir::new().unwrap();
    let (base, _) = spawn_recognition(&dir).await;

    let resp = request_ocr(&base, json!({ "file_path": "never_stored.jpg" })).await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body.get("error").is_some(), "{body}");
}

#[tokio::test]
async fn undecodable_stored_file_maps_to_415() {
    let dir = TempDir::new().unwrap();
    common::write_file(dir.path(), "bad.png", &common::garbage_bytes());
    let (base, _) = spawn_recognition(&dir).await;

    let resp = request_ocr(&base, json!({ "file_path": "bad.png" })).await;
    assert_eq!(resp.status(), 415);
    let body: Value = resp.json().await.unwrap();
    assert!(body.get("error").is_some(), "{body}");
    assert!(body.get("extracted_text").is_none(), "{body}");
}

#[tokio::test]
async fn stored_jpeg_yields_extracted_text_key() {
    let dir = TempDir::new().unwrap();
    common::write_file(dir.path(), "blank.jpg", &common::jpeg_bytes(200, 100));
    let (base, available) = spawn_recognition(&dir).await;
    if !available {
        eprintln!("skipping: Tesseract not installed");
        return;
    }

    let resp = request_ocr(&base, json!({ "file_path": "blank.jpg" })).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    // A blank image may extract nothing, but the key must exist.
    assert!(body.get("extracted_text").is_some(), "{body}");
}

#[tokio::test]
async fn recognition_service_re_normalizes_what_it_is_given() {
    // A BMP reference is not canonical and the ingress never produced it,
    // yet the service must still accept and normalize it itself.
    let dir = TempDir::new().unwrap();
    common::write_file(
        dir.path(),
        "direct.bmp",
        &common::image_bytes(120, 90, image::ImageFormat::Bmp),
    );
    let (base, available) = spawn_recognition(&dir).await;
    if !available {
        eprintln!("skipping: Tesseract not installed");
        return;
    }

    let resp = request_ocr(&base, json!({ "file_path": "direct.bmp" })).await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn health_reports_engine_availability() {
    let dir = TempDir::new().unwrap();
    let (base, available) = spawn_recognition(&dir).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ocr"]["available"], available);
}
