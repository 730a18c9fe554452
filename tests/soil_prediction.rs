//! /predict-soil across every tier of the fallback chain.

mod common;

use agrisync::application::ml::PrototypeClassifier;
use agrisync::application::soil_service::{
    FALLBACK_MODEL_FILE, LABELS_FILE, PROTOTYPE_MODEL_FILE, is_known_soil,
};
use axum::http::StatusCode;
use common::{TestApp, json_body, multipart_request, png_bytes};
use tower::ServiceExt;

#[tokio::test]
async fn test_valid_image_gets_known_label() {
    let app = TestApp::new();
    let request = multipart_request("/predict-soil", "file", Some("soil.png"), &png_bytes([165, 105, 70], 64, 48));

    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "success");
    assert!(is_known_soil(json["prediction"].as_str().unwrap()));
    let confidence = json["confidence"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&confidence));
    assert!(json.get("warning").is_none());
    assert!(json["crops"].is_array());
    assert!(json["care"].is_array());
}

#[tokio::test]
async fn test_synthesized_fallback_is_persisted() {
    let app = TestApp::new();
    let request = multipart_request("/predict-soil", "file", Some("soil.png"), &png_bytes([50, 45, 40], 32, 32));
    let json = json_body(app.router().oneshot(request).await.unwrap()).await;

    assert_eq!(json["status"], "success");
    assert_eq!(json["prediction"], "Black Soil");
    assert!(app.config.models_dir.join(PROTOTYPE_MODEL_FILE).exists());
    assert!(app.config.models_dir.join("class_names.json").exists());
}

#[tokio::test]
async fn test_fallback_model_confidence_is_deterministic() {
    let app = TestApp::with_config(|c| c.soil_synthesize_fallback = false);
    PrototypeClassifier::synthesize_soil()
        .save(&app.config.models_dir.join(PROTOTYPE_MODEL_FILE))
        .unwrap();

    let image = png_bytes([125, 90, 95], 40, 40);
    let mut confidences = Vec::new();
    for _ in 0..2 {
        let request = multipart_request("/predict-soil", "file", Some("soil.png"), &image);
        let json = json_body(app.router().oneshot(request).await.unwrap()).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["prediction"], "Clay soil");
        confidences.push(json["confidence"].as_f64().unwrap());
    }
    assert_eq!(confidences[0], confidences[1]);
}

#[tokio::test]
async fn test_fallback_onnx_model_is_used() {
    let app = TestApp::new();
    app.install_onnx_fixture(
        "soil_colour_classifier.onnx",
        FALLBACK_MODEL_FILE,
        LABELS_FILE,
        &["Alluvial soil", "Black Soil", "Clay soil", "Red soil"],
    );

    let image = png_bytes([160, 110, 60], 50, 30);
    let mut confidences = Vec::new();
    for _ in 0..2 {
        let request = multipart_request("/predict-soil", "file", Some("soil.png"), &image);
        let json = json_body(app.router().oneshot(request).await.unwrap()).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["prediction"], "Red soil");
        assert!(json.get("warning").is_none());
        confidences.push(json["confidence"].as_f64().unwrap());
    }

    assert_eq!(confidences[0], confidences[1]);
    assert!(confidences[0] > 25.0 && confidences[0] <= 100.0);
    assert!(!app.config.models_dir.join(PROTOTYPE_MODEL_FILE).exists());
    assert!(app.registry.status().soil_model);
}

#[tokio::test]
async fn test_heuristic_when_no_classifier() {
    let app = TestApp::with_config(|c| c.soil_synthesize_fallback = false);
    let request = multipart_request("/predict-soil", "file", Some("soil.png"), &png_bytes([40, 40, 40], 20, 20));
    let json = json_body(app.router().oneshot(request).await.unwrap()).await;

    assert_eq!(json["status"], "fallback_analysis");
    assert_eq!(json["prediction"], "Black Soil");
    let confidence = json["confidence"].as_f64().unwrap();
    assert!((60.0..80.0).contains(&confidence));
    assert!(json["notes"].as_str().unwrap().starts_with("Basic Visual Analysis: "));
    assert_eq!(json["warning"], "AI model unavailable - using basic visual analysis");
}

#[tokio::test]
async fn test_undecodable_image() {
    let app = TestApp::new();
    let request = multipart_request("/predict-soil", "file", Some("soil.png"), b"this is not a png");
    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["prediction"], "Mixed Soil");
    assert_eq!(json["confidence"], 50.0);
    assert_eq!(json["status"], "service_unavailable");
    assert_eq!(json["warning"], "Service temporarily unavailable");
}

#[tokio::test]
async fn test_request_without_file() {
    let app = TestApp::new();
    let request = multipart_request("/predict-soil", "comment", None, b"no picture today");
    let json = json_body(app.router().oneshot(request).await.unwrap()).await;

    assert_eq!(json["prediction"], "Analysis Error");
    assert_eq!(json["confidence"], 0.0);
    assert_eq!(json["status"], "error");
    assert_eq!(json["warning"], "Image processing failed");
}

#[tokio::test]
async fn test_any_named_file_part_is_accepted() {
    let app = TestApp::new();
    let request = multipart_request("/predict-soil", "image", Some("field.png"), &png_bytes([180, 170, 150], 16, 16));
    let json = json_body(app.router().oneshot(request).await.unwrap()).await;
    assert_eq!(json["status"], "success");
}

#[tokio::test]
async fn test_concurrent_first_requests_load_once() {
    let app = TestApp::new();
    let router = app.router();

    let requests = (0..6).map(|_| {
        let router = router.clone();
        let request = multipart_request("/predict-soil", "file", Some("soil.png"), &png_bytes([170, 150, 125], 24, 24));
        tokio::spawn(async move { json_body(router.oneshot(request).await.unwrap()).await })
    });

    for handle in requests.collect::<Vec<_>>() {
        let json = handle.await.unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["prediction"], "Alluvial soil");
    }
    assert!(app.registry.status().soil_model);
}
