//! Shared fixtures for the HTTP integration tests.
#![allow(dead_code)]

use agrisync::application::ModelRegistry;
use agrisync::application::ml::ForestRegressor;
use agrisync::config::Config;
use agrisync::domain::market::Crop;
use agrisync::interfaces::http::{AppState, build_router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

const BOUNDARY: &str = "agrisync-test-boundary";

pub const PRICE_HEADER: &str = "Reported Date,Arrivals (Tonnes),Min Price (Rs./Quintal),Max Price (Rs./Quintal),Modal Price (Rs./Quintal),Rolling_Modal_Price,Lag_1_Month,Lag_2_Months,Price_Change_Rate";
pub const WEATHER_HEADER: &str = "Date,City,Temperature (°C),Humidity (%),Wind Speed (m/s),Pressure (hPa),Weather Condition,Description";

/// A temporary deployment directory plus the registry serving it.
pub struct TestApp {
    pub dir: TempDir,
    pub config: Config,
    pub registry: Arc<ModelRegistry>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::rooted_at(dir.path());
        config.public_base_url = "http://agrisync.test".to_string();
        config.price_forecast_start = NaiveDate::from_ymd_opt(2025, 3, 9);
        adjust(&mut config);

        std::fs::create_dir_all(&config.models_dir).unwrap();
        std::fs::create_dir_all(&config.data_dir).unwrap();

        let registry = Arc::new(ModelRegistry::new(config.clone()));
        Self {
            dir,
            config,
            registry,
        }
    }

    pub fn router(&self) -> Router {
        build_router(AppState::new(Arc::clone(&self.registry)))
    }

    pub fn install_price_fixture(&self, crop: Crop) {
        ForestRegressor::from_model(
            price_model(),
            self.config.models_dir.join(crop.model_file()),
        )
        .save()
        .unwrap();

        let rows = [
            "2024-01-01,20,1000,1400,1200,1200,1190,1180,0.01",
            "2024-02-01,30,1100,1500,1300,1250,1200,1190,0.02",
            "2024-03-01,25,1050,1450,1250,1225,1250,1200,-0.01",
        ];
        std::fs::write(
            self.config.data_dir.join(crop.dataset_file()),
            format!("{}\n{}\n", PRICE_HEADER, rows.join("\n")),
        )
        .unwrap();
    }

    /// Copies an ONNX graph from `tests/fixtures` into the models directory
    /// under `file_name`, together with its label list.
    pub fn install_onnx_fixture(&self, fixture: &str, file_name: &str, labels_file: &str, labels: &[&str]) {
        let source = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(fixture);
        std::fs::copy(source, self.config.models_dir.join(file_name)).unwrap();
        std::fs::write(
            self.config.models_dir.join(labels_file),
            serde_json::to_string(labels).unwrap(),
        )
        .unwrap();
    }

    pub fn install_weather_fixture(&self, latest_row: &str) {
        ForestRegressor::from_model(
            weather_model(),
            self.config.models_dir.join("weather_forecast.json"),
        )
        .save()
        .unwrap();

        let path = &self.config.weather_data_path;
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            path,
            format!(
                "{}\n2025-03-01,Pune,24.5,55,3.2,1011,Clear,clear sky\n{}\n",
                WEATHER_HEADER, latest_row
            ),
        )
        .unwrap();
    }
}

fn price_model() -> RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>> {
    let x: Vec<Vec<f64>> = (0..40)
        .map(|i| {
            let f = i as f64;
            vec![
                400.0 + f,
                (i % 12 + 1) as f64,
                20.0 + f,
                1000.0 + 5.0 * f,
                1400.0 + 5.0 * f,
                400.0,
                0.02,
                1200.0 + 5.0 * f,
                1190.0 + 5.0 * f,
                1180.0 + 5.0 * f,
                0.01,
            ]
        })
        .collect();
    let y: Vec<f64> = (0..40).map(|i| 1200.0 + 5.0 * i as f64).collect();
    fit(x, y)
}

fn weather_model() -> RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>> {
    let x: Vec<Vec<f64>> = (0..30)
        .map(|i| vec![(i % 7 + 1) as f64, 20.0 + (i % 10) as f64, 60.0, 4.0, 1010.0])
        .collect();
    let y: Vec<f64> = (0..30).map(|i| 20.0 + (i % 10) as f64).collect();
    fit(x, y)
}

fn fit(x: Vec<Vec<f64>>, y: Vec<f64>) -> RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>> {
    let x = DenseMatrix::from_2d_vec(&x).unwrap();
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(5)
        .with_max_depth(4);
    RandomForestRegressor::fit(&x, &y, params).unwrap()
}

/// Solid-colour PNG.
pub fn png_bytes(color: [u8; 3], width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// POST with a single multipart part.
pub fn multipart_request(uri: &str, field: &str, filename: Option<&str>, bytes: &[u8]) -> Request<Body> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
