pub mod fakes;

use axum_test::TestServer;
use fakes::{FakeSecretStore, FakeTextDetector, MemoryStorage};
use ingesta_api::setup::{routes::setup_routes, services::build_pipeline};
use ingesta_api::AppState;
use ingesta_core::Config;
use ingesta_services::TextDetector;
use std::collections::HashMap;
use std::sync::Arc;

/// Base64 of 32 bytes of 0x2a
pub const TEST_KEY: &str = "KioqKioqKioqKioqKioqKioqKioqKioqKioqKioqKio=";

/// Returns the versioned API path.
/// Usage: `api_path("/uploads")` -> `/api/v1/uploads`.
pub fn api_path(path: &str) -> String {
    format!("{}{}", ingesta_api::constants::API_PREFIX, path)
}

pub struct TestApp {
    pub server: TestServer,
    pub ocr: Arc<FakeTextDetector>,
    pub secrets: Arc<FakeSecretStore>,
    pub storage: Arc<MemoryStorage>,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("BUCKET_NAME", "acme-docs"),
        ("KEY_NAME", "ingesta-key"),
        ("PROJECT_ID", "acme"),
        ("BUCKET_FOLDER_NAME", "ingesta"),
        ("UPLOAD_RETRY_DELAY_SECS", "0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    Config::from_lookup(|name| vars.get(name).cloned()).expect("test config")
}

/// Router with the real pipeline and in-process fakes behind it.
pub async fn setup_test_app(overrides: &[(&str, &str)]) -> TestApp {
    let ocr = Arc::new(FakeTextDetector::with_text("INVOICE #2024-001 Total: 120.00"));
    build_test_app(overrides, ocr.clone(), ocr)
}

/// Same as [`setup_test_app`] with a custom OCR backend in the pipeline.
pub async fn setup_test_app_with_detector(
    overrides: &[(&str, &str)],
    detector: Arc<dyn TextDetector>,
) -> TestApp {
    let ocr = Arc::new(FakeTextDetector::with_text(""));
    build_test_app(overrides, ocr, detector)
}

fn build_test_app(
    overrides: &[(&str, &str)],
    ocr: Arc<FakeTextDetector>,
    detector: Arc<dyn TextDetector>,
) -> TestApp {
    let config = test_config(overrides);
    let secrets = Arc::new(FakeSecretStore::new(TEST_KEY));
    let storage = Arc::new(MemoryStorage::default());

    let pipeline = build_pipeline(&config, detector, secrets.clone(), storage.clone());
    let state = Arc::new(AppState::new(config.clone(), pipeline));
    let router = setup_routes(&config, state.clone()).expect("routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        ocr,
        secrets,
        storage,
        state,
    }
}
