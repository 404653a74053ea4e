//! Test helpers: build AppState and router for integration tests.
//!
//! Each app gets its own scratch root so tests can assert that every
//! workspace is gone once a request finishes.

#![allow(dead_code)]

pub mod extractors;

use audex_api::setup::routes;
use audex_api::state::AppState;
use audex_core::Config;
use audex_processing::AudioExtractor;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus the scratch root it writes into.
pub struct TestApp {
    pub server: TestServer,
    pub scratch: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn scratch_root(&self) -> &Path {
        self.scratch.path()
    }

    /// Number of entries left under the scratch root.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .expect("Failed to read scratch root")
            .count()
    }
}

pub fn create_test_config(scratch: &Path) -> Config {
    Config {
        scratch_dir: scratch.to_path_buf(),
        ..Config::default()
    }
}

pub fn setup_test_app(extractor: Arc<dyn AudioExtractor>) -> TestApp {
    setup_test_app_with(extractor, |_| {})
}

/// Like `setup_test_app`, with a hook to adjust the config first.
pub fn setup_test_app_with<F>(extractor: Arc<dyn AudioExtractor>, configure: F) -> TestApp
where
    F: FnOnce(&mut Config),
{
    let scratch = tempfile::tempdir().expect("Failed to create scratch directory");
    let mut config = create_test_config(scratch.path());
    configure(&mut config);

    let state = Arc::new(AppState::new(config, extractor, None));
    let app = routes::build_router(state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, scratch }
}

/// Multipart form with a single `video` file part.
pub fn video_form(filename: &str, data: &[u8]) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::copy_from_slice(data))
        .file_name(filename)
        .mime_type("video/mp4");
    MultipartForm::new().add_part("video", part)
}
