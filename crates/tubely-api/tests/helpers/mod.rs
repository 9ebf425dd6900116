//! Test helpers: build the router over in-memory collaborators.
//!
//! Run from workspace root: `cargo test -p tubely-api`. No database, object
//! store or ffmpeg install is needed; every collaborator is a double from
//! [doubles](doubles).

#![allow(dead_code)]

pub mod auth;
pub mod doubles;
pub mod fixtures;

use axum::Router;
use axum_test::TestServer;
use doubles::{FakeProbe, FakeTranscoder, InMemoryVideoRepository, RecordingStorage};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tubely_api::auth::JwtValidator;
use tubely_api::services::ingestion::{IngestionDeps, IngestionPipeline, IngestionSettings};
use tubely_api::setup::routes::{build_router, HttpSettings};
use tubely_api::AppState;

/// Knobs for a single test application.
pub struct TestOptions {
    pub probe: FakeProbe,
    pub transcoder: FakeTranscoder,
    pub storage: RecordingStorage,
    pub videos: InMemoryVideoRepository,
    pub max_upload_size_bytes: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            probe: FakeProbe::with_geometry(1920, 1080),
            transcoder: FakeTranscoder::new(),
            storage: RecordingStorage::new(),
            videos: InMemoryVideoRepository::new(),
            max_upload_size_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Test application: server plus handles on every double.
pub struct TestApp {
    pub server: TestServer,
    /// The same router, for requests `TestServer` cannot express (streamed bodies, timeouts).
    pub router: Router,
    pub probe: Arc<FakeProbe>,
    pub transcoder: Arc<FakeTranscoder>,
    pub storage: Arc<RecordingStorage>,
    pub videos: Arc<InMemoryVideoRepository>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files left behind in the upload temp dir.
    pub fn leftover_temp_files(&self) -> Vec<String> {
        list_dir(self.temp_dir.path())
    }
}

pub fn list_dir(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read temp dir")
        .map(|entry| {
            entry
                .expect("Failed to read dir entry")
                .file_name()
                .to_string_lossy()
                .to_string()
        })
        .collect()
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default())
}

pub fn setup_test_app_with(options: TestOptions) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let probe = Arc::new(options.probe);
    let transcoder = Arc::new(options.transcoder);
    let storage = Arc::new(options.storage);
    let videos = Arc::new(options.videos);

    let pipeline = IngestionPipeline::new(
        IngestionDeps {
            auth: Arc::new(JwtValidator::new(auth::TEST_JWT_SECRET, auth::TEST_ISSUER)),
            videos: videos.clone(),
            storage: storage.clone(),
            probe: probe.clone(),
            transcoder: transcoder.clone(),
        },
        IngestionSettings {
            temp_dir: temp_dir.path().to_path_buf(),
            max_concurrent_transcodes: 2,
        },
    );

    let state = Arc::new(AppState {
        ingestion: Arc::new(pipeline),
        videos: videos.clone(),
        environment: "test".to_string(),
    });

    let settings = HttpSettings {
        cors_origins: vec!["*".to_string()],
        max_upload_size_bytes: options.max_upload_size_bytes,
        request_timeout: Duration::from_secs(30),
        concurrency_limit: 64,
    };
    let router = build_router(state, &settings).expect("Failed to build router");
    let server = TestServer::new(router.clone()).expect("Failed to create test server");

    TestApp {
        server,
        router,
        probe,
        transcoder,
        storage,
        videos,
        temp_dir,
    }
}
