//! In-memory collaborators for the ingestion pipeline.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tubely_core::{AppError, StorageBackend, Video};
use tubely_db::VideoRepository;
use tubely_processing::{
    FastStartTranscoder, MediaProbe, ProbeError, StreamGeometry, TranscodeError,
};
use tubely_storage::{Storage, StorageError, StorageResult};
use uuid::Uuid;

/// Marker the fake transcoder prepends, so tests can tell processed bytes from raw ones.
pub const FASTSTART_MARKER: &[u8] = b"faststart:";

pub struct FakeProbe {
    geometry: Option<(u32, u32)>,
    calls: AtomicUsize,
}

impl FakeProbe {
    pub fn with_geometry(width: u32, height: u32) -> Self {
        Self {
            geometry: Some((width, height)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            geometry: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn probe(&self, _path: &Path) -> Result<StreamGeometry, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.geometry {
            Some((width, height)) => StreamGeometry::new(width, height),
            None => Err(ProbeError::Failed {
                status: Some(1),
                stderr: "moov atom not found".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemuxBehavior {
    Copy,
    Fail,
    Hang,
}

/// Copies the source to the output with [`FASTSTART_MARKER`] in front.
pub struct FakeTranscoder {
    behavior: RemuxBehavior,
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
    abandoned: Arc<AtomicBool>,
}

/// Flags the remux as abandoned when its future is dropped mid-run.
struct AbandonGuard(Arc<AtomicBool>);

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl FakeTranscoder {
    fn with_behavior(behavior: RemuxBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            abandoned: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn new() -> Self {
        Self::with_behavior(RemuxBehavior::Copy)
    }

    /// Writes a partial output, then fails.
    pub fn failing() -> Self {
        Self::with_behavior(RemuxBehavior::Fail)
    }

    /// Writes a partial output, then never finishes.
    pub fn hanging() -> Self {
        Self::with_behavior(RemuxBehavior::Hang)
    }

    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether a hanging remux was dropped before it finished.
    pub fn was_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FastStartTranscoder for FakeTranscoder {
    async fn remux(&self, source: &Path, output: &Path) -> Result<(), TranscodeError> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), output.to_path_buf()));

        match self.behavior {
            RemuxBehavior::Fail => {
                tokio::fs::write(output, b"partial")
                    .await
                    .map_err(TranscodeError::Spawn)?;
                Err(TranscodeError::Failed {
                    status: Some(1),
                    stderr: "Invalid data found when processing input".to_string(),
                })
            }
            RemuxBehavior::Hang => {
                tokio::fs::write(output, b"partial")
                    .await
                    .map_err(TranscodeError::Spawn)?;
                let _guard = AbandonGuard(self.abandoned.clone());
                std::future::pending::<()>().await;
                Ok(())
            }
            RemuxBehavior::Copy => {
                let raw = tokio::fs::read(source).await.map_err(TranscodeError::Spawn)?;
                let mut processed = FASTSTART_MARKER.to_vec();
                processed.extend_from_slice(&raw);
                tokio::fs::write(output, processed)
                    .await
                    .map_err(TranscodeError::Spawn)
            }
        }
    }
}

/// One completed `put_file` call.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub source_path: PathBuf,
}

pub struct RecordingStorage {
    fail: bool,
    objects: Mutex<Vec<StoredObject>>,
}

pub const TEST_BUCKET_URL: &str = "https://tubely-test.s3.us-east-1.amazonaws.com";

impl RecordingStorage {
    pub fn new() -> Self {
        Self {
            fail: false,
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<String> {
        if self.fail {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        let bytes = tokio::fs::read(path).await?;
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            bytes,
            source_path: path.to_path_buf(),
        });
        Ok(self.object_url(key))
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", TEST_BUCKET_URL, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_updates: bool,
    fail_ping: bool,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self {
            videos: Mutex::new(HashMap::new()),
            fail_updates: false,
            fail_ping: false,
        }
    }

    pub fn failing_updates() -> Self {
        Self {
            fail_updates: true,
            ..Self::new()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail_ping: true,
            ..Self::new()
        }
    }

    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        if self.fail_updates {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Video not found".to_string())),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_ping {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}
