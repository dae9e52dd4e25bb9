//! Shared handle to the batch storage backend.

use std::fmt;
use std::sync::Arc;

use mity_storage::{FileData, ReadResponse, Storage, StorageResult, WriteRequest, WriteResponse};

/// Tracing target for the storage service.
const TRACING_TARGET: &str = "mity_server::service::storage";

/// Cheaply cloneable handle to a [`Storage`] backend.
///
/// Created once at start-up and shared by every request through
/// [`ServiceState`](crate::service::ServiceState).
#[derive(Clone)]
pub struct StorageService {
    inner: Arc<dyn Storage>,
}

impl StorageService {
    /// Wraps a storage backend.
    pub fn new(storage: impl Storage) -> Self {
        Self {
            inner: Arc::new(storage),
        }
    }

    /// Writes a batch of files, collecting per-file failures.
    pub async fn write_files(&self, requests: Vec<WriteRequest>) -> StorageResult<WriteResponse> {
        tracing::debug!(
            target: TRACING_TARGET,
            count = requests.len(),
            "dispatching batch write"
        );

        self.inner.write_files(requests).await
    }

    /// Reads a batch of files, collecting per-file failures.
    pub async fn read_files(&self, paths: &[String]) -> StorageResult<ReadResponse> {
        tracing::debug!(
            target: TRACING_TARGET,
            count = paths.len(),
            "dispatching batch read"
        );

        self.inner.read_files(paths).await
    }

    /// Reads a single file.
    pub async fn read_file(&self, path: &str) -> StorageResult<FileData> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            "dispatching single read"
        );

        self.inner.read_file(path).await
    }
}

impl fmt::Debug for StorageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageService").finish_non_exhaustive()
    }
}
