//! Object store client wrapping an OpenDAL operator.

use bytes::Bytes;
use opendal::{Operator, Writer};

use crate::TRACING_TARGET;
#[cfg(feature = "gcs")]
use crate::config::GcsConfig;
use crate::error::{StorageError, StorageResult};

/// Attributes reported by the store for a single object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttributes {
    /// Object size in bytes.
    pub size: u64,
    /// Content type, if the store keeps one.
    pub content_type: Option<String>,
}

/// Long-lived handle to a single bucket.
///
/// Cloning is cheap and every clone shares the same underlying session, so a
/// single client is created at start-up and shared by all requests.
#[derive(Clone)]
pub struct ObjectStoreClient {
    operator: Operator,
    bucket: String,
}

impl ObjectStoreClient {
    /// Connects to a Google Cloud Storage bucket.
    #[cfg(feature = "gcs")]
    #[cfg_attr(docsrs, doc(cfg(feature = "gcs")))]
    pub fn connect(config: &GcsConfig) -> StorageResult<Self> {
        use opendal::layers::TimeoutLayer;
        use opendal::services;

        config.validate()?;

        let mut builder = services::Gcs::default().bucket(&config.bucket);
        if let Some(credential) = config.credential.as_deref() {
            builder = builder.credential(credential.trim());
        }

        let timeout = config.operation_timeout();
        let operator = Operator::new(builder)
            .map(|op| {
                op.layer(
                    TimeoutLayer::new()
                        .with_timeout(timeout)
                        .with_io_timeout(timeout),
                )
                .finish()
            })
            .map_err(|err| StorageError::init(err.to_string()))?;

        tracing::info!(
            target: TRACING_TARGET,
            project_id = %config.project_id,
            bucket = %config.bucket,
            timeout_secs = config.operation_timeout,
            "Object store client initialized"
        );

        Ok(Self {
            operator,
            bucket: config.bucket.clone(),
        })
    }

    /// Wraps an already configured operator.
    pub fn from_operator(operator: Operator, bucket: impl Into<String>) -> Self {
        Self {
            operator,
            bucket: bucket.into(),
        }
    }

    /// Returns the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Opens a write stream for `path`.
    ///
    /// Nothing is visible in the store until the writer is closed.
    pub async fn writer(&self, path: &str, content_type: &str) -> StorageResult<Writer> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            content_type = %content_type,
            "Opening writer"
        );

        let writer = if self.operator.info().full_capability().write_with_content_type {
            self.operator
                .writer_with(path)
                .content_type(content_type)
                .await
        } else {
            self.operator.writer(path).await
        };

        writer.map_err(|err| StorageError::write(err.to_string()))
    }

    /// Fetches the attributes of the object at `path`.
    pub async fn stat(&self, path: &str) -> StorageResult<ObjectAttributes> {
        let meta = self.operator.stat(path).await.map_err(|err| {
            if err.kind() == opendal::ErrorKind::NotFound {
                StorageError::not_found(path)
            } else {
                StorageError::from(err)
            }
        })?;

        Ok(ObjectAttributes {
            size: meta.content_length(),
            content_type: meta
                .content_type()
                .filter(|content_type| !content_type.is_empty())
                .map(str::to_owned),
        })
    }

    /// Reads the whole object at `path` into memory.
    ///
    /// The reader is dropped before returning, whether or not the read
    /// succeeded.
    pub async fn read(&self, path: &str) -> StorageResult<Bytes> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            "Reading object"
        );

        let reader = self
            .operator
            .reader(path)
            .await
            .map_err(|err| StorageError::read(format!("failed to create reader: {err}")))?;

        let buffer = reader
            .read(..)
            .await
            .map_err(|err| StorageError::read(format!("failed to read content: {err}")))?;

        let content = buffer.to_bytes();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = content.len(),
            "Object read complete"
        );

        Ok(content)
    }
}

impl std::fmt::Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreClient")
            .field("scheme", &self.operator.info().scheme())
            .field("bucket", &self.bucket)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use opendal::services;

    use super::*;

    fn memory_client() -> ObjectStoreClient {
        let operator = Operator::new(services::Memory::default())
            .unwrap()
            .finish();
        ObjectStoreClient::from_operator(operator, "test-bucket")
    }

    #[tokio::test]
    async fn stat_missing_object_is_not_found() {
        let client = memory_client();
        let err = client.stat("missing.bin").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn written_object_can_be_read() {
        let client = memory_client();

        let mut writer = client.writer("notes.txt", "text/plain").await.unwrap();
        writer.write(Bytes::from_static(b"hello")).await.unwrap();
        writer.close().await.unwrap();

        let attrs = client.stat("notes.txt").await.unwrap();
        assert_eq!(attrs.size, 5);

        let content = client.read("notes.txt").await.unwrap();
        assert_eq!(content, Bytes::from_static(b"hello"));
    }

    #[test]
    fn debug_shows_bucket() {
        let client = memory_client();
        assert!(format!("{client:?}").contains("test-bucket"));
    }
}
