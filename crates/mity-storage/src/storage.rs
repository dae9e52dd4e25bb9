//! Batch write and read orchestration.

use async_trait::async_trait;
use futures::StreamExt;
use opendal::Writer;

use crate::TRACING_TARGET;
use crate::client::ObjectStoreClient;
use crate::error::{StorageError, StorageResult};
use crate::mime::detect_content_type;
use crate::types::{
    ByteStream, FileData, FileMetadata, ReadError, ReadResponse, WriteError, WriteRequest,
    WriteResponse,
};

/// Batch file operations against an object store.
///
/// Per-file failures are reported inside the returned response and never
/// abort the remaining files. The outer error is reserved for failures that
/// prevent the batch from running at all.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Writes every request in order.
    async fn write_files(&self, requests: Vec<WriteRequest>) -> StorageResult<WriteResponse>;

    /// Reads every path in order, loading each object fully into memory.
    async fn read_files(&self, paths: &[String]) -> StorageResult<ReadResponse>;

    /// Reads a single object, returning its failure directly.
    async fn read_file(&self, path: &str) -> StorageResult<FileData>;
}

/// [`Storage`] implementation backed by an [`ObjectStoreClient`].
#[derive(Debug, Clone)]
pub struct ObjectStorage {
    client: ObjectStoreClient,
}

impl ObjectStorage {
    /// Creates a new batch orchestrator over `client`.
    pub fn new(client: ObjectStoreClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &ObjectStoreClient {
        &self.client
    }

    async fn write_one(&self, request: WriteRequest) -> StorageResult<FileMetadata> {
        if request.path.is_empty() {
            return Err(StorageError::invalid_path("object path is empty"));
        }

        let content_type = request.effective_content_type().to_owned();
        let WriteRequest {
            path, mut content, ..
        } = request;

        let mut writer = self.client.writer(&path, &content_type).await?;

        let written = match copy_content(&mut writer, &mut content).await {
            Ok(written) => written,
            Err(err) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        path = %path,
                        error = %abort_err,
                        "Failed to abort writer"
                    );
                }
                return Err(err);
            }
        };

        writer
            .close()
            .await
            .map_err(|err| StorageError::write(err.to_string()))?;

        let attrs = self
            .client
            .stat(&path)
            .await
            .map_err(|err| StorageError::confirmation(err.to_string()))?;

        Ok(FileMetadata {
            name: path,
            content_type: attrs.content_type.unwrap_or(content_type),
            size: written,
        })
    }

    async fn read_one(&self, path: &str) -> StorageResult<FileData> {
        if path.is_empty() {
            return Err(StorageError::invalid_path("object path is empty"));
        }

        let attrs = self
            .client
            .stat(path)
            .await
            .map_err(|err| StorageError::attributes(err.to_string()))?;

        let content = self.client.read(path).await?;

        let metadata = FileMetadata {
            name: path.to_owned(),
            content_type: attrs
                .content_type
                .unwrap_or_else(|| detect_content_type(path).to_owned()),
            size: attrs.size,
        };

        Ok(FileData { metadata, content })
    }
}

/// Copies the content stream into the writer, returning the bytes transferred.
async fn copy_content(writer: &mut Writer, content: &mut ByteStream) -> StorageResult<u64> {
    let mut written = 0u64;

    while let Some(chunk) = content.next().await {
        let chunk = chunk.map_err(StorageError::Content)?;
        if chunk.is_empty() {
            continue;
        }

        written += chunk.len() as u64;
        writer
            .write(chunk)
            .await
            .map_err(|err| StorageError::write(err.to_string()))?;
    }

    Ok(written)
}

#[async_trait]
impl Storage for ObjectStorage {
    async fn write_files(&self, requests: Vec<WriteRequest>) -> StorageResult<WriteResponse> {
        let mut response = WriteResponse::with_capacity(requests.len());

        for request in requests {
            let path = request.path.clone();

            match self.write_one(request).await {
                Ok(metadata) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        path = %metadata.name,
                        size = metadata.size,
                        content_type = %metadata.content_type,
                        "File written"
                    );
                    response.files_written.push(metadata);
                }
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        path = %path,
                        error = %err,
                        "File write failed"
                    );
                    response.errors.push(WriteError {
                        file_path: path,
                        error: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            bucket = %self.client.bucket(),
            written = response.files_written.len(),
            failed = response.errors.len(),
            "Batch write complete"
        );

        Ok(response)
    }

    async fn read_files(&self, paths: &[String]) -> StorageResult<ReadResponse> {
        let mut response = ReadResponse::with_capacity(paths.len());

        for path in paths {
            match self.read_one(path).await {
                Ok(file) => response.files.push(file),
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        path = %path,
                        error = %err,
                        "File read failed"
                    );
                    response.errors.push(ReadError {
                        file_path: path.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            bucket = %self.client.bucket(),
            read = response.files.len(),
            failed = response.errors.len(),
            "Batch read complete"
        );

        Ok(response)
    }

    async fn read_file(&self, path: &str) -> StorageResult<FileData> {
        self.read_one(path).await
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use bytes::Bytes;
    use futures::stream;
    use opendal::{Operator, services};

    use super::*;

    fn memory_storage() -> ObjectStorage {
        let operator = Operator::new(services::Memory::default())
            .unwrap()
            .finish();
        ObjectStorage::new(ObjectStoreClient::from_operator(operator, "test-bucket"))
    }

    fn failing_request(path: &str) -> WriteRequest {
        let content = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::other("connection reset")),
        ])
        .boxed();
        WriteRequest::new(path, content)
    }

    #[tokio::test]
    async fn write_batch_accumulates_failures() {
        let storage = memory_storage();

        let requests = vec![
            WriteRequest::from_bytes("one.txt", "first"),
            failing_request("two.txt"),
            WriteRequest::from_bytes("three.mp4", "third"),
            failing_request("four.txt"),
            WriteRequest::from_bytes("", "empty path"),
        ];

        let response = storage.write_files(requests).await.unwrap();

        assert_eq!(response.len(), 5);
        let written: Vec<_> = response
            .files_written
            .iter()
            .map(|file| file.name.as_str())
            .collect();
        assert_eq!(written, ["one.txt", "three.mp4"]);

        let failed: Vec<_> = response
            .errors
            .iter()
            .map(|err| err.file_path.as_str())
            .collect();
        assert_eq!(failed, ["two.txt", "four.txt", ""]);
        assert!(response.errors[0].error.contains("connection reset"));
    }

    #[tokio::test]
    async fn written_content_round_trips() {
        let storage = memory_storage();
        let content = Bytes::from_static(b"some video bytes");

        let response = storage
            .write_files(vec![WriteRequest::from_bytes("a/b/clip.mp4", content.clone())])
            .await
            .unwrap();
        assert!(response.errors.is_empty());
        assert_eq!(response.files_written[0].size, content.len() as u64);
        assert_eq!(response.files_written[0].content_type, "video/mp4");

        let file = storage.read_file("a/b/clip.mp4").await.unwrap();
        assert_eq!(file.metadata.name, "a/b/clip.mp4");
        assert_eq!(file.metadata.size, content.len() as u64);
        assert_eq!(file.metadata.content_type, "video/mp4");
        assert_eq!(file.content, content);
    }

    #[tokio::test]
    async fn chunked_content_counts_all_bytes() {
        let storage = memory_storage();
        let content = stream::iter(vec![
            Ok::<_, io::Error>(Bytes::from_static(b"abc")),
            Ok(Bytes::new()),
            Ok(Bytes::from_static(b"defg")),
        ])
        .boxed();

        let response = storage
            .write_files(vec![WriteRequest::new("chunks.bin", content)])
            .await
            .unwrap();
        assert_eq!(response.files_written[0].size, 7);

        let file = storage.read_file("chunks.bin").await.unwrap();
        assert_eq!(file.content, Bytes::from_static(b"abcdefg"));
    }

    #[tokio::test]
    async fn content_type_is_inferred_from_path() {
        let storage = memory_storage();

        let response = storage
            .write_files(vec![
                WriteRequest::from_bytes("a/b/photo.heim", "image"),
                WriteRequest::from_bytes("blob.zzzunknown", "bytes"),
                WriteRequest::from_bytes("notes.mp4", "text").with_content_type("text/plain"),
            ])
            .await
            .unwrap();

        let content_types: Vec<_> = response
            .files_written
            .iter()
            .map(|file| file.content_type.as_str())
            .collect();
        assert_eq!(
            content_types,
            ["image/heic", "application/octet-stream", "text/plain"]
        );
    }

    #[tokio::test]
    async fn repeated_write_overwrites() {
        let storage = memory_storage();

        let first = storage
            .write_files(vec![WriteRequest::from_bytes("same.png", "pixels")])
            .await
            .unwrap();
        let second = storage
            .write_files(vec![WriteRequest::from_bytes("same.png", "pixels")])
            .await
            .unwrap();

        assert_eq!(first.files_written, second.files_written);
        assert_eq!(second.files_written[0].content_type, "image/png");

        let file = storage.read_file("same.png").await.unwrap();
        assert_eq!(file.content, Bytes::from_static(b"pixels"));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let storage = memory_storage();

        let err = storage.read_file("missing.mp4").await.unwrap_err();
        assert!(err.to_string().starts_with("failed to get object attributes"));
    }

    #[tokio::test]
    async fn read_batch_accumulates_failures() {
        let storage = memory_storage();
        storage
            .write_files(vec![
                WriteRequest::from_bytes("one.txt", "first"),
                WriteRequest::from_bytes("two.txt", "second"),
            ])
            .await
            .unwrap();

        let paths = vec![
            "one.txt".to_owned(),
            "missing.txt".to_owned(),
            "two.txt".to_owned(),
        ];
        let response = storage.read_files(&paths).await.unwrap();

        assert_eq!(response.len(), 3);
        assert_eq!(response.files[0].content, Bytes::from_static(b"first"));
        assert_eq!(response.files[1].content, Bytes::from_static(b"second"));
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].file_path, "missing.txt");
    }
}
