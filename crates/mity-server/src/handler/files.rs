//! File upload and download handlers.
//!
//! Uploads arrive in three shapes and are all normalized into
//! [`WriteRequest`]s before reaching the storage backend:
//!
//! 1. **Multipart**: every file part of a `multipart/form-data` body becomes one
//!    object, keyed by the field name (or the file name when the field name is
//!    empty). Plain form values are ignored.
//! 2. **Raw, key in URL**: `PUT /api/v1/storage/files/{path}` streams the body
//!    into `path`.
//! 3. **Raw, key in header or query**: `POST /api/v1/storage/files/raw` streams
//!    the body into the key from `X-File-Path`, or `?path=` when the header is
//!    absent. A `POST /api/v1/storage/files` without a multipart content type
//!    is handled the same way.
//!
//! Batch endpoints always answer `200 OK` once the batch ran, with per-file
//! failures listed next to the successes.

use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::body::Body;
use axum::extract::{FromRequest, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use futures::{StreamExt, TryStreamExt};
use http_body_util::LengthLimitError;
use mity_storage::{DEFAULT_CONTENT_TYPE, WriteRequest, WriteResponse};

use crate::extract::{Json, Multipart, Path, Query, ValidateJson};
use crate::handler::request::{RawUploadQuery, ReadFiles};
use crate::handler::response::{File, FileContents, WrittenFiles};
use crate::handler::{ErrorKind, Result};
use crate::service::{ServiceState, StorageService};

/// Tracing target for file operations.
const TRACING_TARGET: &str = "mity_server::handler::files";

/// Header carrying the object key of a raw upload.
const FILE_PATH_HEADER: HeaderName = HeaderName::from_static("x-file-path");

/// Object keys that name endpoints and can never be written through `PUT`.
const RESERVED_PATHS: [&str; 3] = ["", "read", "raw"];

/// Returns `true` if `path` can not be used as an object key in a `PUT`.
fn is_reserved(path: &str) -> bool {
    RESERVED_PATHS.contains(&path)
}

/// Uploads files from a multipart form.
///
/// Non-multipart bodies fall back to a raw upload keyed by `X-File-Path` or
/// `?path=`.
#[tracing::instrument(skip_all)]
async fn upload_files(
    State(storage): State<StorageService>,
    headers: HeaderMap,
    Query(query): Query<RawUploadQuery>,
    request: Request,
) -> Result<Response> {
    if !is_multipart(&headers) {
        tracing::debug!(
            target: TRACING_TARGET,
            "non-multipart upload, handling as raw body"
        );

        let path = raw_upload_path(&headers, &query)?;
        let file = write_single(&storage, path, &headers, request.into_body()).await?;
        return Ok(file.into_response());
    }

    let mut multipart = Multipart::from_request(request, &()).await?;
    let requests = collect_parts(&mut multipart).await?;

    if requests.is_empty() {
        return Err(ErrorKind::BadRequest.with_message("No files provided"));
    }

    tracing::info!(
        target: TRACING_TARGET,
        count = requests.len(),
        "Starting batch upload"
    );

    let response = storage.write_files(requests).await.map_err(|err| {
        tracing::error!(target: TRACING_TARGET, error = %err, "Batch upload failed");
        ErrorKind::InternalServerError
            .with_message("Failed to write files")
            .with_context(err.to_string())
    })?;

    tracing::info!(
        target: TRACING_TARGET,
        written = response.files_written.len(),
        failed = response.errors.len(),
        "Batch upload finished"
    );

    Ok(Json(WrittenFiles::from(response)).into_response())
}

/// Uploads the raw body to the key from `X-File-Path` or `?path=`.
#[tracing::instrument(skip_all)]
async fn upload_raw(
    State(storage): State<StorageService>,
    headers: HeaderMap,
    Query(query): Query<RawUploadQuery>,
    body: Body,
) -> Result<Json<File>> {
    let path = raw_upload_path(&headers, &query)?;
    write_single(&storage, path, &headers, body).await
}

/// Uploads the raw body to the key given in the URL.
#[tracing::instrument(skip_all, fields(path = %path))]
async fn write_file(
    State(storage): State<StorageService>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<File>> {
    if is_reserved(&path) {
        return Err(ErrorKind::BadRequest.with_message("Invalid file path"));
    }

    write_single(&storage, path, &headers, body).await
}

/// Rejects `PUT` requests aimed at a reserved key.
async fn reserved_path() -> Result<()> {
    Err(ErrorKind::BadRequest.with_message("Invalid file path"))
}

/// Rejects downloads without an object key.
async fn missing_path() -> Result<()> {
    Err(ErrorKind::MissingPathParam.with_message("File path is required"))
}

/// Downloads several files at once, base64 encoding their content.
#[tracing::instrument(skip_all)]
async fn read_files(
    State(storage): State<StorageService>,
    ValidateJson(request): ValidateJson<ReadFiles>,
) -> Result<Json<FileContents>> {
    tracing::debug!(
        target: TRACING_TARGET,
        count = request.file_paths.len(),
        "Starting batch download"
    );

    let response = storage
        .read_files(&request.file_paths)
        .await
        .map_err(|err| {
            tracing::error!(target: TRACING_TARGET, error = %err, "Batch download failed");
            ErrorKind::InternalServerError
                .with_message("Failed to read files")
                .with_context(err.to_string())
        })?;

    tracing::info!(
        target: TRACING_TARGET,
        read = response.files.len(),
        failed = response.errors.len(),
        "Batch download finished"
    );

    Ok(Json(FileContents::from(response)))
}

/// Downloads a single file as an attachment.
///
/// Any failure, including a missing object, is reported as
/// `500 Internal Server Error`.
#[tracing::instrument(skip_all, fields(path = %path))]
async fn read_file(
    State(storage): State<StorageService>,
    Path(path): Path<String>,
) -> Result<Response> {
    download(&storage, &path).await
}

/// Downloads the object literally named `read`.
///
/// Only `POST` on this path triggers a batch read.
async fn read_file_named_read(State(storage): State<StorageService>) -> Result<Response> {
    download(&storage, "read").await
}

/// Downloads the object literally named `raw`.
///
/// Only `POST` on this path triggers a raw upload.
async fn read_file_named_raw(State(storage): State<StorageService>) -> Result<Response> {
    download(&storage, "raw").await
}

/// Reads `path` and renders it with attachment headers.
async fn download(storage: &StorageService, path: &str) -> Result<Response> {
    let file = storage.read_file(path).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET,
            error = %err,
            path = %path,
            "Failed to read file"
        );
        ErrorKind::InternalServerError
            .with_message("Failed to read file")
            .with_context(err.to_string())
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&file.metadata.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );

    let disposition = format!("attachment; filename=\"{}\"", file.metadata.name);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_bytes(disposition.as_bytes())
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );

    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(file.content.len()));

    tracing::info!(
        target: TRACING_TARGET,
        path = %file.metadata.name,
        size = file.content.len(),
        "File downloaded"
    );

    Ok((StatusCode::OK, headers, file.content).into_response())
}

/// Returns `true` if the request carries a multipart form.
fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// Resolves the object key of a raw upload; the header wins over the query.
fn raw_upload_path(headers: &HeaderMap, query: &RawUploadQuery) -> Result<String> {
    let from_header = headers
        .get(FILE_PATH_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    let from_query = query.path.as_deref().filter(|value| !value.is_empty());

    from_header.or(from_query).map(str::to_owned).ok_or_else(|| {
        ErrorKind::BadRequest
            .with_message("File path required in X-File-Path header or 'path' query parameter")
    })
}

/// Converts every file part of the form into a buffered write request.
async fn collect_parts(multipart: &mut Multipart) -> Result<Vec<WriteRequest>> {
    let mut requests = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            tracing::debug!(
                target: TRACING_TARGET,
                field = field.name().unwrap_or_default(),
                "Skipping field without filename"
            );
            continue;
        };

        let path = match field.name() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => file_name,
        };

        let content_type = field.content_type().unwrap_or_default().to_owned();
        let content = field.bytes().await?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            content_type = %content_type,
            size = content.len(),
            "Collected file part"
        );

        requests.push(WriteRequest::from_bytes(path, content).with_content_type(content_type));
    }

    Ok(requests)
}

/// Streams `body` into `path` and returns the written file.
async fn write_single(
    storage: &StorageService,
    path: String,
    headers: &HeaderMap,
    body: Body,
) -> Result<Json<File>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let too_large = Arc::new(AtomicBool::new(false));
    let content = {
        let too_large = Arc::clone(&too_large);
        body.into_data_stream()
            .map_err(move |err| {
                if exceeds_body_limit(&err) {
                    too_large.store(true, Ordering::Relaxed);
                }
                io::Error::other(err)
            })
            .boxed()
    };

    tracing::debug!(
        target: TRACING_TARGET,
        path = %path,
        content_type = %content_type,
        "Starting raw upload"
    );

    let request = WriteRequest::new(path, content).with_content_type(content_type);
    let response = storage.write_files(vec![request]).await.map_err(|err| {
        ErrorKind::InternalServerError
            .with_message("Failed to write file")
            .with_context(err.to_string())
    })?;

    if too_large.load(Ordering::Relaxed) {
        return Err(ErrorKind::PayloadTooLarge.into_error());
    }

    let WriteResponse {
        files_written,
        errors,
    } = response;

    if let Some(file) = files_written.into_iter().next() {
        tracing::info!(
            target: TRACING_TARGET,
            path = %file.name,
            size = file.size,
            "Raw upload finished"
        );
        return Ok(Json(File::from(file)));
    }

    let error = match errors.into_iter().next() {
        Some(error) => ErrorKind::InternalServerError
            .with_message("Failed to write file")
            .with_context(error.error),
        None => ErrorKind::InternalServerError.with_message("No file was written"),
    };

    Err(error)
}

/// Returns `true` if the body stream failed because it exceeded the size limit.
fn exceeds_body_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/v1/storage/files", post(upload_files))
        .route(
            "/api/v1/storage/files/",
            get(missing_path).put(reserved_path),
        )
        .route(
            "/api/v1/storage/files/raw",
            get(read_file_named_raw)
                .post(upload_raw)
                .put(reserved_path),
        )
        .route(
            "/api/v1/storage/files/read",
            get(read_file_named_read)
                .post(read_files)
                .put(reserved_path),
        )
        .route(
            "/api/v1/storage/files/{*path}",
            get(read_file).put(write_file),
        )
}

#[cfg(test)]
mod test {
    use axum::http::{Method, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use futures::stream;
    use tower::ServiceExt;

    use super::*;
    use crate::handler::response::FileContents;
    use crate::handler::routes;
    use crate::handler::test::{
        create_test_server, create_test_server_with_router, create_test_state,
    };
    use crate::middleware::{BodyLimitConfig, CorsConfig, RouterSecurityExt};

    #[test]
    fn reserved_paths() {
        assert!(is_reserved(""));
        assert!(is_reserved("read"));
        assert!(is_reserved("raw"));
        assert!(!is_reserved("raw/video.mp4"));
        assert!(!is_reserved("reads"));
    }

    #[test]
    fn header_wins_over_query() -> anyhow::Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert(FILE_PATH_HEADER, HeaderValue::from_static("from/header.bin"));
        let query = RawUploadQuery {
            path: Some("from/query.bin".to_owned()),
        };

        assert_eq!(raw_upload_path(&headers, &query)?, "from/header.bin");
        assert_eq!(
            raw_upload_path(&HeaderMap::new(), &query)?,
            "from/query.bin"
        );
        assert!(raw_upload_path(&HeaderMap::new(), &RawUploadQuery::default()).is_err());
        Ok(())
    }

    #[tokio::test]
    async fn multipart_batch_reports_each_file() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let form = MultipartForm::new()
            .add_text("note", "plain form values are ignored")
            .add_part(
                "docs/a.txt",
                Part::bytes(b"alpha".to_vec())
                    .file_name("a.txt")
                    .mime_type("text/plain"),
            )
            .add_part(
                "folder/",
                Part::bytes(b"not a file".to_vec()).file_name("folder.bin"),
            )
            .add_part(
                "media/clip.mp4",
                Part::bytes(b"\x00\x00\x00\x18ftyp".to_vec())
                    .file_name("clip.mp4")
                    .mime_type("video/mp4"),
            );

        let response = server.post("/api/v1/storage/files").multipart(form).await;
        response.assert_status_ok();

        let written = response.json::<WrittenFiles>();
        let names: Vec<_> = written.files_written.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["docs/a.txt", "media/clip.mp4"]);
        assert_eq!(written.files_written[0].size, 5);
        assert_eq!(written.files_written[1].content_type, "video/mp4");

        assert_eq!(written.errors.len(), 1);
        assert_eq!(written.errors[0].file_path, "folder/");
        assert!(!written.errors[0].error.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn multipart_without_files_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let form = MultipartForm::new().add_text("note", "no files here");
        let response = server.post("/api/v1/storage/files").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("No files provided");
        Ok(())
    }

    #[tokio::test]
    async fn put_then_get_round_trip() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .put("/api/v1/storage/files/notes/hello.txt")
            .content_type("text/plain")
            .bytes(Bytes::from_static(b"hello world"))
            .await;
        response.assert_status_ok();

        let file = response.json::<File>();
        assert_eq!(file.name, "notes/hello.txt");
        assert_eq!(file.size, 11);
        assert_eq!(file.content_type, "text/plain");

        let response = server.get("/api/v1/storage/files/notes/hello.txt").await;
        response.assert_status_ok();
        assert_eq!(&response.as_bytes()[..], b"hello world");
        assert_eq!(response.header(header::CONTENT_LENGTH), "11");
        assert_eq!(
            response.header(header::CONTENT_DISPOSITION),
            "attachment; filename=\"notes/hello.txt\""
        );
        assert!(
            response
                .header(header::CONTENT_TYPE)
                .to_str()?
                .starts_with("text/plain")
        );

        Ok(())
    }

    #[tokio::test]
    async fn repeated_put_overwrites() -> anyhow::Result<()> {
        let server = create_test_server()?;
        let path = "/api/v1/storage/files/images/logo.png";

        let first = server.put(path).bytes(Bytes::from_static(b"png")).await;
        let second = server.put(path).bytes(Bytes::from_static(b"png")).await;
        first.assert_status_ok();
        second.assert_status_ok();

        let first = first.json::<File>();
        assert_eq!(first, second.json::<File>());
        assert_eq!(first.content_type, "image/png");

        Ok(())
    }

    #[tokio::test]
    async fn reserved_keys_are_never_written() -> anyhow::Result<()> {
        let server = create_test_server()?;

        for path in ["/api/v1/storage/files/read", "/api/v1/storage/files/raw"] {
            let response = server.put(path).bytes(Bytes::from_static(b"x")).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_text("Invalid file path");
        }

        let response = server
            .post("/api/v1/storage/files/read")
            .json(&ReadFiles {
                file_paths: vec!["read".to_owned()],
            })
            .await;
        response.assert_status_ok();

        let contents = response.json::<FileContents>();
        assert!(contents.files.is_empty());
        assert_eq!(contents.errors[0].file_path, "read");

        Ok(())
    }

    #[tokio::test]
    async fn raw_upload_resolves_key() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/api/v1/storage/files/raw")
            .add_header(FILE_PATH_HEADER, HeaderValue::from_static("raw/header.mov"))
            .add_query_param("path", "raw/query.mov")
            .bytes(Bytes::from_static(b"movie"))
            .await;
        response.assert_status_ok();
        let file = response.json::<File>();
        assert_eq!(file.name, "raw/header.mov");
        assert_eq!(file.content_type, "video/quicktime");

        let response = server
            .post("/api/v1/storage/files/raw")
            .add_query_param("path", "raw/query.mov")
            .bytes(Bytes::from_static(b"movie"))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<File>().name, "raw/query.mov");

        let response = server
            .post("/api/v1/storage/files/raw")
            .bytes(Bytes::from_static(b"movie"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("File path required in X-File-Path header or 'path' query parameter");

        Ok(())
    }

    #[tokio::test]
    async fn non_multipart_post_is_raw_upload() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/api/v1/storage/files")
            .add_header(FILE_PATH_HEADER, HeaderValue::from_static("photos/a.heim"))
            .bytes(Bytes::from_static(b"heic"))
            .await;
        response.assert_status_ok();

        let file = response.json::<File>();
        assert_eq!(file.name, "photos/a.heim");
        assert_eq!(file.content_type, "image/heic");
        Ok(())
    }

    #[tokio::test]
    async fn batch_read_reports_missing_files() -> anyhow::Result<()> {
        let server = create_test_server()?;

        server
            .put("/api/v1/storage/files/a.txt")
            .content_type("text/plain")
            .bytes(Bytes::from_static(b"alpha"))
            .await
            .assert_status_ok();

        let response = server
            .post("/api/v1/storage/files/read")
            .json(&ReadFiles {
                file_paths: vec!["a.txt".to_owned(), "missing.txt".to_owned()],
            })
            .await;
        response.assert_status_ok();

        let contents = response.json::<FileContents>();
        assert_eq!(contents.files.len(), 1);
        assert_eq!(contents.files[0].metadata.name, "a.txt");
        assert_eq!(contents.files[0].metadata.size, 5);
        assert_eq!(STANDARD.decode(&contents.files[0].content)?, b"alpha");

        assert_eq!(contents.errors.len(), 1);
        assert_eq!(contents.errors[0].file_path, "missing.txt");
        assert!(
            contents.errors[0]
                .error
                .starts_with("failed to get object attributes")
        );

        Ok(())
    }

    #[tokio::test]
    async fn batch_read_rejects_bad_requests() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .post("/api/v1/storage/files/read")
            .json(&ReadFiles {
                file_paths: Vec::new(),
            })
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("No file paths provided");

        let response = server
            .post("/api/v1/storage/files/read")
            .content_type("application/json")
            .bytes(Bytes::from_static(b"{\"file_paths\": ["))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().starts_with("Invalid request body"));

        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_server_error() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/api/v1/storage/files/nowhere/a.txt").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().starts_with("Failed to read file: "));

        let response = server.get("/api/v1/storage/files/").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("File path is required");

        Ok(())
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server_with_router(|router| {
            router.with_security(
                &CorsConfig::default(),
                &BodyLimitConfig::with_max_upload_size(8),
            )
        })?;

        let response = server
            .put("/api/v1/storage/files/big.bin")
            .bytes(Bytes::from(vec![0u8; 64]))
            .await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

        Ok(())
    }

    #[tokio::test]
    async fn multipart_empty_field_name_uses_file_name() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let form = MultipartForm::new().add_part(
            "",
            Part::bytes(b"png".to_vec())
                .file_name("orig.png")
                .mime_type("image/png"),
        );

        let response = server.post("/api/v1/storage/files").multipart(form).await;
        response.assert_status_ok();

        let written = response.json::<WrittenFiles>();
        assert_eq!(written.files_written.len(), 1);
        assert_eq!(written.files_written[0].name, "orig.png");
        assert!(written.errors.is_empty());

        server
            .get("/api/v1/storage/files/orig.png")
            .await
            .assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn single_upload_store_failure_is_server_error() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .put("/api/v1/storage/files/folder/")
            .bytes(Bytes::from_static(b"not a file"))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().starts_with("Failed to write file: "));

        let response = server
            .post("/api/v1/storage/files/raw")
            .add_header(FILE_PATH_HEADER, HeaderValue::from_static("folder/"))
            .bytes(Bytes::from_static(b"not a file"))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().starts_with("Failed to write file: "));

        Ok(())
    }

    #[tokio::test]
    async fn objects_named_like_endpoints_can_be_downloaded() -> anyhow::Result<()> {
        let server = create_test_server()?;

        for key in ["read", "raw"] {
            server
                .post("/api/v1/storage/files/raw")
                .add_header(FILE_PATH_HEADER, HeaderValue::from_str(key)?)
                .bytes(Bytes::from(key.as_bytes().to_vec()))
                .await
                .assert_status_ok();

            let response = server.get(&format!("/api/v1/storage/files/{key}")).await;
            response.assert_status_ok();
            assert_eq!(&response.as_bytes()[..], key.as_bytes());
            assert_eq!(
                response.header(header::CONTENT_DISPOSITION),
                format!("attachment; filename=\"{key}\"").as_str()
            );
        }

        let response = server.get("/api/v1/storage/files/read").await;
        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn streamed_oversized_body_is_rejected() -> anyhow::Result<()> {
        let state = create_test_state()?;
        let app = routes()
            .with_security(
                &CorsConfig::default(),
                &BodyLimitConfig::with_max_upload_size(8),
            )
            .with_state(state.clone());

        let chunks = stream::iter([
            Ok::<_, io::Error>(Bytes::from_static(b"0123")),
            Ok(Bytes::from_static(b"4567")),
            Ok(Bytes::from_static(b"89ab")),
        ]);
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/api/v1/storage/files/streamed.bin")
            .body(Body::from_stream(chunks))?;
        assert!(request.headers().get(header::CONTENT_LENGTH).is_none());

        let response = app.oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let stored = state.storage().read_file("streamed.bin").await;
        assert!(stored.is_err());

        Ok(())
    }
}
