//! File request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to download multiple files.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReadFiles {
    /// Object keys to download, in response order.
    #[serde(default)]
    #[validate(length(min = 1, message = "No file paths provided"))]
    pub file_paths: Vec<String>,
}

/// Query parameters accepted by raw body uploads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUploadQuery {
    /// Object key, used when the `X-File-Path` header is absent.
    #[serde(default)]
    pub path: Option<String>,
}
