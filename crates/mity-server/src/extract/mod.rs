//! Enhanced HTTP request extractors with improved error handling and validation.
//!
//! - [`Json`] - JSON deserialization with plain text rejections
//! - [`ValidateJson`] - JSON extraction with automatic validation
//! - [`Multipart`] - multipart form parsing with plain text rejections
//! - [`Path`] - path parameter extraction with detailed error context
//! - [`Query`] - query parameter extraction with enhanced error messages

pub mod reject;

pub use crate::extract::reject::{Json, Multipart, Path, Query, ValidateJson};
