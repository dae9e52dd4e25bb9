//! Enhanced request extractors with improved error handling and validation.
//!
//! These extractors are drop-in replacements for their standard Axum
//! counterparts. Their rejections are converted into the handler
//! [`Error`](crate::handler::Error) type and rendered as plain text.

pub mod enhanced_json;
pub mod enhanced_multipart;
pub mod enhanced_path;
pub mod enhanced_query;
pub mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_multipart::Multipart;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;
