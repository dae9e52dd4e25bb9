//! Response types for HTTP handlers.

mod error_response;
mod files;

pub use error_response::ErrorResponse;
pub use files::*;
