//! Request types for HTTP handlers.

mod files;

pub use files::*;
