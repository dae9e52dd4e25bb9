//! Prelude module for mity-server.
//!
//! Re-exports the types needed to assemble the HTTP application:
//!
//! ```rust
//! use mity_server::prelude::*;
//! ```

pub use crate::extract::*;
pub use crate::handler::routes;
pub use crate::middleware::*;
pub use crate::service::*;
