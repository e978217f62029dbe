//! HTTP surface for the report pipeline.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance. `start_api_server()` is the
//! standalone lifecycle used by the binary.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
