//! HTTP API Layer
//!
//! REST/JSON surface of the job store: routing, request parsing, response
//! envelopes and the error to status code mapping.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use error::{ApiError, Operation};
pub use handler::AppState;
pub use server::{build_router, HttpServer, HttpServerConfig, ServerHandle};
