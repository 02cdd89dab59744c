//! Worker-facing HTTP API
//!
//! Serves `GET` and `POST /v1/queue/{queue}` on top of the QueueRegistry port.

pub mod error;
pub mod extract;
pub mod handler;
pub mod server;
pub mod state;
pub mod types;

pub use error::HttpError;
pub use server::{router, HttpServer, HttpServerConfig, HttpServerHandle};
pub use state::HttpState;
