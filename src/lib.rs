//! Core request/response engine for a minimal, read-only HTTP/1.x
//! directory server (spec.md §1). The listening-socket factory,
//! privilege drop, and process supervision live in `main.rs`; this
//! crate is the part that parses a request, resolves it against a
//! served root, and emits a response.

pub mod config;
pub mod dirlist;
pub mod error;
pub mod filesend;
pub mod log;
pub mod mime;
pub mod path;
pub mod percent;
pub mod plan;
pub mod request;
pub mod respond;
pub mod session;
pub mod timestamp;

pub use config::Config;
pub use error::{CoreError, Status};
pub use session::serve_connection;
