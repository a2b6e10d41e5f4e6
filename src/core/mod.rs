//! Core types for HTTP request/response handling.
//!
//! - [`Request`] - HTTP request with a streaming body and a [`Context`](crate::Context)
//! - [`ResponseWriter`] - outbound side handlers write into
//! - [`ResponseBuffer`] - in-memory writer that becomes an `http::Response`
//! - [`StatusRecorder`] - writer decorator that latches the response status
//! - [`Error`] - Core error types

mod error;
mod request;
mod response;
mod status;

pub use error::{BoxError, Error, Result};
pub use request::{empty_body, full_body, Body, Request, X_REQUEST_ID};
pub use response::{write_json, ResponseBuffer, ResponseWriter};
pub use status::StatusRecorder;
