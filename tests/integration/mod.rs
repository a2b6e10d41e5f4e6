//! Integration tests for ctxlog
//!
//! The HTTP tests start an in-process server on an ephemeral port and talk to
//! it with reqwest; every server captures its own logs in memory.
//!
//! Run with: cargo test --test integration

mod helpers;

mod global_logger;
mod http_server;
