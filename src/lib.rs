//! # Splunk Search
//!
//! A client for the Splunk REST search API: acquire a session token, then run
//! searches either as blocking export calls or as background jobs that are
//! polled until done and fetched in JSON, CSV or XML.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SearchQuery, Session, Job, etc.)
//! - [`client`]: Session manager, job controllers, result fetcher and the
//!   [`SearchClient`] facade
//! - [`transport`]: HTTP transport trait with reqwest and mock implementations
//! - [`config`]: Configuration management
//! - [`logging`]: Tracing subscriber setup
//! - [`error`]: Error types

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod transport;

// Re-export commonly used types
pub use client::{SearchClient, SearchClientBuilder};
pub use error::{Result, SearchError};
pub use models::{normalize, Credentials, Job, JobStatus, OutputMode, SearchQuery, Session};
pub use transport::{HttpRequest, MockTransport, ReqwestTransport, Transport, TransportError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
