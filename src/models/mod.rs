//! Core data models for search sessions and jobs.

mod job;
mod query;
mod session;

pub use job::{Job, JobStatus, OutputMode};
pub use query::{normalize, SearchQuery, SEARCH_COMMAND};
pub use session::{Credentials, Session, PASSWORD_ENV, USERNAME_ENV};
