//! Job status and output encodings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SearchError;

/// Completion state of an asynchronous search job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// No status has been observed yet
    #[default]
    Unknown,
    /// The service reported `isDone` as `0`
    NotDone,
    /// The service reported `isDone` as `1`
    Done,
}

impl JobStatus {
    pub fn is_done(self) -> bool {
        self == JobStatus::Done
    }
}

/// An asynchronous search job submitted to the service.
///
/// Only created from a successful submission, so the identifier is always
/// usable. Once `Done` has been observed the status never changes again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    sid: String,
    status: JobStatus,
}

impl Job {
    pub(crate) fn new(sid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            status: JobStatus::Unknown,
        }
    }

    /// The search identifier assigned by the service
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Last observed status
    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub(crate) fn record_status(&mut self, status: JobStatus) {
        // Status only moves forward
        if self.status != JobStatus::Done {
            self.status = status;
        }
    }
}

/// Encoding requested for search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Json,
    Csv,
    #[default]
    Xml,
}

impl OutputMode {
    /// Every supported encoding
    pub const ALL: [OutputMode; 3] = [OutputMode::Json, OutputMode::Csv, OutputMode::Xml];

    /// Name used in the `output_mode` request parameter
    pub fn as_str(self) -> &'static str {
        match self {
            OutputMode::Json => "json",
            OutputMode::Csv => "csv",
            OutputMode::Xml => "xml",
        }
    }

    /// Parse an encoding name, falling back to XML for anything unrecognized
    pub fn lenient(name: &str) -> Self {
        name.parse().unwrap_or(OutputMode::Xml)
    }
}

impl FromStr for OutputMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputMode::Json),
            "csv" => Ok(OutputMode::Csv),
            "xml" => Ok(OutputMode::Xml),
            other => Err(SearchError::InvalidArgument(format!(
                "Invalid output mode: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
