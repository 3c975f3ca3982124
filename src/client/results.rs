//! Result retrieval for asynchronous jobs.

use super::request::JobContext;
use crate::error::{Result, SearchError};
use crate::models::{Job, JobStatus, OutputMode};

/// Fetch a job's results, naming the encoding as text.
///
/// Unrecognized encodings fall back to XML rather than failing. See
/// [`fetch_results_as`] for the remaining rules.
pub async fn fetch_results(
    ctx: &JobContext<'_>,
    job: Option<&Job>,
    encoding: &str,
) -> Result<Option<Vec<u8>>> {
    let mode = OutputMode::lenient(encoding);
    if mode.as_str() != encoding {
        tracing::debug!("Unknown output mode {:?}, using {}", encoding, mode);
    }
    fetch_results_as(ctx, job, mode).await
}

/// Fetch a job's results in `mode`.
///
/// Returns `Ok(None)` when no status has been observed for the job yet. Once
/// any status is known the results endpoint is queried, so a job that is not
/// done yet yields whatever partial payload the service returns. The body is
/// returned unmodified.
pub async fn fetch_results_as(
    ctx: &JobContext<'_>,
    job: Option<&Job>,
    mode: OutputMode,
) -> Result<Option<Vec<u8>>> {
    ctx.require_authenticated()?;
    let job = job.ok_or_else(|| {
        SearchError::Precondition("Search object has no job SID".to_string())
    })?;

    if job.status() == JobStatus::Unknown {
        return Ok(None);
    }

    let url = format!(
        "{}/{}/results?output_mode={}&count=0",
        ctx.async_jobs_url(),
        job.sid(),
        mode
    );
    let body = ctx.transport.request(ctx.authorized_get(url)?).await?;

    tracing::debug!(
        "Fetched {} bytes of {} results for job {}",
        body.len(),
        mode,
        job.sid()
    );
    Ok(Some(body))
}
