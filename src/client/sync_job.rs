//! Blocking searches through the export endpoint.

use super::request::{require_query, JobContext, JobRequest};
use crate::error::{Result, SearchError};
use crate::models::{OutputMode, SearchQuery};

/// Run `query` as a blocking search, naming the encoding as text.
///
/// Unlike result fetching for asynchronous jobs, an unrecognized encoding is
/// rejected with [`SearchError::InvalidArgument`] before any request is made.
pub async fn submit_blocking(
    ctx: &JobContext<'_>,
    query: &SearchQuery,
    encoding: &str,
) -> Result<Vec<u8>> {
    require_query(query)?;
    ctx.require_authenticated()?;
    let mode: OutputMode = encoding.parse()?;
    submit_blocking_as(ctx, query, mode).await
}

/// Run `query` as a blocking search returning results in `mode`.
///
/// The service holds the connection open until the search finishes; there is
/// no job identifier and nothing to poll. The body is returned unmodified.
pub async fn submit_blocking_as(
    ctx: &JobContext<'_>,
    query: &SearchQuery,
    mode: OutputMode,
) -> Result<Vec<u8>> {
    let body = JobRequest::blocking(query, mode)
        .send(ctx, SearchError::Transport)
        .await?;

    tracing::info!("Blocking search returned {} bytes of {}", body.len(), mode);
    Ok(body)
}
