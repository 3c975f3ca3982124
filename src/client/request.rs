//! Shared request machinery for synchronous and asynchronous jobs.

use crate::config::EndpointConfig;
use crate::error::{Result, SearchError};
use crate::models::{OutputMode, SearchQuery, Session};
use crate::transport::{HttpRequest, Transport, TransportError};

/// How the service runs a submitted search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    /// Export endpoint: the service blocks until the search finishes and
    /// streams the results back in the response
    Sync,
    /// Jobs endpoint: the service returns a job identifier immediately and
    /// runs the search in the background
    Async,
}

/// Everything a job operation needs to reach the service
#[derive(Debug, Clone, Copy)]
pub struct JobContext<'a> {
    pub transport: &'a dyn Transport,
    pub session: &'a Session,
    pub endpoints: &'a EndpointConfig,
}

impl<'a> JobContext<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        session: &'a Session,
        endpoints: &'a EndpointConfig,
    ) -> Self {
        Self {
            transport,
            session,
            endpoints,
        }
    }

    /// Fail unless the session holds a token
    pub fn require_authenticated(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(SearchError::Precondition(
                "Search object has no session token".to_string(),
            ))
        }
    }

    /// Build an authorized GET for `url`
    pub fn authorized_get(
        &self,
        url: impl Into<String>,
    ) -> std::result::Result<HttpRequest, TransportError> {
        HttpRequest::get(url).authorization(&self.session.authorization())
    }

    /// Base URL of the asynchronous jobs endpoint for this session
    pub fn async_jobs_url(&self) -> String {
        self.endpoints.async_jobs_url(self.session.server())
    }
}

/// Fail if no query text was supplied
pub fn require_query(query: &SearchQuery) -> Result<()> {
    if query.is_empty() {
        Err(SearchError::Precondition(
            "Search object has no query".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// A search submission, tagged with the mode it runs in
#[derive(Debug, Clone, Copy)]
pub struct JobRequest<'q> {
    mode: JobMode,
    query: &'q SearchQuery,
    output_mode: Option<OutputMode>,
}

impl<'q> JobRequest<'q> {
    /// Submission to the asynchronous jobs endpoint
    pub fn asynchronous(query: &'q SearchQuery) -> Self {
        Self {
            mode: JobMode::Async,
            query,
            output_mode: None,
        }
    }

    /// Blocking submission that returns results in `output_mode`
    pub fn blocking(query: &'q SearchQuery, output_mode: OutputMode) -> Self {
        Self {
            mode: JobMode::Sync,
            query,
            output_mode: Some(output_mode),
        }
    }

    pub fn mode(&self) -> JobMode {
        self.mode
    }

    /// Check the query and session before anything touches the network
    pub fn check(&self, ctx: &JobContext<'_>) -> Result<()> {
        require_query(self.query)?;
        ctx.require_authenticated()
    }

    fn endpoint(&self, ctx: &JobContext<'_>) -> String {
        let server = ctx.session.server();
        match self.mode {
            JobMode::Async => ctx.endpoints.async_jobs_url(server),
            JobMode::Sync => ctx.endpoints.sync_jobs_url(server),
        }
    }

    /// Build the authorized POST for this submission
    pub fn to_http(
        &self,
        ctx: &JobContext<'_>,
    ) -> std::result::Result<HttpRequest, TransportError> {
        let mut fields = vec![("search", self.query.as_str())];
        if let Some(mode) = self.output_mode {
            fields.push(("output_mode", mode.as_str()));
        }

        Ok(HttpRequest::post(self.endpoint(ctx))
            .authorization(&ctx.session.authorization())?
            .form(&fields))
    }

    /// Check preconditions, then send the submission and return the raw body.
    ///
    /// `on_transport_error` decides which error kind a network failure maps to.
    pub async fn send<F>(&self, ctx: &JobContext<'_>, on_transport_error: F) -> Result<Vec<u8>>
    where
        F: FnOnce(TransportError) -> SearchError,
    {
        self.check(ctx)?;

        tracing::debug!("Submitting {:?} search: {}", self.mode, self.query);
        let result = match self.to_http(ctx) {
            Ok(request) => ctx.transport.request(request).await,
            Err(e) => Err(e),
        };

        result.map_err(on_transport_error)
    }
}
