//! Search client and the job lifecycle.
//!
//! [`SearchClient`] owns one session and at most one asynchronous job. Its
//! methods drive the lifecycle in order:
//!
//! 1. [`SearchClient::acquire_token`] exchanges credentials for a session token
//! 2. either [`SearchClient::submit_blocking`] runs a search and returns its
//!    results in one call, or
//! 3. [`SearchClient::submit`] starts a background job,
//!    [`SearchClient::poll_status`] / [`SearchClient::wait_for_completion`]
//!    watch it, and [`SearchClient::fetch_results`] retrieves the output
//!
//! Every job operation checks its preconditions (token, query, job id) before
//! touching the network.
//!
//! # Example
//!
//! ```rust,no_run
//! use splunk_search::{Credentials, SearchClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = SearchClient::builder(
//!     "https://splunk.example.com:8089",
//!     Credentials::new("admin", "changeme"),
//! )
//! .query("* earliest=-24h | stats count by sourcetype")
//! .build()?;
//!
//! client.acquire_token().await?;
//! let sid = client.submit().await?;
//! client.wait_for_completion().await?;
//! let json = client.fetch_results("json").await?;
//! println!("{}: {:?}", sid, json.map(|b| b.len()));
//! # Ok(())
//! # }
//! ```

mod async_job;
pub mod parse;
mod request;
mod results;
mod session;
mod sync_job;

pub use async_job::AsyncJobController;
pub use request::{require_query, JobContext, JobMode, JobRequest};
pub use results::{fetch_results, fetch_results_as};
pub use session::acquire_token;
pub use sync_job::{submit_blocking, submit_blocking_as};

use std::sync::Arc;

use crate::config::{validate_server, ClientConfig, EndpointConfig, PollConfig, TransportConfig};
use crate::error::Result;
use crate::models::{Credentials, Job, JobStatus, OutputMode, SearchQuery, Session};
use crate::transport::{ReqwestTransport, Transport};

/// Client for one search session.
///
/// Methods that change the session or job take `&mut self`; callers sharing a
/// client across tasks must serialize access themselves.
#[derive(Debug)]
pub struct SearchClient {
    transport: Arc<dyn Transport>,
    endpoints: EndpointConfig,
    polling: PollConfig,
    credentials: Credentials,
    session: Session,
    query: SearchQuery,
    jobs: AsyncJobController,
}

impl SearchClient {
    /// Start building a client for `server`
    pub fn builder(server: impl Into<String>, credentials: Credentials) -> SearchClientBuilder {
        SearchClientBuilder::new(server, credentials)
    }

    /// Client with default endpoints and a reqwest transport
    pub fn new(server: impl Into<String>, credentials: Credentials) -> Result<Self> {
        Self::builder(server, credentials).build()
    }

    /// Client built from loaded configuration
    pub fn from_config(config: &ClientConfig, credentials: Credentials) -> Result<Self> {
        Self::builder(config.server.clone(), credentials)
            .endpoints(config.endpoints.clone())
            .transport_config(config.transport.clone())
            .polling(config.polling)
            .build()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The current query, already normalized
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Replace the query; the text is normalized on assignment
    pub fn set_query(&mut self, raw: impl AsRef<str>) {
        self.query.set(raw);
    }

    /// The current asynchronous job, if any
    pub fn job(&self) -> Option<&Job> {
        self.jobs.job()
    }

    /// Last observed status of the current job
    pub fn job_status(&self) -> JobStatus {
        self.jobs.status()
    }

    /// Exchange the client's credentials for a session token
    pub async fn acquire_token(&mut self) -> Result<String> {
        acquire_token(
            self.transport.as_ref(),
            &mut self.session,
            &self.endpoints,
            &self.credentials,
        )
        .await
    }

    /// Submit the current query as an asynchronous job
    pub async fn submit(&mut self) -> Result<String> {
        let ctx = JobContext::new(self.transport.as_ref(), &self.session, &self.endpoints);
        self.jobs.submit(&ctx, &self.query).await
    }

    /// Check the current job's status
    pub async fn poll_status(&mut self) -> Result<JobStatus> {
        let ctx = JobContext::new(self.transport.as_ref(), &self.session, &self.endpoints);
        self.jobs.poll_status(&ctx).await
    }

    /// Poll until the current job is done, using the client's poll settings
    pub async fn wait_for_completion(&mut self) -> Result<JobStatus> {
        let poll = self.polling;
        self.wait_for_completion_with(&poll).await
    }

    /// Poll until the current job is done, within `poll`
    pub async fn wait_for_completion_with(&mut self, poll: &PollConfig) -> Result<JobStatus> {
        let ctx = JobContext::new(self.transport.as_ref(), &self.session, &self.endpoints);
        self.jobs.wait_for_completion(&ctx, poll).await
    }

    /// Fetch the current job's results; unknown encodings fall back to XML
    pub async fn fetch_results(&self, encoding: &str) -> Result<Option<Vec<u8>>> {
        fetch_results(&self.context(), self.jobs.job(), encoding).await
    }

    pub async fn fetch_results_as(&self, mode: OutputMode) -> Result<Option<Vec<u8>>> {
        fetch_results_as(&self.context(), self.jobs.job(), mode).await
    }

    /// Run the current query as a blocking search; unknown encodings are rejected
    pub async fn submit_blocking(&self, encoding: &str) -> Result<Vec<u8>> {
        submit_blocking(&self.context(), &self.query, encoding).await
    }

    pub async fn submit_blocking_as(&self, mode: OutputMode) -> Result<Vec<u8>> {
        submit_blocking_as(&self.context(), &self.query, mode).await
    }

    fn context(&self) -> JobContext<'_> {
        JobContext::new(self.transport.as_ref(), &self.session, &self.endpoints)
    }
}

/// Builder for [`SearchClient`]
#[derive(Debug)]
pub struct SearchClientBuilder {
    server: String,
    credentials: Credentials,
    endpoints: EndpointConfig,
    polling: PollConfig,
    transport_config: TransportConfig,
    transport: Option<Arc<dyn Transport>>,
    query: SearchQuery,
}

impl SearchClientBuilder {
    pub fn new(server: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            server: server.into(),
            credentials,
            endpoints: EndpointConfig::default(),
            polling: PollConfig::default(),
            transport_config: TransportConfig::default(),
            transport: None,
            query: SearchQuery::default(),
        }
    }

    pub fn endpoints(mut self, endpoints: EndpointConfig) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.endpoints.login_path = path.into();
        self
    }

    pub fn async_jobs_path(mut self, path: impl Into<String>) -> Self {
        self.endpoints.async_jobs_path = path.into();
        self
    }

    pub fn sync_jobs_path(mut self, path: impl Into<String>) -> Self {
        self.endpoints.sync_jobs_path = path.into();
        self
    }

    pub fn polling(mut self, polling: PollConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Settings for the default reqwest transport; ignored with [`Self::transport`]
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Use a custom transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Initial query; normalized like [`SearchClient::set_query`]
    pub fn query(mut self, raw: impl AsRef<str>) -> Self {
        self.query.set(raw);
        self
    }

    pub fn build(self) -> Result<SearchClient> {
        validate_server(&self.server)?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_config(&self.transport_config)?),
        };

        Ok(SearchClient {
            transport,
            endpoints: self.endpoints,
            polling: self.polling,
            credentials: self.credentials,
            session: Session::new(self.server),
            query: self.query,
            jobs: AsyncJobController::new(),
        })
    }
}
