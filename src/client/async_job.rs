//! Asynchronous job submission and status polling.

use tokio::time::{sleep, Instant};

use super::parse::{done_flag, unique_element_text};
use super::request::{JobContext, JobRequest};
use crate::config::PollConfig;
use crate::error::{Result, SearchError};
use crate::models::{Job, JobStatus, SearchQuery};

/// Tracks the single in-flight asynchronous job of a client
#[derive(Debug, Default)]
pub struct AsyncJobController {
    job: Option<Job>,
}

impl AsyncJobController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current job, if one was submitted successfully
    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn sid(&self) -> Option<&str> {
        self.job.as_ref().map(Job::sid)
    }

    /// Last observed status, `Unknown` when there is no job
    pub fn status(&self) -> JobStatus {
        self.job.as_ref().map(Job::status).unwrap_or_default()
    }

    /// Submit `query` as a new job and return its identifier.
    ///
    /// Any previous job is forgotten first, so a failed submission leaves the
    /// controller without a job.
    pub async fn submit(&mut self, ctx: &JobContext<'_>, query: &SearchQuery) -> Result<String> {
        let request = JobRequest::asynchronous(query);
        request.check(ctx)?;

        self.job = None;

        let body = request
            .send(ctx, |e| SearchError::Submission {
                message: "job submission request failed".to_string(),
                source: Some(e),
            })
            .await?;

        let sid = unique_element_text(&body, "sid").map_err(|e| {
            tracing::warn!("Unusable job submission response: {}", e);
            SearchError::submission(e.to_string())
        })?;

        tracing::info!("Submitted search job {}", sid);
        self.job = Some(Job::new(sid.clone()));

        Ok(sid)
    }

    /// Check the job's status.
    ///
    /// A `Done` status is returned from cache without contacting the service.
    /// Anything else is re-checked on every call.
    pub async fn poll_status(&mut self, ctx: &JobContext<'_>) -> Result<JobStatus> {
        ctx.require_authenticated()?;

        let job = self.job.as_mut().ok_or_else(|| {
            SearchError::Precondition("Search object has no job SID".to_string())
        })?;

        if job.status().is_done() {
            return Ok(JobStatus::Done);
        }

        let url = format!("{}/{}", ctx.async_jobs_url(), job.sid());
        let request = ctx.authorized_get(url).map_err(|e| SearchError::Status {
            message: "could not build status request".to_string(),
            source: Some(e),
        })?;

        let body = ctx
            .transport
            .request(request)
            .await
            .map_err(|e| SearchError::Status {
                message: format!("status request for job {} failed", job.sid()),
                source: Some(e),
            })?;

        let status = done_flag(&body).map_err(|e| {
            tracing::warn!("Unusable status response for job {}: {}", job.sid(), e);
            SearchError::status(e.to_string())
        })?;

        tracing::debug!("Job {} status: {:?}", job.sid(), status);
        job.record_status(status);

        Ok(status)
    }

    /// Poll until the job is done, within the bounds of `poll`.
    ///
    /// Errors from individual polls are returned immediately. Running out of
    /// attempts or time yields [`SearchError::PollTimeout`].
    pub async fn wait_for_completion(
        &mut self,
        ctx: &JobContext<'_>,
        poll: &PollConfig,
    ) -> Result<JobStatus> {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;

            let status = self.poll_status(ctx).await?;
            if status.is_done() {
                tracing::info!(
                    "Job {} done after {} status checks",
                    self.sid().unwrap_or_default(),
                    attempts
                );
                return Ok(status);
            }

            let out_of_time = poll
                .timeout()
                .is_some_and(|limit| started.elapsed() + poll.interval() > limit);

            if attempts >= poll.max_attempts || out_of_time {
                let sid = self.sid().unwrap_or_default().to_string();
                tracing::warn!(
                    "Job {} still not done after {} status checks ({:?} elapsed)",
                    sid,
                    attempts,
                    started.elapsed()
                );
                return Err(SearchError::PollTimeout { sid, attempts });
            }

            sleep(poll.interval()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use crate::models::Session;
    use crate::transport::{MockTransport, TransportError};
    use http::header::AUTHORIZATION;
    use std::time::Duration;

    const NOT_DONE: &str = r#"<entry><s:key name="isDone">0</s:key></entry>"#;
    const DONE: &str = r#"<entry><s:key name="isDone">1</s:key></entry>"#;

    fn session() -> Session {
        let mut session = Session::new("https://splunk:8089");
        session.set_token("TOK");
        session
    }

    async fn submitted(transport: &MockTransport, session: &Session) -> AsyncJobController {
        let endpoints = EndpointConfig::default();
        let ctx = JobContext::new(transport, session, &endpoints);
        transport.push_response("<response><sid>job-42</sid></response>");

        let mut controller = AsyncJobController::new();
        controller
            .submit(&ctx, &SearchQuery::new("index=main"))
            .await
            .unwrap();
        controller
    }

    #[tokio::test]
    async fn test_submit_records_job() {
        let transport = MockTransport::new();
        let session = session();
        let controller = submitted(&transport, &session).await;

        assert_eq!(controller.sid(), Some("job-42"));
        assert_eq!(controller.status(), JobStatus::Unknown);

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://splunk:8089/services/search/jobs");
        assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "Splunk TOK");
        assert_eq!(request.form_value("search").as_deref(), Some("search index=main"));
    }

    #[tokio::test]
    async fn test_submit_without_sid_is_submission_error() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let ctx = JobContext::new(&transport, &session, &endpoints);
        transport.push_response("<response><messages/></response>");

        let mut controller = AsyncJobController::new();
        let err = controller
            .submit(&ctx, &SearchQuery::new("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Submission { .. }));
        assert!(controller.job().is_none());
    }

    #[tokio::test]
    async fn test_submit_transport_failure_is_submission_error() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let ctx = JobContext::new(&transport, &session, &endpoints);
        transport.push_error(TransportError::Network("connection refused".to_string()));

        let mut controller = AsyncJobController::new();
        let err = controller
            .submit(&ctx, &SearchQuery::new("x"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SearchError::Submission {
                source: Some(TransportError::Network(_)),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_resubmit_clears_previous_job() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let mut controller = submitted(&transport, &session).await;

        let ctx = JobContext::new(&transport, &session, &endpoints);
        transport.push_response(DONE);
        controller.poll_status(&ctx).await.unwrap();
        assert_eq!(controller.status(), JobStatus::Done);

        transport.push_response("<response><sid>job-43</sid></response>");
        controller
            .submit(&ctx, &SearchQuery::new("x"))
            .await
            .unwrap();
        assert_eq!(controller.sid(), Some("job-43"));
        assert_eq!(controller.status(), JobStatus::Unknown);
    }

    #[tokio::test]
    async fn test_poll_caches_done_only() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let mut controller = submitted(&transport, &session).await;
        let ctx = JobContext::new(&transport, &session, &endpoints);

        transport.push_response(NOT_DONE);
        transport.push_response(NOT_DONE);
        transport.push_response(DONE);

        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(controller.poll_status(&ctx).await.unwrap());
        }

        assert_eq!(
            seen,
            vec![
                JobStatus::NotDone,
                JobStatus::NotDone,
                JobStatus::Done,
                JobStatus::Done
            ]
        );
        // One submit plus three status checks; the fourth poll hit the cache
        assert_eq!(transport.call_count(), 4);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, http::Method::GET);
        assert_eq!(request.url, "https://splunk:8089/services/search/jobs/job-42");
        assert_eq!(request.headers.get(AUTHORIZATION).unwrap(), "Splunk TOK");
    }

    #[tokio::test]
    async fn test_poll_without_pattern_is_status_error() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let mut controller = submitted(&transport, &session).await;
        let ctx = JobContext::new(&transport, &session, &endpoints);

        transport.push_response("<entry>no flag here</entry>");
        let err = controller.poll_status(&ctx).await.unwrap_err();

        assert!(matches!(err, SearchError::Status { .. }));
        assert_eq!(controller.status(), JobStatus::Unknown);
    }

    #[tokio::test]
    async fn test_poll_without_job_is_precondition_error() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let ctx = JobContext::new(&transport, &session, &endpoints);

        let err = AsyncJobController::new()
            .poll_status(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Precondition(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_wait_for_completion() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let mut controller = submitted(&transport, &session).await;
        let ctx = JobContext::new(&transport, &session, &endpoints);

        transport.push_response(NOT_DONE);
        transport.push_response(NOT_DONE);
        transport.push_response(DONE);

        let poll = PollConfig::default().with_interval(Duration::from_millis(1));
        let status = controller.wait_for_completion(&ctx, &poll).await.unwrap();

        assert_eq!(status, JobStatus::Done);
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_wait_for_completion_gives_up() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let mut controller = submitted(&transport, &session).await;
        let ctx = JobContext::new(&transport, &session, &endpoints);

        for _ in 0..5 {
            transport.push_response(NOT_DONE);
        }

        let poll = PollConfig::default()
            .with_interval(Duration::from_millis(1))
            .with_max_attempts(3);
        let err = controller
            .wait_for_completion(&ctx, &poll)
            .await
            .unwrap_err();

        match err {
            SearchError::PollTimeout { sid, attempts } => {
                assert_eq!(sid, "job-42");
                assert_eq!(attempts, 3);
            }
            other => panic!("Expected PollTimeout, got {:?}", other),
        }
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_wait_for_completion_respects_deadline() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let mut controller = submitted(&transport, &session).await;
        let ctx = JobContext::new(&transport, &session, &endpoints);

        for _ in 0..5 {
            transport.push_response(NOT_DONE);
        }

        // Interval longer than the deadline: the first not-done answer ends the wait
        let poll = PollConfig {
            interval_ms: 2_000,
            max_attempts: 100,
            timeout_ms: Some(1_000),
        };
        let err = controller
            .wait_for_completion(&ctx, &poll)
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::PollTimeout { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_wait_for_completion_honors_sub_second_deadline() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let mut controller = submitted(&transport, &session).await;
        let ctx = JobContext::new(&transport, &session, &endpoints);

        for _ in 0..3 {
            transport.push_response(NOT_DONE);
        }
        transport.push_response(DONE);

        let poll = PollConfig::default()
            .with_interval(Duration::from_millis(10))
            .with_timeout(Duration::from_millis(900));
        let status = controller.wait_for_completion(&ctx, &poll).await.unwrap();

        assert_eq!(status, JobStatus::Done);
        // one submit plus four status checks
        assert_eq!(transport.call_count(), 5);
    }

    #[tokio::test]
    async fn test_wait_for_completion_propagates_poll_errors() {
        let transport = MockTransport::new();
        let session = session();
        let endpoints = EndpointConfig::default();
        let mut controller = submitted(&transport, &session).await;
        let ctx = JobContext::new(&transport, &session, &endpoints);

        transport.push_response(NOT_DONE);
        transport.push_error(TransportError::Network("reset".to_string()));

        let poll = PollConfig::default().with_interval(Duration::from_millis(1));
        let err = controller
            .wait_for_completion(&ctx, &poll)
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Status { .. }));
    }
}
