//! Job poller
//!
//! Drives one remote job to completion: submit the prompt, query its status
//! at a fixed delay until a terminal state or the attempt budget runs out,
//! then fetch the artifact the caller selected. Everything is blocking and
//! sequential; the calling thread sleeps between attempts.

use crate::config::PollSettings;
use crate::job::{JobResult, JobSnapshot, JobStatus};
use artgen_core::{ArtgenError, Result};
use log::{debug, info, warn};
use std::time::Duration;

/// Remote side of a job: the three calls the poll loop needs
pub trait JobBackend {
    /// Short provider name used in log output
    fn name(&self) -> &str;

    /// Create a job for `prompt`, returning its identifier
    fn submit(&self, prompt: &str) -> Result<String>;

    /// Query the current state of a job
    fn status(&self, job_id: &str) -> Result<JobSnapshot>;

    /// Download an artifact by URL
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<B: JobBackend + ?Sized> JobBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn submit(&self, prompt: &str) -> Result<String> {
        (**self).submit(prompt)
    }

    fn status(&self, job_id: &str) -> Result<JobSnapshot> {
        (**self).status(job_id)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// States of the poll loop
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// `attempt` status queries have been made so far
    Waiting { attempt: u32 },
    Succeeded(JobResult),
    Failed(String),
    Exhausted,
}

/// A job that reached `done`
#[derive(Debug, Clone)]
pub struct CompletedJob {
    pub id: String,
    pub prompt: String,
    pub result: JobResult,
}

/// Submits, polls and fetches through a `JobBackend`
pub struct JobPoller<B> {
    backend: B,
    settings: PollSettings,
}

impl<B: JobBackend> JobPoller<B> {
    pub fn new(backend: B, settings: PollSettings) -> Self {
        Self { backend, settings }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Submit a prompt and return the remote job identifier
    pub fn submit(&self, prompt: &str) -> Result<String> {
        let job_id = self.backend.submit(prompt)?;
        if job_id.is_empty() {
            return Err(ArtgenError::InvalidResponse(format!(
                "{} returned an empty job id",
                self.backend.name()
            )));
        }
        info!("Submitted {} job {}", self.backend.name(), job_id);
        Ok(job_id)
    }

    /// Poll with the configured budget
    pub fn poll(&self, job_id: &str) -> Result<JobResult> {
        self.poll_with(job_id, self.settings.max_attempts, self.settings.delay)
    }

    /// Poll until `done`, `failed`, or `max_attempts` status queries have
    /// been made. No sleep follows the last query.
    pub fn poll_with(&self, job_id: &str, max_attempts: u32, delay: Duration) -> Result<JobResult> {
        let mut state = PollState::Waiting { attempt: 0 };

        loop {
            state = match state {
                PollState::Waiting { attempt } if attempt >= max_attempts => PollState::Exhausted,
                PollState::Waiting { attempt } => {
                    let snapshot = self.backend.status(job_id)?;
                    let attempt = attempt + 1;

                    match snapshot.status {
                        JobStatus::Done => PollState::Succeeded(snapshot.result),
                        JobStatus::Failed => PollState::Failed(
                            snapshot
                                .result
                                .error_message
                                .unwrap_or_else(|| "Unknown error".to_string()),
                        ),
                        JobStatus::Pending | JobStatus::Processing => {
                            if !snapshot.raw_status.is_empty()
                                && JobStatus::recognise(&snapshot.raw_status).is_none()
                            {
                                warn!(
                                    "Job {} reported unrecognised status '{}'",
                                    job_id, snapshot.raw_status
                                );
                            }
                            debug!(
                                "Job {} status: {} (attempt {}/{})",
                                job_id, snapshot.raw_status, attempt, max_attempts
                            );
                            if attempt < max_attempts {
                                std::thread::sleep(delay);
                            }
                            PollState::Waiting { attempt }
                        }
                    }
                }
                PollState::Succeeded(result) => {
                    info!("Job {} done with {} slot(s)", job_id, result.slots.len());
                    return Ok(result);
                }
                PollState::Failed(message) => return Err(ArtgenError::JobFailed(message)),
                PollState::Exhausted => {
                    let waited = delay.saturating_mul(max_attempts.saturating_sub(1));
                    return Err(ArtgenError::PollTimeout {
                        attempts: max_attempts,
                        waited_secs: waited.as_secs(),
                    });
                }
            };
        }
    }

    /// Download an artifact
    pub fn fetch(&self, artifact_url: &str) -> Result<Vec<u8>> {
        let bytes = self.backend.fetch(artifact_url)?;
        debug!("Fetched {} bytes from {}", bytes.len(), artifact_url);
        Ok(bytes)
    }

    /// Submit and poll to completion with the configured budget
    pub fn run(&self, prompt: &str) -> Result<CompletedJob> {
        let id = self.submit(prompt)?;
        let result = self.poll(&id)?;
        Ok(CompletedJob {
            id,
            prompt: prompt.to_string(),
            result,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, VecDeque};
    use std::time::Instant;

    /// In-memory backend that replays a fixed sequence of statuses
    #[derive(Default)]
    pub(crate) struct ScriptedBackend {
        pub job_id: String,
        pub script: RefCell<VecDeque<(String, JobResult)>>,
        pub artifacts: HashMap<String, Vec<u8>>,
        pub submitted: RefCell<Vec<String>>,
        pub status_calls: Cell<u32>,
        pub fetch_calls: Cell<u32>,
    }

    impl ScriptedBackend {
        pub fn new(statuses: &[&str]) -> Self {
            Self {
                job_id: "gen-0001".to_string(),
                script: RefCell::new(
                    statuses
                        .iter()
                        .map(|s| (s.to_string(), JobResult::default()))
                        .collect(),
                ),
                ..Default::default()
            }
        }

        pub fn then(self, status: &str, result: JobResult) -> Self {
            self.script.borrow_mut().push_back((status.to_string(), result));
            self
        }

        pub fn with_artifact(mut self, url: &str, bytes: &[u8]) -> Self {
            self.artifacts.insert(url.to_string(), bytes.to_vec());
            self
        }
    }

    impl JobBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn submit(&self, prompt: &str) -> Result<String> {
            self.submitted.borrow_mut().push(prompt.to_string());
            Ok(self.job_id.clone())
        }

        fn status(&self, job_id: &str) -> Result<JobSnapshot> {
            self.status_calls.set(self.status_calls.get() + 1);
            let (raw, result) = self
                .script
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| ("processing".to_string(), JobResult::default()));
            Ok(JobSnapshot::new(job_id, &raw, result))
        }

        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.fetch_calls.set(self.fetch_calls.get() + 1);
            self.artifacts
                .get(url)
                .cloned()
                .ok_or_else(|| ArtgenError::Request(format!("GET {}: http status: 404", url)))
        }
    }

    pub(crate) fn done_with(url: &str) -> JobResult {
        serde_json::from_value(serde_json::json!({
            "slots": [
                {"status": "error"},
                {"status": "success", "url": url}
            ]
        }))
        .unwrap()
    }

    fn poller(backend: ScriptedBackend, max_attempts: u32) -> JobPoller<ScriptedBackend> {
        JobPoller::new(
            backend,
            PollSettings {
                max_attempts,
                delay: Duration::ZERO,
            },
        )
    }

    #[test]
    fn test_done_after_pending_counts_requests() {
        let backend = ScriptedBackend::new(&["pending", "processing", "processing"])
            .then("done", done_with("https://cdn.example.com/x.png"));
        let poller = poller(backend, 10);

        let result = poller.poll("gen-0001").unwrap();
        assert_eq!(result.slots.len(), 2);
        assert_eq!(poller.backend().status_calls.get(), 4);
    }

    #[test]
    fn test_done_on_first_query() {
        let backend = ScriptedBackend::new(&[]).then("done", done_with("u"));
        let poller = poller(backend, 3);
        assert!(poller.poll("gen-0001").is_ok());
        assert_eq!(poller.backend().status_calls.get(), 1);
    }

    #[test]
    fn test_failed_stops_polling() {
        let failure = JobResult {
            slots: vec![],
            error_message: Some("content policy".to_string()),
        };
        let backend = ScriptedBackend::new(&["processing"])
            .then("failed", failure)
            .then("done", done_with("never"));
        let poller = poller(backend, 10);

        let err = poller.poll("gen-0001").unwrap_err();
        match err {
            ArtgenError::JobFailed(msg) => assert_eq!(msg, "content policy"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(poller.backend().status_calls.get(), 2);
        assert_eq!(poller.backend().script.borrow().len(), 1);
    }

    #[test]
    fn test_failed_without_message() {
        let backend = ScriptedBackend::new(&["failed"]);
        let poller = poller(backend, 5);
        let err = poller.poll("gen-0001").unwrap_err();
        assert_eq!(err.to_string(), "Generation failed: Unknown error");
    }

    #[test]
    fn test_timeout_makes_exactly_max_attempts_queries() {
        let backend = ScriptedBackend::new(&[]);
        let poller = poller(backend, 7);

        let err = poller.poll("gen-0001").unwrap_err();
        assert!(matches!(err, ArtgenError::PollTimeout { attempts: 7, .. }));
        assert_eq!(poller.backend().status_calls.get(), 7);
    }

    #[test]
    fn test_done_on_last_attempt_is_success() {
        let backend =
            ScriptedBackend::new(&["pending", "pending"]).then("done", done_with("u"));
        let poller = poller(backend, 3);
        assert!(poller.poll("gen-0001").is_ok());
        assert_eq!(poller.backend().status_calls.get(), 3);
    }

    #[test]
    fn test_zero_budget_times_out_without_queries() {
        let backend = ScriptedBackend::new(&["done"]);
        let poller = poller(backend, 0);
        let err = poller.poll("gen-0001").unwrap_err();
        assert!(matches!(err, ArtgenError::PollTimeout { attempts: 0, .. }));
        assert_eq!(poller.backend().status_calls.get(), 0);
    }

    #[test]
    fn test_unknown_status_keeps_waiting() {
        let backend = ScriptedBackend::new(&["queued", "warming_up"]).then("done", done_with("u"));
        let poller = poller(backend, 5);
        assert!(poller.poll("gen-0001").is_ok());
        assert_eq!(poller.backend().status_calls.get(), 3);
    }

    #[test]
    fn test_timeout_reports_waited_time() {
        let poller = poller(ScriptedBackend::new(&[]), 2);
        let err = poller
            .poll_with("gen-0001", 3, Duration::from_secs(0))
            .unwrap_err();
        assert!(matches!(
            err,
            ArtgenError::PollTimeout {
                attempts: 3,
                waited_secs: 0
            }
        ));
    }

    #[test]
    fn test_sleeps_between_attempts_but_not_after_last() {
        let delay = Duration::from_millis(20);
        let poller = poller(ScriptedBackend::new(&[]), 3);

        let started = Instant::now();
        let err = poller.poll_with("gen-0001", 3, delay).unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, ArtgenError::PollTimeout { attempts: 3, .. }));
        assert_eq!(poller.backend().status_calls.get(), 3);
        assert!(elapsed >= delay * 2, "slept only {:?}", elapsed);
        assert!(elapsed < delay * 3, "slept after the last attempt: {:?}", elapsed);
    }

    #[test]
    fn test_done_on_first_query_does_not_sleep() {
        let backend = ScriptedBackend::new(&[]).then("done", done_with("u"));
        let poller = poller(backend, 3);

        let started = Instant::now();
        assert!(poller
            .poll_with("gen-0001", 3, Duration::from_secs(5))
            .is_ok());
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(poller.backend().status_calls.get(), 1);
    }

    #[test]
    fn test_run_submits_prompt_then_polls() {
        let backend = ScriptedBackend::new(&["processing"]).then("done", done_with("u"));
        let poller = poller(backend, 5);

        let job = poller.run("a pig in a cowboy hat").unwrap();
        assert_eq!(job.id, "gen-0001");
        assert_eq!(job.prompt, "a pig in a cowboy hat");
        assert_eq!(
            *poller.backend().submitted.borrow(),
            vec!["a pig in a cowboy hat".to_string()]
        );
    }

    #[test]
    fn test_fetch_missing_is_request_error() {
        let backend = ScriptedBackend::new(&[]).with_artifact("https://a/1.png", b"png");
        let poller = poller(backend, 1);
        assert_eq!(poller.fetch("https://a/1.png").unwrap(), b"png".to_vec());
        assert!(matches!(
            poller.fetch("https://a/2.png").unwrap_err(),
            ArtgenError::Request(_)
        ));
    }
}
