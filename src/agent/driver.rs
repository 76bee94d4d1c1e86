//! Starts runs and polls them until they leave `queued`/`in_progress`.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{AgentError, Result};
use crate::provider::AssistantService;
use crate::types::Run;

/// How often, and how many times, a pending run is re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Re-fetches allowed before giving up with [`AgentError::PollLimitExceeded`].
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 300,
        }
    }
}

pub struct RunDriver {
    service: Arc<dyn AssistantService>,
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl RunDriver {
    pub fn new(service: Arc<dyn AssistantService>, policy: PollPolicy) -> Self {
        Self {
            service,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Create a run for `assistant_id` on `thread_id` and wait for it to settle.
    pub async fn start(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        if self.cancel.is_cancelled() {
            return Err(AgentError::Canceled);
        }
        let run = self.service.create_run(thread_id, assistant_id).await?;
        self.wait(run).await
    }

    /// Re-fetch `run` once, then wait for it to settle.
    pub async fn refresh(&self, run: Run) -> Result<Run> {
        let run = self.service.retrieve_run(&run.thread_id, &run.id).await?;
        self.wait(run).await
    }

    /// Poll while the run is pending. A settled run is returned untouched.
    pub async fn wait(&self, mut run: Run) -> Result<Run> {
        let mut attempts = 0u32;
        while run.status.is_pending() {
            if attempts >= self.policy.max_attempts {
                return Err(AgentError::PollLimitExceeded {
                    run_id: run.id,
                    attempts,
                });
            }
            attempts += 1;

            let poll = async {
                tokio::time::sleep(self.policy.interval).await;
                self.service.retrieve_run(&run.thread_id, &run.id).await
            };
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(AgentError::Canceled),
                next = poll => next?,
            };

            debug!(run_id = %next.id, status = %next.status, attempt = attempts, "polled run");
            run = next;
        }
        Ok(run)
    }
}
