//! Drives a run to a terminal state and extracts the assistant's reply.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AgentError, Result};
use crate::provider::AssistantService;
use crate::types::{MessageRole, Run, RunStatus};

use super::dispatch::ToolDispatcher;
use super::driver::RunDriver;

pub const NO_RESPONSE: &str = "No response from assistant";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// The text shown to the user for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub run_id: String,
    pub status: RunStatus,
}

pub struct RunPerformer {
    service: Arc<dyn AssistantService>,
    dispatcher: ToolDispatcher,
    max_tool_rounds: u32,
}

impl RunPerformer {
    pub fn new(
        service: Arc<dyn AssistantService>,
        dispatcher: ToolDispatcher,
        max_tool_rounds: u32,
    ) -> Self {
        Self {
            service,
            dispatcher,
            max_tool_rounds,
        }
    }

    /// Resolve tool rounds until the run settles, then build the reply.
    pub async fn perform(&self, driver: &RunDriver, mut run: Run) -> Result<Reply> {
        let mut rounds = 0u32;
        while run.status == RunStatus::RequiresAction {
            if rounds >= self.max_tool_rounds {
                return Err(AgentError::ToolRoundLimitExceeded {
                    run_id: run.id,
                    rounds,
                });
            }
            rounds += 1;

            run = self.dispatcher.dispatch(run).await?;
            run = if run.status == RunStatus::RequiresAction {
                driver.refresh(run).await?
            } else {
                driver.wait(run).await?
            };
        }

        if run.status == RunStatus::Failed {
            return self.failure_reply(run).await;
        }

        if run.status != RunStatus::Completed {
            warn!(run_id = %run.id, status = %run.status, "run ended without completing");
        }

        let messages = self.service.list_messages(&run.thread_id).await?;
        let text = messages
            .into_iter()
            .find(|m| m.is_assistant())
            .map(|m| m.content)
            .unwrap_or_else(|| NO_RESPONSE.to_string());

        Ok(Reply {
            text,
            run_id: run.id,
            status: run.status,
        })
    }

    /// Record the failure in the thread and hand it back as the reply.
    async fn failure_reply(&self, run: Run) -> Result<Reply> {
        let reason = run
            .last_error
            .as_ref()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or(UNKNOWN_ERROR);
        let text = format!("I encountered an error: {reason}");

        info!(run_id = %run.id, reason, "run failed");
        self.service
            .add_message(&run.thread_id, MessageRole::Assistant, &text)
            .await?;

        Ok(Reply {
            text,
            run_id: run.id,
            status: run.status,
        })
    }
}
