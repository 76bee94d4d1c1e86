//! One assistant plus one thread, driven turn by turn.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::provider::AssistantService;
use crate::tools::ToolRegistry;
use crate::types::{Assistant, MessageRole, Thread};

use super::dispatch::ToolDispatcher;
use super::driver::RunDriver;
use super::factory::{assistant_spec, create_assistant, create_thread};
use super::performer::{Reply, RunPerformer};

pub struct AgentSession {
    service: Arc<dyn AssistantService>,
    assistant: Assistant,
    thread: Thread,
    driver: RunDriver,
    performer: RunPerformer,
}

impl AgentSession {
    /// Create the assistant and a thread (optionally seeded) for a new session.
    pub async fn open(
        service: Arc<dyn AssistantService>,
        registry: Arc<ToolRegistry>,
        config: &AgentConfig,
        initial_message: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let spec = assistant_spec(config, &registry);
        let assistant = create_assistant(service.as_ref(), &spec).await?;
        let thread = create_thread(service.as_ref(), initial_message).await?;

        let driver = RunDriver::new(service.clone(), config.poll_policy()).with_cancellation(cancel);
        let dispatcher = ToolDispatcher::new(service.clone(), registry);
        let performer = RunPerformer::new(service.clone(), dispatcher, config.max_tool_rounds);

        Ok(Self {
            service,
            assistant,
            thread,
            driver,
            performer,
        })
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// Append a user message and run the assistant on it.
    pub async fn send(&self, text: &str) -> Result<Reply> {
        self.service
            .add_message(&self.thread.id, MessageRole::User, text)
            .await?;
        self.respond().await
    }

    /// Run the assistant on the thread as it stands.
    pub async fn respond(&self) -> Result<Reply> {
        let run = self.driver.start(&self.thread.id, &self.assistant.id).await?;
        self.performer.perform(&self.driver, run).await
    }

    /// End the session, deleting the assistant when `delete_assistant` is set.
    pub async fn close(self, delete_assistant: bool) -> Result<()> {
        if delete_assistant {
            self.service.delete_assistant(&self.assistant.id).await?;
            info!(assistant_id = %self.assistant.id, "assistant deleted");
        }
        Ok(())
    }
}
