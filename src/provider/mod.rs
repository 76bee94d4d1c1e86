//! Assistant service contract and its HTTP implementation.

pub mod http;
pub mod openai;

pub use openai::OpenAiAssistants;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Assistant, AssistantSpec, MessageRole, Run, Thread, ThreadMessage, ToolOutput,
};

/// Hosted conversational-assistant service.
///
/// Every call is a single request/response round-trip; implementations do not
/// retry.
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Create an assistant with instructions and tool descriptors.
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant>;

    /// Delete an assistant created earlier.
    async fn delete_assistant(&self, assistant_id: &str) -> Result<()>;

    /// Create a thread, optionally seeded with a first user message.
    async fn create_thread(&self, initial_message: Option<&str>) -> Result<Thread>;

    /// Append a message to a thread.
    async fn add_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage>;

    /// Start a run of `assistant_id` on `thread_id`.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// Fetch the current state of a run.
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Submit outputs for the run's pending tool calls.
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run>;

    /// List a thread's messages, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;
}
