//! Assistant and thread creation.

use tracing::info;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::provider::AssistantService;
use crate::tools::ToolRegistry;
use crate::types::{Assistant, AssistantSpec, Thread};

/// Assistant spec from configuration plus every registered tool.
pub fn assistant_spec(config: &AgentConfig, registry: &ToolRegistry) -> AssistantSpec {
    AssistantSpec::builder()
        .name(config.assistant_name.clone())
        .instructions(config.instructions.clone())
        .model(config.model.clone())
        .tools(registry.descriptors())
        .build()
}

pub async fn create_assistant(
    service: &dyn AssistantService,
    spec: &AssistantSpec,
) -> Result<Assistant> {
    let assistant = service.create_assistant(spec).await?;
    info!(
        assistant_id = %assistant.id,
        model = %assistant.model,
        tools = spec.tools.len(),
        "assistant created"
    );
    Ok(assistant)
}

/// Create a thread; `initial_message` becomes its first user turn.
pub async fn create_thread(
    service: &dyn AssistantService,
    initial_message: Option<&str>,
) -> Result<Thread> {
    let thread = service.create_thread(initial_message).await?;
    info!(thread_id = %thread.id, "thread created");
    Ok(thread)
}
