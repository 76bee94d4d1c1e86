//! Executes the tool calls a run is waiting on and submits their outputs.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{AgentError, Result};
use crate::provider::AssistantService;
use crate::tools::validation::validate_arguments;
use crate::tools::{Tool, ToolArguments, ToolExecutionContext, ToolRegistry};
use crate::types::{Run, ToolCall, ToolOutput};

pub struct ToolDispatcher {
    service: Arc<dyn AssistantService>,
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    pub fn new(service: Arc<dyn AssistantService>, registry: Arc<ToolRegistry>) -> Self {
        Self { service, registry }
    }

    /// Run every pending call concurrently and submit the outputs once.
    ///
    /// Returns the run unchanged when no call produced an output.
    pub async fn dispatch(&self, run: Run) -> Result<Run> {
        let outputs = self.resolve(&run).await;
        if outputs.is_empty() {
            warn!(run_id = %run.id, "no tool outputs to submit");
            return Ok(run);
        }
        self.service
            .submit_tool_outputs(&run.thread_id, &run.id, &outputs)
            .await
    }

    /// Outputs for the run's pending calls. Unknown tools produce none.
    pub async fn resolve(&self, run: &Run) -> Vec<ToolOutput> {
        let calls = run.pending_tool_calls();
        join_all(calls.iter().map(|call| self.resolve_call(&run.id, call)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn resolve_call(&self, run_id: &str, call: &ToolCall) -> Option<ToolOutput> {
        let Some(tool) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, call_id = %call.id, "unknown tool requested; dropping call");
            return None;
        };

        let ctx = ToolExecutionContext {
            run_id: run_id.to_string(),
            tool_call_id: call.id.clone(),
        };
        let output = match invoke(tool.as_ref(), &call.arguments, &ctx).await {
            Ok(value) => render_output(value),
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "tool call failed");
                format!("Error: {e}")
            }
        };
        debug!(tool = %call.name, call_id = %call.id, "tool call resolved");

        Some(ToolOutput {
            tool_call_id: call.id.clone(),
            output,
        })
    }
}

async fn invoke(
    tool: &dyn Tool,
    raw_arguments: &str,
    ctx: &ToolExecutionContext,
) -> Result<serde_json::Value> {
    let args = ToolArguments::parse(raw_arguments)?;
    validate_arguments(args.raw(), &tool.parameters().schema).map_err(|message| {
        AgentError::InvalidArgument(format!("Argument validation failed: {message}"))
    })?;
    tool.execute(&args, ctx).await
}

/// JSON strings are sent as-is; anything else is serialized.
fn render_output(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}
