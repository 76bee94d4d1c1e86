//! Convenience re-exports.

pub use crate::agent::{AgentSession, PollPolicy, Reply, RunDriver, RunPerformer, ToolDispatcher};
pub use crate::chain::{format_ether, Address, BalanceSource, JsonRpcBalanceSource};
pub use crate::config::AgentConfig;
pub use crate::error::{AgentError, Result};
pub use crate::provider::{AssistantService, OpenAiAssistants};
pub use crate::tools::{onchain_registry, AgentTool, Tool, ToolArguments, ToolParameters, ToolRegistry};
pub use crate::types::*;
