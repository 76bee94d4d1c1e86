//! Tool system: handlers the assistant can call during a run.

pub mod arguments;
pub mod balance;
pub mod registry;
pub mod tool;
pub mod types;
pub mod validation;

use std::sync::Arc;

pub use arguments::ToolArguments;
pub use balance::BalanceTool;
pub use registry::ToolRegistry;
pub use tool::{AgentTool, Tool, ToolExecutionContext};
pub use types::ToolParameters;

use crate::chain::BalanceSource;

/// The registry the CLI starts with: every onchain read tool.
pub fn onchain_registry(balances: Arc<dyn BalanceSource>) -> ToolRegistry {
    ToolRegistry::new().with_tool(BalanceTool::new(balances))
}
