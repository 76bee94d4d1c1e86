//! `get_balance`: native-currency balance of a wallet.

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolExecutionContext};
use super::types::ToolParameters;
use crate::chain::{format_ether, Address, BalanceSource};
use crate::error::AgentError;

pub const BALANCE_TOOL_NAME: &str = "get_balance";

/// Looks up a wallet's ETH balance and returns it as a decimal string.
pub struct BalanceTool {
    source: Arc<dyn BalanceSource>,
    parameters: ToolParameters,
}

impl BalanceTool {
    pub fn new(source: Arc<dyn BalanceSource>) -> Self {
        Self {
            source,
            parameters: ToolParameters::object()
                .string_pattern(
                    "wallet",
                    "The wallet address to check, 0x followed by 40 hex characters",
                    "^0x[0-9a-fA-F]{40}$",
                    true,
                )
                .build(),
        }
    }
}

#[async_trait]
impl Tool for BalanceTool {
    fn name(&self) -> &str {
        BALANCE_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Get the ETH balance of a wallet address"
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        _ctx: &ToolExecutionContext,
    ) -> Result<serde_json::Value, AgentError> {
        let address = Address::parse(args.get_str("wallet")?)?;
        let wei = self.source.native_balance(&address).await?;
        Ok(serde_json::Value::String(format_ether(wei)))
    }
}
