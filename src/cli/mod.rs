//! CLI entry point for the onchain agent.

pub mod repl;

use std::path::PathBuf;

use clap::Parser;

use crate::config::AgentConfig;

/// Chat with an onchain AI agent
#[derive(Parser, Debug)]
#[command(name = "onchain-agent", version, about = "Chat with an AI agent that can read Ethereum state")]
pub struct Cli {
    /// Config file (default: ~/.onchain-agent/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Assistant model (e.g., gpt-4o-mini)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ethereum JSON-RPC endpoint
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Delay between run status polls, in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Delete the assistant when the session ends
    #[arg(long)]
    pub cleanup: bool,

    /// First message of the conversation (positional)
    pub prompt: Option<String>,
}

impl Cli {
    /// Apply flags on top of a loaded config; flags win.
    pub fn apply_to(&self, config: &mut AgentConfig) {
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(ref url) = self.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval = std::time::Duration::from_millis(ms);
        }
    }
}
