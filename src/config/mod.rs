//! Configuration system (layered: code > env > config file > defaults).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::agent::PollPolicy;
use crate::error::{AgentError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ASSISTANT_NAME: &str = "Onchain Agent";
pub const DEFAULT_RPC_URL: &str = "https://cloudflare-eth.com";
pub const DEFAULT_INSTRUCTIONS: &str = "You are an onchain assistant. You can read Ethereum \
mainnet state through the tools you are given. When asked about a wallet balance, call \
get_balance with the wallet address and answer with the balance in ETH.";

const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 300;
const DEFAULT_MAX_TOOL_ROUNDS: u32 = 16;

/// Resolved configuration for one agent process.
///
/// Resolution order, highest first:
/// 1. Values set in code (CLI flags)
/// 2. Environment variables (a `.env` file is loaded if present)
/// 3. TOML config file (`~/.onchain-agent/config.toml` unless a path is given)
/// 4. Built-in defaults
#[derive(Clone)]
pub struct AgentConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub assistant_name: String,
    pub instructions: String,
    pub rpc_url: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub max_tool_rounds: u32,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("assistant_name", &self.assistant_name)
            .field("rpc_url", &self.rpc_url)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }
}

/// On-disk shape of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    assistant_name: Option<String>,
    instructions: Option<String>,
    rpc_url: Option<String>,
    poll_interval_ms: Option<u64>,
    max_poll_attempts: Option<u32>,
    max_tool_rounds: Option<u32>,
}

impl AgentConfig {
    /// Load defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; the default location is skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();

        match path {
            Some(path) => config.apply_file(path)?,
            None => {
                let path = default_config_path();
                if path.is_file() {
                    config.apply_file(&path)?;
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from a TOML file.
    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let raw = std::fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&raw).map_err(|e| {
            AgentError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");

        if let Some(v) = file.api_key {
            self.api_key = Some(v);
        }
        if let Some(v) = file.base_url {
            self.base_url = v;
        }
        if let Some(v) = file.model {
            self.model = v;
        }
        if let Some(v) = file.assistant_name {
            self.assistant_name = v;
        }
        if let Some(v) = file.instructions {
            self.instructions = v;
        }
        if let Some(v) = file.rpc_url {
            self.rpc_url = v;
        }
        if let Some(v) = file.poll_interval_ms {
            self.poll_interval = Duration::from_millis(v);
        }
        if let Some(v) = file.max_poll_attempts {
            self.max_poll_attempts = v;
        }
        if let Some(v) = file.max_tool_rounds {
            self.max_tool_rounds = v;
        }
        Ok(())
    }

    /// Overlay values from environment variables, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OPENAI_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(v);
        }

        let string_mappings: [(&str, &mut String); 5] = [
            ("OPENAI_BASE_URL", &mut self.base_url),
            ("AGENT_MODEL", &mut self.model),
            ("AGENT_NAME", &mut self.assistant_name),
            ("AGENT_INSTRUCTIONS", &mut self.instructions),
            ("ETH_RPC_URL", &mut self.rpc_url),
        ];
        for (env_var, slot) in string_mappings {
            if let Some(v) = lookup(env_var) {
                *slot = v;
            }
        }

        if let Some(ms) = parse_env::<u64>(&lookup, "AGENT_POLL_INTERVAL_MS")? {
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Some(n) = parse_env::<u32>(&lookup, "AGENT_MAX_POLL_ATTEMPTS")? {
            self.max_poll_attempts = n;
        }
        if let Some(n) = parse_env::<u32>(&lookup, "AGENT_MAX_TOOL_ROUNDS")? {
            self.max_tool_rounds = n;
        }
        Ok(())
    }

    /// Polling policy derived from the configured interval and cap.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_attempts: self.max_poll_attempts,
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AgentError::Configuration(format!("{key} must be a non-negative integer, got '{raw}'"))
        }),
    }
}

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".onchain-agent"))
        .unwrap_or_else(|| PathBuf::from(".onchain-agent"))
        .join("config.toml")
}
