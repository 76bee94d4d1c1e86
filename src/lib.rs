//! Onchain agent: a hosted assistant that can read EVM chain state.
//!
//! Creates an assistant with a set of chain-reading tools, holds a
//! conversation thread with it, and services the tool calls the assistant
//! makes during each run.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use onchain_agent::prelude::*;
//!
//! # async fn example() -> onchain_agent::error::Result<()> {
//! let config = AgentConfig::load(None)?;
//! let service = Arc::new(OpenAiAssistants::from_config(&config)?);
//! let balances = Arc::new(JsonRpcBalanceSource::new(config.rpc_url.clone())?);
//! let registry = Arc::new(onchain_registry(balances));
//!
//! let session = AgentSession::open(service, registry, &config, None, Default::default()).await?;
//! let reply = session.send("How much ETH does 0x00000000219ab540356cBB839Cbe05303d7705Fa hold?").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod chain;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
