//! The assistant run loop: factories, run driver, tool dispatcher, run performer.
//!
//! ```no_run
//! use std::sync::Arc;
//! use onchain_agent::agent::AgentSession;
//! use onchain_agent::chain::JsonRpcBalanceSource;
//! use onchain_agent::config::AgentConfig;
//! use onchain_agent::provider::OpenAiAssistants;
//! use onchain_agent::tools::onchain_registry;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> onchain_agent::error::Result<()> {
//! let config = AgentConfig::load(None)?;
//! let service = Arc::new(OpenAiAssistants::from_config(&config)?);
//! let balances = Arc::new(JsonRpcBalanceSource::new(config.rpc_url.clone())?);
//! let registry = Arc::new(onchain_registry(balances));
//!
//! let session =
//!     AgentSession::open(service, registry, &config, None, CancellationToken::new()).await?;
//! let reply = session.send("What is the balance of 0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045?").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod driver;
pub mod factory;
pub mod performer;
pub mod session;

pub use dispatch::ToolDispatcher;
pub use driver::{PollPolicy, RunDriver};
pub use factory::{assistant_spec, create_assistant, create_thread};
pub use performer::{Reply, RunPerformer};
pub use session::AgentSession;
