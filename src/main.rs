//! Onchain agent CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onchain_agent::agent::AgentSession;
use onchain_agent::chain::JsonRpcBalanceSource;
use onchain_agent::cli::repl::InteractiveLoop;
use onchain_agent::cli::Cli;
use onchain_agent::config::AgentConfig;
use onchain_agent::provider::OpenAiAssistants;
use onchain_agent::tools::onchain_registry;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onchain_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cancel = CancellationToken::new();

    let session = match start(&cli, cancel.clone()).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut repl = InteractiveLoop::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .with_cancellation(cancel);

    let seeded = match cli.prompt {
        Some(_) => match session.respond().await {
            Ok(reply) => repl.print_reply(&reply.text).await,
            Err(e) => Err(e),
        },
        None => Ok(()),
    };

    // Turn failures are logged by the loop; they end the session, not the process.
    match seeded {
        Ok(()) => {
            let _ = repl.run(&session).await;
        }
        Err(e) => tracing::error!(error = %e, "first turn failed; ending session"),
    }

    if let Err(e) = session.close(cli.cleanup).await {
        tracing::warn!(error = %e, "failed to clean up assistant");
    }
}

async fn start(cli: &Cli, cancel: CancellationToken) -> onchain_agent::error::Result<AgentSession> {
    let mut config = AgentConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    tracing::debug!(?config, "configuration resolved");

    let service = Arc::new(OpenAiAssistants::from_config(&config)?);
    let balances = Arc::new(JsonRpcBalanceSource::new(config.rpc_url.clone())?);
    let registry = Arc::new(onchain_registry(balances));

    AgentSession::open(service, registry, &config, cli.prompt.as_deref(), cancel).await
}
