//! Line-oriented chat loop over async input and output streams.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::agent::AgentSession;
use crate::error::Result;

pub const PROMPT: &str = "You: ";
pub const REPLY_PREFIX: &str = "Agent: ";

/// True for the command that ends the session.
pub fn is_exit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Reads user turns from `input` and writes replies to `output`.
///
/// Turns are strictly sequential. The first failed turn ends the loop.
pub struct InteractiveLoop<R, W> {
    input: R,
    output: W,
    cancel: CancellationToken,
}

impl<R, W> InteractiveLoop<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Print a reply the way the loop does.
    pub async fn print_reply(&mut self, text: &str) -> Result<()> {
        write_reply(&mut self.output, text).await
    }

    /// Run until `exit`, end of input, cancellation, or a failed turn.
    ///
    /// Consumes the loop so the input is dropped when it returns.
    pub async fn run(mut self, session: &AgentSession) -> Result<()> {
        let result = self.turns(session).await;
        self.output.shutdown().await?;
        result
    }

    async fn turns(&mut self, session: &AgentSession) -> Result<()> {
        let mut lines = (&mut self.input).lines();
        loop {
            self.output.write_all(PROMPT.as_bytes()).await?;
            self.output.flush().await?;

            let line = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("session canceled");
                    return Ok(());
                }
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                info!("input closed");
                return Ok(());
            };
            if is_exit_command(&line) {
                info!("exit requested");
                return Ok(());
            }
            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            match session.send(text).await {
                Ok(reply) => write_reply(&mut self.output, &reply.text).await?,
                Err(e) => {
                    error!(error = %e, category = %e.category(), "turn failed; ending session");
                    return Err(e);
                }
            }
        }
    }
}

async fn write_reply<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(format!("{REPLY_PREFIX}{text}\n").as_bytes())
        .await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_is_case_insensitive() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("EXIT"));
        assert!(is_exit_command("  Exit \n"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command("quit"));
    }
}
