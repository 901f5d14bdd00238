//! Upstream command output

use async_trait::async_trait;
use pakscope_core::{ActionCommand, Result};
use pakscope_session::CommandSink;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::debug;

/// Writes each command as one JSON line
pub struct WriterCommandSink<W> {
    writer: Mutex<W>,
}

impl<W> WriterCommandSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterCommandSink<tokio::io::Stdout> {
    /// Sink for the process's stdout
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> CommandSink for WriterCommandSink<W> {
    async fn send(&self, command: ActionCommand) -> Result<()> {
        let mut line = serde_json::to_string(&command)?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        debug!(action = command.action.as_str(), id = command.id, "Command written");
        Ok(())
    }
}
