//! Upstream command delivery
//!
//! When the user picks a context-menu action the resulting
//! [`ActionCommand`] leaves the inspection layer through a [`CommandSink`].
//! What the upstream side does with it (resend, hide, copy) is its own
//! business.

use async_trait::async_trait;
use pakscope_core::{ActionCommand, Error, Result};
use tokio::sync::mpsc;
use tracing::info;

/// Destination for action commands
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Deliver one command upstream
    async fn send(&self, command: ActionCommand) -> Result<()>;
}

/// Forwards commands into an unbounded queue
#[derive(Debug, Clone)]
pub struct ChannelCommandSink {
    tx: mpsc::UnboundedSender<ActionCommand>,
}

impl ChannelCommandSink {
    /// Create a sink and the receiver the upstream side reads from
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ActionCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl CommandSink for ChannelCommandSink {
    async fn send(&self, command: ActionCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| Error::ChannelClosed("upstream command queue".to_string()))
    }
}

/// Logs commands and discards them
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingCommandSink;

#[async_trait]
impl CommandSink for LoggingCommandSink {
    async fn send(&self, command: ActionCommand) -> Result<()> {
        info!(
            action = command.action.as_str(),
            id = command.id,
            "No upstream attached, discarding command"
        );
        Ok(())
    }
}
