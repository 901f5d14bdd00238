//! Inspector server
//!
//! One TCP connection per inspector, newline-delimited JSON both ways.
//! Each connection subscribes to the preview channel on arrival, so the
//! most recent connection is the one that receives packet previews.

use crate::handler;
use pakscope_core::{Error, InspectorEvent, Result};
use pakscope_session::Session;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Default inspector port
pub const DEFAULT_PORT: u16 = 12000;

/// Where the inspector server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl InspectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bind_addr<S: Into<String>>(mut self, addr: S) -> Self {
        self.bind_addr = addr.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` string handed to the listener
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Serves inspector connections against a shared session
pub struct InspectorServer {
    config: InspectorConfig,
    session: Arc<Session>,
    /// Connected client count
    client_count: Arc<parking_lot::RwLock<usize>>,
}

impl InspectorServer {
    pub fn new(config: InspectorConfig, session: Arc<Session>) -> Self {
        Self {
            config,
            session,
            client_count: Arc::new(parking_lot::RwLock::new(0)),
        }
    }

    /// Number of inspectors currently connected
    pub fn client_count(&self) -> usize {
        *self.client_count.read()
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.address();
        let listener = TcpListener::bind(&addr).await?;
        info!(addr = %listener.local_addr()?, "Inspector server listening");
        Ok(listener)
    }

    /// Accept loop on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    info!(peer = %peer_addr, "Inspector connected");
                    *self.client_count.write() += 1;

                    let session = Arc::clone(&self.session);
                    let client_count = Arc::clone(&self.client_count);

                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(socket, peer_addr, session).await {
                            error!(peer = %peer_addr, error = %e, "Inspector connection failed");
                        }
                        *client_count.write() -= 1;
                        info!(peer = %peer_addr, "Inspector disconnected");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    async fn handle_client(
        socket: TcpStream,
        peer_addr: SocketAddr,
        session: Arc<Session>,
    ) -> Result<()> {
        let (reader, mut writer) = socket.into_split();
        let mut lines = BufReader::new(reader).split(b'\n');
        let mut previews = session.channel().subscribe();

        loop {
            tokio::select! {
                preview = previews.recv() => match preview {
                    Some(event) => {
                        write_event(&mut writer, &InspectorEvent::Packet(event)).await?;
                    }
                    None => {
                        info!(peer = %peer_addr, "Another inspector took over the preview stream");
                        let event = InspectorEvent::Error {
                            msg: "Another inspector attached".to_string(),
                        };
                        write_event(&mut writer, &event).await?;
                        break;
                    }
                },
                line = lines.next_segment() => match line? {
                    Some(bytes) => {
                        let line = match String::from_utf8(bytes) {
                            Ok(line) => line,
                            Err(e) => {
                                warn!(peer = %peer_addr, error = %e, "Request is not UTF-8");
                                let event = InspectorEvent::error(Error::invalid_message(format!(
                                    "request is not valid UTF-8: {}",
                                    e.utf8_error()
                                )));
                                write_event(&mut writer, &event).await?;
                                continue;
                            }
                        };
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        debug!(peer = %peer_addr, request = line, "Inspector request");
                        if let Some(event) = handler::handle_line(&session, line).await {
                            write_event(&mut writer, &event).await?;
                        }
                    }
                    None => {
                        debug!(peer = %peer_addr, "Inspector closed connection");
                        break;
                    }
                },
            }
        }

        Ok(())
    }
}

async fn write_event<W: AsyncWrite + Unpin>(writer: &mut W, event: &InspectorEvent) -> Result<()> {
    let mut line = event.to_line()?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
