//! Upstream packet intake
//!
//! Decoders may run on any thread or task. They push into an [`IngestQueue`]
//! and a single consumer task feeds the session, so appends are serialized
//! no matter how many producers there are.

use crate::session::Session;
use pakscope_core::{Direction, Error, PacketData, PacketMeta, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Packet as handed over by a decoder
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncomingPacket {
    pub direction: Direction,
    pub meta: IncomingMeta,
    #[serde(default)]
    pub data: PacketData,
}

/// Decoder metadata; `direction` travels beside it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncomingMeta {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IncomingPacket {
    pub fn new<S: Into<String>>(direction: Direction, name: S, data: PacketData) -> Self {
        Self {
            direction,
            meta: IncomingMeta {
                name: name.into(),
                extra: Map::new(),
            },
            data,
        }
    }

    /// Decode one NDJSON line
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line.trim()).map_err(|e| Error::invalid_message(e.to_string()))
    }

    /// Split into stored metadata and payload
    pub fn into_parts(self) -> (PacketMeta, PacketData) {
        let mut extra = self.meta.extra;
        extra.remove("direction");
        let meta = PacketMeta {
            name: self.meta.name,
            direction: self.direction,
            extra,
        };
        (meta, self.data)
    }
}

/// Totals reported when the consumer finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Packets stored
    pub accepted: u64,
    /// Packets refused (e.g. no session running)
    pub rejected: u64,
}

/// Producer handle for the single-consumer packet queue
///
/// Clone it freely; the consumer stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct IngestQueue {
    tx: mpsc::UnboundedSender<IncomingPacket>,
}

impl IngestQueue {
    /// Start the consumer task for `session`
    pub fn spawn(session: Arc<Session>) -> (Self, JoinHandle<IngestSummary>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<IncomingPacket>();

        let handle = tokio::spawn(async move {
            let mut summary = IngestSummary::default();
            while let Some(packet) = rx.recv().await {
                let (meta, data) = packet.into_parts();
                let name = meta.name.clone();
                match session.handle_packet(meta, data) {
                    Ok(id) => {
                        summary.accepted += 1;
                        debug!(id, name = %name, "Ingested packet");
                    }
                    Err(e) => {
                        summary.rejected += 1;
                        warn!(name = %name, error = %e, "Dropping upstream packet");
                    }
                }
            }
            info!(
                accepted = summary.accepted,
                rejected = summary.rejected,
                "Ingest queue closed"
            );
            summary
        });

        (Self { tx }, handle)
    }

    /// Queue a packet; never waits
    pub fn push(&self, packet: IncomingPacket) -> Result<()> {
        self.tx
            .send(packet)
            .map_err(|_| Error::ChannelClosed("ingest queue".to_string()))
    }
}
