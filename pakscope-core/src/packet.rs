//! Packet types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Position of a record in the packet log
pub type PacketId = u64;

/// Decoded packet payload: field name to value, in decoder order
pub type PacketData = Map<String, Value>;

/// Which way a packet was travelling through the proxy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    /// Server to client
    Clientbound,
    /// Client to server
    Serverbound,
    /// Anything the decoder labelled differently (not a real packet)
    Other(String),
}

impl Direction {
    /// Wire name of the direction
    pub fn as_str(&self) -> &str {
        match self {
            Direction::Clientbound => "clientbound",
            Direction::Serverbound => "serverbound",
            Direction::Other(s) => s,
        }
    }

    /// True for `clientbound` and `serverbound`
    pub fn is_packet(&self) -> bool {
        !matches!(self, Direction::Other(_))
    }
}

impl From<&str> for Direction {
    fn from(s: &str) -> Self {
        match s {
            "clientbound" => Direction::Clientbound,
            "serverbound" => Direction::Serverbound,
            other => Direction::Other(other.to_string()),
        }
    }
}

impl From<String> for Direction {
    fn from(s: String) -> Self {
        match s.as_str() {
            "clientbound" => Direction::Clientbound,
            "serverbound" => Direction::Serverbound,
            _ => Direction::Other(s),
        }
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata the decoder attaches to every packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketMeta {
    /// Packet type label (e.g. "position")
    pub name: String,
    /// Travel direction
    pub direction: Direction,
    /// Any further decoder metadata (protocol state, sizes, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PacketMeta {
    /// Create metadata with no extra fields
    pub fn new<S: Into<String>>(name: S, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
            extra: Map::new(),
        }
    }

    /// Attach an extra metadata field
    pub fn with_field<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A stored packet: exactly what the decoder handed over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketRecord {
    pub meta: PacketMeta,
    pub data: PacketData,
}

impl PacketRecord {
    pub fn new(meta: PacketMeta, data: PacketData) -> Self {
        Self { meta, data }
    }

    /// Packet type label
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Travel direction
    pub fn direction(&self) -> &Direction {
        &self.meta.direction
    }
}
