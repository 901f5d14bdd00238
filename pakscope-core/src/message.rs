//! Wire messages exchanged with the inspector and the upstream proxy
//!
//! Every message is one JSON object. Requests and events carry a `type` tag
//! whose values follow the channel names the inspector already speaks
//! (`packet`, `requestPacketDetails`, `contextMenu`, ...).

use crate::{Direction, PacketId, PacketRecord, ProxyCapabilities};
use serde::{Deserialize, Serialize};

/// Lightweight per-packet notification with a trimmed payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEvent {
    pub packet_name: String,
    /// Bounded preview string, not the payload itself
    pub data: String,
    pub direction: Direction,
    pub id: PacketId,
}

/// Lookup of a stored packet by id
///
/// The id is signed because it comes straight from the inspector; negative
/// values are rejected by the store rather than by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRequest {
    pub id: i64,
}

/// Right-click on a packet row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMenuRequest {
    pub direction: Direction,
    /// Row label, e.g. "Player position"
    pub text: String,
    pub id: PacketId,
}

/// Actions a user can pick from a packet's context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    CopyPacketData,
    CopyHexData,
    CopyTeleportCommand,
    EditAndResend,
    HideAllOfType,
}

impl ActionKind {
    /// Wire tag of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CopyPacketData => "copyPacketData",
            ActionKind::CopyHexData => "copyHexData",
            ActionKind::CopyTeleportCommand => "copyTeleportCommand",
            ActionKind::EditAndResend => "editAndResend",
            ActionKind::HideAllOfType => "hideAllOfType",
        }
    }
}

/// Command emitted upstream once the user picks an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCommand {
    pub action: ActionKind,
    pub id: PacketId,
}

/// One line of a packet context menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MenuEntry {
    /// Disabled title row
    Header {
        icon: String,
        label: String,
        enabled: bool,
    },
    Separator,
    /// Selectable row that emits `command` when picked
    Action { label: String, command: ActionCommand },
}

impl MenuEntry {
    /// The command this entry emits, if it is selectable
    pub fn command(&self) -> Option<ActionCommand> {
        match self {
            MenuEntry::Action { command, .. } => Some(*command),
            _ => None,
        }
    }

    /// Display label (empty for separators)
    pub fn label(&self) -> &str {
        match self {
            MenuEntry::Header { label, .. } | MenuEntry::Action { label, .. } => label,
            MenuEntry::Separator => "",
        }
    }
}

/// Session summary returned by a `status` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Session id, absent when no proxy is running
    pub session_id: Option<String>,
    pub backend: Option<String>,
    /// RFC 3339 start time
    pub started_at: Option<String>,
    pub packets: usize,
    pub previews_delivered: u64,
    pub previews_dropped: u64,
    pub fields_trimmed: u64,
    pub fields_skipped: u64,
}

/// Inspector to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InspectorRequest {
    /// Select a proxy implementation and begin a new session
    StartProxy { platform: String },
    /// End the current session
    StopProxy,
    RequestPacketDetails(DetailRequest),
    ProxyCapabilities,
    ContextMenu(ContextMenuRequest),
    /// The user picked an entry from a context menu
    SelectAction(ActionCommand),
    Status,
}

impl InspectorRequest {
    /// Decode one request line
    pub fn parse(line: &str) -> crate::Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(crate::Error::invalid_message("empty request"));
        }
        serde_json::from_str(line).map_err(|e| crate::Error::invalid_message(e.to_string()))
    }
}

/// Server to inspector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InspectorEvent {
    /// Preview of a freshly stored packet
    Packet(PreviewEvent),
    /// Full, untrimmed record
    PacketDetails(PacketRecord),
    ProxyCapabilities(ProxyCapabilities),
    /// Menu for a packet row; `entries` is null when the row is not a packet
    ContextMenu { entries: Option<Vec<MenuEntry>> },
    /// A new session started; the inspector should re-apply its filters
    UpdateFiltering,
    /// The session was stopped
    ProxyStopped,
    Status(SessionStatus),
    Error { msg: String },
}

impl InspectorEvent {
    /// Build an error event from any displayable error
    pub fn error<E: std::fmt::Display>(err: E) -> Self {
        InspectorEvent::Error {
            msg: err.to_string(),
        }
    }

    /// Encode as a single line (no trailing newline)
    pub fn to_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
