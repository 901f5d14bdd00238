//! Context-menu actions for a packet row
//!
//! Building a menu is a pure function of the row and the session's
//! capability flags. Running a picked action is a separate step
//! ([`crate::Session::dispatch`]).

use pakscope_core::{ActionCommand, ActionKind, Direction, MenuEntry, PacketId, ProxyCapabilities};

/// Index at which conditional entries are inserted (right after the copy entry)
const CONDITIONAL_SLOT: usize = 3;

/// Derives the action list for a packet
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    icon_dir: String,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self {
            icon_dir: "icons".to_string(),
        }
    }

    /// Directory the header icon paths point into
    pub fn with_icon_dir<S: Into<String>>(mut self, icon_dir: S) -> Self {
        self.icon_dir = icon_dir.into();
        self
    }

    /// Build the menu for a row, or `None` when the row is not a packet
    pub fn build(
        &self,
        direction: &Direction,
        label: &str,
        id: PacketId,
        capabilities: ProxyCapabilities,
    ) -> Option<Vec<MenuEntry>> {
        if !direction.is_packet() {
            return None;
        }

        let action = |label: &str, action: ActionKind| MenuEntry::Action {
            label: label.to_string(),
            command: ActionCommand { action, id },
        };

        let mut entries = vec![
            MenuEntry::Header {
                icon: format!("{}/{}.png", self.icon_dir, direction),
                label: label.to_string(),
                enabled: false,
            },
            MenuEntry::Separator,
            action(
                if capabilities.json_data {
                    "Copy JSON data"
                } else {
                    "Copy data"
                },
                ActionKind::CopyPacketData,
            ),
        ];
        if capabilities.modify_packets {
            entries.push(action("Edit and resend", ActionKind::EditAndResend));
        }
        entries.push(action(
            "Hide all packets of this type",
            ActionKind::HideAllOfType,
        ));

        // Inserted last-first, so hex ends up above teleport
        if is_position_label(label) && *direction == Direction::Clientbound {
            entries.insert(
                CONDITIONAL_SLOT,
                action("Copy teleport as command", ActionKind::CopyTeleportCommand),
            );
        }
        if capabilities.raw_data {
            entries.insert(
                CONDITIONAL_SLOT,
                action("Copy hex data", ActionKind::CopyHexData),
            );
        }

        Some(entries)
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// "Player position" and the like: second word is `position`
fn is_position_label(label: &str) -> bool {
    label.split_whitespace().nth(1) == Some("position")
}

/// Whether the capabilities allow an action at all
pub fn is_permitted(action: ActionKind, capabilities: ProxyCapabilities) -> bool {
    match action {
        ActionKind::EditAndResend => capabilities.modify_packets,
        ActionKind::CopyHexData => capabilities.raw_data,
        ActionKind::CopyPacketData | ActionKind::CopyTeleportCommand | ActionKind::HideAllOfType => {
            true
        }
    }
}
