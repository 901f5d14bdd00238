//! Proxy session lifecycle and inspector-facing operations
//!
//! A session begins when a proxy backend is selected and ends when it is
//! stopped or replaced. Every packet operation requires a running session
//! and fails with `NotReady` otherwise.

use crate::actions::{self, ActionDispatcher};
use crate::command::{CommandSink, LoggingCommandSink};
use crate::registry::ProxyRegistry;
use chrono::{DateTime, Utc};
use pakscope_core::{
    ActionCommand, ContextMenuRequest, DetailRequest, Error, MenuEntry, PacketData, PacketId,
    PacketMeta, PacketRecord, ProxyCapabilities, Result, SessionStatus,
};
use pakscope_store::{DetailRequestHandler, NotificationChannel, PacketRecorder, StoreStats};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The running session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    /// Unique session id
    pub id: Uuid,
    /// Short name of the selected backend
    pub backend: String,
    /// Capability flags, fixed for the session
    pub capabilities: ProxyCapabilities,
    /// When the session started
    pub started_at: DateTime<Utc>,
}

/// Owns the packet pipeline and the active proxy selection
pub struct Session {
    registry: Arc<ProxyRegistry>,
    recorder: PacketRecorder,
    details: DetailRequestHandler,
    dispatcher: ActionDispatcher,
    commands: Arc<dyn CommandSink>,
    active: RwLock<Option<SessionInfo>>,
}

impl Session {
    /// Create a session manager around an existing recorder
    pub fn new(registry: Arc<ProxyRegistry>, recorder: PacketRecorder) -> Self {
        let details = DetailRequestHandler::new(recorder.store().clone());
        Self {
            registry,
            recorder,
            details,
            dispatcher: ActionDispatcher::new(),
            commands: Arc::new(LoggingCommandSink),
            active: RwLock::new(None),
        }
    }

    /// Send picked actions to `sink`
    pub fn with_command_sink(mut self, sink: Arc<dyn CommandSink>) -> Self {
        self.commands = sink;
        self
    }

    /// Use a custom menu builder
    pub fn with_dispatcher(mut self, dispatcher: ActionDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Select a backend and begin a fresh session
    ///
    /// Any previous session ends and its packets are discarded.
    pub fn start(&self, platform: &str) -> Result<SessionInfo> {
        let backend = self.registry.resolve(platform)?;

        let mut active = self.active.write();
        if let Some(previous) = active.take() {
            info!(id = %previous.id, "Replacing running session");
        }
        self.recorder.reset();

        let info = SessionInfo {
            id: Uuid::new_v4(),
            backend: backend.shortname().to_string(),
            capabilities: backend.capabilities(),
            started_at: Utc::now(),
        };
        info!(
            id = %info.id,
            platform = platform,
            backend = %info.backend,
            "Session started"
        );
        *active = Some(info.clone());
        Ok(info)
    }

    /// End the running session
    pub fn stop(&self) -> Result<SessionInfo> {
        let info = self
            .active
            .write()
            .take()
            .ok_or_else(|| Error::not_ready("stop"))?;
        info!(
            id = %info.id,
            packets = self.recorder.store().len(),
            "Session stopped"
        );
        Ok(info)
    }

    /// Current session, if any
    pub fn info(&self) -> Option<SessionInfo> {
        self.active.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.active.read().is_some()
    }

    /// Capability flags of the running session
    pub fn capabilities(&self) -> Result<ProxyCapabilities> {
        self.active
            .read()
            .as_ref()
            .map(|info| info.capabilities)
            .ok_or_else(|| Error::not_ready("proxy capabilities"))
    }

    /// Store a packet from the upstream decoder and announce it
    pub fn handle_packet(&self, meta: PacketMeta, data: PacketData) -> Result<PacketId> {
        // Held across the append so a concurrent start/reset cannot interleave
        let active = self.active.read();
        if active.is_none() {
            return Err(Error::not_ready("packet intake"));
        }
        Ok(self.recorder.record(meta, data))
    }

    /// Full record for a detail request
    pub fn packet_details(&self, request: DetailRequest) -> Result<Arc<PacketRecord>> {
        self.require_running("packet details")?;
        self.details.resolve(request)
    }

    /// Menu for a packet row; `None` when the row is not a packet
    pub fn context_menu(&self, request: &ContextMenuRequest) -> Result<Option<Vec<MenuEntry>>> {
        let info = self.require_running("context menu")?;
        let menu = self.dispatcher.build(
            &request.direction,
            &request.text,
            request.id,
            info.capabilities,
        );
        if menu.is_none() {
            debug!(direction = %request.direction, "Context menu requested for a non-packet row");
        }
        Ok(menu)
    }

    /// Send a picked action upstream
    ///
    /// The packet must exist and the session's capabilities must allow the
    /// action.
    pub async fn dispatch(&self, command: ActionCommand) -> Result<()> {
        let info = self.require_running("action dispatch")?;

        if !actions::is_permitted(command.action, info.capabilities) {
            warn!(
                action = command.action.as_str(),
                backend = %info.backend,
                "Action not supported by backend"
            );
            return Err(Error::invalid_message(format!(
                "action '{}' is not supported by the '{}' backend",
                command.action.as_str(),
                info.backend
            )));
        }
        // Ids past i64::MAX can never have been stored
        let id = i64::try_from(command.id).map_err(|_| Error::OutOfRange {
            id: i64::MAX,
            len: self.recorder.store().len(),
        })?;
        self.recorder.store().get(id)?;

        debug!(action = command.action.as_str(), id = command.id, "Dispatching action");
        self.commands.send(command).await
    }

    /// Summary for the inspector's status view
    pub fn status(&self) -> SessionStatus {
        let info = self.info();
        let stats = self.recorder.stats();
        SessionStatus {
            session_id: info.as_ref().map(|i| i.id.to_string()),
            backend: info.as_ref().map(|i| i.backend.clone()),
            started_at: info.as_ref().map(|i| i.started_at.to_rfc3339()),
            packets: self.recorder.store().len(),
            previews_delivered: stats.previews_delivered,
            previews_dropped: stats.previews_dropped,
            fields_trimmed: stats.fields_trimmed,
            fields_skipped: stats.fields_skipped,
        }
    }

    pub fn stats(&self) -> StoreStats {
        self.recorder.stats()
    }

    /// Channel previews are published on
    pub fn channel(&self) -> &Arc<NotificationChannel> {
        self.recorder.channel()
    }

    pub fn registry(&self) -> &Arc<ProxyRegistry> {
        &self.registry
    }

    fn require_running(&self, operation: &str) -> Result<SessionInfo> {
        self.active
            .read()
            .clone()
            .ok_or_else(|| Error::not_ready(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ChannelCommandSink;
    use pakscope_core::{ActionKind, Direction};
    use pakscope_store::PacketStore;
    use serde_json::json;

    fn session() -> Session {
        let recorder = PacketRecorder::new(PacketStore::new(), Arc::new(NotificationChannel::new()));
        Session::new(Arc::new(ProxyRegistry::with_builtin()), recorder)
    }

    fn data(value: serde_json::Value) -> PacketData {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn position() -> (PacketMeta, PacketData) {
        (
            PacketMeta::new("position", Direction::Clientbound),
            data(json!({"x": 12.5, "y": 64.0, "z": -3.25})),
        )
    }

    #[test]
    fn test_operations_before_start_are_not_ready() {
        let session = session();
        let (meta, data) = position();

        assert!(matches!(session.handle_packet(meta, data), Err(Error::NotReady(_))));
        assert!(matches!(session.capabilities(), Err(Error::NotReady(_))));
        assert!(matches!(
            session.packet_details(DetailRequest { id: 0 }),
            Err(Error::NotReady(_))
        ));
        assert!(matches!(
            session.context_menu(&ContextMenuRequest {
                direction: Direction::Clientbound,
                text: "Player position".to_string(),
                id: 0,
            }),
            Err(Error::NotReady(_))
        ));
        assert!(matches!(session.stop(), Err(Error::NotReady(_))));
    }

    #[test]
    fn test_start_selects_capabilities() {
        let session = session();

        let info = session.start("java").unwrap();
        assert_eq!(info.backend, "java");
        assert_eq!(session.capabilities().unwrap(), ProxyCapabilities::new(true, true, true));

        let info = session.start("anything-else").unwrap();
        assert_eq!(info.backend, "bedrock");
        assert_eq!(
            session.capabilities().unwrap(),
            ProxyCapabilities::new(true, false, false)
        );
    }

    #[test]
    fn test_packets_round_trip_through_session() {
        let session = session();
        session.start("java").unwrap();

        let (meta, payload) = position();
        let id = session.handle_packet(meta.clone(), payload.clone()).unwrap();
        assert_eq!(id, 0);

        let record = session.packet_details(DetailRequest { id: 0 }).unwrap();
        assert_eq!(record.meta, meta);
        assert_eq!(record.data, payload);

        assert!(session
            .packet_details(DetailRequest { id: 1 })
            .unwrap_err()
            .is_out_of_range());
    }

    #[test]
    fn test_new_session_resets_ids() {
        let session = session();
        session.start("java").unwrap();
        for _ in 0..3 {
            let (meta, data) = position();
            session.handle_packet(meta, data).unwrap();
        }

        let first = session.info().unwrap().id;
        let second = session.start("java").unwrap().id;
        assert_ne!(first, second);

        let (meta, data) = position();
        assert_eq!(session.handle_packet(meta, data).unwrap(), 0);
        assert_eq!(session.status().packets, 1);
    }

    #[test]
    fn test_stop_blocks_further_packets() {
        let session = session();
        session.start("bedrock").unwrap();
        session.stop().unwrap();

        let (meta, data) = position();
        assert!(matches!(session.handle_packet(meta, data), Err(Error::NotReady(_))));
        assert!(!session.is_running());
    }

    #[test]
    fn test_context_menu_uses_session_capabilities() {
        let session = session();
        session.start("bedrock").unwrap();

        let menu = session
            .context_menu(&ContextMenuRequest {
                direction: Direction::Clientbound,
                text: "Player position".to_string(),
                id: 0,
            })
            .unwrap()
            .unwrap();
        let labels: Vec<_> = menu.iter().map(|e| e.label()).collect();
        assert!(labels.contains(&"Copy teleport as command"));
        assert!(!labels.contains(&"Copy hex data"));
        assert!(!labels.contains(&"Edit and resend"));

        let none = session
            .context_menu(&ContextMenuRequest {
                direction: Direction::from("invalid"),
                text: "Player position".to_string(),
                id: 0,
            })
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_sends_upstream() {
        let (sink, mut rx) = ChannelCommandSink::new();
        let session = session().with_command_sink(Arc::new(sink));
        session.start("java").unwrap();
        let (meta, data) = position();
        session.handle_packet(meta, data).unwrap();

        let command = ActionCommand {
            action: ActionKind::EditAndResend,
            id: 0,
        };
        session.dispatch(command).await.unwrap();
        assert_eq!(rx.recv().await, Some(command));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_unknown_packet_and_unsupported_action() {
        let (sink, mut rx) = ChannelCommandSink::new();
        let session = session().with_command_sink(Arc::new(sink));
        session.start("bedrock").unwrap();
        let (meta, data) = position();
        session.handle_packet(meta, data).unwrap();

        let err = session
            .dispatch(ActionCommand {
                action: ActionKind::CopyPacketData,
                id: 5,
            })
            .await
            .unwrap_err();
        assert!(err.is_out_of_range());

        let err = session
            .dispatch(ActionCommand {
                action: ActionKind::CopyHexData,
                id: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMessage(_)));

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_rejects_ids_beyond_signed_range() {
        let (sink, mut rx) = ChannelCommandSink::new();
        let session = session().with_command_sink(Arc::new(sink));
        session.start("java").unwrap();

        let err = session
            .dispatch(ActionCommand {
                action: ActionKind::CopyPacketData,
                id: u64::MAX,
            })
            .await
            .unwrap_err();
        match err {
            Error::OutOfRange { id, len } => {
                assert!(id > 0);
                assert_eq!(len, 0);
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_custom_dispatcher_icons() {
        let session = session().with_dispatcher(ActionDispatcher::new().with_icon_dir("assets"));
        session.start("java").unwrap();

        let menu = session
            .context_menu(&ContextMenuRequest {
                direction: Direction::Serverbound,
                text: "Chat".to_string(),
                id: 0,
            })
            .unwrap()
            .unwrap();
        assert_eq!(
            menu[0],
            MenuEntry::Header {
                icon: "assets/serverbound.png".to_string(),
                label: "Chat".to_string(),
                enabled: false,
            }
        );
    }

    #[test]
    fn test_status_reflects_session() {
        let session = session();
        let idle = session.status();
        assert!(idle.session_id.is_none());
        assert_eq!(idle.packets, 0);

        let info = session.start("java").unwrap();
        let (meta, data) = position();
        session.handle_packet(meta, data).unwrap();

        let status = session.status();
        assert_eq!(status.session_id, Some(info.id.to_string()));
        assert_eq!(status.backend.as_deref(), Some("java"));
        assert_eq!(status.packets, 1);
        assert_eq!(status.previews_dropped, 1);
    }
}
