//! pakscope core library
//!
//! This crate provides the packet model, proxy capability flags, wire
//! messages and error handling shared by every pakscope crate.

pub mod capabilities;
pub mod error;
pub mod message;
pub mod packet;

// Re-export commonly used types
pub use capabilities::{ProxyBackend, ProxyCapabilities};
pub use error::{Error, Result};
pub use message::{
    ActionCommand, ActionKind, ContextMenuRequest, DetailRequest, InspectorEvent,
    InspectorRequest, MenuEntry, PreviewEvent, SessionStatus,
};
pub use packet::{Direction, PacketData, PacketId, PacketMeta, PacketRecord};
