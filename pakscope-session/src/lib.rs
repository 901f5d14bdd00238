//! Proxy session management for pakscope
//!
//! This crate ties the packet pipeline to a selected proxy backend. It
//! includes:
//!
//! - `Session`: backend selection, `NotReady` gating and every
//!   inspector-facing operation
//! - `ProxyRegistry`: backend registration and lookup by platform name
//! - `ActionDispatcher`: context-menu derivation from capability flags
//! - `IngestQueue`: single-consumer intake for upstream decoders
//! - `CommandSink`: where picked actions are sent
//!
//! # Example
//!
//! ```no_run
//! use pakscope_session::{ProxyRegistry, Session};
//! use pakscope_store::{NotificationChannel, PacketRecorder, PacketStore};
//! use std::sync::Arc;
//!
//! let recorder = PacketRecorder::new(PacketStore::new(), Arc::new(NotificationChannel::new()));
//! let session = Session::new(Arc::new(ProxyRegistry::with_builtin()), recorder);
//! session.start("java").unwrap();
//! ```

pub mod actions;
pub mod backend;
pub mod command;
pub mod ingest;
pub mod registry;
pub mod session;

pub use actions::ActionDispatcher;
pub use backend::{BedrockProxy, JavaProxy};
pub use command::{ChannelCommandSink, CommandSink, LoggingCommandSink};
pub use ingest::{IncomingPacket, IngestQueue, IngestSummary};
pub use registry::{BackendInfo, ProxyRegistry};
pub use session::{Session, SessionInfo};
