//! Packet log and inspector notification for pakscope
//!
//! This crate holds everything between the upstream decoder and the
//! inspector connection.
//!
//! ## Features
//!
//! - **Packet Log**: append-only, indexable, shared between writer and readers
//! - **Previews**: bounded-size summaries of each payload
//! - **Notification**: single-subscriber, non-blocking preview delivery
//! - **Details**: full-record lookups by id
//! - **Statistics**: counters for appends, deliveries and trimmed fields
//!
//! ## Example
//!
//! ```
//! use pakscope_core::{Direction, PacketData, PacketMeta};
//! use pakscope_store::{NotificationChannel, PacketRecorder, PacketStore};
//! use std::sync::Arc;
//!
//! let recorder = PacketRecorder::new(PacketStore::new(), Arc::new(NotificationChannel::new()));
//! let id = recorder.record(PacketMeta::new("keep_alive", Direction::Clientbound), PacketData::new());
//! assert_eq!(id, 0);
//! ```

pub mod detail;
pub mod notify;
pub mod preview;
pub mod recorder;
pub mod stats;
pub mod store;

// Re-export main types
pub use detail::DetailRequestHandler;
pub use notify::{Delivery, NotificationChannel, Subscription};
pub use preview::{Preview, PreviewTrimmer, ELLIPSIS, FIELD_LIMIT, PREVIEW_LIMIT};
pub use recorder::PacketRecorder;
pub use stats::{StatsAccumulator, StoreStats};
pub use store::PacketStore;
