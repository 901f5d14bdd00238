//! Inspector-facing surface of pakscope
//!
//! The inspector talks to the session over a TCP connection carrying one
//! JSON object per line. Requests and events are tagged with a `type`
//! field:
//!
//! | request                 | reply                                  |
//! |-------------------------|----------------------------------------|
//! | `startProxy`            | `updateFiltering`                      |
//! | `stopProxy`             | `proxyStopped`                         |
//! | `requestPacketDetails`  | `packetDetails`                        |
//! | `proxyCapabilities`     | `proxyCapabilities`                    |
//! | `contextMenu`           | `contextMenu` (`entries` may be null)  |
//! | `selectAction`          | none                                   |
//! | `status`                | `status`                               |
//!
//! Failures come back as `{"type":"error","msg":...}`. Packet previews
//! arrive unprompted as `packet` events.

pub mod handler;
pub mod server;

pub use handler::{execute, handle_line};
pub use server::{InspectorConfig, InspectorServer, DEFAULT_PORT};
