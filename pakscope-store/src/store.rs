//! Append-only packet log
//!
//! A record's id is its position in the log. Records are stored behind
//! `Arc` and never mutated, so a reader either sees the finished record or
//! gets `OutOfRange`.
//!
//! The log never evicts: memory grows with every packet until the session is
//! reset.

use pakscope_core::{Error, PacketData, PacketId, PacketMeta, PacketRecord, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handle to the packet log
///
/// Cloning the handle shares the same log.
#[derive(Debug, Clone, Default)]
pub struct PacketStore {
    records: Arc<RwLock<Vec<Arc<PacketRecord>>>>,
}

impl PacketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a packet and return its id
    pub fn append(&self, meta: PacketMeta, data: PacketData) -> PacketId {
        let (id, ()) = self.append_with(PacketRecord::new(meta, data), |_, _| ());
        id
    }

    /// Append a record, then run `on_stored` before any other append can start
    ///
    /// Whatever `on_stored` publishes is therefore ordered exactly like the
    /// ids. It must not block and must not call back into the store.
    pub fn append_with<F, R>(&self, record: PacketRecord, on_stored: F) -> (PacketId, R)
    where
        F: FnOnce(PacketId, &PacketRecord) -> R,
    {
        let record = Arc::new(record);
        let mut records = self.records.write();
        let id = records.len() as PacketId;
        records.push(Arc::clone(&record));

        debug!(id, name = %record.meta.name, "Stored packet");
        let out = on_stored(id, &record);
        (id, out)
    }

    /// Look up a record by id
    ///
    /// Ids come from the inspector as signed integers; anything negative or
    /// past the end is `OutOfRange`.
    pub fn get(&self, id: i64) -> Result<Arc<PacketRecord>> {
        let records = self.records.read();
        usize::try_from(id)
            .ok()
            .and_then(|idx| records.get(idx))
            .cloned()
            .ok_or(Error::OutOfRange {
                id,
                len: records.len(),
            })
    }

    /// Number of stored packets
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if no packet has been stored
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Discard every record; the next append gets id 0
    ///
    /// Returns how many records were dropped.
    pub fn reset(&self) -> usize {
        let mut records = self.records.write();
        let dropped = records.len();
        records.clear();
        info!(dropped, "Packet store reset");
        dropped
    }
}
