//! Full-detail lookups for the inspector

use crate::store::PacketStore;
use pakscope_core::{DetailRequest, PacketRecord, Result};
use std::sync::Arc;
use tracing::warn;

/// Resolves inspector detail requests against the packet log
///
/// This is the only path that hands out untrimmed payloads.
#[derive(Debug, Clone)]
pub struct DetailRequestHandler {
    store: PacketStore,
}

impl DetailRequestHandler {
    pub fn new(store: PacketStore) -> Self {
        Self { store }
    }

    /// Fetch the record named by the request
    pub fn resolve(&self, request: DetailRequest) -> Result<Arc<PacketRecord>> {
        self.store.get(request.id).inspect_err(|e| {
            warn!(id = request.id, error = %e, "Detail request for unknown packet");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pakscope_core::{Direction, PacketMeta};
    use serde_json::json;

    fn store_with_one() -> PacketStore {
        let store = PacketStore::new();
        let data = match json!({"message": "this message is far too long to preview"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        store.append(PacketMeta::new("chat", Direction::Clientbound), data);
        store
    }

    #[test]
    fn test_resolve_returns_untrimmed_record() {
        let handler = DetailRequestHandler::new(store_with_one());
        let record = handler.resolve(DetailRequest { id: 0 }).unwrap();

        assert_eq!(
            serde_json::to_value(&*record).unwrap(),
            json!({
                "meta": {"name": "chat", "direction": "clientbound"},
                "data": {"message": "this message is far too long to preview"}
            })
        );
    }

    #[test]
    fn test_resolve_rejects_bad_ids() {
        let handler = DetailRequestHandler::new(store_with_one());
        for id in [-1, 1, 1000] {
            let err = handler.resolve(DetailRequest { id }).unwrap_err();
            assert!(err.to_string().contains("out of range"));
        }
    }

    #[test]
    fn test_resolve_propagates_out_of_range() {
        let handler = DetailRequestHandler::new(PacketStore::new());
        assert!(handler
            .resolve(DetailRequest { id: 0 })
            .unwrap_err()
            .is_out_of_range());
    }
}
