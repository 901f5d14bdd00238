//! Packet intake: store, then announce

use crate::notify::NotificationChannel;
use crate::preview::PreviewTrimmer;
use crate::stats::{StatsAccumulator, StoreStats};
use crate::store::PacketStore;
use pakscope_core::{PacketData, PacketId, PacketMeta, PacketRecord, PreviewEvent};
use std::sync::Arc;

/// Stores each incoming packet and pushes its preview to the inspector
///
/// The preview is built before the store lock is taken; publishing happens
/// while it is held so previews leave in id order.
#[derive(Debug, Clone)]
pub struct PacketRecorder {
    store: PacketStore,
    channel: Arc<NotificationChannel>,
    trimmer: PreviewTrimmer,
    stats: StatsAccumulator,
}

impl PacketRecorder {
    pub fn new(store: PacketStore, channel: Arc<NotificationChannel>) -> Self {
        Self {
            store,
            channel,
            trimmer: PreviewTrimmer::new(),
            stats: StatsAccumulator::new(),
        }
    }

    /// Use a trimmer with custom limits
    pub fn with_trimmer(mut self, trimmer: PreviewTrimmer) -> Self {
        self.trimmer = trimmer;
        self
    }

    /// Store a packet and publish its preview
    pub fn record(&self, meta: PacketMeta, data: PacketData) -> PacketId {
        let preview = self.trimmer.trim(&data);
        self.stats.record_preview(&preview);

        let text = preview.text;
        let (id, delivery) =
            self.store
                .append_with(PacketRecord::new(meta, data), |id, record| {
                    self.channel.publish(PreviewEvent {
                        packet_name: record.meta.name.clone(),
                        data: text,
                        direction: record.meta.direction.clone(),
                        id,
                    })
                });
        self.stats.record_delivery(delivery);
        id
    }

    pub fn store(&self) -> &PacketStore {
        &self.store
    }

    pub fn channel(&self) -> &Arc<NotificationChannel> {
        &self.channel
    }

    pub fn stats(&self) -> StoreStats {
        self.stats.snapshot()
    }

    /// Clear the log and the counters
    pub fn reset(&self) {
        self.store.reset();
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PREVIEW_LIMIT;
    use pakscope_core::Direction;
    use serde_json::json;

    fn recorder() -> PacketRecorder {
        PacketRecorder::new(PacketStore::new(), Arc::new(NotificationChannel::new()))
    }

    fn data(value: serde_json::Value) -> PacketData {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[tokio::test]
    async fn test_record_stores_full_and_publishes_trimmed() {
        let recorder = recorder();
        let mut sub = recorder.channel().subscribe();

        let payload = data(json!({"x": 3.141592653589793, "message": "a long chat message here"}));
        let id = recorder.record(
            PacketMeta::new("position", Direction::Clientbound),
            payload.clone(),
        );

        let event = sub.recv().await.unwrap();
        assert_eq!(event.id, id);
        assert_eq!(event.packet_name, "position");
        assert_eq!(event.direction, Direction::Clientbound);
        assert_eq!(event.data, r#"{"x":3.14,"message":"..."}"#);

        let stored = recorder.store().get(id as i64).unwrap();
        assert_eq!(stored.data, payload);
    }

    #[test]
    fn test_record_without_inspector_still_stores() {
        let recorder = recorder();
        let id = recorder.record(PacketMeta::new("chat", Direction::Serverbound), data(json!({})));

        assert_eq!(id, 0);
        assert_eq!(recorder.store().len(), 1);

        let stats = recorder.stats();
        assert_eq!(stats.packets_appended, 1);
        assert_eq!(stats.previews_dropped, 1);
        assert_eq!(stats.previews_delivered, 0);
    }

    #[tokio::test]
    async fn test_preview_order_matches_ids_across_threads() {
        let recorder = recorder();
        let mut sub = recorder.channel().subscribe();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let recorder = recorder.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        recorder.record(
                            PacketMeta::new("spam", Direction::Clientbound),
                            data(json!({"t": t, "i": i})),
                        );
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        for expected in 0..200u64 {
            assert_eq!(sub.try_recv().unwrap().id, expected);
        }
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_large_payload_preview_is_bounded() {
        let recorder = recorder();
        let mut sub = recorder.channel().subscribe();

        let mut payload = PacketData::new();
        for i in 0..500 {
            payload.insert(format!("k{}", i), json!(i));
        }
        recorder.record(PacketMeta::new("map_chunk", Direction::Clientbound), payload);

        let event = sub.recv().await.unwrap();
        assert_eq!(event.data.chars().count(), PREVIEW_LIMIT);
    }

    #[tokio::test]
    async fn test_custom_trimmer_limits_preview() {
        let recorder = recorder().with_trimmer(PreviewTrimmer::with_limits(3, 12));
        let mut sub = recorder.channel().subscribe();

        recorder.record(
            PacketMeta::new("chat", Direction::Serverbound),
            data(json!({"m": "hello", "n": 1})),
        );

        let event = sub.recv().await.unwrap();
        assert_eq!(event.data, r#"{"m":"...",""#);
        assert_eq!(recorder.stats().fields_trimmed, 1);
    }

    #[test]
    fn test_reset_restarts_ids_and_stats() {
        let recorder = recorder();
        recorder.record(PacketMeta::new("a", Direction::Clientbound), data(json!({})));
        recorder.record(PacketMeta::new("b", Direction::Clientbound), data(json!({})));

        recorder.reset();

        assert_eq!(recorder.stats().packets_appended, 0);
        assert_eq!(
            recorder.record(PacketMeta::new("c", Direction::Clientbound), data(json!({}))),
            0
        );
    }
}
