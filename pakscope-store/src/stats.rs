//! Store statistics and metrics

use crate::notify::Delivery;
use crate::preview::Preview;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Statistics for the packet pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStats {
    /// Number of packets appended to the log
    pub packets_appended: u64,
    /// Previews handed to an attached inspector
    pub previews_delivered: u64,
    /// Previews discarded because no inspector was attached
    pub previews_dropped: u64,
    /// Fields shortened to a rounded number or an ellipsis
    pub fields_trimmed: u64,
    /// Fields left out of a preview because they could not be serialized
    pub fields_skipped: u64,
    /// Time since the counters were last reset
    pub duration: Duration,
    /// Packets per second over `duration`
    pub packets_per_second: f64,
}

impl StoreStats {
    /// Share of previews that reached an inspector, as a percentage
    pub fn delivery_rate(&self) -> f64 {
        let total = self.previews_delivered + self.previews_dropped;
        if total == 0 {
            return 0.0;
        }
        (self.previews_delivered as f64 / total as f64) * 100.0
    }

    /// Format statistics as human-readable string
    pub fn format(&self) -> String {
        format!(
            "Packets: {} ({:.2} pps over {:.2}s)\n\
             Previews: {} delivered, {} dropped\n\
             Fields: {} trimmed, {} skipped",
            self.packets_appended,
            self.packets_per_second,
            self.duration.as_secs_f64(),
            self.previews_delivered,
            self.previews_dropped,
            self.fields_trimmed,
            self.fields_skipped
        )
    }
}

/// Thread-safe statistics accumulator
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    packets_appended: Arc<AtomicU64>,
    previews_delivered: Arc<AtomicU64>,
    previews_dropped: Arc<AtomicU64>,
    fields_trimmed: Arc<AtomicU64>,
    fields_skipped: Arc<AtomicU64>,
    start_time: Arc<parking_lot::Mutex<Instant>>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self {
            packets_appended: Arc::new(AtomicU64::new(0)),
            previews_delivered: Arc::new(AtomicU64::new(0)),
            previews_dropped: Arc::new(AtomicU64::new(0)),
            fields_trimmed: Arc::new(AtomicU64::new(0)),
            fields_skipped: Arc::new(AtomicU64::new(0)),
            start_time: Arc::new(parking_lot::Mutex::new(Instant::now())),
        }
    }

    /// Record the trimming outcome for one packet
    pub fn record_preview(&self, preview: &Preview) {
        self.packets_appended.fetch_add(1, Ordering::Relaxed);
        self.fields_trimmed
            .fetch_add(preview.trimmed_fields as u64, Ordering::Relaxed);
        self.fields_skipped
            .fetch_add(preview.skipped_fields as u64, Ordering::Relaxed);
    }

    /// Record whether the preview reached the inspector
    pub fn record_delivery(&self, delivery: Delivery) {
        match delivery {
            Delivery::Delivered => self.previews_delivered.fetch_add(1, Ordering::Relaxed),
            Delivery::Dropped => self.previews_dropped.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self) -> StoreStats {
        let packets_appended = self.packets_appended.load(Ordering::Relaxed);
        let duration = self.start_time.lock().elapsed();

        let secs = duration.as_secs_f64();
        let packets_per_second = if secs > 0.0 {
            packets_appended as f64 / secs
        } else {
            0.0
        };

        StoreStats {
            packets_appended,
            previews_delivered: self.previews_delivered.load(Ordering::Relaxed),
            previews_dropped: self.previews_dropped.load(Ordering::Relaxed),
            fields_trimmed: self.fields_trimmed.load(Ordering::Relaxed),
            fields_skipped: self.fields_skipped.load(Ordering::Relaxed),
            duration,
            packets_per_second,
        }
    }

    /// Reset all statistics and restart the clock
    pub fn reset(&self) {
        self.packets_appended.store(0, Ordering::Relaxed);
        self.previews_delivered.store(0, Ordering::Relaxed);
        self.previews_dropped.store(0, Ordering::Relaxed);
        self.fields_trimmed.store(0, Ordering::Relaxed);
        self.fields_skipped.store(0, Ordering::Relaxed);
        *self.start_time.lock() = Instant::now();
    }

    pub fn fields_skipped(&self) -> u64 {
        self.fields_skipped.load(Ordering::Relaxed)
    }
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn preview(trimmed: usize, skipped: usize) -> Preview {
        Preview {
            text: "{}".to_string(),
            trimmed_fields: trimmed,
            skipped_fields: skipped,
            truncated: false,
        }
    }

    #[test]
    fn test_stats_accumulator_basic() {
        let acc = StatsAccumulator::new();

        acc.record_preview(&preview(2, 0));
        acc.record_preview(&preview(0, 1));
        acc.record_delivery(Delivery::Delivered);
        acc.record_delivery(Delivery::Dropped);

        let stats = acc.snapshot();
        assert_eq!(stats.packets_appended, 2);
        assert_eq!(stats.fields_trimmed, 2);
        assert_eq!(stats.fields_skipped, 1);
        assert_eq!(stats.previews_delivered, 1);
        assert_eq!(stats.previews_dropped, 1);
        assert_eq!(stats.delivery_rate(), 50.0);
    }

    #[test]
    fn test_stats_accumulator_reset() {
        let acc = StatsAccumulator::new();
        acc.record_preview(&preview(1, 1));
        acc.record_delivery(Delivery::Dropped);

        acc.reset();

        let stats = acc.snapshot();
        assert_eq!(stats.packets_appended, 0);
        assert_eq!(stats.previews_dropped, 0);
        assert_eq!(acc.fields_skipped(), 0);
    }

    #[test]
    fn test_delivery_rate_without_previews() {
        assert_eq!(StoreStats::default().delivery_rate(), 0.0);
    }

    #[test]
    fn test_stats_format() {
        let stats = StoreStats {
            packets_appended: 1000,
            previews_delivered: 990,
            previews_dropped: 10,
            fields_trimmed: 42,
            fields_skipped: 3,
            duration: Duration::from_secs(10),
            packets_per_second: 100.0,
        };

        let formatted = stats.format();
        assert!(formatted.contains("1000"));
        assert!(formatted.contains("990 delivered"));
        assert!(formatted.contains("3 skipped"));
    }

    #[test]
    fn test_stats_accumulator_thread_safety() {
        let acc = StatsAccumulator::new();
        let acc_clone = acc.clone();

        let handle = thread::spawn(move || {
            for _ in 0..100 {
                acc_clone.record_delivery(Delivery::Delivered);
            }
        });

        for _ in 0..100 {
            acc.record_delivery(Delivery::Delivered);
        }

        handle.join().unwrap();
        assert_eq!(acc.snapshot().previews_delivered, 200);
    }
}
