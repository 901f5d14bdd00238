//! Preview delivery to the attached inspector
//!
//! At most one inspector is subscribed at a time. Publishing never waits: an
//! event either goes into the subscriber's queue or, with nobody attached,
//! is dropped on the spot. Nothing is buffered for a future subscriber.

use pakscope_core::PreviewEvent;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Outcome of publishing one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for the subscriber
    Delivered,
    /// No live subscriber
    Dropped,
}

/// Single-subscriber, fire-and-forget event channel
#[derive(Debug, Default)]
pub struct NotificationChannel {
    subscriber: Mutex<Option<mpsc::UnboundedSender<PreviewEvent>>>,
}

/// Receiving end held by the inspector connection
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<PreviewEvent>,
}

impl Subscription {
    /// Wait for the next event
    ///
    /// Returns `None` once this subscription has been replaced or the
    /// channel has been detached.
    pub async fn recv(&mut self) -> Option<PreviewEvent> {
        self.receiver.recv().await
    }

    /// Take the next event if one is already queued
    pub fn try_recv(&mut self) -> Option<PreviewEvent> {
        self.receiver.try_recv().ok()
    }
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new subscriber, replacing any existing one
    ///
    /// The previous subscription sees the end of its stream.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let previous = self.subscriber.lock().replace(tx);
        if previous.is_some_and(|old| !old.is_closed()) {
            info!("Inspector subscription replaced");
        } else {
            info!("Inspector subscribed");
        }
        Subscription { receiver: rx }
    }

    /// Detach the current subscriber, if any
    pub fn unsubscribe(&self) {
        if self.subscriber.lock().take().is_some() {
            info!("Inspector unsubscribed");
        }
    }

    /// Whether a live subscriber is attached
    pub fn is_attached(&self) -> bool {
        self.subscriber
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    /// Hand an event to the subscriber without waiting
    pub fn publish(&self, event: PreviewEvent) -> Delivery {
        let mut subscriber = self.subscriber.lock();
        let Some(tx) = subscriber.as_ref() else {
            return Delivery::Dropped;
        };

        match tx.send(event) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::SendError(event)) => {
                debug!(id = event.id, "Inspector went away, dropping preview");
                *subscriber = None;
                Delivery::Dropped
            }
        }
    }
}
