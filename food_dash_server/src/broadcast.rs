//! The live event stream
//!
//! Every browser connected to `/events` holds a receiver on one [`EventBroadcaster`]. The notification hooks and the
//! webhook route push [`LiveEvent`]s into it, and each receiver turns them into server-sent event frames.
//! Receivers that fall behind by more than the channel capacity miss the oldest events and carry on.
use std::convert::Infallible;

use bytes::Bytes;
use food_dash_engine::{
    db_types::{Order, OrderId},
    events::{EventHooks, NotificationRecordedEvent, OrderSelectedEvent, SoundAlertEvent},
    notifier::{NotificationCategory, NotificationItem},
};
use futures::{stream, Stream};
use log::*;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::errors::ConversionError;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    Notification { notification: NotificationItem },
    Alert { category: NotificationCategory, order_id: Option<OrderId> },
    OrderSelected { order: Order },
    Webhook { payload: Value },
}

impl LiveEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Notification { .. } => "notification",
            Self::Alert { .. } => "alert",
            Self::OrderSelected { .. } => "order_selected",
            Self::Webhook { .. } => "webhook",
        }
    }

    /// Renders the event as one server-sent event frame.
    pub fn to_sse_frame(&self) -> Result<Bytes, ConversionError> {
        let json = serde_json::to_string(self)?;
        Ok(Bytes::from(format!("data: {json}\n\n")))
    }
}

impl From<NotificationRecordedEvent> for LiveEvent {
    fn from(event: NotificationRecordedEvent) -> Self {
        Self::Notification { notification: event.notification }
    }
}

impl From<SoundAlertEvent> for LiveEvent {
    fn from(event: SoundAlertEvent) -> Self {
        Self::Alert { category: event.category, order_id: event.order_id }
    }
}

impl From<OrderSelectedEvent> for LiveEvent {
    fn from(event: OrderSelectedEvent) -> Self {
        Self::OrderSelected { order: event.order }
    }
}

#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends the event to every connected receiver. Having no receivers is not an error.
    pub fn emit(&self, event: LiveEvent) {
        let event_type = event.event_type();
        match self.tx.send(event) {
            Ok(n) => trace!("📡️ '{event_type}' sent to {n} listeners"),
            Err(_) => trace!("📡️ No listeners for '{event_type}'"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Hooks that forward notifier output onto this broadcaster.
    pub fn hooks(&self) -> EventHooks {
        let mut hooks = EventHooks::default();
        let on_notification = self.clone();
        let on_alert = self.clone();
        let on_selected = self.clone();
        hooks
            .on_notification(move |ev| {
                on_notification.emit(ev.into());
                Box::pin(async {})
            })
            .on_sound_alert(move |ev| {
                on_alert.emit(ev.into());
                Box::pin(async {})
            })
            .on_order_selected(move |ev| {
                on_selected.emit(ev.into());
                Box::pin(async {})
            });
        hooks
    }

    /// A never-ending stream of server-sent event frames for one listener. The stream ends when the broadcaster is
    /// dropped.
    pub fn sse_stream(&self) -> impl Stream<Item = Result<Bytes, Infallible>> + 'static {
        stream::unfold(self.subscribe(), |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => match event.to_sse_frame() {
                        Ok(frame) => return Some((Ok(frame), rx)),
                        Err(e) => warn!("📡️ Dropping '{}' event. {e}", event.event_type()),
                    },
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("📡️ A live event listener fell behind and missed {n} events");
                    },
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }
}
