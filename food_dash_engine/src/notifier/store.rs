use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    db_types::OrderId,
    notifier::{Classification, NotificationDetails},
};

/// The store never holds more than this many notifications.
pub const MAX_NOTIFICATIONS: usize = 20;

/// A notification as shown to the user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationItem {
    message: String,
    order_id: Option<OrderId>,
    timestamp: DateTime<Utc>,
    details: NotificationDetails,
}

impl NotificationItem {
    pub fn new(classification: Classification, timestamp: DateTime<Utc>) -> Self {
        let Classification { message, order_id, details } = classification;
        Self { message, order_id, timestamp, details }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn details(&self) -> &NotificationDetails {
        &self.details
    }
}

/// Bounded, most-recent-first notification history, plus the sound switch.
#[derive(Debug, Clone)]
pub struct NotificationStore {
    items: VecDeque<NotificationItem>,
    sound_on: bool,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NotificationStore {
    pub fn new(sound_on: bool) -> Self {
        Self { items: VecDeque::with_capacity(MAX_NOTIFICATIONS + 1), sound_on }
    }

    /// Puts `item` at the front, evicting the oldest entries beyond [`MAX_NOTIFICATIONS`].
    pub fn record(&mut self, item: NotificationItem) {
        self.items.push_front(item);
        self.items.truncate(MAX_NOTIFICATIONS);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Flips the sound switch and returns the new value.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_on = !self.sound_on;
        self.sound_on
    }

    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn items(&self) -> impl Iterator<Item = &NotificationItem> {
        self.items.iter()
    }

    /// A copy of the history, newest first.
    pub fn snapshot(&self) -> Vec<NotificationItem> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
