use serde::Serialize;

use crate::{
    db_types::{Order, OrderId},
    notifier::{NotificationCategory, NotificationItem},
};

/// One mutation of the order collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderChangeEvent {
    Inserted(Order),
    /// Both snapshots of the order, taken in the same write.
    Updated { old: Order, new: Order },
}

impl OrderChangeEvent {
    pub fn inserted(order: Order) -> Self {
        Self::Inserted(order)
    }

    pub fn updated(old: Order, new: Order) -> Self {
        Self::Updated { old, new }
    }

    pub fn order_id(&self) -> &OrderId {
        &self.current().id
    }

    /// The order as it stands after the change.
    pub fn current(&self) -> &Order {
        match self {
            Self::Inserted(order) => order,
            Self::Updated { new, .. } => new,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSelectedEvent {
    pub order: Order,
}

impl OrderSelectedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationRecordedEvent {
    pub notification: NotificationItem,
}

impl NotificationRecordedEvent {
    pub fn new(notification: NotificationItem) -> Self {
        Self { notification }
    }
}

/// Play the alert sound. Only emitted while sound is switched on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundAlertEvent {
    pub category: NotificationCategory,
    pub order_id: Option<OrderId>,
}

impl SoundAlertEvent {
    pub fn new(category: NotificationCategory, order_id: Option<OrderId>) -> Self {
        Self { category, order_id }
    }
}
