//! Maps order change events to at most one notification.
//!
//! For updates, the first matching rule wins:
//! 1. Delivered: the new snapshot has a delivery time and the old one did not.
//! 2. Payment confirmed: the payment status became `paid`.
//!
//! Delivery wins over payment when both change in the same write. This is a business rule, not an accident of
//! ordering. Any other update is ignored. Inserts always produce a "new order" notification.
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Order, OrderId},
    events::OrderChangeEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    NewOrder,
    Delivered,
    PaymentConfirmed,
}

impl Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationCategory::NewOrder => write!(f, "new_order"),
            NotificationCategory::Delivered => write!(f, "delivered"),
            NotificationCategory::PaymentConfirmed => write!(f, "payment_confirmed"),
        }
    }
}

/// The structured facts behind a rendered notification message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDetails {
    pub category: NotificationCategory,
    pub order_number: String,
    pub status: String,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl NotificationDetails {
    fn for_order(category: NotificationCategory, order: &Order) -> Self {
        Self {
            category,
            order_number: order.order_number.clone(),
            status: order.status.clone(),
            delivered_at: order.delivered_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub message: String,
    pub order_id: Option<OrderId>,
    pub details: NotificationDetails,
}

impl Classification {
    pub fn category(&self) -> NotificationCategory {
        self.details.category
    }

    fn new(category: NotificationCategory, order: &Order) -> Self {
        let n = &order.order_number;
        let message = match category {
            NotificationCategory::NewOrder => format!("New order #{n} (Status: {})", order.status),
            NotificationCategory::Delivered => format!("Order #{n} has been delivered!"),
            NotificationCategory::PaymentConfirmed => format!("Order #{n} payment confirmed!"),
        };
        Self { message, order_id: Some(order.id.clone()), details: NotificationDetails::for_order(category, order) }
    }
}

pub fn classify(event: &OrderChangeEvent) -> Option<Classification> {
    match event {
        OrderChangeEvent::Inserted(order) => Some(Classification::new(NotificationCategory::NewOrder, order)),
        OrderChangeEvent::Updated { old, new } => {
            if new.is_delivered() && !old.is_delivered() {
                Some(Classification::new(NotificationCategory::Delivered, new))
            } else if new.is_paid() && !old.is_paid() {
                Some(Classification::new(NotificationCategory::PaymentConfirmed, new))
            } else {
                None
            }
        },
    }
}
