use std::fmt::Debug;

use log::*;
use serde_json::Value;

use crate::{
    dash_api::errors::OrderApiError,
    db_types::{NewOrder, NewWebhookLog, OrderId, OrderUpdate},
    traits::WebhookLogging,
};

pub const ORDER_CREATED_EVENT: &str = "order.created";
pub const ORDER_UPDATED_EVENT: &str = "order.updated";

/// What a webhook body asks for.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    OrderCreated(NewOrder),
    OrderUpdated { order_id: OrderId, changes: OrderUpdate },
    /// Any other event. These are logged and otherwise ignored.
    Other(String),
}

impl WebhookEvent {
    /// Interprets a webhook body. Bodies with an order event type must carry a well-formed order (`order.created`) or
    /// an `order_id` with a set of `changes` (`order.updated`).
    pub fn from_payload(payload: &Value) -> Result<Self, OrderApiError> {
        let event_type = payload.get("type").and_then(Value::as_str).unwrap_or_default();
        match event_type {
            ORDER_CREATED_EVENT => {
                let order = payload.get("order").ok_or_else(|| missing_field(event_type, "order"))?;
                let order = serde_json::from_value::<NewOrder>(order.clone())
                    .map_err(|e| OrderApiError::InvalidPayload(format!("{event_type}: {e}")))?;
                Ok(Self::OrderCreated(order))
            },
            ORDER_UPDATED_EVENT => {
                let order_id = payload
                    .get("order_id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| missing_field(event_type, "order_id"))?;
                let changes = payload.get("changes").ok_or_else(|| missing_field(event_type, "changes"))?;
                let changes = serde_json::from_value::<OrderUpdate>(changes.clone())
                    .map_err(|e| OrderApiError::InvalidPayload(format!("{event_type}: {e}")))?;
                Ok(Self::OrderUpdated { order_id: OrderId::from(order_id), changes })
            },
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

fn missing_field(event_type: &str, field: &str) -> OrderApiError {
    OrderApiError::InvalidPayload(format!("{event_type} requires an '{field}' field"))
}

pub struct WebhookApi<B> {
    db: B,
    logging_enabled: bool,
}

impl<B> Debug for WebhookApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebhookApi (logging: {})", self.logging_enabled)
    }
}

impl<B> WebhookApi<B> {
    pub fn new(db: B, logging_enabled: bool) -> Self {
        Self { db, logging_enabled }
    }
}

impl<B> WebhookApi<B>
where B: WebhookLogging
{
    /// Stores a log record of the webhook body. Failures are logged and otherwise ignored.
    pub async fn log_event(&self, payload: &Value) -> Option<i64> {
        if !self.logging_enabled {
            return None;
        }
        let log = NewWebhookLog::from_payload(payload.clone());
        let event_type = log.event_type.clone();
        match self.db.insert_webhook_log(log).await {
            Ok(id) => {
                debug!("🪝️ Webhook event '{event_type}' logged as #{id}");
                Some(id)
            },
            Err(e) => {
                warn!("🪝️ Could not log webhook event '{event_type}': {e}");
                None
            },
        }
    }
}
