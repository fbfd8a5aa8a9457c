//! Records stored in, and read back from, the Food Dash datastore.
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
pub use food_dash_common::Amount;
use log::trace;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::{FromRow, Type};

/// The `payment_status` value for orders that have been paid. Every other value means "not yet paid".
pub const PAYMENT_STATUS_PAID: &str = "paid";
/// The order `status` value for orders that have not been picked up by the kitchen yet.
pub const ORDER_STATUS_PENDING: &str = "pending";
const DEFAULT_PAYMENT_STATUS: &str = "unpaid";

//--------------------------------------        OrderId        ---------------------------------------------------------
/// An opaque, unique order identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Generates a fresh random identifier for orders that arrive without one.
    pub fn random() -> Self {
        let id: String = rand::thread_rng().sample_iter(&Alphanumeric).take(20).map(char::from).collect();
        Self(id.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Links the order to the customer that placed it
    pub chat_id: String,
    /// The human-facing order label, e.g. "1042"
    pub order_number: String,
    /// The ordered items, as the raw JSON text supplied by the ordering channel
    pub items: String,
    pub total_amount: Amount,
    /// Kitchen status. This is an open-ended value, e.g. `pending`, `processing`, `delivered`.
    pub status: String,
    /// `paid`, or anything else
    pub payment_status: String,
    pub reference_number: Option<String>,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PAYMENT_STATUS_PAID
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.status == ORDER_STATUS_PENDING
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Parses the item list. Item text that is not a JSON array yields an empty list rather than an error.
    pub fn parsed_items(&self) -> Vec<Value> {
        match serde_json::from_str::<Value>(&self.items) {
            Ok(Value::Array(items)) => items,
            Ok(_) | Err(_) => {
                trace!("🗃️ Order {} has no parseable item list", self.id);
                Vec::new()
            },
        }
    }
}

//--------------------------------------       NewOrder        ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// The order id. A random id is assigned if none is supplied.
    #[serde(default)]
    pub id: Option<OrderId>,
    pub chat_id: String,
    pub order_number: String,
    /// Either a JSON string or a JSON array is accepted; it is stored as JSON text.
    #[serde(default = "empty_items", deserialize_with = "items_as_text")]
    pub items: String,
    pub total_amount: Amount,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_payment_status")]
    pub payment_status: String,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl NewOrder {
    pub fn new<S: Into<String>>(chat_id: S, order_number: S, total_amount: Amount) -> Self {
        Self {
            id: None,
            chat_id: chat_id.into(),
            order_number: order_number.into(),
            items: empty_items(),
            total_amount,
            status: default_status(),
            payment_status: default_payment_status(),
            reference_number: None,
            delivery_address: None,
            special_instructions: None,
            created_at: Utc::now(),
            delivered_at: None,
        }
    }

    pub fn with_id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_items(mut self, items: Value) -> Self {
        self.items = items.to_string();
        self
    }

    pub fn with_status<S: Into<String>>(mut self, status: S) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_payment_status<S: Into<String>>(mut self, payment_status: S) -> Self {
        self.payment_status = payment_status.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

fn empty_items() -> String {
    "[]".to_string()
}

fn default_status() -> String {
    ORDER_STATUS_PENDING.to_string()
}

fn default_payment_status() -> String {
    DEFAULT_PAYMENT_STATUS.to_string()
}

fn items_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

//--------------------------------------     OrderUpdate       ---------------------------------------------------------
/// A partial update to an order. Fields that are `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderUpdate {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub total_amount: Option<Amount>,
    pub reference_number: Option<String>,
    pub delivery_address: Option<String>,
    pub special_instructions: Option<String>,
}

impl OrderUpdate {
    pub fn with_status<S: Into<String>>(mut self, status: S) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_payment_status<S: Into<String>>(mut self, payment_status: S) -> Self {
        self.payment_status = Some(payment_status.into());
        self
    }

    pub fn with_delivered_at(mut self, delivered_at: DateTime<Utc>) -> Self {
        self.delivered_at = Some(delivered_at);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.payment_status.is_none()
            && self.delivered_at.is_none()
            && self.total_amount.is_none()
            && self.reference_number.is_none()
            && self.delivery_address.is_none()
            && self.special_instructions.is_none()
    }
}

//--------------------------------------       Customer        ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub chat_id: String,
    pub phone_number: String,
    pub name: String,
    pub email: Option<String>,
    pub total_orders: i64,
    pub total_spent: Amount,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub chat_id: String,
    pub phone_number: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl NewCustomer {
    pub fn new<S: Into<String>>(chat_id: S, name: S, phone_number: S) -> Self {
        Self {
            chat_id: chat_id.into(),
            phone_number: phone_number.into(),
            name: name.into(),
            email: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

//--------------------------------------      WebhookLog       ---------------------------------------------------------
pub const UNKNOWN_WEBHOOK_EVENT: &str = "unknown";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebhookLog {
    pub id: i64,
    pub event_type: String,
    /// The webhook body, as JSON text
    pub payload: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWebhookLog {
    pub event_type: String,
    pub payload: Value,
    pub received_at: DateTime<Utc>,
}

impl NewWebhookLog {
    /// Builds a log record for a webhook body. The event type is taken from the body's `type` field.
    pub fn from_payload(payload: Value) -> Self {
        let event_type =
            payload.get("type").and_then(Value::as_str).unwrap_or(UNKNOWN_WEBHOOK_EVENT).to_string();
        Self { event_type, payload, received_at: Utc::now() }
    }
}
