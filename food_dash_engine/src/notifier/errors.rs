use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{db_types::OrderId, events::ChangeFeedError};

pub const LOOKUP_FAILED_MESSAGE: &str = "Failed to load order details";

#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Could not subscribe to order changes: {0}")]
    SubscriptionError(String),
    #[error("Order {0} does not exist")]
    LookupNotFound(OrderId),
    #[error("Order lookup failed: {0}")]
    LookupTransientIO(String),
}

impl From<ChangeFeedError> for NotifierError {
    fn from(e: ChangeFeedError) -> Self {
        Self::SubscriptionError(e.to_string())
    }
}

/// A non-blocking, dismissible message shown when an action fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAlert {
    pub message: String,
    pub detail: String,
    pub raised_at: DateTime<Utc>,
}

impl UserAlert {
    pub fn lookup_failed(error: &NotifierError) -> Self {
        Self { message: LOOKUP_FAILED_MESSAGE.to_string(), detail: error.to_string(), raised_at: Utc::now() }
    }
}
