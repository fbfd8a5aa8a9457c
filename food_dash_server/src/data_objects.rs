use std::fmt::Display;

use chrono::{DateTime, Utc};
use food_dash_engine::notifier::PanelState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

pub const WEBHOOK_ACCEPTED_MESSAGE: &str = "Webhook received and processed";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed. Use POST.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl WebhookAck {
    pub fn accepted() -> Self {
        Self { success: true, message: WEBHOOK_ACCEPTED_MESSAGE.to_string(), timestamp: Utc::now() }
    }
}

/// The body of a webhook that could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookFailure {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl WebhookFailure {
    pub fn new<E: Display, M: Display>(error: E, message: M) -> Self {
        Self { success: false, error: error.to_string(), message: message.to_string() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

impl SearchParams {
    /// The search term, if one was given and it is not blank.
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoundResponse {
    pub sound_on: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PanelResponse {
    pub panel: PanelState,
}
