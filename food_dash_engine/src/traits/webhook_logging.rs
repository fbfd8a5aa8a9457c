use crate::{
    db_types::{NewWebhookLog, WebhookLog},
    traits::DatabaseError,
};

#[allow(async_fn_in_trait)]
pub trait WebhookLogging {
    /// Stores the log record and returns its id.
    async fn insert_webhook_log(&self, log: NewWebhookLog) -> Result<i64, DatabaseError>;

    /// The most recent `limit` records, newest first.
    async fn fetch_webhook_logs(&self, limit: u32) -> Result<Vec<WebhookLog>, DatabaseError>;
}
