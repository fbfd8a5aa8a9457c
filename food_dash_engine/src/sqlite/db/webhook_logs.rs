use sqlx::SqliteConnection;

use crate::db_types::{NewWebhookLog, WebhookLog};

pub async fn insert_webhook_log(log: NewWebhookLog, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO webhook_logs (event_type, payload, received_at) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(log.event_type)
    .bind(log.payload.to_string())
    .bind(log.received_at)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn fetch_webhook_logs(limit: u32, conn: &mut SqliteConnection) -> Result<Vec<WebhookLog>, sqlx::Error> {
    let logs = sqlx::query_as("SELECT * FROM webhook_logs ORDER BY received_at DESC, id DESC LIMIT $1")
        .bind(i64::from(limit))
        .fetch_all(conn)
        .await?;
    Ok(logs)
}
