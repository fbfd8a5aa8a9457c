use actix_web::{
    http::{Method, StatusCode},
    web,
    web::ServiceConfig,
};
use food_dash_engine::{
    db_types::{OrderId, OrderUpdate},
    events::ChangeFeed,
    traits::DatabaseError,
    OrderApi,
    WebhookApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{get_request, post_request, request},
    mocks::{order, MockDashboardDb},
};
use crate::{broadcast::EventBroadcaster, config::ServerConfig, routes::WebhookRoute};

struct WebhookFixture {
    orders: MockDashboardDb,
    logs: MockDashboardDb,
    broadcaster: EventBroadcaster,
    config: ServerConfig,
}

impl WebhookFixture {
    fn new() -> Self {
        let mut logs = MockDashboardDb::new();
        logs.expect_insert_webhook_log().returning(|_| Ok(1));
        Self { orders: MockDashboardDb::new(), logs, broadcaster: EventBroadcaster::new(8), config: ServerConfig::default() }
    }

    fn routes(self) -> impl FnOnce(&mut ServiceConfig) {
        let logging = self.config.webhook_logging;
        move |cfg| {
            cfg.service(WebhookRoute::<MockDashboardDb>::new())
                .app_data(web::Data::new(OrderApi::new(self.orders, ChangeFeed::default())))
                .app_data(web::Data::new(WebhookApi::new(self.logs, logging)))
                .app_data(web::Data::new(self.broadcaster))
                .app_data(web::Data::new(self.config));
        }
    }
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[actix_web::test]
async fn accepted() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.logs = MockDashboardDb::new();
    fixture.logs.expect_insert_webhook_log().times(1).returning(|log| {
        assert_eq!(log.event_type, "message.received");
        assert_eq!(log.payload["text"], "hello");
        Ok(42)
    });
    let (status, body) = post_request("/webhook", r#"{"type":"message.received","text":"hello"}"#, fixture.routes()).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Webhook received and processed");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn untyped_bodies_are_logged_as_unknown() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.logs = MockDashboardDb::new();
    fixture.logs.expect_insert_webhook_log().times(1).returning(|log| {
        assert_eq!(log.event_type, "unknown");
        Ok(1)
    });
    let (status, _) = post_request("/webhook", r#"{"hello":"world"}"#, fixture.routes()).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn other_methods_are_not_allowed() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/webhook", WebhookFixture::new().routes()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, r#"{"error":"Method not allowed. Use POST."}"#);
    let (status, _) = request(Method::PUT, "/webhook", Some("{}"), WebhookFixture::new().routes()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn logging_failures_are_swallowed() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.logs = MockDashboardDb::new();
    fixture
        .logs
        .expect_insert_webhook_log()
        .times(1)
        .returning(|_| Err(DatabaseError::DatabaseError("no such table: webhook_logs".into())));
    let (status, body) = post_request("/webhook", r#"{"type":"ping"}"#, fixture.routes()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["success"], true);
}

#[actix_web::test]
async fn logging_can_be_disabled() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.logs = MockDashboardDb::new();
    fixture.logs.expect_insert_webhook_log().never();
    fixture.config.webhook_logging = false;
    let (status, _) = post_request("/webhook", r#"{"type":"ping"}"#, fixture.routes()).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn invalid_json_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.logs = MockDashboardDb::new();
    fixture.logs.expect_insert_webhook_log().never();
    let (status, body) = post_request("/webhook", "{not json", fixture.routes()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["success"], false);
}

#[actix_web::test]
async fn order_created() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.orders.expect_insert_order().times(1).returning(|new_order| {
        assert_eq!(new_order.order_number, "1042");
        assert_eq!(new_order.status, "pending");
        Ok(order("o-1", "1042", 1500))
    });
    let payload = json!({
        "type": "order.created",
        "order": {"id": "o-1", "chat_id": "chat-1", "order_number": "1042", "items": [{"name": "Suya"}], "total_amount": 15.0}
    });
    let (status, _) = post_request("/webhook", &payload.to_string(), fixture.routes()).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn malformed_order_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.orders.expect_insert_order().never();
    let payload = json!({"type": "order.created", "order": {"chat_id": "chat-1"}});
    let (status, body) = post_request("/webhook", &payload.to_string(), fixture.routes()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json_body(&body);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid webhook payload");
}

#[actix_web::test]
async fn oversized_totals_are_rejected() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.orders.expect_insert_order().never();
    let payload = json!({
        "type": "order.created",
        "order": {"id": "o-9", "chat_id": "chat-1", "order_number": "9", "items": [], "total_amount": 9.0e16}
    });
    let (status, body) = post_request("/webhook", &payload.to_string(), fixture.routes()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["error"], "Invalid webhook payload");
}

#[actix_web::test]
async fn update_for_unknown_order() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.orders.expect_update_order().times(1).returning(|id: &OrderId, update: OrderUpdate| {
        assert_eq!(id.as_str(), "o-404");
        assert_eq!(update.payment_status.as_deref(), Some("paid"));
        Ok(None)
    });
    let payload = json!({"type": "order.updated", "order_id": "o-404", "changes": {"payment_status": "paid"}});
    let (status, body) = post_request("/webhook", &payload.to_string(), fixture.routes()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["error"], "Order not found");
}

#[actix_web::test]
async fn internal_failures() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.orders.expect_insert_order().returning(|_| Err(DatabaseError::DatabaseError("database is locked".into())));
    let payload = json!({
        "type": "order.created",
        "order": {"chat_id": "chat-1", "order_number": "1042", "total_amount": 15.0}
    });
    let (status, body) = post_request("/webhook", &payload.to_string(), fixture.routes()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(&body);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].as_str().unwrap().contains("database is locked"));
}

#[actix_web::test]
async fn rebroadcast() {
    let _ = env_logger::try_init().ok();
    let mut fixture = WebhookFixture::new();
    fixture.config.webhook_broadcast = true;
    let mut rx = fixture.broadcaster.subscribe();
    let (status, _) = post_request("/webhook", r#"{"type":"ping","n":1}"#, fixture.routes()).await;
    assert_eq!(status, StatusCode::OK);
    let event = serde_json::to_value(rx.try_recv().unwrap()).unwrap();
    assert_eq!(event, json!({"type": "webhook", "payload": {"type": "ping", "n": 1}}));
}

#[actix_web::test]
async fn no_rebroadcast_by_default() {
    let _ = env_logger::try_init().ok();
    let fixture = WebhookFixture::new();
    let mut rx = fixture.broadcaster.subscribe();
    let (status, _) = post_request("/webhook", r#"{"type":"ping"}"#, fixture.routes()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(rx.try_recv().is_err());
}
