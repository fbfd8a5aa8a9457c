use std::sync::Arc;

use actix_web::{
    http::{Method, StatusCode},
    web,
    web::ServiceConfig,
};
use food_dash_engine::{
    events::{EventProducers, OrderChangeEvent},
    notifier::{NotificationCenter, PanelState},
    traits::DatabaseError,
};
use serde_json::Value;

use super::{
    helpers::{get_request, post_request, request},
    mocks::{order, MockDashboardDb},
};
use crate::routes::{
    ClearNotificationsRoute,
    ClosePanelRoute,
    DismissAlertRoute,
    NotificationsRoute,
    TogglePanelRoute,
    ToggleSoundRoute,
    ViewOrderRoute,
};

type Center = Arc<NotificationCenter<MockDashboardDb>>;

fn new_center(db: MockDashboardDb) -> Center {
    Arc::new(NotificationCenter::new(db, true, EventProducers::default()))
}

fn routes(center: &Center) -> impl FnOnce(&mut ServiceConfig) {
    let center = web::Data::from(center.clone());
    move |cfg| {
        cfg.service(NotificationsRoute::<MockDashboardDb>::new())
            .service(ClearNotificationsRoute::<MockDashboardDb>::new())
            .service(ToggleSoundRoute::<MockDashboardDb>::new())
            .service(TogglePanelRoute::<MockDashboardDb>::new())
            .service(ClosePanelRoute::<MockDashboardDb>::new())
            .service(ViewOrderRoute::<MockDashboardDb>::new())
            .service(DismissAlertRoute::<MockDashboardDb>::new())
            .app_data(center);
    }
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

async fn seed(center: &Center) {
    center.handle_event(OrderChangeEvent::inserted(order("o-1", "1042", 1500))).await;
    let old = order("o-1", "1042", 1500);
    let mut new = old.clone();
    new.payment_status = "paid".into();
    center.handle_event(OrderChangeEvent::updated(old, new)).await;
}

#[actix_web::test]
async fn notification_snapshot() {
    let _ = env_logger::try_init().ok();
    let center = new_center(MockDashboardDb::new());
    seed(&center).await;
    let (status, body) = get_request("/notifications", routes(&center)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0]["message"], "Order #1042 payment confirmed!");
    assert_eq!(notifications[0]["order_id"], "o-1");
    assert_eq!(notifications[0]["details"]["category"], "payment_confirmed");
    assert_eq!(notifications[1]["message"], "New order #1042 (Status: pending)");
    assert_eq!(body["sound_on"], true);
    assert_eq!(body["panel"], "closed");
    assert!(body["alert"].is_null());
}

#[actix_web::test]
async fn clear_and_toggle() {
    let _ = env_logger::try_init().ok();
    let center = new_center(MockDashboardDb::new());
    seed(&center).await;

    let (status, _) = request(Method::DELETE, "/notifications", None, routes(&center)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(center.notifications().await.is_empty());
    let (status, _) = request(Method::DELETE, "/notifications", None, routes(&center)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = post_request("/notifications/sound", "", routes(&center)).await;
    assert_eq!(json_body(&body)["sound_on"], false);
    let (_, body) = post_request("/notifications/sound", "", routes(&center)).await;
    assert_eq!(json_body(&body)["sound_on"], true);

    let (_, body) = post_request("/notifications/panel", "", routes(&center)).await;
    assert_eq!(json_body(&body)["panel"], "open");
    let (_, body) = request(Method::DELETE, "/notifications/panel", None, routes(&center)).await;
    assert_eq!(json_body(&body)["panel"], "closed");
    assert_eq!(center.panel_state().await, PanelState::Closed);
}

#[actix_web::test]
async fn view_order_from_notification() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDashboardDb::new();
    db.expect_fetch_order_by_id().times(1).returning(|_| Ok(Some(order("o-1", "1042", 1500))));
    let center = new_center(db);
    seed(&center).await;
    center.toggle_panel().await;

    let (status, body) = post_request("/notifications/view/o-1", "", routes(&center)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["order_number"], "1042");
    assert_eq!(center.panel_state().await, PanelState::Closed);
    assert!(center.alert().await.is_none());
}

#[actix_web::test]
async fn failed_lookups_raise_an_alert() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDashboardDb::new();
    db.expect_fetch_order_by_id().returning(|id| match id.as_str() {
        "gone" => Ok(None),
        _ => Err(DatabaseError::DatabaseError("connection reset".into())),
    });
    let center = new_center(db);
    seed(&center).await;
    center.toggle_panel().await;

    let (status, _) = post_request("/notifications/view/gone", "", routes(&center)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = post_request("/notifications/view/o-1", "", routes(&center)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, body) = get_request("/notifications", routes(&center)).await;
    let body = json_body(&body);
    assert_eq!(body["alert"]["message"], "Failed to load order details");
    assert_eq!(body["panel"], "open");
    assert_eq!(body["notifications"].as_array().unwrap().len(), 2);

    let (_, body) = request(Method::DELETE, "/notifications/alert", None, routes(&center)).await;
    assert_eq!(json_body(&body)["success"], true);
    assert!(center.alert().await.is_none());
    let (_, body) = request(Method::DELETE, "/notifications/alert", None, routes(&center)).await;
    assert_eq!(json_body(&body)["success"], false);
}
