use actix_web::{http::StatusCode, web, web::ServiceConfig};
use food_dash_engine::{
    db_types::{Amount, OrderId},
    events::ChangeFeed,
    traits::DatabaseError,
    CustomerApi,
    OrderApi,
    StatsApi,
};
use serde_json::Value;

use super::{
    helpers::get_request,
    mocks::{customer, order, MockDashboardDb},
};
use crate::routes::{CustomerPaidOrdersRoute, CustomersRoute, OrderByIdRoute, OrdersRoute, StatsRoute};

fn order_routes(db: MockDashboardDb) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(OrdersRoute::<MockDashboardDb>::new())
            .service(OrderByIdRoute::<MockDashboardDb>::new())
            .app_data(web::Data::new(OrderApi::new(db, ChangeFeed::default())));
    }
}

fn customer_routes(db: MockDashboardDb) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(CustomersRoute::<MockDashboardDb>::new())
            .service(CustomerPaidOrdersRoute::<MockDashboardDb>::new())
            .app_data(web::Data::new(CustomerApi::new(db)));
    }
}

fn some_orders() -> Vec<food_dash_engine::db_types::Order> {
    let mut suya = order("o-2", "1043", 2500);
    suya.items = r#"[{"name":"Suya"}]"#.to_string();
    vec![suya, order("o-1", "1042", 1500)]
}

#[actix_web::test]
async fn fetch_orders() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDashboardDb::new();
    db.expect_search_orders().times(1).returning(|_| Ok(some_orders()));
    let (status, body) = get_request("/orders", order_routes(db)).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], "o-2");
    assert_eq!(orders[0]["total_amount"], 25.0);
}

#[actix_web::test]
async fn search_orders() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDashboardDb::new();
    db.expect_search_orders().returning(|_| Ok(some_orders()));
    let (status, body) = get_request("/orders?search=SUYA", order_routes(db)).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order_number"], "1043");

    let mut db = MockDashboardDb::new();
    db.expect_search_orders().returning(|_| Ok(some_orders()));
    let (_, body) = get_request("/orders?search=", order_routes(db)).await;
    let orders: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(orders.len(), 2);
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDashboardDb::new();
    db.expect_fetch_order_by_id().returning(|id: &OrderId| match id.as_str() {
        "o-1" => Ok(Some(order("o-1", "1042", 1500))),
        _ => Ok(None),
    });
    let routes = order_routes(db);
    let (status, body) = get_request("/orders/o-1", routes).await;
    assert_eq!(status, StatusCode::OK);
    let order: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(order["order_number"], "1042");

    let mut db = MockDashboardDb::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    let (status, body) = get_request("/orders/o-9", order_routes(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. o-9"}"#);
}

#[actix_web::test]
async fn database_errors_are_500s() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDashboardDb::new();
    db.expect_search_orders().returning(|_| Err(DatabaseError::DatabaseError("disk I/O error".into())));
    let (status, body) = get_request("/orders", order_routes(db)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("disk I/O error"));
}

#[actix_web::test]
async fn search_customers() {
    let _ = env_logger::try_init().ok();
    let customers = || vec![customer(2, "Bola Ade", "+2348033334444"), customer(1, "Ada Obi", "+2348011112222")];
    let mut db = MockDashboardDb::new();
    db.expect_fetch_customers().returning(move || Ok(customers()));
    let (status, body) = get_request("/customers?search=3333", customer_routes(db)).await;
    assert_eq!(status, StatusCode::OK);
    let found: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Bola Ade");

    let mut db = MockDashboardDb::new();
    db.expect_fetch_customers().returning(move || Ok(customers()));
    let (_, body) = get_request("/customers?search=AD", customer_routes(db)).await;
    let found: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(found.len(), 2);
}

#[actix_web::test]
async fn customer_paid_orders() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDashboardDb::new();
    db.expect_fetch_customer_by_id().returning(|id| Ok((id == 1).then(|| customer(1, "Ada Obi", "+2348011112222"))));
    db.expect_search_orders().times(1).returning(|query| {
        assert_eq!(query.chat_id.as_deref(), Some("chat-1"));
        assert_eq!(query.payment_status.as_deref(), Some("paid"));
        let mut o = order("o-1", "1042", 1500);
        o.payment_status = "paid".into();
        Ok(vec![o])
    });
    let (status, body) = get_request("/customers/1/paid_orders", customer_routes(db)).await;
    assert_eq!(status, StatusCode::OK);
    let days: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["date"], "2024-05-01");
    assert_eq!(days[0]["orders"][0]["id"], "o-1");

    let mut db = MockDashboardDb::new();
    db.expect_fetch_customer_by_id().returning(|_| Ok(None));
    let (status, body) = get_request("/customers/7/paid_orders", customer_routes(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Customer 7 does not exist"}"#);
}

#[actix_web::test]
async fn dashboard_stats() {
    let _ = env_logger::try_init().ok();
    let mut db = MockDashboardDb::new();
    db.expect_search_orders().returning(|_| Ok(some_orders()));
    db.expect_fetch_customers().returning(|| Ok(vec![customer(1, "Ada Obi", "+2348011112222")]));
    let routes = move |cfg: &mut ServiceConfig| {
        cfg.service(StatsRoute::<MockDashboardDb>::new()).app_data(web::Data::new(StatsApi::new(db)));
    };
    let (status, body) = get_request("/stats", routes).await;
    assert_eq!(status, StatusCode::OK);
    let stats: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(stats["total_customers"], 1);
    assert_eq!(stats["total_orders"], 2);
    assert_eq!(stats["pending_orders"], 2);
    assert_eq!(stats["paid_orders"], 0);
    assert_eq!(stats["total_revenue"], Amount::from_cents(4000).as_f64());
    assert!(stats["monthly_orders_growth"].is_object());
}
