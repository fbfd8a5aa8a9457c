use chrono::{TimeZone, Utc};
use food_dash_engine::{
    db_types::{Amount, Customer, NewCustomer, NewOrder, NewWebhookLog, Order, OrderId, OrderUpdate, WebhookLog},
    order_objects::OrderQueryFilter,
    traits::{CustomerManagement, DatabaseError, OrderManagement, WebhookLogging},
};
use mockall::mock;

mock! {
    pub DashboardDb {}
    impl OrderManagement for DashboardDb {
        async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, DatabaseError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, DatabaseError>;
        async fn insert_order(&self, order: NewOrder) -> Result<Order, DatabaseError>;
        async fn update_order(&self, order_id: &OrderId, update: OrderUpdate) -> Result<Option<(Order, Order)>, DatabaseError>;
    }
    impl CustomerManagement for DashboardDb {
        async fn fetch_customers(&self) -> Result<Vec<Customer>, DatabaseError>;
        async fn fetch_customer_by_id(&self, id: i64) -> Result<Option<Customer>, DatabaseError>;
        async fn fetch_customer_by_chat_id(&self, chat_id: &str) -> Result<Option<Customer>, DatabaseError>;
        async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, DatabaseError>;
    }
    impl WebhookLogging for DashboardDb {
        async fn insert_webhook_log(&self, log: NewWebhookLog) -> Result<i64, DatabaseError>;
        async fn fetch_webhook_logs(&self, limit: u32) -> Result<Vec<WebhookLog>, DatabaseError>;
    }
}

pub fn order(id: &str, number: &str, cents: i64) -> Order {
    Order {
        id: OrderId::from(id),
        chat_id: "chat-1".to_string(),
        order_number: number.to_string(),
        items: r#"[{"name":"Jollof rice","qty":2}]"#.to_string(),
        total_amount: Amount::from_cents(cents),
        status: "pending".to_string(),
        payment_status: "unpaid".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ..Default::default()
    }
}

pub fn customer(id: i64, name: &str, phone: &str) -> Customer {
    Customer {
        id,
        chat_id: format!("chat-{id}"),
        phone_number: phone.to_string(),
        name: name.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
        ..Default::default()
    }
}
