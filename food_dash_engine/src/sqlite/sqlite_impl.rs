//! `SqliteDatabase` is the SQLite backend for Food Dash.
//!
//! It implements all the traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{customers, new_pool, orders, webhook_logs};
use crate::{
    db_types::{Customer, NewCustomer, NewOrder, NewWebhookLog, Order, OrderId, OrderUpdate, WebhookLog},
    order_objects::OrderQueryFilter,
    traits::{CustomerManagement, DatabaseError, OrderManagement, WebhookLogging},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if let Some(id) = &order.id {
            if orders::fetch_order_by_id(id, &mut tx).await?.is_some() {
                return Err(DatabaseError::DuplicateOrder(id.clone()));
            }
        }
        let order = orders::insert_order(order, &mut tx).await?;
        if !customers::incr_order_totals(&order.chat_id, order.total_amount, &mut tx).await? {
            debug!("🗃️ Order {} does not belong to a known customer ({})", order.id, order.chat_id);
        }
        tx.commit().await?;
        Ok(order)
    }

    async fn update_order(
        &self,
        order_id: &OrderId,
        update: OrderUpdate,
    ) -> Result<Option<(Order, Order)>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let Some(old) = orders::fetch_order_by_id(order_id, &mut tx).await? else {
            trace!("🗃️ Cannot update order {order_id}. It does not exist.");
            return Ok(None);
        };
        let new = orders::update_order(order_id, update, &mut tx).await?;
        tx.commit().await?;
        Ok(new.map(|new| (old, new)))
    }
}

impl CustomerManagement for SqliteDatabase {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let customers = customers::fetch_customers(&mut conn).await?;
        Ok(customers)
    }

    async fn fetch_customer_by_id(&self, id: i64) -> Result<Option<Customer>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::fetch_customer_by_id(id, &mut conn).await?;
        Ok(customer)
    }

    async fn fetch_customer_by_chat_id(&self, chat_id: &str) -> Result<Option<Customer>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::fetch_customer_by_chat_id(chat_id, &mut conn).await?;
        Ok(customer)
    }

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let customer = customers::insert_customer(customer, &mut conn).await?;
        Ok(customer)
    }
}

impl WebhookLogging for SqliteDatabase {
    async fn insert_webhook_log(&self, log: NewWebhookLog) -> Result<i64, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let id = webhook_logs::insert_webhook_log(log, &mut conn).await?;
        trace!("🗃️ Webhook log #{id} saved");
        Ok(id)
    }

    async fn fetch_webhook_logs(&self, limit: u32) -> Result<Vec<WebhookLog>, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let logs = webhook_logs::fetch_webhook_logs(limit, &mut conn).await?;
        Ok(logs)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Migrations that have already been applied are skipped.
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Connection pool closed");
    }
}
