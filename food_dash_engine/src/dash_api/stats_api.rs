use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    dash_api::{
        errors::OrderApiError,
        order_objects::OrderQueryFilter,
        stats_objects::{compute_stats, DashboardStats},
    },
    traits::{CustomerManagement, OrderManagement},
};

pub struct StatsApi<B> {
    db: B,
}

impl<B> Debug for StatsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatsApi")
    }
}

impl<B> StatsApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> StatsApi<B>
where B: OrderManagement + CustomerManagement
{
    pub async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, OrderApiError> {
        let orders = self.db.search_orders(OrderQueryFilter::default()).await?;
        let customers = self.db.fetch_customers().await?;
        trace!("📊️ Computing stats over {} orders and {} customers", orders.len(), customers.len());
        Ok(compute_stats(&orders, &customers, now))
    }
}
