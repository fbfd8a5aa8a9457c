use std::fmt::Debug;

use log::*;

use crate::{
    dash_api::{
        errors::OrderApiError,
        order_objects::{customer_matches_search, group_by_day, OrderQueryFilter, OrdersOnDay},
    },
    db_types::{Customer, NewCustomer},
    traits::{CustomerManagement, OrderManagement},
};

pub struct CustomerApi<B> {
    db: B,
}

impl<B> Debug for CustomerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomerApi")
    }
}

impl<B> CustomerApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CustomerApi<B>
where B: CustomerManagement
{
    /// All customers, newest first, optionally narrowed by name or phone number.
    pub async fn customers(&self, search: Option<&str>) -> Result<Vec<Customer>, OrderApiError> {
        let customers = self.db.fetch_customers().await?;
        let customers = match search {
            Some(term) => customers.into_iter().filter(|c| customer_matches_search(c, term)).collect(),
            None => customers,
        };
        Ok(customers)
    }

    pub async fn customer(&self, id: i64) -> Result<Option<Customer>, OrderApiError> {
        let customer = self.db.fetch_customer_by_id(id).await?;
        Ok(customer)
    }

    pub async fn register_customer(&self, customer: NewCustomer) -> Result<Customer, OrderApiError> {
        let customer = self.db.insert_customer(customer).await?;
        info!("🧑️ Customer {} registered with id {}", customer.name, customer.id);
        Ok(customer)
    }
}

impl<B> CustomerApi<B>
where B: CustomerManagement + OrderManagement
{
    /// The customer's paid orders, grouped by day, newest day first.
    pub async fn paid_orders_by_day(&self, id: i64) -> Result<Vec<OrdersOnDay>, OrderApiError> {
        let customer = self.db.fetch_customer_by_id(id).await?.ok_or(OrderApiError::CustomerNotFound(id))?;
        let query = OrderQueryFilter::default().with_chat_id(customer.chat_id.as_str()).paid();
        let orders = self.db.search_orders(query).await?;
        trace!("🧑️ Customer {id} has {} paid orders", orders.len());
        Ok(group_by_day(orders))
    }
}
