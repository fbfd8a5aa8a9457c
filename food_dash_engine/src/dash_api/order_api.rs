use std::fmt::Debug;

use log::*;

use crate::{
    dash_api::{
        errors::OrderApiError,
        order_objects::{order_matches_search, OrderQueryFilter},
    },
    db_types::{NewOrder, Order, OrderId, OrderUpdate},
    events::{ChangeFeed, OrderChangeEvent},
    traits::OrderManagement,
};

/// `OrderApi` is the only way orders change. Every successful insert or update is announced on the change feed as
/// exactly one [`OrderChangeEvent`].
pub struct OrderApi<B> {
    db: B,
    feed: ChangeFeed,
}

impl<B> Debug for OrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi ({:?})", self.feed)
    }
}

impl<B> OrderApi<B> {
    pub fn new(db: B, feed: ChangeFeed) -> Self {
        Self { db, feed }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderApi<B>
where B: OrderManagement
{
    /// Stores a brand-new order and publishes [`OrderChangeEvent::Inserted`].
    pub async fn process_new_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let order = self.db.insert_order(order).await?;
        debug!("📬️ Order #{} ({}) created", order.order_number, order.id);
        self.feed.publish(OrderChangeEvent::inserted(order.clone())).await;
        Ok(order)
    }

    /// Applies `update` and publishes [`OrderChangeEvent::Updated`] carrying both snapshots.
    pub async fn update_order(&self, order_id: &OrderId, update: OrderUpdate) -> Result<Order, OrderApiError> {
        if update.is_empty() {
            return Err(OrderApiError::EmptyUpdate);
        }
        let (old, new) =
            self.db.update_order(order_id, update).await?.ok_or_else(|| OrderApiError::OrderNotFound(order_id.clone()))?;
        debug!("📬️ Order #{} ({order_id}) updated", new.order_number);
        self.feed.publish(OrderChangeEvent::updated(old, new.clone())).await;
        Ok(new)
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError> {
        let order = self.db.fetch_order_by_id(order_id).await?;
        Ok(order)
    }

    /// All orders, newest first, optionally narrowed by a free-text search term.
    pub async fn orders(&self, search: Option<&str>) -> Result<Vec<Order>, OrderApiError> {
        let orders = self.db.search_orders(OrderQueryFilter::default()).await?;
        let orders = match search {
            Some(term) => orders.into_iter().filter(|o| order_matches_search(o, term)).collect(),
            None => orders,
        };
        trace!("📬️ {} orders match search {search:?}", orders.len());
        Ok(orders)
    }

    pub async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, OrderApiError> {
        trace!("📬️ Searching orders. {query}");
        let orders = self.db.search_orders(query).await?;
        Ok(orders)
    }
}
