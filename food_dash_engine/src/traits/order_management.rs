use crate::{
    db_types::{NewOrder, Order, OrderId, OrderUpdate},
    order_objects::OrderQueryFilter,
    traits::DatabaseError,
};

/// Reads and writes the order collection.
///
/// Implementations do not publish change events. That is the job of [`crate::OrderApi`], which wraps a backend and
/// announces every successful insert or update on the change feed.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Point lookup by order id. Returns `None` if no such order exists.
    async fn fetch_order_by_id(&self, order_id: &OrderId) -> Result<Option<Order>, DatabaseError>;

    /// Orders matching the filter, newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, DatabaseError>;

    /// Stores a new order. If the order's `chat_id` belongs to a customer, that customer's order count and total spend
    /// are updated in the same transaction.
    ///
    /// Returns [`DatabaseError::DuplicateOrder`] if an order with the same id is already stored.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, DatabaseError>;

    /// Applies `update` atomically and returns the order as it was before, and after, the write.
    /// Returns `None` if the order does not exist.
    async fn update_order(
        &self,
        order_id: &OrderId,
        update: OrderUpdate,
    ) -> Result<Option<(Order, Order)>, DatabaseError>;
}
