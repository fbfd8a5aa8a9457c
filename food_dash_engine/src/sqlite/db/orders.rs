use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderUpdate},
    order_objects::OrderQueryFilter,
};

/// Inserts a new order using the given connection. This is not atomic. Embed the call in a transaction if the insert
/// must happen together with other writes, and pass `&mut *tx` as the connection argument.
///
/// Orders without an id are given a random one.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let id = order.id.unwrap_or_else(OrderId::random);
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                id,
                chat_id,
                order_number,
                items,
                total_amount,
                status,
                payment_status,
                reference_number,
                delivery_address,
                special_instructions,
                created_at,
                delivered_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *;
        "#,
    )
    .bind(id.as_str())
    .bind(order.chat_id)
    .bind(order.order_number)
    .bind(order.items)
    .bind(order.total_amount.cents())
    .bind(order.status)
    .bind(order.payment_status)
    .bind(order.reference_number)
    .bind(order.delivery_address)
    .bind(order.special_instructions)
    .bind(order.created_at)
    .bind(order.delivered_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order #{} inserted with id {}", order.order_number, order.id);
    Ok(order)
}

pub async fn fetch_order_by_id(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered by `created_at` in descending order
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM orders ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(chat_id) = query.chat_id {
        where_clause.push("chat_id = ");
        where_clause.push_bind_unseparated(chat_id);
    }
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status);
    }
    if let Some(payment_status) = query.payment_status {
        where_clause.push("payment_status = ");
        where_clause.push_bind_unseparated(payment_status);
    }
    if let Some(since) = query.since {
        where_clause.push("created_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("created_at < ");
        where_clause.push_bind_unseparated(until);
    }
    builder.push(" ORDER BY created_at DESC, rowid DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {} orders", orders.len());
    Ok(orders)
}

/// Applies the non-empty fields of `update` to the order. Returns the updated order, or `None` if there is no order
/// with the given id.
pub async fn update_order(
    order_id: &OrderId,
    update: OrderUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    if update.is_empty() {
        return fetch_order_by_id(order_id, conn).await;
    }
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE orders SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(status) = update.status {
        set_clause.push("status = ");
        set_clause.push_bind_unseparated(status);
    }
    if let Some(payment_status) = update.payment_status {
        set_clause.push("payment_status = ");
        set_clause.push_bind_unseparated(payment_status);
    }
    if let Some(delivered_at) = update.delivered_at {
        set_clause.push("delivered_at = ");
        set_clause.push_bind_unseparated(delivered_at);
    }
    if let Some(total_amount) = update.total_amount {
        set_clause.push("total_amount = ");
        set_clause.push_bind_unseparated(total_amount.cents());
    }
    if let Some(reference_number) = update.reference_number {
        set_clause.push("reference_number = ");
        set_clause.push_bind_unseparated(reference_number);
    }
    if let Some(delivery_address) = update.delivery_address {
        set_clause.push("delivery_address = ");
        set_clause.push_bind_unseparated(delivery_address);
    }
    if let Some(special_instructions) = update.special_instructions {
        set_clause.push("special_instructions = ");
        set_clause.push_bind_unseparated(special_instructions);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(order_id.as_str());
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let order = builder.build_query_as::<Order>().fetch_optional(conn).await?;
    Ok(order)
}
