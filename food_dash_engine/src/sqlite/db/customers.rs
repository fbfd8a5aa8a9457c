use chrono::Utc;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::db_types::{Amount, Customer, NewCustomer};

pub async fn insert_customer(customer: NewCustomer, conn: &mut SqliteConnection) -> Result<Customer, sqlx::Error> {
    let customer: Customer = sqlx::query_as(
        r#"
            INSERT INTO customers (chat_id, phone_number, name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *;
        "#,
    )
    .bind(customer.chat_id)
    .bind(customer.phone_number)
    .bind(customer.name)
    .bind(customer.email)
    .bind(customer.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Customer {} inserted with id {}", customer.chat_id, customer.id);
    Ok(customer)
}

/// All customers, newest first
pub async fn fetch_customers(conn: &mut SqliteConnection) -> Result<Vec<Customer>, sqlx::Error> {
    let customers = sqlx::query_as("SELECT * FROM customers ORDER BY created_at DESC, id DESC").fetch_all(conn).await?;
    Ok(customers)
}

pub async fn fetch_customer_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Customer>, sqlx::Error> {
    let customer = sqlx::query_as("SELECT * FROM customers WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(customer)
}

pub async fn fetch_customer_by_chat_id(
    chat_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, sqlx::Error> {
    let customer =
        sqlx::query_as("SELECT * FROM customers WHERE chat_id = $1").bind(chat_id).fetch_optional(conn).await?;
    Ok(customer)
}

/// Adds one order of `amount` to the totals of the customer with the given `chat_id`. Returns `false` if there is no
/// such customer.
pub async fn incr_order_totals(chat_id: &str, amount: Amount, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE customers SET
                total_orders = total_orders + 1,
                total_spent = total_spent + $1,
                updated_at = $2
            WHERE chat_id = $3
        "#,
    )
    .bind(amount.cents())
    .bind(Utc::now())
    .bind(chat_id)
    .execute(conn)
    .await?;
    let updated = result.rows_affected() > 0;
    trace!("🗃️ Order totals for customer {chat_id} incremented by {amount}: {updated}");
    Ok(updated)
}
