use crate::{
    db_types::{Customer, NewCustomer},
    traits::DatabaseError,
};

#[allow(async_fn_in_trait)]
pub trait CustomerManagement {
    /// All customers, newest first.
    async fn fetch_customers(&self) -> Result<Vec<Customer>, DatabaseError>;

    async fn fetch_customer_by_id(&self, id: i64) -> Result<Option<Customer>, DatabaseError>;

    async fn fetch_customer_by_chat_id(&self, chat_id: &str) -> Result<Option<Customer>, DatabaseError>;

    async fn insert_customer(&self, customer: NewCustomer) -> Result<Customer, DatabaseError>;
}
