use thiserror::Error;

use crate::{db_types::OrderId, traits::DatabaseError};

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("{0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Customer {0} does not exist")]
    CustomerNotFound(i64),
    #[error("The order update does not change anything")]
    EmptyUpdate,
    #[error("User error constructing query: {0}")]
    QueryError(String),
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}
