//! # Datastore contracts
//!
//! The traits a datastore backend implements to serve Food Dash.
//!
//! * [`OrderManagement`] reads and writes orders. The notifier only needs its point lookup.
//! * [`CustomerManagement`] reads and creates customer records.
//! * [`WebhookLogging`] keeps a record of every webhook body that arrives.
//!
//! All three report failures as [`DatabaseError`].
mod customer_management;
mod database_error;
mod order_management;
mod webhook_logging;

pub use customer_management::CustomerManagement;
pub use database_error::DatabaseError;
pub use order_management::OrderManagement;
pub use webhook_logging::WebhookLogging;
