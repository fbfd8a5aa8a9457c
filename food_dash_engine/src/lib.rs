//! Food Dash Engine
//!
//! The engine behind the Food Dash order dashboard. It keeps track of customers and orders, computes dashboard
//! statistics, and turns order changes into live notifications.
//!
//! The library is divided into these sections:
//! 1. Datastore contracts ([`mod@traits`]) and the SQLite backend that implements them ([`SqliteDatabase`]). The record
//!    types stored in the datastore are defined in [`mod@db_types`].
//! 2. The public API ([`OrderApi`], [`CustomerApi`], [`StatsApi`], [`WebhookApi`]). Every order insert or update made
//!    through [`OrderApi`] is published on a [`events::ChangeFeed`].
//! 3. The notifier ([`mod@notifier`]). A [`notifier::NotificationCenter`] subscribes to the change feed, classifies each
//!    change, and keeps a bounded notification history. Its output is delivered through [`events::EventHooks`].
mod dash_api;

pub mod db_types;
pub mod events;
pub mod notifier;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use dash_api::{
    customer_api::CustomerApi,
    errors::OrderApiError,
    order_api::OrderApi,
    order_objects,
    stats_api::StatsApi,
    stats_objects,
    webhook_api::{WebhookApi, WebhookEvent, ORDER_CREATED_EVENT, ORDER_UPDATED_EVENT},
};
#[cfg(feature = "sqlite")]
pub use sqlite::{db::DEFAULT_DB_URL, SqliteDatabase};
pub use traits::{CustomerManagement, DatabaseError, OrderManagement, WebhookLogging};
