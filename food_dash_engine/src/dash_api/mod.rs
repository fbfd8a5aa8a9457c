//! # Food Dash public API
//!
//! * [`order_api`] creates and updates orders, and publishes every change on the change feed.
//! * [`customer_api`] lists and searches customers, and groups a customer's paid orders by day.
//! * [`stats_api`] computes the dashboard statistics.
//! * [`webhook_api`] interprets and logs webhook bodies.
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the backend traits the API needs.
//!
//! ```rust,ignore
//! use food_dash_engine::{ChangeFeed, OrderApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/food_dash.db", 5).await?;
//! let api = OrderApi::new(db, ChangeFeed::default());
//! let orders = api.orders(Some("jollof")).await?;
//! ```
pub mod customer_api;
pub mod errors;
pub mod order_api;
pub mod order_objects;
pub mod stats_api;
pub mod stats_objects;
pub mod webhook_api;
