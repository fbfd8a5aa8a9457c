//! # Food Dash server
//! This crate hosts the HTTP server for the Food Dash order dashboard. It is responsible for:
//! Receiving webhook events and applying the order changes they carry.
//! Serving orders, customers and dashboard statistics as JSON.
//! Exposing the notification center, and streaming its output to browsers as server-sent events.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/webhook`: Webhook ingestion. POST only.
//! * `/events`: The live event stream.
//! * `/api/...`: Orders, customers, stats and notification state.

pub mod broadcast;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
