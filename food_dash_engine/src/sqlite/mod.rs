//! SQLite datastore for Food Dash.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
