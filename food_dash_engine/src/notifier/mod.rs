//! Order event notifier
//!
//! Turns order changes into user-facing notifications. Data flows one way:
//!
//! change feed → [`classify`] → [`NotificationStore`] → hooks (`on_notification`, `on_sound_alert`)
//!
//! [`NotificationCenter::view_order`] is the other direction: it resolves a notification's order id to the current
//! order and emits it on the `on_order_selected` hook.
mod center;
mod classifier;
mod errors;
mod panel;
mod store;

pub use center::{NotificationCenter, NotificationSnapshot};
pub use classifier::{classify, Classification, NotificationCategory, NotificationDetails};
pub use errors::{NotifierError, UserAlert, LOOKUP_FAILED_MESSAGE};
pub use panel::PanelState;
pub use store::{NotificationItem, NotificationStore, MAX_NOTIFICATIONS};
