//! Change feed and event hooks
//!
//! * [`ChangeFeed`] carries order mutations (inserts and updates) from the order API to its subscribers.
//! * [`EventHooks`] let the embedding application react to notifier output: freshly recorded notifications, sound
//!   alerts, and orders selected for display.
//!
//! Both are built on the same primitive: an [`EventHandler`] that drains a bounded channel, fed by any number of
//! [`EventProducer`]s.
mod change_feed;
mod channel;
mod event_types;
mod hooks;

pub use change_feed::{ChangeFeed, ChangeFeedError, Subscription};
pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
