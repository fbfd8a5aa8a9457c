//! The order change feed
//!
//! Every insert or update that goes through the order API is published on the [`ChangeFeed`] as exactly one
//! [`OrderChangeEvent`]. Each subscriber gets its own [`EventHandler`], so a slow subscriber never holds up the others,
//! and each subscriber sees events in the order they were published.
//!
//! [`ChangeFeed::subscribe`] returns a [`Subscription`]. Calling [`Subscription::unsubscribe`], or dropping the handle,
//! removes the subscriber from the feed. No event published afterwards reaches it.
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
        Weak,
    },
};

use log::*;
use thiserror::Error;

use crate::events::{EventHandler, EventProducer, Handler, OrderChangeEvent};

type Subscribers = Mutex<HashMap<u64, EventProducer<OrderChangeEvent>>>;

#[derive(Debug, Clone, Error)]
pub enum ChangeFeedError {
    #[error("The change feed has been closed")]
    FeedClosed,
    #[error("No async runtime is available to run the subscriber")]
    NoRuntime,
}

#[derive(Clone)]
pub struct ChangeFeed {
    subscribers: Arc<Subscribers>,
    next_id: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
    buffer_size: usize,
}

impl Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChangeFeed ({} subscribers)", self.subscriber_count())
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ChangeFeed {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            closed: Arc::new(AtomicBool::new(false)),
            buffer_size,
        }
    }

    /// Registers `handler` for every change published from now on. The handler runs on the current tokio runtime.
    pub fn subscribe(&self, handler: Handler<OrderChangeEvent>) -> Result<Subscription, ChangeFeedError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChangeFeedError::FeedClosed);
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ChangeFeedError::NoRuntime)?;
        let event_handler = EventHandler::new(self.buffer_size, handler);
        let producer = event_handler.subscribe();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.subscribers).insert(id, producer);
        runtime.spawn(event_handler.start_handler());
        debug!("📬️ Change feed subscriber #{id} registered");
        Ok(Subscription { id, subscribers: Arc::downgrade(&self.subscribers) })
    }

    /// Sends `event` to every current subscriber.
    pub async fn publish(&self, event: OrderChangeEvent) {
        let producers = lock(&self.subscribers).values().cloned().collect::<Vec<_>>();
        trace!("📬️ Publishing change to order {} to {} subscribers", event.order_id(), producers.len());
        for producer in producers {
            producer.publish_event(event.clone()).await;
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    /// Drops every subscriber and refuses new ones. Subscriber handlers finish the events already queued, then stop.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let count = {
            let mut subscribers = lock(&self.subscribers);
            let count = subscribers.len();
            subscribers.clear();
            count
        };
        info!("📬️ Change feed closed. {count} subscribers were removed");
    }
}

/// A live registration on a [`ChangeFeed`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    subscribers: Weak<Subscribers>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.subscribers.upgrade().map(|s| lock(&s).contains_key(&self.id)).unwrap_or(false)
    }

    pub fn unsubscribe(self) {
        // Drop does the work
    }

    fn remove(&self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            if lock(&subscribers).remove(&self.id).is_some() {
                debug!("📬️ Change feed subscriber #{} removed", self.id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

fn lock(subscribers: &Subscribers) -> MutexGuard<'_, HashMap<u64, EventProducer<OrderChangeEvent>>> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}
