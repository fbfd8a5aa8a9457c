//! The notification center
//!
//! [`NotificationCenter`] owns all notification state for one dashboard: the history, the sound switch, the dropdown
//! panel and the current lookup-failure alert. It is an ordinary value. Create one, share it behind an `Arc`, and attach
//! it to a [`ChangeFeed`] for as long as it should receive order changes.
//!
//! Every attachment and every order lookup is tagged with the center's generation. [`NotificationCenter::detach`] bumps
//! the generation, so a change event or lookup result that was already in flight when the center was detached is
//! dropped instead of being applied.
use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
        Mutex,
        PoisonError,
        Weak,
    },
};

use chrono::Utc;
use log::*;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    db_types::{Order, OrderId},
    events::{
        ChangeFeed,
        EventProducers,
        Handler,
        NotificationRecordedEvent,
        OrderChangeEvent,
        OrderSelectedEvent,
        SoundAlertEvent,
        Subscription,
    },
    notifier::{classify, NotificationItem, NotificationStore, NotifierError, PanelState, UserAlert},
    traits::OrderManagement,
};

#[derive(Debug, Default)]
struct CenterState {
    store: NotificationStore,
    panel: PanelState,
    alert: Option<UserAlert>,
}

/// Everything the notification UI needs in one read.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationSnapshot {
    pub notifications: Vec<NotificationItem>,
    pub sound_on: bool,
    pub panel: PanelState,
    pub alert: Option<UserAlert>,
}

pub struct NotificationCenter<B> {
    lookup: B,
    state: RwLock<CenterState>,
    generation: AtomicU64,
    subscription: Mutex<Option<Subscription>>,
    producers: EventProducers,
}

impl<B> Debug for NotificationCenter<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationCenter (generation {})", self.generation.load(Ordering::SeqCst))
    }
}

impl<B> NotificationCenter<B> {
    pub fn new(lookup: B, sound_on: bool, producers: EventProducers) -> Self {
        let state = CenterState { store: NotificationStore::new(sound_on), ..Default::default() };
        Self {
            lookup,
            state: RwLock::new(state),
            generation: AtomicU64::new(0),
            subscription: Mutex::new(None),
            producers,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.lock().unwrap_or_else(PoisonError::into_inner).as_ref().map(|s| s.is_active()).unwrap_or(false)
    }

    /// Stops receiving change events. Events and lookups already in flight are discarded.
    pub async fn detach(&self) {
        {
            let _state = self.state.write().await;
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        let subscription = self.subscription.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            info!("🔔️ Notification center detached from the change feed");
        }
    }

    pub async fn notifications(&self) -> Vec<NotificationItem> {
        self.state.read().await.store.snapshot()
    }

    pub async fn clear(&self) {
        self.state.write().await.store.clear();
        debug!("🔔️ Notification history cleared");
    }

    /// Flips the sound switch, returning the new value. Notifications already recorded are unaffected.
    pub async fn toggle_sound(&self) -> bool {
        let sound_on = self.state.write().await.store.toggle_sound();
        debug!("🔔️ Sound is now {}", if sound_on { "on" } else { "off" });
        sound_on
    }

    pub async fn sound_on(&self) -> bool {
        self.state.read().await.store.sound_on()
    }

    pub async fn toggle_panel(&self) -> PanelState {
        let mut state = self.state.write().await;
        state.panel = state.panel.toggle();
        state.panel
    }

    pub async fn close_panel(&self) -> PanelState {
        let mut state = self.state.write().await;
        state.panel = state.panel.close();
        state.panel
    }

    pub async fn panel_state(&self) -> PanelState {
        self.state.read().await.panel
    }

    pub async fn alert(&self) -> Option<UserAlert> {
        self.state.read().await.alert.clone()
    }

    pub async fn dismiss_alert(&self) -> Option<UserAlert> {
        self.state.write().await.alert.take()
    }

    pub async fn snapshot(&self) -> NotificationSnapshot {
        let state = self.state.read().await;
        NotificationSnapshot {
            notifications: state.store.snapshot(),
            sound_on: state.store.sound_on(),
            panel: state.panel,
            alert: state.alert.clone(),
        }
    }

    /// Classifies `event` and records the result under the current generation.
    pub async fn handle_event(&self, event: OrderChangeEvent) {
        self.deliver(self.generation(), event).await;
    }

    async fn deliver(&self, generation: u64, event: OrderChangeEvent) {
        let Some(classification) = classify(&event) else {
            trace!("🔔️ Change to order {} does not warrant a notification", event.order_id());
            return;
        };
        let category = classification.category();
        let item = NotificationItem::new(classification, Utc::now());
        let sound_on = {
            let mut state = self.state.write().await;
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!("🔔️ Discarding change to order {} from a stale subscription", event.order_id());
                return;
            }
            state.store.record(item.clone());
            state.store.sound_on()
        };
        info!("🔔️ {}", item.message());
        let order_id = item.order_id().cloned();
        self.producers.notification_recorded(NotificationRecordedEvent::new(item)).await;
        if sound_on {
            self.producers.sound_alert(SoundAlertEvent::new(category, order_id)).await;
        }
    }
}

impl<B> NotificationCenter<B>
where B: Send + Sync + 'static
{
    /// Subscribes to `feed`. Any previous attachment is dropped first.
    pub fn attach(self: &Arc<Self>, feed: &ChangeFeed) -> Result<(), NotifierError> {
        let mut slot = self.subscription.lock().unwrap_or_else(PoisonError::into_inner);
        // Bumping the generation here orphans events still queued for the previous subscription.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(old) = slot.take() {
            old.unsubscribe();
        }
        let center: Weak<Self> = Arc::downgrade(self);
        let handler: Handler<OrderChangeEvent> = Arc::new(move |event| {
            let center = center.clone();
            Box::pin(async move {
                if let Some(center) = center.upgrade() {
                    center.deliver(generation, event).await;
                }
            })
        });
        let subscription = feed.subscribe(handler).map_err(|e| {
            error!("🔔️ Could not subscribe to order changes: {e}");
            NotifierError::from(e)
        })?;
        info!("🔔️ Notification center attached to the change feed (generation {generation})");
        *slot = Some(subscription);
        Ok(())
    }
}

impl<B> NotificationCenter<B>
where B: OrderManagement
{
    /// Looks up the order behind a notification.
    ///
    /// On success the panel closes and the order is announced on the `on_order_selected` hook. A failure sets the
    /// user alert and leaves the notification history alone. If the center was detached while the lookup was running,
    /// the result is thrown away and `Ok(None)` is returned.
    pub async fn view_order(&self, order_id: &OrderId) -> Result<Option<Order>, NotifierError> {
        let generation = self.generation();
        let result = match self.lookup.fetch_order_by_id(order_id).await {
            Ok(Some(order)) => Ok(order),
            Ok(None) => Err(NotifierError::LookupNotFound(order_id.clone())),
            Err(e) => Err(NotifierError::LookupTransientIO(e.to_string())),
        };
        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("🔔️ Discarding lookup of order {order_id}. The notification center was detached.");
            return Ok(None);
        }
        match result {
            Ok(order) => {
                state.panel = state.panel.order_selected();
                state.alert = None;
                drop(state);
                debug!("🔔️ Order {order_id} selected");
                self.producers.order_selected(OrderSelectedEvent::new(order.clone())).await;
                Ok(Some(order))
            },
            Err(e) => {
                warn!("🔔️ {e}");
                state.alert = Some(UserAlert::lookup_failed(&e));
                Err(e)
            },
        }
    }
}
