use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::events::{
    EventHandler,
    EventProducer,
    Handler,
    NotificationRecordedEvent,
    OrderSelectedEvent,
    SoundAlertEvent,
};

type HookFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Default, Clone)]
pub struct EventProducers {
    pub notification_producer: Vec<EventProducer<NotificationRecordedEvent>>,
    pub order_selected_producer: Vec<EventProducer<OrderSelectedEvent>>,
    pub sound_alert_producer: Vec<EventProducer<SoundAlertEvent>>,
}

impl EventProducers {
    pub async fn notification_recorded(&self, event: NotificationRecordedEvent) {
        for emitter in &self.notification_producer {
            trace!("🔔️ Notifying notification hook subscribers");
            emitter.publish_event(event.clone()).await;
        }
    }

    pub async fn order_selected(&self, event: OrderSelectedEvent) {
        for emitter in &self.order_selected_producer {
            trace!("🔔️ Notifying order selected hook subscribers");
            emitter.publish_event(event.clone()).await;
        }
    }

    pub async fn sound_alert(&self, event: SoundAlertEvent) {
        for emitter in &self.sound_alert_producer {
            trace!("🔔️ Notifying sound alert hook subscribers");
            emitter.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_notification: Option<EventHandler<NotificationRecordedEvent>>,
    pub on_order_selected: Option<EventHandler<OrderSelectedEvent>>,
    pub on_sound_alert: Option<EventHandler<SoundAlertEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_notification = hooks.on_notification.map(|f| EventHandler::new(buffer_size, f));
        let on_order_selected = hooks.on_order_selected.map(|f| EventHandler::new(buffer_size, f));
        let on_sound_alert = hooks.on_sound_alert.map(|f| EventHandler::new(buffer_size, f));
        Self { on_notification, on_order_selected, on_sound_alert }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_notification {
            result.notification_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_order_selected {
            result.order_selected_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_sound_alert {
            result.sound_alert_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_notification {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_order_selected {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_sound_alert {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_notification: Option<Handler<NotificationRecordedEvent>>,
    pub on_order_selected: Option<Handler<OrderSelectedEvent>>,
    pub on_sound_alert: Option<Handler<SoundAlertEvent>>,
}

impl EventHooks {
    pub fn on_notification<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(NotificationRecordedEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_notification = Some(Arc::new(f));
        self
    }

    pub fn on_order_selected<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderSelectedEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_order_selected = Some(Arc::new(f));
        self
    }

    pub fn on_sound_alert<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SoundAlertEvent) -> HookFuture) + Send + Sync + 'static {
        self.on_sound_alert = Some(Arc::new(f));
        self
    }
}
