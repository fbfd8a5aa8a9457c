use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use food_dash_engine::{
    events::{ChangeFeed, EventHandlers},
    notifier::NotificationCenter,
    CustomerApi,
    OrderApi,
    SqliteDatabase,
    StatsApi,
    WebhookApi,
};
use log::*;

use crate::{
    broadcast::EventBroadcaster,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        events,
        health,
        ClearNotificationsRoute,
        ClosePanelRoute,
        CustomerPaidOrdersRoute,
        CustomersRoute,
        DismissAlertRoute,
        NotificationsRoute,
        OrderByIdRoute,
        OrdersRoute,
        StatsRoute,
        TogglePanelRoute,
        ToggleSoundRoute,
        ViewOrderRoute,
        WebhookRoute,
    },
};

/// The long-lived pieces shared by every worker.
#[derive(Clone)]
pub struct ServerContext {
    pub db: SqliteDatabase,
    pub feed: ChangeFeed,
    pub center: Arc<NotificationCenter<SqliteDatabase>>,
    pub broadcaster: EventBroadcaster,
}

impl ServerContext {
    /// Wires the notification center to the change feed, and its hooks to the live event stream.
    pub async fn new(config: &ServerConfig, db: SqliteDatabase) -> Result<Self, ServerError> {
        let feed = ChangeFeed::new(config.event_buffer_size);
        let broadcaster = EventBroadcaster::new(config.event_buffer_size);
        let handlers = EventHandlers::new(config.event_buffer_size, broadcaster.hooks());
        let producers = handlers.producers();
        handlers.start_handlers().await;
        let center = Arc::new(NotificationCenter::new(db.clone(), config.sound_on, producers));
        center.attach(&feed)?;
        Ok(Self { db, feed, center, broadcaster })
    }

    pub async fn shutdown(&self) {
        self.center.detach().await;
        self.feed.close();
        self.db.close().await;
    }
}

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let context = ServerContext::new(&config, db).await?;
    let srv = create_server_instance(config, context.clone())?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    info!("🚀️ Server stopped. Cleaning up");
    context.shutdown().await;
    result
}

pub fn create_server_instance(config: ServerConfig, context: ServerContext) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let config = web::Data::new(config);
    let center = web::Data::from(context.center.clone());
    let broadcaster = web::Data::new(context.broadcaster.clone());
    let srv = HttpServer::new(move || {
        let db = context.db.clone();
        let orders_api = OrderApi::new(db.clone(), context.feed.clone());
        let customers_api = CustomerApi::new(db.clone());
        let stats_api = StatsApi::new(db.clone());
        let webhook_api = WebhookApi::new(db, config.webhook_logging);
        let api_scope = web::scope("/api")
            .service(OrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(CustomersRoute::<SqliteDatabase>::new())
            .service(CustomerPaidOrdersRoute::<SqliteDatabase>::new())
            .service(StatsRoute::<SqliteDatabase>::new())
            .service(NotificationsRoute::<SqliteDatabase>::new())
            .service(ClearNotificationsRoute::<SqliteDatabase>::new())
            .service(ToggleSoundRoute::<SqliteDatabase>::new())
            .service(TogglePanelRoute::<SqliteDatabase>::new())
            .service(ClosePanelRoute::<SqliteDatabase>::new())
            .service(ViewOrderRoute::<SqliteDatabase>::new())
            .service(DismissAlertRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fds::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(customers_api))
            .app_data(web::Data::new(stats_api))
            .app_data(web::Data::new(webhook_api))
            .app_data(center.clone())
            .app_data(broadcaster.clone())
            .app_data(config.clone())
            .service(health)
            .service(events)
            .service(WebhookRoute::<SqliteDatabase>::new())
            .service(api_scope)
    })
    // Live event streams hold their connection open indefinitely
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
