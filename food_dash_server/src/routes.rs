//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any I/O or database work must be awaited, never blocked on.
use std::marker::PhantomData;

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use food_dash_engine::{
    db_types::OrderId,
    notifier::NotificationCenter,
    CustomerApi,
    CustomerManagement,
    OrderApi,
    OrderApiError,
    DatabaseError,
    OrderManagement,
    StatsApi,
    WebhookApi,
    WebhookEvent,
    WebhookLogging,
};
use log::*;
use serde_json::{json, Value};

use crate::{
    broadcast::{EventBroadcaster, LiveEvent},
    config::ServerConfig,
    data_objects::{
        JsonResponse,
        PanelResponse,
        SearchParams,
        SoundResponse,
        WebhookAck,
        WebhookFailure,
        INTERNAL_ERROR_MESSAGE,
        METHOD_NOT_ALLOWED_MESSAGE,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<B>(core::marker::PhantomData<fn() -> B>);}
        paste::paste! { impl<B> [<$name:camel Route>]<B> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> B>)
            }
        }}
        paste::paste! { impl<B> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<B>
        where
            B: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<B>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

#[get("/health")]
pub async fn health() -> impl Responder {
    "👍️\n"
}

/// The live event stream. Each connection gets its own receiver on the shared broadcaster.
#[get("/events")]
pub async fn events(broadcaster: web::Data<EventBroadcaster>) -> HttpResponse {
    debug!("💻️ New live event listener. {} connected", broadcaster.subscriber_count() + 1);
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(broadcaster.sse_stream())
}

//----------------------------------------------   Webhook  ----------------------------------------------------

/// `POST /webhook`. Any other method on the same path gets a 405.
pub struct WebhookRoute<B>(PhantomData<fn() -> B>);

impl<B> WebhookRoute<B> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(PhantomData::<fn() -> B>)
    }
}

impl<B> actix_web::dev::HttpServiceFactory for WebhookRoute<B>
where B: OrderManagement + WebhookLogging + 'static
{
    fn register(self, config: &mut actix_web::dev::AppService) {
        let res = actix_web::Resource::new("/webhook")
            .name("webhook")
            .route(web::post().to(webhook::<B>))
            .default_service(web::to(webhook_method_not_allowed));
        actix_web::dev::HttpServiceFactory::register(res, config);
    }
}

pub async fn webhook_method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(json!({ "error": METHOD_NOT_ALLOWED_MESSAGE }))
}

pub async fn webhook<B: OrderManagement + WebhookLogging>(
    body: web::Bytes,
    orders: web::Data<OrderApi<B>>,
    logger: web::Data<WebhookApi<B>>,
    broadcaster: web::Data<EventBroadcaster>,
    config: web::Data<ServerConfig>,
) -> HttpResponse {
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!("🪝️ Webhook body is not valid JSON. {e}");
            return HttpResponse::BadRequest().json(WebhookFailure::new("Invalid JSON body", e));
        },
    };
    trace!("🪝️ Webhook received: {payload}");
    logger.log_event(&payload).await;
    if let Err(e) = apply_webhook_event(orders.as_ref(), &payload).await {
        return webhook_error_response(e);
    }
    if config.webhook_broadcast {
        broadcaster.emit(LiveEvent::Webhook { payload });
    }
    HttpResponse::Ok().json(WebhookAck::accepted())
}

/// Carries out the order mutation a webhook asks for, if any.
async fn apply_webhook_event<B: OrderManagement>(orders: &OrderApi<B>, payload: &Value) -> Result<(), OrderApiError> {
    match WebhookEvent::from_payload(payload)? {
        WebhookEvent::OrderCreated(order) => {
            let order = orders.process_new_order(order).await?;
            info!("🪝️ Order #{} created by webhook", order.order_number);
        },
        WebhookEvent::OrderUpdated { order_id, changes } => {
            let order = orders.update_order(&order_id, changes).await?;
            info!("🪝️ Order #{} updated by webhook", order.order_number);
        },
        WebhookEvent::Other(event_type) => {
            debug!("🪝️ Webhook event '{event_type}' has no order changes");
        },
    }
    Ok(())
}

fn webhook_error_response(e: OrderApiError) -> HttpResponse {
    match e {
        OrderApiError::InvalidPayload(_) | OrderApiError::EmptyUpdate | OrderApiError::QueryError(_) => {
            warn!("🪝️ Rejecting webhook. {e}");
            HttpResponse::BadRequest().json(WebhookFailure::new("Invalid webhook payload", e))
        },
        OrderApiError::OrderNotFound(_) | OrderApiError::CustomerNotFound(_) => {
            warn!("🪝️ Rejecting webhook. {e}");
            HttpResponse::NotFound().json(WebhookFailure::new("Order not found", e))
        },
        OrderApiError::DatabaseError(DatabaseError::DuplicateOrder(_)) => {
            warn!("🪝️ Rejecting webhook. {e}");
            HttpResponse::BadRequest().json(WebhookFailure::new("Invalid webhook payload", e))
        },
        OrderApiError::DatabaseError(_) => {
            error!("🪝️ Webhook processing error. {e}");
            HttpResponse::InternalServerError().json(WebhookFailure::new(INTERNAL_ERROR_MESSAGE, e))
        },
    }
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(orders => Get "/orders" impl OrderManagement);
pub async fn orders<B: OrderManagement>(
    query: web::Query<SearchParams>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET orders. search: {:?}", query.term());
    let orders = api.orders(query.term()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(order_by_id => Get "/orders/{id}" impl OrderManagement);
pub async fn order_by_id<B: OrderManagement>(
    path: web::Path<String>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::from(path.into_inner());
    debug!("💻️ GET order {order_id}");
    let order = api.fetch_order(&order_id).await?.ok_or_else(|| ServerError::NoRecordFound(order_id.to_string()))?;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Customers  ----------------------------------------------------
route!(customers => Get "/customers" impl CustomerManagement);
pub async fn customers<B: CustomerManagement>(
    query: web::Query<SearchParams>,
    api: web::Data<CustomerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET customers. search: {:?}", query.term());
    let customers = api.customers(query.term()).await?;
    Ok(HttpResponse::Ok().json(customers))
}

route!(customer_paid_orders => Get "/customers/{id}/paid_orders" impl CustomerManagement, OrderManagement);
pub async fn customer_paid_orders<B: CustomerManagement + OrderManagement>(
    path: web::Path<i64>,
    api: web::Data<CustomerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET paid orders for customer {id}");
    let days = api.paid_orders_by_day(id).await?;
    Ok(HttpResponse::Ok().json(days))
}

//----------------------------------------------   Stats  ----------------------------------------------------
route!(stats => Get "/stats" impl OrderManagement, CustomerManagement);
pub async fn stats<B: OrderManagement + CustomerManagement>(
    api: web::Data<StatsApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET stats");
    let stats = api.dashboard_stats(Utc::now()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

//----------------------------------------------   Notifications  ----------------------------------------------------
route!(notifications => Get "/notifications" impl OrderManagement);
pub async fn notifications<B: OrderManagement>(center: web::Data<NotificationCenter<B>>) -> HttpResponse {
    HttpResponse::Ok().json(center.snapshot().await)
}

route!(clear_notifications => Delete "/notifications" impl OrderManagement);
pub async fn clear_notifications<B: OrderManagement>(center: web::Data<NotificationCenter<B>>) -> HttpResponse {
    center.clear().await;
    HttpResponse::Ok().json(JsonResponse::success("Notifications cleared"))
}

route!(toggle_sound => Post "/notifications/sound" impl OrderManagement);
pub async fn toggle_sound<B: OrderManagement>(center: web::Data<NotificationCenter<B>>) -> HttpResponse {
    let sound_on = center.toggle_sound().await;
    HttpResponse::Ok().json(SoundResponse { sound_on })
}

route!(toggle_panel => Post "/notifications/panel" impl OrderManagement);
pub async fn toggle_panel<B: OrderManagement>(center: web::Data<NotificationCenter<B>>) -> HttpResponse {
    let panel = center.toggle_panel().await;
    HttpResponse::Ok().json(PanelResponse { panel })
}

route!(close_panel => Delete "/notifications/panel" impl OrderManagement);
pub async fn close_panel<B: OrderManagement>(center: web::Data<NotificationCenter<B>>) -> HttpResponse {
    let panel = center.close_panel().await;
    HttpResponse::Ok().json(PanelResponse { panel })
}

route!(view_order => Post "/notifications/view/{order_id}" impl OrderManagement);
/// Looks up the order behind a notification. A failed lookup raises the dashboard alert as well as returning an error.
/// A lookup that was overtaken by a detach returns 204 and changes nothing.
pub async fn view_order<B: OrderManagement>(
    path: web::Path<String>,
    center: web::Data<NotificationCenter<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId::from(path.into_inner());
    debug!("💻️ Viewing order {order_id} from the notification panel");
    match center.view_order(&order_id).await? {
        Some(order) => Ok(HttpResponse::Ok().json(order)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

route!(dismiss_alert => Delete "/notifications/alert" impl OrderManagement);
pub async fn dismiss_alert<B: OrderManagement>(center: web::Data<NotificationCenter<B>>) -> HttpResponse {
    match center.dismiss_alert().await {
        Some(alert) => HttpResponse::Ok().json(JsonResponse::success(format!("Dismissed: {}", alert.message))),
        None => HttpResponse::Ok().json(JsonResponse::failure("There is no alert to dismiss")),
    }
}
