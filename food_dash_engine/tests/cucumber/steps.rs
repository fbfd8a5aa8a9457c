use std::time::Duration;

use chrono::Utc;
use cucumber::{given, then, when};
use food_dash_engine::{
    db_types::{Amount, NewOrder, OrderId, OrderUpdate},
    notifier::PanelState,
};

use crate::cucumber::{world::DashboardSystem, DashboardWorld};

const SETTLE: Duration = Duration::from_millis(50);

#[given("a dashboard with a live notification center")]
async fn dashboard(world: &mut DashboardWorld) {
    world.system = Some(DashboardSystem::new().await);
}

#[when(expr = "order {word} with number '{word}' is created")]
async fn create_order(world: &mut DashboardWorld, id: String, number: String) {
    let order = NewOrder::new("chat-1".to_string(), number, Amount::from_cents(1000)).with_id(OrderId::from(id));
    world.api().process_new_order(order).await.expect("Error creating order");
    tokio::time::sleep(SETTLE).await;
}

async fn update(world: &mut DashboardWorld, id: String, update: OrderUpdate) {
    world.api().update_order(&OrderId::from(id), update).await.expect("Error updating order");
    tokio::time::sleep(SETTLE).await;
}

#[when(expr = "order {word} is paid")]
async fn pay_order(world: &mut DashboardWorld, id: String) {
    update(world, id, OrderUpdate::default().with_payment_status("paid")).await;
}

#[when(expr = "order {word} is delivered")]
async fn deliver_order(world: &mut DashboardWorld, id: String) {
    update(world, id, OrderUpdate::default().with_delivered_at(Utc::now())).await;
}

#[when(expr = "order {word} is paid and delivered in one write")]
async fn pay_and_deliver(world: &mut DashboardWorld, id: String) {
    let changes = OrderUpdate::default().with_payment_status("paid").with_delivered_at(Utc::now());
    update(world, id, changes).await;
}

#[when(expr = "order {word} moves to status '{word}'")]
async fn change_status(world: &mut DashboardWorld, id: String, status: String) {
    update(world, id, OrderUpdate::default().with_status(status)).await;
}

#[when("the notification center is detached")]
async fn detach(world: &mut DashboardWorld) {
    world.center().detach().await;
}

#[when("I clear the notifications")]
async fn clear(world: &mut DashboardWorld) {
    world.center().clear().await;
}

#[when("I click the bell")]
async fn click_bell(world: &mut DashboardWorld) {
    world.center().toggle_panel().await;
}

#[when(expr = "I view order {word}")]
async fn view_order(world: &mut DashboardWorld, id: String) {
    let _ = world.center().view_order(&OrderId::from(id)).await;
}

#[then(expr = "there are {int} notifications")]
async fn notification_count(world: &mut DashboardWorld, count: usize) {
    assert_eq!(world.center().notifications().await.len(), count);
}

#[then(expr = "notification {int} reads {string}")]
async fn notification_message(world: &mut DashboardWorld, index: usize, message: String) {
    let notifications = world.center().notifications().await;
    let item = notifications.get(index - 1).expect("No such notification");
    assert_eq!(item.message(), message);
}

#[then(expr = "the panel is {word}")]
async fn panel_state(world: &mut DashboardWorld, state: String) {
    let expected = match state.as_str() {
        "open" => PanelState::Open,
        "closed" => PanelState::Closed,
        s => panic!("Unknown panel state {s}"),
    };
    assert_eq!(world.center().panel_state().await, expected);
}

#[then(expr = "the alert reads {string}")]
async fn alert_message(world: &mut DashboardWorld, message: String) {
    let alert = world.center().alert().await.expect("No alert was raised");
    assert_eq!(alert.message, message);
}

#[then("there is no alert")]
async fn no_alert(world: &mut DashboardWorld) {
    assert!(world.center().alert().await.is_none());
}
