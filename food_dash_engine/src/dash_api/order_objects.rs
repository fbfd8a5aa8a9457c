use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    dash_api::errors::OrderApiError,
    db_types::{Customer, Order, PAYMENT_STATUS_PAID},
};

/// Database-side order filter. Free-text search is applied on top of this by [`order_matches_search`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub chat_id: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl OrderQueryFilter {
    pub fn with_chat_id<S: Into<String>>(mut self, chat_id: S) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    pub fn with_status<S: Into<String>>(mut self, status: S) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_payment_status<S: Into<String>>(mut self, payment_status: S) -> Self {
        self.payment_status = Some(payment_status.into());
        self
    }

    pub fn paid(self) -> Self {
        self.with_payment_status(PAYMENT_STATUS_PAID)
    }

    /// Only orders created at or after `since`.
    pub fn since<T>(mut self, since: T) -> Result<Self, OrderApiError>
    where
        T: TryInto<DateTime<Utc>>,
        T::Error: Display,
    {
        let dt = since.try_into().map_err(|e| OrderApiError::QueryError(e.to_string()))?;
        self.since = Some(dt);
        Ok(self)
    }

    /// Only orders created strictly before `until`.
    pub fn until<T>(mut self, until: T) -> Result<Self, OrderApiError>
    where
        T: TryInto<DateTime<Utc>>,
        T::Error: Display,
    {
        let dt = until.try_into().map_err(|e| OrderApiError::QueryError(e.to_string()))?;
        self.until = Some(dt);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.chat_id.is_none() &&
            self.status.is_none() &&
            self.payment_status.is_none() &&
            self.since.is_none() &&
            self.until.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(chat_id) = &self.chat_id {
            write!(f, "chat_id: {chat_id}. ")?;
        }
        if let Some(status) = &self.status {
            write!(f, "status: {status}. ")?;
        }
        if let Some(payment_status) = &self.payment_status {
            write!(f, "payment_status: {payment_status}. ")?;
        }
        if let Some(since) = &self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = &self.until {
            write!(f, "until {until}. ")?;
        }
        Ok(())
    }
}

/// Case-insensitive match of `term` against the order number, the creation date (`YYYY-MM-DD`) and the raw item list.
/// An empty term matches every order.
pub fn order_matches_search(order: &Order, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    order.order_number.to_lowercase().contains(&term) ||
        order.created_on().format("%Y-%m-%d").to_string().contains(&term) ||
        order.items.to_lowercase().contains(&term)
}

/// Case-insensitive match on the customer's name, or a plain substring match on the phone number.
pub fn customer_matches_search(customer: &Customer, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    customer.name.to_lowercase().contains(&term.to_lowercase()) || customer.phone_number.contains(term)
}

/// A customer's orders placed on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrdersOnDay {
    pub date: NaiveDate,
    pub orders: Vec<Order>,
}

/// Groups orders by creation day. Days are returned newest first, and orders keep their relative order.
pub fn group_by_day(orders: Vec<Order>) -> Vec<OrdersOnDay> {
    let mut days: Vec<OrdersOnDay> = Vec::new();
    for order in orders {
        let date = order.created_on();
        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => day.orders.push(order),
            None => days.push(OrdersOnDay { date, orders: vec![order] }),
        }
    }
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}
