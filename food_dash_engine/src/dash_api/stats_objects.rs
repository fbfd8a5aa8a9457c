use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::db_types::{Amount, Customer, Order};

/// A current figure together with its change relative to the previous period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Growth {
    pub value: f64,
    /// Absolute percentage change
    pub growth: f64,
    pub is_positive: bool,
}

/// Percentage change from `previous` to `current`.
///
/// When there is nothing to compare against, any activity counts as 100% growth.
pub fn calculate_growth(current: f64, previous: f64) -> Growth {
    if previous == 0.0 {
        return Growth { value: current, growth: if current > 0.0 { 100.0 } else { 0.0 }, is_positive: current > 0.0 };
    }
    let growth = (current - previous) / previous * 100.0;
    Growth { value: current, growth: growth.abs(), is_positive: growth >= 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    fn day(date: NaiveDate) -> Self {
        let start = midnight(date);
        Self { start, end: start + Duration::days(1) }
    }

    fn month(year: i32, month: u32) -> Self {
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        Self { start: first_of_month(year, month), end: first_of_month(next_year, next_month) }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

fn first_of_month(year: i32, month: u32) -> DateTime<Utc> {
    midnight(NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default())
}

/// The UTC calendar windows the dashboard compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindows {
    pub today: Period,
    pub yesterday: Period,
    pub this_month: Period,
    pub last_month: Period,
}

impl StatsWindows {
    pub fn at(now: DateTime<Utc>) -> Self {
        let date = now.date_naive();
        let today = Period::day(date);
        let yesterday = Period::day(date - Duration::days(1));
        let this_month = Period::month(date.year(), date.month());
        let last_month =
            if date.month() == 1 { Period::month(date.year() - 1, 12) } else { Period::month(date.year(), date.month() - 1) };
        Self { today, yesterday, this_month, last_month }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_customers: u64,
    pub total_orders: u64,
    pub total_revenue: Amount,
    pub orders_today: u64,
    pub revenue_today: Amount,
    pub orders_yesterday: u64,
    pub revenue_yesterday: Amount,
    pub orders_this_month: u64,
    pub orders_last_month: u64,
    pub revenue_this_month: Amount,
    pub revenue_last_month: Amount,
    pub customers_this_month: u64,
    pub customers_last_month: u64,
    pub pending_orders: u64,
    pub paid_orders: u64,
    pub delivered_orders: u64,
    pub daily_orders_growth: Growth,
    pub daily_revenue_growth: Growth,
    pub monthly_orders_growth: Growth,
    pub monthly_revenue_growth: Growth,
    pub monthly_customers_growth: Growth,
}

fn count_and_revenue<'a, I: Iterator<Item = &'a Order>>(orders: I) -> (u64, Amount) {
    orders.fold((0, Amount::default()), |(n, total), o| (n + 1, total.saturating_add(o.total_amount)))
}

/// Computes the dashboard figures for the moment `now`.
pub fn compute_stats(orders: &[Order], customers: &[Customer], now: DateTime<Utc>) -> DashboardStats {
    let w = StatsWindows::at(now);
    let in_period = |p: Period| count_and_revenue(orders.iter().filter(move |o| p.contains(o.created_at)));
    let (total_orders, total_revenue) = count_and_revenue(orders.iter());
    let (orders_today, revenue_today) = in_period(w.today);
    let (orders_yesterday, revenue_yesterday) = in_period(w.yesterday);
    let (orders_this_month, revenue_this_month) = in_period(w.this_month);
    let (orders_last_month, revenue_last_month) = in_period(w.last_month);
    let customers_in = |p: Period| customers.iter().filter(|c| p.contains(c.created_at)).count() as u64;
    let customers_this_month = customers_in(w.this_month);
    let customers_last_month = customers_in(w.last_month);
    let count = |f: fn(&Order) -> bool| orders.iter().filter(|o| f(o)).count() as u64;
    DashboardStats {
        total_customers: customers.len() as u64,
        total_orders,
        total_revenue,
        orders_today,
        revenue_today,
        orders_yesterday,
        revenue_yesterday,
        orders_this_month,
        orders_last_month,
        revenue_this_month,
        revenue_last_month,
        customers_this_month,
        customers_last_month,
        pending_orders: count(Order::is_pending),
        paid_orders: count(Order::is_paid),
        delivered_orders: count(Order::is_delivered),
        daily_orders_growth: calculate_growth(orders_today as f64, orders_yesterday as f64),
        daily_revenue_growth: calculate_growth(revenue_today.as_f64(), revenue_yesterday.as_f64()),
        monthly_orders_growth: calculate_growth(orders_this_month as f64, orders_last_month as f64),
        monthly_revenue_growth: calculate_growth(revenue_this_month.as_f64(), revenue_last_month.as_f64()),
        monthly_customers_growth: calculate_growth(customers_this_month as f64, customers_last_month as f64),
    }
}
