//! Order-set analytics.
//!
//! Pure reductions over the full order collection: window totals against
//! the immediately preceding window, a gap-free daily series, and
//! per-product revenue rankings. Recomputed on every request; there is no
//! cache and no state, so running it concurrently is harmless.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use utoipa::ToSchema;

use crate::models::Order;

/// Most products shown in the performance chart.
pub const CHART_LIMIT: usize = 12;
/// Rows in the ranked top-products table.
pub const TABLE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub enum TimeRange {
    #[serde(rename = "7days")]
    Week,
    #[default]
    #[serde(rename = "30days")]
    Month,
    #[serde(rename = "90days")]
    Quarter,
    #[serde(rename = "1year")]
    Year,
}

impl TimeRange {
    pub fn days(self) -> u64 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
            TimeRange::Quarter => 90,
            TimeRange::Year => 365,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowTotals {
    pub revenue: Decimal,
    pub orders: i64,
    pub customers: i64,
    pub avg_order_value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub orders: i64,
    pub customers: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductPerformance {
    pub name: String,
    pub units: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedProduct {
    pub rank: usize,
    pub name: String,
    pub units: i64,
    pub revenue: Decimal,
    /// Share of the top-[`CHART_LIMIT`] revenue pool, not of total revenue.
    pub share_pct: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub range_days: u64,
    pub current: WindowTotals,
    pub previous: WindowTotals,
    pub revenue_change_pct: f64,
    pub orders_change_pct: f64,
    pub avg_order_value_change_pct: f64,
    pub daily: Vec<DailyPoint>,
    pub product_performance: Vec<ProductPerformance>,
    pub top_products: Vec<RankedProduct>,
}

/// Relative change between two periods, in percent. A previous period of
/// zero maps to 100 when the current value is positive and 0 otherwise.
pub fn pct_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 { 100.0 } else { 0.0 }
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Reduce the full order set for the window ending at `today` (inclusive,
/// calendar-day granularity).
pub fn summarize(orders: &[Order], range: TimeRange, today: NaiveDate) -> AnalyticsSummary {
    let days = range.days();
    let start = today - Days::new(days - 1);
    let prev_start = start - Days::new(days);
    let prev_end = start - Days::new(1);

    let mut current: Vec<&Order> = Vec::new();
    let mut previous: Vec<&Order> = Vec::new();
    for order in orders {
        let day = order.created_at.date_naive();
        if day >= start && day <= today {
            current.push(order);
        } else if day >= prev_start && day <= prev_end {
            previous.push(order);
        }
    }

    let current_totals = window_totals(&current);
    let previous_totals = window_totals(&previous);

    let revenue_change_pct = pct_change(
        decimal_to_f64(current_totals.revenue),
        decimal_to_f64(previous_totals.revenue),
    );
    let orders_change_pct = pct_change(current_totals.orders as f64, previous_totals.orders as f64);
    let avg_order_value_change_pct = pct_change(
        decimal_to_f64(current_totals.avg_order_value),
        decimal_to_f64(previous_totals.avg_order_value),
    );

    let daily = daily_series(&current, start, days);
    let product_performance = product_performance(&current);
    let top_products = rank_top_products(&product_performance);

    AnalyticsSummary {
        range_days: days,
        current: current_totals,
        previous: previous_totals,
        revenue_change_pct,
        orders_change_pct,
        avg_order_value_change_pct,
        daily,
        product_performance,
        top_products,
    }
}

fn window_totals(orders: &[&Order]) -> WindowTotals {
    let revenue: Decimal = orders.iter().map(|o| o.amount).sum();
    let count = orders.len() as i64;
    let customers = orders
        .iter()
        .map(|o| o.email.as_str())
        .collect::<HashSet<_>>()
        .len() as i64;
    let avg_order_value = if count > 0 {
        revenue / Decimal::from(count)
    } else {
        Decimal::ZERO
    };
    WindowTotals {
        revenue,
        orders: count,
        customers,
        avg_order_value,
    }
}

/// One entry per calendar day in the window, zero-seeded so the series is
/// gap-free and always `days` long.
fn daily_series(orders: &[&Order], start: NaiveDate, days: u64) -> Vec<DailyPoint> {
    let mut buckets: BTreeMap<NaiveDate, DailyPoint> = (0..days)
        .map(|offset| {
            let date = start + Days::new(offset);
            (
                date,
                DailyPoint {
                    date,
                    revenue: Decimal::ZERO,
                    orders: 0,
                    customers: 0,
                },
            )
        })
        .collect();

    let mut customers_by_day: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();
    for order in orders {
        let day = order.created_at.date_naive();
        let Some(point) = buckets.get_mut(&day) else {
            continue;
        };
        point.revenue += order.amount;
        point.orders += 1;
        customers_by_day
            .entry(day)
            .or_default()
            .insert(order.email.as_str());
    }
    for (day, emails) in customers_by_day {
        if let Some(point) = buckets.get_mut(&day) {
            point.customers = emails.len() as i64;
        }
    }

    buckets.into_values().collect()
}

/// Flatten in-window line items and accumulate units/revenue by exact
/// product name, best-selling first, capped at [`CHART_LIMIT`].
fn product_performance(orders: &[&Order]) -> Vec<ProductPerformance> {
    let mut by_name: HashMap<&str, (i64, Decimal)> = HashMap::new();
    for order in orders {
        for item in &order.items {
            let line_revenue = item.price * Decimal::from(item.quantity);
            let entry = by_name.entry(item.name.as_str()).or_default();
            entry.0 += i64::from(item.quantity);
            entry.1 += line_revenue;
        }
    }

    let mut performance: Vec<ProductPerformance> = by_name
        .into_iter()
        .map(|(name, (units, revenue))| ProductPerformance {
            name: name.to_string(),
            units,
            revenue,
        })
        .collect();
    performance.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    performance.truncate(CHART_LIMIT);
    performance
}

/// Top rows of the chart set, with each share computed against the chart
/// pool's subtotal rather than total revenue.
fn rank_top_products(performance: &[ProductPerformance]) -> Vec<RankedProduct> {
    let pool: Decimal = performance.iter().map(|p| p.revenue).sum();
    performance
        .iter()
        .take(TABLE_LIMIT)
        .enumerate()
        .map(|(idx, p)| RankedProduct {
            rank: idx + 1,
            name: p.name.clone(),
            units: p.units,
            revenue: p.revenue,
            share_pct: if pool > Decimal::ZERO {
                decimal_to_f64(p.revenue / pool) * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, OrderStatus};
    use chrono::{NaiveTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn order_on(date: NaiveDate, email: &str, amount: Decimal, items: Vec<OrderItem>) -> Order {
        let created_at = Utc.from_utc_datetime(
            &date.and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("valid time")),
        );
        Order {
            id: Uuid::new_v4(),
            reference: "ORD-000000-0000".to_string(),
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "Customer".to_string(),
            address: "1 Deck Lane".to_string(),
            city: "London".to_string(),
            postcode: "E1 1AA".to_string(),
            amount,
            status: OrderStatus::Processing,
            items,
            created_at,
            updated_at: created_at,
        }
    }

    fn item(name: &str, quantity: i32, price: Decimal) -> OrderItem {
        OrderItem {
            name: name.to_string(),
            quantity,
            price,
            image: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn pct_change_rules() {
        assert_eq!(pct_change(0.0, 0.0), 0.0);
        assert_eq!(pct_change(50.0, 0.0), 100.0);
        assert_eq!(pct_change(150.0, 100.0), 50.0);
        assert_eq!(pct_change(50.0, 100.0), -50.0);
    }

    #[test]
    fn empty_window_yields_full_zero_series() {
        let today = day(2025, 6, 30);
        let summary = summarize(&[], TimeRange::Week, today);

        assert_eq!(summary.daily.len(), 7);
        assert!(summary.daily.iter().all(|p| p.revenue == Decimal::ZERO
            && p.orders == 0
            && p.customers == 0));
        assert_eq!(summary.daily[0].date, day(2025, 6, 24));
        assert_eq!(summary.daily[6].date, today);
        assert_eq!(summary.current.orders, 0);
        assert_eq!(summary.current.avg_order_value, Decimal::ZERO);
        assert_eq!(summary.revenue_change_pct, 0.0);
    }

    #[test]
    fn windows_split_on_calendar_days() {
        let today = day(2025, 6, 30);
        let orders = vec![
            // First day of the current 7-day window.
            order_on(day(2025, 6, 24), "a@example.com", dec!(100), vec![]),
            // Last day of the previous window.
            order_on(day(2025, 6, 23), "b@example.com", dec!(40), vec![]),
            // First day of the previous window.
            order_on(day(2025, 6, 17), "b@example.com", dec!(60), vec![]),
            // Before both windows: ignored.
            order_on(day(2025, 6, 16), "c@example.com", dec!(999), vec![]),
        ];

        let summary = summarize(&orders, TimeRange::Week, today);
        assert_eq!(summary.current.revenue, dec!(100));
        assert_eq!(summary.current.orders, 1);
        assert_eq!(summary.previous.revenue, dec!(100));
        assert_eq!(summary.previous.orders, 2);
        // Both previous orders share an email.
        assert_eq!(summary.previous.customers, 1);
        assert_eq!(summary.revenue_change_pct, 0.0);
        assert_eq!(summary.orders_change_pct, -50.0);
    }

    #[test]
    fn distinct_customers_and_average_order_value() {
        let today = day(2025, 6, 30);
        let orders = vec![
            order_on(today, "a@example.com", dec!(90), vec![]),
            order_on(today, "a@example.com", dec!(30), vec![]),
            order_on(day(2025, 6, 28), "b@example.com", dec!(60), vec![]),
        ];

        let summary = summarize(&orders, TimeRange::Week, today);
        assert_eq!(summary.current.revenue, dec!(180));
        assert_eq!(summary.current.orders, 3);
        assert_eq!(summary.current.customers, 2);
        assert_eq!(summary.current.avg_order_value, dec!(60));
        // Previous window empty, current positive.
        assert_eq!(summary.revenue_change_pct, 100.0);
    }

    #[test]
    fn daily_series_buckets_by_day() {
        let today = day(2025, 6, 30);
        let orders = vec![
            order_on(day(2025, 6, 28), "a@example.com", dec!(50), vec![]),
            order_on(day(2025, 6, 28), "b@example.com", dec!(25), vec![]),
            order_on(today, "a@example.com", dec!(10), vec![]),
        ];

        let summary = summarize(&orders, TimeRange::Week, today);
        let by_date: Vec<_> = summary.daily.iter().collect();
        assert_eq!(by_date.len(), 7);

        let busy = by_date.iter().find(|p| p.date == day(2025, 6, 28)).unwrap();
        assert_eq!(busy.revenue, dec!(75));
        assert_eq!(busy.orders, 2);
        assert_eq!(busy.customers, 2);

        let quiet = by_date.iter().find(|p| p.date == day(2025, 6, 27)).unwrap();
        assert_eq!(quiet.orders, 0);
    }

    #[test]
    fn product_ranking_is_case_sensitive_and_revenue_sorted() {
        let today = day(2025, 6, 30);
        let orders = vec![
            order_on(
                today,
                "a@example.com",
                dec!(300),
                vec![
                    item("Composite Board", 2, dec!(100)),
                    item("composite board", 1, dec!(50)),
                ],
            ),
            order_on(
                today,
                "b@example.com",
                dec!(80),
                vec![item("Joist Pack", 4, dec!(20))],
            ),
        ];

        let summary = summarize(&orders, TimeRange::Week, today);
        let names: Vec<_> = summary
            .product_performance
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        // Exact-name matching keeps the differently-cased line separate.
        assert_eq!(names, vec!["Composite Board", "Joist Pack", "composite board"]);
        assert_eq!(summary.product_performance[0].revenue, dec!(200));
        assert_eq!(summary.product_performance[0].units, 2);
    }

    #[test]
    fn top_five_share_is_relative_to_chart_pool() {
        let today = day(2025, 6, 30);
        // 13 distinct products: the cheapest falls outside the chart's 12.
        let items: Vec<OrderItem> = (0..13)
            .map(|i| item(&format!("Product {i:02}"), 1, Decimal::from(100 - i)))
            .collect();
        let orders = vec![order_on(today, "a@example.com", dec!(1222), items)];

        let summary = summarize(&orders, TimeRange::Week, today);
        assert_eq!(summary.product_performance.len(), CHART_LIMIT);
        assert_eq!(summary.top_products.len(), TABLE_LIMIT);

        let pool: Decimal = summary.product_performance.iter().map(|p| p.revenue).sum();
        // Pool excludes the 13th product, so it is smaller than true revenue.
        assert!(pool < summary.current.revenue);

        let top_share: f64 = summary.top_products.iter().map(|p| p.share_pct).sum();
        let expected: f64 = summary
            .top_products
            .iter()
            .map(|p| decimal_to_f64(p.revenue / pool) * 100.0)
            .sum();
        assert!((top_share - expected).abs() < 1e-9);
        // Shares are scoped to the pool, not total revenue: against total
        // revenue the same five rows would claim a smaller fraction.
        let against_total: f64 = summary
            .top_products
            .iter()
            .map(|p| decimal_to_f64(p.revenue / summary.current.revenue) * 100.0)
            .sum();
        assert!(against_total < top_share);
        assert!(top_share <= 100.0 + 1e-9);
    }

    #[test]
    fn year_range_spans_365_days() {
        let today = day(2025, 6, 30);
        let summary = summarize(&[], TimeRange::Year, today);
        assert_eq!(summary.range_days, 365);
        assert_eq!(summary.daily.len(), 365);
    }
}
