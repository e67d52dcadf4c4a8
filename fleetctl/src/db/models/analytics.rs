//! Database models for dashboard aggregates.

use sqlx::FromRow;

/// Fleet-wide counts gathered in a single query.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct FleetCounts {
    pub total_drivers: i64,
    pub active_drivers: i64,
    pub total_orders: i64,
    pub delivered_orders: i64,
    pub total_routes: i64,
    pub total_revenue: f64,
}
