//! Dashboard response models.
//!
//! The KPI summary itself is [`crate::kpi::KpiSummary`]; it is serialized as-is.

use crate::db::models::analytics::FleetCounts;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FleetStatsResponse {
    pub total_drivers: i64,
    pub active_drivers: i64,
    pub total_orders: i64,
    pub delivered_orders: i64,
    pub total_routes: i64,
    pub total_revenue: f64,
    /// Share of orders with status `Delivered`, as a percentage with one decimal place
    pub efficiency: f64,
}

impl From<FleetCounts> for FleetStatsResponse {
    fn from(counts: FleetCounts) -> Self {
        let efficiency = if counts.total_orders > 0 {
            let ratio = counts.delivered_orders as f64 / counts.total_orders as f64 * 100.0;
            (ratio * 10.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            total_drivers: counts.total_drivers,
            active_drivers: counts.active_drivers,
            total_orders: counts.total_orders,
            delivered_orders: counts.delivered_orders,
            total_routes: counts.total_routes,
            total_revenue: counts.total_revenue,
            efficiency,
        }
    }
}
