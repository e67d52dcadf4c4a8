//! Delivery KPI aggregation.
//!
//! [`KpiAggregator::aggregate`] folds every order of every route into a single [`KpiSummary`]:
//! profit, on-time efficiency, per-order fuel cost and average order value. It is a pure,
//! synchronous function of its input; nothing here touches the database or the clock.
//!
//! ## Per-order rules
//!
//! - An order is late when its delivery duration exceeds the route's base time by more than
//!   [`GRACE_MINUTES`]. Late orders incur a [`LATE_PENALTY`].
//! - On-time orders worth more than [`BONUS_THRESHOLD`] earn a bonus of [`BONUS_RATE`] of their
//!   value.
//! - Fuel costs [`FUEL_RATE_PER_KM`] per kilometre, plus [`HIGH_TRAFFIC_SURCHARGE_PER_KM`] on
//!   high-traffic routes.
//! - Profit is `value + bonus - penalty - fuel`.
//!
//! ## Fuel accounting
//!
//! Under [`FuelCostPolicy::PerOrder`] (the default) every order pays the full fuel cost of its
//! route, so a route with three orders is charged three times and the breakdown has one entry per
//! order. [`FuelCostPolicy::PerRoute`] charges each route with at least one order once.
//!
//! ## Rounding
//!
//! Sums are kept unrounded during aggregation. [`KpiSummary::rounded`] rounds `total_profit` to
//! an integer and `efficiency` to one decimal place, and is applied once at the API boundary.

mod duration;
mod weekly;

pub use duration::{DeliveryDuration, InvalidDuration};
pub use weekly::{DemoWeeklySeries, WEEKDAYS, WeeklyPoint, WeeklySeries};

use crate::types::TrafficLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const GRACE_MINUTES: u64 = 10;
pub const LATE_PENALTY: f64 = 50.0;
pub const BONUS_THRESHOLD: f64 = 1000.0;
pub const BONUS_RATE: f64 = 0.1;
pub const FUEL_RATE_PER_KM: f64 = 5.0;
pub const HIGH_TRAFFIC_SURCHARGE_PER_KM: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KpiError {
    /// An order's delivery time is not an `HH:MM` duration. Aggregation stops at the first one.
    #[error("order {order_id} has malformed delivery time {value:?}")]
    MalformedDuration { order_id: i32, value: String },

    /// A route's base time is negative.
    #[error("route {route_id} has negative base time {value}")]
    NegativeBaseTime { route_id: i32, value: i32 },

    /// A total overflowed to infinity or NaN.
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
}

/// How fuel cost is attributed when a route carries several orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelCostPolicy {
    /// Charge the route's fuel cost once per order.
    #[default]
    PerOrder,
    /// Charge the route's fuel cost once per route that has orders.
    PerRoute,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiOrder {
    pub order_id: i32,
    pub value_rs: f64,
    pub delivery_time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiRoute {
    pub route_id: i32,
    pub distance_km: f64,
    pub traffic_level: TrafficLevel,
    pub base_time_min: i32,
    pub orders: Vec<KpiOrder>,
}

impl KpiRoute {
    /// Fuel cost of one trip along this route.
    pub fn fuel_cost(&self) -> f64 {
        let surcharge = match self.traffic_level {
            TrafficLevel::High => self.distance_km * HIGH_TRAFFIC_SURCHARGE_PER_KM,
            TrafficLevel::Low | TrafficLevel::Medium => 0.0,
        };
        self.distance_km * FUEL_RATE_PER_KM + surcharge
    }

    fn label(&self) -> String {
        format!("Route {}", self.route_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FuelCost {
    pub name: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_profit: f64,
    /// Percentage of orders delivered on time, 0 when there are no orders.
    pub efficiency: f64,
    pub on_time: u64,
    pub late: u64,
    pub fuel_cost_breakdown: Vec<FuelCost>,
    pub weekly_data: Vec<WeeklyPoint>,
    /// Set when `weekly_data` is placeholder data rather than recorded history.
    pub weekly_data_is_demo: bool,
    pub total_orders: u64,
    pub average_order_value: f64,
}

impl KpiSummary {
    /// Round profit to an integer and efficiency to one decimal place, halves toward +inf.
    pub fn rounded(mut self) -> Self {
        self.total_profit = round_half_up(self.total_profit);
        self.efficiency = round_half_up(self.efficiency * 10.0) / 10.0;
        self
    }
}

/// `-49.5` rounds to `-49`, `49.5` to `50`.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Outcome of a single order, before it is folded into the summary.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderOutcome {
    late: bool,
    penalty: f64,
    bonus: f64,
}

impl OrderOutcome {
    fn assess(route: &KpiRoute, order: &KpiOrder) -> Result<Self, KpiError> {
        let duration = DeliveryDuration::parse(&order.delivery_time).map_err(|e| KpiError::MalformedDuration {
            order_id: order.order_id,
            value: e.value,
        })?;

        let base_time = u64::try_from(route.base_time_min).map_err(|_| KpiError::NegativeBaseTime {
            route_id: route.route_id,
            value: route.base_time_min,
        })?;
        let allowed = base_time + GRACE_MINUTES;
        let late = duration.minutes() > allowed;
        let penalty = if late { LATE_PENALTY } else { 0.0 };
        let bonus = if order.value_rs > BONUS_THRESHOLD && penalty == 0.0 {
            order.value_rs * BONUS_RATE
        } else {
            0.0
        };

        Ok(Self { late, penalty, bonus })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KpiAggregator {
    policy: FuelCostPolicy,
}

impl KpiAggregator {
    pub fn new(policy: FuelCostPolicy) -> Self {
        Self { policy }
    }

    /// Aggregate routes and their orders into an unrounded summary.
    ///
    /// Fails with [`KpiError::MalformedDuration`] on the first order whose delivery time cannot
    /// be parsed; no partial summary is produced.
    pub fn aggregate<W>(&self, routes: &[KpiRoute], weekly: &W) -> Result<KpiSummary, KpiError>
    where
        W: WeeklySeries + ?Sized,
    {
        let mut total_profit = 0.0;
        let mut total_value = 0.0;
        let mut on_time = 0u64;
        let mut late = 0u64;
        let mut fuel_cost_breakdown = Vec::new();

        for route in routes {
            if route.orders.is_empty() {
                continue;
            }

            let fuel_cost = route.fuel_cost();
            if self.policy == FuelCostPolicy::PerRoute {
                fuel_cost_breakdown.push(FuelCost {
                    name: route.label(),
                    cost: fuel_cost,
                });
                total_profit -= fuel_cost;
            }

            for order in &route.orders {
                let outcome = OrderOutcome::assess(route, order)?;
                if outcome.late {
                    late += 1;
                } else {
                    on_time += 1;
                }

                let mut profit = order.value_rs + outcome.bonus - outcome.penalty;
                if self.policy == FuelCostPolicy::PerOrder {
                    fuel_cost_breakdown.push(FuelCost {
                        name: route.label(),
                        cost: fuel_cost,
                    });
                    profit -= fuel_cost;
                }

                total_profit += profit;
                total_value += order.value_rs;
            }
        }

        let total_orders = on_time + late;
        let (efficiency, average_order_value) = if total_orders == 0 {
            (0.0, 0.0)
        } else {
            (
                on_time as f64 / total_orders as f64 * 100.0,
                total_value / total_orders as f64,
            )
        };

        ensure_finite("totalProfit", total_profit)?;
        ensure_finite("averageOrderValue", average_order_value)?;
        for entry in &fuel_cost_breakdown {
            ensure_finite("fuelCostBreakdown", entry.cost)?;
        }

        tracing::debug!(
            routes = routes.len(),
            total_orders,
            on_time,
            late,
            policy = ?self.policy,
            "Aggregated delivery KPIs"
        );

        Ok(KpiSummary {
            total_profit,
            efficiency,
            on_time,
            late,
            fuel_cost_breakdown,
            weekly_data: weekly.weekly(),
            weekly_data_is_demo: weekly.is_demo(),
            total_orders,
            average_order_value,
        })
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), KpiError> {
    if !value.is_finite() {
        return Err(KpiError::NonFinite { field });
    }
    Ok(())
}
