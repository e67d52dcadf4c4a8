//! Database models for routes.

use super::orders::OrderDBResponse;
use crate::api::models::routes::{RouteCreate, RouteUpdate};
use crate::kpi::{KpiOrder, KpiRoute};
use crate::types::{RouteKey, TrafficLevel};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct RouteCreateDBRequest {
    pub route_id: i32,
    pub distance_km: f64,
    pub traffic_level: TrafficLevel,
    pub base_time_min: i32,
    pub popularity: f64,
}

impl From<RouteCreate> for RouteCreateDBRequest {
    fn from(api: RouteCreate) -> Self {
        Self {
            route_id: api.route_id,
            distance_km: api.distance_km,
            traffic_level: api.traffic_level,
            base_time_min: api.base_time_min,
            popularity: api.popularity.unwrap_or(0.0),
        }
    }
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct RouteUpdateDBRequest {
    pub route_id: Option<i32>,
    pub distance_km: Option<f64>,
    pub traffic_level: Option<TrafficLevel>,
    pub base_time_min: Option<i32>,
    pub popularity: Option<f64>,
}

impl From<RouteUpdate> for RouteUpdateDBRequest {
    fn from(api: RouteUpdate) -> Self {
        Self {
            route_id: api.route_id,
            distance_km: api.distance_km,
            traffic_level: api.traffic_level,
            base_time_min: api.base_time_min,
            popularity: api.popularity,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RouteDBResponse {
    pub id: RouteKey,
    pub route_id: i32,
    pub distance_km: f64,
    pub traffic_level: TrafficLevel,
    pub base_time_min: i32,
    pub popularity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RouteWithOrdersDBResponse {
    pub route: RouteDBResponse,
    pub orders: Vec<OrderDBResponse>,
}

impl From<&RouteWithOrdersDBResponse> for KpiRoute {
    fn from(db: &RouteWithOrdersDBResponse) -> Self {
        Self {
            route_id: db.route.route_id,
            distance_km: db.route.distance_km,
            traffic_level: db.route.traffic_level,
            base_time_min: db.route.base_time_min,
            orders: db
                .orders
                .iter()
                .map(|order| KpiOrder {
                    order_id: order.order_id,
                    value_rs: order.value_rs,
                    delivery_time: order.delivery_time.clone(),
                })
                .collect(),
        }
    }
}
