//! Database models for orders.

use super::routes::RouteDBResponse;
use crate::api::models::orders::{OrderCreate, OrderUpdate};
use crate::types::{OrderKey, OrderStatus};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct OrderCreateDBRequest {
    pub order_id: i32,
    pub value_rs: f64,
    pub route_id: i32,
    pub delivery_time: String,
    pub status: OrderStatus,
    pub customer: String,
}

impl From<OrderCreate> for OrderCreateDBRequest {
    fn from(api: OrderCreate) -> Self {
        Self {
            order_id: api.order_id,
            value_rs: api.value_rs,
            route_id: api.route_id,
            delivery_time: api.delivery_time,
            status: api.status.unwrap_or(OrderStatus::InTransit),
            customer: api.customer,
        }
    }
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdateDBRequest {
    pub order_id: Option<i32>,
    pub value_rs: Option<f64>,
    pub route_id: Option<i32>,
    pub delivery_time: Option<String>,
    pub status: Option<OrderStatus>,
    pub customer: Option<String>,
}

impl From<OrderUpdate> for OrderUpdateDBRequest {
    fn from(api: OrderUpdate) -> Self {
        Self {
            order_id: api.order_id,
            value_rs: api.value_rs,
            route_id: api.route_id,
            delivery_time: api.delivery_time,
            status: api.status,
            customer: api.customer,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderDBResponse {
    pub id: OrderKey,
    pub order_id: i32,
    pub value_rs: f64,
    pub route_id: i32,
    pub delivery_time: String,
    pub status: OrderStatus,
    pub customer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderWithRouteDBResponse {
    pub order: OrderDBResponse,
    pub route: RouteDBResponse,
}
