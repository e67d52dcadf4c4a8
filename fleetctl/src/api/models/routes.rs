//! API request/response models for routes.

use super::orders::OrderResponse;
use super::validation;
use crate::db::models::routes::{RouteDBResponse, RouteWithOrdersDBResponse};
use crate::errors::Error;
use crate::types::{RouteKey, TrafficLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteCreate {
    /// Business identifier shown on the dashboard and referenced by orders
    pub route_id: i32,
    pub distance_km: f64,
    pub traffic_level: TrafficLevel,
    /// Expected delivery duration in minutes
    pub base_time_min: i32,
    pub popularity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteUpdate {
    pub route_id: Option<i32>,
    pub distance_km: Option<f64>,
    pub traffic_level: Option<TrafficLevel>,
    pub base_time_min: Option<i32>,
    pub popularity: Option<f64>,
}

/// A route as returned on its own (nested inside an order).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub id: RouteKey,
    pub route_id: i32,
    pub distance_km: f64,
    pub traffic_level: TrafficLevel,
    pub base_time_min: i32,
    pub popularity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A route with the orders assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    #[serde(flatten)]
    pub route: RouteSummary,
    #[schema(no_recursion)]
    pub orders: Vec<OrderResponse>,
}

impl RouteCreate {
    pub fn validate(&self) -> Result<(), Error> {
        validation::non_negative("distanceKm", self.distance_km)?;
        validation::non_negative_int("baseTimeMin", self.base_time_min)?;
        if let Some(popularity) = self.popularity {
            validation::finite("popularity", popularity)?;
        }
        Ok(())
    }
}

impl RouteUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(distance_km) = self.distance_km {
            validation::non_negative("distanceKm", distance_km)?;
        }
        if let Some(base_time_min) = self.base_time_min {
            validation::non_negative_int("baseTimeMin", base_time_min)?;
        }
        if let Some(popularity) = self.popularity {
            validation::finite("popularity", popularity)?;
        }
        Ok(())
    }
}

impl From<RouteDBResponse> for RouteSummary {
    fn from(db: RouteDBResponse) -> Self {
        Self {
            id: db.id,
            route_id: db.route_id,
            distance_km: db.distance_km,
            traffic_level: db.traffic_level,
            base_time_min: db.base_time_min,
            popularity: db.popularity,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<RouteWithOrdersDBResponse> for RouteResponse {
    fn from(db: RouteWithOrdersDBResponse) -> Self {
        Self {
            route: RouteSummary::from(db.route),
            orders: db.orders.into_iter().map(OrderResponse::from).collect(),
        }
    }
}
