//! API request/response models for orders.

use super::routes::RouteSummary;
use super::validation;
use crate::db::models::orders::{OrderDBResponse, OrderWithRouteDBResponse};
use crate::errors::Error;
use crate::types::{OrderKey, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub order_id: i32,
    pub value_rs: f64,
    /// Business ID of the route this order travels on
    pub route_id: i32,
    /// Elapsed time from dispatch to delivery, `HH:MM`
    pub delivery_time: String,
    pub status: Option<OrderStatus>,
    pub customer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub order_id: Option<i32>,
    pub value_rs: Option<f64>,
    pub route_id: Option<i32>,
    pub delivery_time: Option<String>,
    pub status: Option<OrderStatus>,
    pub customer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderKey,
    pub order_id: i32,
    pub value_rs: f64,
    pub route_id: i32,
    pub delivery_time: String,
    pub status: OrderStatus,
    pub customer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// The order's route, included on order listings
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub route: Option<RouteSummary>,
}

impl OrderCreate {
    pub fn validate(&self) -> Result<(), Error> {
        validation::non_negative("valueRs", self.value_rs)?;
        validation::delivery_time(&self.delivery_time)?;
        validation::not_blank("customer", &self.customer)?;
        Ok(())
    }
}

impl OrderUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(value_rs) = self.value_rs {
            validation::non_negative("valueRs", value_rs)?;
        }
        if let Some(delivery_time) = &self.delivery_time {
            validation::delivery_time(delivery_time)?;
        }
        if let Some(customer) = &self.customer {
            validation::not_blank("customer", customer)?;
        }
        Ok(())
    }
}

impl From<OrderDBResponse> for OrderResponse {
    fn from(db: OrderDBResponse) -> Self {
        Self {
            id: db.id,
            order_id: db.order_id,
            value_rs: db.value_rs,
            route_id: db.route_id,
            delivery_time: db.delivery_time,
            status: db.status,
            customer: db.customer,
            created_at: db.created_at,
            updated_at: db.updated_at,
            route: None,
        }
    }
}

impl From<OrderWithRouteDBResponse> for OrderResponse {
    fn from(db: OrderWithRouteDBResponse) -> Self {
        Self {
            route: Some(RouteSummary::from(db.route)),
            ..Self::from(db.order)
        }
    }
}
