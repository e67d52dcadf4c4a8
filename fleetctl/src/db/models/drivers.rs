//! Database models for drivers.

use crate::api::models::drivers::{DriverCreate, DriverUpdate};
use crate::types::{DriverId, DriverStatus};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct DriverCreateDBRequest {
    pub name: String,
    pub shift_hours: i32,
    pub past_week_hours: String,
    pub status: DriverStatus,
    pub rating: f64,
}

impl From<DriverCreate> for DriverCreateDBRequest {
    fn from(api: DriverCreate) -> Self {
        Self {
            name: api.name,
            shift_hours: api.shift_hours,
            past_week_hours: api.past_week_hours,
            status: api.status.unwrap_or(DriverStatus::Active),
            rating: api.rating.unwrap_or(0.0),
        }
    }
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct DriverUpdateDBRequest {
    pub name: Option<String>,
    pub shift_hours: Option<i32>,
    pub past_week_hours: Option<String>,
    pub status: Option<DriverStatus>,
    pub rating: Option<f64>,
}

impl From<DriverUpdate> for DriverUpdateDBRequest {
    fn from(api: DriverUpdate) -> Self {
        Self {
            name: api.name,
            shift_hours: api.shift_hours,
            past_week_hours: api.past_week_hours,
            status: api.status,
            rating: api.rating,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DriverDBResponse {
    pub id: DriverId,
    pub name: String,
    pub shift_hours: i32,
    pub past_week_hours: String,
    pub status: DriverStatus,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
