//! API request/response models for drivers.

use super::validation;
use crate::db::models::drivers::DriverDBResponse;
use crate::errors::Error;
use crate::types::{DriverId, DriverStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverCreate {
    pub name: String,
    pub shift_hours: i32,
    /// Hours worked each day of the past week, e.g. `"6|8|7|7|7|6|10"`
    pub past_week_hours: String,
    pub status: Option<DriverStatus>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverUpdate {
    pub name: Option<String>,
    pub shift_hours: Option<i32>,
    pub past_week_hours: Option<String>,
    pub status: Option<DriverStatus>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverResponse {
    pub id: DriverId,
    pub name: String,
    pub shift_hours: i32,
    pub past_week_hours: String,
    pub status: DriverStatus,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DriverCreate {
    pub fn validate(&self) -> Result<(), Error> {
        validation::not_blank("name", &self.name)?;
        validation::non_negative_int("shiftHours", self.shift_hours)?;
        validation::past_week_hours(&self.past_week_hours)?;
        if let Some(rating) = self.rating {
            validation::rating(rating)?;
        }
        Ok(())
    }
}

impl DriverUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(name) = &self.name {
            validation::not_blank("name", name)?;
        }
        if let Some(shift_hours) = self.shift_hours {
            validation::non_negative_int("shiftHours", shift_hours)?;
        }
        if let Some(hours) = &self.past_week_hours {
            validation::past_week_hours(hours)?;
        }
        if let Some(rating) = self.rating {
            validation::rating(rating)?;
        }
        Ok(())
    }
}

impl From<DriverDBResponse> for DriverResponse {
    fn from(db: DriverDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            shift_hours: db.shift_hours,
            past_week_hours: db.past_week_hours,
            status: db.status,
            rating: db.rating,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
