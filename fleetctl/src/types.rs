//! Common type definitions shared by the API, database and KPI layers.
//!
//! This module defines:
//! - Type aliases for entity IDs
//! - The fleet enums stored as PostgreSQL enum types ([`TrafficLevel`], [`OrderStatus`],
//!   [`DriverStatus`])
//! - [`Resource`] and [`Operation`] used when reporting authorization failures
//!
//! # ID Types
//!
//! Users are keyed by UUID. Fleet entities (drivers, routes, orders) use serial integer keys;
//! routes and orders additionally carry a business identifier (`route_id`, `order_id`) that the
//! dashboard displays and that orders reference.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

pub type UserId = Uuid;
pub type DriverId = i32;
pub type RouteKey = i32;
pub type OrderKey = i32;

/// Abbreviate a UUID to its first 8 characters for log fields.
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// Congestion level of a route. High traffic raises fuel cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "traffic_level")]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
}

/// Delivery state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    Delivered,
    #[serde(rename = "In Transit")]
    #[sqlx(rename = "In Transit")]
    InTransit,
    Delayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "driver_status")]
pub enum DriverStatus {
    Active,
    Break,
    Offline,
}

// Operations that can be performed on resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

// Resources that can be operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Drivers,
    Routes,
    Orders,
    System,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Drivers => write!(f, "drivers"),
            Resource::Routes => write!(f, "routes"),
            Resource::Orders => write!(f, "orders"),
            Resource::System => write!(f, "system"),
        }
    }
}
