//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/api/register`, `/api/login`, `/api/logout`, `/api/me`)
//! - **Drivers** (`/api/drivers/*`)
//! - **Routes** (`/api/routes/*`)
//! - **Orders** (`/api/orders/*`)
//! - **Dashboard** (`/api/dashboard/stats`, `/api/dashboard/kpis`)
//! - **Seeding** (`/api/seed`)
//! - **System** (`/`, `/health`)
//!
//! Reads need any authenticated user; writes need the `Manager` role.
//!
//! # OpenAPI Documentation
//!
//! All endpoints are annotated with `utoipa`. Interactive documentation is served at `/docs`
//! and the raw document at `/api-docs/openapi.json`.

pub mod handlers;
pub mod models;
