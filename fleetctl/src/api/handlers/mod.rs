//! HTTP request handlers for all API endpoints.
//!
//! Handlers are grouped by resource. Each one extracts the caller with
//! [`CurrentUser`](crate::api::models::users::CurrentUser) where authentication is required,
//! checks the role for writes, validates the payload, and delegates storage to the
//! repositories in [`crate::db::handlers`].
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration, login, logout and the current user
//! - [`dashboard`]: Fleet counts and delivery KPIs
//! - [`drivers`]: Driver roster CRUD
//! - [`orders`]: Order CRUD, each order joined with its route
//! - [`routes`]: Route CRUD, each route joined with its orders
//! - [`system`]: Service banner, health check and demo data reseeding
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which converts to the matching HTTP status and a
//! `{"message": ...}` JSON body.

pub mod auth;
pub mod dashboard;
pub mod drivers;
pub mod orders;
pub mod routes;
pub mod system;
