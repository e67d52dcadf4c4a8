//! API request and response data models.
//!
//! These types define the public JSON contract. They are kept separate from the row types in
//! [`crate::db::models`] so storage and wire formats can change independently. Field names are
//! camelCase on the wire.
//!
//! - [`auth`]: Login, registration and logout payloads
//! - [`dashboard`]: Fleet counts
//! - [`drivers`], [`routes`], [`orders`]: Fleet resources and their create/update payloads
//! - [`system`]: Banner, health and seeding responses
//! - [`users`]: Accounts, roles and the authenticated caller
//! - [`validation`]: Field checks shared by the create/update payloads

pub mod auth;
pub mod dashboard;
pub mod drivers;
pub mod orders;
pub mod routes;
pub mod system;
pub mod users;
pub mod validation;
