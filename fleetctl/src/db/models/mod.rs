//! Database record models matching table schemas.
//!
//! Rows derive `sqlx::FromRow` and are distinct from the API models in
//! [`crate::api::models`], so storage and wire representations can evolve independently.
//! Create/update requests are plain structs; update requests use `Option` fields that map to
//! `COALESCE` in the repositories.

pub mod analytics;
pub mod drivers;
pub mod orders;
pub mod routes;
pub mod users;
