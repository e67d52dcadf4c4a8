//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection` (a pooled connection or an open transaction),
//! binds query parameters, and returns row models from [`crate::db::models`]. CRUD operations
//! come from the [`Repository`] trait; table-specific queries are inherent methods.
//!
//! ```ignore
//! use fleetctl::db::handlers::{Repository, Routes};
//!
//! let mut conn = pool.acquire().await?;
//! let routes = Routes::new(&mut conn).list_with_orders().await?;
//! ```

pub mod analytics;
pub mod drivers;
pub mod orders;
pub mod repository;
pub mod routes;
pub mod users;

pub use analytics::Analytics;
pub use drivers::Drivers;
pub use orders::Orders;
pub use repository::Repository;
pub use routes::Routes;
pub use users::Users;
