//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Transactions
//!
//! Repositories take any `&mut PgConnection`. Multi-statement writes (seeding) run inside a
//! transaction; single reads use a pooled connection:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! fleetctl::seed::reseed(&mut tx).await?;
//! tx.commit().await?;
//!
//! let mut conn = pool.acquire().await?;
//! let drivers = Drivers::new(&mut conn).list().await?;
//! ```
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and are exposed through [`crate::migrator`]:
//!
//! ```ignore
//! fleetctl::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
