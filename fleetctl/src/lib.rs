//! # fleetctl: REST backend and KPI analytics for a delivery-fleet dashboard
//!
//! `fleetctl` stores a delivery fleet (drivers, routes and the orders assigned to routes) in
//! PostgreSQL and serves it over a JSON REST API to a dashboard frontend. Its one piece of
//! real business logic is the KPI aggregator in [`kpi`], which turns every route and its orders
//! into a profit, on-time efficiency and fuel cost summary.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL, through `sqlx`, for all persistence.
//!
//! ### Request Flow
//!
//! A request under `/api/*` is routed to a handler in [`api::handlers`]. Handlers that need a
//! caller extract [`CurrentUser`](api::models::users::CurrentUser), which authenticates the
//! request from a bearer token or the session cookie. Reads are open to any authenticated user;
//! writes require the `Manager` role. Handlers validate the payload, then go through the
//! repositories in [`db::handlers`] for storage. Every error converts to an HTTP status and a
//! `{"message": ...}` body via [`errors::Error`].
//!
//! ### Core Components
//!
//! - **API layer** ([`api`]): handlers and wire models for auth, drivers, routes, orders,
//!   dashboard and system endpoints
//! - **Authentication** ([`auth`]): password hashing, JWT sessions and role checks
//! - **Database layer** ([`db`]): repositories over a `&mut PgConnection`, and row models
//! - **KPIs** ([`kpi`]): the pure aggregation over routes and orders
//! - **Seeding** ([`seed`]): the bundled demo dataset
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use fleetctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = fleetctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     fleetctl::telemetry::init_telemetry(&config.log_level)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations run automatically on startup. They can also be run by hand:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! fleetctl::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod kpi;
mod openapi;
pub mod seed;
pub mod telemetry;
pub mod types;
use crate::config::CorsOrigin;

#[cfg(test)]
pub mod test_utils;

use crate::{
    api::models::users::Role,
    auth::{
        password,
        session::{JwtSessions, SessionTokens},
    },
    db::handlers::{Repository, Users},
    db::models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    errors::{Error, ErrorBody},
    openapi::ApiDoc,
};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::{
    Json, Router,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::UserId;

/// Application state shared across all request handlers.
///
/// - `db`: PostgreSQL connection pool
/// - `config`: Application configuration loaded from file and environment
/// - `sessions`: Issues and verifies session tokens
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .sessions(Arc::new(JwtSessions::from_config(&config)?))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub sessions: Arc<dyn SessionTokens>,
}

/// Get the fleetctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Ensure the configured manager account exists.
///
/// Creates the user with the `Manager` role when missing. When the user already exists and a
/// password is configured, the password is reset to it and the role restored to `Manager`.
/// Without a configured password a missing user cannot be created, so this logs a warning
/// and returns `None`.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(username: &str, password: Option<&str>, db: &PgPool) -> Result<Option<UserId>, Error> {
    let password_hash = match password {
        Some(pwd) => Some(password::hash_password_blocking(pwd.to_string()).await?),
        None => None,
    };

    let mut tx = db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut tx);

    let user_id = if let Some(existing_user) = user_repo.get_user_by_username(username).await? {
        if password_hash.is_some() {
            user_repo
                .update(
                    existing_user.id,
                    &UserUpdateDBRequest {
                        password_hash,
                        role: Some(Role::Manager),
                    },
                )
                .await?;
            debug!(user_id = %existing_user.id, "Reset admin user password");
        }
        Some(existing_user.id)
    } else if let Some(password_hash) = password_hash {
        let created_user = user_repo
            .create(&UserCreateDBRequest {
                username: username.to_string(),
                password_hash,
                role: Role::Manager,
            })
            .await?;
        info!(user_id = %created_user.id, "Created admin user {}", username);
        Some(created_user.id)
    } else {
        warn!("No admin_password configured and admin user {} does not exist; skipping", username);
        None
    };

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;
    Ok(user_id)
}

/// Load the demo dataset if the fleet tables have no routes yet.
///
/// Returns whether anything was loaded. Existing data is never overwritten.
#[instrument(skip_all)]
pub async fn seed_database_if_empty(db: &PgPool) -> Result<bool, Error> {
    let mut tx = db.begin().await.map_err(|e| Error::Database(e.into()))?;

    if !seed::is_empty(&mut tx).await? {
        info!("Fleet data present, skipping demo seeding");
        tx.commit().await.map_err(|e| Error::Database(e.into()))?;
        return Ok(false);
    }

    seed::load_demo_data(&mut tx).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    info!("Seeded empty database with demo data");
    Ok(true)
}

/// Connect the pool and run migrations.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let settings = &config.database.pool;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(settings.max_lifetime_secs))
        .connect(&config.database.url)
        .await?;

    migrator().run(&pool).await?;
    Ok(pool)
}

/// Admin user and demo data, both idempotent.
async fn initialize_data(config: &Config, pool: &PgPool) -> anyhow::Result<()> {
    create_initial_admin_user(&config.admin_username, config.admin_password.as_deref(), pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create initial admin user: {}", e))?;

    if config.seed.on_empty_startup {
        seed_database_if_empty(pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed demo data: {}", e))?;
    }

    Ok(())
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.auth.security.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            // Origin headers never carry the trailing slash `Url` adds
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(config.auth.security.cors.allow_credentials)
        .expose_headers(vec![header::LOCATION]);

    if let Some(max_age) = config.auth.security.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

async fn endpoint_not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            message: "Endpoint not found".to_string(),
        }),
    )
}

/// Build the main application router with all endpoints and middleware.
///
/// - `/api/*` resource routes, `/` and `/health`
/// - OpenAPI document and Scalar UI
/// - JSON 404 for unknown paths
/// - Optional Prometheus metrics at `/internal/metrics`
/// - CORS and request tracing
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{auth, dashboard, drivers, orders, routes, system};

    let api_routes = Router::new()
        // Authentication
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        // Drivers
        .route("/drivers", get(drivers::list_drivers).post(drivers::create_driver))
        .route(
            "/drivers/{id}",
            get(drivers::get_driver)
                .put(drivers::update_driver)
                .patch(drivers::update_driver)
                .delete(drivers::delete_driver),
        )
        // Routes
        .route("/routes", get(routes::list_routes).post(routes::create_route))
        .route(
            "/routes/{id}",
            get(routes::get_route)
                .put(routes::update_route)
                .patch(routes::update_route)
                .delete(routes::delete_route),
        )
        // Orders
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        )
        // Dashboard
        .route("/dashboard/stats", get(dashboard::get_stats))
        .route("/dashboard/kpis", get(dashboard::get_kpis))
        .route("/seed", post(system::seed_database));

    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/api", api_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback(endpoint_not_found);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let cors_layer = create_cors_layer(&state.config)?;
    let router = router.with_state(state).layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// A configured server: router, configuration and the database pool it owns.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Connect to the configured database, migrate, initialize data and build the router.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// As [`Application::new`], reusing `pool` when given instead of connecting.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting fleetctl with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        initialize_data(&config, &pool).await?;

        let sessions = JwtSessions::from_config(&config)?;
        let app_state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .sessions(Arc::new(sessions))
            .build();

        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "fleetctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{create_initial_admin_user, seed_database_if_empty};
    use crate::{
        api::models::users::Role,
        auth::password,
        db::handlers::{Repository, Routes, Users},
        test_utils::*,
    };
    use axum::http::StatusCode;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_initial_admin_user(pool: PgPool) {
        let user_id = create_initial_admin_user("boss", Some("first-password"), &pool)
            .await
            .unwrap()
            .expect("admin user should be created");

        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn).get_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(user.username, "boss");
        assert_eq!(user.role, Role::Manager);
        assert!(password::verify_password("first-password", &user.password_hash).unwrap());
        drop(conn);

        // second run resets the password and keeps the same account
        let again = create_initial_admin_user("boss", Some("second-password"), &pool).await.unwrap();
        assert_eq!(again, Some(user_id));

        let mut conn = pool.acquire().await.unwrap();
        let user = Users::new(&mut conn).get_by_id(user_id).await.unwrap().unwrap();
        assert!(password::verify_password("second-password", &user.password_hash).unwrap());
        assert_eq!(Users::new(&mut conn).count().await.unwrap(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_admin_without_password_is_skipped(pool: PgPool) {
        assert_eq!(create_initial_admin_user("boss", None, &pool).await.unwrap(), None);

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(Users::new(&mut conn).count().await.unwrap(), 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_seed_only_when_empty(pool: PgPool) {
        assert!(seed_database_if_empty(&pool).await.unwrap());

        sqlx::query("DELETE FROM orders WHERE route_id = 10").execute(&pool).await.unwrap();
        sqlx::query("DELETE FROM routes WHERE route_id = 10").execute(&pool).await.unwrap();

        // data present: a partial fleet is left alone
        assert!(!seed_database_if_empty(&pool).await.unwrap());
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(Routes::new(&mut conn).list().await.unwrap().len(), 9);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_startup_seeding_from_config(pool: PgPool) {
        let mut config = create_test_config();
        config.seed.on_empty_startup = true;
        let server = create_test_app_with_config(pool.clone(), config).await;

        let manager = create_test_user(&pool, Role::Manager).await;
        let (name, value) = auth_header(&manager);
        let response = server.get("/api/routes").add_header(&name, &value).await;
        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>().as_array().unwrap().len(), 10);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_path_is_json_404(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/api/nope").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<serde_json::Value>()["message"], "Endpoint not found");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_openapi_document_served(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let doc: serde_json::Value = response.json();
        assert!(doc["paths"]["/api/dashboard/kpis"].is_object());

        server.get("/docs").await.assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_metrics_toggle(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        server.get("/internal/metrics").await.assert_status(StatusCode::NOT_FOUND);

        let mut config = create_test_config();
        config.enable_metrics = true;
        let server = create_test_app_with_config(pool, config).await;
        server.get("/health").await.assert_status_ok();
        server.get("/internal/metrics").await.assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_cors_preflight_allows_configured_origin(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server
            .method(axum::http::Method::OPTIONS, "/api/drivers")
            .add_header("origin", "http://localhost:5173")
            .add_header("access-control-request-method", "POST")
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.header("access-control-allow-origin").to_str().unwrap(),
            "http://localhost:5173"
        );
    }
}
