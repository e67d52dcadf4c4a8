//! Service banner, health check and demo data reseeding.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;

use crate::{
    AppState,
    api::models::{
        system::{DatabaseStatus, HealthResponse, SeedResponse, ServiceInfo},
        users::CurrentUser,
    },
    auth::permissions::require_manager,
    errors::{Error, Result},
    seed,
    types::{Operation, Resource},
};

#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    summary = "Service banner",
    responses((status = 200, description = "Service name, version and server time", body = ServiceInfo))
)]
#[tracing::instrument(skip_all)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "fleetctl API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    summary = "Health check",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn health(State(state): State<AppState>) -> Response {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => Json(HealthResponse {
            status: "healthy".to_string(),
            database: DatabaseStatus::Connected,
            timestamp: Utc::now(),
        })
        .into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    database: DatabaseStatus::Disconnected,
                    timestamp: Utc::now(),
                }),
            )
                .into_response()
        }
    }
}

/// Replaces all drivers, routes and orders with the bundled demo dataset. Users are kept.
#[utoipa::path(
    post,
    path = "/seed",
    tag = "system",
    summary = "Reload demo data",
    responses(
        (status = 200, description = "Database seeded", body = SeedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Seeding disabled"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn seed_database(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<SeedResponse>> {
    if !state.config.enable_seed_endpoint {
        return Err(Error::NotFound {
            resource: "Endpoint".to_string(),
            id: "/api/seed".to_string(),
        });
    }
    require_manager(&current_user, Operation::Create, Resource::System)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let counts = seed::reseed(&mut tx).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    tracing::info!(user_id = %current_user.id, "Database reseeded");
    Ok(Json(SeedResponse {
        message: "Database seeded successfully".to_string(),
        drivers: counts.drivers,
        routes: counts.routes,
        orders: counts.orders,
    }))
}
