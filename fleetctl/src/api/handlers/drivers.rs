//! Driver roster endpoints.

use crate::{
    AppState,
    api::models::{
        auth::MessageResponse,
        drivers::{DriverCreate, DriverResponse, DriverUpdate},
        users::CurrentUser,
    },
    auth::permissions::require_manager,
    db::{
        handlers::{Drivers, Repository},
        models::drivers::{DriverCreateDBRequest, DriverUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{DriverId, Operation, Resource},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

fn not_found(id: DriverId) -> Error {
    Error::NotFound {
        resource: "Driver".to_string(),
        id: id.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/drivers",
    tag = "drivers",
    summary = "List drivers",
    description = "All drivers, newest first",
    responses(
        (status = 200, description = "Drivers", body = Vec<DriverResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_drivers(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<Vec<DriverResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let drivers = Drivers::new(&mut conn).list().await?;

    Ok(Json(drivers.into_iter().map(DriverResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/drivers/{id}",
    tag = "drivers",
    summary = "Get driver",
    params(("id" = i32, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver", body = DriverResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Driver not found"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_driver(State(state): State<AppState>, Path(id): Path<DriverId>, _current_user: CurrentUser) -> Result<Json<DriverResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let driver = Drivers::new(&mut conn).get_by_id(id).await?.ok_or_else(|| not_found(id))?;

    Ok(Json(DriverResponse::from(driver)))
}

#[utoipa::path(
    post,
    path = "/drivers",
    tag = "drivers",
    summary = "Create driver",
    request_body = DriverCreate,
    responses(
        (status = 201, description = "Driver created", body = DriverResponse),
        (status = 400, description = "Invalid driver"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_driver(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<DriverCreate>,
) -> Result<(StatusCode, Json<DriverResponse>)> {
    require_manager(&current_user, Operation::Create, Resource::Drivers)?;
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let driver = Drivers::new(&mut conn).create(&DriverCreateDBRequest::from(request)).await?;

    Ok((StatusCode::CREATED, Json(DriverResponse::from(driver))))
}

/// Serves both `PUT` and `PATCH`; omitted fields keep their stored value.
#[utoipa::path(
    patch,
    path = "/drivers/{id}",
    tag = "drivers",
    summary = "Update driver",
    params(("id" = i32, Path, description = "Driver ID")),
    request_body = DriverUpdate,
    responses(
        (status = 200, description = "Driver updated", body = DriverResponse),
        (status = 400, description = "Invalid driver"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Driver not found"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<DriverId>,
    current_user: CurrentUser,
    Json(request): Json<DriverUpdate>,
) -> Result<Json<DriverResponse>> {
    require_manager(&current_user, Operation::Update, Resource::Drivers)?;
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let driver = Drivers::new(&mut conn)
        .update(id, &DriverUpdateDBRequest::from(request))
        .await
        .map_err(|e| match e {
            crate::db::errors::DbError::NotFound => not_found(id),
            other => other.into(),
        })?;

    Ok(Json(DriverResponse::from(driver)))
}

#[utoipa::path(
    delete,
    path = "/drivers/{id}",
    tag = "drivers",
    summary = "Delete driver",
    params(("id" = i32, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Driver not found"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_driver(State(state): State<AppState>, Path(id): Path<DriverId>, current_user: CurrentUser) -> Result<Json<MessageResponse>> {
    require_manager(&current_user, Operation::Delete, Resource::Drivers)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    if !Drivers::new(&mut conn).delete(id).await? {
        return Err(not_found(id));
    }

    Ok(Json(MessageResponse::new("Driver deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::test_utils::{auth_header, create_test_app, create_test_user};
    use crate::types::DriverStatus;
    use serde_json::json;
    use sqlx::PgPool;

    fn new_driver() -> serde_json::Value {
        json!({
            "name": "Amit",
            "shiftHours": 6,
            "pastWeekHours": "6|8|7|7|7|6|10",
            "status": "Active",
            "rating": 4.8
        })
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_manager_crud_flow(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        let manager = create_test_user(&pool, Role::Manager).await;
        let (name, value) = auth_header(&manager);

        let response = server.post("/api/drivers").add_header(&name, &value).json(&new_driver()).await;
        response.assert_status(StatusCode::CREATED);
        let created: DriverResponse = response.json();
        assert_eq!(created.name, "Amit");
        assert_eq!(created.status, DriverStatus::Active);

        let response = server
            .patch(&format!("/api/drivers/{}", created.id))
            .add_header(&name, &value)
            .json(&json!({"status": "Break"}))
            .await;
        response.assert_status_ok();
        let updated: DriverResponse = response.json();
        assert_eq!(updated.status, DriverStatus::Break);
        assert_eq!(updated.past_week_hours, "6|8|7|7|7|6|10");

        let response = server
            .put(&format!("/api/drivers/{}", created.id))
            .add_header(&name, &value)
            .json(&json!({"rating": 4.1}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<DriverResponse>().rating, 4.1);

        let response = server.get("/api/drivers").add_header(&name, &value).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Vec<DriverResponse>>().len(), 1);

        let response = server.delete(&format!("/api/drivers/{}", created.id)).add_header(&name, &value).await;
        response.assert_status_ok();
        assert_eq!(response.json::<MessageResponse>().message, "Driver deleted successfully");

        let response = server.get(&format!("/api/drivers/{}", created.id)).add_header(&name, &value).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_user_role_is_read_only(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, Role::User).await;
        let (name, value) = auth_header(&user);

        let response = server.get("/api/drivers").add_header(&name, &value).await;
        response.assert_status_ok();

        let response = server.post("/api/drivers").add_header(&name, &value).json(&new_driver()).await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(
            response.json::<serde_json::Value>()["message"],
            "Insufficient permissions to create drivers"
        );
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_requires_authentication(pool: PgPool) {
        let server = create_test_app(pool).await;

        let response = server.get("/api/drivers").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<serde_json::Value>()["message"], "No token provided");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_invalid_payloads_are_rejected(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        let manager = create_test_user(&pool, Role::Manager).await;
        let (name, value) = auth_header(&manager);

        let mut bad_hours = new_driver();
        bad_hours["pastWeekHours"] = json!("8|8|8");
        let response = server.post("/api/drivers").add_header(&name, &value).json(&bad_hours).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let mut bad_rating = new_driver();
        bad_rating["rating"] = json!(7.5);
        let response = server.post("/api/drivers").add_header(&name, &value).json(&bad_rating).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .patch("/api/drivers/999")
            .add_header(&name, &value)
            .json(&json!({"shiftHours": 8}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
