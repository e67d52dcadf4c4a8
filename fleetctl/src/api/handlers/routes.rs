//! Delivery route endpoints.

use crate::{
    AppState,
    api::models::{
        auth::MessageResponse,
        routes::{RouteCreate, RouteResponse, RouteUpdate},
        users::CurrentUser,
    },
    auth::permissions::require_manager,
    db::{
        errors::DbError,
        handlers::{Repository, Routes},
        models::routes::{RouteCreateDBRequest, RouteUpdateDBRequest, RouteWithOrdersDBResponse},
    },
    errors::{Error, Result},
    types::{Operation, Resource, RouteKey},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

fn not_found(id: RouteKey) -> Error {
    Error::NotFound {
        resource: "Route".to_string(),
        id: id.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/routes",
    tag = "routes",
    summary = "List routes",
    description = "All routes ordered by route ID, each with its assigned orders",
    responses(
        (status = 200, description = "Routes", body = Vec<RouteResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_routes(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<Vec<RouteResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let routes = Routes::new(&mut conn).list_with_orders().await?;

    Ok(Json(routes.into_iter().map(RouteResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/routes/{id}",
    tag = "routes",
    summary = "Get route",
    params(("id" = i32, Path, description = "Route record ID")),
    responses(
        (status = 200, description = "Route with its orders", body = RouteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Route not found"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_route(State(state): State<AppState>, Path(id): Path<RouteKey>, _current_user: CurrentUser) -> Result<Json<RouteResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let route = Routes::new(&mut conn).get_with_orders(id).await?.ok_or_else(|| not_found(id))?;

    Ok(Json(RouteResponse::from(route)))
}

#[utoipa::path(
    post,
    path = "/routes",
    tag = "routes",
    summary = "Create route",
    request_body = RouteCreate,
    responses(
        (status = 201, description = "Route created", body = RouteResponse),
        (status = 400, description = "Invalid route"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 409, description = "Route ID already in use"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_route(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<RouteCreate>,
) -> Result<(StatusCode, Json<RouteResponse>)> {
    require_manager(&current_user, Operation::Create, Resource::Routes)?;
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let route = Routes::new(&mut conn).create(&RouteCreateDBRequest::from(request)).await?;

    let response = RouteResponse::from(RouteWithOrdersDBResponse { route, orders: Vec::new() });
    Ok((StatusCode::CREATED, Json(response)))
}

/// Serves both `PUT` and `PATCH`. Changing `routeId` carries the route's orders along.
#[utoipa::path(
    patch,
    path = "/routes/{id}",
    tag = "routes",
    summary = "Update route",
    params(("id" = i32, Path, description = "Route record ID")),
    request_body = RouteUpdate,
    responses(
        (status = 200, description = "Route updated", body = RouteResponse),
        (status = 400, description = "Invalid route"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Route not found"),
        (status = 409, description = "Route ID already in use"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<RouteKey>,
    current_user: CurrentUser,
    Json(request): Json<RouteUpdate>,
) -> Result<Json<RouteResponse>> {
    require_manager(&current_user, Operation::Update, Resource::Routes)?;
    request.validate()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Routes::new(&mut tx);
    repo.update(id, &RouteUpdateDBRequest::from(request)).await.map_err(|e| match e {
        DbError::NotFound => not_found(id),
        other => other.into(),
    })?;
    let route = repo.get_with_orders(id).await?.ok_or_else(|| not_found(id))?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(RouteResponse::from(route)))
}

/// Routes that still have orders cannot be deleted.
#[utoipa::path(
    delete,
    path = "/routes/{id}",
    tag = "routes",
    summary = "Delete route",
    params(("id" = i32, Path, description = "Route record ID")),
    responses(
        (status = 200, description = "Route deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Route not found"),
        (status = 409, description = "Route still has orders"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_route(State(state): State<AppState>, Path(id): Path<RouteKey>, current_user: CurrentUser) -> Result<Json<MessageResponse>> {
    require_manager(&current_user, Operation::Delete, Resource::Routes)?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Routes::new(&mut tx);

    let route = repo.get_by_id(id).await?.ok_or_else(|| not_found(id))?;
    if repo.has_orders(route.route_id).await? {
        return Err(Error::Conflict {
            message: format!("Route {} still has orders assigned", route.route_id),
        });
    }
    repo.delete(id).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(MessageResponse::new("Route deleted successfully")))
}
