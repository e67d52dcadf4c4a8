//! Order endpoints.

use crate::{
    AppState,
    api::models::{
        auth::MessageResponse,
        orders::{OrderCreate, OrderResponse, OrderUpdate},
        users::CurrentUser,
    },
    auth::permissions::require_manager,
    db::{
        errors::DbError,
        handlers::{Orders, Repository, Routes},
        models::orders::{OrderCreateDBRequest, OrderUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{OrderKey, Operation, Resource},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use sqlx::PgConnection;

fn not_found(id: OrderKey) -> Error {
    Error::NotFound {
        resource: "Order".to_string(),
        id: id.to_string(),
    }
}

/// Orders must reference an existing route.
async fn ensure_route_exists(conn: &mut PgConnection, route_id: i32) -> Result<()> {
    if Routes::new(conn).get_by_route_id(route_id).await?.is_none() {
        return Err(Error::BadRequest {
            message: format!("Route {route_id} does not exist"),
        });
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    summary = "List orders",
    description = "All orders, newest first, each with its route",
    responses(
        (status = 200, description = "Orders", body = Vec<OrderResponse>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_orders(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<Vec<OrderResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let orders = Orders::new(&mut conn).list_with_routes().await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    summary = "Get order",
    params(("id" = i32, Path, description = "Order record ID")),
    responses(
        (status = 200, description = "Order with its route", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_order(State(state): State<AppState>, Path(id): Path<OrderKey>, _current_user: CurrentUser) -> Result<Json<OrderResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let order = Orders::new(&mut conn).get_with_route(id).await?.ok_or_else(|| not_found(id))?;

    Ok(Json(OrderResponse::from(order)))
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    summary = "Create order",
    request_body = OrderCreate,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid order or unknown route"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 409, description = "Order ID already in use"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<OrderCreate>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    require_manager(&current_user, Operation::Create, Resource::Orders)?;
    request.validate()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    ensure_route_exists(&mut tx, request.route_id).await?;
    let order = Orders::new(&mut tx).create(&OrderCreateDBRequest::from(request)).await?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// Serves both `PUT` and `PATCH`; omitted fields keep their stored value.
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    tag = "orders",
    summary = "Update order",
    params(("id" = i32, Path, description = "Order record ID")),
    request_body = OrderUpdate,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid order or unknown route"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order ID already in use"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<OrderKey>,
    current_user: CurrentUser,
    Json(request): Json<OrderUpdate>,
) -> Result<Json<OrderResponse>> {
    require_manager(&current_user, Operation::Update, Resource::Orders)?;
    request.validate()?;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    if let Some(route_id) = request.route_id {
        ensure_route_exists(&mut tx, route_id).await?;
    }
    let order = Orders::new(&mut tx)
        .update(id, &OrderUpdateDBRequest::from(request))
        .await
        .map_err(|e| match e {
            DbError::NotFound => not_found(id),
            other => other.into(),
        })?;
    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(OrderResponse::from(order)))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "orders",
    summary = "Delete order",
    params(("id" = i32, Path, description = "Order record ID")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Manager role required"),
        (status = 404, description = "Order not found"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_order(State(state): State<AppState>, Path(id): Path<OrderKey>, current_user: CurrentUser) -> Result<Json<MessageResponse>> {
    require_manager(&current_user, Operation::Delete, Resource::Orders)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    if !Orders::new(&mut conn).delete(id).await? {
        return Err(not_found(id));
    }

    Ok(Json(MessageResponse::new("Order deleted successfully")))
}
