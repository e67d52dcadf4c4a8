//! Database repository for routes.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::{
        orders::OrderDBResponse,
        routes::{RouteCreateDBRequest, RouteDBResponse, RouteUpdateDBRequest, RouteWithOrdersDBResponse},
    },
};
use crate::types::RouteKey;
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::instrument;

pub struct Routes<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Routes<'c> {
    type CreateRequest = RouteCreateDBRequest;
    type UpdateRequest = RouteUpdateDBRequest;
    type Response = RouteDBResponse;
    type Id = RouteKey;

    #[instrument(skip(self, request), fields(route_id = request.route_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let route = sqlx::query_as::<_, RouteDBResponse>(
            r#"
            INSERT INTO routes (route_id, distance_km, traffic_level, base_time_min, popularity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(request.route_id)
        .bind(request.distance_km)
        .bind(request.traffic_level)
        .bind(request.base_time_min)
        .bind(request.popularity)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(route)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let route = sqlx::query_as::<_, RouteDBResponse>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(route)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let routes = sqlx::query_as::<_, RouteDBResponse>("SELECT * FROM routes ORDER BY route_id ASC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(routes)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // A changed route_id cascades to the orders referencing it.
        let route = sqlx::query_as::<_, RouteDBResponse>(
            r#"
            UPDATE routes SET
                route_id = COALESCE($2, route_id),
                distance_km = COALESCE($3, distance_km),
                traffic_level = COALESCE($4, traffic_level),
                base_time_min = COALESCE($5, base_time_min),
                popularity = COALESCE($6, popularity),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.route_id)
        .bind(request.distance_km)
        .bind(request.traffic_level)
        .bind(request.base_time_min)
        .bind(request.popularity)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(route)
    }
}

impl<'c> Routes<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Look up a route by its business identifier.
    #[instrument(skip(self), err)]
    pub async fn get_by_route_id(&mut self, route_id: i32) -> Result<Option<RouteDBResponse>> {
        let route = sqlx::query_as::<_, RouteDBResponse>("SELECT * FROM routes WHERE route_id = $1")
            .bind(route_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(route)
    }

    /// Fetch every route with the orders assigned to it, ordered by `route_id`.
    #[instrument(skip(self), err)]
    pub async fn list_with_orders(&mut self) -> Result<Vec<RouteWithOrdersDBResponse>> {
        let routes = self.list().await?;
        let orders = sqlx::query_as::<_, OrderDBResponse>("SELECT * FROM orders ORDER BY order_id ASC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(group_orders(routes, orders))
    }

    #[instrument(skip(self), err)]
    pub async fn get_with_orders(&mut self, id: RouteKey) -> Result<Option<RouteWithOrdersDBResponse>> {
        let Some(route) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let orders = sqlx::query_as::<_, OrderDBResponse>("SELECT * FROM orders WHERE route_id = $1 ORDER BY order_id ASC")
            .bind(route.route_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(Some(RouteWithOrdersDBResponse { route, orders }))
    }

    /// Whether any order references the route with this business identifier.
    #[instrument(skip(self), err)]
    pub async fn has_orders(&mut self, route_id: i32) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM orders WHERE route_id = $1)")
            .bind(route_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(exists)
    }
}

/// Attach orders to their routes, preserving the order of both inputs.
fn group_orders(routes: Vec<RouteDBResponse>, orders: Vec<OrderDBResponse>) -> Vec<RouteWithOrdersDBResponse> {
    let mut by_route: HashMap<i32, Vec<OrderDBResponse>> = HashMap::new();
    for order in orders {
        by_route.entry(order.route_id).or_default().push(order);
    }

    routes
        .into_iter()
        .map(|route| {
            let orders = by_route.remove(&route.route_id).unwrap_or_default();
            RouteWithOrdersDBResponse { route, orders }
        })
        .collect()
}
