//! Database repository for orders.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::{
        orders::{OrderCreateDBRequest, OrderDBResponse, OrderUpdateDBRequest, OrderWithRouteDBResponse},
        routes::RouteDBResponse,
    },
};
use crate::types::OrderKey;
use sqlx::PgConnection;
use std::collections::HashMap;
use tracing::{instrument, warn};

pub struct Orders<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Orders<'c> {
    type CreateRequest = OrderCreateDBRequest;
    type UpdateRequest = OrderUpdateDBRequest;
    type Response = OrderDBResponse;
    type Id = OrderKey;

    #[instrument(skip(self, request), fields(order_id = request.order_id, route_id = request.route_id), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let order = sqlx::query_as::<_, OrderDBResponse>(
            r#"
            INSERT INTO orders (order_id, value_rs, route_id, delivery_time, status, customer)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.order_id)
        .bind(request.value_rs)
        .bind(request.route_id)
        .bind(&request.delivery_time)
        .bind(request.status)
        .bind(&request.customer)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(order)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let order = sqlx::query_as::<_, OrderDBResponse>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(order)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let orders = sqlx::query_as::<_, OrderDBResponse>("SELECT * FROM orders ORDER BY created_at DESC, id DESC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(orders)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let order = sqlx::query_as::<_, OrderDBResponse>(
            r#"
            UPDATE orders SET
                order_id = COALESCE($2, order_id),
                value_rs = COALESCE($3, value_rs),
                route_id = COALESCE($4, route_id),
                delivery_time = COALESCE($5, delivery_time),
                status = COALESCE($6, status),
                customer = COALESCE($7, customer),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.order_id)
        .bind(request.value_rs)
        .bind(request.route_id)
        .bind(&request.delivery_time)
        .bind(request.status)
        .bind(&request.customer)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(order)
    }
}

impl<'c> Orders<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Fetch every order with its route attached, newest first.
    #[instrument(skip(self), err)]
    pub async fn list_with_routes(&mut self) -> Result<Vec<OrderWithRouteDBResponse>> {
        let orders = self.list().await?;
        self.attach_routes(orders).await
    }

    #[instrument(skip(self), err)]
    pub async fn get_with_route(&mut self, id: OrderKey) -> Result<Option<OrderWithRouteDBResponse>> {
        let Some(order) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        Ok(self.attach_routes(vec![order]).await?.pop())
    }

    async fn attach_routes(&mut self, orders: Vec<OrderDBResponse>) -> Result<Vec<OrderWithRouteDBResponse>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let mut route_ids: Vec<i32> = orders.iter().map(|o| o.route_id).collect();
        route_ids.sort_unstable();
        route_ids.dedup();

        let routes: HashMap<i32, RouteDBResponse> =
            sqlx::query_as::<_, RouteDBResponse>("SELECT * FROM routes WHERE route_id = ANY($1)")
                .bind(&route_ids)
                .fetch_all(&mut *self.db)
                .await?
                .into_iter()
                .map(|route| (route.route_id, route))
                .collect();

        // The foreign key guarantees a route for every order; a miss means a concurrent delete.
        Ok(orders
            .into_iter()
            .filter_map(|order| match routes.get(&order.route_id) {
                Some(route) => Some(OrderWithRouteDBResponse {
                    route: route.clone(),
                    order,
                }),
                None => {
                    warn!(order_id = order.order_id, route_id = order.route_id, "Order references missing route");
                    None
                }
            })
            .collect())
    }
}
