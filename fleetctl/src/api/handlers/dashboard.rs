//! Dashboard figures: headline counts and delivery KPIs.

use axum::{extract::State, response::Json};

use crate::{
    AppState,
    api::models::{dashboard::FleetStatsResponse, users::CurrentUser},
    db::handlers::{Analytics, Routes},
    errors::{Error, Result},
    kpi::{DemoWeeklySeries, KpiAggregator, KpiRoute, KpiSummary},
};

#[utoipa::path(
    get,
    path = "/dashboard/stats",
    tag = "dashboard",
    summary = "Fleet counts",
    description = "Driver, order and route counts, total order value, and the share of delivered orders",
    responses(
        (status = 200, description = "Fleet counts", body = FleetStatsResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_stats(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<FleetStatsResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let counts = Analytics::new(&mut conn).fleet_stats().await?;

    Ok(Json(FleetStatsResponse::from(counts)))
}

/// Computes the KPI summary over every route and its orders.
///
/// Fuel cost attribution follows `kpi.fuel_cost_policy`. The weekly trend is placeholder data
/// and is flagged as such in the response.
#[utoipa::path(
    get,
    path = "/dashboard/kpis",
    tag = "dashboard",
    summary = "Delivery KPIs",
    responses(
        (status = 200, description = "KPI summary", body = KpiSummary),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Stored order data could not be aggregated"),
    ),
    security(("BearerAuth" = []), ("CookieAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_kpis(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<KpiSummary>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let routes: Vec<KpiRoute> = Routes::new(&mut conn).list_with_orders().await?.iter().map(KpiRoute::from).collect();

    let summary = KpiAggregator::new(state.config.kpi.fuel_cost_policy).aggregate(&routes, &DemoWeeklySeries)?;

    Ok(Json(summary.rounded()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::kpi::FuelCostPolicy;
    use crate::test_utils::{auth_header, create_test_app, create_test_app_with_config, create_test_config, create_test_user};
    use axum::http::StatusCode;
    use sqlx::PgPool;

    async fn seed(pool: &PgPool) {
        let mut tx = pool.begin().await.unwrap();
        crate::seed::reseed(&mut tx).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_stats_over_demo_data(pool: PgPool) {
        seed(&pool).await;
        let server = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, Role::User).await;
        let (name, value) = auth_header(&user);

        let response = server.get("/api/dashboard/stats").add_header(&name, &value).await;
        response.assert_status_ok();
        let stats: FleetStatsResponse = response.json();
        assert_eq!(stats.total_drivers, 10);
        assert_eq!(stats.active_drivers, 7);
        assert_eq!(stats.total_orders, 10);
        assert_eq!(stats.delivered_orders, 7);
        assert_eq!(stats.total_routes, 10);
        assert_eq!(stats.total_revenue, 13835.0);
        assert_eq!(stats.efficiency, 70.0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_kpis_over_demo_data(pool: PgPool) {
        seed(&pool).await;
        let server = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, Role::User).await;
        let (name, value) = auth_header(&user);

        let response = server.get("/api/dashboard/kpis").add_header(&name, &value).await;
        response.assert_status_ok();
        let summary: serde_json::Value = response.json();
        assert_eq!(summary["totalOrders"], 10);
        assert_eq!(summary["onTime"], 3);
        assert_eq!(summary["late"], 7);
        assert_eq!(summary["efficiency"], 30.0);
        assert_eq!(summary["averageOrderValue"], 1383.5);
        // 12800.5 before rounding
        assert_eq!(summary["totalProfit"], 12801.0);
        assert_eq!(summary["fuelCostBreakdown"].as_array().unwrap().len(), 10);
        assert_eq!(summary["fuelCostBreakdown"][0]["name"], "Route 1");
        assert_eq!(summary["fuelCostBreakdown"][0]["cost"], 175.0);
        assert_eq!(summary["weeklyData"].as_array().unwrap().len(), 7);
        assert_eq!(summary["weeklyDataIsDemo"], true);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_kpis_empty_fleet(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, Role::User).await;
        let (name, value) = auth_header(&user);

        let response = server.get("/api/dashboard/kpis").add_header(&name, &value).await;
        response.assert_status_ok();
        let summary: serde_json::Value = response.json();
        assert_eq!(summary["totalOrders"], 0);
        assert_eq!(summary["efficiency"], 0.0);
        assert!(summary["fuelCostBreakdown"].as_array().unwrap().is_empty());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_per_route_fuel_policy(pool: PgPool) {
        seed(&pool).await;
        let mut config = create_test_config();
        config.kpi.fuel_cost_policy = FuelCostPolicy::PerRoute;
        let server = create_test_app_with_config(pool.clone(), config).await;
        let user = create_test_user(&pool, Role::User).await;
        let (name, value) = auth_header(&user);

        let response = server.get("/api/dashboard/kpis").add_header(&name, &value).await;
        response.assert_status_ok();
        let summary: serde_json::Value = response.json();
        // every demo route carries exactly one order
        assert_eq!(summary["fuelCostBreakdown"].as_array().unwrap().len(), 10);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_malformed_delivery_time_is_server_error(pool: PgPool) {
        seed(&pool).await;
        sqlx::query("ALTER TABLE orders DROP CONSTRAINT IF EXISTS orders_delivery_time_check")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE orders SET delivery_time = 'soon' WHERE order_id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let server = create_test_app(pool.clone()).await;
        let user = create_test_user(&pool, Role::User).await;
        let (name, value) = auth_header(&user);

        let response = server.get("/api/dashboard/kpis").add_header(&name, &value).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<serde_json::Value>()["message"], "Failed to compute KPIs");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_dashboard_requires_authentication(pool: PgPool) {
        let server = create_test_app(pool).await;

        server.get("/api/dashboard/stats").await.assert_status(StatusCode::UNAUTHORIZED);
        server.get("/api/dashboard/kpis").await.assert_status(StatusCode::UNAUTHORIZED);
    }
}
