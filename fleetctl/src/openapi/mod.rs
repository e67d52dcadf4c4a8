//! OpenAPI documentation.
//!
//! [`ApiDoc`] covers the unauthenticated system endpoints at the root and nests
//! [`FleetApiDoc`] under `/api`. The document is served raw at `/api-docs/openapi.json` and
//! rendered with Scalar at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{api, errors::ErrorBody, kpi, types};

/// Session token schemes: the bearer header and the session cookie.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.security_schemes.insert(
            "BearerAuth".to_string(),
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Session token from `POST /api/login`:\n\n\
                        ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                    ))
                    .build(),
            ),
        );
        components.security_schemes.insert(
            "CookieAuth".to_string(),
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "fleetctl_session",
                "Session cookie set by `POST /api/login`",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::me,
        api::handlers::drivers::list_drivers,
        api::handlers::drivers::get_driver,
        api::handlers::drivers::create_driver,
        api::handlers::drivers::update_driver,
        api::handlers::drivers::delete_driver,
        api::handlers::routes::list_routes,
        api::handlers::routes::get_route,
        api::handlers::routes::create_route,
        api::handlers::routes::update_route,
        api::handlers::routes::delete_route,
        api::handlers::orders::list_orders,
        api::handlers::orders::get_order,
        api::handlers::orders::create_order,
        api::handlers::orders::update_order,
        api::handlers::orders::delete_order,
        api::handlers::dashboard::get_stats,
        api::handlers::dashboard::get_kpis,
        api::handlers::system::seed_database,
    ),
    components(schemas(
        api::models::auth::RegisterRequest,
        api::models::auth::LoginRequest,
        api::models::auth::LoginBody,
        api::models::auth::MessageResponse,
        api::models::users::Role,
        api::models::users::UserResponse,
        api::models::drivers::DriverCreate,
        api::models::drivers::DriverUpdate,
        api::models::drivers::DriverResponse,
        api::models::routes::RouteCreate,
        api::models::routes::RouteUpdate,
        api::models::routes::RouteSummary,
        api::models::routes::RouteResponse,
        api::models::orders::OrderCreate,
        api::models::orders::OrderUpdate,
        api::models::orders::OrderResponse,
        api::models::dashboard::FleetStatsResponse,
        api::models::system::SeedResponse,
        kpi::KpiSummary,
        kpi::FuelCost,
        kpi::WeeklyPoint,
        types::DriverStatus,
        types::OrderStatus,
        types::TrafficLevel,
        ErrorBody,
    )),
    tags(
        (name = "authentication", description = "Accounts and sessions"),
        (name = "drivers", description = "Driver roster"),
        (name = "routes", description = "Delivery routes and their orders"),
        (name = "orders", description = "Customer orders"),
        (name = "dashboard", description = "Fleet counts and delivery KPIs"),
    )
)]
pub struct FleetApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "fleetctl",
        description = "REST backend and KPI analytics for a delivery-fleet dashboard.\n\n\
            Reads require any signed-in user; writes require the `Manager` role."
    ),
    paths(api::handlers::system::root, api::handlers::system::health),
    components(schemas(
        api::models::system::ServiceInfo,
        api::models::system::HealthResponse,
        api::models::system::DatabaseStatus,
    )),
    nest((path = "/api", api = FleetApiDoc)),
    modifiers(&SecurityAddon),
    tags((name = "system", description = "Banner, health and demo data"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_nested_under_api() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in ["/", "/health", "/api/login", "/api/drivers/{id}", "/api/dashboard/kpis", "/api/seed"] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected} in {paths:?}");
        }
        assert!(!paths.iter().any(|p| p.as_str() == "/drivers"));
    }

    #[test]
    fn test_security_schemes_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("BearerAuth"));
        assert!(components.security_schemes.contains_key("CookieAuth"));
    }
}
