//! Bundled demo dataset: ten drivers, ten routes and ten orders.
//!
//! Loaded on first startup when the database has no routes, and again on demand through
//! `POST /api/seed`. User accounts are never touched.

use crate::db::{
    errors::Result,
    handlers::{Drivers, Orders, Repository, Routes},
    models::{drivers::DriverCreateDBRequest, orders::OrderCreateDBRequest, routes::RouteCreateDBRequest},
};
use crate::types::{DriverStatus, OrderStatus, TrafficLevel};
use sqlx::PgConnection;
use tracing::{info, instrument};

/// Row counts inserted by a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub drivers: usize,
    pub routes: usize,
    pub orders: usize,
}

// (name, shift hours, past week hours, status, rating)
const DRIVERS: [(&str, i32, &str, DriverStatus, f64); 10] = [
    ("Amit", 6, "6|8|7|7|7|6|10", DriverStatus::Active, 4.8),
    ("Priya", 6, "10|9|6|6|6|7|7", DriverStatus::Active, 4.9),
    ("Rohit", 10, "10|6|10|7|10|9|7", DriverStatus::Break, 4.7),
    ("Neha", 9, "10|8|6|7|9|8|8", DriverStatus::Active, 4.8),
    ("Karan", 7, "7|8|6|6|9|6|8", DriverStatus::Offline, 4.6),
    ("Sneha", 8, "10|8|6|9|10|6|9", DriverStatus::Active, 4.9),
    ("Vikram", 6, "10|8|10|8|10|7|6", DriverStatus::Active, 4.7),
    ("Anjali", 6, "7|8|6|7|6|9|8", DriverStatus::Break, 4.8),
    ("Manoj", 9, "8|7|8|8|7|8|6", DriverStatus::Active, 4.5),
    ("Pooja", 10, "7|10|7|7|9|9|8", DriverStatus::Active, 4.9),
];

// (route id, distance km, traffic, base minutes, popularity)
const ROUTES: [(i32, f64, TrafficLevel, i32, f64); 10] = [
    (1, 25.0, TrafficLevel::High, 125, 85.0),
    (2, 12.0, TrafficLevel::High, 48, 92.0),
    (3, 6.0, TrafficLevel::Low, 18, 78.0),
    (4, 15.0, TrafficLevel::Medium, 60, 88.0),
    (5, 7.0, TrafficLevel::Low, 35, 75.0),
    (6, 15.0, TrafficLevel::Low, 75, 82.0),
    (7, 20.0, TrafficLevel::Medium, 100, 90.0),
    (8, 19.0, TrafficLevel::Low, 76, 77.0),
    (9, 9.0, TrafficLevel::Low, 45, 85.0),
    (10, 22.0, TrafficLevel::High, 88, 79.0),
];

// (order id, value, route id, delivery time, status, customer)
const ORDERS: [(i32, f64, i32, &str, OrderStatus, &str); 10] = [
    (1, 2594.0, 7, "02:07", OrderStatus::Delivered, "Raj Kumar"),
    (2, 1835.0, 6, "01:19", OrderStatus::Delivered, "Anjali Sharma"),
    (3, 766.0, 9, "01:06", OrderStatus::Delivered, "Vikram Singh"),
    (4, 572.0, 1, "02:02", OrderStatus::Delayed, "Priya Patel"),
    (5, 826.0, 3, "00:35", OrderStatus::Delivered, "Rohit Gupta"),
    (6, 2642.0, 2, "01:02", OrderStatus::Delivered, "Neha Agarwal"),
    (7, 1200.0, 4, "01:15", OrderStatus::InTransit, "Amit Joshi"),
    (8, 950.0, 5, "00:45", OrderStatus::Delivered, "Sneha Reddy"),
    (9, 1800.0, 8, "01:30", OrderStatus::Delivered, "Karan Mehta"),
    (10, 650.0, 10, "02:15", OrderStatus::Delayed, "Pooja Nair"),
];

pub fn demo_drivers() -> impl Iterator<Item = DriverCreateDBRequest> {
    DRIVERS.iter().map(|&(name, shift_hours, past_week_hours, status, rating)| DriverCreateDBRequest {
        name: name.to_string(),
        shift_hours,
        past_week_hours: past_week_hours.to_string(),
        status,
        rating,
    })
}

pub fn demo_routes() -> impl Iterator<Item = RouteCreateDBRequest> {
    ROUTES
        .iter()
        .map(|&(route_id, distance_km, traffic_level, base_time_min, popularity)| RouteCreateDBRequest {
            route_id,
            distance_km,
            traffic_level,
            base_time_min,
            popularity,
        })
}

pub fn demo_orders() -> impl Iterator<Item = OrderCreateDBRequest> {
    ORDERS
        .iter()
        .map(|&(order_id, value_rs, route_id, delivery_time, status, customer)| OrderCreateDBRequest {
            order_id,
            value_rs,
            route_id,
            delivery_time: delivery_time.to_string(),
            status,
            customer: customer.to_string(),
        })
}

/// Insert the demo dataset. Routes go in before the orders that reference them.
///
/// Call inside a transaction so a failure leaves nothing behind.
#[instrument(skip_all, err)]
pub async fn load_demo_data(conn: &mut PgConnection) -> Result<SeedCounts> {
    let mut counts = SeedCounts {
        drivers: 0,
        routes: 0,
        orders: 0,
    };

    let mut drivers = Drivers::new(&mut *conn);
    for driver in demo_drivers() {
        drivers.create(&driver).await?;
        counts.drivers += 1;
    }

    let mut routes = Routes::new(&mut *conn);
    for route in demo_routes() {
        routes.create(&route).await?;
        counts.routes += 1;
    }

    let mut orders = Orders::new(&mut *conn);
    for order in demo_orders() {
        orders.create(&order).await?;
        counts.orders += 1;
    }

    info!(drivers = counts.drivers, routes = counts.routes, orders = counts.orders, "Loaded demo data");
    Ok(counts)
}

/// Wipe orders, routes and drivers, then load the demo dataset.
#[instrument(skip_all, err)]
pub async fn reseed(conn: &mut PgConnection) -> Result<SeedCounts> {
    sqlx::query("DELETE FROM orders").execute(&mut *conn).await?;
    sqlx::query("DELETE FROM routes").execute(&mut *conn).await?;
    sqlx::query("DELETE FROM drivers").execute(&mut *conn).await?;

    load_demo_data(conn).await
}

/// Whether the fleet tables hold no routes yet.
#[instrument(skip_all, err)]
pub async fn is_empty(conn: &mut PgConnection) -> Result<bool> {
    let has_routes = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM routes)")
        .fetch_one(&mut *conn)
        .await?;

    Ok(!has_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::DeliveryDuration;
    use sqlx::PgPool;

    #[test]
    fn test_demo_orders_reference_demo_routes() {
        let route_ids: Vec<i32> = demo_routes().map(|r| r.route_id).collect();
        for order in demo_orders() {
            assert!(route_ids.contains(&order.route_id), "order {} has no route", order.order_id);
            assert!(DeliveryDuration::parse(&order.delivery_time).is_ok());
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reseed_replaces_fleet_data(pool: PgPool) {
        let mut tx = pool.begin().await.unwrap();
        assert!(is_empty(&mut tx).await.unwrap());

        let first = reseed(&mut tx).await.unwrap();
        assert_eq!(
            first,
            SeedCounts {
                drivers: 10,
                routes: 10,
                orders: 10
            }
        );

        // A second run must not trip over the unique route and order IDs.
        reseed(&mut tx).await.unwrap();
        tx.commit().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert!(!is_empty(&mut conn).await.unwrap());
        assert_eq!(Drivers::new(&mut conn).list().await.unwrap().len(), 10);
        assert_eq!(Orders::new(&mut conn).list().await.unwrap().len(), 10);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_reseed_keeps_users(pool: PgPool) {
        let user = crate::test_utils::create_test_user(&pool, crate::api::models::users::Role::User).await;

        let mut tx = pool.begin().await.unwrap();
        reseed(&mut tx).await.unwrap();
        tx.commit().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        assert!(crate::db::handlers::Users::new(&mut conn).get_by_id(user.id).await.unwrap().is_some());
    }
}
