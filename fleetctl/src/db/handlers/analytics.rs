//! Dashboard aggregate queries.

use crate::db::{errors::Result, models::analytics::FleetCounts};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Analytics<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Analytics<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Fleet-wide counts and revenue in one round-trip.
    #[instrument(skip(self), err)]
    pub async fn fleet_stats(&mut self) -> Result<FleetCounts> {
        let counts = sqlx::query_as::<_, FleetCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM drivers) AS total_drivers,
                (SELECT COUNT(*) FROM drivers WHERE status = 'Active') AS active_drivers,
                (SELECT COUNT(*) FROM orders) AS total_orders,
                (SELECT COUNT(*) FROM orders WHERE status = 'Delivered') AS delivered_orders,
                (SELECT COUNT(*) FROM routes) AS total_routes,
                (SELECT COALESCE(SUM(value_rs), 0)::DOUBLE PRECISION FROM orders) AS total_revenue
            "#,
        )
        .fetch_one(&mut *self.db)
        .await?;

        Ok(counts)
    }
}
