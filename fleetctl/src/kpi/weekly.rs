//! Sources for the seven-day series shown on the dashboard trend chart.
//!
//! No per-day order history is recorded yet, so the only production source is
//! [`DemoWeeklySeries`], which fills the chart with random placeholder figures. Summaries built
//! from it are flagged via [`WeeklySeries::is_demo`].

use rand::prelude::RngExt;
use rand::rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeeklyPoint {
    pub day: String,
    pub orders: u32,
    pub revenue: u32,
}

pub trait WeeklySeries {
    /// Seven points, Monday first.
    fn weekly(&self) -> Vec<WeeklyPoint>;

    /// Whether the points are placeholders rather than recorded history.
    fn is_demo(&self) -> bool;
}

/// Random placeholder series: orders in `[10, 30)`, revenue in `[2000, 7000)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoWeeklySeries;

impl WeeklySeries for DemoWeeklySeries {
    fn weekly(&self) -> Vec<WeeklyPoint> {
        let mut rng = rng();
        WEEKDAYS
            .iter()
            .map(|day| WeeklyPoint {
                day: day.to_string(),
                orders: rng.random_range(10..30),
                revenue: rng.random_range(2000..7000),
            })
            .collect()
    }

    fn is_demo(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_series_shape_and_ranges() {
        for _ in 0..50 {
            let points = DemoWeeklySeries.weekly();
            assert_eq!(points.len(), 7);

            let days: Vec<&str> = points.iter().map(|p| p.day.as_str()).collect();
            assert_eq!(days, WEEKDAYS);

            for point in &points {
                assert!((10..30).contains(&point.orders), "orders out of range: {}", point.orders);
                assert!((2000..7000).contains(&point.revenue), "revenue out of range: {}", point.revenue);
            }
        }
        assert!(DemoWeeklySeries.is_demo());
    }
}
