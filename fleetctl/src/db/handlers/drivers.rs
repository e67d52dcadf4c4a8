//! Database repository for drivers.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::drivers::{DriverCreateDBRequest, DriverDBResponse, DriverUpdateDBRequest},
};
use crate::types::DriverId;
use sqlx::PgConnection;
use tracing::instrument;

pub struct Drivers<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Drivers<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Drivers<'c> {
    type CreateRequest = DriverCreateDBRequest;
    type UpdateRequest = DriverUpdateDBRequest;
    type Response = DriverDBResponse;
    type Id = DriverId;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let driver = sqlx::query_as::<_, DriverDBResponse>(
            r#"
            INSERT INTO drivers (name, shift_hours, past_week_hours, status, rating)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(request.shift_hours)
        .bind(&request.past_week_hours)
        .bind(request.status)
        .bind(request.rating)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(driver)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let driver = sqlx::query_as::<_, DriverDBResponse>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(driver)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let drivers = sqlx::query_as::<_, DriverDBResponse>("SELECT * FROM drivers ORDER BY created_at DESC, id DESC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(drivers)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let driver = sqlx::query_as::<_, DriverDBResponse>(
            r#"
            UPDATE drivers SET
                name = COALESCE($2, name),
                shift_hours = COALESCE($3, shift_hours),
                past_week_hours = COALESCE($4, past_week_hours),
                status = COALESCE($5, status),
                rating = COALESCE($6, rating),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.shift_hours)
        .bind(&request.past_week_hours)
        .bind(request.status)
        .bind(request.rating)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DriverStatus;
    use sqlx::PgPool;

    fn driver(name: &str) -> DriverCreateDBRequest {
        DriverCreateDBRequest {
            name: name.to_string(),
            shift_hours: 8,
            past_week_hours: "8|8|8|8|8|0|0".to_string(),
            status: DriverStatus::Active,
            rating: 4.5,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_get_driver(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let created = repo.create(&driver("Amit")).await.unwrap();
        assert_eq!(created.name, "Amit");
        assert_eq!(created.status, DriverStatus::Active);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.past_week_hours, "8|8|8|8|8|0|0");
        assert!(repo.get_by_id(created.id + 1000).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_is_newest_first(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        repo.create(&driver("First")).await.unwrap();
        repo.create(&driver("Second")).await.unwrap();

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_partial_update(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let created = repo.create(&driver("Priya")).await.unwrap();
        let updated = repo
            .update(
                created.id,
                &DriverUpdateDBRequest {
                    status: Some(DriverStatus::Break),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, DriverStatus::Break);
        assert_eq!(updated.name, "Priya");
        assert_eq!(updated.rating, 4.5);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_and_delete_missing_driver(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let result = repo.update(42, &DriverUpdateDBRequest::default()).await;
        assert!(matches!(result, Err(DbError::NotFound)));
        assert!(!repo.delete(42).await.unwrap());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_malformed_week_hours_is_check_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Drivers::new(&mut conn);

        let mut bad = driver("Rohit");
        bad.past_week_hours = "8|8|8".to_string();
        let err = repo.create(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }
}
