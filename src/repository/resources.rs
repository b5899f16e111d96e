//! Resources repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::resource::{CreateResource, Resource, ResourceStatus},
};

#[derive(Clone)]
pub struct ResourcesRepository {
    pool: Pool<Sqlite>,
}

impl ResourcesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all resources
    pub async fn list(&self) -> AppResult<Vec<Resource>> {
        let resources = sqlx::query_as::<_, Resource>("SELECT * FROM resources ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(resources)
    }

    /// Get resource by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Resource> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource with id {} not found", id)))
    }

    /// Check if a resource with the given title already exists
    pub async fn title_exists(&self, title: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM resources WHERE title = ?)")
                .bind(title)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a new resource
    pub async fn create(&self, resource: &CreateResource) -> AppResult<Resource> {
        let status = resource.status.unwrap_or_default();

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO resources (title, kind, status)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&resource.title)
        .bind(resource.kind)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Set the status of a resource unconditionally (admin enable/disable)
    pub async fn set_status(&self, id: i64, status: ResourceStatus) -> AppResult<Resource> {
        let updated = sqlx::query("UPDATE resources SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Resource with id {} not found",
                id
            )));
        }

        self.get_by_id(id).await
    }
}
