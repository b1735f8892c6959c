//! # Brand Repository
//!
//! CRUD for the brand catalog. Brand names are unique; the UNIQUE index
//! surfaces as [`DbError::UniqueViolation`] and becomes a Conflict at the
//! transport boundary.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use movil_core::Brand;

/// Repository for brand database operations.
#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    /// Creates a new BrandRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BrandRepository { pool }
    }

    /// Lists all brands, alphabetically.
    pub async fn list(&self) -> DbResult<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT id, name, created_at FROM brands ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(brands)
    }

    /// Gets a brand by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name, created_at FROM brands WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(brand)
    }

    /// Inserts a new brand and returns the stored row.
    pub async fn insert(&self, name: &str) -> DbResult<Brand> {
        debug!(name, "Inserting brand");

        let now = Utc::now();

        let brand = sqlx::query_as::<_, Brand>(
            r#"
            INSERT INTO brands (name, created_at)
            VALUES (?1, ?2)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(brand)
    }

    /// Renames a brand.
    pub async fn update(&self, id: i64, name: &str) -> DbResult<Brand> {
        debug!(id, name, "Updating brand");

        let brand = sqlx::query_as::<_, Brand>(
            r#"
            UPDATE brands SET name = ?2
            WHERE id = ?1
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Brand", id))?;

        Ok(brand)
    }

    /// Deletes a brand row.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM brands WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", id));
        }

        Ok(())
    }

    /// Checks whether any product references the brand.
    pub async fn is_referenced(&self, id: i64) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE brand_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }
}
