//! # Product Repository
//!
//! Database operations for the phone catalog.
//!
//! ## Stock Movement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Stock Check-and-Decrement                           │
//! │                                                                         │
//! │  ❌ WRONG: read stock, compare in Rust, then write the new value.       │
//! │     Two concurrent sales can both pass the read and drive stock         │
//! │     negative.                                                           │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional update                                     │
//! │     UPDATE products SET stock = stock - ?2                              │
//! │     WHERE id = ?1 AND stock >= ?2                                       │
//! │                                                                         │
//! │  Zero rows affected means "insufficient stock (or gone)". The check     │
//! │  and the write are a single atomic statement inside the sale            │
//! │  transaction, so concurrent demand can never overdraw inventory.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{QueryBuilder, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::Page;
use movil_core::{NewProduct, Product, ProductUpdate};

/// A product row joined with its brand name, for catalog listings.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct ProductWithBrand {
    pub id: i64,
    pub model: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub brand_id: Option<i64>,
    pub brand_name: Option<String>,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

/// Filters for the catalog listing.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Restrict to one brand.
    pub brand_id: Option<i64>,
    /// Case-insensitive substring match on model or description.
    pub search: Option<String>,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, model, description, price_cents, stock, brand_id,
                   image_url, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product joined with its brand name.
    pub async fn get_with_brand(&self, id: i64) -> DbResult<Option<ProductWithBrand>> {
        let product = sqlx::query_as::<_, ProductWithBrand>(
            r#"
            SELECT p.id, p.model, p.description, p.price_cents, p.stock,
                   p.brand_id, b.name AS brand_name, p.image_url,
                   p.created_at, p.updated_at
            FROM products p
            LEFT JOIN brands b ON b.id = p.brand_id
            WHERE p.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products with brand names, newest first.
    ///
    /// ## Arguments
    /// * `query` - optional brand and substring filters
    /// * `page` - pagination
    ///
    /// ## Returns
    /// The page of rows plus the total row count for the same filters.
    pub async fn list(
        &self,
        query: &ProductQuery,
        page: Page,
    ) -> DbResult<(Vec<ProductWithBrand>, i64)> {
        debug!(?query, page = page.page, "Listing products");

        let mut qb = QueryBuilder::new(
            r#"
            SELECT p.id, p.model, p.description, p.price_cents, p.stock,
                   p.brand_id, b.name AS brand_name, p.image_url,
                   p.created_at, p.updated_at
            FROM products p
            LEFT JOIN brands b ON b.id = p.brand_id
            WHERE 1=1
            "#,
        );
        push_filters(&mut qb, query);
        qb.push(" ORDER BY p.created_at DESC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let products = qb
            .build_query_as::<ProductWithBrand>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_qb =
            QueryBuilder::new("SELECT COUNT(*) FROM products p WHERE 1=1");
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((products, total))
    }

    /// Inserts a new product and returns the stored row.
    pub async fn insert(
        &self,
        new: &NewProduct,
        image_url: Option<&str>,
    ) -> DbResult<Product> {
        debug!(model = %new.model, "Inserting product");

        let now = Utc::now();

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (model, description, price_cents, stock, brand_id, image_url,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING id, model, description, price_cents, stock, brand_id,
                      image_url, created_at, updated_at
            "#,
        )
        .bind(&new.model)
        .bind(&new.description)
        .bind(new.price_cents)
        .bind(new.stock)
        .bind(new.brand_id)
        .bind(image_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Replaces a product's mutable fields and returns the stored row.
    ///
    /// `image_url` is the full new value (callers decide whether to keep
    /// the old reference or swap in a fresh upload).
    pub async fn update(
        &self,
        id: i64,
        update: &ProductUpdate,
        image_url: Option<&str>,
    ) -> DbResult<Product> {
        debug!(id, "Updating product");

        let now = Utc::now();

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                model = ?2,
                description = ?3,
                price_cents = ?4,
                stock = ?5,
                brand_id = ?6,
                image_url = ?7,
                updated_at = ?8
            WHERE id = ?1
            RETURNING id, model, description, price_cents, stock, brand_id,
                      image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.model)
        .bind(&update.description)
        .bind(update.price_cents)
        .bind(update.stock)
        .bind(update.brand_id)
        .bind(image_url)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        Ok(product)
    }

    /// Deletes a product row.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Checks whether any sale line references the product.
    ///
    /// Historical sales keep their snapshots, so a referenced product must
    /// not be deleted.
    pub async fn is_referenced(&self, id: i64) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sale_details WHERE product_id = ?1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped building blocks
    // =========================================================================

    /// Fetches a product inside an open transaction.
    pub async fn fetch(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, model, description, price_cents, stock, brand_id,
                   image_url, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Atomically decrements stock if enough is available.
    ///
    /// ## Returns
    /// * `Ok(true)` - stock was decremented
    /// * `Ok(false)` - not enough stock (or product vanished); nothing changed
    ///
    /// This single conditional statement is the serialization point for
    /// concurrent sales of the same product.
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        id: i64,
        quantity: i64,
    ) -> DbResult<bool> {
        debug!(id, quantity, "Decrementing stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Adds rejected-sale quantities back onto stock.
    pub async fn restore_stock(
        conn: &mut SqliteConnection,
        id: i64,
        quantity: i64,
    ) -> DbResult<()> {
        debug!(id, quantity, "Restoring stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Appends the shared WHERE clauses for [`ProductQuery`] filters.
fn push_filters<'a>(qb: &mut QueryBuilder<'a, sqlx::Sqlite>, query: &'a ProductQuery) {
    if let Some(brand_id) = query.brand_id {
        qb.push(" AND p.brand_id = ");
        qb.push_bind(brand_id);
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (p.model LIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.description LIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}
