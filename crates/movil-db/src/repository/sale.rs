//! # Sale Repository
//!
//! Database operations for sales and sale line items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE (one transaction, OrderEngine)                               │
//! │     └── insert sale (PENDING) + one sale_details row per item           │
//! │         + conditional stock decrement per product                       │
//! │                                                                         │
//! │  2. DECIDE (one transaction, PaymentEngine)                             │
//! │     └── payment APPROVED → sale PAID                                    │
//! │     └── payment REJECTED → stock restored, sale CANCELLED               │
//! │                                                                         │
//! │  Totals are immutable after creation; there is no recompute path.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::Page;
use movil_core::{Sale, SaleDetail, SaleStatus};

/// Payment status shown for a sale with no payment row yet.
pub const NO_PAYMENT: &str = "NO_PAYMENT";

/// A sale row with aggregate display columns, for the customer's listing.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct SaleSummary {
    pub id: String,
    pub user_id: String,
    pub total_cents: i64,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    /// Number of line items.
    pub items_count: i64,
    /// Payment status token, or [`NO_PAYMENT`] when no voucher exists yet.
    pub payment_status: String,
}

/// A sale row with buyer display fields, for the admin listing.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct AdminSaleSummary {
    pub id: String,
    pub user_id: String,
    pub total_cents: i64,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub items_count: i64,
    pub payment_status: String,
}

/// A line item joined with product and brand display fields.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct SaleDetailLine {
    pub id: i64,
    pub sale_id: String,
    pub product_id: i64,
    pub quantity: i64,
    pub price_cents: i64,
    pub subtotal_cents: i64,
    pub model: String,
    pub description: Option<String>,
    pub brand_name: Option<String>,
}

/// Filters for sale listings.
#[derive(Debug, Clone, Default)]
pub struct SaleQuery {
    pub status: Option<SaleStatus>,
    /// Admin listing only: restrict to one buyer.
    pub user_id: Option<String>,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, user_id, total_cents, status, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all line items of a sale.
    pub async fn get_details(&self, sale_id: &str) -> DbResult<Vec<SaleDetail>> {
        let details = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT id, sale_id, product_id, quantity, price_cents,
                   subtotal_cents, created_at
            FROM sale_details
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Gets the line items of a sale joined with product/brand display data.
    pub async fn get_detail_lines(&self, sale_id: &str) -> DbResult<Vec<SaleDetailLine>> {
        let lines = sqlx::query_as::<_, SaleDetailLine>(
            r#"
            SELECT sd.id, sd.sale_id, sd.product_id, sd.quantity,
                   sd.price_cents, sd.subtotal_cents,
                   p.model, p.description, b.name AS brand_name
            FROM sale_details sd
            JOIN products p ON p.id = sd.product_id
            LEFT JOIN brands b ON b.id = p.brand_id
            WHERE sd.sale_id = ?1
            ORDER BY sd.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists one user's sales with item counts and payment status.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<SaleStatus>,
        page: Page,
    ) -> DbResult<Vec<SaleSummary>> {
        debug!(user_id, page = page.page, "Listing user sales");

        let mut qb = QueryBuilder::new(
            r#"
            SELECT s.id, s.user_id, s.total_cents, s.status, s.created_at,
                   COUNT(sd.id) AS items_count,
                   COALESCE(p.status, 'NO_PAYMENT') AS payment_status
            FROM sales s
            LEFT JOIN sale_details sd ON sd.sale_id = s.id
            LEFT JOIN payments p ON p.sale_id = s.id
            WHERE s.user_id =
            "#,
        );
        qb.push_bind(user_id.to_string());
        if let Some(status) = status {
            qb.push(" AND s.status = ");
            qb.push_bind(status);
        }
        qb.push(" GROUP BY s.id, p.status ORDER BY s.created_at DESC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let sales = qb
            .build_query_as::<SaleSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists all sales with buyer display fields (admin view).
    pub async fn list_all(&self, query: &SaleQuery, page: Page) -> DbResult<Vec<AdminSaleSummary>> {
        debug!(?query, page = page.page, "Listing all sales");

        let mut qb = QueryBuilder::new(
            r#"
            SELECT s.id, s.user_id, s.total_cents, s.status, s.created_at,
                   u.username, u.full_name, u.email,
                   COUNT(sd.id) AS items_count,
                   COALESCE(p.status, 'NO_PAYMENT') AS payment_status
            FROM sales s
            JOIN users u ON u.id = s.user_id
            LEFT JOIN sale_details sd ON sd.sale_id = s.id
            LEFT JOIN payments p ON p.sale_id = s.id
            WHERE 1=1
            "#,
        );
        if let Some(status) = query.status {
            qb.push(" AND s.status = ");
            qb.push_bind(status);
        }
        if let Some(user_id) = &query.user_id {
            qb.push(" AND s.user_id = ");
            qb.push_bind(user_id.clone());
        }
        qb.push(
            " GROUP BY s.id, u.username, u.full_name, u.email, p.status \
             ORDER BY s.created_at DESC LIMIT ",
        );
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let sales = qb
            .build_query_as::<AdminSaleSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    // =========================================================================
    // Transaction-scoped building blocks
    // =========================================================================

    /// Fetches a sale inside an open transaction.
    pub async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, user_id, total_cents, status, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(sale)
    }

    /// Fetches a sale only if it belongs to the given user.
    ///
    /// Absence and foreign ownership are indistinguishable on purpose.
    pub async fn fetch_for_user(
        conn: &mut SqliteConnection,
        id: &str,
        user_id: &str,
    ) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, user_id, total_cents, status, created_at
            FROM sales
            WHERE id = ?1 AND user_id = ?2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(sale)
    }

    /// Inserts a sale row inside an open transaction.
    pub async fn insert(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total_cents = sale.total_cents, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, user_id, total_cents, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.user_id)
        .bind(sale.total_cents)
        .bind(sale.status)
        .bind(sale.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Inserts one line item and returns the stored row.
    ///
    /// ## Snapshot Pattern
    /// `price_cents` is the product price at sale time; later product edits
    /// never touch it.
    pub async fn insert_detail(
        conn: &mut SqliteConnection,
        sale_id: &str,
        product_id: i64,
        quantity: i64,
        price_cents: i64,
        created_at: DateTime<Utc>,
    ) -> DbResult<SaleDetail> {
        let detail = sqlx::query_as::<_, SaleDetail>(
            r#"
            INSERT INTO sale_details
                (sale_id, product_id, quantity, price_cents, subtotal_cents,
                 created_at)
            VALUES (?1, ?2, ?3, ?4, ?3 * ?4, ?5)
            RETURNING id, sale_id, product_id, quantity, price_cents,
                      subtotal_cents, created_at
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price_cents)
        .bind(created_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(detail)
    }

    /// Fetches line items inside an open transaction (for stock restore).
    pub async fn fetch_details(
        conn: &mut SqliteConnection,
        sale_id: &str,
    ) -> DbResult<Vec<SaleDetail>> {
        let details = sqlx::query_as::<_, SaleDetail>(
            r#"
            SELECT id, sale_id, product_id, quantity, price_cents,
                   subtotal_cents, created_at
            FROM sale_details
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(details)
    }

    /// Transitions a sale's status inside an open transaction.
    pub async fn set_status(
        conn: &mut SqliteConnection,
        sale_id: &str,
        status: SaleStatus,
    ) -> DbResult<()> {
        debug!(sale_id, ?status, "Setting sale status");

        sqlx::query("UPDATE sales SET status = ?2 WHERE id = ?1")
            .bind(sale_id)
            .bind(status)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
