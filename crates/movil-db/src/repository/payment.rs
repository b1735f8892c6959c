//! # Payment Repository
//!
//! Database operations for payment vouchers.
//!
//! ## One Payment Per Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  payments.sale_id is UNIQUE. A resubmitted voucher does NOT create a    │
//! │  second row: the upsert overwrites amount/method/voucher_url in place   │
//! │  and resets status to PENDING with a fresh uploaded_at. Concurrent      │
//! │  submissions for the same sale serialize on the same constraint.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::repository::Page;
use movil_core::{Payment, PaymentMethod, PaymentStatus};

/// A payment row joined with sale and buyer display fields, for the admin
/// review screens.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct PaymentOverview {
    pub id: i64,
    pub sale_id: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub voucher_url: String,
    pub status: PaymentStatus,
    pub uploaded_at: DateTime<Utc>,
    pub sale_total_cents: i64,
    pub sale_date: DateTime<Utc>,
    pub username: String,
    pub full_name: String,
    pub email: String,
}

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Gets a payment by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, amount_cents, method, voucher_url, status,
                   uploaded_at
            FROM payments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Gets the payment for a sale, if one exists.
    pub async fn get_by_sale(&self, sale_id: &str) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, amount_cents, method, voucher_url, status,
                   uploaded_at
            FROM payments
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Lists PENDING payments for review, newest upload first.
    pub async fn list_pending(&self, page: Page) -> DbResult<Vec<PaymentOverview>> {
        debug!(page = page.page, "Listing pending payments");

        let payments = sqlx::query_as::<_, PaymentOverview>(
            r#"
            SELECT p.id, p.sale_id, p.amount_cents, p.method, p.voucher_url,
                   p.status, p.uploaded_at,
                   s.total_cents AS sale_total_cents,
                   s.created_at AS sale_date,
                   u.username, u.full_name, u.email
            FROM payments p
            JOIN sales s ON s.id = p.sale_id
            JOIN users u ON u.id = s.user_id
            WHERE p.status = 'PENDING'
            ORDER BY p.uploaded_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Lists payment history, optionally filtered by status.
    pub async fn list_history(
        &self,
        status: Option<PaymentStatus>,
        page: Page,
    ) -> DbResult<Vec<PaymentOverview>> {
        debug!(?status, page = page.page, "Listing payment history");

        let mut qb = QueryBuilder::new(
            r#"
            SELECT p.id, p.sale_id, p.amount_cents, p.method, p.voucher_url,
                   p.status, p.uploaded_at,
                   s.total_cents AS sale_total_cents,
                   s.created_at AS sale_date,
                   u.username, u.full_name, u.email
            FROM payments p
            JOIN sales s ON s.id = p.sale_id
            JOIN users u ON u.id = s.user_id
            WHERE 1=1
            "#,
        );
        if let Some(status) = status {
            qb.push(" AND p.status = ");
            qb.push_bind(status);
        }
        qb.push(" ORDER BY p.uploaded_at DESC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let payments = qb
            .build_query_as::<PaymentOverview>()
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }

    /// Counts the payment rows for a sale (0 or 1 by construction).
    pub async fn count_for_sale(&self, sale_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction-scoped building blocks
    // =========================================================================

    /// Fetches a payment inside an open transaction.
    pub async fn fetch(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, amount_cents, method, voucher_url, status,
                   uploaded_at
            FROM payments
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(payment)
    }

    /// Inserts or overwrites the payment for a sale.
    ///
    /// On conflict with the `sale_id` UNIQUE constraint, the existing row
    /// is updated in place and its status reset to PENDING. The row id is
    /// preserved, so a resubmission never changes the payment's identity.
    pub async fn upsert(
        conn: &mut SqliteConnection,
        sale_id: &str,
        amount_cents: i64,
        method: PaymentMethod,
        voucher_url: &str,
        uploaded_at: DateTime<Utc>,
    ) -> DbResult<Payment> {
        debug!(sale_id, amount_cents, "Upserting payment");

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments
                (sale_id, amount_cents, method, voucher_url, status,
                 uploaded_at)
            VALUES (?1, ?2, ?3, ?4, 'PENDING', ?5)
            ON CONFLICT(sale_id) DO UPDATE SET
                amount_cents = excluded.amount_cents,
                method = excluded.method,
                voucher_url = excluded.voucher_url,
                status = 'PENDING',
                uploaded_at = excluded.uploaded_at
            RETURNING id, sale_id, amount_cents, method, voucher_url, status,
                      uploaded_at
            "#,
        )
        .bind(sale_id)
        .bind(amount_cents)
        .bind(method)
        .bind(voucher_url)
        .bind(uploaded_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(payment)
    }

    /// Records the review decision and returns the updated row.
    pub async fn set_status(
        conn: &mut SqliteConnection,
        id: i64,
        status: PaymentStatus,
    ) -> DbResult<Payment> {
        debug!(id, ?status, "Setting payment status");

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET status = ?2
            WHERE id = ?1
            RETURNING id, sale_id, amount_cents, method, voucher_url, status,
                      uploaded_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;

        Ok(payment)
    }
}
