//! # Order Engine
//!
//! Sale creation and sale reads.
//!
//! ## Sale Creation Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale(actor, items)                                              │
//! │                                                                         │
//! │  BEGIN IMMEDIATE (write lock held; concurrent writers queue here)       │
//! │    for each item:                                                       │
//! │      fetch product          ── missing          → ProductNotFound       │
//! │      check stock            ── short            → InsufficientStock     │
//! │      snapshot price, accumulate total                                   │
//! │    insert sale (PENDING) + one detail row per item                      │
//! │    for each item:                                                       │
//! │      conditional decrement  ── 0 rows affected  → InsufficientStock     │
//! │  COMMIT, or ROLLBACK on any error: no sale, no details, no stock        │
//! │  movement.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The immediate-mode transaction serializes sale creation: a concurrent
//! writer waits on the write lock and then reads the committed stock, so
//! the loser of a stock race fails the in-transaction check with
//! [`CoreError::InsufficientStock`] rather than a locked-database error.
//! The conditional decrement backstops the check at the statement level.

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::Actor;
use crate::error::EngineResult;
use movil_core::{
    validate_sale_items, CoreError, Money, Sale, SaleDetail, SaleItemRequest, SaleStatus,
};
use movil_db::repository::product::ProductRepository;
use movil_db::repository::sale::{
    AdminSaleSummary, SaleDetailLine, SaleQuery, SaleRepository, SaleSummary,
};
use movil_db::{Database, Page, WriteTx};

/// Result of a successful sale creation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CreatedSale {
    pub sale: Sale,
    pub items: Vec<SaleDetail>,
}

/// A full sale view: header, line items with display fields, and the
/// payment if one exists.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SaleView {
    pub sale: Sale,
    pub items: Vec<SaleDetailLine>,
    pub payment: Option<movil_core::Payment>,
}

/// Engine for sale creation and sale reads.
#[derive(Debug, Clone)]
pub struct OrderEngine {
    db: Database,
}

impl OrderEngine {
    pub fn new(db: Database) -> Self {
        OrderEngine { db }
    }

    /// Creates a sale for the acting customer.
    ///
    /// ## Arguments
    /// * `actor` - must be a CLIENT; the sale is created under their id
    /// * `items` - requested product/quantity pairs, deduplicated upstream
    ///
    /// ## Returns
    /// The stored sale header (status PENDING) and its line items.
    #[instrument(skip(self, items), fields(user_id = %actor.id, items = items.len()))]
    pub async fn create_sale(
        &self,
        actor: &Actor,
        items: &[SaleItemRequest],
    ) -> EngineResult<CreatedSale> {
        actor.require_client()?;
        validate_sale_items(items).map_err(CoreError::from)?;

        let mut tx = self.db.begin_write().await?;
        match Self::create_sale_in(&mut tx, actor, items).await {
            Ok(created) => {
                tx.commit().await?;
                info!(
                    sale_id = %created.sale.id,
                    total = %created.sale.total(),
                    "Sale created"
                );
                Ok(created)
            }
            Err(e) => {
                tx.rollback().await;
                Err(e)
            }
        }
    }

    /// The transactional body of [`OrderEngine::create_sale`].
    async fn create_sale_in(
        tx: &mut WriteTx,
        actor: &Actor,
        items: &[SaleItemRequest],
    ) -> EngineResult<CreatedSale> {
        // Pass 1: load every product, verify stock, snapshot prices.
        let mut lines: Vec<(i64, i64, Money)> = Vec::with_capacity(items.len());
        let mut total = Money::zero();

        for item in items {
            let product = ProductRepository::fetch(&mut *tx, item.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound(item.product_id))?;

            if !product.can_sell(item.quantity) {
                return Err(CoreError::InsufficientStock {
                    model: product.model,
                    available: product.stock,
                    requested: item.quantity,
                }
                .into());
            }

            total += product.price().multiply_quantity(item.quantity);
            lines.push((product.id, item.quantity, product.price()));
        }

        // Pass 2: persist the sale, its lines, and the stock movement.
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            user_id: actor.id.clone(),
            total_cents: total.cents(),
            status: SaleStatus::Pending,
            created_at: now,
        };

        SaleRepository::insert(&mut *tx, &sale).await?;

        let mut details = Vec::with_capacity(lines.len());
        for (product_id, quantity, price) in &lines {
            let detail = SaleRepository::insert_detail(
                &mut *tx,
                &sale.id,
                *product_id,
                *quantity,
                price.cents(),
                now,
            )
            .await?;
            details.push(detail);

            // Statement-level backstop for the pass-1 check.
            let decremented =
                ProductRepository::decrement_stock(&mut *tx, *product_id, *quantity).await?;
            if !decremented {
                let product = ProductRepository::fetch(&mut *tx, *product_id)
                    .await?
                    .ok_or(CoreError::ProductNotFound(*product_id))?;
                warn!(product_id, "Conditional stock decrement refused");
                return Err(CoreError::InsufficientStock {
                    model: product.model,
                    available: product.stock,
                    requested: *quantity,
                }
                .into());
            }
        }

        Ok(CreatedSale {
            sale,
            items: details,
        })
    }

    /// Lists the acting customer's own sales.
    pub async fn user_sales(
        &self,
        actor: &Actor,
        status: Option<SaleStatus>,
        page: Page,
    ) -> EngineResult<Vec<SaleSummary>> {
        let sales = self
            .db
            .sales()
            .list_for_user(&actor.id, status, page)
            .await?;
        Ok(sales)
    }

    /// Gets one sale with its line items and payment.
    ///
    /// Clients only see their own sales; a foreign sale id answers exactly
    /// like a nonexistent one. Admins see every sale.
    pub async fn sale_details(&self, actor: &Actor, sale_id: &str) -> EngineResult<SaleView> {
        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .filter(|s| actor.is_admin() || s.user_id == actor.id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        let items = self.db.sales().get_detail_lines(sale_id).await?;
        let payment = self.db.payments().get_by_sale(sale_id).await?;

        Ok(SaleView {
            sale,
            items,
            payment,
        })
    }

    /// Lists all sales with buyer display fields. Admin only.
    pub async fn all_sales(
        &self,
        actor: &Actor,
        query: &SaleQuery,
        page: Page,
    ) -> EngineResult<Vec<AdminSaleSummary>> {
        actor.require_admin()?;
        let sales = self.db.sales().list_all(query, page).await?;
        Ok(sales)
    }
}
