//! # Payment Engine
//!
//! Voucher submission and admin review.
//!
//! ## Payment State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   submit_voucher            review_payment (admin)                      │
//! │   ──────────────            ──────────────────────                      │
//! │                                                                         │
//! │   (no row) ──┐                                                          │
//! │              ├──► PENDING ──┬──► APPROVED  ──► sale PAID                │
//! │   PENDING  ──┘   (upsert)   │                                           │
//! │   (resubmit                 └──► REJECTED  ──► stock restored,          │
//! │    overwrites                                  sale CANCELLED           │
//! │    in place)                                                            │
//! │                                                                         │
//! │   APPROVED / REJECTED are terminal. Re-deciding is a Conflict and       │
//! │   never re-runs side effects.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submission Ordering
//! The voucher upload runs after all checks pass and before the payment
//! row is written, inside the still-open transaction. A failed upload
//! rolls the transaction back, so a payment row never points at a blob
//! that was not stored.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::auth::Actor;
use crate::error::EngineResult;
use crate::object_store::{FileUpload, ObjectStore};
use movil_core::{
    validate_payment_amount, validate_upload, CoreError, Money, Payment, PaymentMethod,
    PaymentStatus, SaleStatus,
};
use movil_db::repository::payment::{PaymentOverview, PaymentRepository};
use movil_db::repository::product::ProductRepository;
use movil_db::repository::sale::SaleRepository;
use movil_db::{Database, Page, WriteTx};

/// A customer's voucher submission for one of their sales.
#[derive(Debug, Clone)]
pub struct VoucherSubmission {
    pub sale_id: String,
    /// Claimed amount. Must equal the sale total exactly.
    pub amount: Money,
    pub method: PaymentMethod,
    pub file: FileUpload,
}

/// Engine for the payment voucher lifecycle.
#[derive(Clone)]
pub struct PaymentEngine {
    db: Database,
    objects: Arc<dyn ObjectStore>,
}

impl PaymentEngine {
    pub fn new(db: Database, objects: Arc<dyn ObjectStore>) -> Self {
        PaymentEngine { db, objects }
    }

    /// Submits (or resubmits) a payment voucher for the actor's own sale.
    ///
    /// ## Arguments
    /// * `actor` - must be a CLIENT and own the sale
    /// * `submission` - sale id, claimed amount, method and voucher file
    ///
    /// ## Returns
    /// The stored payment row, status PENDING. On resubmission the same
    /// row is overwritten in place and its id preserved.
    #[instrument(skip(self, submission), fields(user_id = %actor.id, sale_id = %submission.sale_id))]
    pub async fn submit_voucher(
        &self,
        actor: &Actor,
        submission: VoucherSubmission,
    ) -> EngineResult<Payment> {
        actor.require_client()?;
        validate_upload(&submission.file.file_name, &submission.file.bytes)
            .map_err(CoreError::from)?;
        validate_payment_amount(submission.amount).map_err(CoreError::from)?;

        let mut tx = self.db.begin_write().await?;
        match self.submit_voucher_in(&mut tx, actor, submission).await {
            Ok(payment) => {
                tx.commit().await?;
                info!(payment_id = payment.id, amount = %payment.amount(), "Voucher submitted");
                Ok(payment)
            }
            Err(e) => {
                tx.rollback().await;
                Err(e)
            }
        }
    }

    /// The transactional body of [`PaymentEngine::submit_voucher`].
    async fn submit_voucher_in(
        &self,
        tx: &mut WriteTx,
        actor: &Actor,
        submission: VoucherSubmission,
    ) -> EngineResult<Payment> {
        // Foreign and nonexistent sales answer identically.
        let sale = SaleRepository::fetch_for_user(&mut *tx, &submission.sale_id, &actor.id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(submission.sale_id.clone()))?;

        if submission.amount != sale.total() {
            return Err(CoreError::AmountMismatch {
                expected: sale.total(),
                actual: submission.amount,
            }
            .into());
        }

        let key = format!(
            "vouchers/{}_{}_{}",
            sale.id,
            Utc::now().timestamp_millis(),
            submission.file.file_name
        );
        let voucher_url = self
            .objects
            .store(&key, &submission.file.bytes, &submission.file.content_type)
            .await?;

        let payment = PaymentRepository::upsert(
            &mut *tx,
            &sale.id,
            submission.amount.cents(),
            submission.method,
            &voucher_url,
            Utc::now(),
        )
        .await?;

        Ok(payment)
    }

    /// Records an admin's decision on a pending payment.
    ///
    /// APPROVED marks the sale PAID. REJECTED restores the reserved stock
    /// of every line item and marks the sale CANCELLED. Both run in one
    /// transaction with the status change.
    ///
    /// ## Arguments
    /// * `actor` - must be an ADMIN
    /// * `payment_id` - the payment under review
    /// * `decision` - APPROVED or REJECTED (PENDING is not a decision)
    #[instrument(skip(self), fields(admin_id = %actor.id))]
    pub async fn review_payment(
        &self,
        actor: &Actor,
        payment_id: i64,
        decision: PaymentStatus,
    ) -> EngineResult<Payment> {
        actor.require_admin()?;

        if decision == PaymentStatus::Pending {
            return Err(CoreError::InvalidDecision(decision).into());
        }

        let mut tx = self.db.begin_write().await?;
        match Self::review_payment_in(&mut tx, payment_id, decision).await {
            Ok(payment) => {
                tx.commit().await?;
                info!(payment_id, ?decision, sale_id = %payment.sale_id, "Payment reviewed");
                Ok(payment)
            }
            Err(e) => {
                tx.rollback().await;
                Err(e)
            }
        }
    }

    /// The transactional body of [`PaymentEngine::review_payment`].
    async fn review_payment_in(
        tx: &mut WriteTx,
        payment_id: i64,
        decision: PaymentStatus,
    ) -> EngineResult<Payment> {
        let payment = PaymentRepository::fetch(&mut *tx, payment_id)
            .await?
            .ok_or(CoreError::PaymentNotFound(payment_id))?;

        // Terminal decisions are final; re-applying one would re-run its
        // side effects.
        if payment.status != PaymentStatus::Pending {
            return Err(CoreError::PaymentAlreadyDecided {
                payment_id,
                status: payment.status,
            }
            .into());
        }

        let payment = PaymentRepository::set_status(&mut *tx, payment_id, decision).await?;

        match decision {
            PaymentStatus::Approved => {
                SaleRepository::set_status(&mut *tx, &payment.sale_id, SaleStatus::Paid).await?;
            }
            PaymentStatus::Rejected => {
                let details = SaleRepository::fetch_details(&mut *tx, &payment.sale_id).await?;
                for detail in &details {
                    ProductRepository::restore_stock(&mut *tx, detail.product_id, detail.quantity)
                        .await?;
                }
                SaleRepository::set_status(&mut *tx, &payment.sale_id, SaleStatus::Cancelled)
                    .await?;
            }
            PaymentStatus::Pending => unreachable!("rejected above"),
        }

        Ok(payment)
    }

    /// Lists payments awaiting review, newest upload first. Admin only.
    pub async fn pending_payments(
        &self,
        actor: &Actor,
        page: Page,
    ) -> EngineResult<Vec<PaymentOverview>> {
        actor.require_admin()?;
        let payments = self.db.payments().list_pending(page).await?;
        Ok(payments)
    }

    /// Lists payment history, optionally filtered by status. Admin only.
    pub async fn payment_history(
        &self,
        actor: &Actor,
        status: Option<PaymentStatus>,
        page: Page,
    ) -> EngineResult<Vec<PaymentOverview>> {
        actor.require_admin()?;
        let payments = self.db.payments().list_history(status, page).await?;
        Ok(payments)
    }
}

impl std::fmt::Debug for PaymentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentEngine").finish_non_exhaustive()
    }
}
