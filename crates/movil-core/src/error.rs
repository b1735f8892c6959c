//! # Error Types
//!
//! Domain-specific error types for movil-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  movil-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  movil-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  movil-engine errors                                                    │
//! │  └── EngineError      - Wraps the above + collaborator failures and     │
//! │                         classifies them for the transport adapter       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → HTTP status          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (model, amounts, ids)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::money::Money;
use crate::types::PaymentStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// These are the failures the order/payment state machine can produce on
/// well-formed input. They map to client errors at the transport layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product referenced by a sale line does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Requested quantity exceeds available stock.
    ///
    /// ## When This Occurs
    /// - The initial stock read shows too little stock, or
    /// - a concurrent sale consumed the stock between the read and the
    ///   conditional decrement (the decrement is the authoritative check)
    #[error("Insufficient stock for {model}: available {available}, requested {requested}")]
    InsufficientStock {
        model: String,
        available: i64,
        requested: i64,
    },

    /// Sale does not exist, or exists but is not owned by the caller.
    ///
    /// Deliberately a single variant: ownership failures must be
    /// indistinguishable from absence so sale ids cannot be probed.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Payment id unknown.
    #[error("Payment not found: {0}")]
    PaymentNotFound(i64),

    /// Brand id unknown.
    #[error("Brand not found: {0}")]
    BrandNotFound(i64),

    /// Product cannot be deleted because historical sales reference it.
    #[error("Product {0} is referenced by existing sales")]
    ProductInUse(i64),

    /// Brand cannot be deleted while products are assigned to it.
    #[error("Brand {0} is assigned to existing products")]
    BrandInUse(i64),

    /// Submitted voucher amount does not equal the sale total.
    #[error("Payment amount {actual} does not match sale total {expected}")]
    AmountMismatch { expected: Money, actual: Money },

    /// The payment already carries a terminal decision.
    ///
    /// Re-applying a decision would re-run its side effects (a second
    /// REJECTED would double-credit stock), so a decided payment can never
    /// be decided again.
    #[error("Payment {payment_id} is already {status:?}")]
    PaymentAlreadyDecided {
        payment_id: i64,
        status: PaymentStatus,
    },

    /// Review decision must be APPROVED or REJECTED.
    #[error("Invalid review decision: {0:?}")]
    InvalidDecision(PaymentStatus),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The external schema layer rejects malformed request shapes before the
/// engines run; these re-validate the business-level constraints that a
/// schema cannot express.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Collection has too many entries.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            model: "Galaxy A54".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Galaxy A54: available 3, requested 5"
        );

        let err = CoreError::AmountMismatch {
            expected: Money::from_cents(20_000),
            actual: Money::from_cents(19_900),
        };
        assert_eq!(
            err.to_string(),
            "Payment amount S/ 199.00 does not match sale total S/ 200.00"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "products".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
