//! # Engine Error Types
//!
//! The engine error wraps every failure the state machine can produce and
//! classifies it for the transport adapter.
//!
//! ## Separation of Taxonomy and Transport
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EngineError (typed)  ──kind()──►  ErrorKind  ──(external adapter)──►   │
//! │                                                    HTTP status          │
//! │                                                                         │
//! │  NotFound    → 404        Validation → 400                              │
//! │  Conflict    → 409        Forbidden  → 403                              │
//! │  Server     → 500 (generic message only; detail stays in the logs)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engines never see a status code; the HTTP layer never matches on
//! error variants.

use thiserror::Error;

use crate::object_store::ObjectStoreError;
use movil_core::{CoreError, Role};
use movil_db::DbError;

/// Transport-neutral classification of an engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced entity absent or not owned by the caller.
    NotFound,
    /// Business-rule violation (insufficient stock, amount mismatch, ...).
    Validation,
    /// State or uniqueness conflict (already-decided payment, duplicate
    /// brand name).
    Conflict,
    /// Caller's role does not permit the operation.
    Forbidden,
    /// Store or collaborator failure; safe to retry the whole operation.
    Server,
}

/// Errors produced by the order/payment/catalog engines.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Business rule violation from the core domain.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Caller lacks the required role.
    #[error("Operation requires {required:?} role")]
    Forbidden { required: Role },

    /// Transactional store failure.
    #[error(transparent)]
    Store(#[from] DbError),

    /// Object-store collaborator failure.
    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),
}

impl EngineError {
    /// Classifies the error for the transport adapter.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Core(core) => match core {
                CoreError::ProductNotFound(_)
                | CoreError::SaleNotFound(_)
                | CoreError::PaymentNotFound(_)
                | CoreError::BrandNotFound(_) => ErrorKind::NotFound,

                CoreError::InsufficientStock { .. }
                | CoreError::AmountMismatch { .. }
                | CoreError::InvalidDecision(_)
                | CoreError::Validation(_) => ErrorKind::Validation,

                CoreError::PaymentAlreadyDecided { .. }
                | CoreError::ProductInUse(_)
                | CoreError::BrandInUse(_) => ErrorKind::Conflict,
            },

            EngineError::Forbidden { .. } => ErrorKind::Forbidden,

            EngineError::Store(db) => match db {
                DbError::NotFound { .. } => ErrorKind::NotFound,
                DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                    ErrorKind::Conflict
                }
                _ => ErrorKind::Server,
            },

            EngineError::ObjectStore(_) => ErrorKind::Server,
        }
    }

    /// Message safe to show a client.
    ///
    /// Server-kind failures collapse to a generic message; the real detail
    /// is logged server-side only.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Server => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use movil_core::{Money, PaymentStatus};

    #[test]
    fn test_kind_classification() {
        let err: EngineError = CoreError::SaleNotFound("abc".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: EngineError = CoreError::AmountMismatch {
            expected: Money::from_cents(100),
            actual: Money::from_cents(99),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: EngineError = CoreError::PaymentAlreadyDecided {
            payment_id: 1,
            status: PaymentStatus::Approved,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = EngineError::Forbidden {
            required: Role::Admin,
        };
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err: EngineError = DbError::PoolExhausted.into();
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_server_detail_does_not_leak() {
        let err: EngineError =
            DbError::QueryFailed("secret table detail".to_string()).into();
        assert_eq!(err.public_message(), "Internal server error");

        let err: EngineError = CoreError::ProductNotFound(7).into();
        assert_eq!(err.public_message(), "Product not found: 7");
    }
}
