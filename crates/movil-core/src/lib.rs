//! # movil-core: Pure Business Logic for the Movil Shop Backend
//!
//! This crate is the **heart** of the storefront backend. It contains the
//! domain types and business rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Movil Shop Data Flow                              │
//! │                                                                         │
//! │  HTTP layer (external)                                                  │
//! │       │  authenticated Actor + validated request shape                  │
//! │       ▼                                                                 │
//! │  movil-engine ── OrderEngine / PaymentEngine / CatalogEngine            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │               ★ movil-core (THIS CRATE) ★                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │    │
//! │  │   │   types   │  │   money   │  │ validation│  │   error   │   │    │
//! │  │   │  Product  │  │   Money   │  │   rules   │  │ CoreError │   │    │
//! │  │   │   Sale    │  │  (cents)  │  │  checks   │  │           │   │    │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  movil-db ── SQLite queries, migrations, repositories                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Payment, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::{
    validate_brand_name, validate_payment_amount, validate_product_fields, validate_sale_items,
    validate_upload,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale.
///
/// ## Business Reason
/// Prevents runaway orders and keeps the per-sale transaction bounded.
pub const MAX_SALE_ITEMS: usize = 50;

/// Maximum quantity of a single product in one sale.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of a product model name.
pub const MAX_MODEL_LEN: usize = 100;

/// Maximum length of a brand name.
pub const MAX_BRAND_NAME_LEN: usize = 50;
