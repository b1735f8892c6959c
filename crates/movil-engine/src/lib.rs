//! # movil-engine: Order & Payment State Machine
//!
//! The transactional core of the storefront backend: sale creation with
//! atomic stock reservation, the payment voucher lifecycle, and catalog
//! administration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Movil Shop Backend                                 │
//! │                                                                         │
//! │  HTTP transport (outside this workspace)                                │
//! │       │  verified Actor + validated request                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   movil-engine (THIS CRATE)                     │    │
//! │  │                                                                 │    │
//! │  │   OrderEngine        PaymentEngine        CatalogEngine         │    │
//! │  │   create_sale        submit_voucher       brand/product CRUD    │    │
//! │  │   sale reads         review_payment       catalog reads         │    │
//! │  │       │                   │    │                │               │    │
//! │  │       └───────┬───────────┘    └────────┬───────┘               │    │
//! │  │               ▼                         ▼                       │    │
//! │  │           movil-db                dyn ObjectStore               │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`order`] - sale creation and sale reads
//! - [`payment`] - voucher submission and admin review
//! - [`catalog`] - brand/product administration and browsing
//! - [`auth`] - the [`auth::Actor`] identity type and role gates
//! - [`object_store`] - binary storage port for vouchers and images
//! - [`error`] - [`error::EngineError`] and its transport classification

pub mod auth;
pub mod catalog;
pub mod error;
pub mod object_store;
pub mod order;
pub mod payment;

pub use auth::Actor;
pub use catalog::{CatalogEngine, Paginated};
pub use error::{EngineError, EngineResult, ErrorKind};
pub use object_store::{FileUpload, LocalObjectStore, ObjectStore, ObjectStoreError};
pub use order::{CreatedSale, OrderEngine, SaleView};
pub use payment::{PaymentEngine, VoucherSubmission};
