//! # movil-db: Database Layer for the Movil Shop Backend
//!
//! This crate provides database access for the storefront backend. It uses
//! SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Movil Shop Data Flow                               │
//! │                                                                         │
//! │  movil-engine (OrderEngine / PaymentEngine / CatalogEngine)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     movil-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │ product, sale │    │  (embedded)  │    │    │
//! │  │   │               │◄───│ payment, brand│    │ 001_init.sql │    │    │
//! │  │   │ SqlitePool    │    │ user          │    │              │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys on)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use movil_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/movil.db")).await?;
//! let product = db.products().get_by_id(1).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, WriteTx};
pub use repository::Page;
