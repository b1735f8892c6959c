//! # Repository Module
//!
//! Database repository implementations for the Movil Shop backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Engine ──► Repository ──► SQL ──► SQLite                               │
//! │                                                                         │
//! │  Two kinds of methods:                                                  │
//! │                                                                         │
//! │  • `&self` methods run against the pool — standalone reads              │
//! │    (listings, detail pages, history)                                    │
//! │                                                                         │
//! │  • associated functions taking `&mut SqliteConnection` — building       │
//! │    blocks the engine composes INSIDE one `WriteTx` (immediate-mode      │
//! │    write transaction). The engine owns begin/commit and rolls back      │
//! │    explicitly on every error path.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - catalog CRUD and stock movement
//! - [`brand::BrandRepository`] - brand CRUD
//! - [`sale::SaleRepository`] - sales, line items, sale listings
//! - [`payment::PaymentRepository`] - payment upsert, review, listings
//! - [`user::UserRepository`] - user rows for FK integrity and joins

pub mod brand;
pub mod payment;
pub mod product;
pub mod sale;
pub mod user;

use serde::{Deserialize, Serialize};

/// Pagination parameters for list queries. 1-based page numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// First page with the given size.
    pub fn first(limit: u32) -> Self {
        Page { page: 1, limit }
    }

    /// Returns the LIMIT value for SQL.
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Returns the OFFSET value for SQL.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

impl Default for Page {
    /// Page 1, 10 rows — the API defaults.
    fn default() -> Self {
        Page { page: 1, limit: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offsets() {
        assert_eq!(Page::default().offset(), 0);
        assert_eq!(Page { page: 3, limit: 10 }.offset(), 20);
        assert_eq!(Page { page: 0, limit: 10 }.offset(), 0);
    }
}
