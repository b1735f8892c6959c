//! # Domain Types
//!
//! Core domain types for the storefront backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │      Sale       │   │    Payment      │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (i64)       │   │  id (UUID)      │   │  id (i64)       │        │
//! │  │  model          │   │  user_id (FK)   │   │  sale_id (FK,   │        │
//! │  │  price_cents    │   │  total_cents    │   │    UNIQUE)      │        │
//! │  │  stock          │   │  status         │   │  method, status │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  SaleStatus: PENDING → PAID | CANCELLED   (driven by payment review)    │
//! │  PaymentStatus: PENDING → APPROVED | REJECTED                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All status enums serialize to the same uppercase tokens in JSON and in
//! the database TEXT columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Actor Role
// =============================================================================

/// Role of an authenticated actor, supplied by the external identity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Store staff: reviews payments, mutates the catalog, sees all sales.
    Admin,
    /// Customer: creates sales and uploads vouchers for their own sales.
    Client,
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
///
/// Transitions happen only through payment review:
/// PENDING → PAID (payment approved) or PENDING → CANCELLED (rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleStatus {
    /// Created, stock reserved, awaiting an approved payment.
    Pending,
    /// Payment approved.
    Paid,
    /// Payment rejected; reserved stock has been restored.
    Cancelled,
}

// =============================================================================
// Payment Status
// =============================================================================

/// The status of a payment voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Voucher uploaded, awaiting admin review.
    Pending,
    /// Admin accepted the voucher; the sale is paid.
    Approved,
    /// Admin rejected the voucher; the sale is cancelled.
    Rejected,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer claims to have paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Yape mobile wallet transfer.
    Yape,
    /// Plin mobile wallet transfer.
    Plin,
    /// Cash on delivery/pickup.
    Cash,
    /// Card payment.
    Card,
}

// =============================================================================
// User
// =============================================================================

/// A registered user.
///
/// Credential verification lives in the external identity service; this row
/// exists for referential integrity and display joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login name, unique.
    pub username: String,

    /// Display name.
    pub full_name: String,

    /// Email address, unique.
    pub email: String,

    /// Hash of the password. Opaque to this workspace.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Authorization role.
    pub role: Role,

    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Brand
// =============================================================================

/// A phone brand in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: i64,

    /// Brand name, unique.
    pub name: String,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A phone model available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    /// Model name shown to customers.
    pub model: String,

    /// Optional marketing description.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit). Always positive.
    pub price_cents: i64,

    /// Available inventory. Never negative.
    pub stock: i64,

    /// Brand reference.
    pub brand_id: Option<i64>,

    /// Object-store reference for the product image.
    pub image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A customer order aggregating one or more line items with a fixed total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user.
    pub user_id: String,

    /// Sum of the line subtotals, in cents. Immutable after creation.
    pub total_cents: i64,

    pub status: SaleStatus,

    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as a Money type.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Detail
// =============================================================================

/// One product-quantity-price line within a sale.
///
/// ## Snapshot Pattern
/// `price_cents` is copied from the product at sale time. Later product
/// price edits never touch historical sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleDetail {
    pub id: i64,

    pub sale_id: String,

    pub product_id: i64,

    /// Units sold. Always positive.
    pub quantity: i64,

    /// Unit price snapshot at sale time, in cents.
    pub price_cents: i64,

    /// quantity × price_cents.
    pub subtotal_cents: i64,

    pub created_at: DateTime<Utc>,
}

impl SaleDetail {
    /// Returns the snapshotted unit price.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the line subtotal.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// The single record tracking a sale's voucher submission and admin decision.
///
/// `sale_id` is UNIQUE: a resubmitted voucher overwrites this row in place,
/// so at most one payment ever exists per sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,

    pub sale_id: String,

    /// Claimed amount in cents. Must equal the sale total at submission.
    pub amount_cents: i64,

    pub method: PaymentMethod,

    /// Object-store reference for the uploaded voucher.
    pub voucher_url: String,

    pub status: PaymentStatus,

    /// When the voucher was (last) uploaded.
    pub uploaded_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the claimed amount as a Money type.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One requested line of a new sale, as sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Fields for a new catalog product. The image is handled separately
/// through the object-store collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub model: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub brand_id: Option<i64>,
}

impl NewProduct {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Full replacement of a product's mutable fields (admin update).
///
/// Stock set here is an absolute correction; relative stock movement only
/// ever happens through sale creation and payment rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub model: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub brand_id: Option<i64>,
}

impl ProductUpdate {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens_match_schema() {
        // The CHECK constraints in the schema use these exact tokens.
        assert_eq!(serde_json::to_string(&SaleStatus::Pending).unwrap(), "\"PENDING\"");
        assert_eq!(serde_json::to_string(&SaleStatus::Paid).unwrap(), "\"PAID\"");
        assert_eq!(serde_json::to_string(&SaleStatus::Cancelled).unwrap(), "\"CANCELLED\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Approved).unwrap(), "\"APPROVED\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Yape).unwrap(), "\"YAPE\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn test_can_sell() {
        let product = Product {
            id: 1,
            model: "Galaxy A54".to_string(),
            description: None,
            price_cents: 10_000,
            stock: 5,
            brand_id: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(product.can_sell(5));
        assert!(!product.can_sell(6));
    }

    #[test]
    fn test_line_money_accessors() {
        let detail = SaleDetail {
            id: 1,
            sale_id: "s".to_string(),
            product_id: 1,
            quantity: 2,
            price_cents: 10_000,
            subtotal_cents: 20_000,
            created_at: Utc::now(),
        };

        assert_eq!(detail.price().multiply_quantity(detail.quantity), detail.subtotal());
    }
}
