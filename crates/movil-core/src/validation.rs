//! # Business Rule Validation
//!
//! Pure validation functions applied by the engines before any database
//! work begins. The external schema layer has already rejected malformed
//! request shapes; everything here is a business-level constraint a schema
//! cannot express, or one worth re-checking at the trust boundary.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::SaleItemRequest;
use crate::{MAX_BRAND_NAME_LEN, MAX_ITEM_QUANTITY, MAX_MODEL_LEN, MAX_SALE_ITEMS};

/// Validates the line items of a new sale.
///
/// ## Rules
/// - at least one item
/// - at most [`MAX_SALE_ITEMS`] items
/// - every quantity positive and at most [`MAX_ITEM_QUANTITY`]
pub fn validate_sale_items(items: &[SaleItemRequest]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "products".to_string(),
        });
    }

    if items.len() > MAX_SALE_ITEMS {
        return Err(ValidationError::TooMany {
            field: "products".to_string(),
            max: MAX_SALE_ITEMS,
        });
    }

    for item in items {
        if item.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_ITEM_QUANTITY,
            });
        }
    }

    Ok(())
}

/// Validates a claimed payment amount.
pub fn validate_payment_amount(amount: Money) -> Result<(), ValidationError> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

/// Validates an uploaded voucher or image file.
///
/// The upload middleware guarantees a file is attached; an empty byte
/// buffer or a blank name still gets through some clients.
pub fn validate_upload(file_name: &str, bytes: &[u8]) -> Result<(), ValidationError> {
    if file_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "file_name".to_string(),
        });
    }
    if bytes.is_empty() {
        return Err(ValidationError::Required {
            field: "file".to_string(),
        });
    }
    Ok(())
}

/// Validates a brand name.
pub fn validate_brand_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if name.len() > MAX_BRAND_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_BRAND_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates the mutable fields of a product.
pub fn validate_product_fields(model: &str, price: Money, stock: i64) -> Result<(), ValidationError> {
    if model.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "model".to_string(),
        });
    }
    if model.len() > MAX_MODEL_LEN {
        return Err(ValidationError::TooLong {
            field: "model".to_string(),
            max: MAX_MODEL_LEN,
        });
    }
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: i64, quantity: i64) -> SaleItemRequest {
        SaleItemRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_empty_sale_rejected() {
        assert!(matches!(
            validate_sale_items(&[]),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert!(matches!(
            validate_sale_items(&[item(1, 0)]),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_sale_items(&[item(1, -3)]),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        assert!(matches!(
            validate_sale_items(&[item(1, MAX_ITEM_QUANTITY + 1)]),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_valid_items_pass() {
        assert!(validate_sale_items(&[item(1, 2), item(2, 1)]).is_ok());
    }

    #[test]
    fn test_upload_must_have_content() {
        assert!(validate_upload("voucher.jpg", b"bytes").is_ok());
        assert!(validate_upload("", b"bytes").is_err());
        assert!(validate_upload("voucher.jpg", b"").is_err());
    }

    #[test]
    fn test_product_fields() {
        assert!(validate_product_fields("Galaxy A54", Money::from_cents(10_000), 5).is_ok());
        assert!(validate_product_fields("", Money::from_cents(10_000), 5).is_err());
        assert!(validate_product_fields("Galaxy A54", Money::zero(), 5).is_err());
        assert!(validate_product_fields("Galaxy A54", Money::from_cents(1), -1).is_err());
    }
}
