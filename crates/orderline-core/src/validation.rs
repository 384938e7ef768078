//! # Validation Module
//!
//! Validation of order creation requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (external)                                     │
//! │  └── Field annotations, e-mail format                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── customer name / e-mail present after trimming                     │
//! │  ├── at least one item                                                 │
//! │  └── every item has a product id and a positive quantity               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── CHECK (quantity > 0), CHECK (stock >= 0)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation runs before any store access, so a rejected request never
//! touches products or orders.
//!
//! ## Usage
//! ```rust
//! use orderline_core::validation::validate_create_request;
//! use orderline_core::{CreateOrderRequest, OrderItemRequest};
//!
//! let req = CreateOrderRequest::new(
//!     "  Ada Lovelace ",
//!     "ada@example.com",
//!     vec![OrderItemRequest::new("p-1", 3)],
//! );
//! let valid = validate_create_request(&req).unwrap();
//! assert_eq!(valid.customer_name, "Ada Lovelace");
//! ```

use crate::error::ValidationError;
use crate::types::CreateOrderRequest;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A creation request that passed validation, with trimmed strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub lines: Vec<RequestedLine>,
}

/// A requested line with both fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedLine {
    pub product_id: String,
    pub quantity: i64,
}

// =============================================================================
// Field Validators
// =============================================================================

fn required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Customer name must be non-empty after trimming.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    required("customer_name", name)
}

/// Customer e-mail must be non-empty after trimming.
///
/// Format checking belongs to the request layer.
pub fn validate_customer_email(email: &str) -> ValidationResult<String> {
    required("customer_email", email)
}

/// Validates an ordered quantity.
///
/// ## Rules
/// - Must be present
/// - Must be positive (> 0)
pub fn validate_quantity(qty: Option<i64>) -> ValidationResult<i64> {
    match qty {
        None => Err(ValidationError::Required {
            field: "quantity".to_string(),
        }),
        Some(q) if q <= 0 => Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }),
        Some(q) => Ok(q),
    }
}

/// Validates a requested product id: present and not blank.
pub fn validate_product_id(id: Option<&str>) -> ValidationResult<String> {
    required("product_id", id.unwrap_or_default())
}

// =============================================================================
// Request Validator
// =============================================================================

/// Validates a whole creation request.
///
/// ## Order of Checks
/// 1. customer name
/// 2. customer e-mail
/// 3. item list not empty
/// 4. each item, in order: product id, then quantity
pub fn validate_create_request(req: &CreateOrderRequest) -> ValidationResult<ValidatedOrder> {
    let customer_name = validate_customer_name(&req.customer_name)?;
    let customer_email = validate_customer_email(&req.customer_email)?;

    if req.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    let lines = req
        .items
        .iter()
        .map(|item| -> ValidationResult<RequestedLine> {
            Ok(RequestedLine {
                product_id: validate_product_id(item.product_id.as_deref())?,
                quantity: validate_quantity(item.quantity)?,
            })
        })
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(ValidatedOrder {
        customer_name,
        customer_email,
        lines,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderItemRequest;

    fn request(items: Vec<OrderItemRequest>) -> CreateOrderRequest {
        CreateOrderRequest::new("Ada", "ada@example.com", items)
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(Some(1)), Ok(1));
        assert_eq!(validate_quantity(Some(1000)), Ok(1000));

        assert!(matches!(
            validate_quantity(Some(0)),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_quantity(Some(-1)).is_err());
        assert!(matches!(
            validate_quantity(None),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_customer_fields_are_trimmed_and_required() {
        assert_eq!(validate_customer_name("  Ada  ").unwrap(), "Ada");
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_email("").is_err());
        // Format is not checked here
        assert_eq!(validate_customer_email("not-an-email").unwrap(), "not-an-email");
    }

    #[test]
    fn test_valid_request() {
        let valid = validate_create_request(&request(vec![
            OrderItemRequest::new("p1", 3),
            OrderItemRequest::new("p2", 1),
        ]))
        .unwrap();

        assert_eq!(valid.customer_email, "ada@example.com");
        assert_eq!(
            valid.lines,
            vec![
                RequestedLine { product_id: "p1".to_string(), quantity: 3 },
                RequestedLine { product_id: "p2".to_string(), quantity: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_items_rejected() {
        assert_eq!(
            validate_create_request(&request(vec![])),
            Err(ValidationError::Empty { field: "items".to_string() })
        );
    }

    #[test]
    fn test_missing_customer_checked_before_items() {
        let req = CreateOrderRequest::new("", "ada@example.com", vec![]);
        assert_eq!(
            validate_create_request(&req),
            Err(ValidationError::Required { field: "customer_name".to_string() })
        );
    }

    #[test]
    fn test_item_fields_required() {
        let missing_product = OrderItemRequest { product_id: None, quantity: Some(1) };
        assert_eq!(
            validate_create_request(&request(vec![missing_product])),
            Err(ValidationError::Required { field: "product_id".to_string() })
        );

        let missing_qty = OrderItemRequest { product_id: Some("p".to_string()), quantity: None };
        assert_eq!(
            validate_create_request(&request(vec![missing_qty])),
            Err(ValidationError::Required { field: "quantity".to_string() })
        );

        assert!(validate_create_request(&request(vec![OrderItemRequest::new("p", -2)])).is_err());
    }
}
