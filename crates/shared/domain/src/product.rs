//! Product domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cache_key::Cacheable;
use crate::constants::{CACHE_PREFIX_PRODUCT, CACHE_PREFIX_PRODUCT_LIST};
use crate::error::{DomainError, DomainResult};

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    /// Store-assigned identifier
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Unit price, never negative
    pub price: f64,
    /// Units on hand, never negative
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Check that `quantity` units can be taken from the current stock.
    pub fn ensure_stock(&self, quantity: i32) -> DomainResult<()> {
        if quantity > self.stock {
            return Err(DomainError::InsufficientStock {
                available: self.stock,
                requested: quantity,
            });
        }
        Ok(())
    }
}

impl Cacheable for Product {
    const ENTITY_PREFIX: &'static str = CACHE_PREFIX_PRODUCT;
    const LIST_PREFIX: &'static str = CACHE_PREFIX_PRODUCT_LIST;
}

/// Product creation data transfer object
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "Name is required"))]
    #[cfg_attr(feature = "openapi", schema(example = "Keyboard"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    #[cfg_attr(feature = "openapi", schema(example = 49.9))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
}

/// Product update data transfer object.
///
/// Only values that carry information overwrite the stored product: empty
/// strings are ignored, a price of zero or less is ignored and a negative
/// stock is ignored. As a consequence a price can never be set back to 0
/// through an update.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

impl UpdateProduct {
    /// Drop values that count as "not provided".
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.filter(|name| !name.is_empty()),
            description: self.description.filter(|desc| !desc.is_empty()),
            price: self.price.filter(|price| *price > 0.0),
            stock: self.stock.filter(|stock| *stock >= 0),
        }
    }
}

/// Stock decrement request body
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StockUpdate {
    /// Units to take from stock
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    #[cfg_attr(feature = "openapi", schema(example = 2))]
    pub quantity: i32,
}
