use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a product.
///
/// Stock arrives as a signed integer so negative values reach the catalog
/// service and fail its validation instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}
