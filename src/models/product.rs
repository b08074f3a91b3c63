use garde::Validate;
use serde::{Deserialize, Serialize};

/// Represents a product as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub quantity: i64,
}

/// The payload for creating a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct NewProduct {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(range(min = 0))]
    pub quantity: i64,
}
