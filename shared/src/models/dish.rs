//! Dish Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Record;

/// Dish entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// Category reference
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Among the current month's best sellers
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl Record for Dish {
    const COLLECTION: &'static str = "dishes";
    const RESOURCE: &'static str = "Dish";

    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        if self.price.is_sign_negative() {
            return Err(format!("dish {} has a negative price", self.id));
        }
        Ok(())
    }
}

pub(crate) fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(length(min = 1))]
    pub category: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}
