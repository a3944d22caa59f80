//! Voucher Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Record;

/// Discount voucher entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub code: String,
    /// Percentage off, 1-100
    pub discount_percent: u8,
    /// Remaining redemptions
    pub quantity: u32,
    pub expires_at: i64,
    pub created_at: i64,
}

impl Voucher {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis > self.expires_at
    }

    pub fn is_redeemable(&self, now_millis: i64) -> bool {
        self.quantity > 0 && !self.is_expired(now_millis)
    }
}

impl Record for Voucher {
    const COLLECTION: &'static str = "vouchers";
    const RESOURCE: &'static str = "Voucher";

    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        if self.discount_percent == 0 || self.discount_percent > 100 {
            return Err(format!(
                "voucher {} has discount {}%",
                self.id, self.discount_percent
            ));
        }
        Ok(())
    }
}

/// Create voucher payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoucherCreate {
    #[validate(length(min = 3, max = 32))]
    pub code: String,
    #[validate(range(min = 1, max = 100))]
    pub discount_percent: u8,
    #[validate(range(min = 1))]
    pub quantity: u32,
    pub expires_at: i64,
}

/// Update voucher payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoucherUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100))]
    pub discount_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voucher_redeemable() {
        let voucher = Voucher {
            id: "v-1".to_string(),
            code: "SPRING".to_string(),
            discount_percent: 10,
            quantity: 1,
            expires_at: 1_000,
            created_at: 0,
        };
        assert!(voucher.is_redeemable(999));
        assert!(!voucher.is_redeemable(1_001));
        assert!(!Voucher { quantity: 0, ..voucher }.is_redeemable(0));
    }

    #[test]
    fn test_voucher_create_validation() {
        let create = VoucherCreate {
            code: "SPRING".to_string(),
            discount_percent: 0,
            quantity: 5,
            expires_at: 0,
        };
        assert!(create.validate().is_err());
    }
}
