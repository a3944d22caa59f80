//! Account Model

use serde::{Deserialize, Serialize};

use super::Record;

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Admin,
    Staff,
    Customer,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Admin => "admin",
            AccountRole::Staff => "staff",
            AccountRole::Customer => "customer",
        }
    }
}

/// Account entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: AccountRole,
    #[serde(default)]
    pub disabled: bool,
    pub created_at: i64,
}

impl Record for Account {
    const COLLECTION: &'static str = "accounts";
    const RESOURCE: &'static str = "Account";

    fn id(&self) -> &str {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err(format!("account {} has an invalid email", self.id));
        }
        Ok(())
    }
}

/// Partial account update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AccountRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}
