//! Banner Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Record;

/// Home-screen banner entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(default, skip_serializing)]
    pub id: String,
    /// Public URL returned by the blob store
    pub image: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: i64,
}

fn default_active() -> bool {
    true
}

impl Record for Banner {
    const COLLECTION: &'static str = "banners";
    const RESOURCE: &'static str = "Banner";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create banner payload (the image is uploaded separately)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BannerCreate {
    #[validate(length(max = 120))]
    pub title: String,
    /// Original file name, used for the blob key and content type
    #[validate(length(min = 1))]
    pub file_name: String,
}
