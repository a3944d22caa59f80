//! Comment Model

use serde::{Deserialize, Serialize};

use super::Record;

/// Moderation state of a customer comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

/// Star rating, 0 to 5 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > Self::MAX {
            return Err(format!("rating {} is above {}", value, Self::MAX));
        }
        Ok(Self(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Comment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing)]
    pub id: String,
    /// Dish the comment is about
    pub dish: String,
    pub rating: Rating,
    pub body: String,
    pub status: ModerationStatus,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Record for Comment {
    const COLLECTION: &'static str = "comments";
    const RESOURCE: &'static str = "Comment";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::try_from(0).is_ok());
        assert_eq!(Rating::try_from(5).unwrap().value(), 5);
        assert!(Rating::try_from(6).is_err());
    }

    #[test]
    fn test_comment_with_out_of_range_rating_is_rejected() {
        let result = serde_json::from_value::<Comment>(json!({
            "dish": "d-1",
            "rating": 9,
            "body": "great",
            "status": "pending",
            "createdAt": 1
        }));
        assert!(result.is_err());
    }
}
