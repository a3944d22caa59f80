//! Chat Models

use serde::{Deserialize, Serialize};

use super::Record;

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Admin,
    Customer,
}

/// One customer conversation in the chat inbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(default, skip_serializing)]
    pub id: String,
    /// Account reference of the customer
    pub customer: String,
    #[serde(default)]
    pub last_message: String,
    pub updated_at: i64,
    /// Customer messages the admin side has not read yet
    #[serde(default)]
    pub unread: u32,
}

impl Record for Conversation {
    const COLLECTION: &'static str = "conversations";
    const SORT_FIELD: &'static str = "updatedAt";
    const RESOURCE: &'static str = "Conversation";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Chat message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub conversation: String,
    pub sender: Sender,
    pub body: String,
    pub created_at: i64,
}

impl Record for ChatMessage {
    const COLLECTION: &'static str = "messages";
    const RESOURCE: &'static str = "Message";

    fn id(&self) -> &str {
        &self.id
    }
}
