use serde::{Deserialize, Serialize};

use super::BookId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: String,
    pub book_id: BookId,
    pub rating: u8,
    pub device: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}
