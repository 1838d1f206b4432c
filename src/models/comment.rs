use serde::{Deserialize, Serialize};

use super::BookId;
use crate::utils::date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "date::lenient_millis")]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentDraft {
    pub name: String,
    pub email: String,
    pub text: String,
}

impl CommentDraft {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.text.is_empty()
    }
}
