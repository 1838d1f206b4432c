use thiserror::Error;

use crate::models::{BookId, Comment, CommentDraft, Summary};

mod local;
mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The service answered and said no.
    #[error("rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl SubmitError {
    /// Message meant for the visitor, if the service sent one.
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmitError::Rejected(message) => message.as_deref(),
            SubmitError::Transport(_) => None,
        }
    }
}

/// Source of rating summaries and comments, and sink for submissions.
///
/// `Sync` because summaries for the whole catalog are fetched in parallel.
pub trait Backend: Sync {
    fn summary(&self, book: &BookId) -> anyhow::Result<Summary>;

    fn comments(&self, book: &BookId) -> anyhow::Result<Vec<Comment>>;

    fn rate(&self, book: &BookId, stars: u8, token: &str) -> Result<(), SubmitError>;

    fn comment(&self, book: &BookId, draft: &CommentDraft, token: &str)
        -> Result<(), SubmitError>;
}
