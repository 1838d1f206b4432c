use std::sync::Mutex;

use log::info;

use super::{Backend, SubmitError};
use crate::aggregate;
use crate::identity::{random_id, IdentityProvider};
use crate::models::{BookId, Comment, CommentDraft, Rating, Summary};
use crate::store::{KeyValueStore, LocalStore};
use crate::utils::date::now_millis;

/// Ratings and comments kept on this device only.
///
/// Every rating stays in the log and counts toward the average; the device's
/// own rating is its newest entry. Comments are visible as soon as they are
/// stored.
pub struct LocalBackend<S, I>
where
    S: KeyValueStore + Send,
    I: IdentityProvider,
{
    store: Mutex<LocalStore<S>>,
    identity: Mutex<I>,
}

impl<S, I> LocalBackend<S, I>
where
    S: KeyValueStore + Send,
    I: IdentityProvider,
{
    pub fn new(store: S, identity: I) -> LocalBackend<S, I> {
        LocalBackend {
            store: Mutex::new(LocalStore::new(store)),
            identity: Mutex::new(identity),
        }
    }

    pub fn device_id(&self) -> anyhow::Result<String> {
        self.identity
            .lock()
            .map_err(|_| anyhow::Error::msg("identity lock poisoned"))?
            .device_id()
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut LocalStore<S>) -> T) -> anyhow::Result<T> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| anyhow::Error::msg("store lock poisoned"))?;

        Ok(f(&mut *store))
    }
}

fn require_token(token: &str) -> Result<(), SubmitError> {
    if token.trim().is_empty() {
        return Err(SubmitError::Rejected(Some(String::from(
            "Please verify you are human",
        ))));
    }

    Ok(())
}

impl<S, I> Backend for LocalBackend<S, I>
where
    S: KeyValueStore + Send,
    I: IdentityProvider,
{
    fn summary(&self, book: &BookId) -> anyhow::Result<Summary> {
        let device = self.device_id()?;
        let ratings = self.with_store(|store| store.ratings())?;

        Ok(aggregate::summarize(&ratings, book, &device))
    }

    fn comments(&self, book: &BookId) -> anyhow::Result<Vec<Comment>> {
        let mut comments = self
            .with_store(|store| store.comments())?
            .into_iter()
            .filter(|c| c.book_id.as_ref() == Some(book))
            .collect::<Vec<_>>();

        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(comments)
    }

    fn rate(&self, book: &BookId, stars: u8, token: &str) -> Result<(), SubmitError> {
        require_token(token)?;

        if !(1..=5).contains(&stars) {
            return Err(SubmitError::Rejected(Some(String::from(
                "Rating must be between 1 and 5",
            ))));
        }

        let rating = Rating {
            id: random_id(),
            book_id: book.clone(),
            rating: stars,
            device: self.device_id()?,
            created_at: now_millis(),
        };

        self.with_store(|store| store.add_rating(rating))??;

        info!("{}: stored rating of {}", book, stars);

        Ok(())
    }

    fn comment(
        &self,
        book: &BookId,
        draft: &CommentDraft,
        token: &str,
    ) -> Result<(), SubmitError> {
        require_token(token)?;

        if draft.text.trim().is_empty() {
            return Err(SubmitError::Rejected(Some(String::from(
                "Comment text is required",
            ))));
        }

        let comment = Comment {
            id: random_id(),
            book_id: Some(book.clone()),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            text: draft.text.trim().to_string(),
            created_at: Some(now_millis()),
        };

        self.with_store(|store| store.add_comment(comment))??;

        info!("{}: stored comment", book);

        Ok(())
    }
}
