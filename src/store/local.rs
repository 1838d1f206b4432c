use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStore;
use crate::models::{Comment, Rating};

pub const RATINGS_KEY: &str = "showcase.ratings";
pub const COMMENTS_KEY: &str = "showcase.comments";
pub const DEVICE_KEY: &str = "showcase.device";

/// The ratings and comments collections of the local variant.
pub struct LocalStore<S: KeyValueStore> {
    inner: S,
}

impl<S: KeyValueStore> LocalStore<S> {
    pub fn new(inner: S) -> LocalStore<S> {
        LocalStore { inner }
    }

    pub fn ratings(&self) -> Vec<Rating> {
        self.load(RATINGS_KEY)
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.load(COMMENTS_KEY)
    }

    pub fn add_rating(&mut self, rating: Rating) -> anyhow::Result<()> {
        let mut ratings = self.ratings();
        ratings.push(rating);
        self.save(RATINGS_KEY, &ratings)
    }

    pub fn add_comment(&mut self, comment: Comment) -> anyhow::Result<()> {
        let mut comments = self.comments();
        comments.push(comment);
        self.save(COMMENTS_KEY, &comments)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let text = match self.inner.get(key) {
            Some(text) => text,
            None => return vec![],
        };

        serde_json::from_str(&text).unwrap_or_else(|err| {
            warn!("{}: unreadable collection, using empty: {}", key, err);
            vec![]
        })
    }

    fn save<T: Serialize>(&mut self, key: &str, values: &[T]) -> anyhow::Result<()> {
        let text = serde_json::to_string(values)?;
        self.inner.set(key, text)
    }
}
