use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use log::{info, trace, warn};
use reqwest::header::CACHE_CONTROL;

use crate::filter;
use crate::models::{Book, BookId};

/// Where the static book list lives.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Url(String),
    Path(PathBuf),
}

impl CatalogSource {
    pub fn parse(s: &str) -> CatalogSource {
        if s.starts_with("http://") || s.starts_with("https://") {
            CatalogSource::Url(s.to_string())
        } else {
            CatalogSource::Path(PathBuf::from(s))
        }
    }

    fn read(&self) -> anyhow::Result<String> {
        trace!("CatalogSource::read()");
        match self {
            CatalogSource::Url(url) => {
                let client = reqwest::blocking::Client::builder().build()?;

                let text = client
                    .get(url.as_str())
                    .header(CACHE_CONTROL, "no-cache")
                    .send()?
                    .error_for_status()?
                    .text()?;

                Ok(text)
            }
            CatalogSource::Path(path) => {
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
            }
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Url(url) => f.write_str(url),
            CatalogSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The session's immutable list of books.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn from_json(text: &str) -> anyhow::Result<Catalog> {
        let books = serde_json::from_str::<Vec<Book>>(text)?;

        Ok(Catalog { books })
    }

    /// Never fails: an unreachable or malformed source gives an empty catalog.
    pub fn load(source: &CatalogSource) -> Catalog {
        match source.read().and_then(|text| Catalog::from_json(&text)) {
            Ok(catalog) => {
                info!("loaded {} books from {}", catalog.books.len(), source);
                catalog
            }
            Err(err) => {
                warn!("{}: no books loaded: {:#}", source, err);
                Catalog::default()
            }
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    pub fn find(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    pub fn genres(&self) -> Vec<String> {
        filter::genres(&self.books)
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
