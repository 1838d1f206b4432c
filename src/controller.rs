use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};

use crate::backend::{Backend, SubmitError};
use crate::catalog::Catalog;
use crate::filter;
use crate::models::{Book, BookId, Comment, CommentDraft, Site, Summary};
use crate::stage::{self, Stage};
use crate::utils::FanOut;
use crate::verification::Verifier;

#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Escape,
    Char(char),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetQuery(String),
    SetGenre(String),
    Open(BookId),
    Close,
    KeyPressed(Key),
    SetDraftRating(u8),
    EditComment(CommentDraft),
    SubmitRating,
    SubmitComment,
    RefreshSummaries,
}

/// Message for the visitor, shown once and then dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Info(message) | Notice::Error(message) => f.write_str(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub site: Site,
    pub books: Vec<Book>,
    pub query: String,
    pub genre_filter: String,
    pub active: Option<Book>,
    /// The page behind an open book doesn't scroll.
    pub scroll_locked: bool,
    pub summaries: HashMap<BookId, Summary>,
    /// Comments of the open book.
    pub comments: Vec<Comment>,
    pub draft_rating: u8,
    pub comment_draft: CommentDraft,
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn new(site: Site, catalog: Catalog) -> AppState {
        AppState {
            site,
            books: catalog.into_books(),
            query: String::new(),
            genre_filter: String::new(),
            active: None,
            scroll_locked: false,
            summaries: HashMap::new(),
            comments: vec![],
            draft_rating: 0,
            comment_draft: CommentDraft::default(),
            notices: vec![],
        }
    }

    pub fn filtered_books(&self) -> Vec<&Book> {
        filter::filtered_books(&self.books, &self.query, &self.genre_filter)
    }

    pub fn genres(&self) -> Vec<String> {
        filter::genres(&self.books)
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn summary(&self, id: &BookId) -> Summary {
        self.summaries.get(id).copied().unwrap_or_default()
    }

    pub fn average_rating(&self, id: &BookId) -> f64 {
        self.summary(id).avg
    }

    pub fn rating_count(&self, id: &BookId) -> u64 {
        self.summary(id).count
    }

    pub fn my_rating(&self, id: &BookId) -> u8 {
        self.summary(id).mine
    }
}

/// Applies actions to the state, calling out to the backend and the
/// verification widget where an action needs them.
pub struct Controller<B: Backend, V: Verifier> {
    state: AppState,
    backend: B,
    verifier: V,
}

impl<B: Backend, V: Verifier> Controller<B, V> {
    pub fn new(state: AppState, backend: B, verifier: V) -> Controller<B, V> {
        Controller {
            state,
            backend,
            verifier,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn verifier_mut(&mut self) -> &mut V {
        &mut self.verifier
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.state.notices)
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!("dispatch {:?}", action);

        match action {
            Action::SetQuery(query) => self.state.query = query,
            Action::SetGenre(genre) => self.state.genre_filter = genre,
            Action::Open(id) => self.open(&id),
            Action::Close => self.close(),
            Action::KeyPressed(Key::Escape) if self.state.is_open() => self.close(),
            Action::KeyPressed(_) => {}
            Action::SetDraftRating(n) => self.set_draft_rating(n),
            Action::EditComment(draft) => self.state.comment_draft = draft,
            Action::SubmitRating => self.submit_rating(),
            Action::SubmitComment => self.submit_comment(),
            Action::RefreshSummaries => self.refresh_summaries(),
        }
    }

    fn open(&mut self, id: &BookId) {
        let book = match self.state.books.iter().find(|b| &b.id == id) {
            Some(book) => book.clone(),
            None => {
                warn!("{}: no such book", id);
                return;
            }
        };

        self.state.active = Some(book);
        self.state.scroll_locked = true;
        self.state.draft_rating = 0;
        self.state.comments.clear();
        stage::update(id, Stage::Opened);

        self.verifier.render();
        self.refresh_summary(id);
        self.load_comments(id);
    }

    fn close(&mut self) {
        if let Some(book) = self.state.active.take() {
            stage::update(&book.id, Stage::Closed);
        }

        self.state.draft_rating = 0;
        self.state.scroll_locked = false;
    }

    fn set_draft_rating(&mut self, n: u8) {
        if n > 5 {
            warn!("ignoring draft rating {}", n);
            return;
        }

        self.state.draft_rating = n;
    }

    fn refresh_summary(&mut self, id: &BookId) {
        match self.backend.summary(id) {
            Ok(summary) => {
                self.state.summaries.insert(id.clone(), summary);
                stage::update(id, Stage::LoadedSummary);
            }
            Err(err) => stage::update(id, Stage::Fail(&err)),
        }
    }

    fn load_comments(&mut self, id: &BookId) {
        match self.backend.comments(id) {
            Ok(comments) => {
                self.state.comments = comments;
                stage::update(id, Stage::LoadedComments);
            }
            Err(err) => stage::update(id, Stage::Fail(&err)),
        }
    }

    fn refresh_summaries(&mut self) {
        let ids = self
            .state
            .books
            .iter()
            .map(|b| b.id.clone())
            .collect::<Vec<_>>();

        let backend = &self.backend;
        let summaries = ids.fan_out(|id| backend.summary(id));

        debug!("refreshed {} of {} summaries", summaries.len(), ids.len());

        for (id, summary) in summaries {
            self.state.summaries.insert(id, summary);
        }
    }

    fn active_id(&self) -> Option<BookId> {
        self.state.active.as_ref().map(|b| b.id.clone())
    }

    /// Token of a solved challenge, or a notice asking for one.
    fn take_token(&mut self) -> Option<String> {
        let token = self.verifier.token();

        if token.is_none() {
            self.state
                .notices
                .push(Notice::Error(String::from("Please verify you are human")));
        }

        token
    }

    fn report(&mut self, id: &BookId, err: &SubmitError, fallback: &str) {
        match err {
            SubmitError::Rejected(_) => stage::update(id, Stage::Rejected),
            SubmitError::Transport(inner) => stage::update(id, Stage::Fail(inner)),
        }

        let message = err.message().unwrap_or(fallback).to_string();
        self.state.notices.push(Notice::Error(message));
    }

    fn submit_rating(&mut self) {
        let id = match self.active_id() {
            Some(id) => id,
            None => return,
        };

        let stars = self.state.draft_rating;
        if stars == 0 {
            return;
        }

        let token = match self.take_token() {
            Some(token) => token,
            None => return,
        };

        let r = self.backend.rate(&id, stars, &token);
        self.verifier.reset();

        match r {
            Ok(()) => {
                stage::update(&id, Stage::SubmittedRating);
                self.refresh_summary(&id);
                self.refresh_summaries();
            }
            Err(err) => self.report(&id, &err, "Failed to submit rating"),
        }
    }

    fn submit_comment(&mut self) {
        let id = match self.active_id() {
            Some(id) => id,
            None => return,
        };

        let token = match self.take_token() {
            Some(token) => token,
            None => return,
        };

        let r = self
            .backend
            .comment(&id, &self.state.comment_draft, &token);

        match r {
            Ok(()) => {
                stage::update(&id, Stage::SubmittedComment);
                self.state
                    .notices
                    .push(Notice::Info(String::from("Comment submitted for approval")));
                self.state.comment_draft = CommentDraft::default();
            }
            Err(err) => self.report(&id, &err, "Failed to submit comment"),
        }

        self.verifier.reset();
        self.load_comments(&id);
    }
}
