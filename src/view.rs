//! Plain-text rendering of the state for the terminal.

use std::fmt::Write;

use crate::controller::AppState;
use crate::models::{Book, Summary};
use crate::utils::date::format_date;

fn stars(summary: &Summary) -> String {
    if summary.count == 0 {
        return String::from("no ratings");
    }

    let mut r = format!("{:.1}/5 ({})", summary.avg, summary.count);

    if summary.mine > 0 {
        let _ = write!(r, ", yours {}", summary.mine);
    }

    r
}

pub fn header(state: &AppState) -> String {
    format!(
        "{}\n{}\nby {}\n",
        state.site.title, state.site.subtitle, state.site.author
    )
}

fn line(state: &AppState, book: &Book) -> String {
    let mut r = format!("[{}] {}", book.id, book.title);

    if !book.genre.is_empty() {
        let _ = write!(r, " · {}", book.genre);
    }
    if !book.status.is_empty() {
        let _ = write!(r, " · {}", book.status);
    }

    let _ = write!(r, " · {}", stars(&state.summary(&book.id)));

    r
}

pub fn list(state: &AppState) -> String {
    let books = state.filtered_books();

    if books.is_empty() {
        return String::from("No books found.\n");
    }

    books
        .iter()
        .fold(String::new(), |mut acc, book| {
            acc.push_str(&line(state, book));
            acc.push('\n');
            acc
        })
}

/// The open book with its comments, empty when nothing is open.
pub fn detail(state: &AppState) -> String {
    let book = match &state.active {
        Some(book) => book,
        None => return String::new(),
    };

    let mut r = line(state, book);
    r.push('\n');

    if !book.blurb.is_empty() {
        let _ = writeln!(r, "\n{}", book.blurb);
    }
    if !book.tags.is_empty() {
        let _ = writeln!(r, "\ntags: {}", book.tags.join(", "));
    }
    if let Some(cover) = &book.cover {
        let _ = writeln!(r, "cover: {}", cover);
    }

    let _ = writeln!(r, "\ncomments ({})", state.comments.len());

    for comment in &state.comments {
        let date = comment.created_at.map(format_date).unwrap_or_default();
        let _ = writeln!(r, "- {} {}: {}", comment.name, date, comment.text);
    }

    r
}

#[cfg(test)]
mod tests {
    use super::{detail, list};
    use crate::catalog::Catalog;
    use crate::controller::AppState;
    use crate::models::{BookId, Comment, Site, Summary};

    fn state() -> AppState {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "title": "Zed", "genre": "SciFi", "status": "Draft",
                 "blurb": "Robots.", "tags": ["ai", "space"]},
                {"id": 2, "title": "Alpha", "genre": "Drama"}]"#,
        )
        .unwrap_or_default();

        AppState::new(Site::default(), catalog)
    }

    #[test]
    fn list_shows_sorted_books_with_ratings() -> anyhow::Result<()> {
        let mut state = state();
        state.summaries.insert(
            BookId::from("1"),
            Summary {
                avg: 4.5,
                count: 2,
                mine: 5,
            },
        );

        let expected = "[2] Alpha · Drama · no ratings\n\
                        [1] Zed · SciFi · Draft · 4.5/5 (2), yours 5\n";

        assert_eq!(expected, list(&state));

        state.query = String::from("nothing like this");
        assert_eq!("No books found.\n", list(&state));

        Ok(())
    }

    #[test]
    fn detail_lists_comments() -> anyhow::Result<()> {
        let mut state = state();
        assert_eq!("", detail(&state));

        state.active = state.books.first().cloned();
        state.comments.push(Comment {
            id: String::from("c"),
            book_id: Some(BookId::from("1")),
            name: String::from("Ann"),
            email: String::new(),
            text: String::from("Great"),
            created_at: Some(1_700_000_000_000),
        });

        let r = detail(&state);

        assert!(r.contains("tags: ai, space"));
        assert!(r.contains("comments (1)"));
        assert!(r.contains("- Ann Nov 14, 2023: Great"));

        Ok(())
    }
}
