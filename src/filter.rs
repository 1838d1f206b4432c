use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use log::warn;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Book;

/// Lowercase with accents stripped, for comparisons that should treat `É`,
/// `é` and `e` alike.
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Root-locale ordering at primary strength: case and accents are ignored
/// and letters such as `Æ`, `Ø` or `Ł` sort with their base letters.
pub struct LooseOrder {
    collator: Option<Collator>,
}

impl LooseOrder {
    pub fn new() -> LooseOrder {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Primary);

        let collator = Collator::try_new(&Default::default(), options)
            .map_err(|err| warn!("no collator, ordering by folded text: {}", err))
            .ok();

        LooseOrder { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => fold(a).cmp(&fold(b)),
        }
    }
}

impl Default for LooseOrder {
    fn default() -> Self {
        LooseOrder::new()
    }
}

pub fn matches(book: &Book, query: &str, genre: &str) -> bool {
    let q = query.trim().to_lowercase();
    let gf = genre.trim().to_lowercase();

    let matches_genre = gf.is_empty() || book.genre.to_lowercase() == gf;

    if q.is_empty() {
        return matches_genre;
    }

    matches_genre && book.haystack().contains(&q)
}

/// Books matching both filters, sorted by title. Equal titles keep catalog
/// order.
pub fn filtered_books<'a>(books: &'a [Book], query: &str, genre: &str) -> Vec<&'a Book> {
    let order = LooseOrder::new();

    let mut list = books
        .iter()
        .filter(|b| matches(b, query, genre))
        .collect::<Vec<_>>();

    list.sort_by(|a, b| order.compare(&a.title, &b.title));

    list
}

/// Distinct non-empty genres in display order.
pub fn genres(books: &[Book]) -> Vec<String> {
    let order = LooseOrder::new();

    let mut r = books
        .iter()
        .map(|b| b.genre.clone())
        .filter(|g| !g.is_empty())
        .collect::<Vec<_>>();

    r.sort_by(|a, b| order.compare(a, b).then_with(|| a.cmp(b)));
    r.dedup();

    r
}

#[cfg(test)]
mod tests {
    use super::{filtered_books, fold, genres, matches, LooseOrder};
    use std::cmp::Ordering;
    use crate::models::Book;

    fn catalog() -> Vec<Book> {
        serde_json::from_str(
            r#"[
                {"id": 1, "title": "Zed", "genre": "SciFi", "status": "Published",
                 "blurb": "A robot wakes up.", "tags": ["AI", "space"]},
                {"id": 2, "title": "Alpha", "genre": "Drama", "status": "Draft",
                 "blurb": "Two sisters.", "tags": ["family"]},
                {"id": 3, "title": "éclair", "genre": "scifi", "status": "Ongoing",
                 "blurb": "Pastry wars.", "tags": []},
                {"id": 4, "title": "beta", "genre": "", "status": "",
                 "blurb": "", "tags": ["Space Opera"]}
            ]"#,
        )
        .unwrap_or_default()
    }

    fn titles(books: &[&Book]) -> Vec<String> {
        books.iter().map(|b| b.title.clone()).collect()
    }

    #[test]
    fn empty_filters_sort_everything_by_title() -> anyhow::Result<()> {
        let books = catalog();

        let r = filtered_books(&books, "", "");

        assert_eq!(vec!["Alpha", "beta", "éclair", "Zed"], titles(&r));

        Ok(())
    }

    #[test]
    fn letters_without_decomposition_sort_with_their_base() -> anyhow::Result<()> {
        let books: Vec<Book> = serde_json::from_str(
            r#"[{"id": 1, "title": "Zed"}, {"id": 2, "title": "Ørsted"},
                {"id": 3, "title": "Æther"}, {"id": 4, "title": "Mars"},
                {"id": 5, "title": "Łódź"}, {"id": 6, "title": "Lima"}]"#,
        )?;

        let r = filtered_books(&books, "", "");

        assert_eq!(
            vec!["Æther", "Lima", "Łódź", "Mars", "Ørsted", "Zed"],
            titles(&r)
        );

        Ok(())
    }

    #[test]
    fn loose_order_ignores_case_and_accents() -> anyhow::Result<()> {
        let order = LooseOrder::new();

        assert_eq!(Ordering::Equal, order.compare("Éclair", "eclair"));
        assert_eq!(Ordering::Less, order.compare("ørsted", "Pluto"));

        Ok(())
    }

    #[test]
    fn two_book_example() -> anyhow::Result<()> {
        let books: Vec<Book> = serde_json::from_str(
            r#"[{"id":1,"title":"Zed","genre":"SciFi"},{"id":2,"title":"Alpha","genre":"Drama"}]"#,
        )?;

        assert_eq!(vec!["Alpha", "Zed"], titles(&filtered_books(&books, "", "")));

        Ok(())
    }

    #[test]
    fn genre_is_case_insensitive_equality() -> anyhow::Result<()> {
        let books = catalog();

        let r = filtered_books(&books, "", "  SCIFI ");

        assert_eq!(vec!["éclair", "Zed"], titles(&r));

        Ok(())
    }

    #[test]
    fn query_searches_every_field() -> anyhow::Result<()> {
        let books = catalog();

        assert_eq!(vec!["beta", "Zed"], titles(&filtered_books(&books, "SPACE", "")));
        assert_eq!(vec!["Alpha"], titles(&filtered_books(&books, "sisters", "")));
        assert_eq!(vec!["éclair"], titles(&filtered_books(&books, "ongoing", "")));
        assert!(filtered_books(&books, "space", "drama").is_empty());

        Ok(())
    }

    #[test]
    fn every_result_satisfies_the_predicate() -> anyhow::Result<()> {
        let books = catalog();

        for query in &["", "a", "space", "wars", "zzz"] {
            for genre in &["", "scifi", "Drama", "none"] {
                for book in filtered_books(&books, query, genre) {
                    assert!(matches(book, query, genre));
                }
                let expected = books.iter().filter(|b| matches(b, query, genre)).count();
                assert_eq!(expected, filtered_books(&books, query, genre).len());
            }
        }

        Ok(())
    }

    #[test]
    fn genres_are_distinct_and_sorted() -> anyhow::Result<()> {
        let books = catalog();

        assert_eq!(vec!["Drama", "SciFi", "scifi"], genres(&books));

        Ok(())
    }

    #[test]
    fn fold_strips_case_and_accents() -> anyhow::Result<()> {
        assert_eq!("eclair", fold("Éclair"));
        assert_eq!(fold("Crème"), fold("creme"));

        Ok(())
    }
}
