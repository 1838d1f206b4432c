//! Rating aggregates over the local append-only rating log.

use crate::models::{BookId, Rating, Summary};

fn for_book<'a>(ratings: &'a [Rating], book: &'a BookId) -> impl Iterator<Item = &'a Rating> {
    ratings.iter().filter(move |r| &r.book_id == book)
}

/// Mean of every rating ever recorded for the book, 0 when there are none.
pub fn average_rating(ratings: &[Rating], book: &BookId) -> f64 {
    let (sum, count) = for_book(ratings, book).fold((0u64, 0u64), |(sum, count), r| {
        (sum + u64::from(r.rating), count + 1)
    });

    if count == 0 {
        return 0.0;
    }

    sum as f64 / count as f64
}

pub fn rating_count(ratings: &[Rating], book: &BookId) -> u64 {
    for_book(ratings, book).count() as u64
}

/// The device's newest rating for the book, 0 when it never rated it.
/// Equal timestamps resolve to the later entry in the log.
pub fn my_rating(ratings: &[Rating], book: &BookId, device: &str) -> u8 {
    let mut latest: Option<&Rating> = None;

    for r in for_book(ratings, book).filter(|r| r.device == device) {
        match latest {
            Some(current) if r.created_at < current.created_at => {}
            _ => latest = Some(r),
        }
    }

    latest.map(|r| r.rating).unwrap_or(0)
}

pub fn summarize(ratings: &[Rating], book: &BookId, device: &str) -> Summary {
    Summary {
        avg: average_rating(ratings, book),
        count: rating_count(ratings, book),
        mine: my_rating(ratings, book, device),
    }
}
