mod book;
mod comment;
mod rating;
mod site;
mod summary;

pub use book::{Book, BookId};
pub use comment::{Comment, CommentDraft};
pub use rating::Rating;
pub use site::Site;
pub use summary::Summary;
