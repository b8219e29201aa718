//! Data models for Libris

pub mod author;
pub mod book;
pub mod comment;
pub mod form;
pub mod genre;
pub mod page;
pub mod patterns;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use comment::Comment;
pub use form::{Flash, Outcome};
pub use genre::Genre;
pub use page::Page;
pub use user::User;
