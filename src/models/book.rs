//! Book model, form and listing types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{author::Author, comment::Comment, form::Flash, genre::Genre, page::Page};

/// Book with its author and genres.
///
/// The book is the owning side of the book/genre association: `genres` is the
/// only copy of the link set. A genre's books are looked up by query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: Option<i32>,
    pub title: String,
    pub description: String,
    /// Set by the database on insert, never changed afterwards
    pub created_at: Option<DateTime<Utc>>,
    pub author: Author,
    pub genres: Vec<Genre>,
}

fn same_genre(a: &Genre, b: &Genre) -> bool {
    match (a.id, b.id) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        author: Author,
        genres: impl IntoIterator<Item = Genre>,
    ) -> Self {
        let mut book = Self {
            id: None,
            title: title.into(),
            description: description.into(),
            created_at: None,
            author,
            genres: Vec::new(),
        };
        for genre in genres {
            book.add_genre(genre);
        }
        book
    }

    /// Link a genre. Returns `false` when it was already linked.
    pub fn add_genre(&mut self, genre: Genre) -> bool {
        if self.has_genre(&genre) {
            return false;
        }
        self.genres.push(genre);
        true
    }

    /// Unlink a genre. Returns `false` when it was not linked.
    pub fn remove_genre(&mut self, genre: &Genre) -> bool {
        let before = self.genres.len();
        self.genres.retain(|g| !same_genre(g, genre));
        self.genres.len() != before
    }

    pub fn has_genre(&self, genre: &Genre) -> bool {
        self.genres.iter().any(|g| same_genre(g, genre))
    }

    /// Ids of the linked genres (unsaved genres are skipped)
    pub fn genre_ids(&self) -> Vec<i32> {
        self.genres.iter().filter_map(|g| g.id).collect()
    }

    pub fn author_id(&self) -> Option<i32> {
        self.author.id
    }
}

/// Flat `books` row, before author and genres are attached
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Submitted book form (new and edit)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct BookForm {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(required(message = "An author is required"))]
    pub author_id: Option<i32>,
    #[validate(length(min = 1, message = "At least one genre is required"))]
    pub genre_ids: Vec<i32>,
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            description: book.description.clone(),
            author_id: book.author.id,
            genre_ids: book.genre_ids(),
        }
    }
}

/// Query parameters of the book listing
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Genre name fragment
    pub genre: Option<String>,
    pub page: Option<i64>,
}

/// Outcome of checking the raw `genre` parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreFilter {
    /// No filter requested
    Any,
    /// Filter on this name fragment
    Term(String),
    /// Too long or not alphanumeric; listed as if no filter was given
    Rejected,
}

impl GenreFilter {
    pub fn parse(raw: Option<&str>, max_len: usize) -> Self {
        match raw {
            None => GenreFilter::Any,
            Some(s) if s.is_empty() => GenreFilter::Any,
            Some(s)
                if s.chars().count() <= max_len
                    && s.chars().all(|c| c.is_ascii_alphanumeric()) =>
            {
                GenreFilter::Term(s.to_string())
            }
            Some(_) => GenreFilter::Rejected,
        }
    }

    pub fn term(&self) -> Option<&str> {
        match self {
            GenreFilter::Term(t) => Some(t),
            _ => None,
        }
    }
}

/// Book listing page
#[derive(Debug, Clone, Serialize)]
pub struct BookListing {
    pub books: Page<Book>,
    /// Filter actually applied
    pub genre: Option<String>,
    pub flashes: Vec<Flash>,
}

/// Book page with its paginated comments
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    pub book: Book,
    pub comments: Page<Comment>,
}
