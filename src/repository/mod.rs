//! Repository layer for database operations.
//!
//! Each entity has a store trait (lookups plus the `save`/`remove` pair) and a
//! Postgres implementation. `save` inserts when the entity has no id and
//! updates otherwise; both `save` and `remove` run in a single transaction.

pub mod authors;
pub mod books;
pub mod comments;
pub mod genres;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Author, Book, Comment, Genre, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Author>>;
    async fn find(&self, id: i32) -> AppResult<Option<Author>>;
    async fn save(&self, author: &Author) -> AppResult<Author>;
    /// Fails with a business-rule error while the author still has books
    async fn remove(&self, author: &Author) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Genre>>;
    async fn find(&self, id: i32) -> AppResult<Option<Genre>>;
    /// Genres among `ids` that exist, ordered by name
    async fn find_many(&self, ids: Vec<i32>) -> AppResult<Vec<Genre>>;
    async fn save(&self, genre: &Genre) -> AppResult<Genre>;
    /// Drops the genre's book links along with it
    async fn remove(&self, genre: &Genre) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, or those with a genre whose name contains `genre` (SQL `LIKE`)
    async fn by_genre_like(&self, genre: Option<String>) -> AppResult<Vec<Book>>;
    async fn by_author(&self, author_id: i32) -> AppResult<Vec<Book>>;
    async fn by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>>;
    async fn find(&self, id: i32) -> AppResult<Option<Book>>;
    /// Stores the book row and replaces its genre links
    async fn save(&self, book: &Book) -> AppResult<Book>;
    /// Drops the book's genre links and comments along with it
    async fn remove(&self, book: &Book) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Comment>>;
    async fn by_book(&self, book_id: i32) -> AppResult<Vec<Comment>>;
    async fn find(&self, id: i32) -> AppResult<Option<Comment>>;
    async fn save(&self, comment: &Comment) -> AppResult<Comment>;
    async fn remove(&self, comment: &Comment) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn count(&self) -> AppResult<i64>;
    async fn find(&self, id: i32) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn save(&self, user: &User) -> AppResult<User>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub comments: comments::CommentsRepository,
    pub genres: genres::GenresRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            comments: comments::CommentsRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
