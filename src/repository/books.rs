//! Books repository: genre-filtered listing and book persistence

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{book::BookRow, Author, Book, Genre},
};

const BOOK_COLUMNS: &str = "b.id, b.author_id, b.title, b.description, b.created_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Attach authors and genres to flat rows, keeping row order
    async fn hydrate(&self, rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let book_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<i32> = rows.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i32, Author> = sqlx::query_as::<_, Author>(
            "SELECT id, surname FROM authors WHERE id = ANY($1)",
        )
        .bind(&author_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .filter_map(|a| a.id.map(|id| (id, a)))
        .collect();

        let links = sqlx::query(
            r#"
            SELECT bg.book_id, g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = ANY($1)
            ORDER BY g.name, g.id
            "#,
        )
        .bind(&book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<i32, Vec<Genre>> = HashMap::new();
        for link in &links {
            genres.entry(link.get("book_id")).or_default().push(Genre {
                id: Some(link.get("id")),
                name: link.get("name"),
            });
        }

        rows.into_iter()
            .map(|row| {
                let author = authors.get(&row.author_id).cloned().ok_or_else(|| {
                    AppError::Internal(format!("Book {} references missing author {}", row.id, row.author_id))
                })?;
                Ok(Book {
                    id: Some(row.id),
                    title: row.title,
                    description: row.description,
                    created_at: Some(row.created_at),
                    author,
                    genres: genres.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn by_genre_like(&self, genre: Option<String>) -> AppResult<Vec<Book>> {
        let genre = genre.filter(|g| !g.is_empty());

        let rows = match genre {
            None => {
                sqlx::query_as::<_, BookRow>(&format!(
                    "SELECT {} FROM books b ORDER BY b.id",
                    BOOK_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
            Some(ref term) => {
                // EXISTS keeps one row per book when several genres match
                sqlx::query_as::<_, BookRow>(&format!(
                    r#"
                    SELECT {} FROM books b
                    WHERE EXISTS (
                        SELECT 1 FROM book_genres bg
                        JOIN genres g ON g.id = bg.genre_id
                        WHERE bg.book_id = b.id AND g.name LIKE $1
                    )
                    ORDER BY b.id
                    "#,
                    BOOK_COLUMNS
                ))
                .bind(format!("%{}%", term))
                .fetch_all(&self.pool)
                .await?
            }
        };

        tracing::debug!("Book listing genre={:?}: {} row(s)", genre, rows.len());
        self.hydrate(rows).await
    }

    async fn by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books b WHERE b.author_id = $1 ORDER BY b.id",
            BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        self.hydrate(rows).await
    }

    async fn by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            SELECT {} FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.id
            "#,
            BOOK_COLUMNS
        ))
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        self.hydrate(rows).await
    }

    async fn find(&self, id: i32) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books b WHERE b.id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn save(&self, book: &Book) -> AppResult<Book> {
        let author_id = book
            .author_id()
            .ok_or_else(|| AppError::Validation("Book author must be saved first".to_string()))?;
        let genre_ids = book.genre_ids();
        if genre_ids.is_empty() {
            return Err(AppError::Validation("A book needs at least one genre".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        // Share lock: a concurrent removal of this author waits for us and then sees the book
        sqlx::query_scalar::<_, i32>("SELECT id FROM authors WHERE id = $1 FOR SHARE")
            .bind(author_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", author_id)))?;

        let row = match book.id {
            None => {
                sqlx::query_as::<_, BookRow>(
                    r#"
                    INSERT INTO books (author_id, title, description)
                    VALUES ($1, $2, $3)
                    RETURNING id, author_id, title, description, created_at
                    "#,
                )
                .bind(author_id)
                .bind(&book.title)
                .bind(&book.description)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => sqlx::query_as::<_, BookRow>(
                r#"
                UPDATE books SET author_id = $1, title = $2, description = $3
                WHERE id = $4
                RETURNING id, author_id, title, description, created_at
                "#,
            )
            .bind(author_id)
            .bind(&book.title)
            .bind(&book.description)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?,
        };

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[])")
            .bind(row.id)
            .bind(&genre_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!("Saved book id={} with genres {:?}", row.id, genre_ids);

        Ok(Book {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            created_at: Some(row.created_at),
            author: book.author.clone(),
            genres: book.genres.clone(),
        })
    }

    async fn remove(&self, book: &Book) -> AppResult<()> {
        let id = book
            .id
            .ok_or_else(|| AppError::Validation("Cannot remove an unsaved book".to_string()))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM comments WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
