//! Authors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::AuthorStore;
use crate::{
    error::{AppError, AppResult},
    models::Author,
};

/// Flash key shown when an author with books is deleted
pub const AUTHOR_HAS_BOOKS: &str = "cant_remove_author_with_books";

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorStore for AuthorsRepository {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT id, surname FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("SELECT id, surname FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, author: &Author) -> AppResult<Author> {
        let mut tx = self.pool.begin().await?;

        let saved = match author.id {
            None => {
                sqlx::query_as::<_, Author>(
                    "INSERT INTO authors (surname) VALUES ($1) RETURNING id, surname",
                )
                .bind(&author.surname)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => sqlx::query_as::<_, Author>(
                "UPDATE authors SET surname = $1 WHERE id = $2 RETURNING id, surname",
            )
            .bind(&author.surname)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?,
        };

        tx.commit().await?;
        tracing::debug!("Saved author id={:?}", saved.id);
        Ok(saved)
    }

    async fn remove(&self, author: &Author) -> AppResult<()> {
        let id = author
            .id
            .ok_or_else(|| AppError::Validation("Cannot remove an unsaved author".to_string()))?;

        let mut tx = self.pool.begin().await?;

        // Book writes take a share lock on their author row, so no book can be
        // attached between the count below and the delete.
        sqlx::query_scalar::<_, i32>("SELECT id FROM authors WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if books > 0 {
            tracing::info!("Refusing to remove author id={} with {} book(s)", id, books);
            return Err(AppError::BusinessRule(AUTHOR_HAS_BOOKS.to_string()));
        }

        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
