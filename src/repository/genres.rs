//! Genres repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::GenreStore;
use crate::{
    error::{AppError, AppResult},
    models::Genre,
};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreStore for GenresRepository {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_many(&self, ids: Vec<i32>) -> AppResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE id = ANY($1) ORDER BY name, id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn save(&self, genre: &Genre) -> AppResult<Genre> {
        let mut tx = self.pool.begin().await?;

        let saved = match genre.id {
            None => {
                sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING id, name")
                    .bind(&genre.name)
                    .fetch_one(&mut *tx)
                    .await?
            }
            Some(id) => sqlx::query_as::<_, Genre>(
                "UPDATE genres SET name = $1 WHERE id = $2 RETURNING id, name",
            )
            .bind(&genre.name)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))?,
        };

        tx.commit().await?;
        Ok(saved)
    }

    async fn remove(&self, genre: &Genre) -> AppResult<()> {
        let id = genre
            .id
            .ok_or_else(|| AppError::Validation("Cannot remove an unsaved genre".to_string()))?;

        let mut tx = self.pool.begin().await?;

        let unlinked = sqlx::query("DELETE FROM book_genres WHERE genre_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Genre {} not found", id)));
        }

        tx.commit().await?;
        tracing::debug!("Removed genre id={} ({} book link(s) dropped)", id, unlinked);
        Ok(())
    }
}
