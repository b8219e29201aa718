//! Comments repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::CommentStore;
use crate::{
    error::{AppError, AppResult},
    models::Comment,
};

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentsRepository {
    async fn list(&self) -> AppResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(
            "SELECT id, book_id, content, email, nick, created_at FROM comments ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_book(&self, book_id: i32) -> AppResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, book_id, content, email, nick, created_at
            FROM comments
            WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Comment>> {
        let row = sqlx::query_as::<_, Comment>(
            "SELECT id, book_id, content, email, nick, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save(&self, comment: &Comment) -> AppResult<Comment> {
        let mut tx = self.pool.begin().await?;

        let saved = match comment.id {
            None => {
                sqlx::query_as::<_, Comment>(
                    r#"
                    INSERT INTO comments (book_id, content, email, nick)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, book_id, content, email, nick, created_at
                    "#,
                )
                .bind(comment.book_id)
                .bind(&comment.content)
                .bind(&comment.email)
                .bind(&comment.nick)
                .fetch_one(&mut *tx)
                .await?
            }
            // book_id and created_at are fixed at creation
            Some(id) => sqlx::query_as::<_, Comment>(
                r#"
                UPDATE comments SET content = $1, email = $2, nick = $3
                WHERE id = $4
                RETURNING id, book_id, content, email, nick, created_at
                "#,
            )
            .bind(&comment.content)
            .bind(&comment.email)
            .bind(&comment.nick)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))?,
        };

        tx.commit().await?;
        Ok(saved)
    }

    async fn remove(&self, comment: &Comment) -> AppResult<()> {
        let id = comment
            .id
            .ok_or_else(|| AppError::Validation("Cannot remove an unsaved comment".to_string()))?;

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", id)));
        }
        Ok(())
    }
}
