//! Users repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::UserStore;
use crate::{
    error::{AppError, AppResult},
    models::User,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find(&self, id: i32) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            "SELECT id, email, password, roles FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            "SELECT id, email, password, roles FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;

        let saved = match user.id {
            None => {
                sqlx::query_as::<_, User>(
                    r#"
                    INSERT INTO users (email, password, roles)
                    VALUES ($1, $2, $3)
                    RETURNING id, email, password, roles
                    "#,
                )
                .bind(&user.email)
                .bind(&user.password)
                .bind(&user.roles)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => sqlx::query_as::<_, User>(
                r#"
                UPDATE users SET email = $1, password = $2, roles = $3
                WHERE id = $4
                RETURNING id, email, password, roles
                "#,
            )
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.roles)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?,
        };

        tx.commit().await?;
        Ok(saved)
    }
}
