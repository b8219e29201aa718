//! Initial data loaded on first start

use super::auth::AuthService;
use crate::{
    error::AppResult,
    models::{
        user::{ROLE_ADMIN, ROLE_USER},
        User,
    },
};

impl AuthService {
    /// Create the configured admin account when no user exists yet.
    ///
    /// Returns the created account, or `None` when users were already present.
    pub async fn seed_admin(&self) -> AppResult<Option<User>> {
        if self.users.count().await? > 0 {
            tracing::debug!("Users present, skipping admin seed");
            return Ok(None);
        }

        let admin = User {
            id: None,
            email: self.config.admin_email.clone(),
            password: self.hash_password(&self.config.admin_password)?,
            roles: vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()],
        };
        let admin = self.users.save(&admin).await?;
        tracing::info!("Seeded admin account {}", admin.email);
        Ok(Some(admin))
    }
}
