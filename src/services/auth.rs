//! Authentication and admin account service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        form::{validate_form, FormErrors},
        user::{CredentialsForm, UserClaims, ROLE_ADMIN},
        User,
    },
    repository::UserStore,
};

/// Flash key shown when the current password does not match
pub const INVALID_CONFIRM_PASSWORD: &str = "invalid_confirm_password";

#[derive(Clone)]
pub struct AuthService {
    pub(super) users: Arc<dyn UserStore>,
    pub(super) config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Authenticate by email and password, returning a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::warn!("Failed login for {}", email);
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.email);
        Ok((token, user))
    }

    /// Account behind a token
    pub async fn current_user(&self, claims: &UserClaims) -> AppResult<User> {
        self.users
            .find(claims.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", claims.user_id)))
    }

    /// Replace the caller's email and password.
    ///
    /// `confirm` must match the password currently stored; otherwise nothing
    /// changes and a business-rule error carrying the flash key is returned.
    pub async fn update_credentials(
        &self,
        caller: &UserClaims,
        form: CredentialsForm,
    ) -> AppResult<User> {
        caller.require_admin()?;
        validate_form(&form)?;

        let mut user = self.current_user(caller).await?;
        // Stored roles win over the token's
        if !user.has_role(ROLE_ADMIN) {
            return Err(AppError::Authorization("Administrator privileges required".to_string()));
        }
        if !self.verify_password(&user, &form.confirm)? {
            tracing::warn!("Credentials update for {} rejected: wrong confirmation", user.email);
            return Err(AppError::BusinessRule(INVALID_CONFIRM_PASSWORD.to_string()));
        }

        if let Some(other) = self.users.find_by_email(&form.email).await? {
            if other.id != user.id {
                let mut errors = FormErrors::new();
                errors.add("email", "This email is already used by another account");
                errors.into_result(&form)?;
            }
        }

        user.email = form.email;
        user.password = self.hash_password(&form.password)?;
        let user = self.users.save(&user).await?;
        tracing::info!("Credentials updated for user id={:?}", user.id);
        Ok(user)
    }

    /// Create a signed JWT for a stored user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::Internal("Cannot issue a token for an unsaved user".to_string()))?;

        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id,
            roles: user.roles.clone(),
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Decode and check a bearer token
    pub fn decode_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
