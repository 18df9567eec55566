use super::auth::{AuthClaims, JwtKeys, PasswordCredentials};
use super::user_models::{normalize_email, NewUser, User, UserRole};
use super::UserStore;
use anyhow::Context;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User already exists")]
    UserExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token.")]
    InvalidToken,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Registration, login and token checks on top of a [`UserStore`].
#[derive(Clone)]
pub struct UserManager {
    user_store: Arc<dyn UserStore>,
    jwt: JwtKeys,
}

impl UserManager {
    pub fn new(user_store: Arc<dyn UserStore>, jwt: JwtKeys) -> Self {
        Self { user_store, jwt }
    }

    /// Creates the account with its password and returns it with a fresh token.
    pub fn register(&self, new_user: NewUser, password: &str) -> Result<(User, String), AuthError> {
        let email = normalize_email(&new_user.email);
        if self.user_store.get_user_by_email(&email)?.is_some() {
            return Err(AuthError::UserExists);
        }

        let user_id = self.user_store.create_user(&NewUser { email, ..new_user })?;
        let credentials = PasswordCredentials::create(user_id, password)?;
        self.user_store.set_password_credentials(&credentials)?;

        let user = self
            .user_store
            .get_user(user_id)?
            .context("User vanished right after creation")?;
        let token = self.jwt.issue(user.id, user.role)?;
        Ok((user, token))
    }

    pub fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self
            .user_store
            .get_user_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;
        let credentials = self
            .user_store
            .get_password_credentials(user.id)?
            .ok_or(AuthError::InvalidCredentials)?;
        if !credentials.verify(password)? {
            return Err(AuthError::InvalidCredentials);
        }
        let token = self.jwt.issue(user.id, user.role)?;
        Ok((user, token))
    }

    /// Verifies the token and that its user still exists. The role is read
    /// back from the store so demotions take effect immediately.
    pub fn authenticate(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let claims = self.jwt.verify(token).map_err(|_| AuthError::InvalidToken)?;
        let user = self
            .user_store
            .get_user(claims.user_id)?
            .ok_or(AuthError::InvalidToken)?;
        Ok(AuthClaims {
            user_id: user.id,
            role: user.role,
        })
    }

    /// Lifetime of issued tokens, also used for the session cookie.
    pub fn token_ttl(&self) -> std::time::Duration {
        self.jwt.ttl()
    }

    pub fn get_user(&self, user_id: usize) -> anyhow::Result<Option<User>> {
        self.user_store.get_user(user_id)
    }

    /// Makes sure an administrator account with the given email exists,
    /// creating it or promoting the existing user.
    pub fn ensure_admin(&self, name: &str, email: &str, password: &str) -> anyhow::Result<User> {
        let email = normalize_email(email);
        if let Some(user) = self.user_store.get_user_by_email(&email)? {
            if !user.is_admin() {
                info!("Promoting {} to admin", email);
                self.user_store.set_user_role(user.id, UserRole::Admin)?;
            }
            return self
                .user_store
                .get_user(user.id)?
                .context("Admin user vanished");
        }

        info!("Creating admin account {}", email);
        let user_id = self.user_store.create_user(&NewUser {
            name: name.to_string(),
            email,
            role: UserRole::Admin,
            user_type: Default::default(),
            usage_context: Default::default(),
        })?;
        self.user_store
            .set_password_credentials(&PasswordCredentials::create(user_id, password)?)?;
        self.user_store
            .get_user(user_id)?
            .context("Admin user vanished right after creation")
    }
}
