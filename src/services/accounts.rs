use crate::constants::{ERR_EMPTY_PASSWORD, ERR_USERNAME_TAKEN};
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{User, UserRecord};
use crate::security::{hash_password, verify_password};

/// Password credential store: registration and password checks
#[derive(Clone)]
pub struct Accounts {
    store: Db,
}

impl Accounts {
    pub fn new(store: Db) -> Self {
        Self { store }
    }

    /// Register a new user. Only the Argon2 hash of the password is stored.
    pub async fn add_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<User> {
        let username = User::validate_username(username)?;
        if password.is_empty() {
            return Err(AppError::Validation(ERR_EMPTY_PASSWORD.to_string()));
        }

        // Skip the expensive hash when the name is obviously taken; the
        // UNIQUE constraint still decides races.
        if self.store.find_user_by_username(&username).await?.is_some() {
            tracing::info!("Registration rejected, username taken: {}", username);
            return Err(AppError::Conflict(ERR_USERNAME_TAKEN.to_string()));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await?
            .map_err(AppError::PasswordHash)?;

        let email = email.map(str::trim).filter(|e| !e.is_empty());
        let user = self
            .store
            .insert_user(&username, &password_hash, email)
            .await?;

        tracing::info!("New user registered: {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Check a raw password against the user's stored hash
    pub async fn check_password(&self, user: &UserRecord, password: &str) -> Result<bool> {
        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let valid =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await?;
        Ok(valid)
    }

    /// Resolve a username/password pair to a user, or `None` when either is wrong
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(record) = self.store.find_user_by_username(username).await? else {
            tracing::info!("Login attempt for unknown user");
            return Ok(None);
        };

        if !self.check_password(&record, password).await? {
            tracing::warn!("Invalid password for user {}", record.id);
            return Ok(None);
        }

        Ok(Some(User::from(record)))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .store
            .find_user_by_username(username)
            .await?
            .map(User::from))
    }
}
