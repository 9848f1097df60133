//! Account registration, authentication, and profile maintenance.

use std::sync::Arc;

use serde_json::json;

use super::error::Error;
use super::password::{PasswordError, PasswordHash};
use super::ports::{UserPersistenceError, UserRepository};
use super::user::{EmailAddress, User, UserId, UserValidationError};

/// Shortest password accepted at registration and profile update.
const MIN_PASSWORD_CHARS: usize = 5;

/// Credentials and profile errors never reveal which check failed.
const BAD_CREDENTIALS: &str = "invalid credentials";

/// Optional profile fields accepted by `PATCH /users/me`.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Orchestrates account flows over a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account with a hashed password.
    pub async fn register(&self, email: &str, name: &str, password: &str) -> Result<User, Error> {
        let email = parse_email(email)?;
        let name = parse_name(name)?;
        let hash = hash_password(password)?;
        let user = User::register(email, name, hash);
        self.users
            .insert(&user)
            .await
            .map_err(map_persistence_error)?;
        Ok(user)
    }

    /// Verify credentials and return the matching active account.
    ///
    /// Every rejection carries the same message so callers cannot probe
    /// which addresses are registered.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        let Ok(email) = EmailAddress::new(email) else {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        };
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::unauthorized(BAD_CREDENTIALS))?;
        if !user.password_hash().verify(password) || !user.is_active() {
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }
        Ok(user)
    }

    /// Fetch the profile behind an authenticated session.
    pub async fn profile(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::unauthorized("session account no longer exists"))
    }

    /// Apply a partial profile update and return the refreshed profile.
    pub async fn update_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<User, Error> {
        let email = update.email.as_deref().map(parse_email).transpose()?;
        let name = update.name.as_deref().map(parse_name).transpose()?;
        let hash = update.password.as_deref().map(hash_password).transpose()?;

        let mut user = self.profile(id).await?;
        user.apply_profile_update(email, name, hash);
        self.users
            .update(&user)
            .await
            .map_err(map_persistence_error)?;
        Ok(user)
    }
}

fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| {
        let message = match err {
            UserValidationError::EmptyEmail => "email must not be empty",
            _ => "email must contain a local part and a domain",
        };
        Error::invalid_request(message).with_details(json!({ "field": "email" }))
    })
}

fn parse_name(raw: &str) -> Result<String, Error> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(
            Error::invalid_request("name must not be empty")
                .with_details(json!({ "field": "name" })),
        );
    }
    Ok(name.to_owned())
}

fn hash_password(raw: &str) -> Result<PasswordHash, Error> {
    if raw.chars().count() < MIN_PASSWORD_CHARS {
        return Err(Error::invalid_request(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        ))
        .with_details(json!({ "field": "password" })));
    }
    PasswordHash::hash(raw).map_err(|err| match err {
        PasswordError::Empty => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password" })),
        PasswordError::Hashing { message } => Error::internal(message),
    })
}

fn map_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::invalid_request("an account with that email already exists")
                .with_details(json!({ "field": "email" }))
        }
        other => Error::internal(other.to_string()),
    }
}
