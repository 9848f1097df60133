//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::user::{EmailAddress, User, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique email constraint was violated.
        DuplicateEmail { email: String } => "an account with email {email} already exists",
    }
}

/// Durable storage for user accounts, keyed by id with a unique email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account by its normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Persist changed profile fields for an existing account.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;
}
