//! User account model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::password::PasswordHash;

/// Validation errors raised by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmptyName,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must have the form local@domain"),
            Self::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-validated UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse a [`UserId`] from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated email address.
///
/// ## Invariants
/// - Non-empty, with a non-empty local part and domain separated by `@`.
/// - The domain part is lowercased on construction; the local part keeps
///   its casing (`Test2@EXAMPLE.com` normalises to `Test2@example.com`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let (local, domain) = raw
            .rsplit_once('@')
            .ok_or(UserValidationError::InvalidEmail)?;
        if local.is_empty() || domain.is_empty() {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(format!("{local}@{}", domain.to_lowercase())))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user account.
///
/// ## Invariants
/// - `email` is unique across accounts (enforced by the user repository).
/// - The password is only ever held as an Argon2id hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: String,
    password_hash: PasswordHash,
    is_active: bool,
    is_staff: bool,
    date_joined: DateTime<Utc>,
}

impl User {
    /// Create a regular account.
    pub fn register(email: EmailAddress, name: impl Into<String>, password_hash: PasswordHash) -> Self {
        Self {
            id: UserId::random(),
            email,
            name: name.into(),
            password_hash,
            is_active: true,
            is_staff: false,
            date_joined: Utc::now(),
        }
    }

    /// Create a superuser account with the elevated flags set.
    pub fn register_superuser(email: EmailAddress, password_hash: PasswordHash) -> Self {
        let mut user = Self::register(email, String::new(), password_hash);
        user.is_staff = true;
        user
    }

    /// Rehydrate an account from stored fields.
    #[expect(clippy::too_many_arguments, reason = "storage-layer constructor")]
    pub fn from_parts(
        id: UserId,
        email: EmailAddress,
        name: String,
        password_hash: PasswordHash,
        is_active: bool,
        is_staff: bool,
        date_joined: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            is_active,
            is_staff,
            date_joined,
        }
    }

    /// Stable account identifier.
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised login email.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argon2id hash of the account password.
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether the account may authenticate.
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether the account has staff privileges.
    pub const fn is_staff(&self) -> bool {
        self.is_staff
    }

    /// Account creation timestamp.
    pub const fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    /// Replace the profile fields that `PATCH /users/me` may change.
    pub fn apply_profile_update(
        &mut self,
        email: Option<EmailAddress>,
        name: Option<String>,
        password_hash: Option<PasswordHash>,
    ) {
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
    }
}
