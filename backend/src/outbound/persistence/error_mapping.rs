//! Shared Diesel and pool error mapping for the persistence adapters.

use tracing::debug;

use crate::domain::ports::{CatalogPersistenceError, UserPersistenceError};

use super::pool::PoolError;

fn log_diesel_error(error: &diesel::result::Error) {
    use diesel::result::Error as DieselError;

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

pub(crate) fn map_pool_error_users(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map Diesel errors for the users table; unique violations are assumed to
/// be the email constraint, the table's only unique column besides the key.
pub(crate) fn map_diesel_error_users(email: &str) -> impl Fn(diesel::result::Error) -> UserPersistenceError {
    let email = email.to_owned();
    move |error| {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        log_diesel_error(&error);
        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                UserPersistenceError::duplicate_email(email.clone())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                UserPersistenceError::connection("database connection error")
            }
            _ => UserPersistenceError::query("database error"),
        }
    }
}

pub(crate) fn map_pool_error_catalog(error: PoolError) -> CatalogPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CatalogPersistenceError::connection(message)
        }
    }
}

pub(crate) fn map_diesel_error_catalog(error: diesel::result::Error) -> CatalogPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CatalogPersistenceError::connection("database connection error")
        }
        _ => CatalogPersistenceError::query("database error"),
    }
}
