//! HTTP inbound adapter exposing the REST endpoints.

pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod session;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

/// Handler result carrying the domain error type, which renders itself
/// through its `ResponseError` implementation.
pub type ApiResult<T> = Result<T, crate::domain::Error>;
