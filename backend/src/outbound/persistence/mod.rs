//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Thin adapters only: row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay internal, every database error is mapped onto the
//! domain persistence error types, and connections come from a `bb8` pool
//! driven through `diesel-async`.

mod diesel_ingredient_repository;
mod diesel_recipe_repository;
mod diesel_tag_repository;
mod diesel_user_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_ingredient_repository::DieselIngredientRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
