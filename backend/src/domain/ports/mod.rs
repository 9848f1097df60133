//! Ports between domain services and outbound adapters.

mod macros;

mod catalog_repository;
mod image_store;
pub mod memory;
mod user_repository;

pub use catalog_repository::{
    CatalogPersistenceError, IngredientRepository, RecipeChanges, RecipeRepository, TagRepository,
};
pub use image_store::{ImageStore, ImageStoreError};
pub use user_repository::{UserPersistenceError, UserRepository};
