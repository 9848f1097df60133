//! Domain model and services for the recipe catalogue.

pub mod account_service;
pub mod catalog;
pub mod catalog_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod recipe_service;
pub mod user;

pub use account_service::{AccountService, ProfileUpdate};
pub use catalog::{
    CatalogValidationError, Ingredient, Recipe, RecipeDraft, RecipeFilters, RecipePatch, Tag,
};
pub use catalog_service::{IngredientService, TagService};
pub use error::{Error, ErrorCode};
pub use password::{PasswordError, PasswordHash};
pub use recipe_service::RecipeService;
pub use user::{EmailAddress, User, UserId, UserValidationError};
