//! Ports for catalogue persistence adapters.
//!
//! Every operation takes the owning [`UserId`] and scopes its work to that
//! user's rows before any identifier lookup, so an id owned by a different
//! user behaves exactly like a missing row.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::catalog::{Ingredient, Recipe, RecipeFilters, Tag};
use crate::domain::user::UserId;

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalogue repository adapters.
    pub enum CatalogPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
    }
}

/// Storage for user-owned tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List the owner's tags, descending by name. With `assigned_only` the
    /// result is restricted to tags attached to at least one of the
    /// owner's recipes, each tag appearing at most once.
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, CatalogPersistenceError>;

    /// Fetch one of the owner's tags by id.
    async fn find(&self, owner: &UserId, id: Uuid) -> Result<Option<Tag>, CatalogPersistenceError>;

    /// Fetch one of the owner's tags by exact name.
    async fn find_by_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<Tag>, CatalogPersistenceError>;

    /// Insert a new tag.
    async fn insert(&self, tag: &Tag) -> Result<(), CatalogPersistenceError>;

    /// Rename one of the owner's tags; `None` when the id is not owned.
    async fn rename(
        &self,
        owner: &UserId,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Tag>, CatalogPersistenceError>;

    /// Delete one of the owner's tags; `false` when the id is not owned.
    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatalogPersistenceError>;
}

/// Storage for user-owned ingredients; mirrors [`TagRepository`].
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, CatalogPersistenceError>;

    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError>;

    async fn find_by_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError>;

    async fn insert(&self, ingredient: &Ingredient) -> Result<(), CatalogPersistenceError>;

    async fn rename(
        &self,
        owner: &UserId,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError>;

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatalogPersistenceError>;
}

/// Scalar field changes plus optional wholesale replacement of the
/// attached tag and ingredient sets.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub ingredients: Option<Vec<Ingredient>>,
}

/// Storage for user-owned recipes and their attachment sets.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// List the owner's recipes, newest first, applying the id-set
    /// filters. A recipe matching a filter through several attachments
    /// appears exactly once.
    async fn list(
        &self,
        owner: &UserId,
        filters: &RecipeFilters,
    ) -> Result<Vec<Recipe>, CatalogPersistenceError>;

    /// Fetch one of the owner's recipes with its attachments.
    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Recipe>, CatalogPersistenceError>;

    /// Insert a recipe together with its attachment rows.
    async fn insert(&self, recipe: &Recipe) -> Result<(), CatalogPersistenceError>;

    /// Apply changes to one of the owner's recipes; `None` when the id is
    /// not owned.
    async fn update(
        &self,
        owner: &UserId,
        id: Uuid,
        changes: RecipeChanges,
    ) -> Result<Option<Recipe>, CatalogPersistenceError>;

    /// Delete one of the owner's recipes, returning the removed recipe so
    /// callers can release its stored image.
    async fn delete(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Recipe>, CatalogPersistenceError>;

    /// Replace the stored image reference; `None` when the id is not owned.
    async fn set_image(
        &self,
        owner: &UserId,
        id: Uuid,
        image: Option<String>,
    ) -> Result<Option<Recipe>, CatalogPersistenceError>;
}
