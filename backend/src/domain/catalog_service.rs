//! Tag and ingredient management scoped to one owner.
//!
//! The two services are deliberately symmetric; keeping them separate
//! avoids a generic abstraction over what are, today, two identical
//! two-field entities that may yet diverge.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use super::catalog::{CatalogValidationError, Ingredient, Tag};
use super::error::Error;
use super::ports::{CatalogPersistenceError, IngredientRepository, TagRepository};
use super::user::UserId;

/// Tag operations over a [`TagRepository`].
#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    /// List the owner's tags, optionally restricted to assigned ones.
    pub async fn list(&self, owner: &UserId, assigned_only: bool) -> Result<Vec<Tag>, Error> {
        self.tags
            .list(owner, assigned_only)
            .await
            .map_err(map_persistence_error)
    }

    /// Fetch one of the owner's tags.
    pub async fn get(&self, owner: &UserId, id: Uuid) -> Result<Tag, Error> {
        self.tags
            .find(owner, id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("tag not found"))
    }

    /// Create a tag for the owner.
    pub async fn create(&self, owner: &UserId, name: &str) -> Result<Tag, Error> {
        let tag = Tag::new(*owner, name).map_err(map_validation_error)?;
        self.tags
            .insert(&tag)
            .await
            .map_err(map_persistence_error)?;
        Ok(tag)
    }

    /// Rename one of the owner's tags.
    pub async fn rename(&self, owner: &UserId, id: Uuid, name: &str) -> Result<Tag, Error> {
        // Validate through the constructor so the rules stay in one place.
        Tag::new(*owner, name).map_err(map_validation_error)?;
        self.tags
            .rename(owner, id, name)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("tag not found"))
    }

    /// Delete one of the owner's tags, detaching it from recipes.
    pub async fn delete(&self, owner: &UserId, id: Uuid) -> Result<(), Error> {
        let deleted = self
            .tags
            .delete(owner, id)
            .await
            .map_err(map_persistence_error)?;
        if !deleted {
            return Err(Error::not_found("tag not found"));
        }
        Ok(())
    }
}

/// Ingredient operations over an [`IngredientRepository`].
#[derive(Clone)]
pub struct IngredientService {
    ingredients: Arc<dyn IngredientRepository>,
}

impl IngredientService {
    pub fn new(ingredients: Arc<dyn IngredientRepository>) -> Self {
        Self { ingredients }
    }

    /// List the owner's ingredients, optionally restricted to assigned ones.
    pub async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, Error> {
        self.ingredients
            .list(owner, assigned_only)
            .await
            .map_err(map_persistence_error)
    }

    /// Fetch one of the owner's ingredients.
    pub async fn get(&self, owner: &UserId, id: Uuid) -> Result<Ingredient, Error> {
        self.ingredients
            .find(owner, id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("ingredient not found"))
    }

    /// Create an ingredient for the owner.
    pub async fn create(&self, owner: &UserId, name: &str) -> Result<Ingredient, Error> {
        let ingredient = Ingredient::new(*owner, name).map_err(map_validation_error)?;
        self.ingredients
            .insert(&ingredient)
            .await
            .map_err(map_persistence_error)?;
        Ok(ingredient)
    }

    /// Rename one of the owner's ingredients.
    pub async fn rename(&self, owner: &UserId, id: Uuid, name: &str) -> Result<Ingredient, Error> {
        Ingredient::new(*owner, name).map_err(map_validation_error)?;
        self.ingredients
            .rename(owner, id, name)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("ingredient not found"))
    }

    /// Delete one of the owner's ingredients, detaching it from recipes.
    pub async fn delete(&self, owner: &UserId, id: Uuid) -> Result<(), Error> {
        let deleted = self
            .ingredients
            .delete(owner, id)
            .await
            .map_err(map_persistence_error)?;
        if !deleted {
            return Err(Error::not_found("ingredient not found"));
        }
        Ok(())
    }
}

pub(crate) fn map_validation_error(err: CatalogValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

pub(crate) fn map_persistence_error(err: CatalogPersistenceError) -> Error {
    Error::internal(err.to_string())
}
