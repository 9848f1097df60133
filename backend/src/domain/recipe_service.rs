//! Recipe CRUD with implicit tag and ingredient resolution.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use super::catalog::{Ingredient, Recipe, RecipeDraft, RecipeFilters, RecipePatch, Tag};
use super::catalog_service::{map_persistence_error, map_validation_error};
use super::error::Error;
use super::ports::{
    ImageStore, IngredientRepository, RecipeChanges, RecipeRepository, TagRepository,
};
use super::user::UserId;

/// Recipe operations over the catalogue repositories and image store.
///
/// Tag and ingredient payloads carry names, not ids; unknown names are
/// created for the owner on the fly. The lookup-or-create pair is not
/// serialised against concurrent identical payloads.
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
    tags: Arc<dyn TagRepository>,
    ingredients: Arc<dyn IngredientRepository>,
    images: Arc<dyn ImageStore>,
}

impl RecipeService {
    pub fn new(
        recipes: Arc<dyn RecipeRepository>,
        tags: Arc<dyn TagRepository>,
        ingredients: Arc<dyn IngredientRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            recipes,
            tags,
            ingredients,
            images,
        }
    }

    /// List the owner's recipes, newest first, honouring the id filters.
    pub async fn list(&self, owner: &UserId, filters: &RecipeFilters) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list(owner, filters)
            .await
            .map_err(map_persistence_error)
    }

    /// Fetch one of the owner's recipes.
    pub async fn get(&self, owner: &UserId, id: Uuid) -> Result<Recipe, Error> {
        self.recipes
            .find(owner, id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("recipe not found"))
    }

    /// Create a recipe, resolving tag and ingredient names.
    pub async fn create(&self, owner: &UserId, draft: RecipeDraft) -> Result<Recipe, Error> {
        draft.validate().map_err(map_validation_error)?;
        let tags = self.resolve_tags(owner, &draft.tag_names).await?;
        let ingredients = self.resolve_ingredients(owner, &draft.ingredient_names).await?;
        let recipe = Recipe {
            id: Uuid::new_v4(),
            user_id: *owner,
            title: draft.title,
            time_minutes: draft.time_minutes,
            price: draft.price,
            description: draft.description,
            link: draft.link,
            image: None,
            tags,
            ingredients,
            created_at: Utc::now(),
        };
        self.recipes
            .insert(&recipe)
            .await
            .map_err(map_persistence_error)?;
        Ok(recipe)
    }

    /// Apply a partial update to one of the owner's recipes.
    pub async fn update(
        &self,
        owner: &UserId,
        id: Uuid,
        patch: RecipePatch,
    ) -> Result<Recipe, Error> {
        patch.validate().map_err(map_validation_error)?;
        // A miss must not leave freshly created tags or ingredients
        // behind, so the ownership check comes before name resolution.
        self.recipes
            .find(owner, id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("recipe not found"))?;
        let tags = match &patch.tag_names {
            Some(names) => Some(self.resolve_tags(owner, names).await?),
            None => None,
        };
        let ingredients = match &patch.ingredient_names {
            Some(names) => Some(self.resolve_ingredients(owner, names).await?),
            None => None,
        };
        let changes = RecipeChanges {
            title: patch.title,
            time_minutes: patch.time_minutes,
            price: patch.price,
            description: patch.description,
            link: patch.link,
            tags,
            ingredients,
        };
        self.recipes
            .update(owner, id, changes)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("recipe not found"))
    }

    /// Delete one of the owner's recipes and release its stored image.
    pub async fn delete(&self, owner: &UserId, id: Uuid) -> Result<(), Error> {
        let removed = self
            .recipes
            .delete(owner, id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("recipe not found"))?;
        if let Some(path) = removed.image {
            // The row is already gone; a stale file is not worth a 500.
            if let Err(err) = self.images.remove(&path) {
                warn!(%path, error = %err, "failed to remove recipe image");
            }
        }
        Ok(())
    }

    /// Attach an uploaded image to one of the owner's recipes.
    ///
    /// The bytes must decode as an image; the stored file replaces any
    /// prior upload for the recipe.
    pub async fn attach_image(
        &self,
        owner: &UserId,
        id: Uuid,
        bytes: &[u8],
    ) -> Result<Recipe, Error> {
        let extension = image_extension(bytes)?;
        let current = self.get(owner, id).await?;

        let path = self
            .images
            .save(extension, bytes)
            .map_err(|err| Error::internal(err.to_string()))?;
        let updated = match self.recipes.set_image(owner, id, Some(path.clone())).await {
            Ok(updated) => updated,
            Err(err) => {
                // The write failed, so the fresh file has no owner either.
                if let Err(remove_err) = self.images.remove(&path) {
                    warn!(%path, error = %remove_err, "failed to remove orphaned image");
                }
                return Err(map_persistence_error(err));
            }
        };
        let Some(updated) = updated else {
            // The recipe vanished between the fetch and the write; do not
            // leave the fresh file orphaned.
            if let Err(err) = self.images.remove(&path) {
                warn!(%path, error = %err, "failed to remove orphaned image");
            }
            return Err(Error::not_found("recipe not found"));
        };
        if let Some(previous) = current.image
            && previous != path
            && let Err(err) = self.images.remove(&previous)
        {
            warn!(path = %previous, error = %err, "failed to remove replaced image");
        }
        Ok(updated)
    }

    async fn resolve_tags(&self, owner: &UserId, names: &[String]) -> Result<Vec<Tag>, Error> {
        let mut resolved: Vec<Tag> = Vec::with_capacity(names.len());
        for name in names {
            if resolved.iter().any(|tag| tag.name == *name) {
                continue;
            }
            let tag = match self
                .tags
                .find_by_name(owner, name)
                .await
                .map_err(map_persistence_error)?
            {
                Some(existing) => existing,
                None => {
                    let created = Tag::new(*owner, name.clone()).map_err(map_validation_error)?;
                    self.tags
                        .insert(&created)
                        .await
                        .map_err(map_persistence_error)?;
                    created
                }
            };
            resolved.push(tag);
        }
        Ok(resolved)
    }

    async fn resolve_ingredients(
        &self,
        owner: &UserId,
        names: &[String],
    ) -> Result<Vec<Ingredient>, Error> {
        let mut resolved: Vec<Ingredient> = Vec::with_capacity(names.len());
        for name in names {
            if resolved.iter().any(|ingredient| ingredient.name == *name) {
                continue;
            }
            let ingredient = match self
                .ingredients
                .find_by_name(owner, name)
                .await
                .map_err(map_persistence_error)?
            {
                Some(existing) => existing,
                None => {
                    let created =
                        Ingredient::new(*owner, name.clone()).map_err(map_validation_error)?;
                    self.ingredients
                        .insert(&created)
                        .await
                        .map_err(map_persistence_error)?;
                    created
                }
            };
            resolved.push(ingredient);
        }
        Ok(resolved)
    }
}

/// Decode-check the payload and pick the storage extension.
fn image_extension(bytes: &[u8]) -> Result<&'static str, Error> {
    let rejection = || {
        Error::invalid_request("request body is not a supported image")
            .with_details(json!({ "field": "image" }))
    };
    let format = image::guess_format(bytes).map_err(|_| rejection())?;
    image::load_from_memory_with_format(bytes, format).map_err(|_| rejection())?;
    Ok(format.extensions_str().first().copied().unwrap_or("bin"))
}
