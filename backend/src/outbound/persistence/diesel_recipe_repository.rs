//! PostgreSQL-backed `RecipeRepository` implementation.
//!
//! Recipe writes touch the row and both join tables inside one
//! transaction. Id-set filters use `EXISTS` subqueries so a recipe
//! matching through several attachments still appears once.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CatalogPersistenceError, RecipeChanges, RecipeRepository};
use crate::domain::user::UserId;
use crate::domain::{Ingredient, Recipe, RecipeFilters, Tag};

use super::diesel_ingredient_repository::row_to_ingredient;
use super::diesel_tag_repository::row_to_tag;
use super::error_mapping::{map_diesel_error_catalog, map_pool_error_catalog};
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, NewRecipeTagRow, RecipeRow, TagRow,
};
use super::pool::DbPool;
use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Scalar changeset; `None` fields are left untouched by Diesel.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = recipes)]
struct RecipeUpdateRow<'a> {
    title: Option<&'a str>,
    time_minutes: Option<i32>,
    price: Option<rust_decimal::Decimal>,
    description: Option<&'a str>,
    link: Option<&'a str>,
}

impl RecipeUpdateRow<'_> {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.time_minutes.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.link.is_none()
    }
}

async fn load_attachments(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[Uuid],
) -> Result<
    (HashMap<Uuid, Vec<Tag>>, HashMap<Uuid, Vec<Ingredient>>),
    diesel::result::Error,
> {
    let tag_rows: Vec<(Uuid, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;
    let ingredient_rows: Vec<(Uuid, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .select((recipe_ingredients::recipe_id, IngredientRow::as_select()))
        .load(conn)
        .await?;

    let mut tags_by_recipe: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (recipe_id, row) in tag_rows {
        tags_by_recipe.entry(recipe_id).or_default().push(row_to_tag(row));
    }
    let mut ingredients_by_recipe: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
    for (recipe_id, row) in ingredient_rows {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(row_to_ingredient(row));
    }
    Ok((tags_by_recipe, ingredients_by_recipe))
}

async fn hydrate_rows(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, diesel::result::Error> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let (mut tags_by_recipe, mut ingredients_by_recipe) = load_attachments(conn, &ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| Recipe {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            title: row.title,
            time_minutes: row.time_minutes,
            price: row.price,
            description: row.description,
            link: row.link,
            image: row.image,
            tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
            ingredients: ingredients_by_recipe.remove(&row.id).unwrap_or_default(),
            created_at: row.created_at,
        })
        .collect())
}

async fn find_hydrated(
    conn: &mut AsyncPgConnection,
    owner: Uuid,
    id: Uuid,
) -> Result<Option<Recipe>, diesel::result::Error> {
    let row = recipes::table
        .filter(recipes::user_id.eq(owner))
        .filter(recipes::id.eq(id))
        .select(RecipeRow::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut hydrated = hydrate_rows(conn, vec![row]).await?;
    Ok(hydrated.pop())
}

async fn replace_tag_attachments(
    conn: &mut AsyncPgConnection,
    recipe_id: Uuid,
    tags_set: &[Tag],
) -> Result<(), diesel::result::Error> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    let rows: Vec<NewRecipeTagRow> = tags_set
        .iter()
        .map(|tag| NewRecipeTagRow {
            recipe_id,
            tag_id: tag.id,
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

async fn replace_ingredient_attachments(
    conn: &mut AsyncPgConnection,
    recipe_id: Uuid,
    ingredients_set: &[Ingredient],
) -> Result<(), diesel::result::Error> {
    diesel::delete(
        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
    )
    .execute(conn)
    .await?;
    let rows: Vec<NewRecipeIngredientRow> = ingredients_set
        .iter()
        .map(|ingredient| NewRecipeIngredientRow {
            recipe_id,
            ingredient_id: ingredient.id,
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(recipe_ingredients::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn list(
        &self,
        owner: &UserId,
        filters: &RecipeFilters,
    ) -> Result<Vec<Recipe>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let mut query = recipes::table
            .filter(recipes::user_id.eq(owner.as_uuid()))
            .into_boxed();
        if !filters.tag_ids.is_empty() {
            query = query.filter(exists(
                recipe_tags::table
                    .filter(recipe_tags::recipe_id.eq(recipes::id))
                    .filter(recipe_tags::tag_id.eq_any(filters.tag_ids.clone())),
            ));
        }
        if !filters.ingredient_ids.is_empty() {
            query = query.filter(exists(
                recipe_ingredients::table
                    .filter(recipe_ingredients::recipe_id.eq(recipes::id))
                    .filter(recipe_ingredients::ingredient_id.eq_any(filters.ingredient_ids.clone())),
            ));
        }
        let rows = query
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error_catalog)?;
        hydrate_rows(&mut conn, rows)
            .await
            .map_err(map_diesel_error_catalog)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Recipe>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        find_hydrated(&mut conn, *owner.as_uuid(), id)
            .await
            .map_err(map_diesel_error_catalog)
    }

    async fn insert(&self, recipe: &Recipe) -> Result<(), CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let row = NewRecipeRow {
                    id: recipe.id,
                    user_id: *recipe.user_id.as_uuid(),
                    title: &recipe.title,
                    time_minutes: recipe.time_minutes,
                    price: recipe.price,
                    description: &recipe.description,
                    link: &recipe.link,
                    image: recipe.image.as_deref(),
                    created_at: recipe.created_at,
                };
                diesel::insert_into(recipes::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                replace_tag_attachments(conn, recipe.id, &recipe.tags).await?;
                replace_ingredient_attachments(conn, recipe.id, &recipe.ingredients).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error_catalog)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: Uuid,
        changes: RecipeChanges,
    ) -> Result<Option<Recipe>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let owner_id = *owner.as_uuid();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let owned = diesel::select(exists(
                    recipes::table
                        .filter(recipes::user_id.eq(owner_id))
                        .filter(recipes::id.eq(id)),
                ))
                .get_result::<bool>(conn)
                .await?;
                if !owned {
                    return Ok(None);
                }

                let scalar = RecipeUpdateRow {
                    title: changes.title.as_deref(),
                    time_minutes: changes.time_minutes,
                    price: changes.price,
                    description: changes.description.as_deref(),
                    link: changes.link.as_deref(),
                };
                if !scalar.is_empty() {
                    diesel::update(recipes::table.filter(recipes::id.eq(id)))
                        .set(&scalar)
                        .execute(conn)
                        .await?;
                }
                if let Some(tags_set) = &changes.tags {
                    replace_tag_attachments(conn, id, tags_set).await?;
                }
                if let Some(ingredients_set) = &changes.ingredients {
                    replace_ingredient_attachments(conn, id, ingredients_set).await?;
                }
                find_hydrated(conn, owner_id, id).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error_catalog)
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Recipe>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let owner_id = *owner.as_uuid();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let Some(recipe) = find_hydrated(conn, owner_id, id).await? else {
                    return Ok(None);
                };
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(recipes::table.filter(recipes::id.eq(id)))
                    .execute(conn)
                    .await?;
                Ok(Some(recipe))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error_catalog)
    }

    async fn set_image(
        &self,
        owner: &UserId,
        id: Uuid,
        image: Option<String>,
    ) -> Result<Option<Recipe>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let owner_id = *owner.as_uuid();
        let updated = diesel::update(
            recipes::table
                .filter(recipes::user_id.eq(owner_id))
                .filter(recipes::id.eq(id)),
        )
        .set(recipes::image.eq(image.as_deref()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error_catalog)?;
        if updated == 0 {
            return Ok(None);
        }
        find_hydrated(&mut conn, owner_id, id)
            .await
            .map_err(map_diesel_error_catalog)
    }
}
