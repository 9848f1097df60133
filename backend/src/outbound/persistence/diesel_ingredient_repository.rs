//! PostgreSQL-backed `IngredientRepository` implementation.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::Ingredient;
use crate::domain::ports::{CatalogPersistenceError, IngredientRepository};
use crate::domain::user::UserId;

use super::error_mapping::{map_diesel_error_catalog, map_pool_error_catalog};
use super::models::{IngredientRow, NewIngredientRow};
use super::pool::DbPool;
use super::schema::{ingredients, recipe_ingredients};

/// Diesel-backed implementation of the `IngredientRepository` port.
#[derive(Clone)]
pub struct DieselIngredientRepository {
    pool: DbPool,
}

impl DieselIngredientRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_ingredient(row: IngredientRow) -> Ingredient {
    Ingredient {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
    }
}

#[async_trait]
impl IngredientRepository for DieselIngredientRepository {
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let mut query = ingredients::table
            .filter(ingredients::user_id.eq(owner.as_uuid()))
            .into_boxed();
        if assigned_only {
            query = query.filter(exists(
                recipe_ingredients::table
                    .filter(recipe_ingredients::ingredient_id.eq(ingredients::id)),
            ));
        }
        let rows = query
            .order(ingredients::name.desc())
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error_catalog)?;
        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let row = ingredients::table
            .filter(ingredients::user_id.eq(owner.as_uuid()))
            .filter(ingredients::id.eq(id))
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error_catalog)?;
        Ok(row.map(row_to_ingredient))
    }

    async fn find_by_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let row = ingredients::table
            .filter(ingredients::user_id.eq(owner.as_uuid()))
            .filter(ingredients::name.eq(name))
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error_catalog)?;
        Ok(row.map(row_to_ingredient))
    }

    async fn insert(&self, ingredient: &Ingredient) -> Result<(), CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let row = NewIngredientRow {
            id: ingredient.id,
            user_id: *ingredient.user_id.as_uuid(),
            name: &ingredient.name,
        };
        diesel::insert_into(ingredients::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error_catalog)?;
        Ok(())
    }

    async fn rename(
        &self,
        owner: &UserId,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let row = diesel::update(
            ingredients::table
                .filter(ingredients::user_id.eq(owner.as_uuid()))
                .filter(ingredients::id.eq(id)),
        )
        .set(ingredients::name.eq(name))
        .returning(IngredientRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error_catalog)?;
        Ok(row.map(row_to_ingredient))
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let owner_id = *owner.as_uuid();
        let deleted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let owned = diesel::select(exists(
                        ingredients::table
                            .filter(ingredients::user_id.eq(owner_id))
                            .filter(ingredients::id.eq(id)),
                    ))
                    .get_result::<bool>(conn)
                    .await?;
                    if !owned {
                        return Ok(false);
                    }
                    diesel::delete(
                        recipe_ingredients::table
                            .filter(recipe_ingredients::ingredient_id.eq(id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(ingredients::table.filter(ingredients::id.eq(id)))
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error_catalog)?;
        Ok(deleted)
    }
}
