//! PostgreSQL-backed `TagRepository` implementation.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::Tag;
use crate::domain::ports::{CatalogPersistenceError, TagRepository};
use crate::domain::user::UserId;

use super::error_mapping::{map_diesel_error_catalog, map_pool_error_catalog};
use super::models::{NewTagRow, TagRow};
use super::pool::DbPool;
use super::schema::{recipe_tags, tags};

/// Diesel-backed implementation of the `TagRepository` port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn row_to_tag(row: TagRow) -> Tag {
    Tag {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        name: row.name,
    }
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let mut query = tags::table
            .filter(tags::user_id.eq(owner.as_uuid()))
            .into_boxed();
        if assigned_only {
            // EXISTS dedups without DISTINCT over the join.
            query = query.filter(exists(
                recipe_tags::table.filter(recipe_tags::tag_id.eq(tags::id)),
            ));
        }
        let rows = query
            .order(tags::name.desc())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error_catalog)?;
        Ok(rows.into_iter().map(row_to_tag).collect())
    }

    async fn find(&self, owner: &UserId, id: Uuid) -> Result<Option<Tag>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let row = tags::table
            .filter(tags::user_id.eq(owner.as_uuid()))
            .filter(tags::id.eq(id))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error_catalog)?;
        Ok(row.map(row_to_tag))
    }

    async fn find_by_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<Tag>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let row = tags::table
            .filter(tags::user_id.eq(owner.as_uuid()))
            .filter(tags::name.eq(name))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error_catalog)?;
        Ok(row.map(row_to_tag))
    }

    async fn insert(&self, tag: &Tag) -> Result<(), CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let row = NewTagRow {
            id: tag.id,
            user_id: *tag.user_id.as_uuid(),
            name: &tag.name,
        };
        diesel::insert_into(tags::table)
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
    ) -> Result<Option<Tag>, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let row = diesel::update(
            tags::table
                .filter(tags::user_id.eq(owner.as_uuid()))
                .filter(tags::id.eq(id)),
        )
        .set(tags::name.eq(name))
        .returning(TagRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error_catalog)?;
        Ok(row.map(row_to_tag))
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatalogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error_catalog)?;
        let owner_id = *owner.as_uuid();
        // Ownership is checked before any attachment row is touched, and
        // both deletes share one transaction.
        let deleted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let owned = diesel::select(exists(
                        tags::table
                            .filter(tags::user_id.eq(owner_id))
                            .filter(tags::id.eq(id)),
                    ))
                    .get_result::<bool>(conn)
                    .await?;
                    if !owned {
                        return Ok(false);
                    }
                    diesel::delete(recipe_tags::table.filter(recipe_tags::tag_id.eq(id)))
                        .execute(conn)
                        .await?;
                    diesel::delete(tags::table.filter(tags::id.eq(id)))
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
