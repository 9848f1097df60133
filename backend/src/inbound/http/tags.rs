//! Tag API handlers.
//!
//! ```text
//! GET /api/v1/tags?assigned_only=1
//! POST /api/v1/tags {"name":"Dessert"}
//! GET/PATCH/DELETE /api/v1/tags/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Tag;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_assigned_only;

/// Create or rename request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TagRequest {
    pub name: String,
}

/// Query parameters for the tag list.
#[derive(Debug, Deserialize)]
pub struct TagListQuery {
    assigned_only: Option<String>,
}

/// Public tag representation; ownership stays implicit in the session.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// List the caller's tags, name-descending.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    params(("assigned_only" = Option<String>, Query, description = "1 restricts to tags attached to a recipe")),
    responses(
        (status = 200, description = "Tags", body = [TagResponse]),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<TagListQuery>,
) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let user_id = session.require_user_id()?;
    let assigned_only = parse_assigned_only(query.assigned_only.as_deref())?;
    let tags = state.tags.list(&user_id, assigned_only).await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// Create a tag for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["tags"],
    operation_id = "createTag"
)]
#[post("/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TagRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let tag = state.tags.create(&user_id, &payload.name).await?;
    Ok(HttpResponse::Created().json(TagResponse::from(tag)))
}

/// Fetch one of the caller's tags.
#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(("id" = Uuid, Path, description = "Tag identifier")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["tags"],
    operation_id = "getTag"
)]
#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<TagResponse>> {
    let user_id = session.require_user_id()?;
    let tag = state.tags.get(&user_id, id.into_inner()).await?;
    Ok(web::Json(TagResponse::from(tag)))
}

/// Rename one of the caller's tags.
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{id}",
    request_body = TagRequest,
    params(("id" = Uuid, Path, description = "Tag identifier")),
    responses(
        (status = 200, description = "Renamed tag", body = TagResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["tags"],
    operation_id = "renameTag"
)]
#[patch("/tags/{id}")]
pub async fn rename_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<TagRequest>,
) -> ApiResult<web::Json<TagResponse>> {
    let user_id = session.require_user_id()?;
    let tag = state
        .tags
        .rename(&user_id, id.into_inner(), &payload.name)
        .await?;
    Ok(web::Json(TagResponse::from(tag)))
}

/// Delete one of the caller's tags, detaching it from recipes.
#[utoipa::path(
    delete,
    path = "/api/v1/tags/{id}",
    params(("id" = Uuid, Path, description = "Tag identifier")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["tags"],
    operation_id = "deleteTag"
)]
#[delete("/tags/{id}")]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.tags.delete(&user_id, id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
