//! Ingredient API handlers, mirroring the tag surface.
//!
//! ```text
//! GET /api/v1/ingredients?assigned_only=1
//! POST /api/v1/ingredients {"name":"Salt"}
//! GET/PATCH/DELETE /api/v1/ingredients/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Ingredient;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_assigned_only;

/// Create or rename request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct IngredientRequest {
    pub name: String,
}

/// Query parameters for the ingredient list.
#[derive(Debug, Deserialize)]
pub struct IngredientListQuery {
    assigned_only: Option<String>,
}

/// Public ingredient representation.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
        }
    }
}

/// List the caller's ingredients, name-descending.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(("assigned_only" = Option<String>, Query, description = "1 restricts to ingredients attached to a recipe")),
    responses(
        (status = 200, description = "Ingredients", body = [IngredientResponse]),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients"
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<IngredientListQuery>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let user_id = session.require_user_id()?;
    let assigned_only = parse_assigned_only(query.assigned_only.as_deref())?;
    let ingredients = state.ingredients.list(&user_id, assigned_only).await?;
    Ok(web::Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

/// Create an ingredient for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/ingredients",
    request_body = IngredientRequest,
    responses(
        (status = 201, description = "Ingredient created", body = IngredientResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["ingredients"],
    operation_id = "createIngredient"
)]
#[post("/ingredients")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<IngredientRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let ingredient = state.ingredients.create(&user_id, &payload.name).await?;
    Ok(HttpResponse::Created().json(IngredientResponse::from(ingredient)))
}

/// Fetch one of the caller's ingredients.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = Uuid, Path, description = "Ingredient identifier")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient"
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let user_id = session.require_user_id()?;
    let ingredient = state.ingredients.get(&user_id, id.into_inner()).await?;
    Ok(web::Json(IngredientResponse::from(ingredient)))
}

/// Rename one of the caller's ingredients.
#[utoipa::path(
    patch,
    path = "/api/v1/ingredients/{id}",
    request_body = IngredientRequest,
    params(("id" = Uuid, Path, description = "Ingredient identifier")),
    responses(
        (status = 200, description = "Renamed ingredient", body = IngredientResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["ingredients"],
    operation_id = "renameIngredient"
)]
#[patch("/ingredients/{id}")]
pub async fn rename_ingredient(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<IngredientRequest>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let user_id = session.require_user_id()?;
    let ingredient = state
        .ingredients
        .rename(&user_id, id.into_inner(), &payload.name)
        .await?;
    Ok(web::Json(IngredientResponse::from(ingredient)))
}

/// Delete one of the caller's ingredients, detaching it from recipes.
#[utoipa::path(
    delete,
    path = "/api/v1/ingredients/{id}",
    params(("id" = Uuid, Path, description = "Ingredient identifier")),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["ingredients"],
    operation_id = "deleteIngredient"
)]
#[delete("/ingredients/{id}")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.ingredients.delete(&user_id, id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
