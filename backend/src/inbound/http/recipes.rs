//! Recipe API handlers.
//!
//! ```text
//! GET /api/v1/recipes?tags=<id,id>&ingredients=<id,id>
//! POST /api/v1/recipes {"title":"Curry","time_minutes":30,"price":"5.99","tags":[{"name":"Dinner"}]}
//! GET/PUT/PATCH/DELETE /api/v1/recipes/{id}
//! POST /api/v1/recipes/{id}/image  (raw image bytes)
//! ```
//!
//! Nested `tags`/`ingredients` carry names; unknown names are created for
//! the caller on the fly. Unknown body fields (including `user`) are
//! silently dropped, so ownership cannot be reassigned through a payload.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Recipe, RecipeDraft, RecipeFilters, RecipePatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::ingredients::IngredientResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tags::TagResponse;
use crate::inbound::http::validation::parse_uuid_list;

/// Nested tag or ingredient reference, addressed by name.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct NamedEntry {
    pub name: String,
}

/// Full recipe body for `POST /api/v1/recipes` and `PUT`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeWriteRequest {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<NamedEntry>,
    #[serde(default)]
    pub ingredients: Vec<NamedEntry>,
}

/// Partial recipe body for `PATCH /api/v1/recipes/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipePatchRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<NamedEntry>>,
    pub ingredients: Option<Vec<NamedEntry>>,
}

/// Query parameters for the recipe list.
#[derive(Debug, Deserialize)]
pub struct RecipeListQuery {
    tags: Option<String>,
    ingredients: Option<String>,
}

/// Public recipe representation with hydrated attachments.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: String,
    pub link: String,
    pub image: Option<String>,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<IngredientResponse>,
    pub created_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            description: recipe.description,
            link: recipe.link,
            image: recipe.image,
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(IngredientResponse::from)
                .collect(),
            created_at: recipe.created_at,
        }
    }
}

fn names(entries: Vec<NamedEntry>) -> Vec<String> {
    entries.into_iter().map(|entry| entry.name).collect()
}

impl From<RecipeWriteRequest> for RecipeDraft {
    fn from(value: RecipeWriteRequest) -> Self {
        Self {
            title: value.title,
            time_minutes: value.time_minutes,
            price: value.price,
            description: value.description,
            link: value.link,
            tag_names: names(value.tags),
            ingredient_names: names(value.ingredients),
        }
    }
}

impl From<RecipePatchRequest> for RecipePatch {
    fn from(value: RecipePatchRequest) -> Self {
        Self {
            title: value.title,
            time_minutes: value.time_minutes,
            price: value.price,
            description: value.description,
            link: value.link,
            tag_names: value.tags.map(names),
            ingredient_names: value.ingredients.map(names),
        }
    }
}

/// A full replace overwrites every writable field, so the body maps onto
/// a patch with every field present.
impl From<RecipeWriteRequest> for RecipePatch {
    fn from(value: RecipeWriteRequest) -> Self {
        Self {
            title: Some(value.title),
            time_minutes: Some(value.time_minutes),
            price: Some(value.price),
            description: Some(value.description),
            link: Some(value.link),
            tag_names: Some(names(value.tags)),
            ingredient_names: Some(names(value.ingredients)),
        }
    }
}

/// List the caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(
        ("tags" = Option<String>, Query, description = "Comma-separated tag UUIDs; any match qualifies"),
        ("ingredients" = Option<String>, Query, description = "Comma-separated ingredient UUIDs; any match qualifies")
    ),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let user_id = session.require_user_id()?;
    let filters = RecipeFilters {
        tag_ids: parse_uuid_list("tags", query.tags.as_deref())?,
        ingredient_ids: parse_uuid_list("ingredients", query.ingredients.as_deref())?,
    };
    let recipes = state.recipes.list(&user_id, &filters).await?;
    Ok(web::Json(
        recipes.into_iter().map(RecipeResponse::from).collect(),
    ))
}

/// Create a recipe for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeWriteRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeWriteRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let recipe = state
        .recipes
        .create(&user_id, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(recipe)))
}

/// Fetch one of the caller's recipes.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = Uuid, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let user_id = session.require_user_id()?;
    let recipe = state.recipes.get(&user_id, id.into_inner()).await?;
    Ok(web::Json(RecipeResponse::from(recipe)))
}

/// Replace one of the caller's recipes wholesale.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    request_body = RecipeWriteRequest,
    params(("id" = Uuid, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Replaced recipe", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe"
)]
#[put("/recipes/{id}")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<RecipeWriteRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let user_id = session.require_user_id()?;
    let recipe = state
        .recipes
        .update(&user_id, id.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(RecipeResponse::from(recipe)))
}

/// Partially update one of the caller's recipes.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    request_body = RecipePatchRequest,
    params(("id" = Uuid, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    payload: web::Json<RecipePatchRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let user_id = session.require_user_id()?;
    let recipe = state
        .recipes
        .update(&user_id, id.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(RecipeResponse::from(recipe)))
}

/// Delete one of the caller's recipes and its stored image.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = Uuid, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.recipes.delete(&user_id, id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Attach an image to one of the caller's recipes.
///
/// The request body carries the raw image bytes; the format is inferred
/// from the payload itself, never from headers or a filename.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/image",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    params(("id" = Uuid, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe with stored image path", body = RecipeResponse),
        (status = 400, description = "Body is not a supported image", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found or not owned", body = crate::domain::Error)
    ),
    tags = ["recipes"],
    operation_id = "uploadRecipeImage"
)]
#[post("/recipes/{id}/image")]
pub async fn upload_recipe_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: web::Bytes,
) -> ApiResult<web::Json<RecipeResponse>> {
    let user_id = session.require_user_id()?;
    let recipe = state
        .recipes
        .attach_image(&user_id, id.into_inner(), &body)
        .await?;
    Ok(web::Json(RecipeResponse::from(recipe)))
}
