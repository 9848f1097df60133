//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API:
//! every endpoint from the inbound layer, the request and response
//! schemas, and the session cookie security scheme. Swagger UI serves the
//! document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::ingredients::{IngredientRequest, IngredientResponse};
use crate::inbound::http::recipes::{
    NamedEntry, RecipePatchRequest, RecipeResponse, RecipeWriteRequest,
};
use crate::inbound::http::tags::{TagRequest, TagResponse};
use crate::inbound::http::users::{
    LoginRequest, ProfileUpdateRequest, RegisterRequest, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Session-authenticated recipe, tag, and ingredient management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::upload_recipe_image,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::create_tag,
        crate::inbound::http::tags::get_tag,
        crate::inbound::http::tags::rename_tag,
        crate::inbound::http::tags::delete_tag,
        crate::inbound::http::ingredients::list_ingredients,
        crate::inbound::http::ingredients::create_ingredient,
        crate::inbound::http::ingredients::get_ingredient,
        crate::inbound::http::ingredients::rename_ingredient,
        crate::inbound::http::ingredients::delete_ingredient,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        ProfileUpdateRequest,
        UserResponse,
        NamedEntry,
        RecipeWriteRequest,
        RecipePatchRequest,
        RecipeResponse,
        TagRequest,
        TagResponse,
        IngredientRequest,
        IngredientResponse,
    )),
    tags(
        (name = "users", description = "Account registration, login, and profile"),
        (name = "recipes", description = "Recipe management and image upload"),
        (name = "tags", description = "Recipe labels"),
        (name = "ingredients", description = "Recipe components"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
