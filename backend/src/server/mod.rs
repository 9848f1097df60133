//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::ingredients::{
    create_ingredient, delete_ingredient, get_ingredient, list_ingredients, rename_ingredient,
};
use crate::inbound::http::recipes::{
    create_recipe, delete_recipe, get_recipe, list_recipes, replace_recipe, update_recipe,
    upload_recipe_image,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::tags::{create_tag, delete_tag, get_tag, list_tags, rename_tag};
use crate::inbound::http::users::{current_user, login, register, update_profile};
use crate::middleware::trace::Trace;
use crate::outbound::media::FsImageStore;
use crate::outbound::persistence::{
    DieselIngredientRepository, DieselRecipeRepository, DieselTagRepository, DieselUserRepository,
};

/// Dependency bundle handed to each worker's app factory.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Assemble the Actix application: session-guarded API scope, trace
/// middleware, health probes, and (in debug builds) Swagger UI.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(register)
        .service(login)
        .service(current_user)
        .service(update_profile)
        .service(list_recipes)
        .service(create_recipe)
        .service(get_recipe)
        .service(replace_recipe)
        .service(update_recipe)
        .service(delete_recipe)
        .service(upload_recipe_image)
        .service(list_tags)
        .service(create_tag)
        .service(get_tag)
        .service(rename_tag)
        .service(delete_tag)
        .service(list_ingredients)
        .service(create_ingredient)
        .service(get_ingredient)
        .service(rename_ingredient)
        .service(delete_ingredient);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Build the handler state from the configured adapters.
///
/// A configured pool selects the Diesel repositories with a filesystem
/// image store rooted at the media directory (default `media`);
/// otherwise fully in-memory adapters serve, which suits tests and
/// local development.
fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    match &config.db_pool {
        Some(pool) => {
            let media_root = config
                .media_root
                .clone()
                .unwrap_or_else(|| std::path::PathBuf::from("media"));
            let images = FsImageStore::open(&media_root)
                .map_err(|err| std::io::Error::other(format!("media root unavailable: {err}")))?;
            Ok(HttpState::new(HttpStatePorts {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                tags: Arc::new(DieselTagRepository::new(pool.clone())),
                ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
                recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
                images: Arc::new(images),
            }))
        }
        None => Ok(HttpState::in_memory()),
    }
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the media root cannot be opened or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        media_root: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
