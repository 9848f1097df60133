//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend
//! only on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::memory::{MemoryCatalog, MemoryImageStore, MemoryUserRepository};
use crate::domain::ports::{
    ImageStore, IngredientRepository, RecipeRepository, TagRepository, UserRepository,
};
use crate::domain::{AccountService, IngredientService, RecipeService, TagService};

/// Parameter object bundling the repository adapters behind the services.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub images: Arc<dyn ImageStore>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub tags: TagService,
    pub ingredients: IngredientService,
    pub recipes: RecipeService,
}

impl HttpState {
    /// Wire the services over a bundle of repository adapters.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self {
            accounts: AccountService::new(ports.users),
            tags: TagService::new(ports.tags.clone()),
            ingredients: IngredientService::new(ports.ingredients.clone()),
            recipes: RecipeService::new(ports.recipes, ports.tags, ports.ingredients, ports.images),
        }
    }

    /// State backed entirely by in-memory adapters.
    ///
    /// Used when no database is configured and by the HTTP tests.
    pub fn in_memory() -> Self {
        let catalog = Arc::new(MemoryCatalog::new());
        Self::new(HttpStatePorts {
            users: Arc::new(MemoryUserRepository::new()),
            tags: catalog.clone(),
            ingredients: catalog.clone(),
            recipes: catalog,
            images: Arc::new(MemoryImageStore::new()),
        })
    }
}
