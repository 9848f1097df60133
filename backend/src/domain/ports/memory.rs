//! In-memory port adapters.
//!
//! These back the server when no database is configured and give the
//! integration tests a fast, deterministic persistence layer. Catalogue
//! state is held relationally: recipes store attachment id sets, so tag
//! renames surface in recipe payloads and deletes detach cleanly.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::catalog::{Ingredient, Recipe, RecipeFilters, Tag};
use crate::domain::user::{EmailAddress, User, UserId};

use super::catalog_repository::{
    CatalogPersistenceError, IngredientRepository, RecipeChanges, RecipeRepository, TagRepository,
};
use super::image_store::{ImageStore, ImageStoreError};
use super::user_repository::{UserPersistenceError, UserRepository};

/// Map-backed [`UserRepository`].
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, User>> {
        match self.users.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("user store mutex"),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock();
        if users.values().any(|existing| existing.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        users.insert(*user.id().as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().get(id.as_uuid()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock();
        let taken = users
            .values()
            .any(|existing| existing.id() != user.id() && existing.email() == user.email());
        if taken {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        users.insert(*user.id().as_uuid(), user.clone());
        Ok(())
    }
}

/// Recipe row with attachments kept as id sets.
#[derive(Debug, Clone)]
struct RecipeRow {
    id: Uuid,
    user_id: UserId,
    title: String,
    time_minutes: i32,
    price: Decimal,
    description: String,
    link: String,
    image: Option<String>,
    tag_ids: Vec<Uuid>,
    ingredient_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CatalogState {
    tags: HashMap<Uuid, Tag>,
    ingredients: HashMap<Uuid, Ingredient>,
    recipes: HashMap<Uuid, RecipeRow>,
}

impl CatalogState {
    fn hydrate(&self, row: &RecipeRow) -> Recipe {
        let tags = row
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect();
        let ingredients = row
            .ingredient_ids
            .iter()
            .filter_map(|id| self.ingredients.get(id).cloned())
            .collect();
        Recipe {
            id: row.id,
            user_id: row.user_id,
            title: row.title.clone(),
            time_minutes: row.time_minutes,
            price: row.price,
            description: row.description.clone(),
            link: row.link.clone(),
            image: row.image.clone(),
            tags,
            ingredients,
            created_at: row.created_at,
        }
    }
}

/// Map-backed adapter implementing all three catalogue repository ports.
///
/// A single mutex guards the whole state so multi-table operations such as
/// tag deletion stay atomic.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: Mutex<CatalogState>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("catalogue store mutex"),
        }
    }
}

fn sort_by_name_descending<T, F>(items: &mut [T], name: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| name(b).cmp(name(a)));
}

#[async_trait]
impl TagRepository for MemoryCatalog {
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Tag>, CatalogPersistenceError> {
        let state = self.lock();
        let mut tags: Vec<Tag> = state
            .tags
            .values()
            .filter(|tag| tag.user_id == *owner)
            .filter(|tag| {
                !assigned_only
                    || state
                        .recipes
                        .values()
                        .any(|row| row.user_id == *owner && row.tag_ids.contains(&tag.id))
            })
            .cloned()
            .collect();
        sort_by_name_descending(&mut tags, |tag| &tag.name);
        Ok(tags)
    }

    async fn find(&self, owner: &UserId, id: Uuid) -> Result<Option<Tag>, CatalogPersistenceError> {
        Ok(self
            .lock()
            .tags
            .get(&id)
            .filter(|tag| tag.user_id == *owner)
            .cloned())
    }

    async fn find_by_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<Tag>, CatalogPersistenceError> {
        Ok(self
            .lock()
            .tags
            .values()
            .find(|tag| tag.user_id == *owner && tag.name == name)
            .cloned())
    }

    async fn insert(&self, tag: &Tag) -> Result<(), CatalogPersistenceError> {
        self.lock().tags.insert(tag.id, tag.clone());
        Ok(())
    }

    async fn rename(
        &self,
        owner: &UserId,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Tag>, CatalogPersistenceError> {
        let mut state = self.lock();
        let Some(tag) = state.tags.get_mut(&id).filter(|tag| tag.user_id == *owner) else {
            return Ok(None);
        };
        tag.name = name.to_owned();
        Ok(Some(tag.clone()))
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatalogPersistenceError> {
        let mut state = self.lock();
        let owned = state
            .tags
            .get(&id)
            .is_some_and(|tag| tag.user_id == *owner);
        if !owned {
            return Ok(false);
        }
        state.tags.remove(&id);
        for row in state.recipes.values_mut() {
            row.tag_ids.retain(|tag_id| *tag_id != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl IngredientRepository for MemoryCatalog {
    async fn list(
        &self,
        owner: &UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, CatalogPersistenceError> {
        let state = self.lock();
        let mut ingredients: Vec<Ingredient> = state
            .ingredients
            .values()
            .filter(|ingredient| ingredient.user_id == *owner)
            .filter(|ingredient| {
                !assigned_only
                    || state.recipes.values().any(|row| {
                        row.user_id == *owner && row.ingredient_ids.contains(&ingredient.id)
                    })
            })
            .cloned()
            .collect();
        sort_by_name_descending(&mut ingredients, |ingredient| &ingredient.name);
        Ok(ingredients)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError> {
        Ok(self
            .lock()
            .ingredients
            .get(&id)
            .filter(|ingredient| ingredient.user_id == *owner)
            .cloned())
    }

    async fn find_by_name(
        &self,
        owner: &UserId,
        name: &str,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError> {
        Ok(self
            .lock()
            .ingredients
            .values()
            .find(|ingredient| ingredient.user_id == *owner && ingredient.name == name)
            .cloned())
    }

    async fn insert(&self, ingredient: &Ingredient) -> Result<(), CatalogPersistenceError> {
        self.lock()
            .ingredients
            .insert(ingredient.id, ingredient.clone());
        Ok(())
    }

    async fn rename(
        &self,
        owner: &UserId,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Ingredient>, CatalogPersistenceError> {
        let mut state = self.lock();
        let Some(ingredient) = state
            .ingredients
            .get_mut(&id)
            .filter(|ingredient| ingredient.user_id == *owner)
        else {
            return Ok(None);
        };
        ingredient.name = name.to_owned();
        Ok(Some(ingredient.clone()))
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, CatalogPersistenceError> {
        let mut state = self.lock();
        let owned = state
            .ingredients
            .get(&id)
            .is_some_and(|ingredient| ingredient.user_id == *owner);
        if !owned {
            return Ok(false);
        }
        state.ingredients.remove(&id);
        for row in state.recipes.values_mut() {
            row.ingredient_ids.retain(|ingredient_id| *ingredient_id != id);
        }
        Ok(true)
    }
}

fn matches_filters(row: &RecipeRow, filters: &RecipeFilters) -> bool {
    let tag_hit = filters.tag_ids.is_empty()
        || filters.tag_ids.iter().any(|id| row.tag_ids.contains(id));
    let ingredient_hit = filters.ingredient_ids.is_empty()
        || filters
            .ingredient_ids
            .iter()
            .any(|id| row.ingredient_ids.contains(id));
    tag_hit && ingredient_hit
}

#[async_trait]
impl RecipeRepository for MemoryCatalog {
    async fn list(
        &self,
        owner: &UserId,
        filters: &RecipeFilters,
    ) -> Result<Vec<Recipe>, CatalogPersistenceError> {
        let state = self.lock();
        let mut rows: Vec<&RecipeRow> = state
            .recipes
            .values()
            .filter(|row| row.user_id == *owner && matches_filters(row, filters))
            .collect();
        // Newest first; id breaks timestamp ties deterministically.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows.into_iter().map(|row| state.hydrate(row)).collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Recipe>, CatalogPersistenceError> {
        let state = self.lock();
        Ok(state
            .recipes
            .get(&id)
            .filter(|row| row.user_id == *owner)
            .map(|row| state.hydrate(row)))
    }

    async fn insert(&self, recipe: &Recipe) -> Result<(), CatalogPersistenceError> {
        let mut state = self.lock();
        for tag in &recipe.tags {
            state.tags.entry(tag.id).or_insert_with(|| tag.clone());
        }
        for ingredient in &recipe.ingredients {
            state
                .ingredients
                .entry(ingredient.id)
                .or_insert_with(|| ingredient.clone());
        }
        let row = RecipeRow {
            id: recipe.id,
            user_id: recipe.user_id,
            title: recipe.title.clone(),
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            description: recipe.description.clone(),
            link: recipe.link.clone(),
            image: recipe.image.clone(),
            tag_ids: recipe.tags.iter().map(|tag| tag.id).collect(),
            ingredient_ids: recipe
                .ingredients
                .iter()
                .map(|ingredient| ingredient.id)
                .collect(),
            created_at: recipe.created_at,
        };
        state.recipes.insert(row.id, row);
        Ok(())
    }

    async fn update(
        &self,
        owner: &UserId,
        id: Uuid,
        changes: RecipeChanges,
    ) -> Result<Option<Recipe>, CatalogPersistenceError> {
        let mut state = self.lock();
        if let Some(tags) = &changes.tags {
            for tag in tags {
                state.tags.entry(tag.id).or_insert_with(|| tag.clone());
            }
        }
        if let Some(ingredients) = &changes.ingredients {
            for ingredient in ingredients {
                state
                    .ingredients
                    .entry(ingredient.id)
                    .or_insert_with(|| ingredient.clone());
            }
        }
        let Some(row) = state
            .recipes
            .get_mut(&id)
            .filter(|row| row.user_id == *owner)
        else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(time_minutes) = changes.time_minutes {
            row.time_minutes = time_minutes;
        }
        if let Some(price) = changes.price {
            row.price = price;
        }
        if let Some(description) = changes.description {
            row.description = description;
        }
        if let Some(link) = changes.link {
            row.link = link;
        }
        if let Some(tags) = changes.tags {
            row.tag_ids = tags.iter().map(|tag| tag.id).collect();
        }
        if let Some(ingredients) = changes.ingredients {
            row.ingredient_ids = ingredients
                .iter()
                .map(|ingredient| ingredient.id)
                .collect();
        }
        let row = row.clone();
        Ok(Some(state.hydrate(&row)))
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<Recipe>, CatalogPersistenceError> {
        let mut state = self.lock();
        let owned = state
            .recipes
            .get(&id)
            .is_some_and(|row| row.user_id == *owner);
        if !owned {
            return Ok(None);
        }
        let Some(row) = state.recipes.remove(&id) else {
            return Ok(None);
        };
        Ok(Some(state.hydrate(&row)))
    }

    async fn set_image(
        &self,
        owner: &UserId,
        id: Uuid,
        image: Option<String>,
    ) -> Result<Option<Recipe>, CatalogPersistenceError> {
        let mut state = self.lock();
        let Some(row) = state
            .recipes
            .get_mut(&id)
            .filter(|row| row.user_id == *owner)
        else {
            return Ok(None);
        };
        row.image = image;
        let row = row.clone();
        Ok(Some(state.hydrate(&row)))
    }
}

/// Map-backed [`ImageStore`] for database-free deployments and tests.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored bytes for a path, if any.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().get(path).cloned()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        match self.blobs.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("image store mutex"),
        }
    }
}

impl ImageStore for MemoryImageStore {
    fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, ImageStoreError> {
        let path = format!("recipe/{}.{extension}", Uuid::new_v4());
        self.lock().insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    fn remove(&self, path: &str) -> Result<(), ImageStoreError> {
        self.lock().remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::password::PasswordHash;

    fn owner() -> UserId {
        UserId::random()
    }

    fn tag(owner: UserId, name: &str) -> Tag {
        Tag::new(owner, name).expect("valid tag name")
    }

    fn recipe(owner: UserId, title: &str, tags: Vec<Tag>) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            user_id: owner,
            title: title.to_owned(),
            time_minutes: 5,
            price: Decimal::new(250, 2),
            description: String::new(),
            link: String::new(),
            image: None,
            tags,
            ingredients: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[actix_rt::test]
    async fn duplicate_email_is_rejected() {
        let repo = MemoryUserRepository::new();
        let email = EmailAddress::new("cook@example.com").expect("email");
        let hash = PasswordHash::from_stored("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA");
        let first = User::register(email.clone(), "First", hash.clone());
        let second = User::register(email, "Second", hash);

        repo.insert(&first).await.expect("first insert");
        let err = repo.insert(&second).await.expect_err("duplicate");
        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[actix_rt::test]
    async fn tags_are_isolated_per_user_and_sorted() {
        let catalog = MemoryCatalog::new();
        let alice = owner();
        let bob = owner();
        for name in ["Vegan", "Dessert"] {
            TagRepository::insert(&catalog, &tag(alice, name))
                .await
                .expect("insert");
        }
        TagRepository::insert(&catalog, &tag(bob, "Breakfast"))
            .await
            .expect("insert");

        let names: Vec<String> = TagRepository::list(&catalog, &alice, false)
            .await
            .expect("list")
            .into_iter()
            .map(|tag| tag.name)
            .collect();
        assert_eq!(names, vec!["Vegan".to_owned(), "Dessert".to_owned()]);
    }

    #[actix_rt::test]
    async fn assigned_only_restricts_to_attached_tags() {
        let catalog = MemoryCatalog::new();
        let alice = owner();
        let attached = tag(alice, "Dinner");
        let dangling = tag(alice, "Unused");
        TagRepository::insert(&catalog, &attached).await.expect("insert");
        TagRepository::insert(&catalog, &dangling).await.expect("insert");
        RecipeRepository::insert(&catalog, &recipe(alice, "Curry", vec![attached.clone()]))
            .await
            .expect("insert");

        let listed = TagRepository::list(&catalog, &alice, true)
            .await
            .expect("list");
        assert_eq!(listed, vec![attached]);
    }

    #[actix_rt::test]
    async fn deleting_a_tag_detaches_it_from_recipes() {
        let catalog = MemoryCatalog::new();
        let alice = owner();
        let dinner = tag(alice, "Dinner");
        TagRepository::insert(&catalog, &dinner).await.expect("insert");
        let created = recipe(alice, "Curry", vec![dinner.clone()]);
        RecipeRepository::insert(&catalog, &created).await.expect("insert");

        assert!(TagRepository::delete(&catalog, &alice, dinner.id)
            .await
            .expect("delete"));
        let fetched = RecipeRepository::find(&catalog, &alice, created.id)
            .await
            .expect("find")
            .expect("recipe survives");
        assert!(fetched.tags.is_empty());
    }

    #[actix_rt::test]
    async fn recipe_filters_are_anded_across_fields() {
        let catalog = MemoryCatalog::new();
        let alice = owner();
        let dinner = tag(alice, "Dinner");
        TagRepository::insert(&catalog, &dinner).await.expect("insert");
        let salt = Ingredient::new(alice, "Salt").expect("ingredient");
        IngredientRepository::insert(&catalog, &salt)
            .await
            .expect("insert");

        let mut with_both = recipe(alice, "Curry", vec![dinner.clone()]);
        with_both.ingredients = vec![salt.clone()];
        RecipeRepository::insert(&catalog, &with_both).await.expect("insert");
        RecipeRepository::insert(&catalog, &recipe(alice, "Toast", vec![dinner.clone()]))
            .await
            .expect("insert");

        let filters = RecipeFilters {
            tag_ids: vec![dinner.id],
            ingredient_ids: vec![salt.id],
        };
        let listed = RecipeRepository::list(&catalog, &alice, &filters)
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, with_both.id);
    }

    #[actix_rt::test]
    async fn cross_user_recipe_access_is_invisible() {
        let catalog = MemoryCatalog::new();
        let alice = owner();
        let bob = owner();
        let created = recipe(alice, "Secret stew", Vec::new());
        RecipeRepository::insert(&catalog, &created).await.expect("insert");

        assert!(RecipeRepository::find(&catalog, &bob, created.id)
            .await
            .expect("find")
            .is_none());
        assert!(RecipeRepository::delete(&catalog, &bob, created.id)
            .await
            .expect("delete")
            .is_none());
    }

    #[test]
    fn image_store_round_trips_and_removes() {
        let store = MemoryImageStore::new();
        let path = store.save("png", b"not really a png").expect("save");
        assert!(path.starts_with("recipe/"));
        assert!(path.ends_with(".png"));
        assert_eq!(store.get(&path), Some(b"not really a png".to_vec()));

        store.remove(&path).expect("remove");
        assert!(store.is_empty());
        store.remove(&path).expect("idempotent remove");
    }
}
