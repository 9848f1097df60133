//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel
//! uses them for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised login email, unique across accounts.
        email -> Varchar,
        /// Display name.
        name -> Varchar,
        /// Argon2id hash in PHC string format.
        password_hash -> Varchar,
        /// Whether the account may authenticate.
        is_active -> Bool,
        /// Whether the account has staff privileges.
        is_staff -> Bool,
        /// Account creation timestamp.
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// User-owned recipe labels.
    tags (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// User-owned recipe components.
    ingredients (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Recipes; attachments live in the join tables below.
    recipes (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        time_minutes -> Int4,
        /// Fixed-point price, NUMERIC(10, 2).
        price -> Numeric,
        description -> Text,
        link -> Varchar,
        /// Relative media path of the stored image.
        image -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe to tag attachments.
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Uuid,
        tag_id -> Uuid,
    }
}

diesel::table! {
    /// Recipe to ingredient attachments.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Uuid,
        ingredient_id -> Uuid,
    }
}

diesel::joinable!(tags -> users (user_id));
diesel::joinable!(ingredients -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tags,
    ingredients,
    recipes,
    recipe_tags,
    recipe_ingredients,
);
