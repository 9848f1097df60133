//! Catalogue entities: tags, ingredients, and recipes.
//!
//! Every entity is owned by exactly one user for its lifetime. Names of
//! tags and ingredients are scoped per user; two users may each own a
//! "lunch" tag without conflict.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use super::user::UserId;

/// Validation errors raised by catalogue constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("time_minutes must be at least 1")]
    NonPositiveTime,
    #[error("price must not be negative")]
    NegativePrice,
    #[error("link must be a valid URL")]
    InvalidLink,
}

impl CatalogValidationError {
    /// The request field the error refers to, for error payload details.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyTitle => "title",
            Self::NonPositiveTime => "time_minutes",
            Self::NegativePrice => "price",
            Self::InvalidLink => "link",
        }
    }
}

fn validate_name(name: &str) -> Result<(), CatalogValidationError> {
    if name.trim().is_empty() {
        return Err(CatalogValidationError::EmptyName);
    }
    Ok(())
}

/// User-owned recipe label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub user_id: UserId,
    pub name: String,
}

impl Tag {
    /// Create a tag owned by `user_id`.
    pub fn new(user_id: UserId, name: impl Into<String>) -> Result<Self, CatalogValidationError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
        })
    }
}

/// User-owned recipe component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: Uuid,
    pub user_id: UserId,
    pub name: String,
}

impl Ingredient {
    /// Create an ingredient owned by `user_id`.
    pub fn new(user_id: UserId, name: impl Into<String>) -> Result<Self, CatalogValidationError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
        })
    }
}

/// A recipe with its attached tags and ingredients.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: String,
    pub link: String,
    /// Media path of the stored image, when one has been uploaded.
    pub image: Option<String>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for creating a recipe.
///
/// Tag and ingredient names are resolved against the owner's existing
/// entities at create time; unknown names are created implicitly.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub description: String,
    pub link: String,
    pub tag_names: Vec<String>,
    pub ingredient_names: Vec<String>,
}

impl RecipeDraft {
    /// Check the draft's field invariants.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.title.trim().is_empty() {
            return Err(CatalogValidationError::EmptyTitle);
        }
        if self.time_minutes < 1 {
            return Err(CatalogValidationError::NonPositiveTime);
        }
        if self.price.is_sign_negative() {
            return Err(CatalogValidationError::NegativePrice);
        }
        validate_link(&self.link)?;
        for name in self.tag_names.iter().chain(&self.ingredient_names) {
            validate_name(name)?;
        }
        Ok(())
    }
}

/// Partial update for a recipe; `None` fields are left unchanged.
///
/// `tag_names`/`ingredient_names` of `Some` replace the attached set
/// wholesale after nested resolution; `Some(vec![])` clears it.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tag_names: Option<Vec<String>>,
    pub ingredient_names: Option<Vec<String>>,
}

impl RecipePatch {
    /// Check the invariants of every provided field.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err(CatalogValidationError::EmptyTitle);
        }
        if let Some(minutes) = self.time_minutes
            && minutes < 1
        {
            return Err(CatalogValidationError::NonPositiveTime);
        }
        if let Some(price) = self.price
            && price.is_sign_negative()
        {
            return Err(CatalogValidationError::NegativePrice);
        }
        if let Some(link) = &self.link {
            validate_link(link)?;
        }
        for name in self
            .tag_names
            .iter()
            .flatten()
            .chain(self.ingredient_names.iter().flatten())
        {
            validate_name(name)?;
        }
        Ok(())
    }
}

/// Set-based recipe list filter; empty id sets leave that field
/// unconstrained. Within one field the ids are OR-ed; both fields together
/// are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilters {
    pub tag_ids: Vec<Uuid>,
    pub ingredient_ids: Vec<Uuid>,
}

fn validate_link(link: &str) -> Result<(), CatalogValidationError> {
    if link.is_empty() {
        return Ok(());
    }
    Url::parse(link)
        .map(|_| ())
        .map_err(|_| CatalogValidationError::InvalidLink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft() -> RecipeDraft {
        RecipeDraft {
            title: "Sample recipe".to_owned(),
            time_minutes: 22,
            price: Decimal::new(525, 2),
            description: "Sample description".to_owned(),
            link: "http://example.com/recipe.pdf".to_owned(),
            tag_names: vec!["Dinner".to_owned()],
            ingredient_names: vec!["Salt".to_owned()],
        }
    }

    #[test]
    fn valid_draft_passes() {
        draft().validate().expect("valid draft");
    }

    #[rstest]
    #[case::empty_title(RecipeDraft { title: "  ".to_owned(), ..draft() }, "title")]
    #[case::zero_time(RecipeDraft { time_minutes: 0, ..draft() }, "time_minutes")]
    #[case::negative_price(RecipeDraft { price: Decimal::new(-1, 0), ..draft() }, "price")]
    #[case::bad_link(RecipeDraft { link: "not a url".to_owned(), ..draft() }, "link")]
    #[case::blank_tag(RecipeDraft { tag_names: vec![" ".to_owned()], ..draft() }, "name")]
    fn invalid_drafts_are_rejected(#[case] draft: RecipeDraft, #[case] field: &str) {
        let err = draft.validate().expect_err("invalid draft");
        assert_eq!(err.field(), field);
    }

    #[test]
    fn empty_link_is_allowed() {
        let draft = RecipeDraft {
            link: String::new(),
            ..draft()
        };
        draft.validate().expect("empty link is optional");
    }

    #[test]
    fn patch_validates_only_provided_fields() {
        RecipePatch::default().validate().expect("empty patch");

        let err = RecipePatch {
            time_minutes: Some(0),
            ..RecipePatch::default()
        }
        .validate()
        .expect_err("zero minutes");
        assert_eq!(err, CatalogValidationError::NonPositiveTime);
    }

    #[test]
    fn tag_and_ingredient_names_must_not_be_blank() {
        let user = UserId::random();
        assert!(Tag::new(user, "Dessert").is_ok());
        assert_eq!(
            Tag::new(user, "  ").expect_err("blank"),
            CatalogValidationError::EmptyName
        );
        assert_eq!(
            Ingredient::new(user, "").expect_err("blank"),
            CatalogValidationError::EmptyName
        );
    }
}
