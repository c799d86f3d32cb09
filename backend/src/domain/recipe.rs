//! Recipes, their validated content, listing filters and photo uploads.

use std::fmt;

use serde::Serialize;

use super::text::{TextViolation, bounded, required};
use super::{CategoryId, RecipeId, UserId};

/// Maximum recipe title length in characters.
pub const RECIPE_TITLE_MAX: usize = 255;
const PHOTO_EXTENSION_MAX: usize = 8;

/// Validation errors for recipe input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeValidationError {
    /// Title was blank once trimmed.
    EmptyTitle,
    /// Title exceeds [`RECIPE_TITLE_MAX`] characters.
    TitleTooLong,
    /// Description was blank.
    EmptyDescription,
    /// Ingredient list was blank.
    EmptyIngredients,
    /// Instructions were blank.
    EmptyInstructions,
    /// Preparation time was zero or negative.
    NonPositivePrepTime,
    /// Serving count was zero or negative.
    NonPositiveServings,
    /// Category id was zero or negative.
    InvalidCategory,
}

impl RecipeValidationError {
    /// Name of the offending input field.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong => "title",
            Self::EmptyDescription => "description",
            Self::EmptyIngredients => "ingredients",
            Self::EmptyInstructions => "instructions",
            Self::NonPositivePrepTime => "prepTimeMinutes",
            Self::NonPositiveServings => "servings",
            Self::InvalidCategory => "categoryId",
        }
    }

    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong => "title_too_long",
            Self::EmptyDescription => "empty_description",
            Self::EmptyIngredients => "empty_ingredients",
            Self::EmptyInstructions => "empty_instructions",
            Self::NonPositivePrepTime | Self::NonPositiveServings => "not_positive",
            Self::InvalidCategory => "invalid_category",
        }
    }
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong => {
                write!(f, "title must be at most {RECIPE_TITLE_MAX} characters")
            }
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::EmptyIngredients => write!(f, "ingredients must not be empty"),
            Self::EmptyInstructions => write!(f, "instructions must not be empty"),
            Self::NonPositivePrepTime => write!(f, "preparation time must be positive"),
            Self::NonPositiveServings => write!(f, "servings must be positive"),
            Self::InvalidCategory => write!(f, "category id must be positive"),
        }
    }
}

impl std::error::Error for RecipeValidationError {}

/// Raw recipe content as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFields {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time_minutes: i32,
    pub servings: i32,
    pub category_id: i32,
}

/// Validated recipe content.
///
/// ## Invariants
/// - Text fields are trimmed and non-empty; the title is at most
///   [`RECIPE_TITLE_MAX`] characters.
/// - Preparation time and servings are positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time_minutes: u32,
    pub servings: u32,
    pub category_id: CategoryId,
}

impl TryFrom<RecipeFields> for RecipeDetails {
    type Error = RecipeValidationError;

    fn try_from(fields: RecipeFields) -> Result<Self, Self::Error> {
        let title = bounded(&fields.title, RECIPE_TITLE_MAX).map_err(|err| match err {
            TextViolation::Empty => RecipeValidationError::EmptyTitle,
            TextViolation::TooLong => RecipeValidationError::TitleTooLong,
        })?;
        let description =
            required(&fields.description).map_err(|_| RecipeValidationError::EmptyDescription)?;
        let ingredients =
            required(&fields.ingredients).map_err(|_| RecipeValidationError::EmptyIngredients)?;
        let instructions = required(&fields.instructions)
            .map_err(|_| RecipeValidationError::EmptyInstructions)?;
        let prep_time_minutes = positive(fields.prep_time_minutes)
            .ok_or(RecipeValidationError::NonPositivePrepTime)?;
        let servings =
            positive(fields.servings).ok_or(RecipeValidationError::NonPositiveServings)?;
        if fields.category_id <= 0 {
            return Err(RecipeValidationError::InvalidCategory);
        }
        Ok(Self {
            title,
            description,
            ingredients,
            instructions,
            prep_time_minutes,
            servings,
            category_id: CategoryId::new(fields.category_id),
        })
    }
}

fn positive(value: i32) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v > 0)
}

/// Stored recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub details: RecipeDetails,
    /// Public path of the stored photo, e.g. `/images/<uuid>.jpg`.
    pub photo_path: Option<String>,
    pub author_id: UserId,
    pub revision: u32,
}

/// Recipe joined with its category name and author username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub category_name: String,
    pub author_name: String,
}

/// Fields required to insert a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub details: RecipeDetails,
    pub photo_path: Option<String>,
    pub author_id: UserId,
}

/// Replacement values for an existing recipe. The author never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeChanges {
    pub id: RecipeId,
    pub details: RecipeDetails,
    pub photo_path: Option<String>,
    pub expected_revision: u32,
}

/// Listing filter for recipes.
///
/// # Examples
/// ```
/// use culinaria::domain::RecipeFilter;
///
/// let filter = RecipeFilter::from_query(Some(0), Some(String::new()));
/// assert_eq!(filter, RecipeFilter::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Only recipes in this category.
    pub category_id: Option<CategoryId>,
    /// Only recipes whose title contains this text (case-sensitive).
    pub search: Option<String>,
}

impl RecipeFilter {
    /// Build a filter from raw query parameters.
    ///
    /// A missing or non-positive category id and an empty search string
    /// impose no restriction.
    pub fn from_query(category_id: Option<i64>, search: Option<String>) -> Self {
        Self {
            category_id: category_id
                .filter(|id| *id > 0)
                .and_then(|id| i32::try_from(id).ok())
                .map(CategoryId::new),
            search: search.filter(|text| !text.is_empty()),
        }
    }

    /// Whether `recipe` passes the filter.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let category_ok = self
            .category_id
            .is_none_or(|id| recipe.details.category_id == id);
        let search_ok = self
            .search
            .as_deref()
            .is_none_or(|needle| recipe.details.title.contains(needle));
        category_ok && search_ok
    }
}

/// Uploaded photo bytes and the client-declared filename.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Wrap an upload; an empty payload means no photo was submitted.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Some(Self {
            file_name: file_name.into(),
            bytes,
        })
    }

    /// Client-declared filename. Never used as a storage key.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lower-cased extension of the declared filename when it is short and
    /// alphanumeric.
    ///
    /// # Examples
    /// ```
    /// use culinaria::domain::PhotoUpload;
    ///
    /// let photo = PhotoUpload::new("flan.JPG", vec![1]).unwrap();
    /// assert_eq!(photo.extension().as_deref(), Some("jpg"));
    /// let odd = PhotoUpload::new("../../etc/passwd", vec![1]).unwrap();
    /// assert_eq!(odd.extension(), None);
    /// ```
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        let acceptable = !stem.is_empty()
            && !ext.is_empty()
            && ext.len() <= PHOTO_EXTENSION_MAX
            && ext.chars().all(|c| c.is_ascii_alphanumeric());
        acceptable.then(|| ext.to_ascii_lowercase())
    }
}

impl fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn flan_fields() -> RecipeFields {
        RecipeFields {
            title: "Flan".to_owned(),
            description: "Postre clásico".to_owned(),
            ingredients: "huevos, leche, azúcar".to_owned(),
            instructions: "Mezclar y hornear".to_owned(),
            prep_time_minutes: 60,
            servings: 6,
            category_id: 1,
        }
    }

    #[fixture]
    fn flan() -> RecipeFields {
        flan_fields()
    }

    #[rstest]
    fn valid_fields_are_accepted(flan: RecipeFields) {
        let details = RecipeDetails::try_from(flan).expect("valid recipe");
        assert_eq!(details.title, "Flan");
        assert_eq!(details.prep_time_minutes, 60);
        assert_eq!(details.category_id, CategoryId::new(1));
    }

    #[rstest]
    #[case(|f: &mut RecipeFields| f.title = " ".to_owned(), RecipeValidationError::EmptyTitle)]
    #[case(|f: &mut RecipeFields| f.title = "t".repeat(256), RecipeValidationError::TitleTooLong)]
    #[case(|f: &mut RecipeFields| f.description.clear(), RecipeValidationError::EmptyDescription)]
    #[case(|f: &mut RecipeFields| f.ingredients.clear(), RecipeValidationError::EmptyIngredients)]
    #[case(|f: &mut RecipeFields| f.instructions.clear(), RecipeValidationError::EmptyInstructions)]
    #[case(|f: &mut RecipeFields| f.prep_time_minutes = 0, RecipeValidationError::NonPositivePrepTime)]
    #[case(|f: &mut RecipeFields| f.servings = -2, RecipeValidationError::NonPositiveServings)]
    #[case(|f: &mut RecipeFields| f.category_id = 0, RecipeValidationError::InvalidCategory)]
    fn invalid_fields_are_rejected(
        mut flan: RecipeFields,
        #[case] corrupt: fn(&mut RecipeFields),
        #[case] expected: RecipeValidationError,
    ) {
        corrupt(&mut flan);
        assert_eq!(RecipeDetails::try_from(flan), Err(expected));
    }

    fn stored(title: &str, category: i32) -> Recipe {
        Recipe {
            id: RecipeId::new(1),
            details: RecipeDetails::try_from(RecipeFields {
                title: title.to_owned(),
                category_id: category,
                ..flan_fields()
            })
            .expect("valid recipe"),
            photo_path: None,
            author_id: UserId::new(1),
            revision: 1,
        }
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(Some(2), None, true)]
    #[case(Some(3), None, false)]
    #[case(Some(-1), None, true)]
    #[case(None, Some("Tarta"), true)]
    #[case(None, Some("tarta"), false)]
    #[case(Some(2), Some("Queso"), true)]
    #[case(Some(3), Some("Queso"), false)]
    fn filter_combines_category_and_title(
        #[case] category: Option<i64>,
        #[case] search: Option<&str>,
        #[case] expected: bool,
    ) {
        let filter = RecipeFilter::from_query(category, search.map(str::to_owned));
        assert_eq!(filter.matches(&stored("Tarta de Queso", 2)), expected);
    }

    #[test]
    fn empty_photo_payload_counts_as_no_photo() {
        assert!(PhotoUpload::new("flan.jpg", Vec::new()).is_none());
    }

    #[rstest]
    #[case("flan.png", Some("png"))]
    #[case("flan", None)]
    #[case(".hidden", None)]
    #[case("flan.tar.gz", Some("gz"))]
    #[case("flan.p n g", None)]
    fn photo_extensions_are_sanitised(#[case] name: &str, #[case] expected: Option<&str>) {
        let photo = PhotoUpload::new(name, vec![0xFF]).expect("non-empty payload");
        assert_eq!(photo.extension().as_deref(), expected);
    }
}
