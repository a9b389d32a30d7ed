use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ApiPaths;
use crate::resource::{FormMode, Resource, SearchMode};
use crate::validation::{ValidationError, ValidationErrors, validate_required};

/// An ingredient line of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub ingredient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Kilocalories per serving.
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub calories: Option<f64>,
    pub prep_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub image_url: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Resource for Recipe {
    type Draft = RecipeDraft;

    const NAME: &'static str = "recipe";
    const SEARCH: SearchMode = SearchMode::Server;

    fn path(paths: &ApiPaths) -> &str {
        &paths.recipes
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn columns(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.category.clone().unwrap_or_default(),
        ]
    }

    fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            calories: self.calories,
            prep_time_minutes: self.prep_time_minutes,
            servings: self.servings,
            image_url: self.image_url.clone(),
            ingredients: self.ingredients.clone(),
        }
    }

    fn validate(
        draft: &RecipeDraft,
        _mode: FormMode,
        _now: DateTime<Utc>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("name", validate_required(&draft.name));
        errors.check("description", validate_required(&draft.description));
        if draft.calories.is_some_and(|kcal| !kcal.is_finite() || kcal < 0.0) {
            errors.check("calories", Err(ValidationError::OutOfRange));
        }
        if draft.servings == Some(0) {
            errors.check("servings", Err(ValidationError::OutOfRange));
        }
        if draft
            .ingredients
            .iter()
            .any(|line| line.ingredient_id.trim().is_empty())
        {
            errors.check("ingredients", Err(ValidationError::Required));
        }
        errors.into_result()
    }
}
