use anyhow::Result;
use clap::{Args, Subcommand};
use shared::guard::Route;
use shared::models::{Recipe, RecipeDraft, RecipeIngredient};

use super::resource::{self, DeleteArgs, ListArgs, ShowArgs, TableView};
use super::{Context, optional};

impl TableView for Recipe {
    const HEADERS: &'static [&'static str] = &["name", "description", "category"];
}

#[derive(Subcommand, Debug)]
pub enum RecipesCommand {
    /// List recipes, searched and paged by the server
    List(ListArgs),
    /// Show one recipe with its ingredients as JSON
    Show(ShowArgs),
    /// Create a recipe
    Create(RecipeArgs),
    /// Change fields of a recipe
    Update(UpdateRecipeArgs),
    /// Delete a recipe after confirmation
    Delete(DeleteArgs),
}

/// Recipe fields. On update, only the given flags change the recipe.
#[derive(Args, Debug, Default)]
pub struct RecipeArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Kilocalories per serving
    #[arg(long)]
    pub calories: Option<f64>,

    #[arg(long)]
    pub prep_time: Option<u32>,

    #[arg(long)]
    pub servings: Option<u32>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// Ingredient as `ID[:QUANTITY[:UNIT]]`; repeat for each line. Replaces the list on update.
    #[arg(long = "ingredient", value_parser = parse_ingredient)]
    pub ingredients: Vec<RecipeIngredient>,
}

#[derive(Args, Debug)]
pub struct UpdateRecipeArgs {
    /// Recipe id
    pub id: String,

    #[command(flatten)]
    pub fields: RecipeArgs,
}

/// Dispatch a `recipes` subcommand.
///
/// # Errors
/// Returns an error when the session may not open the view, the input is
/// invalid, or the API call fails.
pub async fn run(ctx: &Context, command: RecipesCommand) -> Result<()> {
    match command {
        RecipesCommand::List(args) => resource::list::<Recipe>(ctx, Route::Recipes, args).await,
        RecipesCommand::Show(args) => resource::show::<Recipe>(ctx, Route::Recipes, args).await,
        RecipesCommand::Create(args) => {
            let mut draft = RecipeDraft::default();
            apply(&mut draft, args);
            resource::create::<Recipe>(ctx, Route::Recipes, draft).await
        }
        RecipesCommand::Update(args) => {
            resource::update::<Recipe, _>(ctx, Route::Recipes, &args.id, |draft| {
                apply(draft, args.fields);
                Ok(())
            })
            .await
        }
        RecipesCommand::Delete(args) => resource::delete::<Recipe>(ctx, Route::Recipes, args).await,
    }
}

fn apply(draft: &mut RecipeDraft, args: RecipeArgs) {
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(category) = args.category {
        draft.category = optional(&category);
    }
    if let Some(calories) = args.calories {
        draft.calories = Some(calories);
    }
    if let Some(prep_time) = args.prep_time {
        draft.prep_time_minutes = Some(prep_time);
    }
    if let Some(servings) = args.servings {
        draft.servings = Some(servings);
    }
    if let Some(image_url) = args.image_url {
        draft.image_url = optional(&image_url);
    }
    if !args.ingredients.is_empty() {
        draft.ingredients = args.ingredients;
    }
}

fn parse_ingredient(value: &str) -> Result<RecipeIngredient, String> {
    let mut parts = value.splitn(3, ':').map(str::trim);
    let ingredient_id = parts
        .next()
        .filter(|id| !id.is_empty())
        .ok_or("missing ingredient id")?
        .to_string();
    let quantity = match parts.next().filter(|part| !part.is_empty()) {
        Some(text) => Some(
            text.parse::<f64>()
                .map_err(|_| format!("invalid quantity `{text}`"))?,
        ),
        None => None,
    };
    let unit = parts.next().and_then(optional);

    Ok(RecipeIngredient {
        ingredient_id,
        name: None,
        quantity,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient_forms() {
        let full = parse_ingredient("12:250:g").unwrap();
        assert_eq!(full.ingredient_id, "12");
        assert_eq!(full.quantity, Some(250.0));
        assert_eq!(full.unit.as_deref(), Some("g"));

        let bare = parse_ingredient("rice").unwrap();
        assert_eq!(bare.quantity, None);
        assert_eq!(bare.unit, None);

        assert!(parse_ingredient(":1:g").is_err());
        assert!(parse_ingredient("12:lots").is_err());
    }

    #[test]
    fn test_apply_keeps_ingredients_unless_given() {
        let mut draft = RecipeDraft {
            name: "Pho".to_string(),
            ingredients: vec![parse_ingredient("1:200:g").unwrap()],
            ..RecipeDraft::default()
        };
        apply(
            &mut draft,
            RecipeArgs {
                servings: Some(4),
                category: Some(String::new()),
                ..RecipeArgs::default()
            },
        );
        assert_eq!(draft.name, "Pho");
        assert_eq!(draft.servings, Some(4));
        assert_eq!(draft.category, None);
        assert_eq!(draft.ingredients.len(), 1);
    }
}
