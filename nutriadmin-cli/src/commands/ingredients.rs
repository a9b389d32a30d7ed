use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use shared::guard::Route;

use super::Context;

#[derive(Subcommand, Debug)]
pub enum IngredientsCommand {
    /// List catalogue ingredients, optionally filtered by name
    List(IngredientListArgs),
}

#[derive(Args, Debug)]
pub struct IngredientListArgs {
    #[arg(long, short)]
    pub search: Option<String>,

    /// Print the rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Dispatch an `ingredients` subcommand.
///
/// # Errors
/// Returns an error when nobody is signed in or the lookup fails.
pub async fn run(ctx: &Context, command: IngredientsCommand) -> Result<()> {
    let IngredientsCommand::List(args) = command;
    // Ingredients are only looked up while composing recipes.
    let (_, api) = ctx.authorize(Route::Recipes)?;
    let ingredients = api
        .list_ingredients(args.search.as_deref())
        .await
        .map_err(|err| anyhow!(err.user_message()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ingredients)?);
        return Ok(());
    }

    println!("id\tname\tcalories\tunit");
    for ingredient in &ingredients {
        println!(
            "{}\t{}\t{}\t{}",
            ingredient.id,
            ingredient.name,
            ingredient
                .calories
                .map(|calories| calories.to_string())
                .unwrap_or_default(),
            ingredient.unit.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
