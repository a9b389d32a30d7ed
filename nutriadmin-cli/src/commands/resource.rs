//! List/show/create/update/delete shared by the four resource commands.

use anyhow::{Result, anyhow};
use chrono::Utc;
use clap::Args;
use shared::client::ApiClient;
use shared::guard::Route;
use shared::models::ListQuery;
use shared::resource::{Resource, ResourceApi, ResourceTable, TableError};

use super::{Context, confirm};

/// Column headings for the rows printed by `list`.
pub trait TableView: Resource {
    const HEADERS: &'static [&'static str];
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive search term
    #[arg(long, short)]
    pub search: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, short, default_value_t = 1)]
    pub page: u32,

    /// Print the rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record id
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

type Table<R> = ResourceTable<R, ApiClient>;

fn table<R: Resource>(ctx: &Context, route: Route) -> Result<Table<R>> {
    let (_, api) = ctx.authorize(route)?;
    Ok(ResourceTable::new(api, ctx.config.page_size, ctx.banner_ttl()))
}

/// What the dashboard banner would show, plus a hint for expired sessions.
fn banner(err: &TableError) -> anyhow::Error {
    match err {
        TableError::Api(api) if api.is_auth_failure() => anyhow!(
            "{}\nrun `nutriadmin session login` to sign in again",
            err.user_message()
        ),
        _ => anyhow!(err.user_message()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one page of `R`, honouring the search term and page number.
///
/// # Errors
/// Returns an error when the role may not open `route` or the list call fails.
pub async fn list<R: TableView>(ctx: &Context, route: Route, args: ListArgs) -> Result<()> {
    let mut table = table::<R>(ctx, route)?;
    let query = ListQuery::new(ctx.config.page_size)
        .with_search(args.search)
        .with_page(args.page);
    table.open(query).await.map_err(|err| banner(&err))?;

    let rows = table.visible();
    if args.json {
        return print_json(&rows);
    }

    println!("id\t{}", R::HEADERS.join("\t"));
    for row in &rows {
        println!("{}\t{}", row.id(), row.columns().join("\t"));
    }
    println!(
        "page {} of {} ({} {} total)",
        table.query().page,
        table.page_count().max(1),
        table.total(),
        R::NAME
    );
    Ok(())
}

/// # Errors
/// Returns an error when the role may not open `route` or the record cannot be fetched.
pub async fn show<R: Resource>(ctx: &Context, route: Route, args: ShowArgs) -> Result<()> {
    let table = table::<R>(ctx, route)?;
    let record = ResourceApi::<R>::get(table.api(), &args.id)
        .await
        .map_err(|err| banner(&TableError::from(err)))?;
    print_json(&record)
}

/// Validate `draft` and create it.
///
/// # Errors
/// Returns an error when validation or the create call fails.
pub async fn create<R: Resource>(ctx: &Context, route: Route, draft: R::Draft) -> Result<()> {
    let mut table = table::<R>(ctx, route)?;
    let record = table
        .submit_create(&draft, Utc::now())
        .await
        .map_err(|err| banner(&err))?;
    println!("Created {} {}", R::NAME, record.id());
    print_json(&record)
}

/// Load the edit form for `id`, let `apply` change it, and submit it.
///
/// # Errors
/// Returns an error when the record cannot be loaded, `apply` rejects the
/// arguments, validation fails, or the update call fails.
pub async fn update<R, F>(ctx: &Context, route: Route, id: &str, apply: F) -> Result<()>
where
    R: Resource,
    F: FnOnce(&mut R::Draft) -> Result<()>,
{
    let mut table = table::<R>(ctx, route)?;
    let mut draft = table.begin_edit(id).await.map_err(|err| banner(&err))?;
    apply(&mut draft)?;
    let record = table
        .submit_edit(id, &draft, Utc::now())
        .await
        .map_err(|err| banner(&err))?;
    println!("Updated {} {}", R::NAME, record.id());
    print_json(&record)
}

/// Delete after confirmation, unless `--yes` was passed.
///
/// # Errors
/// Returns an error when the role may not open `route` or the delete call fails.
pub async fn delete<R: Resource>(ctx: &Context, route: Route, args: DeleteArgs) -> Result<()> {
    let mut table = table::<R>(ctx, route)?;
    let yes = args.yes;
    let deleted = table
        .delete(&args.id, |id| {
            yes || confirm(&format!("Delete {} {id}?", R::NAME))
        })
        .await
        .map_err(|err| banner(&err))?;

    if deleted {
        println!("Deleted {} {}", R::NAME, args.id);
    } else {
        println!("Cancelled");
    }
    Ok(())
}
