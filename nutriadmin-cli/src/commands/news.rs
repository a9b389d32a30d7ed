use anyhow::Result;
use clap::{Args, Subcommand};
use shared::guard::Route;
use shared::models::{News, NewsDraft};

use super::resource::{self, DeleteArgs, ListArgs, ShowArgs, TableView};
use super::{Context, optional};

impl TableView for News {
    const HEADERS: &'static [&'static str] = &["title", "content", "author"];
}

#[derive(Subcommand, Debug)]
pub enum NewsCommand {
    /// List news; search and paging happen locally over the full list
    List(ListArgs),
    /// Show one article as JSON
    Show(ShowArgs),
    /// Publish an article
    Create(NewsArgs),
    /// Change fields of an article
    Update(UpdateNewsArgs),
    /// Delete an article after confirmation
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Default)]
pub struct NewsArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateNewsArgs {
    /// Article id
    pub id: String,

    #[command(flatten)]
    pub fields: NewsArgs,
}

/// Dispatch a `news` subcommand.
///
/// # Errors
/// Returns an error when the session may not open the view, the input is
/// invalid, or the API call fails.
pub async fn run(ctx: &Context, command: NewsCommand) -> Result<()> {
    match command {
        NewsCommand::List(args) => resource::list::<News>(ctx, Route::News, args).await,
        NewsCommand::Show(args) => resource::show::<News>(ctx, Route::News, args).await,
        NewsCommand::Create(args) => {
            let mut draft = NewsDraft::default();
            apply(&mut draft, args);
            resource::create::<News>(ctx, Route::News, draft).await
        }
        NewsCommand::Update(args) => {
            resource::update::<News, _>(ctx, Route::News, &args.id, |draft| {
                apply(draft, args.fields);
                Ok(())
            })
            .await
        }
        NewsCommand::Delete(args) => resource::delete::<News>(ctx, Route::News, args).await,
    }
}

fn apply(draft: &mut NewsDraft, args: NewsArgs) {
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(content) = args.content {
        draft.content = content;
    }
    if let Some(author) = args.author {
        draft.author = optional(&author);
    }
    if let Some(image_url) = args.image_url {
        draft.image_url = optional(&image_url);
    }
}
