use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use shared::guard::Route;
use shared::models::{Notification, NotificationDraft};

use super::resource::{self, DeleteArgs, ListArgs, ShowArgs, TableView};
use super::{Context, optional, parse_timestamp};

impl TableView for Notification {
    const HEADERS: &'static [&'static str] = &["title", "message", "audience", "status"];
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    /// List notifications; search and paging happen locally over the full list
    List(ListArgs),
    /// Show one notification as JSON
    Show(ShowArgs),
    /// Schedule a notification
    Create(NotificationArgs),
    /// Change fields of a notification
    Update(UpdateNotificationArgs),
    /// Delete a notification after confirmation
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Default)]
pub struct NotificationArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub message: Option<String>,

    /// Delivery time as RFC 3339, e.g. 2026-05-01T09:00:00Z; must not be in the past
    #[arg(long, value_parser = parse_timestamp)]
    pub scheduled_at: Option<DateTime<Utc>>,

    /// Target group, e.g. all or premium
    #[arg(long)]
    pub audience: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateNotificationArgs {
    /// Notification id
    pub id: String,

    #[command(flatten)]
    pub fields: NotificationArgs,
}

/// Dispatch a `notifications` subcommand.
///
/// # Errors
/// Returns an error when the session may not open the view, the input is
/// invalid, or the API call fails.
pub async fn run(ctx: &Context, command: NotificationsCommand) -> Result<()> {
    let route = Route::Notifications;
    match command {
        NotificationsCommand::List(args) => resource::list::<Notification>(ctx, route, args).await,
        NotificationsCommand::Show(args) => resource::show::<Notification>(ctx, route, args).await,
        NotificationsCommand::Create(args) => {
            let mut draft = NotificationDraft::default();
            apply(&mut draft, args);
            resource::create::<Notification>(ctx, route, draft).await
        }
        NotificationsCommand::Update(args) => {
            resource::update::<Notification, _>(ctx, route, &args.id, |draft| {
                apply(draft, args.fields);
                Ok(())
            })
            .await
        }
        NotificationsCommand::Delete(args) => {
            resource::delete::<Notification>(ctx, route, args).await
        }
    }
}

fn apply(draft: &mut NotificationDraft, args: NotificationArgs) {
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(message) = args.message {
        draft.message = message;
    }
    if let Some(scheduled_at) = args.scheduled_at {
        draft.scheduled_at = Some(scheduled_at);
    }
    if let Some(audience) = args.audience {
        draft.audience = optional(&audience);
    }
}
