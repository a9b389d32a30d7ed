use anyhow::Result;
use clap::{Args, Subcommand};
use rpassword::prompt_password;
use shared::guard::Route;
use shared::models::{Role, User, UserDraft};

use super::resource::{self, DeleteArgs, ListArgs, ShowArgs, TableView};
use super::{Context, optional};

impl TableView for User {
    const HEADERS: &'static [&'static str] = &["name", "email", "role"];
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users, searched and paged by the server
    List(ListArgs),
    /// Show one user as JSON
    Show(ShowArgs),
    /// Create a user; the password is prompted for
    Create(CreateUserArgs),
    /// Change fields of a user
    Update(UpdateUserArgs),
    /// Delete a user after confirmation
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub full_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: Option<String>,

    /// Admin or Staff
    #[arg(long, default_value_t = Role::Staff.to_string())]
    pub role: String,

    /// Create the account disabled
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args, Debug)]
pub struct UpdateUserArgs {
    /// User id
    pub id: String,

    #[arg(long)]
    pub full_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// New phone number; an empty value clears it
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub active: Option<bool>,

    /// Prompt for a new password
    #[arg(long)]
    pub reset_password: bool,
}

/// Dispatch a `users` subcommand.
///
/// # Errors
/// Returns an error when the session may not open the view, the input is
/// invalid, or the API call fails.
pub async fn run(ctx: &Context, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List(args) => resource::list::<User>(ctx, Route::Users, args).await,
        UsersCommand::Show(args) => resource::show::<User>(ctx, Route::Users, args).await,
        UsersCommand::Create(args) => {
            // Fail on the guard before asking for a password.
            ctx.authorize(Route::Users)?;
            let password = prompt_password("Password for the new user: ")?;
            resource::create::<User>(ctx, Route::Users, create_draft(args, password)).await
        }
        UsersCommand::Update(args) => {
            let id = args.id.clone();
            resource::update::<User, _>(ctx, Route::Users, &id, |draft| {
                let password = if args.reset_password {
                    Some(prompt_password("New password: ")?)
                } else {
                    None
                };
                apply_update(draft, args, password);
                Ok(())
            })
            .await
        }
        UsersCommand::Delete(args) => resource::delete::<User>(ctx, Route::Users, args).await,
    }
}

fn create_draft(args: CreateUserArgs, password: String) -> UserDraft {
    UserDraft {
        full_name: args.full_name,
        email: args.email,
        phone_number: args.phone.as_deref().and_then(optional),
        role: args.role,
        is_active: !args.inactive,
        password: Some(password),
    }
}

fn apply_update(draft: &mut UserDraft, args: UpdateUserArgs, password: Option<String>) {
    if let Some(full_name) = args.full_name {
        draft.full_name = full_name;
    }
    if let Some(email) = args.email {
        draft.email = email;
    }
    if let Some(phone) = args.phone {
        draft.phone_number = optional(&phone);
    }
    if let Some(role) = args.role {
        draft.role = role;
    }
    if let Some(active) = args.active {
        draft.is_active = active;
    }
    if password.is_some() {
        draft.password = password;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_args(id: &str) -> UpdateUserArgs {
        UpdateUserArgs {
            id: id.to_string(),
            full_name: None,
            email: None,
            phone: None,
            role: None,
            active: None,
            reset_password: false,
        }
    }

    #[test]
    fn test_create_draft_maps_flags() {
        let draft = create_draft(
            CreateUserArgs {
                full_name: "Linh Pham".to_string(),
                email: "linh@example.com".to_string(),
                phone: Some(" ".to_string()),
                role: "Admin".to_string(),
                inactive: true,
            },
            "S3cret!pw".to_string(),
        );
        assert_eq!(draft.phone_number, None);
        assert_eq!(draft.role, "Admin");
        assert!(!draft.is_active);
        assert_eq!(draft.password.as_deref(), Some("S3cret!pw"));
    }

    #[test]
    fn test_update_only_touches_given_fields() {
        let mut draft = UserDraft {
            full_name: "Linh Pham".to_string(),
            email: "linh@example.com".to_string(),
            phone_number: Some("0900".to_string()),
            ..UserDraft::default()
        };
        let mut args = update_args("4");
        args.phone = Some(String::new());
        args.active = Some(false);

        apply_update(&mut draft, args, None);
        assert_eq!(draft.full_name, "Linh Pham");
        assert_eq!(draft.phone_number, None);
        assert!(!draft.is_active);
        assert!(draft.password.is_none());
    }
}
