use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use shared::guard::Route;
use shared::models::ProfileDraft;

use super::{Context, optional};

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show your profile as JSON
    Show,
    /// Change fields of your profile
    Update(ProfileArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub full_name: Option<String>,

    /// An empty value clears it
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub avatar_url: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,
}

/// Dispatch a `profile` subcommand.
///
/// # Errors
/// Returns an error when the session may not open the view, the input is
/// invalid, or the API call fails.
pub async fn run(ctx: &Context, command: ProfileCommand) -> Result<()> {
    let (session, api) = ctx.authorize(Route::Profile)?;
    let profile = api
        .get_profile(&session.user_id)
        .await
        .map_err(|err| anyhow!(err.user_message()))?;

    let profile = match command {
        ProfileCommand::Show => profile,
        ProfileCommand::Update(args) => {
            let mut draft = profile.to_draft();
            apply(&mut draft, args);
            draft
                .validate()
                .map_err(|errors| anyhow!("Please fix the form: {errors}"))?;
            let updated = api
                .update_profile(&session.user_id, &draft)
                .await
                .map_err(|err| anyhow!(err.user_message()))?;
            println!("Profile updated");
            updated
        }
    };

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

fn apply(draft: &mut ProfileDraft, args: ProfileArgs) {
    if let Some(full_name) = args.full_name {
        draft.full_name = full_name;
    }
    if let Some(phone) = args.phone {
        draft.phone_number = optional(&phone);
    }
    if let Some(avatar_url) = args.avatar_url {
        draft.avatar_url = optional(&avatar_url);
    }
    if let Some(bio) = args.bio {
        draft.bio = optional(&bio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_full_name_fails_validation() {
        let mut draft = ProfileDraft {
            full_name: "Quang Le".to_string(),
            bio: Some("Dietitian".to_string()),
            ..ProfileDraft::default()
        };
        apply(
            &mut draft,
            ProfileArgs {
                full_name: Some(" ".to_string()),
                bio: Some(String::new()),
                ..ProfileArgs::default()
            },
        );
        assert_eq!(draft.bio, None);
        assert!(draft.validate().is_err());
    }
}
