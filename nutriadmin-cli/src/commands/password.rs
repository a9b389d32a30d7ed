use anyhow::{Result, anyhow, bail};
use clap::{Args, Subcommand};
use rpassword::prompt_password;
use shared::client::AuthApi;
use shared::guard::{Decision, Route};
use shared::models::{ForgotPasswordRequest, ResetPasswordRequest};
use shared::validation::{ValidationErrors, validate_email, validate_password, validate_required};

use super::Context;

#[derive(Subcommand, Debug)]
pub enum PasswordCommand {
    /// Email a password reset token
    Forgot(ForgotArgs),
    /// Set a new password with the emailed token; the password is prompted for
    Reset(ResetArgs),
}

#[derive(Args, Debug)]
pub struct ForgotArgs {
    #[arg(long, short)]
    pub email: String,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    #[arg(long, short)]
    pub email: String,

    /// Token from the reset email
    #[arg(long, short)]
    pub token: String,
}

/// Dispatch a `password` subcommand.
///
/// # Errors
/// Returns an error when the input is invalid or the API call fails.
pub async fn run(ctx: &Context, command: PasswordCommand) -> Result<()> {
    match command {
        PasswordCommand::Forgot(args) => {
            ensure_signed_out(ctx, Route::ForgotPassword)?;
            let mut errors = ValidationErrors::new();
            errors.check("email", validate_email(&args.email));
            errors.into_result()?;

            let request = ForgotPasswordRequest {
                email: args.email.trim().to_string(),
            };
            let reply = ctx
                .api()?
                .forgot_password(&request)
                .await
                .map_err(|err| anyhow!(err.user_message()))?;
            println!(
                "{}",
                reply
                    .message
                    .as_deref()
                    .unwrap_or("If the account exists, a reset link has been sent.")
            );
            Ok(())
        }
        PasswordCommand::Reset(args) => {
            ensure_signed_out(ctx, Route::ResetPassword)?;
            let new_password = prompt_password("New password: ")?;
            let repeated = prompt_password("Repeat new password: ")?;
            if new_password != repeated {
                bail!("passwords do not match");
            }

            let request = reset_request(args, new_password)?;
            let reply = ctx
                .api()?
                .reset_password(&request)
                .await
                .map_err(|err| anyhow!(err.user_message()))?;
            println!(
                "{}",
                reply
                    .message
                    .as_deref()
                    .unwrap_or("Password has been reset. You can now sign in.")
            );
            Ok(())
        }
    }
}

fn ensure_signed_out(ctx: &Context, route: Route) -> Result<()> {
    let store = ctx.load_session()?;
    if let Decision::Redirect(home) = store.resolve(route) {
        bail!("already signed in (home view {home}). run `nutriadmin session logout` first");
    }
    Ok(())
}

fn reset_request(args: ResetArgs, new_password: String) -> Result<ResetPasswordRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check("email", validate_email(&args.email));
    errors.check("token", validate_required(&args.token));
    errors.check("newPassword", validate_password(&new_password));
    errors.into_result()?;

    Ok(ResetPasswordRequest {
        email: args.email.trim().to_string(),
        token: args.token.trim().to_string(),
        new_password,
    })
}
