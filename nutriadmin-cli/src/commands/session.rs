use anyhow::{Result, anyhow, bail};
use chrono::Utc;
use clap::{Args, Subcommand};
use rpassword::prompt_password;
use shared::guard::{self, Decision, Route};
use shared::session::Session;

use super::{Context, prompt};

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Sign in with email and password (Admin and Staff only)
    Login(LoginArgs),
    /// Sign out and forget the stored token
    Logout,
    /// Show who is signed in
    Whoami,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email; prompted for when omitted
    #[arg(long, short)]
    pub email: Option<String>,
}

/// Dispatch a `session` subcommand.
///
/// # Errors
/// Returns an error when sign-in fails or the session file cannot be
/// read or cleared.
pub async fn run(ctx: &Context, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Login(args) => login(ctx, args).await,
        SessionCommand::Logout => logout(ctx),
        SessionCommand::Whoami => whoami(ctx),
    }
}

/// Prompt for credentials and store the resulting session.
///
/// # Errors
/// Returns an error when someone is already signed in, the credentials are
/// rejected, or the token grants neither Admin nor Staff.
pub async fn login(ctx: &Context, args: LoginArgs) -> Result<()> {
    let mut store = ctx.load_session()?;
    if let Decision::Redirect(_) = store.resolve(Route::Login) {
        let role = store.session().map_or("?", |session| session.role.as_str());
        bail!("already signed in as {role}. run `nutriadmin session logout` first");
    }

    let email = match args.email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = prompt_password("Password: ")?;

    let api = ctx.api()?;
    let session = store
        .login(&api, &email, &password, Utc::now())
        .await
        .map_err(|err| anyhow!(err.user_message()))?;

    print_session(session);
    println!("session stored at {}", store.storage().path().display());
    Ok(())
}

/// Clear the stored session.
///
/// # Errors
/// Returns an error if the session file cannot be removed.
pub fn logout(ctx: &Context) -> Result<()> {
    let mut store = ctx.load_session()?;
    let signed_in = store.session().is_some();
    store.logout()?;
    if signed_in {
        println!("Signed out; removed {}", store.storage().path().display());
    } else {
        println!("No active session");
    }
    Ok(())
}

/// # Errors
/// Returns an error if the session file cannot be read.
pub fn whoami(ctx: &Context) -> Result<()> {
    let store = ctx.load_session()?;
    match store.session() {
        Some(session) => print_session(session),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn print_session(session: &Session) {
    println!("Signed in as user {}", session.user_id);
    println!("role: {}", session.role);
    println!("home view: {}", guard::default_route(session.role));
}
