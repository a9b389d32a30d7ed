//! Subcommand implementations.
//!
//! Every command that talks to the API goes through [`Context::authorize`],
//! which applies the same route guard the dashboard views use.

pub mod completion;
pub mod config;
pub mod ingredients;
pub mod news;
pub mod notifications;
pub mod password;
pub mod profile;
pub mod recipes;
pub mod resource;
pub mod routes;
pub mod session;
pub mod users;

use anyhow::{Context as _, Result, bail};
use chrono::{DateTime, Utc};
use shared::client::ApiClient;
use shared::config::ClientConfig;
use shared::guard::{Decision, Route};
use shared::session::{FileStorage, Session, SessionStore};
use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;

/// Resolved configuration shared by every command.
#[derive(Debug)]
pub struct Context {
    pub config: ClientConfig,
}

impl Context {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn banner_ttl(&self) -> Duration {
        Duration::from_secs(self.config.banner_ttl_secs)
    }

    /// Restore the persisted session; unusable credentials are cleared.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be read or cleared.
    pub fn load_session(&self) -> Result<SessionStore<FileStorage>> {
        let storage = FileStorage::new(self.config.session_file());
        SessionStore::load(storage, Utc::now()).context("failed to read the stored session")
    }

    /// An unauthenticated client for the configured API.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn api(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config).context("failed to build HTTP client")
    }

    /// An authenticated client for `route`, or the guard's redirect as an error.
    ///
    /// # Errors
    /// Returns an error when nobody is signed in, the role may not open
    /// `route`, or the session cannot be read.
    pub fn authorize(&self, route: Route) -> Result<(Session, ApiClient)> {
        let store = self.load_session()?;
        match store.resolve(route) {
            Decision::Allow => {}
            Decision::Redirect(Route::Login) => {
                bail!("not signed in. run `nutriadmin session login` first")
            }
            Decision::Redirect(home) => {
                let role = store.session().map(|session| session.role.as_str()).unwrap_or("?");
                bail!("the {role} role cannot open {route}; your home view is {home}")
            }
        }

        let (Some(session), Some(token)) = (store.session(), store.token()) else {
            bail!("not signed in. run `nutriadmin session login` first");
        };
        debug!(%route, role = %session.role, "route allowed");
        let api = self.api()?.with_token(Some(token.to_string()));
        Ok((session.clone(), api))
    }
}

/// Read one trimmed, non-empty line from stdin.
///
/// # Errors
/// Returns an error if stdin cannot be read or the line is blank.
pub fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(message: &str) -> bool {
    print!("{message} [y/N] ");
    io::stdout().flush().ok();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Parse an RFC 3339 timestamp such as `2026-05-01T09:00:00Z`.
///
/// # Errors
/// Returns the parse failure as text, for clap to report.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 timestamp: {err}"))
}

/// Treat an empty argument as clearing an optional field.
#[must_use]
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
