//! The signed-in identity and its lifecycle.
//!
//! A session exists only while a persisted token decodes to an allowed role
//! and a user id. Login creates it, logout destroys it, and loading a
//! missing or unusable token leaves the client signed out with its storage
//! cleared.

pub mod claims;
pub mod storage;

pub use claims::{TokenIdentity, decode_claims};
pub use storage::{FileStorage, MemoryStorage, PersistedCredentials, SessionStorage, StorageError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ApiError, AuthApi};
use crate::guard::{self, Decision, Route};
use crate::models::{LoginRequest, Role};
use crate::validation::{ValidationErrors, validate_email, validate_required};

/// The authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub role: Role,
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid form: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("malformed access token: {0}")]
    MalformedToken(#[from] jsonwebtoken::errors::Error),
    #[error("access token has expired")]
    Expired,
    #[error("role {0} is not allowed to use the admin dashboard")]
    RoleNotAllowed(String),
    #[error("access token does not name a user")]
    MissingSubject,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Text for the login form's error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Invalid(errors) => format!("Please fix the form: {errors}"),
            Self::RoleNotAllowed(_) => {
                "You do not have permission to access the admin dashboard.".to_string()
            }
            Self::Expired => "Your session has expired. Please sign in again.".to_string(),
            Self::MalformedToken(_) | Self::MissingSubject | Self::Storage(_) => {
                crate::resource::FALLBACK_MESSAGE.to_string()
            }
        }
    }
}

/// Current session plus the storage it is persisted in.
#[derive(Debug)]
pub struct SessionStore<S: SessionStorage> {
    storage: S,
    token: Option<String>,
    current: Option<Session>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Restore the session persisted in `storage`.
    ///
    /// A token that is missing, undecodable, expired, or names no allowed
    /// role leaves the store signed out; unusable credentials are cleared.
    ///
    /// # Errors
    /// Only I/O failures of the storage itself.
    pub fn load(storage: S, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let mut store = Self {
            storage,
            token: None,
            current: None,
        };

        let credentials = match store.storage.load() {
            Ok(Some(credentials)) => credentials,
            Ok(None) => return Ok(store),
            Err(StorageError::Corrupt(err)) => {
                warn!(error = %err, "discarding unreadable session");
                store.storage.clear()?;
                return Ok(store);
            }
            Err(err) => return Err(err.into()),
        };

        match decode_claims(&credentials.token).and_then(|identity| identity.into_session(now)) {
            Ok(session) => {
                store.token = Some(credentials.token);
                store.current = Some(session);
            }
            Err(err) => {
                warn!(error = %err, "discarding stored session");
                store.storage.clear()?;
            }
        }
        Ok(store)
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Bearer token of the current session.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().and(self.token.as_deref())
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Where navigating to `route` leads for the current session.
    #[must_use]
    pub fn resolve(&self, route: Route) -> Decision {
        guard::resolve(self.session(), route)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    /// Form validation failures (nothing is sent), the API failure, or a
    /// token whose role or subject makes it unusable. Rejected tokens clear
    /// any stored credentials.
    pub async fn login<A>(
        &mut self,
        api: &A,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<&Session, SessionError>
    where
        A: AuthApi + ?Sized,
    {
        let mut errors = ValidationErrors::new();
        errors.check("email", validate_email(email));
        errors.check("password", validate_required(password));
        errors.into_result()?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = api.login(&request).await?;

        let session = match decode_claims(&response.token).and_then(|identity| identity.into_session(now)) {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "rejecting login token");
                self.forget()?;
                return Err(err);
            }
        };

        self.storage.save(&PersistedCredentials {
            token: response.token.clone(),
            role: Some(session.role),
            user_id: Some(session.user_id.clone()),
        })?;
        info!(role = %session.role, user_id = %session.user_id, "signed in");
        self.token = Some(response.token);
        Ok(self.current.insert(session))
    }

    /// Sign out and clear the persisted credentials.
    ///
    /// # Errors
    /// Storage failures while clearing.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(session) = &self.current {
            info!(user_id = %session.user_id, "signed out");
        }
        self.forget()
    }

    fn forget(&mut self) -> Result<(), SessionError> {
        self.token = None;
        self.current = None;
        self.storage.clear()?;
        Ok(())
    }
}
