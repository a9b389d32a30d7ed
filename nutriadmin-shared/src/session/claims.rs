//! Bearer-token claim extraction.
//!
//! The client never holds the signing key, so it cannot verify tokens; it
//! only reads the claims it needs to pick a role and a user id. The API
//! re-checks the token on every call.

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde_json::{Map, Value};

use super::{Session, SessionError};
use crate::models::Role;

const ROLE_CLAIMS: &[&str] = &[
    "role",
    "roles",
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
];

const SUBJECT_CLAIMS: &[&str] = &[
    "sub",
    "nameid",
    "userId",
    "upId",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
];

/// What the client learns from an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    /// Every role named by the token, as issued.
    pub roles: Vec<String>,
    pub user_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenIdentity {
    /// Turn the claims into a dashboard session.
    ///
    /// Admin wins when the token names both dashboard roles.
    ///
    /// # Errors
    /// [`SessionError::Expired`] when `exp` is not after `now`,
    /// [`SessionError::RoleNotAllowed`] when no role is Admin or Staff,
    /// [`SessionError::MissingSubject`] when no user id claim is present.
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session, SessionError> {
        if self.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return Err(SessionError::Expired);
        }

        let allowed: Vec<Role> = self
            .roles
            .iter()
            .filter_map(|role| role.parse().ok())
            .collect();
        let role = if allowed.contains(&Role::Admin) {
            Role::Admin
        } else if allowed.contains(&Role::Staff) {
            Role::Staff
        } else {
            return Err(SessionError::RoleNotAllowed(if self.roles.is_empty() {
                "(none)".to_string()
            } else {
                self.roles.join(", ")
            }));
        };

        let user_id = self.user_id.ok_or(SessionError::MissingSubject)?;
        Ok(Session { role, user_id })
    }
}

/// Read the claims of `token` without checking its signature.
///
/// # Errors
/// [`SessionError::MalformedToken`] when the token is not a decodable JWT.
pub fn decode_claims(token: &str) -> Result<TokenIdentity, SessionError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_aud = false;

    let data = decode::<Map<String, Value>>(token, &DecodingKey::from_secret(&[]), &validation)?;
    let claims = data.claims;

    let roles = ROLE_CLAIMS
        .iter()
        .filter_map(|key| claims.get(*key))
        .flat_map(strings)
        .collect();
    let user_id = SUBJECT_CLAIMS
        .iter()
        .filter_map(|key| claims.get(*key))
        .find_map(scalar_string);
    let expires_at = claims
        .get("exp")
        .and_then(numeric_date)
        .and_then(|exp| DateTime::from_timestamp(exp, 0));

    Ok(TokenIdentity {
        roles,
        user_id,
        expires_at,
    })
}

/// A JWT `NumericDate`: whole seconds, or fractional seconds rounded down.
#[allow(clippy::cast_possible_truncation)]
fn numeric_date(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|seconds| seconds.is_finite())
            .map(|seconds| seconds.floor() as i64)
    })
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn strings(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}
