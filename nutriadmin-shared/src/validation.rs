//! Form validation shared by every create/edit form.
//!
//! The rules are the ones the dashboard enforces before submitting:
//! required fields, an email shape check, password complexity, and
//! notifications that cannot be scheduled in the past.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::{fmt, sync::LazyLock};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Minimum password length accepted by the identity service.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validation errors that can occur during form validation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ValidationError {
    /// Field is required but empty
    Required,
    /// Email address does not look like `name@domain.tld`
    InvalidEmail,
    /// Password lacks length, a lowercase, an uppercase, a digit, or a symbol
    WeakPassword,
    /// Scheduled time is earlier than now
    ScheduledInPast,
    /// Numeric field is out of its allowed range
    OutOfRange,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "is required",
            Self::InvalidEmail => "must be a valid email address",
            Self::WeakPassword => {
                "must be at least 8 characters and mix upper and lower case letters, digits, and symbols"
            }
            Self::ScheduledInPast => "cannot be in the past",
            Self::OutOfRange => "is out of range",
        })
    }
}

/// A failing form field.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub error: ValidationError,
}

/// Every failing field of one form submission.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a field check; `Ok` results are ignored.
    pub fn check(&mut self, field: &'static str, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.0.push(FieldError { field, error });
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// The error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<ValidationError> {
        self.0
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.error)
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    ///
    /// # Errors
    /// Returns the collected errors when at least one check failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{} {}", entry.field, entry.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates that a text field is present.
///
/// # Errors
/// [`ValidationError::Required`] when the value is empty or whitespace.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required)
    } else {
        Ok(())
    }
}

/// Validates an email address.
///
/// # Errors
/// [`ValidationError::Required`] when blank, [`ValidationError::InvalidEmail`]
/// when it is not `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    validate_required(trimmed)?;
    if EMAIL_PATTERN.is_match(trimmed) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validates password complexity.
///
/// At least [`MIN_PASSWORD_LENGTH`] characters with a lowercase letter, an
/// uppercase letter, a digit, and a character that is none of those.
///
/// # Errors
/// [`ValidationError::Required`] when blank, [`ValidationError::WeakPassword`] otherwise.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::Required);
    }

    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if long_enough && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

/// Validates that a scheduled time is not earlier than `now`.
///
/// # Errors
/// [`ValidationError::Required`] when unset, [`ValidationError::ScheduledInPast`]
/// when it precedes `now`.
pub fn validate_schedule(
    scheduled_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    match scheduled_at {
        None => Err(ValidationError::Required),
        Some(at) if at < now => Err(ValidationError::ScheduledInPast),
        Some(_) => Ok(()),
    }
}
