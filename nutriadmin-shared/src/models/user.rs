use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::config::ApiPaths;
use crate::resource::{FormMode, Resource, SearchMode};
use crate::validation::{
    ValidationErrors, validate_email, validate_password, validate_required,
};

/// Roles allowed to operate the admin dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    /// Return the canonical string representation used by the platform.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = &'static str;

    /// Case-insensitive; token issuers disagree on capitalisation.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            _ => Err("role is not allowed to use the admin dashboard"),
        }
    }
}

/// A platform account as listed in user management.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Platform role; end users carry roles the dashboard itself rejects.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Form state for creating or editing a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role: String,
    pub is_active: bool,
    /// Required on create, optional on edit where it means "change password".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone_number: None,
            role: Role::Staff.as_str().to_string(),
            is_active: true,
            password: None,
        }
    }
}

impl Resource for User {
    type Draft = UserDraft;

    const NAME: &'static str = "user";
    const SEARCH: SearchMode = SearchMode::Server;

    fn path(paths: &ApiPaths) -> &str {
        &paths.users
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn columns(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.email.clone(),
            self.role.clone().unwrap_or_default(),
        ]
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role.clone().unwrap_or_default(),
            is_active: self.is_active,
            password: None,
        }
    }

    fn validate(
        draft: &UserDraft,
        mode: FormMode,
        _now: DateTime<Utc>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("fullName", validate_required(&draft.full_name));
        errors.check("email", validate_email(&draft.email));
        errors.check("role", validate_required(&draft.role));
        match (mode, draft.password.as_deref()) {
            (FormMode::Create, password) => {
                errors.check("password", validate_password(password.unwrap_or_default()));
            }
            (FormMode::Edit, Some(password)) => {
                errors.check("password", validate_password(password));
            }
            (FormMode::Edit, None) => {}
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    fn sample_user() -> User {
        User {
            id: "17".to_string(),
            full_name: "Mai Tran".to_string(),
            email: "mai@example.com".to_string(),
            phone_number: Some("+84 90 000 0000".to_string()),
            role: Some("Staff".to_string()),
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn user_role_roundtrip() {
        for (text, role) in [("Admin", Role::Admin), ("Staff", Role::Staff)] {
            assert_eq!(role.as_str(), text);
            assert_eq!(role.to_string(), text);
            assert_eq!(Role::from_str(text).unwrap(), role);
            assert_eq!(Role::from_str(&text.to_uppercase()).unwrap(), role);
        }
    }

    #[test]
    fn user_role_rejects_platform_roles() {
        assert!(Role::from_str("User").is_err());
        assert!(Role::from_str("Nutritionist").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_user_deserializes_numeric_id_and_defaults() {
        let user: User = serde_json::from_str(
            r#"{"id":17,"fullName":"Mai Tran","email":"mai@example.com"}"#,
        )
        .unwrap();

        assert_eq!(user.id, "17");
        assert!(user.is_active);
        assert_eq!(user.role, None);
    }

    #[test]
    fn test_user_columns_match_case_insensitively() {
        let user = sample_user();
        assert!(user.matches("TRAN"));
        assert!(user.matches("example.com"));
        assert!(user.matches("staff"));
        assert!(!user.matches("admin"));
    }

    #[test]
    fn test_draft_from_user_has_no_password() {
        let draft = sample_user().to_draft();
        assert_eq!(draft.full_name, "Mai Tran");
        assert_eq!(draft.role, "Staff");
        assert!(draft.password.is_none());

        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["fullName"], "Mai Tran");
    }

    #[test]
    fn test_create_requires_strong_password() {
        let now = Utc::now();
        let mut draft = sample_user().to_draft();

        let errors = User::validate(&draft, FormMode::Create, now).unwrap_err();
        assert_eq!(errors.get("password"), Some(ValidationError::Required));

        draft.password = Some("weakpass".to_string());
        let errors = User::validate(&draft, FormMode::Create, now).unwrap_err();
        assert_eq!(errors.get("password"), Some(ValidationError::WeakPassword));

        draft.password = Some("G00d!Pass".to_string());
        assert!(User::validate(&draft, FormMode::Create, now).is_ok());
    }

    #[test]
    fn test_edit_allows_missing_password() {
        let draft = sample_user().to_draft();
        assert!(User::validate(&draft, FormMode::Edit, Utc::now()).is_ok());
    }

    #[test]
    fn test_blank_draft_reports_every_field() {
        let errors = User::validate(&UserDraft::default(), FormMode::Create, Utc::now())
            .unwrap_err();
        assert_eq!(errors.get("fullName"), Some(ValidationError::Required));
        assert_eq!(errors.get("email"), Some(ValidationError::Required));
        assert_eq!(errors.get("password"), Some(ValidationError::Required));
        assert_eq!(errors.get("role"), None);
    }
}
