use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, validate_required};

/// The signed-in operator's own profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Editable part of a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub full_name: String,
    pub phone_number: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn to_draft(&self) -> ProfileDraft {
        ProfileDraft {
            full_name: self.full_name.clone(),
            phone_number: self.phone_number.clone(),
            avatar_url: self.avatar_url.clone(),
            bio: self.bio.clone(),
        }
    }
}

impl ProfileDraft {
    /// # Errors
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("fullName", validate_required(&self.full_name));
        errors.into_result()
    }
}
