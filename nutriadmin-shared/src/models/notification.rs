use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ApiPaths;
use crate::resource::{FormMode, Resource, SearchMode};
use crate::validation::{ValidationErrors, validate_required, validate_schedule};

/// A push notification scheduled for delivery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub scheduled_at: DateTime<Utc>,
    /// Target group, e.g. all users or premium subscribers.
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub audience: Option<String>,
}

impl Resource for Notification {
    type Draft = NotificationDraft;

    const NAME: &'static str = "notification";
    const SEARCH: SearchMode = SearchMode::Client;

    fn path(paths: &ApiPaths) -> &str {
        &paths.notifications
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn columns(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.message.clone(),
            self.audience.clone().unwrap_or_default(),
            self.status.clone().unwrap_or_default(),
        ]
    }

    fn to_draft(&self) -> NotificationDraft {
        NotificationDraft {
            title: self.title.clone(),
            message: self.message.clone(),
            scheduled_at: Some(self.scheduled_at),
            audience: self.audience.clone(),
        }
    }

    fn validate(
        draft: &NotificationDraft,
        _mode: FormMode,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("title", validate_required(&draft.title));
        errors.check("message", validate_required(&draft.message));
        errors.check("scheduledAt", validate_schedule(draft.scheduled_at, now));
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_notification_cannot_be_scheduled_in_past() {
        let now = Utc.with_ymd_and_hms(2026, 5, 10, 8, 30, 0).unwrap();
        let mut draft = NotificationDraft {
            title: "Hydration reminder".to_string(),
            message: "Drink a glass of water".to_string(),
            scheduled_at: Some(now - Duration::hours(1)),
            audience: None,
        };

        let errors = Notification::validate(&draft, FormMode::Create, now).unwrap_err();
        assert_eq!(errors.get("scheduledAt"), Some(ValidationError::ScheduledInPast));

        draft.scheduled_at = Some(now + Duration::hours(1));
        assert!(Notification::validate(&draft, FormMode::Create, now).is_ok());
    }

    #[test]
    fn test_notification_wire_format() {
        let notification: Notification = serde_json::from_str(
            r#"{"id":9,"title":"Weekly plan","message":"Your plan is ready","scheduledAt":"2026-05-11T07:00:00Z","status":"Pending"}"#,
        )
        .unwrap();

        assert_eq!(notification.id, "9");
        assert_eq!(
            notification.scheduled_at,
            Utc.with_ymd_and_hms(2026, 5, 11, 7, 0, 0).unwrap()
        );
        assert!(notification.matches("pending"));

        let draft = notification.to_draft();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["scheduledAt"], "2026-05-11T07:00:00Z");
    }
}
