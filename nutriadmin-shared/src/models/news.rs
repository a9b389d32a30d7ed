use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ApiPaths;
use crate::resource::{FormMode, Resource, SearchMode};
use crate::validation::{ValidationErrors, validate_required};

/// A news article shown in the consumer app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct News {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

impl Resource for News {
    type Draft = NewsDraft;

    const NAME: &'static str = "news item";
    const SEARCH: SearchMode = SearchMode::Client;

    fn path(paths: &ApiPaths) -> &str {
        &paths.news
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn columns(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.content.clone(),
            self.author.clone().unwrap_or_default(),
        ]
    }

    fn to_draft(&self) -> NewsDraft {
        NewsDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author.clone(),
            image_url: self.image_url.clone(),
        }
    }

    fn validate(
        draft: &NewsDraft,
        _mode: FormMode,
        _now: DateTime<Utc>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("title", validate_required(&draft.title));
        errors.check("content", validate_required(&draft.content));
        errors.into_result()
    }
}
