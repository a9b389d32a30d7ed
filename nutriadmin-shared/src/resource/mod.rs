//! Generic CRUD-resource plumbing.
//!
//! Every dashboard table (users, recipes, news, notifications) is the same
//! controller bound to a different [`Resource`]. The resource type carries
//! what differs: endpoint, search mode, form draft, searchable columns, and
//! form validation. [`ResourceApi`] is the repository seam the controller
//! talks to.

mod banner;
mod table;

pub use banner::{Banner, FALLBACK_MESSAGE};
pub use table::{ResourceTable, TableError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

use crate::client::ApiError;
use crate::config::ApiPaths;
use crate::models::{ListQuery, Page};
use crate::validation::ValidationErrors;

/// Where a resource's search term is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Search and paging are sent as query parameters; the server returns one page.
    Server,
    /// The whole collection is fetched and filtered in memory.
    Client,
}

/// Whether a form submission creates a record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// A record type managed through a resource table.
pub trait Resource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Form state used for create and edit.
    type Draft: Clone + Debug + Default + Serialize + Send + Sync + 'static;

    /// Singular display name, e.g. `"recipe"`.
    const NAME: &'static str;

    /// Where searching happens for this resource.
    const SEARCH: SearchMode;

    /// Endpoint path relative to the API base URL.
    fn path(paths: &ApiPaths) -> &str;

    /// Record identifier.
    fn id(&self) -> &str;

    /// Values of the columns shown in the table; client-side search matches against these.
    fn columns(&self) -> Vec<String>;

    /// Pre-populated form state for editing this record.
    fn to_draft(&self) -> Self::Draft;

    /// Field-level checks run before a create or update is submitted.
    ///
    /// # Errors
    /// Returns every failing field.
    fn validate(
        draft: &Self::Draft,
        mode: FormMode,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationErrors>;

    /// Case-insensitive substring match over [`Resource::columns`].
    fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .columns()
                .iter()
                .any(|column| column.to_lowercase().contains(&needle))
    }
}

/// Repository interface a resource table is bound to.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    /// Fetch a page of records. Client-searched resources ignore the
    /// search and paging fields and return the full collection.
    async fn list(&self, query: &ListQuery) -> Result<Page<R>, ApiError>;

    /// Fetch a single record.
    async fn get(&self, id: &str) -> Result<R, ApiError>;

    /// Create a record from a draft and return what the server stored.
    async fn create(&self, draft: &R::Draft) -> Result<R, ApiError>;

    /// Replace a record and return what the server stored.
    async fn update(&self, id: &str, draft: &R::Draft) -> Result<R, ApiError>;

    /// Remove a record.
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}
