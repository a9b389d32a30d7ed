use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Banner, FormMode, Resource, ResourceApi, SearchMode};
use crate::client::ApiError;
use crate::models::{ListQuery, page::page_count};
use crate::validation::ValidationErrors;

/// Why a table operation did not complete.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid form: {0}")]
    Invalid(#[from] ValidationErrors),
}

impl TableError {
    /// Banner text for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Invalid(errors) => format!("Please fix the form: {errors}"),
        }
    }
}

/// List/search/paginate/edit/delete/create controller for one resource.
///
/// The table owns the in-memory record list. Mutations go to the API first
/// and are applied locally only once the API accepts them.
#[derive(Debug)]
pub struct ResourceTable<R: Resource, A: ResourceApi<R>> {
    api: A,
    records: Vec<R>,
    query: ListQuery,
    total: usize,
    banner: Option<Banner>,
    banner_ttl: Duration,
}

impl<R: Resource, A: ResourceApi<R>> ResourceTable<R, A> {
    #[must_use]
    pub fn new(api: A, page_size: u32, banner_ttl: Duration) -> Self {
        Self {
            api,
            records: Vec::new(),
            query: ListQuery::new(page_size),
            total: 0,
            banner: None,
            banner_ttl,
        }
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Everything held in memory, unfiltered.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// The current error banner, unless it has expired.
    #[must_use]
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref().filter(|banner| !banner.is_expired())
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    fn fail(&mut self, err: impl Into<TableError>) -> TableError {
        let err = err.into();
        warn!(resource = R::NAME, error = %err, "resource operation failed");
        self.banner = Some(Banner::new(err.user_message(), self.banner_ttl));
        err
    }

    /// Reload the records for the current query, replacing the in-memory list.
    ///
    /// # Errors
    /// The API failure; it is also raised as a banner.
    pub async fn fetch(&mut self) -> Result<(), TableError> {
        debug!(resource = R::NAME, query = ?self.query, "fetching");
        let result = self.api.list(&self.query).await;
        match result {
            Ok(page) => {
                self.total = page.total;
                self.records = page.items;
                self.banner = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Replace the whole query and load it.
    ///
    /// # Errors
    /// The API failure; it is also raised as a banner.
    pub async fn open(&mut self, query: ListQuery) -> Result<(), TableError> {
        self.query = ListQuery {
            page_size: self.query.page_size,
            ..query
        };
        self.fetch().await
    }

    /// Change the search term and return to the first page. Server-searched
    /// resources refetch; client-searched ones filter what they hold.
    ///
    /// # Errors
    /// The API failure of the refetch.
    pub async fn search(&mut self, term: Option<String>) -> Result<(), TableError> {
        self.query.search = term;
        self.query.page = 1;
        match R::SEARCH {
            SearchMode::Server => self.fetch().await,
            SearchMode::Client => Ok(()),
        }
    }

    /// Move to `page` (1-based).
    ///
    /// # Errors
    /// The API failure of the refetch.
    pub async fn go_to_page(&mut self, page: u32) -> Result<(), TableError> {
        self.query.page = page.max(1);
        match R::SEARCH {
            SearchMode::Server => self.fetch().await,
            SearchMode::Client => Ok(()),
        }
    }

    fn filtered(&self) -> impl Iterator<Item = &R> {
        let term = self.query.search_term().map(str::to_string);
        self.records
            .iter()
            .filter(move |record| term.as_deref().is_none_or(|term| record.matches(term)))
    }

    /// Rows of the current page.
    #[must_use]
    pub fn visible(&self) -> Vec<&R> {
        match R::SEARCH {
            SearchMode::Server => self.records.iter().collect(),
            SearchMode::Client => self
                .filtered()
                .skip(self.query.offset())
                .take(self.query.page_size as usize)
                .collect(),
        }
    }

    /// Rows matching the current search across all pages.
    #[must_use]
    pub fn total(&self) -> usize {
        match R::SEARCH {
            SearchMode::Server => self.total,
            SearchMode::Client => self.filtered().count(),
        }
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        page_count(self.total(), self.query.page_size)
    }

    /// A blank form.
    #[must_use]
    pub fn begin_create(&self) -> R::Draft {
        R::Draft::default()
    }

    /// Form state for editing `id`: from memory when the record is loaded,
    /// otherwise fetched by id.
    ///
    /// # Errors
    /// The API failure of the fetch.
    pub async fn begin_edit(&mut self, id: &str) -> Result<R::Draft, TableError> {
        if let Some(record) = self.find(id) {
            return Ok(record.to_draft());
        }
        debug!(resource = R::NAME, id, "edit target not loaded, fetching");
        let result = self.api.get(id).await;
        match result {
            Ok(record) => Ok(record.to_draft()),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Validate and create a record; the stored record goes to the top of the list.
    ///
    /// # Errors
    /// Validation failures (nothing is sent) or the API failure.
    pub async fn submit_create(
        &mut self,
        draft: &R::Draft,
        now: DateTime<Utc>,
    ) -> Result<R, TableError> {
        if let Err(errors) = R::validate(draft, FormMode::Create, now) {
            return Err(self.fail(errors));
        }
        let result = self.api.create(draft).await;
        match result {
            Ok(record) => {
                self.records.insert(0, record.clone());
                self.total += 1;
                Ok(record)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Validate and update `id`; the stored record replaces the one in the list.
    ///
    /// # Errors
    /// Validation failures (nothing is sent) or the API failure.
    pub async fn submit_edit(
        &mut self,
        id: &str,
        draft: &R::Draft,
        now: DateTime<Utc>,
    ) -> Result<R, TableError> {
        if let Err(errors) = R::validate(draft, FormMode::Edit, now) {
            return Err(self.fail(errors));
        }
        let result = self.api.update(id, draft).await;
        match result {
            Ok(record) => {
                if let Some(slot) = self.records.iter_mut().find(|existing| existing.id() == id) {
                    *slot = record.clone();
                }
                Ok(record)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Delete `id` once `confirm` agrees. Returns `false` when the operator declined.
    ///
    /// # Errors
    /// The API failure; the record stays in the list.
    pub async fn delete<F>(&mut self, id: &str, confirm: F) -> Result<bool, TableError>
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(id) {
            return Ok(false);
        }
        let result = self.api.delete(id).await;
        match result {
            Ok(()) => {
                let before = self.records.len();
                self.records.retain(|record| record.id() != id);
                if self.records.len() < before {
                    self.total = self.total.saturating_sub(1);
                }
                Ok(true)
            }
            Err(err) => Err(self.fail(err)),
        }
    }
}
