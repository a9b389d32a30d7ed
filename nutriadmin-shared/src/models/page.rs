use serde::Deserialize;

/// Search term and paging requested by a resource table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Free-text search; blank means no filter.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ListQuery {
    /// First page, no search.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            search: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// The trimmed search term, or `None` when it is blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Number of rows preceding the requested page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.page_size as usize
    }
}

/// One page of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    /// Total rows across all pages.
    pub total: usize,
}

impl<T> Page<T> {
    /// Number of pages needed for [`Page::total`]; at least one.
    #[must_use]
    pub fn page_count(&self) -> usize {
        page_count(self.total, self.page_size)
    }
}

pub(crate) fn page_count(total: usize, page_size: u32) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size as usize).max(1)
}

/// List endpoints answer either with a bare array or with a paged envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Envelope(Envelope<T>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(alias = "data")]
    items: Vec<T>,
    #[serde(default, alias = "totalCount", alias = "totalItems")]
    total: Option<usize>,
    #[serde(default, alias = "pageNumber")]
    page: Option<u32>,
    #[serde(default)]
    page_size: Option<u32>,
}

impl<T> ListPayload<T> {
    /// Normalise the payload into a [`Page`], filling gaps from the query
    /// that produced it.
    #[must_use]
    pub fn into_page(self, query: &ListQuery) -> Page<T> {
        match self {
            Self::Bare(items) => Page {
                total: items.len(),
                page: 1,
                page_size: u32::try_from(items.len()).unwrap_or(u32::MAX),
                items,
            },
            Self::Envelope(envelope) => Page {
                total: envelope.total.unwrap_or(envelope.items.len()),
                page: envelope.page.unwrap_or(query.page),
                page_size: envelope.page_size.unwrap_or(query.page_size),
                items: envelope.items,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_term_ignores_blank_input() {
        let query = ListQuery::new(10).with_search(Some("   ".to_string()));
        assert_eq!(query.search_term(), None);

        let query = ListQuery::new(10).with_search(Some("  soup ".to_string()));
        assert_eq!(query.search_term(), Some("soup"));
    }

    #[test]
    fn offset_and_page_floor() {
        assert_eq!(ListQuery::new(10).with_page(3).offset(), 20);
        assert_eq!(ListQuery::new(10).with_page(0).page, 1);
        assert_eq!(ListQuery::new(0).page_size, 1);
    }

    #[test]
    fn bare_array_becomes_single_page() {
        let payload: ListPayload<u32> = serde_json::from_str("[1,2,3]").unwrap();
        let page = payload.into_page(&ListQuery::new(10).with_page(4));

        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 3);
        assert_eq!(page.page_count(), 1);
    }

    #[test]
    fn envelope_with_total_count() {
        let payload: ListPayload<u32> =
            serde_json::from_str(r#"{"data":[7,8],"totalCount":12,"pageNumber":2}"#).unwrap();
        let page = payload.into_page(&ListQuery::new(5));

        assert_eq!(page.items, vec![7, 8]);
        assert_eq!(page.total, 12);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.page_count(), 3);
    }

    #[test]
    fn envelope_without_total_counts_items() {
        let payload: ListPayload<u32> = serde_json::from_str(r#"{"items":[1]}"#).unwrap();
        let page = payload.into_page(&ListQuery::new(5));
        assert_eq!(page.total, 1);
    }

    #[test]
    fn empty_page_still_has_one_page() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(21, 10), 3);
        assert_eq!(page_count(5, 0), 1);
    }
}
