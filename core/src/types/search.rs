use serde::{Deserialize, Serialize};

/// Filter, sort and pagination sent to every `POST /search` endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest<F> {
    /// Resource-specific filter
    pub filter: F,
    /// Sort keys in priority order
    #[serde(default)]
    pub sort: Vec<SortRequest>,
    /// Requested page
    #[serde(default)]
    pub pagination: PaginationRequest,
}

impl<F> SearchRequest<F> {
    /// First page of results matching `filter`, unsorted.
    #[must_use]
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            sort: Vec::new(),
            pagination: PaginationRequest::default(),
        }
    }

    /// Replace the pagination.
    #[must_use]
    pub const fn with_pagination(mut self, pagination: PaginationRequest) -> Self {
        self.pagination = pagination;
        self
    }

    /// Append a sort key.
    #[must_use]
    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push(SortRequest {
            field: field.into(),
            order,
        });
        self
    }
}

/// One-based page selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRequest {
    /// One-based page number
    pub page_number: u32,
    /// Items per page
    pub page_size: u32,
}

impl PaginationRequest {
    /// Page size used when the caller does not choose one.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Page `page_number` with `page_size` items.
    #[must_use]
    pub const fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Query parameters for endpoints that take pagination in the URL.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("pageNumber".to_string(), self.page_number.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ]
    }
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PAGE_SIZE)
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Single sort key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    /// Backend field name, e.g. `startTime`
    pub field: String,
    /// Direction
    pub order: SortOrder,
}
