//
//  wsapi-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination for WSAPI query resources.
//!
//! WSAPI pages are offset based: a request names a 1-based `start` index and a
//! `pagesize`, and every page repeats the total number of matching objects in
//! `QueryResult.TotalResultCount`. [`fetch_all_pages`] keeps requesting pages
//! until it has collected at least that many objects.
//!
//! # Overview
//!
//! | Type | Role |
//! |------|------|
//! | [`QueryOptions`] | Caller supplied start, page size, filter and fetch flag |
//! | [`PageQuery`] | The start/pagesize pair for one round-trip |
//! | [`PageSource`] | Anything that can fetch one page |
//!
//! # Notes
//!
//! - The total is re-read from every page rather than cached from the first.
//!   If the server reports a different total later on, the newest value wins.
//! - Paged requests default to 100 objects per page. Single-object reads
//!   elsewhere use 200 ([`DEFAULT_PAGE_SIZE`]).

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{ApiError, RawResponse, Result};
use crate::api::mapper::{map_many, total_result_count};
use crate::models::WsapiObject;

/// Page size used by [`fetch_all_pages`] when the caller does not set one.
pub const DEFAULT_PAGING_PAGE_SIZE: u32 = 100;

/// Page size sent with non-paginated requests.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Caller options for a query request.
///
/// # Example
///
/// ```rust
/// use wsapi_client::api::common::QueryOptions;
///
/// let options = QueryOptions::new()
///     .with_pagesize(50)
///     .with_query("(Name = \"Alpha\")");
///
/// assert_eq!(options.pagesize, Some(50));
/// assert_eq!(options.start, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// 1-based index of the first object to return.
    pub start: Option<u32>,
    /// Number of objects per page.
    pub pagesize: Option<u32>,
    /// Filter expression, e.g. `(UserName = "antti")`.
    pub query: Option<String>,
    /// Whether to fetch full objects instead of references. Defaults to `true`.
    pub fetch: Option<bool>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_pagesize(mut self, pagesize: u32) -> Self {
        self.pagesize = Some(pagesize);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = Some(fetch);
        self
    }
}

/// Start index and size of one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// 1-based index of the first object on the page.
    pub start: u32,
    /// Number of objects requested.
    pub pagesize: u32,
}

impl PageQuery {
    /// First page for the given options. Zero values are raised to 1.
    pub fn first(options: &QueryOptions) -> Self {
        Self {
            start: options.start.unwrap_or(1).max(1),
            pagesize: options
                .pagesize
                .unwrap_or(DEFAULT_PAGING_PAGE_SIZE)
                .max(1),
        }
    }

    /// The page that follows this one.
    pub fn next(self) -> Self {
        Self {
            start: self.start.saturating_add(self.pagesize),
            pagesize: self.pagesize,
        }
    }
}

/// Fetches one page of a query resource.
///
/// [`Session`](crate::Session) implements this for its own resources; tests
/// and callers with custom transports can provide their own.
#[async_trait]
pub trait PageSource: Send {
    async fn fetch_page(&mut self, page: PageQuery) -> Result<RawResponse>;
}

/// Fetches every page of a query and concatenates the results in order.
///
/// # Errors
///
/// Stops at the first page that fails to fetch, classify or map, and returns
/// that error. Objects from earlier pages are discarded.
///
/// Short or empty pages do not end the loop while the total is unmet. An
/// empty page that starts past the total is an `ApiError`, since no later
/// page can supply the missing objects.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use wsapi_client::api::common::{fetch_all_pages, PageQuery, PageSource, QueryOptions, RawResponse, Result};
///
/// struct OnePage;
///
/// #[async_trait]
/// impl PageSource for OnePage {
///     async fn fetch_page(&mut self, _page: PageQuery) -> Result<RawResponse> {
///         let body = r#"{"QueryResult": {"TotalResultCount": 1, "Errors": [],
///                        "Results": [{"_type": "Project", "_refObjectName": "Alpha"}]}}"#;
///         Ok(RawResponse::new(200, "https://example.com/v3.0/Project", body))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let projects = fetch_all_pages(&QueryOptions::new(), &mut OnePage).await?;
/// assert_eq!(projects.len(), 1);
/// # Ok::<(), wsapi_client::api::common::ApiError>(())
/// # }).unwrap();
/// ```
pub async fn fetch_all_pages<S>(options: &QueryOptions, source: &mut S) -> Result<Vec<WsapiObject>>
where
    S: PageSource + ?Sized,
{
    let mut page = PageQuery::first(options);
    let mut objects = Vec::new();

    loop {
        let response = source.fetch_page(page).await?;
        let results = map_many(&response)?;
        let total = total_result_count(&response)?;
        let received = results.len();

        objects.extend(results);
        debug!(
            start = page.start,
            pagesize = page.pagesize,
            received,
            total,
            "fetched page"
        );

        if objects.len() as u64 >= total {
            break;
        }

        // Pages past the total can never fill the gap.
        if received == 0 && u64::from(page.start) > total {
            warn!(
                collected = objects.len(),
                total, "empty page past the reported total"
            );
            return Err(ApiError::api_error(
                format!(
                    "Empty page at start {} before reaching TotalResultCount {} ({} collected)",
                    page.start,
                    total,
                    objects.len()
                ),
                Some(response),
            ));
        }

        page = page.next();
    }

    Ok(objects)
}
