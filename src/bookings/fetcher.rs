// fetcher.rs
use crate::bookings::{BookingRecord, FetchError};
use serde_json::Value;
use tracing::{debug, info, warn};

// Where the records array may live in a page body (besides a bare array).
const RECORD_PATHS: &[&[&str]] = &[&["data"], &["bookings"], &["data", "bookings"], &["items"]];

const HAS_NEXT_PATHS: &[&[&str]] = &[
    &["pagination", "hasNext"],
    &["pagination", "hasNextPage"],
    &["hasNext"],
    &["hasNextPage"],
    &["meta", "hasNext"],
];

const PAGING_SCOPES: &[&str] = &["pagination", "meta"];

/// One page of bookings plus whatever the server said about the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<BookingRecord>,
    /// `None` when the response carried no pagination hint.
    pub has_next: Option<bool>,
}

impl Page {
    pub fn from_json(body: Value) -> Result<Self, FetchError> {
        let has_next = has_next_hint(&body);

        let records = match body {
            Value::Array(items) => items,
            mut body => RECORD_PATHS
                .iter()
                .find_map(|path| take_array(&mut body, path))
                .ok_or_else(|| {
                    FetchError::UnexpectedShape("bookings array missing".to_string())
                })?,
        };

        Ok(Self {
            records: records.into_iter().map(BookingRecord::new).collect(),
            has_next,
        })
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(*key))
}

fn take_array(body: &mut Value, path: &[&str]) -> Option<Vec<Value>> {
    let mut node = body;
    for key in path {
        node = node.get_mut(*key)?;
    }
    match node.take() {
        Value::Array(items) => Some(items),
        other => {
            *node = other;
            None
        }
    }
}

fn has_next_hint(body: &Value) -> Option<bool> {
    if let Some(flag) = HAS_NEXT_PATHS
        .iter()
        .find_map(|path| lookup(body, path).and_then(Value::as_bool))
    {
        return Some(flag);
    }

    // { "pagination": { "page": 2, "totalPages": 5 } }
    PAGING_SCOPES.iter().find_map(|scope| {
        let scope = body.get(*scope)?;
        let page = scope
            .get("page")
            .or_else(|| scope.get("currentPage"))
            .and_then(Value::as_u64)?;
        let total = scope.get("totalPages").and_then(Value::as_u64)?;
        Some(page < total)
    })
}

/// Source of booking pages. Pages are numbered from 1.
pub trait PageSource {
    fn fetch_page(&self, page: u32, page_size: u32) -> Result<Page, FetchError>;
}

/// Walks a [`PageSource`] one page at a time until it runs dry, bounded by
/// `max_pages`.
pub struct BookingFetcher<S> {
    source: S,
    page_size: u32,
    max_pages: u32,
}

impl<S: PageSource> BookingFetcher<S> {
    pub fn new(source: S, page_size: u32, max_pages: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the whole history. Any failed page fails the whole fetch.
    pub fn fetch_all(&self) -> Result<Vec<BookingRecord>, FetchError> {
        let mut all = Vec::new();

        for page in 1..=self.max_pages {
            let Page { records, has_next } = self
                .source
                .fetch_page(page, self.page_size)
                .map_err(|e| {
                    warn!(page, error = %e, "bookings page failed, aborting fetch");
                    e
                })?;

            let count = records.len();
            debug!(page, count, ?has_next, "bookings page fetched");
            all.extend(records);

            // Either signal ends the walk: an explicit "no more" or a short page.
            let more = count >= self.page_size as usize && has_next != Some(false);
            if !more {
                info!(pages = page, total = all.len(), "bookings fetch complete");
                return Ok(all);
            }
        }

        warn!(
            max_pages = self.max_pages,
            total = all.len(),
            "page limit reached, stopping bookings fetch"
        );
        Ok(all)
    }
}
