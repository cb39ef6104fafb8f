//! Cursor-paginated retrieval
//!
//! The explorer serves logically unbounded result sets one page at a time.
//! Each response carries an opaque continuation cursor in a direction-specific
//! header; [`fetch_all_pages`] chains those cursors into a single ordered
//! sequence, pacing requests with a configurable inter-page delay.
//!
//! Termination: the traversal stops when a response carries no continuation
//! header, or when the header repeats the cursor that was just consumed
//! (some deployments repeat the last cursor instead of omitting the header).
//! Only the immediately previous cursor is compared — a server cycling
//! through several older cursors is not detected.
//!
//! Failure is all-or-nothing: any transport, status, or decode error — and
//! any cancellation — aborts the whole traversal without partial results.

use crate::error::{Error, Result};
use crate::http::RequestPipeline;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Which boundary a traversal walks from its seed
///
/// The direction is fixed for the lifetime of one traversal and selects both
/// the boundary query parameter and the continuation response header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageDirection {
    /// Walk backward: only results before the boundary
    Before,
    /// Walk forward: only results after the boundary
    After,
}

impl PageDirection {
    /// Boundary query-parameter name for this direction
    pub fn query_param(self) -> &'static str {
        match self {
            PageDirection::Before => "before",
            PageDirection::After => "after",
        }
    }

    /// Continuation response-header name for this direction
    pub fn header_name(self) -> &'static str {
        match self {
            PageDirection::Before => "X-Next-Page-Before",
            PageDirection::After => "X-Next-Page-After",
        }
    }
}

/// Parameters of one pagination traversal
pub struct PageWalk<Q> {
    /// Boundary and header selection, fixed for the whole traversal
    pub direction: PageDirection,
    /// Initial cursor value, e.g. an epoch-millis timestamp; `"0"` is the
    /// endpoint's neutral "from the beginning" value
    pub seed: String,
    /// Cancellable wait between consecutive page requests
    pub page_delay: Duration,
    /// Builds the relative query for one page from the current cursor
    pub build_query: Q,
}

/// Retrieves every page of a cursor-paginated endpoint as one sorted sequence
///
/// Pages are fetched strictly sequentially in cursor order; the final item
/// ordering is independent of fetch order and established once by the
/// terminal sort over `sort_key`.
pub async fn fetch_all_pages<T, Q, S, K>(
    pipeline: &RequestPipeline,
    walk: PageWalk<Q>,
    sort_key: S,
    cancel: &CancellationToken,
) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    Q: FnMut(&str) -> String,
    S: Fn(&T) -> K,
    K: Ord,
{
    let PageWalk {
        direction,
        seed,
        page_delay,
        mut build_query,
    } = walk;

    let mut items: Vec<T> = Vec::new();
    let mut next = Some(seed);
    let mut pages = 0u32;

    while let Some(cursor) = next.take() {
        if cancel.is_cancelled() {
            return Err(Error::Canceled);
        }

        let query = build_query(&cursor);
        let response = pipeline.get(&query, cancel).await?;

        // The continuation header must be captured before the body read
        // consumes the response.
        let header = response
            .headers()
            .get(direction.header_name())
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let page: Vec<T> = pipeline.read_json(response, cancel).await?;
        pages += 1;
        tracing::debug!(page = pages, items = page.len(), total = items.len() + page.len(), "fetched page");
        items.extend(page);

        // Repeat guard: continue only on a cursor that differs from the one
        // just consumed. A missing header means no more pages.
        next = header.filter(|h| *h != cursor);

        if next.is_some() {
            // Delay to keep the request rate bounded; the wait itself is
            // cancellable.
            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Canceled),
                _ = tokio::time::sleep(page_delay) => {}
            }
        }
    }

    items.sort_by_key(|item| sort_key(item));
    Ok(items)
}
