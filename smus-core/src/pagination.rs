//! Token-driven listing helpers.
//!
//! Services hand back one page at a time plus an opaque continuation token.
//! [`collect_pages`] keeps requesting until no token comes back, with an
//! optional page ceiling for services (or test doubles) that never stop.

use crate::{
    Result,
    config::PaginationConfig,
    error::SmusError,
    models::Page,
};
use std::future::Future;

/// Follows continuation tokens until exhausted, accumulating every item.
///
/// `fetch` receives `None` for the first request and the previous page's
/// token afterwards. An empty token string counts as "no more pages".
///
/// # Errors
/// Propagates the first fetch error unchanged. Returns `PaginationLimit` when
/// `config.max_pages` pages were read and the service still had more.
pub async fn collect_pages<T, F, Fut>(
    scope: &'static str,
    config: &PaginationConfig,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut pages: usize = 0;

    loop {
        if let Some(max_pages) = config.max_pages
            && pages >= max_pages
        {
            return Err(SmusError::PaginationLimit { scope, max_pages });
        }

        let page = fetch(token.take()).await?;
        pages = pages.saturating_add(1);
        tracing::trace!("{}: page {} returned {} items", scope, pages, page.items.len());
        items.extend(page.items);

        match page.next_token {
            Some(next) if !next.is_empty() => token = Some(next),
            _ => break,
        }
    }

    tracing::debug!("{}: collected {} items over {} pages", scope, items.len(), pages);
    Ok(items)
}
