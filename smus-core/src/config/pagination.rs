//! Listing configuration.

use serde::{Deserialize, Serialize};

/// Controls how far paginated listings may go.
///
/// Listings are unbounded by default; a ceiling turns a service that keeps
/// returning continuation tokens into an error instead of an endless loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Maximum number of pages to request per listing
    pub max_pages: Option<usize>,
}

impl PaginationConfig {
    /// Creates an unbounded pagination config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the page ceiling.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Validates the pagination configuration.
    ///
    /// # Errors
    /// Returns error if the ceiling is zero
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_pages == Some(0) {
            return Err(crate::error::SmusError::configuration(
                "max_pages must be greater than 0",
            ));
        }
        Ok(())
    }
}
