//! Republishing of project assets through publish changesets.
//!
//! Each asset gets one publish changeset, then its listing is polled at a
//! fixed interval until it turns `ACTIVE`, fails, or the wait budget runs
//! out. A failure on one asset is recorded and the run moves on.

use crate::{
    Result,
    adapters::CatalogApi,
    catalog::list_asset_ids,
    config::{PaginationConfig, PollConfig},
    error::SmusError,
    models::ListingStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info};

/// Polls a listing until it reaches a terminal status.
///
/// The status is read immediately, then once per `poll.interval`.
///
/// # Errors
/// - `ChangesetFailed` as soon as the listing reports `FAILED` or `CANCELLED`
/// - `ChangesetTimeout` once `poll.timeout` has elapsed without a terminal status
/// - any error from the status call itself
pub async fn wait_for_listing(
    catalog: &dyn CatalogApi,
    domain_id: &str,
    listing_id: &str,
    poll: &PollConfig,
) -> Result<()> {
    let started = Instant::now();

    loop {
        match catalog.get_listing_status(domain_id, listing_id).await? {
            ListingStatus::Active => return Ok(()),
            ListingStatus::Failed(status) => {
                return Err(SmusError::ChangesetFailed {
                    listing_id: listing_id.to_string(),
                    status,
                });
            }
            ListingStatus::InProgress(status) => {
                debug!("Changeset {} is {}", listing_id, status);
            }
        }

        sleep(poll.interval).await;

        let waited = started.elapsed();
        if waited >= poll.timeout {
            return Err(SmusError::ChangesetTimeout {
                listing_id: listing_id.to_string(),
                waited,
            });
        }
    }
}

/// An asset that could not be republished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepublishFailure {
    pub asset_id: String,
    pub error: String,
}

/// Outcome of a republish run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepublishReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<RepublishFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Republishes every asset of a project.
pub struct AssetRepublisher<'a> {
    catalog: &'a dyn CatalogApi,
    domain_id: &'a str,
    project_id: &'a str,
    poll: PollConfig,
    pagination: PaginationConfig,
}

impl<'a> AssetRepublisher<'a> {
    pub fn new(catalog: &'a dyn CatalogApi, domain_id: &'a str, project_id: &'a str) -> Self {
        Self {
            catalog,
            domain_id,
            project_id,
            poll: PollConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }

    /// Builder method to set the changeset polling budget.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Builder method to set the listing page ceiling.
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Requests publication of one asset and waits for it to settle.
    ///
    /// # Errors
    /// Returns error if the changeset cannot be created, fails, or times out
    pub async fn republish_asset(&self, asset_id: &str) -> Result<()> {
        let listing_id = self
            .catalog
            .create_publish_change_set(self.domain_id, asset_id)
            .await?;
        debug!("Asset {} publish requested as listing {}", asset_id, listing_id);

        wait_for_listing(self.catalog, self.domain_id, &listing_id, &self.poll).await
    }

    /// Republishes each asset in turn.
    ///
    /// # Errors
    /// Only the asset listing and config validation can fail the run;
    /// per-asset failures are collected in the report.
    pub async fn run(&self) -> Result<RepublishReport> {
        self.poll.validate()?;
        let started_at = Utc::now();

        let asset_ids =
            list_asset_ids(self.catalog, self.domain_id, self.project_id, &self.pagination).await?;
        let total = asset_ids.len();
        info!("Republishing {} assets", total);

        let mut succeeded: usize = 0;
        let mut failures = Vec::new();

        for asset_id in &asset_ids {
            match self.republish_asset(asset_id).await {
                Ok(()) => {
                    succeeded = succeeded.saturating_add(1);
                    info!("Progress: {}/{}", succeeded, total);
                    info!("Asset {} republished", asset_id);
                }
                Err(e) => {
                    error!("Failed to republish asset {}: {}", asset_id, e);
                    failures.push(RepublishFailure {
                        asset_id: asset_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!("Republish finished: {} of {} succeeded", succeeded, total);
        Ok(RepublishReport {
            total,
            succeeded,
            failures,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
