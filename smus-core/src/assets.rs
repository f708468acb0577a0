//! Read-modify-write updates of catalog assets.
//!
//! Asset updates in the catalog replace the whole asset: name, every form and
//! description go into each revision. [`AssetEditor`] is the only way the
//! drivers change an asset, and every change follows the same sequence:
//! fetch the current asset, normalize its forms, apply the change, resubmit
//! everything.
//!
//! Nothing guards against another writer changing the asset between fetch
//! and resubmit; the later revision wins.

use crate::{
    Result,
    adapters::CatalogApi,
    forms::{FormCandidate, FormUpsert, merge_form, normalize_forms},
    models::{AssetRevision, AssetSnapshot},
};
use serde::{Deserialize, Serialize};

/// Which case a description replacement hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptionChange {
    /// The asset had no description
    Added,
    /// A previous description was replaced
    Overwritten,
}

/// Applies complete-revision updates to the assets of one domain.
pub struct AssetEditor<'a> {
    catalog: &'a dyn CatalogApi,
    domain_id: &'a str,
}

impl<'a> AssetEditor<'a> {
    pub fn new(catalog: &'a dyn CatalogApi, domain_id: &'a str) -> Self {
        Self { catalog, domain_id }
    }

    /// Fetches an asset's current state.
    ///
    /// # Errors
    /// Propagates the fetch failure.
    pub async fn fetch(&self, asset_id: &str) -> Result<AssetSnapshot> {
        self.catalog.get_asset(self.domain_id, asset_id).await
    }

    /// Adds a metadata form to an asset, or merges it into the existing form
    /// of the same type. The asset's description is carried forward unchanged.
    ///
    /// # Errors
    /// Fails on undecodable candidate content (before anything is submitted)
    /// and on any remote failure.
    pub async fn upsert_form(&self, asset_id: &str, candidate: &FormCandidate) -> Result<FormUpsert> {
        let snapshot = self.fetch(asset_id).await?;
        let forms = normalize_forms(snapshot.forms.iter().cloned());
        let (forms, outcome) = merge_form(forms, candidate)?;

        let description = snapshot.description.clone().unwrap_or_default();
        let revision = AssetRevision::carry_forward(self.domain_id, &snapshot, forms, description);
        self.catalog.create_asset_revision(&revision).await?;

        tracing::info!(
            "Form '{}' {} on asset '{}'",
            candidate.type_identifier,
            match outcome {
                FormUpsert::Added => "added",
                FormUpsert::Updated => "updated",
            },
            snapshot.name
        );
        Ok(outcome)
    }

    /// Replaces an asset's description, keeping every form.
    ///
    /// The description is always replaced; the returned value only reports
    /// whether one existed before.
    ///
    /// # Errors
    /// Propagates any remote failure.
    pub async fn replace_description(
        &self,
        asset_id: &str,
        description: &str,
    ) -> Result<DescriptionChange> {
        let snapshot = self.fetch(asset_id).await?;
        let forms = normalize_forms(snapshot.forms.iter().cloned());

        let revision = AssetRevision::carry_forward(self.domain_id, &snapshot, forms, description);
        self.catalog.create_asset_revision(&revision).await?;

        let change = match snapshot.description.as_deref() {
            Some(existing) if !existing.is_empty() => DescriptionChange::Overwritten,
            _ => DescriptionChange::Added,
        };

        match change {
            DescriptionChange::Overwritten => {
                tracing::info!("Description overwritten for asset '{}'", snapshot.name);
            }
            DescriptionChange::Added => {
                tracing::info!("Description added to asset '{}'", snapshot.name);
            }
        }
        Ok(change)
    }
}
