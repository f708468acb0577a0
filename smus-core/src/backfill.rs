//! Backfill of classification metadata onto project assets.
//!
//! Each asset is matched to a sheet row by table name, not by position: the
//! table name comes from the asset's own first form (`tableName` in its
//! content). A matched asset receives three forms (data domain, security and
//! privacy classification, ownership) and the row's description.
//!
//! Only the first form is inspected for the table name. Assets whose first
//! form carries no `tableName` are skipped with a warning.

use crate::{
    Result,
    adapters::CatalogApi,
    assets::AssetEditor,
    catalog::list_asset_ids,
    config::PaginationConfig,
    forms::{FormCandidate, FormContent, FormUpsert, normalize_form},
    models::AssetSnapshot,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Type identifier of the data domain form.
pub const DOMAIN_FORM: &str = "dominio_de_dados";
/// Type identifier of the security and privacy form.
pub const PRIVACY_FORM: &str = "seguranca_privacidade";
/// Type identifier of the ownership form.
pub const OWNERSHIP_FORM: &str = "ownership";

/// One row of the classification sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRow {
    #[serde(rename = "nome_tabela", default)]
    pub table_name: String,
    #[serde(rename = "Descrição", default)]
    pub description: String,
    #[serde(rename = "Subdomain", default)]
    pub subdomain: String,
    #[serde(rename = "Domain", default)]
    pub domain: String,
    #[serde(rename = "Top Domain", default)]
    pub top_domain: String,
    #[serde(rename = "Classificação Privacidade", default)]
    pub privacy_classification: String,
    #[serde(rename = "Classificação Segurança", default)]
    pub security_classification: String,
    #[serde(rename = "Owner", default)]
    pub owner: String,
}

fn content(fields: &[(&str, &str)]) -> FormContent {
    fields
        .iter()
        .map(|(key, value)| ((*key).to_string(), Value::String((*value).to_string())))
        .collect()
}

impl ClassificationRow {
    /// The three forms this row contributes to its asset.
    pub fn form_candidates(&self) -> [FormCandidate; 3] {
        [
            FormCandidate::new(
                DOMAIN_FORM,
                content(&[
                    ("subdomain", self.subdomain.as_str()),
                    ("domain", self.domain.as_str()),
                    ("top_domain", self.top_domain.as_str()),
                ]),
            ),
            FormCandidate::new(
                PRIVACY_FORM,
                content(&[
                    ("classificacao_privacidade", self.privacy_classification.as_str()),
                    ("classificacao_seguranca", self.security_classification.as_str()),
                ]),
            ),
            FormCandidate::new(OWNERSHIP_FORM, content(&[("owner", self.owner.as_str())])),
        ]
    }
}

/// Reads the table name from the asset's first form.
pub fn table_name_of(asset: &AssetSnapshot) -> Option<String> {
    let first = asset.forms.first().cloned().map(normalize_form)?;
    match first.content_map().remove("tableName")? {
        Value::String(name) => Some(name),
        _ => None,
    }
}

/// Outcome counts of a backfill run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillReport {
    pub assets_seen: usize,
    pub assets_updated: usize,
    pub forms_added: usize,
    pub forms_updated: usize,
    /// Assets whose first form has no table name
    pub skipped_without_table_name: Vec<String>,
    /// Table names with no matching sheet row
    pub skipped_without_row: Vec<String>,
}

/// Pushes sheet classifications onto every asset of a project.
pub struct MetadataBackfill<'a> {
    catalog: &'a dyn CatalogApi,
    domain_id: &'a str,
    project_id: &'a str,
    pagination: PaginationConfig,
}

impl<'a> MetadataBackfill<'a> {
    pub fn new(catalog: &'a dyn CatalogApi, domain_id: &'a str, project_id: &'a str) -> Self {
        Self {
            catalog,
            domain_id,
            project_id,
            pagination: PaginationConfig::default(),
        }
    }

    /// Builder method to set the listing page ceiling.
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Backfills every asset in the project from `rows`.
    ///
    /// Every step re-reads the asset and resubmits it whole, so an
    /// interrupted run can be repeated; merged form values are simply
    /// written again.
    ///
    /// # Errors
    /// The first remote failure aborts the run.
    pub async fn run(&self, rows: &[ClassificationRow]) -> Result<BackfillReport> {
        let editor = AssetEditor::new(self.catalog, self.domain_id);
        let asset_ids =
            list_asset_ids(self.catalog, self.domain_id, self.project_id, &self.pagination).await?;

        let mut report = BackfillReport {
            assets_seen: asset_ids.len(),
            ..BackfillReport::default()
        };

        for asset_id in &asset_ids {
            let asset = editor.fetch(asset_id).await?;

            let Some(table_name) = table_name_of(&asset) else {
                warn!("Asset '{}' has no table name in its first form; skipping", asset.name);
                report.skipped_without_table_name.push(asset_id.clone());
                continue;
            };

            let Some(row) = rows.iter().find(|row| row.table_name == table_name) else {
                warn!("No row found for table: {}", table_name);
                report.skipped_without_row.push(table_name);
                continue;
            };

            for candidate in row.form_candidates() {
                match editor.upsert_form(asset_id, &candidate).await? {
                    FormUpsert::Added => {
                        report.forms_added = report.forms_added.saturating_add(1);
                    }
                    FormUpsert::Updated => {
                        report.forms_updated = report.forms_updated.saturating_add(1);
                    }
                }
            }

            editor.replace_description(asset_id, &row.description).await?;
            report.assets_updated = report.assets_updated.saturating_add(1);
        }

        info!(
            "Backfill finished: {} of {} assets updated",
            report.assets_updated, report.assets_seen
        );
        Ok(report)
    }
}
