//! Flat-file backup of asset classification metadata.
//!
//! One row per asset holding the fields of its security/privacy and data
//! domain forms, its table name and its description. The header is the
//! union of every field seen, in first-seen order; an asset missing a form
//! still gets its row, with those columns left blank.

use crate::{
    Result,
    adapters::CatalogApi,
    backfill::{DOMAIN_FORM, PRIVACY_FORM},
    catalog::list_asset_ids,
    config::PaginationConfig,
    csv_input::delimiter_byte,
    error::SmusError,
    forms::{MetadataForm, find_by_name, normalize_forms},
    models::AssetSnapshot,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

/// Form holding the technical table metadata.
pub const TABLE_FORM: &str = "GlueTableForm";
/// Field of [`TABLE_FORM`] copied into the backup.
pub const TABLE_NAME_COLUMN: &str = "tableName";
/// Column holding the asset description.
pub const DESCRIPTION_COLUMN: &str = "Descrição";
/// Output file used when none is given.
pub const DEFAULT_BACKUP_PATH: &str = "backup_metadados.csv";

/// Rows with a column union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupTable {
    columns: Vec<String>,
    seen: HashSet<String>,
    rows: Vec<HashMap<String, String>>,
}

impl BackupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row; unseen fields become new trailing columns.
    pub fn push_row(&mut self, fields: Vec<(String, String)>) {
        let mut row = HashMap::with_capacity(fields.len());
        for (column, value) in fields {
            if self.seen.insert(column.clone()) {
                self.columns.push(column.clone());
            }
            row.insert(column, value);
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `index`; blank when the row lacks it.
    pub fn value(&self, index: usize, column: &str) -> Option<&str> {
        let row = self.rows.get(index)?;
        Some(row.get(column).map_or("", String::as_str))
    }

    /// Serializes the table, header first.
    ///
    /// # Errors
    /// Returns error for a non-ASCII delimiter or a write failure
    pub fn to_csv_bytes(&self, delimiter: char) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter_byte(delimiter)?)
            .from_writer(Vec::new());

        writer
            .write_record(&self.columns)
            .map_err(|e| SmusError::csv("Failed to write backup header", e))?;

        for (index, row) in self.rows.iter().enumerate() {
            let record = self
                .columns
                .iter()
                .map(|column| row.get(column).map_or("", String::as_str));
            writer
                .write_record(record)
                .map_err(|e| SmusError::csv(format!("Failed to write backup row {}", index), e))?;
        }

        writer.into_inner().map_err(|e| SmusError::Io {
            context: "Failed to flush backup buffer".to_string(),
            source: e.into_error(),
        })
    }

    /// Writes the table to `path`.
    ///
    /// # Errors
    /// Returns error if serialization or the file write fails
    pub async fn write_csv(&self, path: &Path, delimiter: char) -> Result<()> {
        let data = self.to_csv_bytes(delimiter)?;
        tokio::fs::write(path, data)
            .await
            .map_err(|e| SmusError::Io {
                context: format!("Failed to write to {}", path.display()),
                source: e,
            })?;
        Ok(())
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn form_fields(forms: &[MetadataForm], form_name: &str, asset_name: &str) -> Vec<(String, String)> {
    match find_by_name(forms, form_name) {
        Some(form) => form
            .content_map()
            .iter()
            .map(|(key, value)| (key.clone(), value_text(value)))
            .collect(),
        None => {
            tracing::warn!("Form '{}' not found on asset '{}'", form_name, asset_name);
            Vec::new()
        }
    }
}

/// Extracts the backup fields of one asset, in column order.
pub fn metadata_row(asset: &AssetSnapshot) -> Vec<(String, String)> {
    let forms = normalize_forms(asset.forms.iter().cloned());

    let mut fields = form_fields(&forms, PRIVACY_FORM, &asset.name);
    fields.extend(form_fields(&forms, DOMAIN_FORM, &asset.name));

    if let Some(table_name) = find_by_name(&forms, TABLE_FORM)
        .and_then(|form| form.content_map().get(TABLE_NAME_COLUMN).map(value_text))
    {
        fields.push((TABLE_NAME_COLUMN.to_string(), table_name));
    }

    fields.push((
        DESCRIPTION_COLUMN.to_string(),
        asset.description.clone().unwrap_or_default(),
    ));
    fields
}

/// Summary of a finished backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupReport {
    pub assets: usize,
    pub columns: usize,
    pub path: PathBuf,
}

/// Collects classification metadata for every asset of a project.
pub struct MetadataBackup<'a> {
    catalog: &'a dyn CatalogApi,
    domain_id: &'a str,
    project_id: &'a str,
    pagination: PaginationConfig,
}

impl<'a> MetadataBackup<'a> {
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

    /// Fetches every asset and assembles the backup table.
    ///
    /// # Errors
    /// The first remote failure aborts the backup.
    pub async fn collect(&self) -> Result<BackupTable> {
        let asset_ids =
            list_asset_ids(self.catalog, self.domain_id, self.project_id, &self.pagination).await?;

        let mut table = BackupTable::new();
        for asset_id in &asset_ids {
            let asset = self.catalog.get_asset(self.domain_id, asset_id).await?;
            table.push_row(metadata_row(&asset));
        }
        Ok(table)
    }

    /// Collects the backup and writes it to `path`.
    ///
    /// # Errors
    /// Returns error on any remote or write failure.
    pub async fn run(&self, path: &Path, delimiter: char) -> Result<BackupReport> {
        let table = self.collect().await?;
        table.write_csv(path, delimiter).await?;

        tracing::info!("Backed up {} assets to {}", table.len(), path.display());
        Ok(BackupReport {
            assets: table.len(),
            columns: table.columns().len(),
            path: path.to_path_buf(),
        })
    }
}
