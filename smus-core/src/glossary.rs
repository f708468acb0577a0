//! Glossary and term loading from a delimited sheet.
//!
//! Loading runs in two phases with no rollback. Phase one creates one
//! glossary per row; a glossary that already exists is reported and left
//! alone, so re-running a partially failed load is safe. Phase two waits for
//! the new glossaries to become searchable, resolves their ids by name and
//! creates one term per glossary from the first row carrying that name.

use crate::{
    Result,
    adapters::CatalogApi,
    catalog::list_glossaries,
    config::{PaginationConfig, SettleConfig},
    models::NewGlossaryTerm,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// One row of the glossary sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryRow {
    #[serde(rename = "name*", default)]
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub synonyms: String,
    #[serde(default)]
    pub references: String,
    #[serde(default)]
    pub description: String,
}

impl GlossaryRow {
    /// Long-form term text: display name, synonyms and references sections.
    pub fn readme(&self) -> String {
        format!(
            "### **displayName:** {}\n---\n### **synonyms:** {}\n---\n### **references:** {}",
            self.display_name, self.synonyms, self.references
        )
    }
}

/// Outcome counts of a glossary load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryLoadReport {
    pub glossaries_created: usize,
    pub glossaries_existing: usize,
    pub terms_created: usize,
    pub terms_existing: usize,
    /// Rows skipped because the name cell was blank
    pub blank_rows: usize,
    /// Submitted glossary names that never showed up in search
    pub unresolved: Vec<String>,
}

/// Loads glossaries and their terms into a project.
pub struct GlossaryLoader<'a> {
    catalog: &'a dyn CatalogApi,
    domain_id: &'a str,
    project_id: &'a str,
    settle: SettleConfig,
    pagination: PaginationConfig,
}

impl<'a> GlossaryLoader<'a> {
    pub fn new(catalog: &'a dyn CatalogApi, domain_id: &'a str, project_id: &'a str) -> Self {
        Self {
            catalog,
            domain_id,
            project_id,
            settle: SettleConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }

    /// Builder method to set the settling budget.
    pub fn with_settle(mut self, settle: SettleConfig) -> Self {
        self.settle = settle;
        self
    }

    /// Builder method to set the listing page ceiling.
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Runs both phases over `rows`.
    ///
    /// # Errors
    /// Any failure other than an "already exists" conflict aborts the load.
    pub async fn load(&self, rows: &[GlossaryRow]) -> Result<GlossaryLoadReport> {
        self.settle.validate()?;
        let mut report = GlossaryLoadReport::default();

        let mut submitted = BTreeSet::new();
        for row in rows {
            if row.name.trim().is_empty() {
                warn!("Skipping row with a blank glossary name");
                report.blank_rows = report.blank_rows.saturating_add(1);
                continue;
            }
            if self.create_glossary(&row.name).await? {
                report.glossaries_created = report.glossaries_created.saturating_add(1);
            } else {
                report.glossaries_existing = report.glossaries_existing.saturating_add(1);
            }
            submitted.insert(row.name.as_str());
        }

        let glossary_ids = self.await_glossaries(&submitted).await?;
        report.unresolved = submitted
            .iter()
            .filter(|name| !glossary_ids.contains_key(**name))
            .map(|name| (*name).to_string())
            .collect();
        for name in &report.unresolved {
            warn!("Glossary '{}' not found after settling; no term created", name);
        }

        for (name, glossary_id) in &glossary_ids {
            let Some(row) = rows.iter().find(|row| &row.name == name) else {
                debug!("Glossary '{}' has no row in the sheet", name);
                continue;
            };

            let term = NewGlossaryTerm {
                domain_id: self.domain_id.to_string(),
                glossary_id: glossary_id.clone(),
                name: row.name.clone(),
                short_description: row.description.clone(),
                long_description: row.readme(),
            };

            if self.create_term(&term).await? {
                report.terms_created = report.terms_created.saturating_add(1);
            } else {
                report.terms_existing = report.terms_existing.saturating_add(1);
            }
        }

        Ok(report)
    }

    /// Returns false when the glossary already existed.
    async fn create_glossary(&self, name: &str) -> Result<bool> {
        match self
            .catalog
            .create_glossary(self.domain_id, self.project_id, name)
            .await
        {
            Ok(()) => {
                info!("Glossary {} created", name);
                Ok(true)
            }
            Err(e) if e.is_conflict() => {
                info!("Glossary {} already exists", name);
                Ok(false)
            }
            Err(e) => {
                tracing::error!("Failed to create glossary {}: {}", name, e);
                Err(e)
            }
        }
    }

    /// Returns false when the term already existed.
    async fn create_term(&self, term: &NewGlossaryTerm) -> Result<bool> {
        match self.catalog.create_glossary_term(term).await {
            Ok(()) => {
                info!("Term {} created", term.name);
                Ok(true)
            }
            Err(e) if e.is_conflict() => {
                info!("Term {} already exists", term.name);
                Ok(false)
            }
            Err(e) => {
                tracing::error!("Failed to create term {}: {}", term.name, e);
                Err(e)
            }
        }
    }

    /// Waits the fixed delay, then re-lists until every submitted name
    /// resolves or the attempts run out.
    async fn await_glossaries(
        &self,
        submitted: &BTreeSet<&str>,
    ) -> Result<BTreeMap<String, String>> {
        tokio::time::sleep(self.settle.delay).await;

        let mut attempt: u32 = 1;
        loop {
            let glossaries = list_glossaries(
                self.catalog,
                self.domain_id,
                self.project_id,
                &self.pagination,
            )
            .await?;

            let missing = submitted
                .iter()
                .filter(|name| !glossaries.contains_key(**name))
                .count();
            if missing == 0 || attempt >= self.settle.max_attempts {
                return Ok(glossaries);
            }

            debug!(
                "{} glossaries not searchable yet (attempt {}/{})",
                missing, attempt, self.settle.max_attempts
            );
            attempt = attempt.saturating_add(1);
            tokio::time::sleep(self.settle.retry_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readme_sections() {
        let row = GlossaryRow {
            name: "PII".into(),
            display_name: "Personal Data".into(),
            synonyms: "PD".into(),
            references: "GDPR".into(),
            description: "desc".into(),
        };

        assert_eq!(
            row.readme(),
            "### **displayName:** Personal Data\n---\n### **synonyms:** PD\n---\n### **references:** GDPR"
        );
    }

    #[test]
    fn test_readme_with_blank_cells() {
        let row = GlossaryRow {
            name: "PII".into(),
            ..GlossaryRow::default()
        };
        assert!(row.readme().contains("### **synonyms:** \n"));
    }
}
