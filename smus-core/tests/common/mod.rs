//! In-memory catalog, permission and table services for driver tests.
//!
//! Each fake keeps its state behind a `Mutex` so tests can seed it before a
//! run and inspect the recorded calls afterwards. Listings are paged with a
//! small page size so every driver goes through token handling.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]

use async_trait::async_trait;
use serde_json::Value;
use smus_core::{
    Result, SmusError,
    adapters::{CatalogApi, PermissionApi, TableSource},
    error::CONFLICT_CODE,
    forms::RawForm,
    models::{
        AssetRevision, AssetSnapshot, DomainSummary, LakeResource, ListingStatus,
        NewGlossaryTerm, Page, ProjectSummary, SearchItem, SearchRequest, SearchScope, TableInfo,
    },
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

pub const PAGE_SIZE: usize = 2;

/// Splits `items` into a page starting at the offset encoded in `token`.
pub fn page_of<T: Clone>(items: &[T], token: Option<String>) -> Page<T> {
    let start: usize = token.map_or(0, |t| t.parse().unwrap());
    let end = (start + PAGE_SIZE).min(items.len());
    let slice = items.get(start..end).unwrap_or_default().to_vec();
    if end < items.len() {
        Page::with_token(slice, end.to_string())
    } else {
        Page::last(slice)
    }
}

fn conflict(operation: &'static str, name: &str) -> SmusError {
    SmusError::remote(
        operation,
        Some(CONFLICT_CODE.to_string()),
        format!("{} already exists", name),
    )
}

/// A form as the service returns it: content as JSON text.
pub fn text_form(form_name: &str, type_id: &str, content: Value) -> RawForm {
    RawForm {
        form_name: form_name.to_string(),
        type_identifier: Some(type_id.to_string()),
        content: Some(Value::String(content.to_string())),
        ..RawForm::default()
    }
}

/// The table form the catalog attaches to Glue assets.
pub fn glue_table_form(table_name: &str) -> RawForm {
    RawForm {
        form_name: "GlueTableForm".to_string(),
        type_name: Some("amazon.datazone.GlueTableFormType".to_string()),
        content: Some(Value::String(
            serde_json::json!({"tableName": table_name, "catalogId": "123456789012"}).to_string(),
        )),
        ..RawForm::default()
    }
}

#[derive(Debug, Clone)]
pub struct FakeGlossary {
    pub id: String,
    pub name: String,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct CatalogState {
    /// Assets in listing order
    pub assets: Vec<AssetSnapshot>,
    pub glossaries: Vec<FakeGlossary>,
    /// Glossary listings that still miss newly created glossaries
    pub hidden_glossary_lists: usize,
    pub glossary_lists: usize,
    pub glossary_create_calls: Vec<String>,
    pub terms: Vec<NewGlossaryTerm>,
    pub term_create_calls: usize,
    pub revisions: Vec<AssetRevision>,
    pub projects: Vec<ProjectSummary>,
    pub domains: Vec<DomainSummary>,
    /// Status sequence per asset; the last status repeats once exhausted
    pub listing_script: HashMap<String, Vec<ListingStatus>>,
    pub status_polls: HashMap<String, usize>,
    pub publish_calls: Vec<String>,
    pub failing_publish: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct FakeCatalog {
    state: Mutex<CatalogState>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap()
    }

    pub fn with_asset(self, asset: AssetSnapshot) -> Self {
        self.state().assets.push(asset);
        self
    }

    pub fn with_glossary(self, id: &str, name: &str) -> Self {
        self.state().glossaries.push(FakeGlossary {
            id: id.to_string(),
            name: name.to_string(),
            visible: true,
        });
        self
    }

    pub fn asset(&self, asset_id: &str) -> AssetSnapshot {
        self.state()
            .assets
            .iter()
            .find(|asset| asset.id == asset_id)
            .cloned()
            .unwrap()
    }

    /// Number of status checks made for the listing of `asset_id`.
    pub fn polls_for(&self, asset_id: &str) -> usize {
        self.state()
            .status_polls
            .get(&listing_id_for(asset_id))
            .copied()
            .unwrap_or(0)
    }
}

pub fn listing_id_for(asset_id: &str) -> String {
    format!("listing-{}", asset_id)
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn search_page(
        &self,
        request: &SearchRequest,
        next_token: Option<String>,
    ) -> Result<Page<SearchItem>> {
        let mut state = self.state();
        let items: Vec<SearchItem> = match request.scope {
            SearchScope::Asset => state
                .assets
                .iter()
                .map(|asset| SearchItem::Asset {
                    identifier: asset.id.clone(),
                    name: asset.name.clone(),
                })
                .collect(),
            SearchScope::Glossary => {
                if next_token.is_none() {
                    state.glossary_lists += 1;
                    if state.glossary_lists > state.hidden_glossary_lists {
                        state.glossaries.iter_mut().for_each(|g| g.visible = true);
                    }
                }
                state
                    .glossaries
                    .iter()
                    .filter(|g| g.visible)
                    .map(|g| SearchItem::Glossary {
                        id: g.id.clone(),
                        name: g.name.clone(),
                    })
                    .collect()
            }
            SearchScope::GlossaryTerm => Vec::new(),
        };
        Ok(page_of(&items, next_token))
    }

    async fn list_projects_page(
        &self,
        domain_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<ProjectSummary>> {
        let projects: Vec<ProjectSummary> = self
            .state()
            .projects
            .iter()
            .filter(|p| p.domain_id == domain_id)
            .cloned()
            .collect();
        Ok(page_of(&projects, next_token))
    }

    async fn list_domains_page(&self, next_token: Option<String>) -> Result<Page<DomainSummary>> {
        Ok(page_of(&self.state().domains, next_token))
    }

    async fn get_asset(&self, _domain_id: &str, asset_id: &str) -> Result<AssetSnapshot> {
        self.state()
            .assets
            .iter()
            .find(|asset| asset.id == asset_id)
            .cloned()
            .ok_or_else(|| SmusError::not_found("asset", asset_id))
    }

    async fn create_asset_revision(&self, revision: &AssetRevision) -> Result<()> {
        let mut state = self.state();
        state.revisions.push(revision.clone());
        let asset = state
            .assets
            .iter_mut()
            .find(|asset| asset.id == revision.asset_id)
            .ok_or_else(|| SmusError::not_found("asset", revision.asset_id.clone()))?;

        asset.name = revision.name.clone();
        asset.description = Some(revision.description.clone());
        asset.forms = revision.forms.iter().cloned().map(RawForm::from).collect();
        Ok(())
    }

    async fn create_glossary(&self, _domain_id: &str, _project_id: &str, name: &str) -> Result<()> {
        let mut state = self.state();
        state.glossary_create_calls.push(name.to_string());
        if state.glossaries.iter().any(|g| g.name == name) {
            return Err(conflict("CreateGlossary", name));
        }
        let id = format!("g-{}", state.glossaries.len() + 1);
        state.glossaries.push(FakeGlossary {
            id,
            name: name.to_string(),
            visible: false,
        });
        Ok(())
    }

    async fn create_glossary_term(&self, term: &NewGlossaryTerm) -> Result<()> {
        let mut state = self.state();
        state.term_create_calls += 1;
        if state
            .terms
            .iter()
            .any(|t| t.glossary_id == term.glossary_id && t.name == term.name)
        {
            return Err(conflict("CreateGlossaryTerm", &term.name));
        }
        state.terms.push(term.clone());
        Ok(())
    }

    async fn create_publish_change_set(&self, _domain_id: &str, asset_id: &str) -> Result<String> {
        let mut state = self.state();
        state.publish_calls.push(asset_id.to_string());
        if state.failing_publish.contains(asset_id) {
            return Err(SmusError::remote(
                "CreateListingChangeSet",
                Some("ValidationException".to_string()),
                "asset cannot be published",
            ));
        }
        Ok(listing_id_for(asset_id))
    }

    async fn get_listing_status(&self, _domain_id: &str, listing_id: &str) -> Result<ListingStatus> {
        let mut state = self.state();
        let polls = {
            let count = state.status_polls.entry(listing_id.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let asset_id = listing_id.trim_start_matches("listing-");
        Ok(match state.listing_script.get(asset_id) {
            Some(script) if !script.is_empty() => {
                script.get(polls - 1).or_else(|| script.last()).cloned().unwrap()
            }
            _ => ListingStatus::Active,
        })
    }
}

#[derive(Debug, Default)]
pub struct PermissionState {
    /// Resources on which IAM_ALLOWED_PRINCIPALS holds permissions
    pub iam_managed: HashSet<LakeResource>,
    pub opt_ins: HashSet<(String, LakeResource)>,
    pub opt_in_calls: Vec<(String, LakeResource)>,
    /// Registered resource ARNs
    pub registered: Vec<String>,
    pub register_calls: Vec<(String, Option<String>)>,
    pub grants: Vec<(String, LakeResource)>,
    pub failing_grant: Option<LakeResource>,
}

#[derive(Debug, Default)]
pub struct FakePermissions {
    state: Mutex<PermissionState>,
}

impl FakePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, PermissionState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl PermissionApi for FakePermissions {
    async fn has_permissions(&self, principal: &str, resource: &LakeResource) -> Result<bool> {
        Ok(principal == smus_core::adapters::IAM_ALLOWED_PRINCIPALS
            && self.state().iam_managed.contains(resource))
    }

    async fn has_opt_in(&self, principal: &str, resource: &LakeResource) -> Result<bool> {
        Ok(self
            .state()
            .opt_ins
            .contains(&(principal.to_string(), resource.clone())))
    }

    async fn create_opt_in(&self, principal: &str, resource: &LakeResource) -> Result<()> {
        let mut state = self.state();
        let key = (principal.to_string(), resource.clone());
        state.opt_in_calls.push(key.clone());
        state.opt_ins.insert(key);
        Ok(())
    }

    async fn register_location(&self, resource_arn: &str, role_arn: Option<&str>) -> Result<()> {
        let mut state = self.state();
        state
            .register_calls
            .push((resource_arn.to_string(), role_arn.map(str::to_string)));
        if state.registered.iter().any(|arn| arn == resource_arn) {
            return Err(SmusError::remote(
                "RegisterResource",
                Some("AlreadyExistsException".to_string()),
                "resource already registered",
            ));
        }
        state.registered.push(resource_arn.to_string());
        Ok(())
    }

    async fn list_registered_resources_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        Ok(page_of(&self.state().registered, next_token))
    }

    async fn grant_all(&self, principal: &str, resource: &LakeResource) -> Result<()> {
        let mut state = self.state();
        if state.failing_grant.as_ref() == Some(resource) {
            return Err(SmusError::remote(
                "GrantPermissions",
                Some("AccessDeniedException".to_string()),
                "not authorized",
            ));
        }
        state.grants.push((principal.to_string(), resource.clone()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeTables {
    pub tables: Mutex<Vec<TableInfo>>,
}

impl FakeTables {
    pub fn new(tables: Vec<TableInfo>) -> Self {
        Self {
            tables: Mutex::new(tables),
        }
    }
}

pub fn table(database_name: &str, name: &str, location: Option<&str>) -> TableInfo {
    TableInfo {
        database_name: database_name.to_string(),
        name: name.to_string(),
        location: location.map(str::to_string),
    }
}

#[async_trait]
impl TableSource for FakeTables {
    async fn get_table(&self, database_name: &str, table_name: &str) -> Result<TableInfo> {
        self.tables
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.database_name == database_name && t.name == table_name)
            .cloned()
            .ok_or_else(|| SmusError::not_found("table", format!("{}.{}", database_name, table_name)))
    }

    async fn get_tables_page(
        &self,
        database_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<TableInfo>> {
        let tables: Vec<TableInfo> = self
            .tables
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.database_name == database_name)
            .cloned()
            .collect();
        Ok(page_of(&tables, next_token))
    }
}
