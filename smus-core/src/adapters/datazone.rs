//! DataZone-backed catalog.

use super::{
    CatalogApi,
    sdk::{SdkList, SdkText, build_error, remote_error},
};
use crate::{
    Result,
    forms::RawForm,
    models::{
        AssetRevision, AssetSnapshot, DomainSummary, ListingStatus, NewGlossaryTerm, Page,
        ProjectSummary, SearchItem, SearchRequest, SearchScope,
    },
};
use async_trait::async_trait;
use aws_sdk_datazone::{
    Client,
    types::{
        ChangeAction, DomainStatus, EntityType, FormInput, InventorySearchScope,
        SearchInventoryResultItem,
    },
};

/// Catalog operations against Amazon DataZone.
#[derive(Debug, Clone)]
pub struct DataZoneCatalog {
    client: Client,
}

impl DataZoneCatalog {
    /// Creates a catalog client from a loaded session.
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Wraps an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn inventory_scope(scope: SearchScope) -> InventorySearchScope {
    match scope {
        SearchScope::Asset => InventorySearchScope::Asset,
        SearchScope::Glossary => InventorySearchScope::Glossary,
        SearchScope::GlossaryTerm => InventorySearchScope::GlossaryTerm,
    }
}

fn form_input(form: &crate::forms::MetadataForm) -> Result<FormInput> {
    FormInput::builder()
        .form_name(&form.form_name)
        .set_type_identifier(form.type_identifier.clone())
        .set_type_revision(form.type_revision.clone())
        .set_content(form.content.clone())
        .build()
        .map_err(|e| build_error("CreateAssetRevision", e))
}

#[async_trait]
impl CatalogApi for DataZoneCatalog {
    async fn search_page(
        &self,
        request: &SearchRequest,
        next_token: Option<String>,
    ) -> Result<Page<SearchItem>> {
        let output = self
            .client
            .search()
            .domain_identifier(&request.domain_id)
            .owning_project_identifier(&request.project_id)
            .search_scope(inventory_scope(request.scope))
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| remote_error("Search", e))?;

        let items = output
            .items()
            .list()
            .iter()
            .map(|item| match item {
                SearchInventoryResultItem::AssetItem(asset) => SearchItem::Asset {
                    identifier: asset.identifier().text(),
                    name: asset.name().text(),
                },
                SearchInventoryResultItem::GlossaryItem(glossary) => SearchItem::Glossary {
                    id: glossary.id().text(),
                    name: glossary.name().text(),
                },
                _ => SearchItem::Other,
            })
            .collect();

        Ok(Page {
            items,
            next_token: output.next_token().opt_text(),
        })
    }

    async fn list_projects_page(
        &self,
        domain_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<ProjectSummary>> {
        let output = self
            .client
            .list_projects()
            .domain_identifier(domain_id)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| remote_error("ListProjects", e))?;

        let items = output
            .items()
            .list()
            .iter()
            .map(|project| ProjectSummary {
                id: project.id().text(),
                domain_id: project.domain_id().text(),
                name: project.name().text(),
            })
            .collect();

        Ok(Page {
            items,
            next_token: output.next_token().opt_text(),
        })
    }

    async fn list_domains_page(&self, next_token: Option<String>) -> Result<Page<DomainSummary>> {
        let output = self
            .client
            .list_domains()
            .status(DomainStatus::Available)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| remote_error("ListDomains", e))?;

        let items = output
            .items()
            .list()
            .iter()
            .map(|domain| DomainSummary {
                id: domain.id().text(),
                name: domain.name().text(),
            })
            .collect();

        Ok(Page {
            items,
            next_token: output.next_token().opt_text(),
        })
    }

    async fn get_asset(&self, domain_id: &str, asset_id: &str) -> Result<AssetSnapshot> {
        let output = self
            .client
            .get_asset()
            .domain_identifier(domain_id)
            .identifier(asset_id)
            .send()
            .await
            .map_err(|e| remote_error("GetAsset", e))?;

        let forms = output
            .forms_output()
            .list()
            .iter()
            .map(|form| RawForm {
                form_name: form.form_name().text(),
                type_name: form.type_name().opt_text(),
                type_identifier: None,
                type_revision: form.type_revision().opt_text(),
                content: form.content().opt_text().map(serde_json::Value::String),
            })
            .collect();

        Ok(AssetSnapshot {
            id: output.id().text(),
            name: output.name().text(),
            description: output.description().opt_text(),
            forms,
        })
    }

    async fn create_asset_revision(&self, revision: &AssetRevision) -> Result<()> {
        let forms = revision
            .forms
            .iter()
            .map(form_input)
            .collect::<Result<Vec<_>>>()?;

        self.client
            .create_asset_revision()
            .domain_identifier(&revision.domain_id)
            .identifier(&revision.asset_id)
            .name(&revision.name)
            .description(&revision.description)
            .set_forms_input(Some(forms))
            .send()
            .await
            .map_err(|e| remote_error("CreateAssetRevision", e))?;

        Ok(())
    }

    async fn create_glossary(&self, domain_id: &str, project_id: &str, name: &str) -> Result<()> {
        self.client
            .create_glossary()
            .domain_identifier(domain_id)
            .owning_project_identifier(project_id)
            .name(name)
            .send()
            .await
            .map_err(|e| remote_error("CreateGlossary", e))?;
        Ok(())
    }

    async fn create_glossary_term(&self, term: &NewGlossaryTerm) -> Result<()> {
        self.client
            .create_glossary_term()
            .domain_identifier(&term.domain_id)
            .glossary_identifier(&term.glossary_id)
            .name(&term.name)
            .short_description(&term.short_description)
            .long_description(&term.long_description)
            .send()
            .await
            .map_err(|e| remote_error("CreateGlossaryTerm", e))?;
        Ok(())
    }

    async fn create_publish_change_set(&self, domain_id: &str, asset_id: &str) -> Result<String> {
        let output = self
            .client
            .create_listing_change_set()
            .domain_identifier(domain_id)
            .entity_identifier(asset_id)
            .entity_type(EntityType::Asset)
            .action(ChangeAction::Publish)
            .send()
            .await
            .map_err(|e| remote_error("CreateListingChangeSet", e))?;

        Ok(output.listing_id().text())
    }

    async fn get_listing_status(&self, domain_id: &str, listing_id: &str) -> Result<ListingStatus> {
        let output = self
            .client
            .get_listing()
            .domain_identifier(domain_id)
            .identifier(listing_id)
            .send()
            .await
            .map_err(|e| remote_error("GetListing", e))?;

        Ok(ListingStatus::from_service(
            output.status().map(|status| status.as_str()),
        ))
    }
}
