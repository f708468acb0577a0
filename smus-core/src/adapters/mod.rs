//! Service traits and their AWS implementations.
//!
//! Every remote collaborator sits behind an object-safe trait so the drivers
//! can be exercised against in-memory services. The traits mirror the
//! request/response contracts the drivers need and nothing more: one call
//! per remote operation, one page per listing call.
//!
//! # Module Structure
//! - `sdk`: shared glue for SDK errors and getters
//! - `session`: builds the shared `SdkConfig` from a `SessionConfig`
//! - `datazone`, `lakeformation`, `glue`: per-service implementations

use crate::{
    Result,
    models::{
        AssetRevision, AssetSnapshot, DomainSummary, LakeResource, ListingStatus,
        NewGlossaryTerm, Page, ProjectSummary, SearchItem, SearchRequest, TableInfo,
    },
};
use async_trait::async_trait;

#[cfg(feature = "aws")]
pub mod datazone;
#[cfg(feature = "aws")]
pub mod glue;
#[cfg(feature = "aws")]
pub mod lakeformation;
#[cfg(feature = "aws")]
mod sdk;
#[cfg(feature = "aws")]
pub mod session;

/// Principal identifier Lake Formation uses for legacy IAM-only access.
pub const IAM_ALLOWED_PRINCIPALS: &str = "IAM_ALLOWED_PRINCIPALS";

/// Catalog and governance API.
///
/// # Object Safety
/// This trait is object-safe; drivers take `&dyn CatalogApi`.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Runs one page of a scoped search inside a project.
    async fn search_page(
        &self,
        request: &SearchRequest,
        next_token: Option<String>,
    ) -> Result<Page<SearchItem>>;

    /// Lists one page of the projects of a domain.
    async fn list_projects_page(
        &self,
        domain_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<ProjectSummary>>;

    /// Lists available domains.
    async fn list_domains_page(&self, next_token: Option<String>) -> Result<Page<DomainSummary>>;

    /// Fetches the current state of an asset.
    async fn get_asset(&self, domain_id: &str, asset_id: &str) -> Result<AssetSnapshot>;

    /// Replaces an asset with a complete revision.
    async fn create_asset_revision(&self, revision: &AssetRevision) -> Result<()>;

    /// Creates a glossary.
    ///
    /// # Errors
    /// An existing glossary with the same name surfaces as an error for which
    /// `is_conflict()` is true.
    async fn create_glossary(&self, domain_id: &str, project_id: &str, name: &str) -> Result<()>;

    /// Creates a glossary term; conflicts behave like `create_glossary`.
    async fn create_glossary_term(&self, term: &NewGlossaryTerm) -> Result<()>;

    /// Requests publication of an asset, returning the listing id to poll.
    async fn create_publish_change_set(&self, domain_id: &str, asset_id: &str) -> Result<String>;

    /// Reads the status of a listing.
    async fn get_listing_status(&self, domain_id: &str, listing_id: &str) -> Result<ListingStatus>;
}

/// Lake Formation permission API.
#[async_trait]
pub trait PermissionApi: Send + Sync {
    /// True when `principal` holds any permission on `resource`.
    async fn has_permissions(&self, principal: &str, resource: &LakeResource) -> Result<bool>;

    /// True when an opt-in exists for `principal` on `resource`.
    async fn has_opt_in(&self, principal: &str, resource: &LakeResource) -> Result<bool>;

    /// Creates an opt-in for `principal` on `resource`.
    async fn create_opt_in(&self, principal: &str, resource: &LakeResource) -> Result<()>;

    /// Registers an S3 resource with hybrid access enabled.
    ///
    /// Without `role_arn` the service-linked role is used.
    async fn register_location(&self, resource_arn: &str, role_arn: Option<&str>) -> Result<()>;

    /// Lists one page of registered resource ARNs.
    async fn list_registered_resources_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>>;

    /// Grants ALL, with grant option, on `resource` to `principal`.
    async fn grant_all(&self, principal: &str, resource: &LakeResource) -> Result<()>;
}

/// Table metadata source (Glue Data Catalog).
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetches one table by name.
    async fn get_table(&self, database_name: &str, table_name: &str) -> Result<TableInfo>;

    /// Lists one page of the tables in a database.
    async fn get_tables_page(
        &self,
        database_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<TableInfo>>;
}

/// AWS-backed implementations of all three service traits.
#[cfg(feature = "aws")]
pub struct AwsServices {
    pub catalog: datazone::DataZoneCatalog,
    pub permissions: lakeformation::LakeFormationPermissions,
    pub tables: glue::GlueTables,
}

/// Creates the AWS service clients from one shared session.
///
/// # Errors
/// Returns error if the session configuration is invalid
#[cfg(feature = "aws")]
pub async fn connect(config: &crate::config::SessionConfig) -> Result<AwsServices> {
    let sdk_config = session::load_sdk_config(config).await?;

    Ok(AwsServices {
        catalog: datazone::DataZoneCatalog::new(&sdk_config),
        permissions: lakeformation::LakeFormationPermissions::new(&sdk_config),
        tables: glue::GlueTables::new(&sdk_config),
    })
}
