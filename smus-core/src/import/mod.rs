//! Import of existing Glue tables into a governed project.
//!
//! Tables still governed by IAM-only access (permissions held by
//! `IAM_ALLOWED_PRINCIPALS`) need a Lake Formation opt-in for the project
//! role before grants take effect. Their storage must also be registered
//! with Lake Formation, in hybrid access mode so existing IAM readers keep
//! working.
//!
//! The steps run in this order:
//! 1. opt-in on the database when it is IAM managed
//! 2. resolve the target tables
//! 3. register every storage location not already covered by a registered
//!    prefix
//! 4. per table: opt-in when IAM managed, then grant ALL with grant option
//!
//! Every step checks before it acts, so re-running after a partial failure
//! picks up where the last run stopped. The first error aborts the batch.

pub mod locations;
pub mod table_list;

pub use locations::{RegisteredLocations, s3_arn_to_path, s3_path_to_arn, s3_subpaths};
pub use table_list::parse_table_list;

use crate::{
    Result,
    adapters::{IAM_ALLOWED_PRINCIPALS, PermissionApi, TableSource},
    config::PaginationConfig,
    models::{LakeResource, TableInfo},
    pagination::collect_pages,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// How an opt-in check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptInOutcome {
    /// Resource is already governed by Lake Formation
    NotRequired,
    /// Project role was already opted in
    Existing,
    /// Opt-in created by this run
    Created,
}

/// Outcome of an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub database_name: String,
    pub database_opt_in: OptInOutcome,
    /// Tables granted to the project role
    pub tables_imported: Vec<String>,
    /// Tables that received a new opt-in
    pub tables_opted_in: Vec<String>,
    /// Locations registered by this run, as `s3://` paths
    pub locations_registered: Vec<String>,
    /// Tables without a storage location
    pub tables_without_location: Vec<String>,
}

/// Brings Glue tables under a project role's Lake Formation permissions.
pub struct TableImporter<'a> {
    permissions: &'a dyn PermissionApi,
    tables: &'a dyn TableSource,
    project_role_arn: &'a str,
    register_role_arn: Option<&'a str>,
    pagination: PaginationConfig,
}

impl<'a> TableImporter<'a> {
    pub fn new(
        permissions: &'a dyn PermissionApi,
        tables: &'a dyn TableSource,
        project_role_arn: &'a str,
    ) -> Self {
        Self {
            permissions,
            tables,
            project_role_arn,
            register_role_arn: None,
            pagination: PaginationConfig::default(),
        }
    }

    /// Builder method to register locations with a specific role instead of
    /// the service-linked role.
    pub fn with_register_role(mut self, role_arn: Option<&'a str>) -> Self {
        self.register_role_arn = role_arn;
        self
    }

    /// Builder method to set the listing page ceiling.
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Imports `table_names` from `database_name`, or every table in it
    /// when no names are given.
    ///
    /// # Errors
    /// The first failure aborts the remaining steps.
    pub async fn run(
        &self,
        database_name: &str,
        table_names: Option<&[String]>,
    ) -> Result<ImportReport> {
        let database = LakeResource::database(database_name);
        let database_opt_in = self.ensure_opt_in(&database).await?;

        let tables = self.resolve_tables(database_name, table_names).await?;
        info!("Importing {} tables from {}", tables.len(), database_name);

        let (locations_registered, tables_without_location) =
            self.register_locations(&tables).await?;

        let mut report = ImportReport {
            database_name: database_name.to_string(),
            database_opt_in,
            tables_imported: Vec::with_capacity(tables.len()),
            tables_opted_in: Vec::new(),
            locations_registered,
            tables_without_location,
        };

        for table in &tables {
            let resource = LakeResource::table(&table.database_name, &table.name);
            if self.ensure_opt_in(&resource).await? == OptInOutcome::Created {
                report.tables_opted_in.push(table.name.clone());
            }

            self.permissions
                .grant_all(self.project_role_arn, &resource)
                .await
                .map_err(|e| {
                    error!("Failed to grant permissions on {}: {}", resource, e);
                    e
                })?;
            info!("Granted ALL permissions on {}", resource);
            report.tables_imported.push(table.name.clone());
        }

        Ok(report)
    }

    /// Opts the project role in when `resource` is IAM managed.
    ///
    /// # Errors
    /// Propagates any permission API failure
    pub async fn ensure_opt_in(&self, resource: &LakeResource) -> Result<OptInOutcome> {
        let iam_managed = self
            .permissions
            .has_permissions(IAM_ALLOWED_PRINCIPALS, resource)
            .await
            .map_err(|e| {
                error!("Failed to check IAM access for {}: {}", resource, e);
                e
            })?;

        if !iam_managed {
            info!("{} is already managed via Lake Formation", resource);
            return Ok(OptInOutcome::NotRequired);
        }

        info!("{} is managed via IAM access", resource);
        if self
            .permissions
            .has_opt_in(self.project_role_arn, resource)
            .await?
        {
            info!("Project role is already opted in to {}", resource);
            return Ok(OptInOutcome::Existing);
        }

        self.permissions
            .create_opt_in(self.project_role_arn, resource)
            .await?;
        info!("Created Lake Formation opt-in for {}", resource);
        Ok(OptInOutcome::Created)
    }

    async fn resolve_tables(
        &self,
        database_name: &str,
        table_names: Option<&[String]>,
    ) -> Result<Vec<TableInfo>> {
        match table_names {
            Some(names) if !names.is_empty() => {
                let mut tables = Vec::with_capacity(names.len());
                for name in names {
                    let table = self
                        .tables
                        .get_table(database_name, name)
                        .await
                        .map_err(|e| {
                            error!("Failed to retrieve table {}.{}: {}", database_name, name, e);
                            e
                        })?;
                    tables.push(table);
                }
                Ok(tables)
            }
            _ => {
                collect_pages("tables", &self.pagination, |token| {
                    self.tables.get_tables_page(database_name, token)
                })
                .await
            }
        }
    }

    /// Returns the locations registered and the tables that had none.
    async fn register_locations(&self, tables: &[TableInfo]) -> Result<(Vec<String>, Vec<String>)> {
        let arns = collect_pages("registered resources", &self.pagination, |token| {
            self.permissions.list_registered_resources_page(token)
        })
        .await?;
        let mut registered = RegisteredLocations::from_arns(&arns);

        let mut newly_registered = Vec::new();
        let mut without_location = Vec::new();

        for table in tables {
            let Some(location) = table
                .location
                .as_deref()
                .map(|l| l.trim_end_matches('/'))
                .filter(|l| !l.is_empty())
            else {
                tracing::warn!("Table {}.{} has no storage location", table.database_name, table.name);
                without_location.push(table.name.clone());
                continue;
            };

            if registered.covers(location)? {
                info!("S3 path {} already registered", location);
                continue;
            }

            let resource_arn = s3_path_to_arn(location);
            self.permissions
                .register_location(&resource_arn, self.register_role_arn)
                .await
                .map_err(|e| {
                    error!("Failed to register S3 location {}: {}", resource_arn, e);
                    e
                })?;
            info!("Registered S3 location: {}", resource_arn);

            registered.insert(location);
            newly_registered.push(location.to_string());
        }

        Ok((newly_registered, without_location))
    }
}
