//! Lake Formation-backed permissions.

use super::{
    PermissionApi,
    sdk::{SdkList, SdkText, build_error, remote_error},
};
use crate::{
    Result,
    models::{LakeResource, Page},
};
use async_trait::async_trait;
use aws_sdk_lakeformation::{
    Client,
    types::{DataLakePrincipal, DatabaseResource, Permission, Resource, TableResource},
};

/// Permission operations against AWS Lake Formation.
#[derive(Debug, Clone)]
pub struct LakeFormationPermissions {
    client: Client,
}

impl LakeFormationPermissions {
    /// Creates a permissions client from a loaded session.
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

fn principal(identifier: &str) -> DataLakePrincipal {
    DataLakePrincipal::builder()
        .data_lake_principal_identifier(identifier)
        .build()
}

fn resource(operation: &'static str, resource: &LakeResource) -> Result<Resource> {
    match resource {
        LakeResource::Database { name } => {
            let database = DatabaseResource::builder()
                .name(name)
                .build()
                .map_err(|e| build_error(operation, e))?;
            Ok(Resource::builder().database(database).build())
        }
        LakeResource::Table {
            database_name,
            name,
        } => {
            let table = TableResource::builder()
                .database_name(database_name)
                .name(name)
                .build()
                .map_err(|e| build_error(operation, e))?;
            Ok(Resource::builder().table(table).build())
        }
    }
}

#[async_trait]
impl PermissionApi for LakeFormationPermissions {
    async fn has_permissions(&self, principal_id: &str, target: &LakeResource) -> Result<bool> {
        let output = self
            .client
            .list_permissions()
            .principal(principal(principal_id))
            .resource(resource("ListPermissions", target)?)
            .send()
            .await
            .map_err(|e| remote_error("ListPermissions", e))?;

        Ok(!output.principal_resource_permissions().list().is_empty())
    }

    async fn has_opt_in(&self, principal_id: &str, target: &LakeResource) -> Result<bool> {
        let output = self
            .client
            .list_lake_formation_opt_ins()
            .principal(principal(principal_id))
            .resource(resource("ListLakeFormationOptIns", target)?)
            .send()
            .await
            .map_err(|e| remote_error("ListLakeFormationOptIns", e))?;

        Ok(!output.lake_formation_opt_ins_info_list().list().is_empty())
    }

    async fn create_opt_in(&self, principal_id: &str, target: &LakeResource) -> Result<()> {
        self.client
            .create_lake_formation_opt_in()
            .principal(principal(principal_id))
            .resource(resource("CreateLakeFormationOptIn", target)?)
            .send()
            .await
            .map_err(|e| remote_error("CreateLakeFormationOptIn", e))?;
        Ok(())
    }

    async fn register_location(&self, resource_arn: &str, role_arn: Option<&str>) -> Result<()> {
        let request = self
            .client
            .register_resource()
            .resource_arn(resource_arn)
            .hybrid_access_enabled(true);

        let request = match role_arn {
            Some(role) => request.role_arn(role),
            None => request.use_service_linked_role(true),
        };

        request
            .send()
            .await
            .map_err(|e| remote_error("RegisterResource", e))?;
        Ok(())
    }

    async fn list_registered_resources_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>> {
        let output = self
            .client
            .list_resources()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| remote_error("ListResources", e))?;

        let items = output
            .resource_info_list()
            .list()
            .iter()
            .filter_map(|info| info.resource_arn().opt_text())
            .collect();

        Ok(Page {
            items,
            next_token: output.next_token().opt_text(),
        })
    }

    async fn grant_all(&self, principal_id: &str, target: &LakeResource) -> Result<()> {
        self.client
            .grant_permissions()
            .principal(principal(principal_id))
            .resource(resource("GrantPermissions", target)?)
            .permissions(Permission::All)
            .permissions_with_grant_option(Permission::All)
            .send()
            .await
            .map_err(|e| remote_error("GrantPermissions", e))?;
        Ok(())
    }
}
