//! Glue Data Catalog table source.

use super::{
    TableSource,
    sdk::{SdkList, SdkText, remote_error},
};
use crate::{
    Result,
    error::SmusError,
    models::{Page, TableInfo},
};
use async_trait::async_trait;
use aws_sdk_glue::{Client, types::Table};

/// Table lookups against the AWS Glue Data Catalog.
#[derive(Debug, Clone)]
pub struct GlueTables {
    client: Client,
}

impl GlueTables {
    /// Creates a Glue client from a loaded session.
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

fn table_info(database_name: &str, table: &Table) -> TableInfo {
    TableInfo {
        database_name: table
            .database_name()
            .opt_text()
            .unwrap_or_else(|| database_name.to_string()),
        name: table.name().text(),
        location: table
            .storage_descriptor()
            .and_then(|descriptor| descriptor.location().opt_text())
            .filter(|location| !location.is_empty()),
    }
}

#[async_trait]
impl TableSource for GlueTables {
    async fn get_table(&self, database_name: &str, table_name: &str) -> Result<TableInfo> {
        let output = self
            .client
            .get_table()
            .database_name(database_name)
            .name(table_name)
            .send()
            .await
            .map_err(|e| remote_error("GetTable", e))?;

        output
            .table()
            .map(|table| table_info(database_name, table))
            .ok_or_else(|| SmusError::not_found("table", format!("{}.{}", database_name, table_name)))
    }

    async fn get_tables_page(
        &self,
        database_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<TableInfo>> {
        let output = self
            .client
            .get_tables()
            .database_name(database_name)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| remote_error("GetTables", e))?;

        let items = output
            .table_list()
            .list()
            .iter()
            .map(|table| table_info(database_name, table))
            .collect();

        Ok(Page {
            items,
            next_token: output.next_token().opt_text(),
        })
    }
}
