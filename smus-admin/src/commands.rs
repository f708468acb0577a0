//! Command runners.
//!
//! Each runner reads its inputs, drives one smus-core component against the
//! given services and returns a report for the binary to print.

use crate::{Command, GlobalArgs};
use anyhow::Context;
use serde::Serialize;
use smus_core::{
    AssetRepublisher, BackfillReport, BackupReport, CatalogApi, ClassificationRow,
    GlossaryLoadReport, GlossaryLoader, GlossaryRow, ImportReport, MetadataBackfill,
    MetadataBackup, PermissionApi, RepublishReport, TableImporter, TableSource,
    catalog::{find_domain_id, list_project_ids},
    csv_input::read_rows,
    parse_table_list,
};
use std::collections::BTreeMap;
use tracing::info;

/// Service handles a command runs against.
pub struct Services<'a> {
    pub catalog: &'a dyn CatalogApi,
    pub permissions: &'a dyn PermissionApi,
    pub tables: &'a dyn TableSource,
}

/// Result of a command, printed as JSON.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Glossary(GlossaryLoadReport),
    Backfill(BackfillReport),
    Backup(BackupReport),
    Republish(RepublishReport),
    Import(ImportReport),
    Domain { domain_id: String },
    /// Project id to owning domain id
    Projects(BTreeMap<String, String>),
}

/// Runs one command to completion.
///
/// # Errors
/// Returns error on invalid input files or configuration and on any
/// failure the component itself does not absorb.
pub async fn run(command: &Command, global: &GlobalArgs, services: &Services<'_>) -> anyhow::Result<Outcome> {
    let pagination = global.pagination_config();
    pagination.validate()?;

    match command {
        Command::LoadGlossary(args) => {
            let rows: Vec<GlossaryRow> = read_rows(&args.csv_path, args.delimiter)
                .with_context(|| format!("Failed to read glossary sheet {}", args.csv_path.display()))?;

            let report = GlossaryLoader::new(
                services.catalog,
                &args.project.domain_id,
                &args.project.project_id,
            )
            .with_settle(args.settle_config())
            .with_pagination(pagination)
            .load(&rows)
            .await?;
            Ok(Outcome::Glossary(report))
        }

        Command::BackfillMetadata(args) => {
            let rows: Vec<ClassificationRow> = read_rows(&args.csv_path, args.delimiter)
                .with_context(|| {
                    format!("Failed to read classification sheet {}", args.csv_path.display())
                })?;

            let report = MetadataBackfill::new(
                services.catalog,
                &args.project.domain_id,
                &args.project.project_id,
            )
            .with_pagination(pagination)
            .run(&rows)
            .await?;
            Ok(Outcome::Backfill(report))
        }

        Command::BackupMetadata(args) => {
            let report = MetadataBackup::new(
                services.catalog,
                &args.project.domain_id,
                &args.project.project_id,
            )
            .with_pagination(pagination)
            .run(&args.output_csv, args.delimiter)
            .await?;
            Ok(Outcome::Backup(report))
        }

        Command::Republish(args) => {
            info!("Republish started");
            let report = AssetRepublisher::new(
                services.catalog,
                &args.project.domain_id,
                &args.project.project_id,
            )
            .with_poll(args.poll_config())
            .with_pagination(pagination)
            .run()
            .await?;
            info!("Republish finished");
            Ok(Outcome::Republish(report))
        }

        Command::ImportTables(args) => {
            let table_names = parse_table_list(args.table_name.as_deref());

            let report = TableImporter::new(services.permissions, services.tables, &args.project_role_arn)
                .with_register_role(args.register_role_arn.as_deref())
                .with_pagination(pagination)
                .run(&args.database_name, table_names.as_deref())
                .await?;
            info!("Imported resources into the project");
            Ok(Outcome::Import(report))
        }

        Command::FindDomain(args) => {
            let domain_id = find_domain_id(services.catalog, &args.name, &pagination).await?;
            Ok(Outcome::Domain { domain_id })
        }

        Command::ListProjects(args) => {
            let projects = list_project_ids(services.catalog, &args.domain_id, &pagination).await?;
            Ok(Outcome::Projects(projects))
        }
    }
}

/// Renders an outcome as pretty JSON.
///
/// # Errors
/// Returns error if the report cannot be serialized
pub fn render(outcome: &Outcome) -> anyhow::Result<String> {
    serde_json::to_string_pretty(outcome).context("Failed to serialize report")
}
