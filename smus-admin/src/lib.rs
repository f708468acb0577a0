//! Library module for smus-admin
//!
//! Holds the CLI definition and the command runners so both can be tested
//! without AWS access. The binary entry point is in main.rs.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use smus_core::{
    PaginationConfig, PollConfig, SessionConfig, SettleConfig,
    backup::DEFAULT_BACKUP_PATH,
    csv_input::DEFAULT_INPUT_DELIMITER,
};
use std::{path::PathBuf, time::Duration};

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "smus-admin")]
#[command(about = "Bulk administration for SMUS catalogs, glossaries and Lake Formation imports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "
smus-admin - bulk operations against a SageMaker Unified Studio domain

Every command is safe to re-run: existing glossaries, terms, opt-ins and
registrations are detected and left alone, and metadata updates always
resubmit the complete asset.

EXAMPLES:
  smus-admin load-glossary --domain-id dzd_123 --project-id prj_456 --csv-path glossary.csv
  smus-admin backup-metadata --domain-id dzd_123 --project-id prj_456
  smus-admin import-tables --project-role-arn arn:aws:iam::111122223333:role/prj --database-name sales --table-name '[\"orders\"]'
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,

    /// Emit JSON log lines
    #[arg(long, global = true, help = "Write log events as JSON objects")]
    pub log_json: bool,

    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Named AWS profile
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Role to assume before calling any service
    #[arg(long, global = true, env = "SMUS_ASSUME_ROLE_ARN")]
    pub assume_role_arn: Option<String>,

    /// Page ceiling for listings
    #[arg(
        long,
        global = true,
        help = "Fail a listing that returns more than this many pages"
    )]
    pub max_pages: Option<usize>,
}

impl GlobalArgs {
    /// Session settings for the AWS clients.
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new();
        if let Some(region) = &self.region {
            config = config.with_region(region.clone());
        }
        if let Some(profile) = &self.profile {
            config = config.with_profile(profile.clone());
        }
        if let Some(role_arn) = &self.assume_role_arn {
            config = config.with_assume_role(role_arn.clone());
        }
        config
    }

    /// Listing ceiling, unbounded unless `--max-pages` is given.
    pub fn pagination_config(&self) -> PaginationConfig {
        self.max_pages
            .map_or_else(PaginationConfig::new, |max_pages| {
                PaginationConfig::new().with_max_pages(max_pages)
            })
    }
}

/// Domain and project a catalog command works in
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Domain identifier
    #[arg(long, env = "SMUS_DOMAIN_ID")]
    pub domain_id: String,

    /// Project identifier
    #[arg(long, env = "SMUS_PROJECT_ID")]
    pub project_id: String,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create glossaries and terms from a sheet
    LoadGlossary(LoadGlossaryArgs),
    /// Push classification forms and descriptions onto assets
    BackfillMetadata(BackfillArgs),
    /// Write asset classification metadata to a CSV file
    BackupMetadata(BackupArgs),
    /// Republish every asset of a project
    Republish(RepublishArgs),
    /// Bring Glue tables under a project role's Lake Formation permissions
    ImportTables(ImportArgs),
    /// Look up a domain id by name
    FindDomain(FindDomainArgs),
    /// List the projects of a domain
    ListProjects(ListProjectsArgs),
}

#[derive(Debug, Args)]
pub struct LoadGlossaryArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Glossary sheet (`name*;displayName;synonyms;references;description`)
    #[arg(long, value_name = "FILE")]
    pub csv_path: PathBuf,

    #[arg(long, default_value_t = DEFAULT_INPUT_DELIMITER)]
    pub delimiter: char,

    /// Seconds to wait before looking up new glossaries
    #[arg(long, default_value_t = 5)]
    pub settle_secs: u64,
}

impl LoadGlossaryArgs {
    pub fn settle_config(&self) -> SettleConfig {
        SettleConfig::new().with_delay(Duration::from_secs(self.settle_secs))
    }
}

#[derive(Debug, Args)]
pub struct BackfillArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Classification sheet keyed by `nome_tabela`
    #[arg(long, value_name = "FILE")]
    pub csv_path: PathBuf,

    #[arg(long, default_value_t = DEFAULT_INPUT_DELIMITER)]
    pub delimiter: char,
}

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output file path
    #[arg(long, value_name = "FILE", default_value = DEFAULT_BACKUP_PATH)]
    pub output_csv: PathBuf,

    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
}

#[derive(Debug, Args)]
pub struct RepublishArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Seconds between changeset status checks
    #[arg(long, default_value_t = 1)]
    pub poll_interval_secs: u64,

    /// Seconds to wait for each changeset
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,
}

impl RepublishArgs {
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new()
            .with_interval(Duration::from_secs(self.poll_interval_secs))
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Role of the project receiving the tables
    #[arg(long)]
    pub project_role_arn: String,

    /// Glue database holding the tables
    #[arg(long)]
    pub database_name: String,

    /// Tables to import as a list literal, e.g. '["t1", "t2"]'; all tables when omitted
    #[arg(long)]
    pub table_name: Option<String>,

    /// Role used to register S3 locations; the service-linked role when omitted
    #[arg(long = "iam-role-arn-lf-resource-register")]
    pub register_role_arn: Option<String>,
}

#[derive(Debug, Args)]
pub struct FindDomainArgs {
    /// Domain name
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ListProjectsArgs {
    /// Domain identifier
    #[arg(long, env = "SMUS_DOMAIN_ID")]
    pub domain_id: String,
}
