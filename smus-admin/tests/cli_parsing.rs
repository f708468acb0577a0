//! CLI parsing tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use clap::Parser;
use smus_admin::{Cli, Command};
use std::{path::PathBuf, time::Duration};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("smus-admin").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_load_glossary_defaults() {
    let cli = parse(&[
        "load-glossary",
        "--domain-id",
        "dzd_1",
        "--project-id",
        "prj_1",
        "--csv-path",
        "glossary.csv",
    ]);

    let Command::LoadGlossary(args) = cli.command else {
        panic!("expected load-glossary");
    };
    assert_eq!(args.project.domain_id, "dzd_1");
    assert_eq!(args.csv_path, PathBuf::from("glossary.csv"));
    assert_eq!(args.delimiter, ';');
    assert_eq!(args.settle_config().delay, Duration::from_secs(5));
}

#[test]
fn test_backup_defaults_and_overrides() {
    let cli = parse(&[
        "backup-metadata",
        "--domain-id",
        "dzd_1",
        "--project-id",
        "prj_1",
    ]);
    let Command::BackupMetadata(args) = cli.command else {
        panic!("expected backup-metadata");
    };
    assert_eq!(args.output_csv, PathBuf::from("backup_metadados.csv"));
    assert_eq!(args.delimiter, ',');

    let cli = parse(&[
        "backup-metadata",
        "--domain-id",
        "dzd_1",
        "--project-id",
        "prj_1",
        "--output-csv",
        "out.csv",
        "--delimiter",
        ";",
    ]);
    let Command::BackupMetadata(args) = cli.command else {
        panic!("expected backup-metadata");
    };
    assert_eq!(args.output_csv, PathBuf::from("out.csv"));
    assert_eq!(args.delimiter, ';');
}

#[test]
fn test_republish_poll_flags() {
    let cli = parse(&[
        "-v",
        "republish",
        "--domain-id",
        "dzd_1",
        "--project-id",
        "prj_1",
        "--poll-interval-secs",
        "2",
        "--timeout-secs",
        "60",
        "--max-pages",
        "50",
    ]);

    assert_eq!(cli.global.verbose, 1);
    assert_eq!(cli.global.pagination_config().max_pages, Some(50));

    let Command::Republish(args) = cli.command else {
        panic!("expected republish");
    };
    let poll = args.poll_config();
    assert_eq!(poll.interval, Duration::from_secs(2));
    assert_eq!(poll.timeout, Duration::from_secs(60));
}

#[test]
fn test_import_tables_flags() {
    let cli = parse(&[
        "import-tables",
        "--project-role-arn",
        "arn:aws:iam::111122223333:role/prj",
        "--database-name",
        "sales",
        "--table-name",
        r#"["orders", "refunds"]"#,
        "--iam-role-arn-lf-resource-register",
        "arn:aws:iam::111122223333:role/lf",
    ]);

    let Command::ImportTables(args) = cli.command else {
        panic!("expected import-tables");
    };
    assert_eq!(args.database_name, "sales");
    assert_eq!(
        smus_core::parse_table_list(args.table_name.as_deref()),
        Some(vec!["orders".to_string(), "refunds".to_string()])
    );
    assert_eq!(
        args.register_role_arn.as_deref(),
        Some("arn:aws:iam::111122223333:role/lf")
    );
}

#[test]
fn test_missing_required_flag_is_rejected() {
    let result = Cli::try_parse_from(["smus-admin", "import-tables", "--database-name", "sales"]);
    assert!(result.is_err());

    let result = Cli::try_parse_from(["smus-admin", "find-domain"]);
    assert!(result.is_err());
}

#[test]
fn test_multibyte_delimiter_is_rejected() {
    let result = Cli::try_parse_from([
        "smus-admin",
        "backfill-metadata",
        "--domain-id",
        "dzd_1",
        "--project-id",
        "prj_1",
        "--csv-path",
        "sheet.csv",
        "--delimiter",
        ";;",
    ]);
    assert!(result.is_err());
}
