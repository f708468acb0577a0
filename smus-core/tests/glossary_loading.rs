//! Glossary loader tests against the in-memory catalog.
//!
//! Covers:
//! - glossary and term creation from sheet rows
//! - "already exists" conflicts reported as existing, not failures
//! - settling: re-listing until new glossaries become searchable
//! - blank and duplicate glossary names

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::FakeCatalog;
use smus_core::{
    GlossaryLoader, GlossaryRow, SettleConfig, SmusError,
    csv_input::{DEFAULT_INPUT_DELIMITER, read_rows},
};
use std::{io::Write, time::Duration};

fn pii_row() -> GlossaryRow {
    GlossaryRow {
        name: "PII".into(),
        display_name: "Personal Data".into(),
        synonyms: "PD".into(),
        references: "GDPR".into(),
        description: "desc".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_creates_glossary_and_term() {
    let catalog = FakeCatalog::new();

    let report = GlossaryLoader::new(&catalog, "dzd_1", "prj_1")
        .load(&[pii_row()])
        .await
        .unwrap();

    assert_eq!(report.glossaries_created, 1);
    assert_eq!(report.terms_created, 1);
    assert!(report.unresolved.is_empty());

    let state = catalog.state();
    assert_eq!(state.glossary_create_calls, vec!["PII".to_string()]);
    assert_eq!(state.terms.len(), 1);

    let term = &state.terms[0];
    assert_eq!(term.name, "PII");
    assert_eq!(term.glossary_id, "g-1");
    assert_eq!(term.short_description, "desc");
    assert!(term.long_description.contains("**displayName:** Personal Data"));
    assert!(term.long_description.contains("**synonyms:** PD"));
    assert!(term.long_description.contains("**references:** GDPR"));
}

#[tokio::test(start_paused = true)]
async fn test_existing_glossary_and_term_are_not_failures() {
    let catalog = FakeCatalog::new().with_glossary("g-existing", "PII");

    let first = GlossaryLoader::new(&catalog, "dzd_1", "prj_1")
        .load(&[pii_row()])
        .await
        .unwrap();
    assert_eq!(first.glossaries_existing, 1);
    assert_eq!(first.terms_created, 1);

    let second = GlossaryLoader::new(&catalog, "dzd_1", "prj_1")
        .load(&[pii_row()])
        .await
        .unwrap();
    assert_eq!(second.glossaries_existing, 1);
    assert_eq!(second.terms_created, 0);
    assert_eq!(second.terms_existing, 1);

    assert_eq!(catalog.state().terms.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_waits_until_glossaries_are_searchable() {
    let catalog = FakeCatalog::new();
    catalog.state().hidden_glossary_lists = 2;

    let settle = SettleConfig::new()
        .with_delay(Duration::from_secs(5))
        .with_max_attempts(3)
        .with_retry_interval(Duration::from_secs(2));

    let started = tokio::time::Instant::now();
    let report = GlossaryLoader::new(&catalog, "dzd_1", "prj_1")
        .with_settle(settle)
        .load(&[pii_row()])
        .await
        .unwrap();

    assert!(report.unresolved.is_empty());
    assert_eq!(report.terms_created, 1);
    assert_eq!(catalog.state().glossary_lists, 3);
    assert_eq!(started.elapsed(), Duration::from_secs(9));
}

#[tokio::test(start_paused = true)]
async fn test_unresolved_glossaries_are_reported_and_skipped() {
    let catalog = FakeCatalog::new();
    catalog.state().hidden_glossary_lists = 10;

    let report = GlossaryLoader::new(&catalog, "dzd_1", "prj_1")
        .with_settle(SettleConfig::new().with_max_attempts(2))
        .load(&[pii_row()])
        .await
        .unwrap();

    assert_eq!(report.unresolved, vec!["PII".to_string()]);
    assert_eq!(report.terms_created, 0);

    let state = catalog.state();
    assert_eq!(state.glossary_lists, 2);
    assert_eq!(state.term_create_calls, 0);
}

#[tokio::test(start_paused = true)]
async fn test_blank_and_duplicate_names() {
    let catalog = FakeCatalog::new();
    let mut duplicate = pii_row();
    duplicate.description = "second".into();
    let blank = GlossaryRow {
        name: "  ".into(),
        ..GlossaryRow::default()
    };

    let report = GlossaryLoader::new(&catalog, "dzd_1", "prj_1")
        .load(&[pii_row(), blank, duplicate])
        .await
        .unwrap();

    assert_eq!(report.blank_rows, 1);
    assert_eq!(report.glossaries_created, 1);
    assert_eq!(report.glossaries_existing, 1);
    assert_eq!(report.terms_created, 1);

    let state = catalog.state();
    assert_eq!(state.glossary_create_calls.len(), 2);
    assert_eq!(state.terms[0].short_description, "desc");
}

#[tokio::test(start_paused = true)]
async fn test_rejects_zero_attempts() {
    let catalog = FakeCatalog::new();
    let result = GlossaryLoader::new(&catalog, "dzd_1", "prj_1")
        .with_settle(SettleConfig::new().with_max_attempts(0))
        .load(&[pii_row()])
        .await;

    assert!(matches!(result, Err(SmusError::Configuration { .. })));
    assert!(catalog.state().glossary_create_calls.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_loads_rows_from_sheet() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        "name*;displayName;synonyms;references;description\nPII;Personal Data;PD;GDPR;desc\n"
    )
    .unwrap();

    let rows: Vec<GlossaryRow> = read_rows(file.path(), DEFAULT_INPUT_DELIMITER).unwrap();
    assert_eq!(rows, vec![pii_row()]);

    let catalog = FakeCatalog::new();
    let report = GlossaryLoader::new(&catalog, "dzd_1", "prj_1")
        .load(&rows)
        .await
        .unwrap();
    assert_eq!(report.terms_created, 1);
}
