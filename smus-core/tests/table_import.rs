//! Table import tests against in-memory Lake Formation and Glue.

#![allow(clippy::unwrap_used)]

mod common;

use common::{FakePermissions, FakeTables, table};
use smus_core::{
    OptInOutcome, SmusError, TableImporter,
    models::LakeResource,
    parse_table_list,
};

const PROJECT_ROLE: &str = "arn:aws:iam::123456789012:role/datazone_usr_role_prj";
const REGISTER_ROLE: &str = "arn:aws:iam::123456789012:role/lf-register";

fn sales_tables() -> FakeTables {
    FakeTables::new(vec![
        table("sales", "orders", Some("s3://lake/raw/orders/")),
        table("sales", "refunds", Some("s3://lake/curated/refunds")),
        table("sales", "scratch", None),
        table("other", "ignored", Some("s3://elsewhere/ignored")),
    ])
}

fn iam_managed_permissions() -> FakePermissions {
    let permissions = FakePermissions::new();
    {
        let mut state = permissions.state();
        state.iam_managed.insert(LakeResource::database("sales"));
        state.iam_managed.insert(LakeResource::table("sales", "orders"));
        state.registered.push("arn:aws:s3:::lake/raw".into());
        state
            .registered
            .push("arn:aws:glue:us-east-1:123456789012:catalog".into());
    }
    permissions
}

#[tokio::test]
async fn test_imports_every_table_in_database() {
    let permissions = iam_managed_permissions();
    let tables = sales_tables();

    let report = TableImporter::new(&permissions, &tables, PROJECT_ROLE)
        .run("sales", None)
        .await
        .unwrap();

    assert_eq!(report.database_opt_in, OptInOutcome::Created);
    assert_eq!(report.tables_imported, vec!["orders", "refunds", "scratch"]);
    assert_eq!(report.tables_opted_in, vec!["orders"]);
    assert_eq!(report.locations_registered, vec!["s3://lake/curated/refunds"]);
    assert_eq!(report.tables_without_location, vec!["scratch"]);

    let state = permissions.state();
    assert_eq!(
        state.register_calls,
        vec![("arn:aws:s3:::lake/curated/refunds".to_string(), None)]
    );
    assert_eq!(state.opt_in_calls.len(), 2);
    assert!(
        state
            .opt_in_calls
            .iter()
            .all(|(principal, _)| principal == PROJECT_ROLE)
    );
    assert_eq!(state.grants.len(), 3);
    assert!(
        state
            .grants
            .contains(&(PROJECT_ROLE.to_string(), LakeResource::table("sales", "refunds")))
    );
}

#[tokio::test]
async fn test_rerun_converges() {
    let permissions = iam_managed_permissions();
    let tables = sales_tables();
    let importer = TableImporter::new(&permissions, &tables, PROJECT_ROLE);

    importer.run("sales", None).await.unwrap();
    let second = importer.run("sales", None).await.unwrap();

    assert_eq!(second.database_opt_in, OptInOutcome::Existing);
    assert!(second.tables_opted_in.is_empty());
    assert!(second.locations_registered.is_empty());

    let state = permissions.state();
    assert_eq!(state.register_calls.len(), 1);
    assert_eq!(state.opt_in_calls.len(), 2);
}

#[tokio::test]
async fn test_explicit_table_list_with_register_role() {
    let permissions = FakePermissions::new();
    let tables = sales_tables();
    let names = parse_table_list(Some("['refunds']")).unwrap();

    let report = TableImporter::new(&permissions, &tables, PROJECT_ROLE)
        .with_register_role(Some(REGISTER_ROLE))
        .run("sales", Some(&names))
        .await
        .unwrap();

    assert_eq!(report.database_opt_in, OptInOutcome::NotRequired);
    assert_eq!(report.tables_imported, vec!["refunds"]);

    let state = permissions.state();
    assert_eq!(
        state.register_calls,
        vec![(
            "arn:aws:s3:::lake/curated/refunds".to_string(),
            Some(REGISTER_ROLE.to_string())
        )]
    );
    assert!(state.opt_in_calls.is_empty());
}

#[tokio::test]
async fn test_unknown_table_aborts_before_any_grant() {
    let permissions = FakePermissions::new();
    let tables = sales_tables();
    let names = vec!["orders".to_string(), "missing".to_string()];

    let result = TableImporter::new(&permissions, &tables, PROJECT_ROLE)
        .run("sales", Some(&names))
        .await;

    assert!(matches!(result, Err(SmusError::NotFound { entity: "table", .. })));
    let state = permissions.state();
    assert!(state.grants.is_empty());
    assert!(state.register_calls.is_empty());
}

#[tokio::test]
async fn test_grant_failure_aborts_remaining_tables() {
    let permissions = FakePermissions::new();
    permissions.state().failing_grant = Some(LakeResource::table("sales", "orders"));
    let tables = sales_tables();

    let result = TableImporter::new(&permissions, &tables, PROJECT_ROLE)
        .run("sales", None)
        .await;

    assert!(matches!(result, Err(SmusError::Remote { operation: "GrantPermissions", .. })));
    assert!(permissions.state().grants.is_empty());
}

#[tokio::test]
async fn test_non_s3_location_is_rejected() {
    let permissions = FakePermissions::new();
    let tables = FakeTables::new(vec![table("sales", "legacy", Some("hdfs://cluster/legacy"))]);

    let result = TableImporter::new(&permissions, &tables, PROJECT_ROLE)
        .run("sales", None)
        .await;

    assert!(matches!(result, Err(SmusError::InvalidLocation { .. })));
}
