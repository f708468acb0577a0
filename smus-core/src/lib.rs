//! Core library for SMUS (SageMaker Unified Studio) catalog administration.
//!
//! Bulk operations against the DataZone catalog and Lake Formation:
//! glossary loading, metadata form backfill and backup, asset republishing
//! and import of existing Glue tables into a governed project.
//!
//! # Architecture
//! - Every remote service sits behind an async trait in [`adapters`]; the
//!   AWS SDK implementations are behind the `aws` feature
//! - Drivers ([`glossary`], [`backfill`], [`backup`], [`republish`],
//!   [`import`]) take `&dyn` service handles and return serializable reports
//! - Asset updates always resubmit the complete asset through
//!   [`assets::AssetEditor`]; the catalog has no partial update
//! - Form names and content shapes are normalized once, in [`forms`],
//!   whenever forms are read from the catalog

pub mod adapters;
pub mod assets;
pub mod backfill;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod csv_input;
pub mod error;
pub mod forms;
pub mod glossary;
pub mod import;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod republish;

// Re-export commonly used types
pub use adapters::{CatalogApi, PermissionApi, TableSource};
pub use assets::{AssetEditor, DescriptionChange};
pub use backfill::{BackfillReport, ClassificationRow, MetadataBackfill};
pub use backup::{BackupReport, BackupTable, MetadataBackup};
pub use config::{PaginationConfig, PollConfig, SessionConfig, SettleConfig};
pub use error::{Result, SmusError, redact_arn};
pub use forms::{FormCandidate, FormUpsert, MetadataForm, RawForm, merge_form, normalize_forms};
pub use glossary::{GlossaryLoadReport, GlossaryLoader, GlossaryRow};
pub use import::{ImportReport, OptInOutcome, TableImporter, parse_table_list};
pub use logging::init_logging;
pub use models::{AssetSnapshot, LakeResource, ListingStatus, Page, TableInfo};
pub use republish::{AssetRepublisher, RepublishFailure, RepublishReport, wait_for_listing};
