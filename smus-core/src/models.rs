//! Data models exchanged with the catalog, permission and table services.
//!
//! These are the shapes the drivers work with; the service adapters translate
//! SDK types to and from them.

use crate::forms::{MetadataForm, RawForm};
use serde::{Deserialize, Serialize};

/// One page of a token-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page that reports no further results.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// Creates a page followed by another one.
    pub fn with_token(items: Vec<T>, token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(token.into()),
        }
    }
}

/// Entity family a catalog search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchScope {
    Asset,
    Glossary,
    GlossaryTerm,
}

impl std::fmt::Display for SearchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchScope::Asset => write!(f, "ASSET"),
            SearchScope::Glossary => write!(f, "GLOSSARY"),
            SearchScope::GlossaryTerm => write!(f, "GLOSSARY_TERM"),
        }
    }
}

/// Search request shape: a scope inside one project of one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub domain_id: String,
    pub project_id: String,
    pub scope: SearchScope,
}

impl SearchRequest {
    pub fn new(domain_id: impl Into<String>, project_id: impl Into<String>, scope: SearchScope) -> Self {
        Self {
            domain_id: domain_id.into(),
            project_id: project_id.into(),
            scope,
        }
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchItem {
    Asset { identifier: String, name: String },
    Glossary { id: String, name: String },
    /// Hit of a kind the caller did not ask for
    Other,
}

/// Catalog asset as returned by a fetch, forms still in wire shape.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSnapshot {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub forms: Vec<RawForm>,
}

/// A complete asset revision.
///
/// The catalog has no partial update: whatever forms are missing from a
/// revision are dropped from the asset. Revisions are therefore only built
/// from a fetched [`AssetSnapshot`], carrying its name forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRevision {
    pub domain_id: String,
    pub asset_id: String,
    pub name: String,
    pub description: String,
    pub forms: Vec<MetadataForm>,
}

impl AssetRevision {
    /// Builds the next revision of `snapshot` with the given full form list.
    pub fn carry_forward(
        domain_id: &str,
        snapshot: &AssetSnapshot,
        forms: Vec<MetadataForm>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            domain_id: domain_id.to_string(),
            asset_id: snapshot.id.clone(),
            name: snapshot.name.clone(),
            description: description.into(),
            forms,
        }
    }
}

/// Glossary term creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGlossaryTerm {
    pub domain_id: String,
    pub glossary_id: String,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
}

/// Status of a publish changeset listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    /// Published
    Active,
    /// Terminal failure (`FAILED` or `CANCELLED`)
    Failed(String),
    /// Anything else; keep polling
    InProgress(String),
}

impl ListingStatus {
    /// Maps the service status string.
    pub fn from_service(status: Option<&str>) -> Self {
        match status {
            Some("ACTIVE") => Self::Active,
            Some(s @ ("FAILED" | "CANCELLED")) => Self::Failed(s.to_string()),
            Some(other) => Self::InProgress(other.to_string()),
            None => Self::InProgress("UNKNOWN".to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress(_))
    }
}

/// Project listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub domain_id: String,
    pub name: String,
}

/// Domain listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub id: String,
    pub name: String,
}

/// Table metadata needed for importing into a governed project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub database_name: String,
    pub name: String,
    /// Storage location (`s3://bucket/prefix`), when the table has one
    pub location: Option<String>,
}

/// Resource a Lake Formation permission or opt-in applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LakeResource {
    Database { name: String },
    Table { database_name: String, name: String },
}

impl LakeResource {
    pub fn database(name: impl Into<String>) -> Self {
        Self::Database { name: name.into() }
    }

    pub fn table(database_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Table {
            database_name: database_name.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for LakeResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LakeResource::Database { name } => write!(f, "{}", name),
            LakeResource::Table {
                database_name,
                name,
            } => write!(f, "{}.{}", database_name, name),
        }
    }
}
