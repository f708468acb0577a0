//! Scoped catalog listings built on [`collect_pages`].

use crate::{
    Result,
    adapters::CatalogApi,
    config::PaginationConfig,
    error::SmusError,
    models::{SearchItem, SearchRequest, SearchScope},
    pagination::collect_pages,
};
use std::collections::BTreeMap;

/// Lists the identifiers of every asset owned by a project.
///
/// # Errors
/// Propagates any search failure.
pub async fn list_asset_ids(
    catalog: &dyn CatalogApi,
    domain_id: &str,
    project_id: &str,
    pagination: &PaginationConfig,
) -> Result<Vec<String>> {
    let request = SearchRequest::new(domain_id, project_id, SearchScope::Asset);

    let items = collect_pages("assets", pagination, |token| catalog.search_page(&request, token)).await?;

    let ids: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            SearchItem::Asset { identifier, .. } => Some(identifier),
            _ => None,
        })
        .collect();

    tracing::info!("Found {} assets in project {}", ids.len(), project_id);
    Ok(ids)
}

/// Lists the glossaries of a project as name to id.
///
/// Glossary names are unique within a project; should a listing repeat a
/// name, the last id seen wins.
///
/// # Errors
/// Propagates any search failure.
pub async fn list_glossaries(
    catalog: &dyn CatalogApi,
    domain_id: &str,
    project_id: &str,
    pagination: &PaginationConfig,
) -> Result<BTreeMap<String, String>> {
    let request = SearchRequest::new(domain_id, project_id, SearchScope::Glossary);

    let items =
        collect_pages("glossaries", pagination, |token| catalog.search_page(&request, token)).await?;

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            SearchItem::Glossary { id, name } => Some((name, id)),
            _ => None,
        })
        .collect())
}

/// Lists every project of a domain as project id to owning domain id.
///
/// # Errors
/// Propagates any listing failure.
pub async fn list_project_ids(
    catalog: &dyn CatalogApi,
    domain_id: &str,
    pagination: &PaginationConfig,
) -> Result<BTreeMap<String, String>> {
    let projects = collect_pages("projects", pagination, |token| {
        catalog.list_projects_page(domain_id, token)
    })
    .await?;

    Ok(projects
        .into_iter()
        .map(|project| (project.id, project.domain_id))
        .collect())
}

/// Resolves a domain id from its name among available domains.
///
/// # Errors
/// Returns `NotFound` when no available domain has that name.
pub async fn find_domain_id(
    catalog: &dyn CatalogApi,
    domain_name: &str,
    pagination: &PaginationConfig,
) -> Result<String> {
    let domains =
        collect_pages("domains", pagination, |token| catalog.list_domains_page(token)).await?;

    domains
        .into_iter()
        .find(|domain| domain.name == domain_name)
        .map(|domain| domain.id)
        .ok_or_else(|| SmusError::not_found("domain", domain_name))
}
