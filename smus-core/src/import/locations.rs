//! S3 location handling for Lake Formation registration.
//!
//! Registered resources come back as ARNs (`arn:aws:s3:::bucket/prefix`)
//! while tables carry `s3://bucket/prefix` paths. A table location is
//! covered when the location itself or any ancestor prefix is registered.

use crate::{Result, error::SmusError};
use std::collections::BTreeSet;
use url::Url;

const S3_SCHEME: &str = "s3";
const S3_ARN_PREFIX: &str = "arn:aws:s3:::";

/// Converts a registered S3 resource ARN into an `s3://` path.
///
/// Returns `None` for ARNs of other resource types.
pub fn s3_arn_to_path(arn: &str) -> Option<String> {
    if !arn.contains("s3:::") {
        return None;
    }
    let (_, path) = arn.trim_end_matches('/').split_once(":::")?;
    Some(format!("s3://{}", path))
}

/// Converts an `s3://` path into the resource ARN Lake Formation registers.
pub fn s3_path_to_arn(path: &str) -> String {
    let path = path.trim_end_matches('/');
    format!("{}{}", S3_ARN_PREFIX, path.strip_prefix("s3://").unwrap_or(path))
}

/// Checks that a location is an `s3://bucket[/prefix]` URL.
///
/// # Errors
/// Returns `InvalidLocation` for unparseable URLs, other schemes and
/// missing buckets
pub fn validate_s3_location(location: &str) -> Result<()> {
    let url = Url::parse(location)
        .map_err(|e| SmusError::invalid_location(location, e.to_string()))?;

    if url.scheme() != S3_SCHEME {
        return Err(SmusError::invalid_location(
            location,
            format!("expected scheme '{}', got '{}'", S3_SCHEME, url.scheme()),
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(SmusError::invalid_location(location, "missing bucket"));
    }
    Ok(())
}

/// Every prefix of a location, bucket first.
///
/// `s3://bucket/a/b/` yields `s3://bucket`, `s3://bucket/a`, `s3://bucket/a/b`.
///
/// # Errors
/// Returns `InvalidLocation` when the location is not an S3 URL
pub fn s3_subpaths(location: &str) -> Result<Vec<String>> {
    let trimmed = location.trim_end_matches('/');
    validate_s3_location(trimmed)?;

    let rest = trimmed.strip_prefix("s3://").unwrap_or(trimmed);
    let mut segments = rest.split('/');
    let bucket = segments.next().unwrap_or_default();

    let mut current = format!("s3://{}", bucket);
    let mut paths = vec![current.clone()];
    for segment in segments {
        current.push('/');
        current.push_str(segment);
        paths.push(current.clone());
    }
    Ok(paths)
}

/// Set of registered locations, as `s3://` paths.
#[derive(Debug, Clone, Default)]
pub struct RegisteredLocations {
    paths: BTreeSet<String>,
}

impl RegisteredLocations {
    /// Builds the set from registered resource ARNs, ignoring non-S3 ones.
    pub fn from_arns<I, S>(arns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: arns
                .into_iter()
                .filter_map(|arn| s3_arn_to_path(arn.as_ref()))
                .collect(),
        }
    }

    /// True when `location` or one of its prefixes is registered.
    ///
    /// # Errors
    /// Returns `InvalidLocation` when the location is not an S3 URL
    pub fn covers(&self, location: &str) -> Result<bool> {
        Ok(s3_subpaths(location)?
            .iter()
            .any(|path| self.paths.contains(path)))
    }

    pub fn insert(&mut self, location: &str) {
        self.paths.insert(location.trim_end_matches('/').to_string());
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
