//! Error types for catalog, glossary and permission automation.
//!
//! Remote failures keep the service error code so callers can tell an
//! "already exists" conflict apart from a real failure. Role ARNs are
//! redacted before they reach log output.

use std::time::Duration;
use thiserror::Error;

/// Service error code the catalog returns when a named entity already exists.
pub const CONFLICT_CODE: &str = "ConflictException";

/// Main error type for SMUS administration operations.
#[derive(Debug, Error)]
pub enum SmusError {
    /// A remote service call failed
    #[error("{operation} failed: {message}")]
    Remote {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    /// Named entity already exists
    #[error("{entity} '{name}' already exists")]
    Conflict { entity: &'static str, name: String },

    /// Entity could not be found
    #[error("{entity} '{name}' not found")]
    NotFound { entity: &'static str, name: String },

    /// Candidate metadata form content could not be decoded
    #[error("Failed to decode content for form '{type_identifier}'")]
    ContentDecode {
        type_identifier: String,
        #[source]
        source: serde_json::Error,
    },

    /// Candidate metadata form content decoded to something other than a mapping
    #[error("Content for form '{type_identifier}' must be a JSON object, got {found}")]
    InvalidContent {
        type_identifier: String,
        found: &'static str,
    },

    /// Publish changeset reached a terminal failure state
    #[error("Changeset {listing_id} failed with status {status}")]
    ChangesetFailed { listing_id: String, status: String },

    /// Publish changeset did not settle within the polling budget
    #[error("Timed out after {waited:?} waiting for changeset {listing_id}")]
    ChangesetTimeout { listing_id: String, waited: Duration },

    /// Listing kept returning continuation tokens past the configured ceiling
    #[error("Listing {scope} exceeded the limit of {max_pages} pages")]
    PaginationLimit {
        scope: &'static str,
        max_pages: usize,
    },

    /// Storage location is not a usable S3 path
    #[error("Invalid storage location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Delimited file could not be read or written
    #[error("CSV operation failed: {context}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with SmusError
pub type Result<T> = std::result::Result<T, SmusError>;

impl SmusError {
    /// Creates a remote call error
    pub fn remote(
        operation: &'static str,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote {
            operation,
            code,
            message: message.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a not-found error
    pub fn not_found(entity: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            name: name.into(),
        }
    }

    /// Creates a CSV error with context
    pub fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            source,
        }
    }

    /// Creates an invalid location error
    pub fn invalid_location(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Returns true when the error means the entity already exists.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict { .. } => true,
            Self::Remote { code, .. } => code.as_deref() == Some(CONFLICT_CODE),
            _ => false,
        }
    }

    /// Service error code, when the failure came from a remote call.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => code.as_deref(),
            Self::Conflict { .. } => Some(CONFLICT_CODE),
            _ => None,
        }
    }
}

/// Masks the account id of an ARN for logging.
///
/// # Example
///
/// ```rust
/// use smus_core::error::redact_arn;
///
/// let redacted = redact_arn("arn:aws:iam::123456789012:role/DataZoneScriptsRole");
/// assert_eq!(redacted, "arn:aws:iam::****:role/DataZoneScriptsRole");
/// ```
pub fn redact_arn(arn: &str) -> String {
    let parts: Vec<&str> = arn.splitn(6, ':').collect();
    match parts.as_slice() {
        ["arn", partition, service, region, account, resource] if !account.is_empty() => {
            format!("arn:{partition}:{service}:{region}:****:{resource}")
        }
        ["arn", ..] => arn.to_string(),
        _ => "<redacted>".to_string(),
    }
}
