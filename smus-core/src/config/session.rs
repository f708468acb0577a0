//! AWS session settings.

use serde::{Deserialize, Serialize};

/// Default role session name used when assuming a role.
pub const DEFAULT_SESSION_NAME: &str = "smus-admin";

/// How service clients obtain region and credentials.
///
/// Unset fields fall back to the default AWS provider chain. When
/// `assume_role_arn` is set, credentials from the chain are exchanged for the
/// role's through STS before any client is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// AWS region override
    pub region: Option<String>,
    /// Named profile from the shared config files
    pub profile: Option<String>,
    /// Role to assume for every call
    pub assume_role_arn: Option<String>,
    /// Session name recorded in CloudTrail for the assumed role
    pub session_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            assume_role_arn: None,
            session_name: DEFAULT_SESSION_NAME.to_string(),
        }
    }
}

impl SessionConfig {
    /// Creates a session config that uses the default provider chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Builder method to set the profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Builder method to set the role to assume.
    pub fn with_assume_role(mut self, role_arn: impl Into<String>) -> Self {
        self.assume_role_arn = Some(role_arn.into());
        self
    }

    /// Validates the session configuration.
    ///
    /// # Errors
    /// Returns error if the role is not an IAM role ARN or the session name is empty
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(role) = &self.assume_role_arn
            && !(role.starts_with("arn:") && role.contains(":role/"))
        {
            return Err(crate::error::SmusError::configuration(format!(
                "assume_role_arn is not an IAM role ARN: {}",
                crate::error::redact_arn(role)
            )));
        }
        if self.session_name.trim().is_empty() {
            return Err(crate::error::SmusError::configuration(
                "session_name must not be empty",
            ));
        }
        Ok(())
    }
}
