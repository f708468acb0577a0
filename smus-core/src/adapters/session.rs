//! Shared AWS session construction.

use crate::{Result, config::SessionConfig, error::redact_arn};
use aws_config::{BehaviorVersion, Region, SdkConfig, sts::AssumeRoleProvider};

/// Loads region and credentials for every service client.
///
/// The default provider chain (environment, profile, instance role) supplies
/// the base credentials; with `assume_role_arn` set they are exchanged for
/// the role's through STS.
///
/// # Errors
/// Returns error if the session configuration is invalid
pub async fn load_sdk_config(config: &SessionConfig) -> Result<SdkConfig> {
    config.validate()?;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    let base = loader.load().await;

    let Some(role_arn) = &config.assume_role_arn else {
        tracing::debug!("Using default credential chain");
        return Ok(base);
    };

    tracing::info!(
        "Assuming role {} (session {})",
        redact_arn(role_arn),
        config.session_name
    );

    let provider = AssumeRoleProvider::builder(role_arn.clone())
        .session_name(config.session_name.clone())
        .configure(&base)
        .build()
        .await;

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).credentials_provider(provider);
    if let Some(region) = base.region() {
        loader = loader.region(region.clone());
    }

    Ok(loader.load().await)
}
