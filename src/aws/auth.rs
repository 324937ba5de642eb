//! AWS Authentication
//!
//! Resolves the shared SDK configuration (region, profile, credentials) and
//! fails fast when no usable credentials can be found.

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;

/// Where to look for AWS settings; `None` defers to the default chain
#[derive(Debug, Clone, Default)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Load the SDK config and verify credentials resolve
pub async fn load_sdk_config(settings: &AwsSettings) -> Result<SdkConfig> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(profile) = settings.profile.as_deref() {
        tracing::debug!("Using AWS profile: {}", profile);
        loader = loader.profile_name(profile);
    }
    if let Some(region) = settings.region.as_deref() {
        loader = loader.region(Region::new(region.to_string()));
    }

    let config = loader.load().await;

    let region = config.region().context(
        "No AWS region configured. Set AWS_REGION, use --region, or configure a profile",
    )?;
    tracing::info!("Using AWS region: {}", region);

    let provider = config
        .credentials_provider()
        .context("No AWS credentials provider available")?;
    provider.provide_credentials().await.context(
        "Failed to resolve AWS credentials. Run 'aws configure' or 'aws sso login'",
    )?;

    Ok(config)
}

