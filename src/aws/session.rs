//! Construction of the authenticated SDK configuration.
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::info;

use crate::aws::profile::ProfileConfig;
use crate::config::AwsSection;

const SESSION_NAME: &str = "ecsrun";

/// Load the SDK configuration. With a resolved profile the source profile's
/// credentials are exchanged for the profile's role; otherwise the ambient
/// default provider chain applies.
pub async fn load_sdk_config(aws: &AwsSection, profile: Option<&ProfileConfig>) -> SdkConfig {
    match profile {
        Some(profile) => assume_role_config(aws, profile).await,
        None => aws_config::defaults(BehaviorVersion::latest()).load().await,
    }
}

async fn assume_role_config(aws: &AwsSection, profile: &ProfileConfig) -> SdkConfig {
    let mut base = ProfileFileCredentialsProvider::builder()
        .profile_name(&profile.source_profile);
    if let Some(files) = shared_profile_files(aws) {
        base = base.profile_files(files);
    }

    let mut role = AssumeRoleProvider::builder(&profile.role_arn).session_name(SESSION_NAME);
    if let Some(region) = &profile.region {
        role = role.region(Region::new(region.clone()));
    }
    let provider = role.build_from_provider(base.build()).await;

    info!(
        target: "ecsrun::session",
        role_arn = %profile.role_arn,
        source_profile = %profile.source_profile,
        region = profile.region.as_deref().unwrap_or(""),
        "Assuming role from shared profile"
    );

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).credentials_provider(provider);
    if let Some(region) = &profile.region {
        loader = loader.region(Region::new(region.clone()));
    }
    loader.load().await
}

/// Explicit shared-file locations for the source profile lookup; `None`
/// leaves the SDK's standard locations in effect.
fn shared_profile_files(aws: &AwsSection) -> Option<ProfileFiles> {
    let credentials = aws.credentials_path();
    let config = aws.config_path();
    if credentials.is_none() && config.is_none() {
        return None;
    }

    let mut files = ProfileFiles::builder();
    if let Some(path) = credentials {
        files = files.with_file(ProfileFileKind::Credentials, path);
    }
    if let Some(path) = config {
        files = files.with_file(ProfileFileKind::Config, path);
    }
    Some(files.build())
}
