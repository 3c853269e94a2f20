//! Role-assumption profile resolution from the shared AWS files.
use std::path::Path;

use ini::Ini;
use tracing::debug;

use crate::config::AwsSection;
use crate::lib::errors::ProfileError;

pub const ROLE_ARN_KEY: &str = "role_arn";
pub const SOURCE_PROFILE_KEY: &str = "source_profile";
pub const REGION_KEY: &str = "region";

/// Role-assumption chain extracted from the shared AWS files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub role_arn: String,
    pub source_profile: String,
    pub region: Option<String>,
}

/// Resolve the role-assumption profile for the configured profile name.
///
/// The config-style file is consulted first, then the credentials-style file.
/// A profile counts only when it carries both `role_arn` and
/// `source_profile`; otherwise resolution is absent and the caller proceeds
/// with ambient credentials.
pub fn resolve_profile(aws: &AwsSection) -> Result<Option<ProfileConfig>, ProfileError> {
    let profile = aws.profile_name();
    let region_override = aws.region_override();

    if let Some(path) = aws.config_path() {
        if let Some(found) = read_profile(&path, profile, region_override)? {
            return Ok(Some(found));
        }
    }
    if let Some(path) = aws.credentials_path() {
        if let Some(found) = read_profile(&path, profile, region_override)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Read one candidate file. Section lookup tries the bare profile name
/// first, then the `profile <name>` variant used by config-style files.
fn read_profile(
    path: &Path,
    profile: &str,
    region_override: Option<&str>,
) -> Result<Option<ProfileConfig>, ProfileError> {
    let document = match Ini::load_from_file(path) {
        Ok(document) => document,
        Err(ini::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                target: "ecsrun::profile",
                path = %path.display(),
                "Shared AWS file not present; skipping"
            );
            return Ok(None);
        }
        Err(source) => {
            return Err(ProfileError::FileRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let section = document
        .section(Some(profile))
        .or_else(|| document.section(Some(format!("profile {profile}"))));
    let Some(section) = section else {
        return Ok(None);
    };

    let role_arn = section.get(ROLE_ARN_KEY).unwrap_or_default();
    let source_profile = section.get(SOURCE_PROFILE_KEY).unwrap_or_default();
    if role_arn.is_empty() || source_profile.is_empty() {
        return Ok(None);
    }

    let region = region_override
        .map(str::to_string)
        .or_else(|| {
            section
                .get(REGION_KEY)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        });

    Ok(Some(ProfileConfig {
        role_arn: role_arn.to_string(),
        source_profile: source_profile.to_string(),
        region,
    }))
}
