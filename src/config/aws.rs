use std::path::{Path, PathBuf};

use crate::lib::errors::ConfigError;

use super::lookup_var;

pub const SHARED_CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";
pub const CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";
pub const DEFAULT_PROFILE_ENV: &str = "AWS_DEFAULT_PROFILE";
pub const PROFILE_ENV: &str = "AWS_PROFILE";
pub const REGION_ENV: &str = "AWS_REGION";
pub const DEFAULT_REGION_ENV: &str = "AWS_DEFAULT_REGION";
pub const HOME_ENV: &str = "HOME";

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_CREDENTIALS_PATH: &str = ".aws/credentials";
pub const DEFAULT_CONFIG_PATH: &str = ".aws/config";

/// Credential/profile settings bound from the environment.
#[derive(Debug, Clone, Default)]
pub struct AwsSection {
    pub shared_credentials_file: Option<String>,
    pub config_file: Option<String>,
    pub default_profile: Option<String>,
    pub profile: Option<String>,
    pub region: Option<String>,
    pub default_region: Option<String>,
    pub home: Option<String>,
}

pub fn parse_aws_section(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<AwsSection, ConfigError> {
    Ok(AwsSection {
        shared_credentials_file: lookup_var(lookup, SHARED_CREDENTIALS_FILE_ENV),
        config_file: lookup_var(lookup, CONFIG_FILE_ENV),
        default_profile: lookup_var(lookup, DEFAULT_PROFILE_ENV),
        profile: lookup_var(lookup, PROFILE_ENV),
        region: lookup_var(lookup, REGION_ENV),
        default_region: lookup_var(lookup, DEFAULT_REGION_ENV),
        home: lookup_var(lookup, HOME_ENV),
    })
}

impl AwsSection {
    /// Profile selection order: default profile, explicit profile, `default`.
    pub fn profile_name(&self) -> &str {
        if let Some(name) = self.default_profile.as_deref() {
            return name;
        }
        self.profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }

    /// Region override order: explicit region, then default region.
    pub fn region_override(&self) -> Option<&str> {
        self.region.as_deref().or(self.default_region.as_deref())
    }

    /// Location of the credentials-style file, when resolvable.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        resolve_aws_path(
            self.shared_credentials_file.as_deref(),
            DEFAULT_CREDENTIALS_PATH,
            self.home.as_deref(),
        )
    }

    /// Location of the config-style file, when resolvable.
    pub fn config_path(&self) -> Option<PathBuf> {
        resolve_aws_path(
            self.config_file.as_deref(),
            DEFAULT_CONFIG_PATH,
            self.home.as_deref(),
        )
    }
}

/// Resolve an AWS file location: an explicit override wins (`~` expands to
/// the home directory), otherwise the default path under home. Without a
/// home directory the default is unresolvable.
fn resolve_aws_path(
    override_path: Option<&str>,
    default_relative: &str,
    home: Option<&str>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        if let Some(rest) = path.strip_prefix('~') {
            let home = home?;
            return Some(Path::new(home).join(rest.trim_start_matches('/')));
        }
        return Some(PathBuf::from(path));
    }
    let home = home?;
    Some(Path::new(home).join(default_relative))
}
