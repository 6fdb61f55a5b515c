//! Layered settings resolution.
//!
//! Values come from a TOML secrets file first and the process environment
//! second; the first layer that has a value wins. Resolution stops with
//! [`Error::Config`] before any store access if a required value is missing.

use serde::Deserialize;
use std::path::Path;

use crate::error::Error;

/// Secrets file read when no other path is given
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// Environment variable holding the access key id
pub const ENV_ACCESS_KEY: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key
pub const ENV_SECRET_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding the region
pub const ENV_REGION: &str = "AWS_REGION";
/// Fallback environment variable for the region
pub const ENV_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
/// Environment variable holding the bucket name
pub const ENV_BUCKET: &str = "SALES_BUCKET";
/// Environment variable holding a custom S3 endpoint (LocalStack, MinIO)
pub const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Fully resolved settings for talking to the bucket
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
    /// Region identifier, e.g. `ap-southeast-2`
    pub region: String,
    /// Bucket holding the record objects
    pub bucket: String,
    /// Custom endpoint; switches the client to path-style addressing
    pub endpoint_url: Option<String>,
}

// Hand-written so the secret never reaches a log line.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// Contents of the secrets file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsFile {
    /// The `[aws]` table
    #[serde(default)]
    pub aws: SecretsSection,
}

/// The `[aws]` table of the secrets file; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretsSection {
    /// Access key id
    pub access_key: Option<String>,
    /// Secret access key
    pub secret_key: Option<String>,
    /// Region identifier
    pub region: Option<String>,
    /// Bucket name
    pub bucket: Option<String>,
    /// Custom endpoint
    pub endpoint_url: Option<String>,
}

impl SecretsFile {
    /// Parse secrets from TOML text
    pub fn parse(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| Error::Config(format!("invalid secrets file: {e}")))
    }

    /// Load secrets from `path`
    ///
    /// A missing file is not an error; it just contributes nothing.
    pub fn load(path: &Path) -> Result<Option<Self>, Error> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Config(format!(
                "cannot read secrets file {}: {e}",
                path.display()
            ))),
        }
    }
}

impl Settings {
    /// Resolve settings from the secrets file at `path` and the process environment
    pub fn load(path: &Path) -> Result<Self, Error> {
        let secrets = SecretsFile::load(path)?;
        Self::resolve(secrets.as_ref(), |name| std::env::var(name).ok())
    }

    /// Resolve settings from an optional secrets layer and an environment lookup
    ///
    /// The access key is checked first so that its absence is always the
    /// reported failure when nothing is configured.
    pub fn resolve<F>(secrets: Option<&SecretsFile>, env: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let section = secrets.map(|s| &s.aws);
        let pick = |from_file: Option<&Option<String>>, vars: &[&str]| -> Option<String> {
            from_file
                .and_then(|v| v.clone())
                .or_else(|| vars.iter().find_map(|&name| env(name)))
                .filter(|v| !v.trim().is_empty())
        };

        let access_key = pick(section.map(|s| &s.access_key), &[ENV_ACCESS_KEY])
            .ok_or_else(|| missing("access key", ENV_ACCESS_KEY))?;
        let secret_key = pick(section.map(|s| &s.secret_key), &[ENV_SECRET_KEY])
            .ok_or_else(|| missing("secret key", ENV_SECRET_KEY))?;
        let region = pick(section.map(|s| &s.region), &[ENV_REGION, ENV_DEFAULT_REGION])
            .ok_or_else(|| missing("region", ENV_REGION))?;
        let bucket = pick(section.map(|s| &s.bucket), &[ENV_BUCKET])
            .ok_or_else(|| missing("bucket", ENV_BUCKET))?;
        let endpoint_url = pick(section.map(|s| &s.endpoint_url), &[ENV_ENDPOINT_URL]);

        Ok(Self {
            access_key,
            secret_key,
            region,
            bucket,
            endpoint_url,
        })
    }
}

fn missing(what: &str, var: &str) -> Error {
    Error::Config(format!(
        "missing {what}: set it under [aws] in the secrets file or export {var}"
    ))
}
