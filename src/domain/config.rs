//! Configuration and credential models.
//!
//! `AppConfig` mirrors the TOML file; `Credentials` is the validated bundle the
//! fetch pipeline receives explicitly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};

/// Environment variable overriding the stored identifier.
pub const ENV_IDENTIFIER: &str = "CRISP_IDENTIFIER";
/// Environment variable overriding the stored secret key.
pub const ENV_KEY: &str = "CRISP_KEY";
/// Environment variable overriding the stored website id.
pub const ENV_WEBSITE_ID: &str = "CRISP_WEBSITE_ID";

/// Crisp API access settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrispConfig {
    /// Plugin token identifier.
    #[serde(default)]
    pub identifier: Option<String>,

    /// Plugin token secret key.
    #[serde(default)]
    pub key: Option<String>,

    /// Website whose conversations are exported.
    #[serde(default)]
    pub website_id: Option<String>,

    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CrispConfig {
    fn default() -> Self {
        Self {
            identifier: None,
            key: None,
            website_id: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.crisp.chat/v1".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Spreadsheet export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default workbook file name.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

fn default_file_name() -> String {
    "crisp_export.xlsx".to_string()
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub crisp: CrispConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".crisp-exporter")
    }

    /// Get the config file path.
    #[must_use]
    pub fn config_file_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Replace stored credentials with values from the environment where set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Replace stored credentials with values from `lookup` where it yields one.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let nonblank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(value) = nonblank(ENV_IDENTIFIER) {
            self.crisp.identifier = Some(value);
        }
        if let Some(value) = nonblank(ENV_KEY) {
            self.crisp.key = Some(value);
        }
        if let Some(value) = nonblank(ENV_WEBSITE_ID) {
            self.crisp.website_id = Some(value);
        }
        self
    }

    /// Validate and extract the credential bundle.
    ///
    /// # Errors
    /// Returns `MissingCredentials` naming every absent or blank value.
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(
            self.crisp.identifier.as_deref(),
            self.crisp.key.as_deref(),
            self.crisp.website_id.as_deref(),
        )
    }
}

/// Validated Crisp credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret_key: String,
    pub website_id: String,
}

impl Credentials {
    /// Build credentials, failing fast if any value is absent or blank.
    ///
    /// # Errors
    /// Returns `MissingCredentials` naming every absent value.
    pub fn new(
        identifier: Option<&str>,
        secret_key: Option<&str>,
        website_id: Option<&str>,
    ) -> Result<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }


        let fields = [
            ("identifier", present(identifier)),
            ("key", present(secret_key)),
            ("website_id", present(website_id)),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        match fields {
            [(_, Some(identifier)), (_, Some(secret_key)), (_, Some(website_id))] => Ok(Self {
                identifier: identifier.to_string(),
                secret_key: secret_key.to_string(),
                website_id: website_id.to_string(),
            }),
            _ => Err(AppError::MissingCredentials { missing }),
        }
    }

    /// Secret key with all but the last four characters hidden.
    #[must_use]
    pub fn masked_key(&self) -> String {
        mask_secret(&self.secret_key)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret_key", &self.masked_key())
            .field("website_id", &self.website_id)
            .finish()
    }
}

/// Hide all but the last four characters of a secret.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.crisp.api_url, "https://api.crisp.chat/v1");
        assert_eq!(config.crisp.timeout_secs, 30);
        assert_eq!(config.export.file_name, "crisp_export.xlsx");
        assert!(config.crisp.identifier.is_none());
    }

    #[test]
    fn test_credentials_complete() {
        let creds = Credentials::new(Some("id"), Some(" key "), Some("site")).unwrap();
        assert_eq!(creds.identifier, "id");
        assert_eq!(creds.secret_key, "key");
        assert_eq!(creds.website_id, "site");
    }

    #[test]
    fn test_credentials_missing_fields_reported() {
        let err = Credentials::new(Some("id"), Some("  "), None).unwrap_err();
        match err {
            AppError::MissingCredentials { missing } => {
                assert_eq!(missing, vec!["key", "website_id"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_env_overrides_replace_stored_values() {
        let mut config = AppConfig::default();
        config.crisp.identifier = Some("stored".into());
        config.crisp.key = Some("stored-key".into());

        let config = config.with_overrides(|name| match name {
            ENV_IDENTIFIER => Some("from-env".into()),
            ENV_KEY => Some(String::new()),
            ENV_WEBSITE_ID => Some("site".into()),
            _ => None,
        });

        assert_eq!(config.crisp.identifier.as_deref(), Some("from-env"));
        assert_eq!(config.crisp.key.as_deref(), Some("stored-key"));
        assert_eq!(config.crisp.website_id.as_deref(), Some("site"));
        assert!(config.credentials().is_ok());
    }

    #[test]
    fn test_debug_masks_secret() {
        let creds = Credentials::new(Some("id"), Some("supersecret"), Some("site")).unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("*******cret"));
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }
}
