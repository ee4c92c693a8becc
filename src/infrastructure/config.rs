//! Configuration file management.
//!
//! Handles loading and saving the TOML file that stores Crisp credentials
//! between runs.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Crisp Exporter Configuration
# Credentials come from a Crisp plugin token (identifier + key).
# CRISP_IDENTIFIER, CRISP_KEY and CRISP_WEBSITE_ID override these values.

[crisp]
# identifier = ""
# key = ""
# website_id = ""

# REST API base URL
api_url = "https://api.crisp.chat/v1"

# Per-request timeout in seconds
timeout_secs = 30

[export]
# Default workbook name for `export`
file_name = "crisp_export.xlsx"
"#;

/// Load configuration from the default location, or defaults if absent.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = AppConfig::config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Save configuration to the default location.
///
/// # Errors
/// Returns error if file cannot be written.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to_file(config, &AppConfig::config_file_path())
}

/// Save configuration to a specific file, readable by the owner only on Unix.
///
/// # Errors
/// Returns error if file cannot be written.
pub fn save_config_to_file(config: &AppConfig, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| AppError::Config {
        message: format!("Failed to serialize config: {e}"),
    })?;

    fs::write(config_path, content).map_err(|e| {
        AppError::io(
            format!("Failed to write config file: {}", config_path.display()),
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(config_path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AppError::io("Failed to restrict config file permissions", e))?;
    }

    tracing::info!(path = %config_path.display(), "Configuration saved");

    Ok(())
}

/// Create default configuration file if it doesn't exist.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists() -> Result<()> {
    let config_path = AppConfig::config_file_path();

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create config directory", e))?;
        }

        fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| AppError::io("Failed to create default config", e))?;

        tracing::info!(path = %config_path.display(), "Created default configuration");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.crisp.api_url, "https://api.crisp.chat/v1");
        assert_eq!(config.crisp.timeout_secs, 30);
        assert_eq!(config.export.file_name, "crisp_export.xlsx");
        assert!(config.credentials().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.crisp.identifier = Some("id".into());
        config.crisp.key = Some("key".into());
        config.crisp.website_id = Some("site".into());

        save_config_to_file(&config, &config_path).unwrap();
        let loaded = load_config_from_file(&config_path).unwrap();

        let creds = loaded.credentials().unwrap();
        assert_eq!(creds.identifier, "id");
        assert_eq!(creds.website_id, "site");
        assert_eq!(loaded.crisp.api_url, config.crisp.api_url);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_config_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        save_config_to_file(&AppConfig::default(), &config_path).unwrap();

        let mode = fs::metadata(&config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_invalid_config_reports_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[crisp\nidentifier = ").unwrap();

        let err = load_config_from_file(&config_path).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
