//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Service configuration from the TOML config file
///
/// All fields are optional; absent values fall back to compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for the database and staging directory
    pub root_folder: Option<String>,
    /// Base URL of the transcript extraction capability
    pub transcript_base_url: Option<String>,
    /// Base URL of the media analysis capability
    pub analysis_base_url: Option<String>,
}

/// Root folder resolution priority order:
/// 1. Environment variable (highest priority)
/// 2. TOML config file
/// 3. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(env_var_name: &str) -> PathBuf {
    // Priority 1: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    // Priority 2: TOML config file
    if let Ok(config) = load_toml_config() {
        if let Some(root_folder) = config.root_folder {
            return PathBuf::from(root_folder);
        }
    }

    // Priority 3: OS-dependent compiled default
    get_default_root_folder()
}

/// Load the service TOML config from the platform config directory
///
/// Looks for `~/.config/copyguard/config.toml` (or the platform
/// equivalent), then `/etc/copyguard/config.toml` on Linux.
pub fn load_toml_config() -> Result<TomlConfig> {
    let config_path = locate_config_file()?;
    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
}

/// Write the TOML config back to disk (best-effort backup of settings)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Get default configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("copyguard").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/copyguard/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("copyguard"))
        .unwrap_or_else(|| PathBuf::from("./copyguard_data"))
}

/// Database file path within the root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join("copyguard.db")
}

/// Staging directory for uploaded media awaiting analysis
pub fn staging_dir(root_folder: &Path) -> PathBuf {
    root_folder.join("staging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_takes_priority() {
        std::env::set_var("COPYGUARD_TEST_ROOT", "/tmp/copyguard-test-root");
        let resolved = resolve_root_folder("COPYGUARD_TEST_ROOT");
        assert_eq!(resolved, PathBuf::from("/tmp/copyguard-test-root"));
        std::env::remove_var("COPYGUARD_TEST_ROOT");
    }

    #[test]
    fn test_default_root_folder_when_unset() {
        std::env::remove_var("COPYGUARD_TEST_ROOT_UNSET");
        let resolved = resolve_root_folder("COPYGUARD_TEST_ROOT_UNSET");
        // Falls through to the platform default (never empty)
        assert!(!resolved.as_os_str().is_empty());
    }

    #[test]
    fn test_database_path_under_root() {
        let root = PathBuf::from("/data/copyguard");
        assert_eq!(
            database_path(&root),
            PathBuf::from("/data/copyguard/copyguard.db")
        );
    }

    #[test]
    fn test_toml_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = TomlConfig {
            root_folder: Some("/data/copyguard".to_string()),
            transcript_base_url: Some("http://localhost:9100".to_string()),
            analysis_base_url: None,
        };

        write_toml_config(&config, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: TomlConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.root_folder.as_deref(), Some("/data/copyguard"));
        assert_eq!(
            parsed.transcript_base_url.as_deref(),
            Some("http://localhost:9100")
        );
        assert!(parsed.analysis_base_url.is_none());
    }
}
