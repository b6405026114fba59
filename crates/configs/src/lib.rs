use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "instance_db.toml";
pub const DEFAULT_STORAGE_PATH: &str = "data/instances.yml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_storage_path() }
    }
}

fn default_storage_path() -> PathBuf { PathBuf::from(DEFAULT_STORAGE_PATH) }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Load the config named by `CONFIG_PATH`, falling back to defaults when the file is absent.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let cfg: AppConfig = toml::from_str(&content).with_context(|| format!("parsing {path}"))?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // STORAGE_PATH wins over the file
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        self.apply_override(std::env::var("STORAGE_PATH").ok());
    }

    pub fn apply_override(&mut self, path: Option<String>) {
        if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
            self.path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(anyhow!("storage.path is empty; set it in the config file or via STORAGE_PATH"));
        }
        if self.path.to_string_lossy().ends_with('/') {
            return Err(anyhow!("storage.path must name a file, got directory {}", self.path.display()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.storage.path, PathBuf::from(DEFAULT_STORAGE_PATH));
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn parses_storage_and_logging_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [storage]
            path = "/var/lib/browl/instances.yml"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.path, PathBuf::from("/var/lib/browl/instances.yml"));
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let res: Result<AppConfig, _> = toml::from_str("[logging]\nformat = \"xml\"\n");
        assert!(res.is_err());
    }

    #[test]
    fn override_replaces_path_unless_blank() {
        let mut storage = StorageConfig::default();
        storage.apply_override(Some("  ".into()));
        assert_eq!(storage.path, PathBuf::from(DEFAULT_STORAGE_PATH));

        storage.apply_override(Some("other.yml".into()));
        assert_eq!(storage.path, PathBuf::from("other.yml"));

        storage.apply_override(None);
        assert_eq!(storage.path, PathBuf::from("other.yml"));
    }

    #[test]
    fn validate_rejects_empty_or_directory_path() {
        let empty = StorageConfig { path: PathBuf::new() };
        assert!(empty.validate().is_err());

        let dir = StorageConfig { path: PathBuf::from("data/") };
        assert!(dir.validate().is_err());

        assert!(StorageConfig::default().validate().is_ok());
    }
}
