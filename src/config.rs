use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::ingest::TotalsPolicy;

pub const DEFAULT_DATABASE: &str = "ecommerce.db";
pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ShopConfig {
    pub database: Option<String>,
    pub data_dir: Option<String>,
    pub output_dir: Option<String>,
    pub totals_policy: Option<TotalsPolicy>,
}

impl ShopConfig {
    /// The file `shopdb init` writes: every setting spelled out
    pub fn with_defaults() -> Self {
        Self {
            database: Some(DEFAULT_DATABASE.to_string()),
            data_dir: Some(DEFAULT_DATA_DIR.to_string()),
            output_dir: Some(DEFAULT_OUTPUT_DIR.to_string()),
            totals_policy: Some(TotalsPolicy::default()),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(self.database.as_deref().unwrap_or(DEFAULT_DATABASE))
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
    }

    pub fn totals_policy(&self) -> TotalsPolicy {
        self.totals_policy.unwrap_or_default()
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("shopdb.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<ShopConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ShopConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &ShopConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("shopdb.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopdb.toml");
        let config = ShopConfig {
            totals_policy: Some(TotalsPolicy::Warn),
            ..ShopConfig::with_defaults()
        };

        write_config(&path, &config, false).unwrap();
        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.totals_policy(), TotalsPolicy::Warn);
    }

    #[test]
    fn test_write_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopdb.toml");
        write_config(&path, &ShopConfig::default(), false).unwrap();

        assert!(write_config(&path, &ShopConfig::default(), false).is_err());
        assert!(write_config(&path, &ShopConfig::default(), true).is_ok());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: ShopConfig = toml::from_str("data_dir = \"data\"\n").unwrap();
        assert_eq!(config.data_dir(), PathBuf::from("data"));
        assert_eq!(config.database_path(), PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.totals_policy(), TotalsPolicy::Trust);
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("ecommerce.db");
        ensure_db_dir(&db).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
