//! @ai:module:intent Configuration for catalog builds
//! @ai:module:layer infrastructure
//! @ai:module:public_api CatalogConfig, PathConfig, StubConfig, RepairConfig, VersionConfig
//! @ai:module:depends_on error, layout, repair
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::layout::DEFAULT_STUB_EXTENSIONS;
use crate::repair::DEFAULT_REPAIR_KEYWORDS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration for a catalog run
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub stubs: StubConfig,
    #[serde(default)]
    pub repair: RepairConfig,
    #[serde(default)]
    pub versions: VersionConfig,
}

/// @ai:intent Input and output locations
///
/// `manifest` defaults to `<stub_root>/packages.json` and `output_root` to
/// `stub_root` when left unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathConfig {
    #[serde(default = "default_stub_root")]
    pub stub_root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_root: Option<PathBuf>,
}

/// @ai:intent Which files under a module root are stubs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StubConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// @ai:intent Keywords handled by the source repair pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepairConfig {
    #[serde(default = "default_repair_keywords")]
    pub keywords: Vec<String>,
}

/// @ai:intent Where installed distribution metadata is searched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VersionConfig {
    #[serde(default)]
    pub site_packages: Vec<PathBuf>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            stub_root: default_stub_root(),
            manifest: None,
            output_root: None,
        }
    }
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            keywords: default_repair_keywords(),
        }
    }
}

fn default_stub_root() -> PathBuf {
    PathBuf::from("Main/Pyright")
}

fn default_extensions() -> Vec<String> {
    DEFAULT_STUB_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_repair_keywords() -> Vec<String> {
    DEFAULT_REPAIR_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

impl PathConfig {
    /// @ai:intent Resolve the manifest location
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.stub_root.join("packages.json"))
    }

    /// @ai:intent Resolve the directory catalogs are written under
    pub fn output_dir(&self) -> PathBuf {
        self.output_root
            .clone()
            .unwrap_or_else(|| self.stub_root.clone())
    }
}

impl CatalogConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.paths.stub_root, PathBuf::from("Main/Pyright"));
        assert_eq!(config.paths.manifest_path(), PathBuf::from("Main/Pyright/packages.json"));
        assert_eq!(config.paths.output_dir(), PathBuf::from("Main/Pyright"));
        assert_eq!(config.stubs.extensions, vec!["pyi"]);
        assert_eq!(config.repair.keywords, vec!["deprecated_args"]);
        assert!(config.versions.site_packages.is_empty());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: CatalogConfig = toml::from_str(
            r#"
[paths]
stub_root = "stubs"
output_root = "catalogs"

[versions]
site_packages = [".venv/lib/python3.12/site-packages"]
"#,
        )
        .unwrap();

        assert_eq!(config.paths.manifest_path(), PathBuf::from("stubs/packages.json"));
        assert_eq!(config.paths.output_dir(), PathBuf::from("catalogs"));
        assert_eq!(config.repair.keywords, vec!["deprecated_args"]);
        assert_eq!(config.versions.site_packages.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stubcat.toml");
        let mut config = CatalogConfig::default();
        config.repair.keywords.push("removed_kwargs".to_string());

        config.save(&path).unwrap();
        assert_eq!(CatalogConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "[paths]\nstub_root = 3\n").unwrap();

        assert!(matches!(CatalogConfig::load(&path), Err(Error::Config { .. })));
    }
}
