//! @ai:module:intent Resolve installed distribution versions from package metadata
//! @ai:module:layer infrastructure
//! @ai:module:public_api VersionLookup, SitePackagesLookup, UNKNOWN_VERSION, normalize_distribution
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Recorded when no installed version can be found.
pub const UNKNOWN_VERSION: &str = "unknown";

/// @ai:intent Source of installed distribution versions
pub trait VersionLookup {
    /// @ai:intent Return the installed version of a distribution
    fn version(&self, distribution: &str) -> Result<String>;
}

/// @ai:intent Canonical distribution name for comparison
/// @ai:example ("Typing_Extensions") -> "typing-extensions"
/// @ai:example ("zope.interface") -> "zope-interface"
/// @ai:effects pure
pub fn normalize_distribution(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// @ai:intent Reads `*.dist-info/METADATA` and `*.egg-info/PKG-INFO` in site-packages directories
#[derive(Debug, Clone, Default)]
pub struct SitePackagesLookup {
    dirs: Vec<PathBuf>,
}

impl SitePackagesLookup {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    fn metadata_files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.dirs
            .iter()
            .filter_map(|dir| std::fs::read_dir(dir).ok())
            .flat_map(|entries| {
                let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
                paths.sort();
                paths
            })
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?;
                if name.ends_with(".dist-info") {
                    Some(path.join("METADATA"))
                } else if name.ends_with(".egg-info") {
                    Some(path.join("PKG-INFO"))
                } else {
                    None
                }
            })
    }
}

impl VersionLookup for SitePackagesLookup {
    fn version(&self, distribution: &str) -> Result<String> {
        let wanted = normalize_distribution(distribution);

        for file in self.metadata_files() {
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };
            let (name, version) = metadata_headers(&content);
            if name.map(normalize_distribution).as_deref() == Some(wanted.as_str()) {
                return version.map(str::to_string).ok_or_else(|| Error::VersionLookup {
                    distribution: distribution.to_string(),
                    message: format!("no Version header in {}", file.display()),
                });
            }
        }

        Err(Error::VersionLookup {
            distribution: distribution.to_string(),
            message: if self.dirs.is_empty() {
                "no site-packages directories configured".to_string()
            } else {
                format!("not installed in {}", display_dirs(&self.dirs))
            },
        })
    }
}

/// `Name:` and `Version:` from the header block of a core metadata file.
fn metadata_headers(content: &str) -> (Option<&str>, Option<&str>) {
    let mut name = None;
    let mut version = None;
    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Name:") {
            name = Some(value.trim());
        } else if let Some(value) = line.strip_prefix("Version:") {
            version = Some(value.trim());
        }
    }
    (name, version)
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<F> VersionLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn version(&self, distribution: &str) -> Result<String> {
        self(distribution).ok_or_else(|| Error::VersionLookup {
            distribution: distribution.to_string(),
            message: "not found".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn install(site: &Path, dir_name: &str, file: &str, name: &str, version: &str) {
        let dir = site.join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(file),
            format!("Metadata-Version: 2.1\nName: {}\nVersion: {}\n\nLong description\nVersion: 0.0\n", name, version),
        )
        .unwrap();
    }

    #[test]
    fn test_normalize_distribution() {
        assert_eq!(normalize_distribution("Typing_Extensions"), "typing-extensions");
        assert_eq!(normalize_distribution("zope.interface"), "zope-interface");
        assert_eq!(normalize_distribution("a--_b"), "a-b");
    }

    #[test]
    fn test_dist_info_lookup() {
        let temp = TempDir::new().unwrap();
        install(temp.path(), "python_docx-1.1.2.dist-info", "METADATA", "python-docx", "1.1.2");
        install(temp.path(), "legacy_pkg-0.3.egg-info", "PKG-INFO", "Legacy.Pkg", "0.3");

        let lookup = SitePackagesLookup::new(vec![temp.path().to_path_buf()]);
        assert_eq!(lookup.version("python-docx").unwrap(), "1.1.2");
        assert_eq!(lookup.version("PYTHON_DOCX").unwrap(), "1.1.2");
        assert_eq!(lookup.version("legacy-pkg").unwrap(), "0.3");
    }

    #[test]
    fn test_missing_distribution_is_an_error() {
        let temp = TempDir::new().unwrap();
        let lookup = SitePackagesLookup::new(vec![temp.path().to_path_buf()]);

        assert!(matches!(lookup.version("absent"), Err(Error::VersionLookup { .. })));
        assert!(matches!(
            SitePackagesLookup::default().version("absent"),
            Err(Error::VersionLookup { .. })
        ));
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |dist: &str| (dist == "docling").then(|| "2.5.0".to_string());
        assert_eq!(lookup.version("docling").unwrap(), "2.5.0");
        assert!(lookup.version("other").is_err());
    }
}
