//! @ai:module:intent Load the package-to-module manifest produced by discovery
//! @ai:module:layer infrastructure
//! @ai:module:public_api Manifest, PackageEntry
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent One distribution and the top-level modules it installs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageEntry {
    pub distribution: String,
    pub modules: Vec<String>,
}

/// @ai:intent Read-only package manifest for one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Manifest {
    /// Name of the stub root directory, as recorded by discovery. Unused here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default)]
    pub packages: Vec<PackageEntry>,
}

impl Manifest {
    /// @ai:intent Load the manifest from disk
    /// @ai:post Err(ManifestMissing) when the file does not exist
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ManifestMissing(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content).map_err(|e| Error::ManifestInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// @ai:intent Parse manifest JSON text
    /// @ai:effects pure
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
