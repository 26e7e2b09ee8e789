//! @ai:module:intent Record what a catalog run did and what went wrong
//! @ai:module:layer application
//! @ai:module:public_api BuildReport, PackageOutcome, Issue, IssueCode, Severity
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Severity level for run issues
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
}

/// @ai:intent Stable identifiers for run issues
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IssueCode {
    /// Stub file failed to parse.
    E001,
    /// Stub file could not be read.
    E002,
    /// Catalog file could not be written.
    E003,
    /// Module listed in the manifest has no stub directory.
    W001,
    /// Distribution version could not be resolved.
    I001,
}

impl IssueCode {
    pub fn severity(&self) -> Severity {
        match self {
            IssueCode::E001 | IssueCode::E002 | IssueCode::E003 => Severity::Error,
            IssueCode::W001 => Severity::Warning,
            IssueCode::I001 => Severity::Info,
        }
    }
}

/// @ai:intent A single problem found during a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    pub package: String,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl Issue {
    pub fn new(code: IssueCode, package: &str, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            severity: code.severity(),
            code,
            package: package.to_string(),
            message: message.into(),
            path,
        }
    }

    /// @ai:intent Describe a per-file extraction failure
    pub fn from_file_error(package: &str, err: &Error) -> Self {
        match err {
            Error::Parse { file, .. } => {
                Issue::new(IssueCode::E001, package, err.to_string(), Some(file.clone()))
            }
            Error::FileRead { path, .. } => {
                Issue::new(IssueCode::E002, package, err.to_string(), Some(path.clone()))
            }
            other => Issue::new(IssueCode::E002, package, other.to_string(), None),
        }
    }
}

/// @ai:intent Where one package's catalog ended up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageOutcome {
    pub package: String,
    pub version: String,
    pub modules: usize,
    pub catalog: Option<PathBuf>,
}

/// @ai:intent Result of a whole catalog run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildReport {
    pub packages: Vec<PackageOutcome>,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub modules_skipped: usize,
    pub issues: Vec<Issue>,
    pub errors: usize,
    pub warnings: usize,
}

impl BuildReport {
    /// @ai:intent Check that every package got a catalog file
    pub fn passed(&self) -> bool {
        self.packages.iter().all(|p| p.catalog.is_some())
    }

    /// @ai:intent Record an issue and update counts
    pub fn push_issue(&mut self, issue: Issue) {
        match issue.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => {}
        }
        self.issues.push(issue);
    }

    /// @ai:intent Merge another report into this one
    pub fn merge(&mut self, other: BuildReport) {
        self.packages.extend(other.packages);
        self.files_parsed += other.files_parsed;
        self.files_failed += other.files_failed;
        self.modules_skipped += other.modules_skipped;
        self.issues.extend(other.issues);
        self.errors += other.errors;
        self.warnings += other.warnings;
    }
}
