//! @ai:module:intent Compile Python type stubs into per-package JSON symbol catalogs
//! @ai:module:layer infrastructure
//! @ai:module:public_api catalog, config, diff, extractor, manifest, output, parser, repair, report, symbol, version, error
//! @ai:module:stateless true
//!
//! # stubcat
//!
//! Reads a manifest of installed distributions and their top-level modules,
//! parses the `.pyi` stubs found for each module, and writes one catalog of
//! public classes, functions, variables and type aliases per distribution.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stubcat_core::{CatalogBuilder, CatalogConfig, Manifest};
//!
//! let config = CatalogConfig::default();
//! let manifest = Manifest::load(&config.paths.manifest_path()).unwrap();
//! let report = CatalogBuilder::from_config(&config).unwrap().run(&manifest);
//! assert!(report.passed());
//! ```

pub mod assignments;
pub mod catalog;
pub mod classes;
pub mod config;
pub mod diff;
pub mod error;
pub mod extractor;
pub mod functions;
pub mod layout;
pub mod manifest;
pub mod output;
pub mod parser;
pub mod repair;
pub mod report;
pub mod scope;
pub mod symbol;
pub mod syntax;
pub mod version;

pub use catalog::{catalog_path, render_catalog, write_catalog, CatalogBuilder};
pub use classes::classify_bases;
pub use config::CatalogConfig;
pub use diff::{diff_catalogs, diff_files, CatalogChange, CatalogDiff, ChangeType};
pub use error::{Error, Result};
pub use extractor::{summarize_module, ModuleExtractor};
pub use layout::{find_stub_files, module_name_from_path};
pub use manifest::{Manifest, PackageEntry};
pub use output::{format_diff, format_report, format_summary, to_json, OutputFormat};
pub use parser::StubParser;
pub use repair::RepairPass;
pub use report::{BuildReport, Issue, IssueCode, PackageOutcome, Severity};
pub use symbol::{
    is_public, ClassCategory, ClassMembers, ClassSymbol, FunctionSymbol, ModuleSummary,
    OverloadSignature, PackageCatalog, ParameterKind, ParameterSymbol, TypeAliasSymbol,
    VariableSymbol,
};
pub use version::{SitePackagesLookup, VersionLookup, UNKNOWN_VERSION};
