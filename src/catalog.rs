//! @ai:module:intent Assemble per-package catalogs and write them to disk
//! @ai:module:layer application
//! @ai:module:public_api CatalogBuilder, write_catalog, catalog_path, render_catalog
//! @ai:module:depends_on config, extractor, layout, manifest, report, version, symbol, error
//! @ai:module:stateless false

use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::extractor::ModuleExtractor;
use crate::layout::find_stub_files;
use crate::manifest::{Manifest, PackageEntry};
use crate::repair::RepairPass;
use crate::report::{BuildReport, Issue, IssueCode, PackageOutcome};
use crate::symbol::PackageCatalog;
use crate::version::{SitePackagesLookup, VersionLookup, UNKNOWN_VERSION};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// @ai:intent Location of a package's catalog file under the output root
/// @ai:example ("out", "docling") -> "out/docling/docling.json"
/// @ai:effects pure
pub fn catalog_path(output_root: &Path, distribution: &str) -> PathBuf {
    output_root
        .join(distribution)
        .join(format!("{}.json", distribution))
}

/// @ai:intent Serialize a catalog the way it is stored on disk
/// @ai:post pretty-printed with a trailing newline
/// @ai:effects pure
pub fn render_catalog(catalog: &PackageCatalog) -> Result<String> {
    let mut json = serde_json::to_string_pretty(catalog)?;
    json.push('\n');
    Ok(json)
}

/// @ai:intent Write one catalog, creating its package directory
/// @ai:effects fs:write
pub fn write_catalog(output_root: &Path, catalog: &PackageCatalog) -> Result<PathBuf> {
    let path = catalog_path(output_root, &catalog.package);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, render_catalog(catalog)?)?;
    Ok(path)
}

/// @ai:intent Drive extraction for every package in a manifest
///
/// Packages never share state; a failure in one is recorded in the report
/// and the next package is processed as usual.
pub struct CatalogBuilder {
    stub_root: PathBuf,
    output_root: PathBuf,
    extensions: Vec<String>,
    versions: Box<dyn VersionLookup>,
    extractor: ModuleExtractor,
}

impl CatalogBuilder {
    /// @ai:intent Create a builder with an explicit version source
    pub fn new(config: &CatalogConfig, versions: Box<dyn VersionLookup>) -> Result<Self> {
        let repair = RepairPass::new(config.repair.keywords.as_slice())?;
        Ok(Self {
            stub_root: config.paths.stub_root.clone(),
            output_root: config.paths.output_dir(),
            extensions: config.stubs.extensions.clone(),
            versions,
            extractor: ModuleExtractor::new(repair)?,
        })
    }

    /// @ai:intent Create a builder reading versions from configured site-packages
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let lookup = SitePackagesLookup::new(config.versions.site_packages.clone());
        Self::new(config, Box::new(lookup))
    }

    /// @ai:intent Collect the catalog for one package without writing it
    /// @ai:post modules that fail to read or parse are omitted and reported
    /// @ai:effects fs:read
    pub fn build_package(&mut self, entry: &PackageEntry) -> (PackageCatalog, BuildReport) {
        let package = entry.distribution.as_str();
        let mut report = BuildReport::default();
        let mut modules = Vec::new();

        for root_module in &entry.modules {
            let module_dir = self.stub_root.join(root_module);
            if !module_dir.is_dir() {
                let err = Error::StubRootMissing(module_dir.clone());
                debug!("{}: {}", package, err);
                report.modules_skipped += 1;
                report.push_issue(Issue::new(IssueCode::W001, package, err.to_string(), Some(module_dir)));
                continue;
            }

            for file in find_stub_files(&module_dir, self.extensions.as_slice()) {
                let Ok(relative) = file.strip_prefix(&module_dir) else {
                    continue;
                };
                match self.extractor.extract_file(root_module, &file, relative) {
                    Ok(summary) => {
                        report.files_parsed += 1;
                        modules.push(summary);
                    }
                    Err(e) => {
                        warn!("{}", e);
                        report.files_failed += 1;
                        report.push_issue(Issue::from_file_error(package, &e));
                    }
                }
            }
        }

        let version = match self.versions.version(package) {
            Ok(version) => version,
            Err(e) => {
                debug!("{}; recording version as {}", e, UNKNOWN_VERSION);
                report.push_issue(Issue::new(IssueCode::I001, package, e.to_string(), None));
                UNKNOWN_VERSION.to_string()
            }
        };

        (PackageCatalog::new(package.to_string(), version, modules), report)
    }

    /// @ai:intent Build and write the catalog for one package
    /// @ai:effects fs:read, fs:write
    pub fn process_package(&mut self, entry: &PackageEntry) -> BuildReport {
        let (catalog, mut report) = self.build_package(entry);

        let written = match write_catalog(&self.output_root, &catalog) {
            Ok(path) => {
                info!(
                    "{} {}: {} modules -> {}",
                    catalog.package,
                    catalog.version,
                    catalog.modules.len(),
                    path.display()
                );
                Some(path)
            }
            Err(e) => {
                warn!("{}: failed to write catalog: {}", catalog.package, e);
                report.push_issue(Issue::new(
                    IssueCode::E003,
                    &catalog.package,
                    e.to_string(),
                    Some(catalog_path(&self.output_root, &catalog.package)),
                ));
                None
            }
        };

        report.packages.push(PackageOutcome {
            package: catalog.package,
            version: catalog.version,
            modules: catalog.modules.len(),
            catalog: written,
        });
        report
    }

    /// @ai:intent Process every package in manifest order
    /// @ai:effects fs:read, fs:write
    pub fn run(&mut self, manifest: &Manifest) -> BuildReport {
        let mut report = BuildReport::default();
        for entry in &manifest.packages {
            report.merge(self.process_package(entry));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(stub_root: &Path) -> CatalogConfig {
        let mut config = CatalogConfig::default();
        config.paths.stub_root = stub_root.to_path_buf();
        config
    }

    fn builder(config: &CatalogConfig) -> CatalogBuilder {
        let lookup = |dist: &str| (dist == "healthy").then(|| "1.2.3".to_string());
        CatalogBuilder::new(config, Box::new(lookup)).unwrap()
    }

    fn manifest(entries: &[(&str, &[&str])]) -> Manifest {
        Manifest {
            root: None,
            packages: entries
                .iter()
                .map(|(dist, modules)| PackageEntry {
                    distribution: dist.to_string(),
                    modules: modules.iter().map(|m| m.to_string()).collect(),
                })
                .collect(),
        }
    }

    fn read_catalog(path: &Path) -> PackageCatalog {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_catalog_path() {
        assert_eq!(
            catalog_path(Path::new("out"), "docling"),
            PathBuf::from("out/docling/docling.json")
        );
    }

    #[test]
    fn test_fault_isolation() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "healthy/__init__.pyi", "def ok() -> int: ...\n");
        write(root, "healthy/sub/mod.pyi", "class Thing: ...\n");
        write(root, "faulty/__init__.pyi", "def fine() -> None: ...\n");
        write(root, "faulty/broken.pyi", "def broken(:\n");

        let config = config(root);
        let report = builder(&config).run(&manifest(&[("faulty", &["faulty"]), ("healthy", &["healthy"])]));

        assert!(report.passed());
        assert_eq!(report.files_parsed, 3);
        assert_eq!(report.files_failed, 1);
        assert_eq!(report.errors, 1);

        let parse_issue = report.issues.iter().find(|i| i.code == IssueCode::E001).unwrap();
        assert_eq!(parse_issue.package, "faulty");
        assert_eq!(parse_issue.severity, Severity::Error);

        let healthy = read_catalog(&root.join("healthy/healthy.json"));
        assert_eq!(healthy.version, "1.2.3");
        let names: Vec<&str> = healthy.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["healthy", "healthy.sub.mod"]);

        let faulty = read_catalog(&root.join("faulty/faulty.json"));
        assert_eq!(faulty.version, UNKNOWN_VERSION);
        let names: Vec<&str> = faulty.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["faulty"]);
        assert_eq!(faulty.modules[0].functions[0].name, "fine");
    }

    #[test]
    fn test_unicode_whitespace_docstring_does_not_stop_the_run() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "nbsp/__init__.pyi", "\"\"\"Summary\n  body\n \u{a0}\n\"\"\"\n");
        write(root, "healthy/__init__.pyi", "def ok() -> int: ...\n");

        let config = config(root);
        let report = builder(&config).run(&manifest(&[("nbsp", &["nbsp"]), ("healthy", &["healthy"])]));

        assert!(report.passed());
        assert_eq!(report.files_failed, 0);
        assert!(root.join("healthy/healthy.json").is_file());
        let nbsp = read_catalog(&root.join("nbsp/nbsp.json"));
        assert_eq!(nbsp.modules[0].docstring.as_deref(), Some("Summary\nbody"));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(
            root,
            "healthy/__init__.pyi",
            "from enum import Enum\nclass Mode(Enum):\n    A = 1\nAlias = dict[str, int]\nLIMIT: int\n",
        );
        write(root, "healthy/b.pyi", "def b(x: int, /, y: str = ..., *args: int) -> None: ...\n");
        write(root, "healthy/a.pyi", "def a() -> None: ...\n");

        let config = config(root);
        let entries = manifest(&[("healthy", &["healthy"])]);
        let path = root.join("healthy/healthy.json");

        builder(&config).run(&entries);
        let first = fs::read(&path).unwrap();
        builder(&config).run(&entries);
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert!(first.ends_with(b"}\n"));
    }

    #[test]
    fn test_missing_modules_still_produce_a_catalog() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let mut config = config(&temp.path().join("stubs"));
        config.paths.output_root = Some(out.clone());

        let report = builder(&config).run(&manifest(&[("ghost", &["ghost", "ghost_ext"])]));

        assert!(report.passed());
        assert_eq!(report.modules_skipped, 2);
        assert_eq!(report.warnings, 2);

        let catalog = read_catalog(&out.join("ghost/ghost.json"));
        assert_eq!(catalog.package, "ghost");
        assert!(catalog.modules.is_empty());
        assert_eq!(
            fs::read_to_string(out.join("ghost/ghost.json")).unwrap(),
            "{\n  \"package\": \"ghost\",\n  \"version\": \"unknown\",\n  \"modules\": []\n}\n"
        );
    }

    #[test]
    fn test_write_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "pkg/__init__.pyi", "X: int\n");
        // A plain file where the package directory should be created.
        fs::write(root.join("out"), "").unwrap();

        let mut config = config(root);
        config.paths.output_root = Some(root.join("out"));
        let report = builder(&config).run(&manifest(&[("pkg", &["pkg"])]));

        assert!(!report.passed());
        assert!(report.issues.iter().any(|i| i.code == IssueCode::E003));
        assert_eq!(report.packages[0].catalog, None);
    }

    #[test]
    fn test_non_stub_files_are_ignored() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "pkg/__init__.pyi", "X: int\n");
        write(root, "pkg/impl.py", "this is not parsed(\n");
        write(root, "pkg/README.md", "# pkg\n");

        let config = config(root);
        let (catalog, report) = builder(&config).build_package(&PackageEntry {
            distribution: "pkg".to_string(),
            modules: vec!["pkg".to_string()],
        });

        assert_eq!(report.files_parsed, 1);
        assert_eq!(report.errors, 0);
        assert_eq!(catalog.modules.len(), 1);
    }
}
