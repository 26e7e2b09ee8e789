//! @ai:module:intent CLI entry point for building and comparing stub catalogs
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on catalog, config, diff, extractor, manifest, output

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stubcat_core::{
    diff, output, CatalogBuilder, CatalogConfig, Manifest, ModuleExtractor, OutputFormat,
    RepairPass,
};

const DEFAULT_CONFIG_FILE: &str = "stubcat.toml";

#[derive(Parser)]
#[command(name = "stubcat")]
#[command(author, version, about = "Build deterministic JSON symbol catalogs from Python type stubs")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one catalog per package listed in the manifest
    Build {
        /// Path to configuration file (defaults to ./stubcat.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding one stub tree per top-level module
        #[arg(long)]
        stub_root: Option<PathBuf>,

        /// Package manifest (defaults to <stub-root>/packages.json)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Directory catalogs are written under (defaults to the stub root)
        #[arg(long)]
        output_root: Option<PathBuf>,

        /// site-packages directory to read installed versions from (repeatable)
        #[arg(long = "site-packages")]
        site_packages: Vec<PathBuf>,

        /// Output format for the run report
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Parse one stub file and show its public surface
    Inspect {
        /// Path to the stub file
        path: PathBuf,

        /// Module name to report (defaults to the file stem)
        #[arg(long)]
        module: Option<String>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Compare two catalogs of the same package
    Diff {
        /// Path to the old catalog
        old_file: PathBuf,

        /// Path to the new catalog
        new_file: PathBuf,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,

        /// Fail with exit code 1 if breaking changes are found
        #[arg(long, default_value = "false")]
        fail_on_breaking: bool,
    },

    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

struct BuildArgs {
    config: Option<PathBuf>,
    stub_root: Option<PathBuf>,
    manifest: Option<PathBuf>,
    output_root: Option<PathBuf>,
    site_packages: Vec<PathBuf>,
    format: Format,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(2);
    }

    let result = match cli.command {
        Commands::Build {
            config,
            stub_root,
            manifest,
            output_root,
            site_packages,
            format,
        } => run_build(BuildArgs {
            config,
            stub_root,
            manifest,
            output_root,
            site_packages,
            format,
        }),
        Commands::Inspect {
            path,
            module,
            config,
            format,
        } => inspect(&path, module, config, format),
        Commands::Diff {
            old_file,
            new_file,
            format,
            fail_on_breaking,
        } => run_diff(&old_file, &new_file, format, fail_on_breaking),
        Commands::Init { output } => init_config(&output),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("stubcat_core={}", level).parse()?)
                .add_directive(format!("stubcat={}", level).parse()?),
        )
        .init();
    Ok(())
}

/// @ai:intent Run the catalog pipeline for the loaded manifest
/// @ai:effects fs:read, fs:write
fn run_build(args: BuildArgs) -> Result<ExitCode> {
    let mut config = load_or_default_config(args.config.as_deref())?;

    if let Some(stub_root) = args.stub_root {
        config.paths.stub_root = stub_root;
    }
    if args.manifest.is_some() {
        config.paths.manifest = args.manifest;
    }
    if args.output_root.is_some() {
        config.paths.output_root = args.output_root;
    }
    if !args.site_packages.is_empty() {
        config.versions.site_packages = args.site_packages;
    }

    let manifest_path = config.paths.manifest_path();
    let manifest = Manifest::load(&manifest_path)?;
    tracing::info!(
        "Loaded {} packages from {}",
        manifest.packages.len(),
        manifest_path.display()
    );

    let mut builder = CatalogBuilder::from_config(&config)?;
    let report = builder.run(&manifest);

    println!("{}", output::format_report(&report, args.format.into()));

    if report.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// @ai:intent Print the summary of a single stub file
/// @ai:effects fs:read
fn inspect(path: &Path, module: Option<String>, config: Option<PathBuf>, format: Format) -> Result<ExitCode> {
    let config = load_or_default_config(config.as_deref())?;
    let repair = RepairPass::new(config.repair.keywords.as_slice())?;
    let mut extractor = ModuleExtractor::new(repair)?;

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = module.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let relative = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let summary = extractor.extract_source(&source, path, name, relative)?;
    println!("{}", output::format_summary(&summary, format.into()));
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Compare two catalog files and report API changes
/// @ai:effects fs:read
fn run_diff(old_file: &Path, new_file: &Path, format: Format, fail_on_breaking: bool) -> Result<ExitCode> {
    let diff_result = diff::diff_files(old_file, new_file)?;
    println!("{}", output::format_diff(&diff_result, format.into()));

    if fail_on_breaking && diff_result.has_breaking_changes() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: &Path) -> Result<ExitCode> {
    CatalogConfig::default().save(output)?;
    println!("Configuration saved to {}", output.display());
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<&Path>) -> Result<CatalogConfig> {
    match path {
        Some(p) => CatalogConfig::load(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            Ok(CatalogConfig::load(Path::new(DEFAULT_CONFIG_FILE))?)
        }
        None => Ok(CatalogConfig::default()),
    }
}
