//! @ai:module:intent Format output for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_report, format_summary, format_diff, to_json
//! @ai:module:depends_on report, symbol, diff
//! @ai:module:stateless true

use crate::diff::{CatalogChange, CatalogDiff, ChangeType};
use crate::report::{BuildReport, Severity};
use crate::symbol::{ClassSymbol, FunctionSymbol, ModuleSummary, OverloadSignature};
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}

fn format_with<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T) -> String) -> String {
    match format {
        OutputFormat::Json => to_json(value, false),
        OutputFormat::JsonPretty => to_json(value, true),
        OutputFormat::Text => text(value),
    }
}

/// @ai:intent Format a run report as a string
/// @ai:effects pure
pub fn format_report(report: &BuildReport, format: OutputFormat) -> String {
    format_with(report, format, format_report_text)
}

fn format_report_text(report: &BuildReport) -> String {
    let mut output = String::new();

    for issue in &report.issues {
        let severity_str = match issue.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warning => "WARN".yellow().bold(),
            Severity::Info => "INFO".blue(),
        };
        let location = issue
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| issue.package.clone());

        output.push_str(&format!(
            "{} {} - {} ({:?})\n",
            severity_str,
            location.dimmed(),
            issue.message,
            issue.code
        ));
    }

    if !report.issues.is_empty() {
        output.push('\n');
    }

    for package in &report.packages {
        let target = match &package.catalog {
            Some(path) => path.display().to_string().normal(),
            None => "not written".red(),
        };
        output.push_str(&format!(
            "  {} {} ({} modules) -> {}\n",
            package.package.cyan(),
            package.version,
            package.modules,
            target
        ));
    }

    output.push_str(&format!(
        "\nProcessed {} packages, {} files parsed, {} failed, {} modules skipped\n",
        report.packages.len(),
        report.files_parsed,
        report.files_failed,
        report.modules_skipped
    ));

    if !report.passed() {
        output.push_str(&format!(
            "{} {} errors, {} warnings\n",
            "FAILED".red().bold(),
            report.errors.to_string().red().bold(),
            report.warnings.to_string().yellow()
        ));
    } else if report.errors > 0 || report.warnings > 0 {
        output.push_str(&format!(
            "{} {} errors, {} warnings\n",
            "OK".green().bold(),
            report.errors.to_string().red(),
            report.warnings.to_string().yellow()
        ));
    } else {
        output.push_str(&format!("{} No issues found\n", "OK".green().bold()));
    }

    output
}

/// @ai:intent Format a module summary as a string
/// @ai:effects pure
pub fn format_summary(summary: &ModuleSummary, format: OutputFormat) -> String {
    format_with(summary, format, format_summary_text)
}

fn format_summary_text(summary: &ModuleSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({})\n",
        summary.name.bold(),
        summary.relative_path
    ));

    if let Some(doc) = summary.docstring.as_deref().and_then(|d| d.lines().next()) {
        output.push_str(&format!("  {}\n", doc.dimmed()));
    }

    for (category, class) in summary.categorized_classes() {
        push_class(&mut output, category.as_str(), class);
    }

    if !summary.functions.is_empty() {
        output.push_str(&format!("\n  Functions ({}):\n", summary.functions.len()));
        for func in &summary.functions {
            push_function(&mut output, "    ", func);
        }
    }

    if !summary.variables.is_empty() {
        output.push_str(&format!("\n  Variables ({}):\n", summary.variables.len()));
        for var in &summary.variables {
            match &var.type_text {
                Some(t) => output.push_str(&format!("    {}: {}\n", var.name.cyan(), t)),
                None => output.push_str(&format!("    {}\n", var.name.cyan())),
            }
        }
    }

    if !summary.type_aliases.is_empty() {
        output.push_str(&format!("\n  Type aliases ({}):\n", summary.type_aliases.len()));
        for alias in &summary.type_aliases {
            output.push_str(&format!("    {} = {}\n", alias.name.cyan(), alias.target_text));
        }
    }

    output
}

fn push_class(output: &mut String, category: &str, class: &ClassSymbol) {
    output.push_str(&format!("\n  {} {}", category.dimmed(), class.name.cyan().bold()));
    if !class.bases.is_empty() {
        output.push_str(&format!("({})", class.bases.join(", ")));
    }
    output.push('\n');

    for var in class.members.class_vars.iter().chain(&class.members.attributes) {
        output.push_str(&format!(
            "    {}: {}\n",
            var.name,
            var.type_text.as_deref().unwrap_or("?")
        ));
    }
    for method in &class.members.methods {
        push_function(output, "    ", method);
    }
}

fn push_function(output: &mut String, indent: &str, func: &FunctionSymbol) {
    for overload in &func.overloads {
        output.push_str(&format!("{}{}{}\n", indent, func.name.cyan(), signature(overload)));
    }
}

/// `(a: int, *, b: str = ...) -> None`
fn signature(overload: &OverloadSignature) -> String {
    let params: Vec<String> = overload
        .params
        .iter()
        .map(|p| {
            let mut text = p.name.clone();
            if let Some(t) = &p.type_text {
                text.push_str(&format!(": {}", t));
            }
            if let Some(d) = &p.default_text {
                text.push_str(&format!(" = {}", d));
            }
            text
        })
        .collect();

    match &overload.return_text {
        Some(ret) => format!("({}) -> {}", params.join(", "), ret),
        None => format!("({})", params.join(", ")),
    }
}

/// @ai:intent Format diff results as a string
/// @ai:effects pure
pub fn format_diff(diff: &CatalogDiff, format: OutputFormat) -> String {
    format_with(diff, format, format_diff_text)
}

fn format_diff_text(diff: &CatalogDiff) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Catalog diff: {} {} -> {}\n\n",
        diff.package.bold(),
        diff.old_version,
        diff.new_version
    ));

    let sections = [
        (ChangeType::Breaking, "BREAKING CHANGES".red().bold()),
        (ChangeType::Notable, "NOTABLE CHANGES".yellow().bold()),
        (ChangeType::NonBreaking, "NON-BREAKING CHANGES".green().bold()),
    ];

    for (change_type, heading) in sections {
        let changes: Vec<&CatalogChange> = diff
            .changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .collect();
        if changes.is_empty() {
            continue;
        }

        output.push_str(&format!("{}\n", heading));
        for change in changes {
            let location = match &change.symbol {
                Some(symbol) => format!("{}.{}", change.module, symbol),
                None => change.module.clone(),
            };
            output.push_str(&format!("  {}:\n", location.cyan()));
            output.push_str(&format!("    - {} {}\n", change.tag.yellow(), change.description));

            if let Some(old) = &change.old_value {
                output.push_str(&format!("      Old: {}\n", old.dimmed()));
            }
            if let Some(new) = &change.new_value {
                output.push_str(&format!("      New: {}\n", new));
            }
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Summary: {} breaking, {} notable, {} non-breaking changes\n",
        if diff.breaking_count > 0 {
            diff.breaking_count.to_string().red().bold().to_string()
        } else {
            "0".to_string()
        },
        if diff.notable_count > 0 {
            diff.notable_count.to_string().yellow().to_string()
        } else {
            "0".to_string()
        },
        diff.non_breaking_count
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Issue, IssueCode, PackageOutcome};
    use crate::symbol::{ParameterKind, ParameterSymbol};
    use std::path::PathBuf;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_signature() {
        let overload = OverloadSignature {
            params: vec![
                ParameterSymbol {
                    name: "path".to_string(),
                    kind: ParameterKind::PositionalOrKeyword,
                    type_text: Some("str".to_string()),
                    default_text: None,
                },
                ParameterSymbol {
                    name: "mode".to_string(),
                    kind: ParameterKind::KeywordOnly,
                    type_text: None,
                    default_text: Some("...".to_string()),
                },
            ],
            return_text: Some("Reader".to_string()),
            decorators: vec![],
        };
        assert_eq!(signature(&overload), "(path: str, mode = ...) -> Reader");
    }

    #[test]
    fn test_report_text_lists_packages_and_issues() {
        plain();
        let mut report = BuildReport::default();
        report.push_issue(Issue::new(IssueCode::W001, "pkg", "stub root missing", None));
        report.packages.push(PackageOutcome {
            package: "pkg".to_string(),
            version: "1.0".to_string(),
            modules: 2,
            catalog: Some(PathBuf::from("out/pkg/pkg.json")),
        });

        let text = format_report(&report, OutputFormat::Text);
        assert!(text.contains("WARN pkg - stub root missing (W001)"));
        assert!(text.contains("pkg 1.0 (2 modules) -> out/pkg/pkg.json"));
        assert!(text.contains("OK 0 errors, 1 warnings"));
    }

    #[test]
    fn test_json_formats() {
        let summary = ModuleSummary::new("pkg".to_string(), "__init__.pyi".to_string());
        let compact = format_summary(&summary, OutputFormat::Json);
        assert!(compact.starts_with("{\"name\":\"pkg\",\"path\":\"__init__.pyi\""));
        assert!(format_summary(&summary, OutputFormat::JsonPretty).contains("\n  \"typedDicts\": []"));
    }

    #[test]
    fn test_diff_text_groups_by_change_type() {
        plain();
        let mut diff = CatalogDiff {
            package: "pkg".to_string(),
            old_version: "1.0".to_string(),
            new_version: "2.0".to_string(),
            ..Default::default()
        };
        diff.changes.push(CatalogChange {
            module: "pkg".to_string(),
            symbol: Some("open".to_string()),
            change_type: ChangeType::Breaking,
            tag: "function".to_string(),
            description: "Public function removed".to_string(),
            old_value: Some("open".to_string()),
            new_value: None,
        });
        diff.breaking_count = 1;

        let text = format_diff(&diff, OutputFormat::Text);
        assert!(text.starts_with("Catalog diff: pkg 1.0 -> 2.0"));
        assert!(text.contains("BREAKING CHANGES\n  pkg.open:\n    - function Public function removed"));
        assert!(!text.contains("NOTABLE CHANGES"));
        assert!(text.ends_with("Summary: 1 breaking, 0 notable, 0 non-breaking changes\n"));
    }
}
