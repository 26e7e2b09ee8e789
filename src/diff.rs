//! @ai:module:intent Compare two catalogs of one package for API changes
//! @ai:module:layer application
//! @ai:module:public_api diff_files, diff_catalogs, CatalogDiff, CatalogChange, ChangeType
//! @ai:module:depends_on symbol, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::symbol::{
    ClassCategory, ClassSymbol, FunctionSymbol, ModuleSummary, OverloadSignature, PackageCatalog,
    ParameterKind, ParameterSymbol, TypeAliasSymbol, VariableSymbol,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// @ai:intent Severity of an API change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Breaking,
    Notable,
    NonBreaking,
}

/// @ai:intent A single change detected between catalogs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogChange {
    pub module: String,
    pub symbol: Option<String>,
    pub change_type: ChangeType,
    pub tag: String,
    pub description: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// @ai:intent Result of comparing two catalogs
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogDiff {
    pub package: String,
    pub old_version: String,
    pub new_version: String,
    pub changes: Vec<CatalogChange>,
    pub breaking_count: usize,
    pub notable_count: usize,
    pub non_breaking_count: usize,
}

impl CatalogDiff {
    /// @ai:intent Check if there are any breaking changes
    pub fn has_breaking_changes(&self) -> bool {
        self.breaking_count > 0
    }

    fn add_change(&mut self, change: CatalogChange) {
        match change.change_type {
            ChangeType::Breaking => self.breaking_count += 1,
            ChangeType::Notable => self.notable_count += 1,
            ChangeType::NonBreaking => self.non_breaking_count += 1,
        }
        self.changes.push(change);
    }
}

/// Collects changes for one module and symbol path.
struct Recorder<'d> {
    diff: &'d mut CatalogDiff,
    module: &'d str,
}

impl Recorder<'_> {
    fn record(
        &mut self,
        symbol: Option<&str>,
        change_type: ChangeType,
        tag: &str,
        description: String,
        old_value: Option<String>,
        new_value: Option<String>,
    ) {
        self.diff.add_change(CatalogChange {
            module: self.module.to_string(),
            symbol: symbol.map(str::to_string),
            change_type,
            tag: tag.to_string(),
            description,
            old_value,
            new_value,
        });
    }
}

/// Pairing of same-named items across two versions.
enum Pair<'a, T> {
    Removed(&'a T),
    Both(&'a T, &'a T),
    Added(&'a T),
}

/// Old items in their order, then items only present in the new version.
fn pair_by_name<'a, T>(old: &'a [T], new: &'a [T], name: impl Fn(&T) -> &str) -> Vec<Pair<'a, T>> {
    let mut pairs: Vec<Pair<'a, T>> = old
        .iter()
        .map(|o| match new.iter().find(|n| name(n) == name(o)) {
            Some(n) => Pair::Both(o, n),
            None => Pair::Removed(o),
        })
        .collect();
    pairs.extend(
        new.iter()
            .filter(|n| !old.iter().any(|o| name(o) == name(n)))
            .map(Pair::Added),
    );
    pairs
}

/// @ai:intent Compare two catalog files
/// @ai:effects fs:read
pub fn diff_files(old_path: &Path, new_path: &Path) -> Result<CatalogDiff> {
    let old = load_catalog(old_path)?;
    let new = load_catalog(new_path)?;
    Ok(diff_catalogs(&old, &new))
}

fn load_catalog(path: &Path) -> Result<PackageCatalog> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// @ai:intent Compare two catalogs of the same package
/// @ai:post changes are ordered by module name, then declaration order
/// @ai:effects pure
pub fn diff_catalogs(old: &PackageCatalog, new: &PackageCatalog) -> CatalogDiff {
    let mut diff = CatalogDiff {
        package: new.package.clone(),
        old_version: old.version.clone(),
        new_version: new.version.clone(),
        ..Default::default()
    };

    let names: BTreeSet<&str> = old
        .modules
        .iter()
        .chain(&new.modules)
        .map(|m| m.name.as_str())
        .collect();

    for name in names {
        let mut rec = Recorder {
            diff: &mut diff,
            module: name,
        };
        match (old.module(name), new.module(name)) {
            (Some(o), Some(n)) => compare_modules(&mut rec, o, n),
            (Some(_), None) => rec.record(
                None,
                ChangeType::Breaking,
                "module",
                "Module removed".to_string(),
                Some(name.to_string()),
                None,
            ),
            (None, Some(_)) => rec.record(
                None,
                ChangeType::NonBreaking,
                "module",
                "Module added".to_string(),
                None,
                Some(name.to_string()),
            ),
            (None, None) => {}
        }
    }

    diff
}

fn compare_modules(rec: &mut Recorder, old: &ModuleSummary, new: &ModuleSummary) {
    if old.docstring != new.docstring {
        rec.record(
            None,
            ChangeType::NonBreaking,
            "docstring",
            "Module docstring changed".to_string(),
            old.docstring.clone(),
            new.docstring.clone(),
        );
    }

    let old_classes: Vec<(ClassCategory, &ClassSymbol)> = old.categorized_classes().collect();
    let new_classes: Vec<(ClassCategory, &ClassSymbol)> = new.categorized_classes().collect();
    for pair in pair_by_name(&old_classes, &new_classes, |(_, c)| c.name.as_str()) {
        match pair {
            Pair::Removed((category, c)) => removed(rec, &c.name, category.as_str()),
            Pair::Added((category, c)) => added(rec, &c.name, category.as_str()),
            Pair::Both(o, n) => compare_classes(rec, *o, *n),
        }
    }

    for pair in pair_by_name(&old.functions, &new.functions, |f| f.name.as_str()) {
        match pair {
            Pair::Removed(f) => removed(rec, &f.name, "function"),
            Pair::Added(f) => added(rec, &f.name, "function"),
            Pair::Both(o, n) => compare_functions(rec, &o.name, o, n),
        }
    }

    compare_variables(rec, None, "variable", &old.variables, &new.variables);

    for pair in pair_by_name(&old.type_aliases, &new.type_aliases, |a| a.name.as_str()) {
        match pair {
            Pair::Removed(a) => removed(rec, &a.name, "alias"),
            Pair::Added(a) => added(rec, &a.name, "alias"),
            Pair::Both(o, n) => compare_aliases(rec, o, n),
        }
    }
}

fn removed(rec: &mut Recorder, symbol: &str, tag: &str) {
    rec.record(
        Some(symbol),
        ChangeType::Breaking,
        tag,
        format!("Public {} removed", tag),
        Some(symbol.to_string()),
        None,
    );
}

fn added(rec: &mut Recorder, symbol: &str, tag: &str) {
    rec.record(
        Some(symbol),
        ChangeType::NonBreaking,
        tag,
        format!("Public {} added", tag),
        None,
        Some(symbol.to_string()),
    );
}

fn compare_classes(
    rec: &mut Recorder,
    (old_category, old): (ClassCategory, &ClassSymbol),
    (new_category, new): (ClassCategory, &ClassSymbol),
) {
    let name = new.name.as_str();

    if old_category != new_category {
        rec.record(
            Some(name),
            ChangeType::Breaking,
            "category",
            format!(
                "Class category changed from {} to {}",
                old_category.as_str(),
                new_category.as_str()
            ),
            Some(old_category.as_str().to_string()),
            Some(new_category.as_str().to_string()),
        );
    }

    if old.bases != new.bases {
        rec.record(
            Some(name),
            ChangeType::Notable,
            "bases",
            "Base classes changed".to_string(),
            Some(old.bases.join(", ")),
            Some(new.bases.join(", ")),
        );
    }

    compare_variables(rec, Some(name), "class variable", &old.members.class_vars, &new.members.class_vars);
    compare_variables(rec, Some(name), "attribute", &old.members.attributes, &new.members.attributes);

    for pair in pair_by_name(&old.members.methods, &new.members.methods, |m| m.name.as_str()) {
        match pair {
            Pair::Removed(m) => removed(rec, &format!("{}.{}", name, m.name), "method"),
            Pair::Added(m) => added(rec, &format!("{}.{}", name, m.name), "method"),
            Pair::Both(o, n) => compare_functions(rec, &format!("{}.{}", name, n.name), o, n),
        }
    }
}

fn compare_variables(
    rec: &mut Recorder,
    owner: Option<&str>,
    tag: &str,
    old: &[VariableSymbol],
    new: &[VariableSymbol],
) {
    let qualified = |v: &VariableSymbol| match owner {
        Some(owner) => format!("{}.{}", owner, v.name),
        None => v.name.clone(),
    };

    for pair in pair_by_name(old, new, |v| v.name.as_str()) {
        match pair {
            Pair::Removed(v) => removed(rec, &qualified(v), tag),
            Pair::Added(v) => added(rec, &qualified(v), tag),
            Pair::Both(o, n) if o.type_text != n.type_text => rec.record(
                Some(&qualified(n)),
                ChangeType::Notable,
                "type",
                format!("Declared type of {} changed", tag),
                o.type_text.clone(),
                n.type_text.clone(),
            ),
            Pair::Both(..) => {}
        }
    }
}

fn compare_aliases(rec: &mut Recorder, old: &TypeAliasSymbol, new: &TypeAliasSymbol) {
    if old.target_text != new.target_text {
        rec.record(
            Some(&new.name),
            ChangeType::Notable,
            "alias",
            "Alias target changed".to_string(),
            Some(old.target_text.clone()),
            Some(new.target_text.clone()),
        );
    }
}

/// @ai:intent Compare overload sets positionally
fn compare_functions(rec: &mut Recorder, symbol: &str, old: &FunctionSymbol, new: &FunctionSymbol) {
    for (index, (o, n)) in old.overloads.iter().zip(&new.overloads).enumerate() {
        let label = if old.overloads.len() > 1 || new.overloads.len() > 1 {
            format!("{}#{}", symbol, index + 1)
        } else {
            symbol.to_string()
        };
        compare_signatures(rec, &label, o, n);
    }

    if new.overloads.len() < old.overloads.len() {
        rec.record(
            Some(symbol),
            ChangeType::Breaking,
            "overload",
            format!(
                "{} overload(s) removed",
                old.overloads.len() - new.overloads.len()
            ),
            Some(old.overloads.len().to_string()),
            Some(new.overloads.len().to_string()),
        );
    } else if new.overloads.len() > old.overloads.len() {
        rec.record(
            Some(symbol),
            ChangeType::Notable,
            "overload",
            format!(
                "{} overload(s) added",
                new.overloads.len() - old.overloads.len()
            ),
            Some(old.overloads.len().to_string()),
            Some(new.overloads.len().to_string()),
        );
    }
}

fn compare_signatures(rec: &mut Recorder, symbol: &str, old: &OverloadSignature, new: &OverloadSignature) {
    for pair in pair_by_name(&old.params, &new.params, |p| p.name.as_str()) {
        match pair {
            Pair::Removed(p) => rec.record(
                Some(symbol),
                ChangeType::Breaking,
                "param",
                format!("Parameter `{}` removed", p.name),
                Some(p.name.clone()),
                None,
            ),
            Pair::Added(p) => {
                let change_type = if is_optional(p) {
                    ChangeType::NonBreaking
                } else {
                    ChangeType::Breaking
                };
                rec.record(
                    Some(symbol),
                    change_type,
                    "param",
                    format!("Parameter `{}` added", p.name),
                    None,
                    Some(p.name.clone()),
                );
            }
            Pair::Both(o, n) => compare_params(rec, symbol, o, n),
        }
    }

    if old.return_text != new.return_text {
        rec.record(
            Some(symbol),
            ChangeType::Notable,
            "return",
            "Return type changed".to_string(),
            old.return_text.clone(),
            new.return_text.clone(),
        );
    }
}

/// A new parameter callers can leave out.
fn is_optional(param: &ParameterSymbol) -> bool {
    param.default_text.is_some()
        || matches!(param.kind, ParameterKind::VarPositional | ParameterKind::VarKeyword)
}

fn compare_params(rec: &mut Recorder, symbol: &str, old: &ParameterSymbol, new: &ParameterSymbol) {
    if old.kind != new.kind {
        rec.record(
            Some(symbol),
            ChangeType::Breaking,
            "param",
            format!("Parameter `{}` changed kind", new.name),
            Some(old.kind.as_str().to_string()),
            Some(new.kind.as_str().to_string()),
        );
    }
    if old.type_text != new.type_text {
        rec.record(
            Some(symbol),
            ChangeType::Notable,
            "param",
            format!("Parameter `{}` changed type", new.name),
            old.type_text.clone(),
            new.type_text.clone(),
        );
    }
    if old.default_text != new.default_text {
        rec.record(
            Some(symbol),
            ChangeType::Notable,
            "param",
            format!("Parameter `{}` changed default", new.name),
            old.default_text.clone(),
            new.default_text.clone(),
        );
    }
}
