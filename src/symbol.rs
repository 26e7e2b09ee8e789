//! @ai:module:intent Define the catalog data model for public stub symbols
//! @ai:module:layer domain
//! @ai:module:public_api ParameterKind, ParameterSymbol, OverloadSignature, FunctionSymbol, ClassCategory, ClassSymbol, ClassMembers, VariableSymbol, TypeAliasSymbol, ModuleSummary, PackageCatalog, is_public
//! @ai:module:stateless true
//!
//! Field order in these structs is the key order of the emitted JSON, so it is
//! part of the catalog format.

use serde::{Deserialize, Serialize};

/// Underscore-prefixed names that are still part of the public surface.
pub const PUBLIC_DUNDERS: &[&str] = &["__all__", "__version__"];

/// @ai:intent Decide whether a symbol name belongs in the catalog
/// @ai:example ("Reader") -> true
/// @ai:example ("_helper") -> false
/// @ai:example ("__all__") -> true
/// @ai:effects pure
pub fn is_public(name: &str) -> bool {
    !name.starts_with('_') || PUBLIC_DUNDERS.contains(&name)
}

/// @ai:intent Signature section a parameter was declared in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

impl ParameterKind {
    /// @ai:intent Get the catalog spelling of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::PositionalOnly => "positional-only",
            ParameterKind::PositionalOrKeyword => "positional-or-keyword",
            ParameterKind::VarPositional => "var-positional",
            ParameterKind::KeywordOnly => "keyword-only",
            ParameterKind::VarKeyword => "var-keyword",
        }
    }
}

/// @ai:intent One parameter of one overload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(rename = "type")]
    pub type_text: Option<String>,
    #[serde(rename = "default")]
    pub default_text: Option<String>,
}

/// @ai:intent One call signature of a function
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OverloadSignature {
    pub params: Vec<ParameterSymbol>,
    #[serde(rename = "return")]
    pub return_text: Option<String>,
    pub decorators: Vec<String>,
}

/// @ai:intent All same-named declarations of one scope
/// @ai:invariant overloads is non-empty and in declaration order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub name: String,
    pub decorators: Vec<String>,
    pub overloads: Vec<OverloadSignature>,
}

/// @ai:intent Category assigned to a class by its bases
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ClassCategory {
    Class,
    Enumeration,
    StructuredRecord,
    Protocol,
}

impl ClassCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassCategory::Class => "class",
            ClassCategory::Enumeration => "enumeration",
            ClassCategory::StructuredRecord => "structured-record",
            ClassCategory::Protocol => "protocol",
        }
    }
}

/// @ai:intent Members declared directly in a class body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassMembers {
    pub class_vars: Vec<VariableSymbol>,
    pub attributes: Vec<VariableSymbol>,
    pub methods: Vec<FunctionSymbol>,
}

/// @ai:intent A public class, whatever its category
///
/// The category is not serialized: it decides which module list the class
/// lands in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassSymbol {
    pub name: String,
    pub bases: Vec<String>,
    pub decorators: Vec<String>,
    #[serde(skip, default = "default_category")]
    pub category: ClassCategory,
    pub members: ClassMembers,
}

fn default_category() -> ClassCategory {
    ClassCategory::Class
}

/// @ai:intent A variable, class variable or attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariableSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: Option<String>,
    #[serde(rename = "value")]
    pub value_text: Option<String>,
}

/// @ai:intent A module-level alias binding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeAliasSymbol {
    pub name: String,
    #[serde(rename = "target")]
    pub target_text: String,
}

/// @ai:intent Public surface of one stub file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub name: String,
    #[serde(rename = "path")]
    pub relative_path: String,
    pub docstring: Option<String>,
    pub classes: Vec<ClassSymbol>,
    pub enums: Vec<ClassSymbol>,
    pub typed_dicts: Vec<ClassSymbol>,
    pub protocols: Vec<ClassSymbol>,
    pub functions: Vec<FunctionSymbol>,
    pub variables: Vec<VariableSymbol>,
    pub type_aliases: Vec<TypeAliasSymbol>,
}

/// @ai:intent Versioned catalog of one distribution
/// @ai:invariant modules are sorted by name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageCatalog {
    pub package: String,
    pub version: String,
    pub modules: Vec<ModuleSummary>,
}

impl ModuleSummary {
    /// @ai:intent Create an empty summary for a module file
    pub fn new(name: String, relative_path: String) -> Self {
        Self {
            name,
            relative_path,
            ..Default::default()
        }
    }

    /// @ai:intent File a class under the list matching its category
    pub fn push_class(&mut self, class: ClassSymbol) {
        match class.category {
            ClassCategory::Class => self.classes.push(class),
            ClassCategory::Enumeration => self.enums.push(class),
            ClassCategory::StructuredRecord => self.typed_dicts.push(class),
            ClassCategory::Protocol => self.protocols.push(class),
        }
    }

    /// @ai:intent Iterate every class regardless of category
    pub fn all_classes(&self) -> impl Iterator<Item = &ClassSymbol> {
        self.classes
            .iter()
            .chain(&self.enums)
            .chain(&self.typed_dicts)
            .chain(&self.protocols)
    }

    /// @ai:intent Iterate every class with the category implied by its list
    ///
    /// Deserialized classes do not carry a category, so the list they were
    /// read from is authoritative.
    pub fn categorized_classes(&self) -> impl Iterator<Item = (ClassCategory, &ClassSymbol)> {
        tagged(ClassCategory::Class, &self.classes)
            .chain(tagged(ClassCategory::Enumeration, &self.enums))
            .chain(tagged(ClassCategory::StructuredRecord, &self.typed_dicts))
            .chain(tagged(ClassCategory::Protocol, &self.protocols))
    }

    /// @ai:intent Count the public symbols recorded for this module
    pub fn symbol_count(&self) -> usize {
        self.all_classes().count()
            + self.functions.len()
            + self.variables.len()
            + self.type_aliases.len()
    }
}

fn tagged(
    category: ClassCategory,
    list: &[ClassSymbol],
) -> impl Iterator<Item = (ClassCategory, &ClassSymbol)> {
    list.iter().map(move |c| (category, c))
}

impl PackageCatalog {
    /// @ai:intent Assemble a catalog, sorting modules by name
    /// @ai:post modules are sorted lexicographically by name
    pub fn new(package: String, version: String, mut modules: Vec<ModuleSummary>) -> Self {
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            package,
            version,
            modules,
        }
    }

    /// @ai:intent Find a module summary by fully-qualified name
    pub fn module(&self, name: &str) -> Option<&ModuleSummary> {
        self.modules.iter().find(|m| m.name == name)
    }
}
