//! @ai:module:intent Classify class declarations and extract their members
//! @ai:module:layer application
//! @ai:module:public_api CATEGORY_RULES, classify_bases, class_symbol
//! @ai:module:depends_on scope, functions, syntax, symbol
//! @ai:module:stateless true
//!
//! Classification looks only at the text of the direct bases. A class that
//! becomes an enum or protocol through an intermediate base of its own is
//! reported as a plain class.

use crate::scope::{Assignment, Scope};
use crate::symbol::{is_public, ClassCategory, ClassMembers, ClassSymbol, VariableSymbol};
use crate::syntax::ClassDecl;

/// @ai:intent Ordered marker rules; the first rule matching any base wins
///
/// Markers are compared against lowercased base text by substring.
pub const CATEGORY_RULES: &[(&str, ClassCategory)] = &[
    ("enum", ClassCategory::Enumeration),
    ("typeddict", ClassCategory::StructuredRecord),
    ("protocol", ClassCategory::Protocol),
];

/// @ai:intent Assign exactly one category from the base texts
/// @ai:example (["str", "Enum"]) -> Enumeration
/// @ai:example (["Protocol[T]"]) -> Protocol
/// @ai:example (["Base"]) -> Class
/// @ai:effects pure
pub fn classify_bases<S: AsRef<str>>(bases: &[S]) -> ClassCategory {
    let lowered: Vec<String> = bases
        .iter()
        .map(|b| b.as_ref().to_lowercase())
        .filter(|b| !b.is_empty())
        .collect();

    CATEGORY_RULES
        .iter()
        .find(|(marker, _)| lowered.iter().any(|b| b.contains(marker)))
        .map(|(_, category)| *category)
        .unwrap_or(ClassCategory::Class)
}

/// @ai:intent Build the catalog entry for a class declaration
/// @ai:effects pure
pub fn class_symbol(decl: &ClassDecl) -> ClassSymbol {
    let bases: Vec<String> = decl.bases.iter().map(|b| b.text.clone()).collect();
    let category = classify_bases(&bases);

    ClassSymbol {
        name: decl.name.clone(),
        bases,
        decorators: decl.decorators.iter().map(|d| d.text.clone()).collect(),
        category,
        members: class_members(decl),
    }
}

fn class_members(decl: &ClassDecl) -> ClassMembers {
    let scope = Scope::collect(&decl.body);
    let mut members = ClassMembers {
        methods: scope.functions.public_symbols(),
        ..Default::default()
    };

    for assignment in &scope.assignments {
        match assignment {
            Assignment::Annotated(ann) => {
                let Some(name) = ann.target.name().filter(|n| is_public(n)) else {
                    continue;
                };
                members.class_vars.push(VariableSymbol {
                    name: name.to_string(),
                    type_text: Some(ann.annotation.text.clone()),
                    value_text: ann.value.as_ref().map(|v| v.text.clone()),
                });
            }
            Assignment::Plain(assign) => {
                for name in assign.targets.iter().filter_map(|t| t.name()) {
                    if !is_public(name) {
                        continue;
                    }
                    members.attributes.push(VariableSymbol {
                        name: name.to_string(),
                        type_text: None,
                        value_text: Some(assign.value.text.clone()),
                    });
                }
            }
        }
    }

    members
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{
        AnnAssignDecl, Arguments, AssignDecl, Declaration, Expr, ExprKind, FunctionDecl, Target,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_each_category() {
        assert_eq!(classify_bases(&["Enum"]), ClassCategory::Enumeration);
        assert_eq!(classify_bases(&["enum.IntFlag"]), ClassCategory::Enumeration);
        assert_eq!(classify_bases(&["TypedDict"]), ClassCategory::StructuredRecord);
        assert_eq!(classify_bases(&["typing_extensions.TypedDict"]), ClassCategory::StructuredRecord);
        assert_eq!(classify_bases(&["Protocol[T_co]"]), ClassCategory::Protocol);
        assert_eq!(classify_bases(&["BaseModel"]), ClassCategory::Class);
        assert_eq!(classify_bases::<&str>(&[]), ClassCategory::Class);
    }

    #[test]
    fn test_enum_marker_beats_protocol_marker() {
        assert_eq!(classify_bases(&["Protocol", "Enum"]), ClassCategory::Enumeration);
        assert_eq!(classify_bases(&["TypedDict", "Protocol"]), ClassCategory::StructuredRecord);
        assert_eq!(classify_bases(&["EnumProtocolMixin"]), ClassCategory::Enumeration);
    }

    #[test]
    fn test_members_are_partitioned() {
        let decl = ClassDecl {
            name: "Options".to_string(),
            line: 1,
            decorators: vec![Expr::new(ExprKind::Attribute, "dataclasses.dataclass")],
            bases: vec![Expr::new(ExprKind::Name, "Base")],
            body: vec![
                Declaration::AnnAssign(AnnAssignDecl {
                    target: Target::Name("timeout".to_string()),
                    annotation: Expr::new(ExprKind::Name, "float"),
                    value: Some(Expr::new(ExprKind::Other, "1.0")),
                    line: 2,
                }),
                Declaration::AnnAssign(AnnAssignDecl {
                    target: Target::Name("_secret".to_string()),
                    annotation: Expr::new(ExprKind::Name, "str"),
                    value: None,
                    line: 3,
                }),
                Declaration::Assign(AssignDecl {
                    targets: vec![Target::Name("RED".to_string()), Target::Name("CRIMSON".to_string())],
                    value: Expr::new(ExprKind::Other, "1"),
                    line: 4,
                }),
                Declaration::Function(FunctionDecl {
                    name: "run".to_string(),
                    line: 5,
                    decorators: vec![],
                    arguments: Arguments::default(),
                    returns: None,
                }),
                Declaration::Function(FunctionDecl {
                    name: "__init__".to_string(),
                    line: 6,
                    decorators: vec![],
                    arguments: Arguments::default(),
                    returns: None,
                }),
            ],
        };

        let symbol = class_symbol(&decl);
        assert_eq!(symbol.category, ClassCategory::Class);
        assert_eq!(symbol.bases, vec!["Base"]);
        assert_eq!(symbol.decorators, vec!["dataclasses.dataclass"]);
        assert_eq!(symbol.members.class_vars.len(), 1);
        assert_eq!(symbol.members.class_vars[0].name, "timeout");
        assert_eq!(symbol.members.class_vars[0].type_text.as_deref(), Some("float"));
        let attributes: Vec<&str> = symbol.members.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(attributes, vec!["RED", "CRIMSON"]);
        let methods: Vec<&str> = symbol.members.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(methods, vec!["run"]);
    }
}
