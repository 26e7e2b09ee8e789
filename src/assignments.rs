//! @ai:module:intent Split module-level assignments into variables and type aliases
//! @ai:module:layer application
//! @ai:module:public_api module_assignments, classify_assignment, AssignmentSymbol
//! @ai:module:depends_on scope, syntax, symbol
//! @ai:module:stateless true

use crate::scope::Assignment;
use crate::symbol::{is_public, TypeAliasSymbol, VariableSymbol};
use crate::syntax::{AnnAssignDecl, AssignDecl};

/// @ai:intent Outcome of classifying one module-level assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentSymbol {
    Variable(VariableSymbol),
    Alias(TypeAliasSymbol),
}

/// @ai:intent Collect public variables and aliases in declaration order
/// @ai:effects pure
pub fn module_assignments(
    assignments: &[Assignment<'_>],
) -> (Vec<VariableSymbol>, Vec<TypeAliasSymbol>) {
    let mut variables = Vec::new();
    let mut aliases = Vec::new();

    for symbol in assignments.iter().filter_map(|a| classify_assignment(*a)) {
        match symbol {
            AssignmentSymbol::Variable(v) => variables.push(v),
            AssignmentSymbol::Alias(a) => aliases.push(a),
        }
    }

    (variables, aliases)
}

/// @ai:intent Classify a single module-level assignment
/// @ai:post None for private names and for tuple or multi-target assignments
/// @ai:example (`Foo = Mapping[str, int]`) -> Alias
/// @ai:example (`Foo = 3`) -> Variable
/// @ai:effects pure
pub fn classify_assignment(assignment: Assignment<'_>) -> Option<AssignmentSymbol> {
    match assignment {
        Assignment::Annotated(decl) => annotated(decl),
        Assignment::Plain(decl) => plain(decl),
    }
}

fn annotated(decl: &AnnAssignDecl) -> Option<AssignmentSymbol> {
    let name = decl.target.name().filter(|n| is_public(n))?;
    Some(AssignmentSymbol::Variable(VariableSymbol {
        name: name.to_string(),
        type_text: Some(decl.annotation.text.clone()),
        value_text: decl.value.as_ref().map(|v| v.text.clone()),
    }))
}

fn plain(decl: &AssignDecl) -> Option<AssignmentSymbol> {
    let [target] = decl.targets.as_slice() else {
        return None;
    };
    let name = target.name().filter(|n| is_public(n))?.to_string();

    if decl.value.is_type_reference() {
        Some(AssignmentSymbol::Alias(TypeAliasSymbol {
            name,
            target_text: decl.value.text.clone(),
        }))
    } else {
        Some(AssignmentSymbol::Variable(VariableSymbol {
            name,
            type_text: None,
            value_text: Some(decl.value.text.clone()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Expr, ExprKind, Target};
    use pretty_assertions::assert_eq;

    fn assign(targets: &[&str], kind: ExprKind, value: &str) -> AssignDecl {
        AssignDecl {
            targets: targets.iter().map(|t| Target::Name(t.to_string())).collect(),
            value: Expr::new(kind, value),
            line: 1,
        }
    }

    #[test]
    fn test_subscript_becomes_alias() {
        let decl = assign(&["Foo"], ExprKind::Subscript, "SomeGeneric[int, str]");
        assert_eq!(
            classify_assignment(Assignment::Plain(&decl)),
            Some(AssignmentSymbol::Alias(TypeAliasSymbol {
                name: "Foo".to_string(),
                target_text: "SomeGeneric[int, str]".to_string(),
            }))
        );
    }

    #[test]
    fn test_literal_becomes_variable() {
        let decl = assign(&["Foo"], ExprKind::Other, "3");
        assert_eq!(
            classify_assignment(Assignment::Plain(&decl)),
            Some(AssignmentSymbol::Variable(VariableSymbol {
                name: "Foo".to_string(),
                type_text: None,
                value_text: Some("3".to_string()),
            }))
        );
    }

    #[test]
    fn test_name_and_attribute_become_aliases() {
        let name = assign(&["PathType"], ExprKind::Name, "str");
        let attr = assign(&["Pattern"], ExprKind::Attribute, "re.Pattern");
        let call = assign(&["T"], ExprKind::Call, "TypeVar('T')");

        assert!(matches!(classify_assignment(Assignment::Plain(&name)), Some(AssignmentSymbol::Alias(_))));
        assert!(matches!(classify_assignment(Assignment::Plain(&attr)), Some(AssignmentSymbol::Alias(_))));
        assert!(matches!(classify_assignment(Assignment::Plain(&call)), Some(AssignmentSymbol::Variable(_))));
    }

    #[test]
    fn test_multi_target_and_tuple_assignments_are_ignored() {
        let chained = assign(&["A", "B"], ExprKind::Name, "int");
        let tuple = AssignDecl {
            targets: vec![Target::Complex("x, y".to_string())],
            value: Expr::new(ExprKind::Other, "1, 2"),
            line: 1,
        };
        assert_eq!(classify_assignment(Assignment::Plain(&chained)), None);
        assert_eq!(classify_assignment(Assignment::Plain(&tuple)), None);
    }

    #[test]
    fn test_annotated_assignment_is_always_a_variable() {
        let decl = AnnAssignDecl {
            target: Target::Name("Alias".to_string()),
            annotation: Expr::new(ExprKind::Name, "TypeAlias"),
            value: Some(Expr::new(ExprKind::Subscript, "list[int]")),
            line: 1,
        };
        assert_eq!(
            classify_assignment(Assignment::Annotated(&decl)),
            Some(AssignmentSymbol::Variable(VariableSymbol {
                name: "Alias".to_string(),
                type_text: Some("TypeAlias".to_string()),
                value_text: Some("list[int]".to_string()),
            }))
        );
    }

    #[test]
    fn test_private_names_are_skipped_but_metadata_dunders_kept() {
        let private = assign(&["_cache"], ExprKind::Other, "{}");
        let all = assign(&["__all__"], ExprKind::Other, "['a']");
        let version = AnnAssignDecl {
            target: Target::Name("__version__".to_string()),
            annotation: Expr::new(ExprKind::Name, "str"),
            value: None,
            line: 2,
        };

        let (variables, aliases) = module_assignments(&[
            Assignment::Plain(&private),
            Assignment::Plain(&all),
            Assignment::Annotated(&version),
        ]);
        let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["__all__", "__version__"]);
        assert!(aliases.is_empty());
    }
}
