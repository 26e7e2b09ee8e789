//! @ai:module:intent Declaration tree produced by the stub parser
//! @ai:module:layer domain
//! @ai:module:public_api ModuleTree, Declaration, FunctionDecl, Arguments, Param, ClassDecl, AnnAssignDecl, AssignDecl, Target, Expr, ExprKind, DeclarationVisitor, walk
//! @ai:module:stateless true
//!
//! The tree keeps only what the catalog needs. Expressions are carried as
//! their rendered text plus a coarse shape tag; nothing is evaluated.

/// @ai:intent Coarse shape of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Name,
    Attribute,
    Subscript,
    Call,
    Str,
    Other,
}

/// @ai:intent A rendered expression and its shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub text: String,
}

impl Expr {
    pub fn new(kind: ExprKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// @ai:intent Check for the shapes that name a type rather than a value
    pub fn is_type_reference(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Name | ExprKind::Attribute | ExprKind::Subscript
        )
    }
}

/// @ai:intent A named parameter with an optional annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<Expr>,
}

/// @ai:intent Parameter sections of a signature, laid out like Python's `ast.arguments`
///
/// `defaults` align with the tail of `posonly ++ args`. `kw_defaults` is
/// parallel to `kwonly`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arguments {
    pub posonly: Vec<Param>,
    pub args: Vec<Param>,
    pub vararg: Option<Param>,
    pub kwonly: Vec<Param>,
    pub kwarg: Option<Param>,
    pub defaults: Vec<Expr>,
    pub kw_defaults: Vec<Option<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub line: usize,
    pub decorators: Vec<Expr>,
    pub arguments: Arguments,
    pub returns: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub line: usize,
    pub decorators: Vec<Expr>,
    pub bases: Vec<Expr>,
    pub body: Vec<Declaration>,
}

/// @ai:intent Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Name(String),
    /// Tuple, list, attribute or subscript targets.
    Complex(String),
}

impl Target {
    pub fn name(&self) -> Option<&str> {
        match self {
            Target::Name(name) => Some(name),
            Target::Complex(_) => None,
        }
    }
}

/// `target: annotation [= value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnAssignDecl {
    pub target: Target,
    pub annotation: Expr,
    pub value: Option<Expr>,
    pub line: usize,
}

/// `t1 = t2 = ... = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignDecl {
    pub targets: Vec<Target>,
    pub value: Expr,
    pub line: usize,
}

/// @ai:intent One statement of a module or class body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Function(FunctionDecl),
    Class(ClassDecl),
    AnnAssign(AnnAssignDecl),
    Assign(AssignDecl),
    Other,
}

/// @ai:intent Parsed stub module
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleTree {
    pub docstring: Option<String>,
    pub body: Vec<Declaration>,
}

/// @ai:intent Callbacks for each declaration kind of one scope
///
/// Nested scopes are not entered automatically; a visitor that wants class
/// bodies calls [`walk`] on `ClassDecl::body` itself.
pub trait DeclarationVisitor<'t> {
    fn visit_function(&mut self, _decl: &'t FunctionDecl) {}
    fn visit_class(&mut self, _decl: &'t ClassDecl) {}
    fn visit_ann_assign(&mut self, _decl: &'t AnnAssignDecl) {}
    fn visit_assign(&mut self, _decl: &'t AssignDecl) {}
    fn visit_other(&mut self) {}
}

/// @ai:intent Dispatch every declaration of a body to the visitor in order
/// @ai:effects pure
pub fn walk<'t, V: DeclarationVisitor<'t> + ?Sized>(body: &'t [Declaration], visitor: &mut V) {
    for decl in body {
        match decl {
            Declaration::Function(f) => visitor.visit_function(f),
            Declaration::Class(c) => visitor.visit_class(c),
            Declaration::AnnAssign(a) => visitor.visit_ann_assign(a),
            Declaration::Assign(a) => visitor.visit_assign(a),
            Declaration::Other => visitor.visit_other(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tally {
        order: Vec<&'static str>,
    }

    impl<'t> DeclarationVisitor<'t> for Tally {
        fn visit_function(&mut self, _decl: &'t FunctionDecl) {
            self.order.push("function");
        }
        fn visit_class(&mut self, _decl: &'t ClassDecl) {
            self.order.push("class");
        }
        fn visit_assign(&mut self, _decl: &'t AssignDecl) {
            self.order.push("assign");
        }
    }

    #[test]
    fn test_walk_preserves_order_and_skips_defaults() {
        let body = vec![
            Declaration::Assign(AssignDecl {
                targets: vec![Target::Name("X".to_string())],
                value: Expr::new(ExprKind::Other, "1"),
                line: 1,
            }),
            Declaration::Other,
            Declaration::Function(FunctionDecl {
                name: "f".to_string(),
                line: 2,
                decorators: vec![],
                arguments: Arguments::default(),
                returns: None,
            }),
            Declaration::Class(ClassDecl {
                name: "C".to_string(),
                line: 3,
                decorators: vec![],
                bases: vec![],
                body: vec![],
            }),
        ];
        let mut tally = Tally::default();
        walk(&body, &mut tally);
        assert_eq!(tally.order, vec!["assign", "function", "class"]);
    }

    #[test]
    fn test_type_reference_shapes() {
        assert!(Expr::new(ExprKind::Subscript, "list[int]").is_type_reference());
        assert!(Expr::new(ExprKind::Attribute, "os.PathLike").is_type_reference());
        assert!(!Expr::new(ExprKind::Call, "TypeVar('T')").is_type_reference());
        assert!(!Expr::new(ExprKind::Str, "'x'").is_type_reference());
    }
}
