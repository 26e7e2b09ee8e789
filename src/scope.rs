//! @ai:module:intent Collect the declarations of one module or class body
//! @ai:module:layer application
//! @ai:module:public_api Scope, Assignment
//! @ai:module:depends_on syntax, functions
//! @ai:module:stateless true

use crate::functions::OverloadGroups;
use crate::syntax::{walk, AnnAssignDecl, AssignDecl, ClassDecl, Declaration, DeclarationVisitor, FunctionDecl};

/// @ai:intent An annotated or plain assignment, in source order
#[derive(Debug, Clone, Copy)]
pub enum Assignment<'t> {
    Annotated(&'t AnnAssignDecl),
    Plain(&'t AssignDecl),
}

/// @ai:intent Declarations of one body, bucketed by kind
#[derive(Debug, Default)]
pub struct Scope<'t> {
    pub functions: OverloadGroups<'t>,
    pub classes: Vec<&'t ClassDecl>,
    pub assignments: Vec<Assignment<'t>>,
}

impl<'t> Scope<'t> {
    /// @ai:intent Walk a body once and bucket its declarations
    /// @ai:effects pure
    pub fn collect(body: &'t [Declaration]) -> Self {
        let mut scope = Scope::default();
        walk(body, &mut scope);
        scope
    }
}

impl<'t> DeclarationVisitor<'t> for Scope<'t> {
    fn visit_function(&mut self, decl: &'t FunctionDecl) {
        self.functions.push(decl);
    }

    fn visit_class(&mut self, decl: &'t ClassDecl) {
        self.classes.push(decl);
    }

    fn visit_ann_assign(&mut self, decl: &'t AnnAssignDecl) {
        self.assignments.push(Assignment::Annotated(decl));
    }

    fn visit_assign(&mut self, decl: &'t AssignDecl) {
        self.assignments.push(Assignment::Plain(decl));
    }
}
