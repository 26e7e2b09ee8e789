//! @ai:module:intent Turn function declarations into parameter lists and overload sets
//! @ai:module:layer application
//! @ai:module:public_api OverloadGroups, function_symbol, overload_signature
//! @ai:module:depends_on syntax, symbol
//! @ai:module:stateless true

use crate::symbol::{is_public, FunctionSymbol, OverloadSignature, ParameterKind, ParameterSymbol};
use crate::syntax::{Arguments, Expr, FunctionDecl, Param};
use std::collections::HashMap;

/// @ai:intent Same-named function declarations of one scope, in first-seen order
#[derive(Debug, Default)]
pub struct OverloadGroups<'t> {
    groups: Vec<(&'t str, Vec<&'t FunctionDecl>)>,
    index: HashMap<&'t str, usize>,
}

impl<'t> OverloadGroups<'t> {
    /// @ai:intent Add a declaration to the group of its name
    /// @ai:post groups keep the position of the first declaration of each name
    pub fn push(&mut self, decl: &'t FunctionDecl) {
        let name = decl.name.as_str();
        match self.index.get(name) {
            Some(&idx) => self.groups[idx].1.push(decl),
            None => {
                self.index.insert(name, self.groups.len());
                self.groups.push((name, vec![decl]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// @ai:intent Build one symbol per public name
    /// @ai:effects pure
    pub fn public_symbols(&self) -> Vec<FunctionSymbol> {
        self.groups
            .iter()
            .filter(|(name, _)| is_public(name))
            .filter_map(|(_, decls)| function_symbol(decls))
            .collect()
    }
}

/// @ai:intent Merge same-named declarations into one function symbol
/// @ai:pre every declaration shares one name and one scope
/// @ai:post overloads.len() == decls.len(), in the given order
/// @ai:effects pure
pub fn function_symbol(decls: &[&FunctionDecl]) -> Option<FunctionSymbol> {
    let first = decls.first()?;
    let overloads: Vec<OverloadSignature> = decls.iter().map(|d| overload_signature(d)).collect();
    let decorators = overloads
        .iter()
        .flat_map(|o| o.decorators.iter().cloned())
        .collect();

    Some(FunctionSymbol {
        name: first.name.clone(),
        decorators,
        overloads,
    })
}

/// @ai:intent Describe a single declaration's call signature
/// @ai:effects pure
pub fn overload_signature(decl: &FunctionDecl) -> OverloadSignature {
    OverloadSignature {
        params: parameters(&decl.arguments),
        return_text: text(decl.returns.as_ref()),
        decorators: decl
            .decorators
            .iter()
            .map(|d| d.text.clone())
            .filter(|t| !t.is_empty())
            .collect(),
    }
}

/// Parameters in section order. Positional defaults are aligned with the
/// tail of the positional parameters; keyword-only defaults are per name.
fn parameters(args: &Arguments) -> Vec<ParameterSymbol> {
    let positional = args.posonly.len() + args.args.len();
    let first_default = positional.saturating_sub(args.defaults.len());
    let positional_default = |idx: usize| {
        idx.checked_sub(first_default)
            .and_then(|d| args.defaults.get(d))
    };

    let mut params = Vec::with_capacity(
        positional + args.kwonly.len() + 2,
    );

    for (idx, param) in args.posonly.iter().enumerate() {
        params.push(entry(param, ParameterKind::PositionalOnly, positional_default(idx)));
    }
    for (idx, param) in args.args.iter().enumerate() {
        params.push(entry(
            param,
            ParameterKind::PositionalOrKeyword,
            positional_default(args.posonly.len() + idx),
        ));
    }
    if let Some(vararg) = &args.vararg {
        params.push(entry(vararg, ParameterKind::VarPositional, None));
    }
    for (idx, param) in args.kwonly.iter().enumerate() {
        let default = args.kw_defaults.get(idx).and_then(Option::as_ref);
        params.push(entry(param, ParameterKind::KeywordOnly, default));
    }
    if let Some(kwarg) = &args.kwarg {
        params.push(entry(kwarg, ParameterKind::VarKeyword, None));
    }

    params
}

fn entry(param: &Param, kind: ParameterKind, default: Option<&Expr>) -> ParameterSymbol {
    ParameterSymbol {
        name: param.name.clone(),
        kind,
        type_text: text(param.annotation.as_ref()),
        default_text: text(default),
    }
}

fn text(expr: Option<&Expr>) -> Option<String> {
    expr.map(|e| e.text.clone())
}
