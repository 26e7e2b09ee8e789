//! @ai:module:intent Parse stub source text into a declaration tree
//! @ai:module:layer application
//! @ai:module:public_api StubParser
//! @ai:module:depends_on syntax, error
//!
//! tree-sitter accepts some inputs CPython rejects (keyword arguments followed
//! by positional ones, defaulted parameters followed by plain ones). Those are
//! reported as parse errors here so that a stub either converts fully or not
//! at all.

use crate::error::{Error, Result};
use crate::syntax::{
    AnnAssignDecl, Arguments, AssignDecl, ClassDecl, Declaration, Expr, ExprKind, FunctionDecl,
    ModuleTree, Param, Target,
};
use rustpython_parser::{ast, Mode};
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;
use tree_sitter::{Node, Parser};

/// @ai:intent Reusable parser for `.pyi` source
pub struct StubParser {
    parser: Parser,
}

/// A grammar-level problem found while converting the syntax tree.
#[derive(Debug)]
struct SyntaxIssue {
    line: usize,
    message: String,
}

impl SyntaxIssue {
    fn at(node: Node, message: impl Into<String>) -> Self {
        Self {
            line: node.start_position().row + 1,
            message: message.into(),
        }
    }
}

type Convert<T> = std::result::Result<T, SyntaxIssue>;

impl StubParser {
    /// @ai:intent Create a parser loaded with the Python grammar
    /// @ai:effects pure
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| Error::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    /// @ai:intent Parse repaired stub text into a module tree
    /// @ai:pre source has already been through the repair pass
    /// @ai:post Err(Parse) names `file` when the text is not well-formed
    /// @ai:effects pure
    pub fn parse(&mut self, source: &str, file: &Path) -> Result<ModuleTree> {
        let parse_error = |issue: SyntaxIssue| Error::Parse {
            file: file.to_path_buf(),
            line: issue.line,
            message: issue.message,
        };

        let tree = self.parser.parse(source, None).ok_or_else(|| Error::Parse {
            file: file.to_path_buf(),
            line: 0,
            message: "parser produced no syntax tree".to_string(),
        })?;
        let root = tree.root_node();

        if root.has_error() {
            let node = first_error(root).unwrap_or(root);
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            return Err(parse_error(SyntaxIssue::at(node, message)));
        }
        check_call_arguments(root).map_err(parse_error)?;

        let converter = Converter {
            source: source.as_bytes(),
        };
        converter.module(root).map_err(parse_error)
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error);
    found
}

/// Enforce CPython's ordering rules for call and class arguments.
fn check_call_arguments(root: Node) -> Convert<()> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.kind() == "argument_list" {
            check_argument_order(node)?;
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Ok(());
            }
        }
    }
}

fn check_argument_order(list: Node) -> Convert<()> {
    let mut seen_keyword = false;
    let mut seen_dict_splat = false;
    let mut cursor = list.walk();

    for arg in list.named_children(&mut cursor) {
        match arg.kind() {
            "comment" => {}
            "keyword_argument" => seen_keyword = true,
            "dictionary_splat" => {
                seen_keyword = true;
                seen_dict_splat = true;
            }
            "list_splat" => {
                if seen_dict_splat {
                    return Err(SyntaxIssue::at(
                        arg,
                        "iterable argument unpacking follows keyword argument unpacking",
                    ));
                }
            }
            _ if seen_dict_splat => {
                return Err(SyntaxIssue::at(
                    arg,
                    "positional argument follows keyword argument unpacking",
                ));
            }
            _ if seen_keyword => {
                return Err(SyntaxIssue::at(
                    arg,
                    "positional argument follows keyword argument",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Converts tree-sitter nodes of one source buffer into declarations.
struct Converter<'s> {
    source: &'s [u8],
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Positional,
    KeywordOnly,
}

impl<'s> Converter<'s> {
    fn text(&self, node: Node) -> &'s str {
        std::str::from_utf8(&self.source[node.start_byte()..node.end_byte()]).unwrap_or("")
    }

    fn module(&self, root: Node) -> Convert<ModuleTree> {
        Ok(ModuleTree {
            docstring: self.docstring(root),
            body: self.block(root)?,
        })
    }

    /// The first statement, if it is a bare string literal.
    fn docstring(&self, root: Node) -> Option<String> {
        let mut cursor = root.walk();
        let first = root
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment")?;
        if first.kind() != "expression_statement" || first.named_child_count() != 1 {
            return None;
        }
        let expr = first.named_child(0)?;
        match expr.kind() {
            "string" | "concatenated_string" => {
                string_constant(self.text(expr)).map(|s| clean_docstring(&s))
            }
            _ => None,
        }
    }

    fn block(&self, node: Node) -> Convert<Vec<Declaration>> {
        let mut cursor = node.walk();
        let mut body = Vec::new();
        for stmt in node.named_children(&mut cursor) {
            if stmt.kind() == "comment" {
                continue;
            }
            body.push(self.statement(stmt)?);
        }
        Ok(body)
    }

    fn statement(&self, node: Node) -> Convert<Declaration> {
        match node.kind() {
            "function_definition" => Ok(Declaration::Function(self.function(node, Vec::new())?)),
            "class_definition" => Ok(Declaration::Class(self.class(node, Vec::new())?)),
            "decorated_definition" => self.decorated(node),
            "expression_statement" => match node.named_child(0) {
                Some(child) if child.kind() == "assignment" && node.named_child_count() == 1 => {
                    Ok(self.assignment(child))
                }
                _ => Ok(Declaration::Other),
            },
            _ => Ok(Declaration::Other),
        }
    }

    fn decorated(&self, node: Node) -> Convert<Declaration> {
        let mut cursor = node.walk();
        let decorators: Vec<Expr> = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "decorator")
            .filter_map(|n| self.first_expression(n))
            .collect();

        let definition = node
            .child_by_field_name("definition")
            .ok_or_else(|| SyntaxIssue::at(node, "decorator without a definition"))?;
        match definition.kind() {
            "function_definition" => Ok(Declaration::Function(
                self.function(definition, decorators)?,
            )),
            "class_definition" => Ok(Declaration::Class(self.class(definition, decorators)?)),
            _ => Ok(Declaration::Other),
        }
    }

    fn function(&self, node: Node, decorators: Vec<Expr>) -> Convert<FunctionDecl> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .ok_or_else(|| SyntaxIssue::at(node, "function without a name"))?;
        let arguments = match node.child_by_field_name("parameters") {
            Some(params) => self.parameters(params)?,
            None => Arguments::default(),
        };
        let returns = node
            .child_by_field_name("return_type")
            .map(|n| self.expr(n));

        Ok(FunctionDecl {
            name,
            line: node.start_position().row + 1,
            decorators,
            arguments,
            returns,
        })
    }

    fn parameters(&self, node: Node) -> Convert<Arguments> {
        let mut args = Arguments::default();
        let mut section = Section::Positional;
        let mut seen_default = false;
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            if !child.is_named() && !matches!(child.kind(), "*" | "/") {
                continue;
            }
            let (param, default) = match child.kind() {
                "comment" => continue,
                "positional_separator" | "/" => {
                    if section == Section::KeywordOnly || !args.posonly.is_empty() {
                        return Err(SyntaxIssue::at(child, "misplaced `/` in parameter list"));
                    }
                    args.posonly.append(&mut args.args);
                    continue;
                }
                "keyword_separator" | "*" => {
                    if section == Section::KeywordOnly {
                        return Err(SyntaxIssue::at(child, "`*` may appear only once"));
                    }
                    section = Section::KeywordOnly;
                    continue;
                }
                "list_splat_pattern" => {
                    if section == Section::KeywordOnly {
                        return Err(SyntaxIssue::at(child, "`*args` may appear only once"));
                    }
                    args.vararg = Some(Param {
                        name: self.splat_name(child),
                        annotation: None,
                    });
                    section = Section::KeywordOnly;
                    continue;
                }
                "dictionary_splat_pattern" => {
                    args.kwarg = Some(Param {
                        name: self.splat_name(child),
                        annotation: None,
                    });
                    continue;
                }
                "typed_parameter" => {
                    let annotation = child.child_by_field_name("type").map(|n| self.expr(n));
                    let Some(inner) = child.named_child(0) else {
                        continue;
                    };
                    match inner.kind() {
                        "list_splat_pattern" => {
                            if section == Section::KeywordOnly {
                                return Err(SyntaxIssue::at(child, "`*args` may appear only once"));
                            }
                            args.vararg = Some(Param {
                                name: self.splat_name(inner),
                                annotation,
                            });
                            section = Section::KeywordOnly;
                            continue;
                        }
                        "dictionary_splat_pattern" => {
                            args.kwarg = Some(Param {
                                name: self.splat_name(inner),
                                annotation,
                            });
                            continue;
                        }
                        _ => (
                            Param {
                                name: self.text(inner).to_string(),
                                annotation,
                            },
                            None,
                        ),
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default();
                    let annotation = child.child_by_field_name("type").map(|n| self.expr(n));
                    let value = child.child_by_field_name("value").map(|n| self.expr(n));
                    (Param { name, annotation }, value)
                }
                _ => (
                    Param {
                        name: self.text(child).to_string(),
                        annotation: None,
                    },
                    None,
                ),
            };

            if args.kwarg.is_some() {
                return Err(SyntaxIssue::at(child, "parameter follows `**kwargs`"));
            }

            match section {
                Section::Positional => {
                    match default {
                        Some(value) => {
                            seen_default = true;
                            args.defaults.push(value);
                        }
                        None if seen_default => {
                            return Err(SyntaxIssue::at(
                                child,
                                "parameter without a default follows parameter with a default",
                            ));
                        }
                        None => {}
                    }
                    args.args.push(param);
                }
                Section::KeywordOnly => {
                    args.kwonly.push(param);
                    args.kw_defaults.push(default);
                }
            }
        }

        Ok(args)
    }

    fn splat_name(&self, node: Node) -> String {
        node.named_child(0)
            .map(|n| self.text(n).to_string())
            .unwrap_or_default()
    }

    fn class(&self, node: Node, decorators: Vec<Expr>) -> Convert<ClassDecl> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .ok_or_else(|| SyntaxIssue::at(node, "class without a name"))?;

        let mut bases = Vec::new();
        if let Some(list) = node.child_by_field_name("superclasses") {
            let mut cursor = list.walk();
            for arg in list.named_children(&mut cursor) {
                if !matches!(arg.kind(), "keyword_argument" | "dictionary_splat" | "comment") {
                    bases.push(self.expr(arg));
                }
            }
        }

        let body = match node.child_by_field_name("body") {
            Some(block) => self.block(block)?,
            None => Vec::new(),
        };

        Ok(ClassDecl {
            name,
            line: node.start_position().row + 1,
            decorators,
            bases,
            body,
        })
    }

    fn assignment(&self, node: Node) -> Declaration {
        let line = node.start_position().row + 1;
        let Some(left) = node.child_by_field_name("left") else {
            return Declaration::Other;
        };

        if let Some(annotation) = node.child_by_field_name("type") {
            return Declaration::AnnAssign(AnnAssignDecl {
                target: self.target(left),
                annotation: self.expr(annotation),
                value: node.child_by_field_name("right").map(|n| self.expr(n)),
                line,
            });
        }

        let mut targets = vec![self.target(left)];
        let mut right = node.child_by_field_name("right");
        while let Some(value) = right.filter(|n| n.kind() == "assignment") {
            if value.child_by_field_name("type").is_some() {
                return Declaration::Other;
            }
            if let Some(next) = value.child_by_field_name("left") {
                targets.push(self.target(next));
            }
            right = value.child_by_field_name("right");
        }

        match right {
            Some(value) if value.kind() != "augmented_assignment" => {
                Declaration::Assign(AssignDecl {
                    targets,
                    value: self.expr(value),
                    line,
                })
            }
            _ => Declaration::Other,
        }
    }

    fn target(&self, node: Node) -> Target {
        match node.kind() {
            "identifier" | "keyword_identifier" => Target::Name(self.text(node).to_string()),
            _ => Target::Complex(render(self.text(node))),
        }
    }

    fn first_expression(&self, node: Node) -> Option<Expr> {
        let mut cursor = node.walk();
        let expr = node
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment")
            .map(|n| self.expr(n));
        expr
    }

    fn expr(&self, node: Node) -> Expr {
        Expr::new(expr_kind(node), render(self.text(node)))
    }
}

/// Shape of an expression, looking through `type` wrappers and parentheses.
fn expr_kind(node: Node) -> ExprKind {
    match node.kind() {
        "identifier" | "keyword_identifier" => ExprKind::Name,
        "attribute" | "member_type" => ExprKind::Attribute,
        "subscript" | "generic_type" => ExprKind::Subscript,
        "call" => ExprKind::Call,
        "string" | "concatenated_string" => ExprKind::Str,
        "type" | "parenthesized_expression" => {
            let mut cursor = node.walk();
            let inner: Vec<Node> = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .collect();
            match inner.as_slice() {
                [only] => expr_kind(*only),
                _ => ExprKind::Other,
            }
        }
        _ => ExprKind::Other,
    }
}

/// @ai:intent Render expression source as single-line text
/// @ai:example ("Dict[\n    str,\n    int,\n]") -> "Dict[str, int,]"
/// @ai:effects pure
fn render(text: &str) -> String {
    let text = text.trim();
    if !text.contains('\n') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    // Open quote character, and whether it was tripled.
    let mut quote: Option<(char, bool)> = None;
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if let Some((q, triple)) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q && (!triple || take_repeat(&mut chars, q, &mut out)) {
                quote = None;
            }
            continue;
        }

        match c {
            '#' => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
                pending_space = true;
            }
            c if c.is_whitespace() || c == '\\' => pending_space = true,
            _ => {
                let after_open = matches!(out.chars().last(), Some('(' | '[' | '{') | None);
                let before_close = matches!(c, ')' | ']' | '}' | ',');
                if pending_space && !after_open && !before_close {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
                if c == '\'' || c == '"' {
                    let triple = take_repeat(&mut chars, c, &mut out);
                    quote = Some((c, triple));
                }
            }
        }
    }

    out
}

/// Consumes two more `q` characters into `out` when they come next.
fn take_repeat(chars: &mut Peekable<Chars<'_>>, q: char, out: &mut String) -> bool {
    let mut ahead = chars.clone();
    if ahead.next() != Some(q) || ahead.next() != Some(q) {
        return false;
    }
    chars.next();
    chars.next();
    out.push(q);
    out.push(q);
    true
}

/// Decoded value of a str literal token, `None` for bytes and f-strings.
fn string_constant(token: &str) -> Option<String> {
    match rustpython_parser::parse(token, Mode::Expression, "<docstring>").ok()? {
        ast::Mod::Expression(ast::ModExpression { body, .. }) => match *body {
            ast::Expr::Constant(ast::ExprConstant {
                value: ast::Constant::Str(value),
                ..
            }) => Some(value),
            _ => None,
        },
        _ => None,
    }
}

/// Count of leading whitespace characters, not bytes.
fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// @ai:intent Normalize docstring indentation the way `inspect.cleandoc` does
/// @ai:effects pure
fn clean_docstring(doc: &str) -> String {
    let expanded = doc.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_whitespace(l))
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                line.trim_start().to_string()
            } else {
                line.chars().skip(margin).collect::<String>().trim_end().to_string()
            }
        })
        .collect();

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }
    cleaned.join("\n")
}
