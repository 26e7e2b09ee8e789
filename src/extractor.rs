//! @ai:module:intent Build module summaries from stub files
//! @ai:module:layer application
//! @ai:module:public_api summarize_module, ModuleExtractor
//! @ai:module:depends_on repair, parser, scope, functions, classes, assignments, layout, error
//! @ai:module:stateless false

use crate::assignments::module_assignments;
use crate::classes::class_symbol;
use crate::error::{Error, Result};
use crate::layout::{module_name_from_path, relative_path_text};
use crate::parser::StubParser;
use crate::repair::RepairPass;
use crate::scope::Scope;
use crate::symbol::{is_public, ModuleSummary};
use crate::syntax::ModuleTree;
use std::path::Path;

/// @ai:intent Summarize the public surface of a parsed module
/// @ai:effects pure
pub fn summarize_module(tree: &ModuleTree, name: String, relative_path: String) -> ModuleSummary {
    let scope = Scope::collect(&tree.body);
    let (variables, type_aliases) = module_assignments(&scope.assignments);

    let mut summary = ModuleSummary {
        docstring: tree.docstring.clone(),
        functions: scope.functions.public_symbols(),
        variables,
        type_aliases,
        ..ModuleSummary::new(name, relative_path)
    };

    for class in scope.classes.iter().filter(|c| is_public(&c.name)) {
        summary.push_class(class_symbol(class));
    }

    summary
}

/// @ai:intent Repair, parse and summarize stub files
///
/// Holds the parser between files; each file is read whole and released
/// before the next one is opened.
pub struct ModuleExtractor {
    parser: StubParser,
    repair: RepairPass,
}

impl ModuleExtractor {
    /// @ai:intent Create an extractor with the given repair pass
    pub fn new(repair: RepairPass) -> Result<Self> {
        Ok(Self {
            parser: StubParser::new()?,
            repair,
        })
    }

    /// @ai:intent Summarize stub source that is already in memory
    /// @ai:post Err(Parse) when the repaired text is not well-formed
    /// @ai:effects pure
    pub fn extract_source(
        &mut self,
        source: &str,
        file: &Path,
        name: String,
        relative_path: String,
    ) -> Result<ModuleSummary> {
        let repaired = self.repair.repair(source);
        let tree = self.parser.parse(&repaired, file)?;
        Ok(summarize_module(&tree, name, relative_path))
    }

    /// @ai:intent Summarize one stub file below a module root
    /// @ai:pre relative is the path of file relative to the root of root_module
    /// @ai:effects fs:read
    pub fn extract_file(
        &mut self,
        root_module: &str,
        file: &Path,
        relative: &Path,
    ) -> Result<ModuleSummary> {
        let source = std::fs::read_to_string(file).map_err(|e| Error::FileRead {
            path: file.to_path_buf(),
            source: e,
        })?;

        self.extract_source(
            &source,
            file,
            module_name_from_path(root_module, relative),
            relative_path_text(relative),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::DEFAULT_REPAIR_KEYWORDS;
    use crate::symbol::ParameterKind;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const READER_STUB: &str = r#""""Document readers."""
from typing import overload, Protocol, TypedDict
from enum import Enum

__all__ = ["Reader", "open_doc"]
__version__: str
_internal: int
DEFAULT_ENCODING: str = "utf-8"
PathLike = str | bytes
Mapping = dict[str, int]
Loader = io.Loader
MAX_PAGES = 100

class Format(str, Enum):
    PDF = "pdf"
    DOCX = "docx"

class Options(TypedDict, total=False):
    strict: bool

class SupportsRead(Protocol):
    def read(self, n: int = -1) -> bytes: ...

class Reader:
    encoding: str
    mode = "r"
    def __init__(self, path: str) -> None: ...
    @overload
    def read(self) -> str: ...
    @overload
    def read(self, n: int) -> str: ...
    def _reset(self) -> None: ...

class _Hidden: ...

@overload
def open_doc(path: str) -> Reader: ...
@overload
def open_doc(path: str, *, fmt: Format = ..., **kwargs: object) -> Reader: ...
def _helper() -> None: ...
"#;

    fn extractor() -> ModuleExtractor {
        ModuleExtractor::new(RepairPass::new(DEFAULT_REPAIR_KEYWORDS).unwrap()).unwrap()
    }

    fn summarize(source: &str) -> ModuleSummary {
        extractor()
            .extract_source(source, Path::new("docs/__init__.pyi"), "docs".to_string(), "__init__.pyi".to_string())
            .unwrap()
    }

    #[test]
    fn test_summary_sections() {
        let summary = summarize(READER_STUB);

        assert_eq!(summary.name, "docs");
        assert_eq!(summary.docstring.as_deref(), Some("Document readers."));

        let names = |items: &[crate::symbol::ClassSymbol]| {
            items.iter().map(|c| c.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&summary.classes), vec!["Reader"]);
        assert_eq!(names(&summary.enums), vec!["Format"]);
        assert_eq!(names(&summary.typed_dicts), vec!["Options"]);
        assert_eq!(names(&summary.protocols), vec!["SupportsRead"]);

        let variables: Vec<&str> = summary.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(variables, vec!["__all__", "__version__", "DEFAULT_ENCODING", "PathLike", "MAX_PAGES"]);

        let aliases: Vec<(&str, &str)> = summary
            .type_aliases
            .iter()
            .map(|a| (a.name.as_str(), a.target_text.as_str()))
            .collect();
        assert_eq!(aliases, vec![("Mapping", "dict[str, int]"), ("Loader", "io.Loader")]);
    }

    #[test]
    fn test_functions_and_methods() {
        let summary = summarize(READER_STUB);

        assert_eq!(summary.functions.len(), 1);
        let open_doc = &summary.functions[0];
        assert_eq!(open_doc.name, "open_doc");
        assert_eq!(open_doc.overloads.len(), 2);
        assert_eq!(open_doc.decorators, vec!["overload", "overload"]);

        let second = &open_doc.overloads[1];
        let kinds: Vec<ParameterKind> = second.params.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![ParameterKind::PositionalOrKeyword, ParameterKind::KeywordOnly, ParameterKind::VarKeyword]
        );
        assert_eq!(second.params[1].default_text.as_deref(), Some("..."));
        assert_eq!(second.params[2].type_text.as_deref(), Some("object"));
        assert_eq!(second.return_text.as_deref(), Some("Reader"));

        let reader = &summary.classes[0];
        let methods: Vec<(&str, usize)> = reader
            .members
            .methods
            .iter()
            .map(|m| (m.name.as_str(), m.overloads.len()))
            .collect();
        assert_eq!(methods, vec![("read", 2)]);
        assert_eq!(reader.members.class_vars[0].name, "encoding");
        assert_eq!(reader.members.attributes[0].value_text.as_deref(), Some("\"r\""));
    }

    #[test]
    fn test_repaired_source_is_accepted() {
        let summary = summarize(
            "@deprecated(deprecated_args='old', 'legacy', since='1.0')\ndef convert(x: int) -> str: ...\n",
        );
        assert_eq!(
            summary.functions[0].decorators,
            vec!["deprecated(deprecated_args=('old', 'legacy'), since='1.0')"]
        );
    }

    #[test]
    fn test_extract_file_derives_name_and_path() {
        let mut file = NamedTempFile::with_suffix(".pyi").unwrap();
        writeln!(file, "def ping() -> bool: ...").unwrap();

        let summary = extractor()
            .extract_file("net", file.path(), Path::new("sub/ping.pyi"))
            .unwrap();
        assert_eq!(summary.name, "net.sub.ping");
        assert_eq!(summary.relative_path, "sub/ping.pyi");
        assert_eq!(summary.functions[0].name, "ping");
    }

    #[test]
    fn test_unreadable_file_is_a_read_error() {
        let err = extractor()
            .extract_file("net", Path::new("/nonexistent/stub.pyi"), Path::new("stub.pyi"))
            .unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
