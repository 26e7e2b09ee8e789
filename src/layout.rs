//! @ai:module:intent Map stub files on disk to fully-qualified module names
//! @ai:module:layer domain
//! @ai:module:public_api DEFAULT_STUB_EXTENSIONS, is_stub_file, find_stub_files, module_name_from_path, relative_path_text
//! @ai:module:stateless true

use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as stub source when no configuration overrides them.
pub const DEFAULT_STUB_EXTENSIONS: &[&str] = &["pyi"];

const PACKAGE_INIT: &str = "__init__";

/// @ai:intent Check if a file has one of the stub extensions
/// @ai:example ("pkg/mod.pyi", ["pyi"]) -> true
/// @ai:example ("pkg/mod.py", ["pyi"]) -> false
/// @ai:effects pure
pub fn is_stub_file<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.iter().any(|allowed| allowed.as_ref() == ext))
        .unwrap_or(false)
}

/// @ai:intent Recursively list stub files under a module root in a stable order
/// @ai:post paths are sorted by file name at every directory level
/// @ai:effects fs:read
pub fn find_stub_files<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_stub_file(e.path(), extensions))
        .map(|e| e.into_path())
        .collect()
}

/// @ai:intent Derive a dotted module name from a path relative to the module root
/// @ai:example ("pkgmod", "sub/mod.pyi") -> "pkgmod.sub.mod"
/// @ai:example ("pkgmod", "sub/__init__.pyi") -> "pkgmod.sub"
/// @ai:example ("pkgmod", "__init__.pyi") -> "pkgmod"
/// @ai:effects pure
pub fn module_name_from_path(root_module: &str, relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if let Some(last) = parts.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(last);
        if stem != PACKAGE_INIT {
            parts.push(stem);
        }
    }

    std::iter::once(root_module.to_string())
        .chain(parts)
        .collect::<Vec<_>>()
        .join(".")
}

/// @ai:intent Render a relative path with `/` separators on every platform
/// @ai:effects pure
pub fn relative_path_text(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
