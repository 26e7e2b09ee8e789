//! @ai:module:intent Rewrite known-malformed stub fragments into parseable source
//! @ai:module:layer application
//! @ai:module:public_api RepairPass, DEFAULT_REPAIR_KEYWORDS
//! @ai:module:depends_on error
//! @ai:module:stateless true
//!
//! Stub generators occasionally emit a keyword argument whose value is a bare
//! run of string literals:
//!
//! ```text
//! @deprecated(deprecated_args='a', 'b', 'c', since='2.0')
//! ```
//!
//! which is not valid Python. The repair binds the whole run to the keyword as
//! a tuple (`deprecated_args=('a', 'b', 'c')`). Nothing else is touched.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::path::PathBuf;

/// Keyword names repaired when no configuration overrides them.
pub const DEFAULT_REPAIR_KEYWORDS: &[&str] = &["deprecated_args"];

/// @ai:intent Text-to-text repair of the bare string-run keyword defect
/// @ai:invariant output equals input when no keyword run matches
#[derive(Debug, Clone)]
pub struct RepairPass {
    pattern: Option<Regex>,
    literal: Regex,
}

impl RepairPass {
    /// @ai:intent Build a repair pass for the given keyword names
    /// @ai:post an empty keyword list yields a pass-through repair
    /// @ai:effects pure
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k.as_ref().trim()))
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>()
            .join("|");

        let pattern = if alternation.is_empty() {
            None
        } else {
            let source = format!(
                r"\b({alternation})\s*=\s*('[^']+')((?:\s*,\s*'[^']+')+)(\s*,\s*[A-Za-z_][A-Za-z0-9_]*\s*=|\s*\))"
            );
            Some(Regex::new(&source).map_err(config_error)?)
        };

        Ok(Self {
            pattern,
            literal: Regex::new(r"'[^']+'").map_err(config_error)?,
        })
    }

    /// @ai:intent Repair the defect pattern wherever it occurs
    /// @ai:example ("f(deprecated_args='a', 'b')") -> "f(deprecated_args=('a', 'b'))"
    /// @ai:example ("f(x='a')") -> "f(x='a')"
    /// @ai:effects pure
    pub fn repair<'a>(&self, source: &'a str) -> Cow<'a, str> {
        let Some(pattern) = &self.pattern else {
            return Cow::Borrowed(source);
        };

        pattern.replace_all(source, |caps: &Captures| {
            let keyword = &caps[1];
            let mut values = vec![caps[2].to_string()];
            values.extend(
                self.literal
                    .find_iter(&caps[3])
                    .map(|m| m.as_str().to_string()),
            );
            format!("{}=({}){}", keyword, values.join(", "), &caps[4])
        })
    }
}

fn config_error(err: regex::Error) -> Error {
    Error::Config {
        path: PathBuf::from("[repair]"),
        message: err.to_string(),
    }
}
