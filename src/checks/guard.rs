//! Header guard check.
//!
//! Public headers must be wrapped in
//!
//! ```text
//! #ifndef _SCL_UTIL_HASH_H
//! #define _SCL_UTIL_HASH_H
//! ...
//! #endif  // _SCL_UTIL_HASH_H
//! ```
//!
//! where the symbol is derived from the header's path below its root.

use crate::engine::discovery::Target;
use crate::CheckResult;
use std::fmt;
use std::path::{Component, Path};
use std::time::Instant;
use thiserror::Error;

/// Default prefix prepended to derived guard symbols.
pub const DEFAULT_GUARD_PREFIX: &str = "_";

/// Derive the guard symbol for a header from its path relative to the root.
///
/// Path separators and dots become underscores, the prefix is prepended and
/// the result is upper-cased: `scl/util/hash.h` becomes `_SCL_UTIL_HASH_H`.
pub fn guard_symbol(relative: &Path, prefix: &str) -> String {
    let joined = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("_");

    format!("{}{}", prefix, joined.replace('.', "_")).to_uppercase()
}

/// The three guard lines of a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardLines {
    pub ifndef: String,
    pub define: String,
    pub endif: String,
}

impl GuardLines {
    /// The lines a header guarded by `symbol` must contain.
    pub fn expected(symbol: &str) -> Self {
        GuardLines {
            ifndef: format!("#ifndef {}", symbol),
            define: format!("#define {}", symbol),
            endif: format!("#endif  // {}", symbol),
        }
    }
}

impl fmt::Display for GuardLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.ifndef)?;
        writeln!(f, "{}", self.define)?;
        write!(f, "{}", self.endif)
    }
}

/// Why a header's guard is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("no `#ifndef {symbol}` found")]
    NoOpening { symbol: String },

    #[error("guard does not match\nExpected:\n{expected}\nFound:\n{found}")]
    Mismatch { expected: GuardLines, found: GuardLines },
}

/// Validate the guard of header content against `symbol`.
///
/// The opening `#ifndef` may appear anywhere before the last line and must
/// be immediately followed by the matching `#define`. The last line of the
/// file must be the matching `#endif`. Comparison is case-sensitive and
/// ignores trailing whitespace.
pub fn check_guards(content: &str, symbol: &str) -> Result<(), GuardViolation> {
    let lines: Vec<&str> = content.lines().map(str::trim_end).collect();
    let expected = GuardLines::expected(symbol);

    let Some(i) = lines.windows(2).position(|w| w[0] == expected.ifndef) else {
        return Err(GuardViolation::NoOpening {
            symbol: symbol.to_string(),
        });
    };

    let define = lines[i + 1];
    let last = lines.last().copied().unwrap_or_default();

    if define == expected.define && last == expected.endif {
        return Ok(());
    }

    Err(GuardViolation::Mismatch {
        found: GuardLines {
            ifndef: lines[i].to_string(),
            define: define.to_string(),
            endif: last.to_string(),
        },
        expected,
    })
}

/// Check a single header's guard.
pub fn check_file(prefix: &str, target: &Target) -> CheckResult {
    let start = Instant::now();
    let symbol = guard_symbol(&target.relative, prefix);

    let content = match std::fs::read_to_string(&target.path) {
        Ok(content) => content,
        Err(e) => {
            return CheckResult::Fail {
                message: format!("{} could not be read", target.display),
                details: e.to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            };
        }
    };

    let outcome = check_guards(&content, &symbol);
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => CheckResult::Pass {
            message: format!("guarded by {}", symbol),
            duration_ms,
        },
        Err(violation @ GuardViolation::NoOpening { .. }) => CheckResult::Fail {
            message: format!("No opening header in {}", target.display),
            details: violation.to_string(),
            duration_ms,
        },
        Err(violation) => CheckResult::Fail {
            message: format!("{} invalid header", target.display),
            details: violation.to_string(),
            duration_ms,
        },
    }
}
