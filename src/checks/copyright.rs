//! Copyright header check.
//!
//! Every source file must open with the project's license block. One line
//! of the block carries the copyright notice; it is matched by prefix so the
//! year and holder may vary. The block must be followed by a blank line.
//!
//! Comparison is line based with trailing whitespace ignored, and stops at
//! the first mismatching line.

use crate::engine::discovery::Target;
use crate::CheckResult;
use std::time::Instant;
use thiserror::Error;

/// License block used by SCL. Line 1 is the copyright slot and is never
/// compared literally.
pub const SCL_HEADER: &str = "\
/* SCL --- Secure Computation Library
 * ---- THIS LINE IS IGNORED ----
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
";

/// Index of the copyright line within [`SCL_HEADER`].
pub const SCL_COPYRIGHT_LINE: usize = 1;

/// Fixed part of the copyright line.
pub const SCL_COPYRIGHT_PREFIX: &str = " * Copyright (C) ";

/// How the copyright slot of the template is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyrightRule {
    pub prefix: String,
    /// Require a four digit year right after the prefix
    pub require_year: bool,
}

impl CopyrightRule {
    pub fn matches(&self, line: &str) -> bool {
        let Some(rest) = line.strip_prefix(self.prefix.as_str()) else {
            return false;
        };
        if !self.require_year {
            return true;
        }
        let bytes = rest.as_bytes();
        bytes.len() >= 4
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes.get(4).map_or(true, |b| !b.is_ascii_digit())
    }
}

impl Default for CopyrightRule {
    fn default() -> Self {
        CopyrightRule {
            prefix: SCL_COPYRIGHT_PREFIX.to_string(),
            require_year: true,
        }
    }
}

/// Invalid template configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("header template is empty")]
    Empty,

    #[error("copyright line {index} is outside the {len}-line header template")]
    SlotOutOfRange { index: usize, len: usize },
}

/// Why a file's header does not match the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderViolation {
    #[error("line {line} differs from the license template")]
    Mismatch { line: usize },

    #[error("line {line} is not a valid copyright line")]
    BadCopyright { line: usize },

    #[error("file ends at line {line}, before the license header is complete")]
    TooShort { line: usize },

    #[error("license header is not followed by a blank line (line {line})")]
    MissingBlankLine { line: usize },
}

impl HeaderViolation {
    /// Zero-based index of the offending line.
    pub fn line(&self) -> usize {
        match self {
            HeaderViolation::Mismatch { line }
            | HeaderViolation::BadCopyright { line }
            | HeaderViolation::TooShort { line }
            | HeaderViolation::MissingBlankLine { line } => *line,
        }
    }
}

/// Expected header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
    lines: Vec<String>,
    copyright_line: usize,
    copyright: CopyrightRule,
}

impl HeaderTemplate {
    /// Build a template from its text. Trailing whitespace is trimmed from
    /// the block and from every line.
    pub fn new(text: &str, copyright_line: usize, copyright: CopyrightRule) -> Result<Self, TemplateError> {
        let trimmed = text.trim_end();
        if trimmed.is_empty() {
            return Err(TemplateError::Empty);
        }
        let lines: Vec<String> = trimmed.split('\n').map(|l| l.trim_end().to_string()).collect();
        if copyright_line >= lines.len() {
            return Err(TemplateError::SlotOutOfRange {
                index: copyright_line,
                len: lines.len(),
            });
        }
        Ok(HeaderTemplate {
            lines,
            copyright_line,
            copyright,
        })
    }

    /// The SCL license block.
    pub fn scl() -> Self {
        HeaderTemplate {
            lines: SCL_HEADER.trim_end().split('\n').map(str::to_string).collect(),
            copyright_line: SCL_COPYRIGHT_LINE,
            copyright: CopyrightRule::default(),
        }
    }

    /// Number of lines in the header block.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Validate file content against the template.
    pub fn check(&self, content: &str) -> Result<(), HeaderViolation> {
        let mut lines = content.lines();

        for (n, expected) in self.lines.iter().enumerate() {
            let Some(line) = lines.next() else {
                return Err(HeaderViolation::TooShort { line: n });
            };
            if n == self.copyright_line {
                if !self.copyright.matches(line) {
                    return Err(HeaderViolation::BadCopyright { line: n });
                }
            } else if line.trim_end() != expected {
                return Err(HeaderViolation::Mismatch { line: n });
            }
        }

        let n = self.lines.len();
        match lines.next() {
            None => Err(HeaderViolation::TooShort { line: n }),
            Some(line) if line.trim_end().is_empty() => Ok(()),
            Some(_) => Err(HeaderViolation::MissingBlankLine { line: n }),
        }
    }
}

/// Check a single file's license header.
pub fn check_file(template: &HeaderTemplate, target: &Target) -> CheckResult {
    let start = Instant::now();

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

    let outcome = template.check(&content);
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => CheckResult::Pass {
            message: "license header present".to_string(),
            duration_ms,
        },
        Err(violation) => CheckResult::Fail {
            message: format!("{} invalid header (error on line: {})", target.display, violation.line()),
            details: violation.to_string(),
            duration_ms,
        },
    }
}
