//! Settings for scl-lint.
//!
//! Settings are merged from, in increasing precedence:
//! - Built-in defaults (the SCL layout and license block)
//! - A TOML settings file (`scl-lint.toml` in the base directory, or `--config`)
//! - Command line flags

use crate::checks::copyright::{
    CopyrightRule, HeaderTemplate, TemplateError, SCL_COPYRIGHT_LINE, SCL_COPYRIGHT_PREFIX, SCL_HEADER,
};
use crate::checks::coverage::{CoverageThresholds, SummaryRows, ThresholdMode};
use crate::checks::guard::DEFAULT_GUARD_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings file looked up in the base directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "scl-lint.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid configuration: {0}")]
    Template(#[from] TemplateError),
}

/// Complete settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub copyright: CopyrightSettings,
    pub guards: GuardSettings,
    pub coverage: CoverageSettings,
}

/// Copyright header check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyrightSettings {
    /// Directories walked, relative to the base directory
    pub roots: Vec<String>,
    /// File extensions checked, without the dot
    pub extensions: Vec<String>,
    /// Header block text; the copyright line is a placeholder
    pub header: String,
    /// Zero-based index of the copyright line within `header`
    pub copyright_line: usize,
    pub prefix: String,
    pub require_year: bool,
}

impl Default for CopyrightSettings {
    fn default() -> Self {
        CopyrightSettings {
            roots: vec!["include".to_string(), "src".to_string(), "test".to_string()],
            extensions: vec!["h".to_string(), "cc".to_string()],
            header: SCL_HEADER.to_string(),
            copyright_line: SCL_COPYRIGHT_LINE,
            prefix: SCL_COPYRIGHT_PREFIX.to_string(),
            require_year: true,
        }
    }
}

impl CopyrightSettings {
    pub fn template(&self) -> Result<HeaderTemplate, ConfigError> {
        let rule = CopyrightRule {
            prefix: self.prefix.clone(),
            require_year: self.require_year,
        };
        Ok(HeaderTemplate::new(&self.header, self.copyright_line, rule)?)
    }
}

/// Header guard check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardSettings {
    pub roots: Vec<String>,
    /// Empty means every file below the roots
    pub extensions: Vec<String>,
    /// Prepended to the path-derived symbol
    pub prefix: String,
}

impl Default for GuardSettings {
    fn default() -> Self {
        GuardSettings {
            roots: vec!["include".to_string()],
            extensions: vec!["h".to_string()],
            prefix: DEFAULT_GUARD_PREFIX.to_string(),
        }
    }
}

/// Coverage threshold settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageSettings {
    /// Required line coverage, in percent
    pub lines: f64,
    /// Required function coverage, in percent
    pub functions: f64,
    pub mode: ThresholdMode,
    pub lines_row: usize,
    pub functions_row: usize,
}

impl Default for CoverageSettings {
    fn default() -> Self {
        let rows = SummaryRows::default();
        CoverageSettings {
            lines: 100.0,
            functions: 100.0,
            mode: ThresholdMode::AtLeast,
            lines_row: rows.lines,
            functions_row: rows.functions,
        }
    }
}

impl CoverageSettings {
    pub fn thresholds(&self) -> CoverageThresholds {
        CoverageThresholds {
            lines: self.lines,
            functions: self.functions,
            mode: self.mode,
        }
    }

    pub fn rows(&self) -> SummaryRows {
        SummaryRows {
            lines: self.lines_row,
            functions: self.functions_row,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. `origin` is only used in errors.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Load the explicit settings file if given, otherwise the default file
    /// in `base_dir` if present, otherwise the built-in defaults.
    pub fn load_or_default(base_dir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading settings");
            return Self::load(path);
        }

        let candidate = base_dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading settings");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.copyright.template()?;

        for (name, value) in [("lines", self.coverage.lines), ("functions", self.coverage.functions)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "coverage.{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }

        if self.coverage.lines_row == self.coverage.functions_row {
            return Err(ConfigError::Invalid(format!(
                "coverage.lines_row and coverage.functions_row are both {}",
                self.coverage.lines_row
            )));
        }

        Ok(())
    }
}
