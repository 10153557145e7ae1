//! Optional exclusion-rule configuration.
//!
//! A TOML file can add *extra* exclusion rules on top of the built-in
//! organize-time exclusions (hidden files and `desktop.ini`). The built-in
//! exclusions are a safety guarantee and cannot be disabled here; the
//! configuration only ever widens what is left alone.
//!
//! # Configuration File Format
//!
//! ```toml
//! [exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp", "bak"]
//! regex = ["^~\\$"]
//! ```
//!
//! Lookup order: an explicitly passed path, then `.dirshelfrc.toml` in the
//! current directory, then `~/.config/dirshelf/config.toml`, then defaults
//! (no extra exclusions).

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the explicitly given path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern.
    InvalidGlobPattern(String),
    /// Invalid regex pattern with the compiler's reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading the configuration file.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Extra exclusion rules loaded from a TOML configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Rules for excluding additional files from organization.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// The `[exclude]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, without the dot (e.g., "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl FilterConfig {
    /// Loads configuration, falling back through the standard lookup order
    /// to the default (empty) rule set.
    ///
    /// # Errors
    ///
    /// Returns an error only when an explicitly provided file is missing or
    /// unparsable; the fallback locations fail soft into the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".dirshelfrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dirshelf")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compiles the rules into matcher structures so per-file checks don't
    /// reparse patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern is invalid.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        let patterns = self
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = self
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledFilters {
            filenames: self.exclude.filenames.into_iter().collect(),
            extensions: self
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            patterns,
            regexes,
        })
    }
}

/// Pre-compiled exclusion matchers.
pub struct CompiledFilters {
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl CompiledFilters {
    /// Whether a file is excluded by the configured rules.
    ///
    /// This is additive to the built-in exclusions, which the organizer
    /// checks first; a file passes only if neither filter rejects it.
    pub fn is_excluded(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.filenames.contains(file_name.as_ref()) {
            return true;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.extensions.contains(&ext_lower) {
                return true;
            }
        }

        if self.patterns.iter().any(|p| p.matches_path(file_path)) {
            return true;
        }

        self.regexes.iter().any(|r| r.is_match(&file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_excludes_nothing() {
        let compiled = FilterConfig::default().compile().unwrap();

        assert!(!compiled.is_excluded(Path::new("image.jpg")));
        assert!(!compiled.is_excluded(Path::new("Thumbs.db")));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let config = FilterConfig {
            exclude: ExcludeRules {
                filenames: vec!["Thumbs.db".to_string()],
                ..Default::default()
            },
        };
        let compiled = config.compile().unwrap();

        assert!(compiled.is_excluded(Path::new("Thumbs.db")));
        assert!(!compiled.is_excluded(Path::new("image.jpg")));
    }

    #[test]
    fn test_exclude_extension_is_case_insensitive() {
        let config = FilterConfig {
            exclude: ExcludeRules {
                extensions: vec!["TMP".to_string()],
                ..Default::default()
            },
        };
        let compiled = config.compile().unwrap();

        assert!(compiled.is_excluded(Path::new("download.tmp")));
        assert!(compiled.is_excluded(Path::new("download.TMP")));
        assert!(!compiled.is_excluded(Path::new("download.txt")));
    }

    #[test]
    fn test_exclude_glob_pattern() {
        let config = FilterConfig {
            exclude: ExcludeRules {
                patterns: vec!["*.part".to_string()],
                ..Default::default()
            },
        };
        let compiled = config.compile().unwrap();

        assert!(compiled.is_excluded(Path::new("movie.mkv.part")));
        assert!(!compiled.is_excluded(Path::new("movie.mkv")));
    }

    #[test]
    fn test_exclude_regex_matches_file_name() {
        let config = FilterConfig {
            exclude: ExcludeRules {
                regex: vec!["^~\\$".to_string()],
                ..Default::default()
            },
        };
        let compiled = config.compile().unwrap();

        assert!(compiled.is_excluded(Path::new("~$report.docx")));
        assert!(!compiled.is_excluded(Path::new("report.docx")));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let config = FilterConfig {
            exclude: ExcludeRules {
                regex: vec!["(unclosed".to_string()],
                ..Default::default()
            },
        };

        assert!(matches!(
            config.compile(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let result = FilterConfig::load(Some(Path::new("/non/existent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_parse_toml_rules() {
        let parsed: FilterConfig = toml::from_str(
            r#"
            [exclude]
            filenames = ["Thumbs.db"]
            extensions = ["tmp"]
            "#,
        )
        .expect("Failed to parse");

        assert_eq!(parsed.exclude.filenames, vec!["Thumbs.db"]);
        assert_eq!(parsed.exclude.extensions, vec!["tmp"]);
        assert!(parsed.exclude.patterns.is_empty());
    }
}
