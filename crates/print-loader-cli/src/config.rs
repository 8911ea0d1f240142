//! Configuration loading.

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use print_loader::LoaderKind;
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Name of the configuration file looked up in the workspace.
pub const CONFIG_FILE: &str = "print-loader.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A rule has an invalid glob.
    #[error("invalid glob pattern `{pattern}`: {message}")]
    InvalidGlob { pattern: String, message: String },
}

/// Project configuration from `print-loader.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoaderConfig {
    /// Output directory, relative to the workspace.
    pub out_dir: Option<Utf8PathBuf>,

    /// Rules selecting a loader per file; the first match wins.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Glob patterns to ignore when walking directories.
    #[serde(default)]
    pub ignore: Vec<String>,
}

/// A loader rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Glob matched against the workspace-relative path.
    pub test: String,
    /// Loader applied to matching files.
    pub loader: LoaderKind,
}

impl LoaderConfig {
    /// Loads configuration from the workspace, falling back to defaults.
    ///
    /// A missing file yields the defaults silently; an unreadable or invalid
    /// one yields them with a warning.
    pub fn load(workspace: &Utf8Path) -> Self {
        let config_path = workspace.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }

        match Self::parse_config(&config_path) {
            Ok(config) => {
                tracing::debug!(path = %config_path, rules = config.rules.len(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!("{e}; using default configuration");
                Self::default()
            }
        }
    }

    /// Parses a configuration file.
    fn parse_config(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(path, &content)
    }

    fn parse_str(path: &Utf8Path, content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Compiled loader rules.
#[derive(Debug)]
pub struct RuleSet {
    globs: GlobSet,
    loaders: Vec<LoaderKind>,
    fallback: LoaderKind,
}

impl RuleSet {
    /// Compiles `rules`; files matching none use `fallback`.
    pub fn new(rules: &[RuleConfig], fallback: LoaderKind) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for rule in rules {
            builder.add(compile_glob(&rule.test)?);
        }

        Ok(Self {
            globs: build_glob_set(builder)?,
            loaders: rules.iter().map(|r| r.loader).collect(),
            fallback,
        })
    }

    /// Returns the loader for a workspace-relative path.
    pub fn loader_for(&self, relative: &Utf8Path) -> LoaderKind {
        self.globs
            .matches(relative.as_std_path())
            .into_iter()
            .min()
            .and_then(|index| self.loaders.get(index).copied())
            .unwrap_or(self.fallback)
    }
}

/// Compiles ignore patterns into a glob set.
pub fn ignore_set<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile_glob(pattern)?);
    }
    build_glob_set(builder)
}

fn compile_glob(pattern: &str) -> Result<Glob, ConfigError> {
    Glob::new(pattern).map_err(|e| ConfigError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn build_glob_set(builder: GlobSetBuilder) -> Result<GlobSet, ConfigError> {
    builder.build().map_err(|e| ConfigError::InvalidGlob {
        pattern: e.glob().unwrap_or_default().to_string(),
        message: e.to_string(),
    })
}
