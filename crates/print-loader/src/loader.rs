//! The seam between transforms and the build tool hosting them.

use crate::start_case::start_case_lines;
use crate::{transform_bytes, ResourceIdentity, TransformError};
use camino::Utf8Path;
use serde::Deserialize;
use source_map::SourceMap;
use std::fmt;
use std::str::FromStr;

/// The build tool invoking a loader for one resource.
pub trait Host {
    /// The resource being loaded.
    fn resource(&self) -> &ResourceIdentity;

    /// Records that the output depends on `path`, so the host can re-run the
    /// loader when it changes.
    fn add_dependency(&mut self, path: &Utf8Path);
}

/// What a loader hands back to its host.
#[derive(Debug, Clone)]
pub struct LoaderOutput {
    /// The generated text.
    pub code: String,
    /// The source map for `code`, if the loader produces one.
    pub map: Option<SourceMap>,
}

/// A transform the host can run on one resource at a time.
pub trait Loader: Send + Sync {
    /// Short name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Transforms `source`, the raw content of `host.resource()`.
    fn load(&self, host: &mut dyn Host, source: &[u8]) -> Result<LoaderOutput, TransformError>;
}

/// Wraps the resource into a module printing it line by line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintLoader;

impl Loader for PrintLoader {
    fn name(&self) -> &'static str {
        "print"
    }

    fn load(&self, host: &mut dyn Host, source: &[u8]) -> Result<LoaderOutput, TransformError> {
        let resource = host.resource().clone();
        // Registered before transforming so a failed load is retried on change
        host.add_dependency(resource.resource_path());

        let result = transform_bytes(source, &resource)?;
        Ok(LoaderOutput {
            code: result.code,
            map: Some(result.source_map),
        })
    }
}

/// Converts every line of the resource to start case.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartCaseLoader;

impl Loader for StartCaseLoader {
    fn name(&self) -> &'static str {
        "start-case"
    }

    fn load(&self, _host: &mut dyn Host, source: &[u8]) -> Result<LoaderOutput, TransformError> {
        let text = std::str::from_utf8(source)?;
        Ok(LoaderOutput {
            code: start_case_lines(text),
            map: None,
        })
    }
}

/// Selects one of the built-in loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoaderKind {
    /// [`PrintLoader`]
    #[default]
    Print,
    /// [`StartCaseLoader`]
    StartCase,
}

impl LoaderKind {
    /// Returns the loader implementation.
    pub fn loader(self) -> &'static dyn Loader {
        match self {
            Self::Print => &PrintLoader,
            Self::StartCase => &StartCaseLoader,
        }
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.loader().name())
    }
}

impl FromStr for LoaderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "print" => Ok(Self::Print),
            "start-case" => Ok(Self::StartCase),
            other => Err(format!(
                "unknown loader `{other}`, expected `print` or `start-case`"
            )),
        }
    }
}
