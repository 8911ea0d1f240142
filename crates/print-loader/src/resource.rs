//! Identity of the file being transformed.

use crate::TransformError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// The file being transformed and the directory its source-map path is relative to.
///
/// Both are supplied by the host; nothing here reads the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    resource_path: Utf8PathBuf,
    working_directory: Utf8PathBuf,
}

impl ResourceIdentity {
    /// Creates a resource identity.
    pub fn new(
        resource_path: impl Into<Utf8PathBuf>,
        working_directory: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            resource_path: resource_path.into(),
            working_directory: working_directory.into(),
        }
    }

    /// Returns the absolute path of the resource.
    pub fn resource_path(&self) -> &Utf8Path {
        &self.resource_path
    }

    /// Returns the working directory.
    pub fn working_directory(&self) -> &Utf8Path {
        &self.working_directory
    }

    /// Returns the resource path relative to the working directory.
    ///
    /// The computation is lexical: `.` and `..` are folded without touching
    /// the file system, and resources outside the working directory get
    /// leading `..` segments. Segments are always joined with `/`.
    pub fn relative_path(&self) -> Result<String, TransformError> {
        if !self.resource_path.is_absolute() || !self.working_directory.is_absolute() {
            return Err(self.invalid("both paths must be absolute"));
        }

        let resource = normalized_components(&self.resource_path);
        let base = normalized_components(&self.working_directory);

        // Prefix and root components must agree (e.g. same drive)
        let resource_root = resource.iter().take_while(|c| !is_normal(c));
        let base_root = base.iter().take_while(|c| !is_normal(c));
        if !resource_root.eq(base_root) {
            return Err(self.invalid("the paths have different roots"));
        }

        let common = resource
            .iter()
            .zip(&base)
            .take_while(|(a, b)| a == b)
            .count();

        let segments: Vec<&str> = std::iter::repeat("..")
            .take(base.len() - common)
            .chain(resource[common..].iter().map(|c| c.as_str()))
            .collect();

        if segments.is_empty() {
            return Err(self.invalid("the resource is the working directory"));
        }

        Ok(segments.join("/"))
    }

    fn invalid(&self, reason: &'static str) -> TransformError {
        TransformError::InvalidResource {
            resource: self.resource_path.clone(),
            working_directory: self.working_directory.clone(),
            reason,
        }
    }
}

fn is_normal(component: &Utf8Component<'_>) -> bool {
    matches!(component, Utf8Component::Normal(_))
}

fn normalized_components(path: &Utf8Path) -> Vec<Utf8Component<'_>> {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                // `..` above the root stays at the root
                if components.last().is_some_and(is_normal) {
                    components.pop();
                }
            }
            other => components.push(other),
        }
    }
    components
}
