//! Manifest read, write and validation errors.

use std::io;
use std::path::PathBuf;

use super::validate::ValidationIssue;
use crate::package::PackageType;

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors reading, writing or validating a package manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No manifest file exists in the package directory.
    #[error("manifest not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The manifest exists but cannot be read or parsed.
    #[error("malformed manifest {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// A component manifest names a type this tool does not know.
    #[error("unknown component type '{found}' in {}", path.display())]
    UnknownComponentType { path: PathBuf, found: String },

    /// A component manifest is of a different type than expected.
    #[error("expected a {expected} component in {}, found {found}", path.display())]
    TypeMismatch {
        path: PathBuf,
        expected: PackageType,
        found: PackageType,
    },

    /// Validation found one or more problems.
    #[error("invalid manifest: {}", format_issues(issues))]
    Invalid { issues: Vec<ValidationIssue> },

    /// The manifest could not be written.
    #[error("failed to write manifest {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl ManifestError {
    /// Whether this error means the manifest file is simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
