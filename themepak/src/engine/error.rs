//! Error types for the theme engine.

use std::path::PathBuf;

use crate::archive::ExtractError;
use crate::manifest::{ContentCategory, ManifestError};
use crate::package::{DeleteError, NameError};
use crate::preview::PreviewError;
use crate::state::StateError;
use crate::transfer::TransferError;

/// Result type for engine operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

/// Errors that can occur during theme operations.
#[derive(Debug)]
pub enum ThemeError {
    /// Manifest missing, malformed or failing validation.
    Manifest(ManifestError),

    /// A copy, remove or directory step failed.
    Transfer(TransferError),

    /// A package name cannot be used as a directory name.
    InvalidName(NameError),

    /// No full theme of that name in Themes/ or Exports/.
    ThemeNotFound(String),

    /// No component package of that name.
    ComponentNotFound(String),

    /// No backup of that name.
    BackupNotFound(String),

    /// No package of that name anywhere in the store.
    PackageNotFound(String),

    /// A user-named target already exists.
    AlreadyExists(PathBuf),

    /// The package type cannot be derived from a name.
    UnknownPackageType(String),

    /// A category had mappings but none of their files exist.
    NothingToExtract(ContentCategory),

    /// Deconstruction produced no component at all.
    NoComponentsExtracted(String),

    /// Archive extraction failed.
    Extract(ExtractError),

    /// A shared settings file could not be read, parsed or written.
    SettingsFile { path: PathBuf, reason: String },

    /// The backup retention glob does not parse.
    InvalidPattern { pattern: String, reason: String },

    /// The applied-state record could not be read or written.
    State(StateError),

    /// A package could not be deleted.
    Delete(DeleteError),

    /// A preview image could not be written.
    Preview(PreviewError),
}

impl std::fmt::Display for ThemeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manifest(e) => write!(f, "{}", e),
            Self::Transfer(e) => write!(f, "{}", e),
            Self::InvalidName(e) => write!(f, "{}", e),
            Self::ThemeNotFound(name) => write!(f, "theme not found: {}", name),
            Self::ComponentNotFound(name) => write!(f, "component not found: {}", name),
            Self::BackupNotFound(name) => write!(f, "backup not found: {}", name),
            Self::PackageNotFound(name) => write!(f, "package not found: {}", name),
            Self::AlreadyExists(path) => write!(f, "{} already exists", path.display()),
            Self::UnknownPackageType(name) => {
                write!(
                    f,
                    "cannot determine package type of '{}' (expected one of .theme, .bg, .icon, .acc, .led, .font, .over)",
                    name
                )
            }
            Self::NothingToExtract(category) => {
                write!(f, "no {} files present to extract", category)
            }
            Self::NoComponentsExtracted(name) => {
                write!(f, "no components could be extracted from {}", name)
            }
            Self::Extract(e) => write!(f, "{}", e),
            Self::SettingsFile { path, reason } => {
                write!(f, "settings file {}: {}", path.display(), reason)
            }
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid backup pattern '{}': {}", pattern, reason)
            }
            Self::State(e) => write!(f, "{}", e),
            Self::Delete(e) => write!(f, "{}", e),
            Self::Preview(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ThemeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Manifest(e) => Some(e),
            Self::Transfer(e) => Some(e),
            Self::InvalidName(e) => Some(e),
            Self::Extract(e) => Some(e),
            Self::State(e) => Some(e),
            Self::Delete(e) => Some(e),
            Self::Preview(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ManifestError> for ThemeError {
    fn from(e: ManifestError) -> Self {
        Self::Manifest(e)
    }
}

impl From<TransferError> for ThemeError {
    fn from(e: TransferError) -> Self {
        Self::Transfer(e)
    }
}

impl From<NameError> for ThemeError {
    fn from(e: NameError) -> Self {
        Self::InvalidName(e)
    }
}

impl From<ExtractError> for ThemeError {
    fn from(e: ExtractError) -> Self {
        Self::Extract(e)
    }
}

impl From<StateError> for ThemeError {
    fn from(e: StateError) -> Self {
        Self::State(e)
    }
}

impl From<DeleteError> for ThemeError {
    fn from(e: DeleteError) -> Self {
        Self::Delete(e)
    }
}

impl From<PreviewError> for ThemeError {
    fn from(e: PreviewError) -> Self {
        Self::Preview(e)
    }
}
