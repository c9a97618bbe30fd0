//! Reading and writing `manifest.json`.
//!
//! Writes always recompute the content summary from the mapping lists and
//! refresh `last_updated`, so an emitted manifest never carries stale
//! counts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use super::component::ComponentManifest;
use super::error::{ManifestError, ManifestResult};
use super::theme::ThemeManifest;

/// File name of the manifest at a package root.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Path of the manifest file inside a package directory.
pub fn manifest_path(package_dir: &Path) -> PathBuf {
    package_dir.join(MANIFEST_FILENAME)
}

/// Read a full theme manifest.
pub fn read_theme_manifest(package_dir: &Path) -> ManifestResult<ThemeManifest> {
    let path = manifest_path(package_dir);
    let value = read_json(&path)?;
    serde_json::from_value(value).map_err(|e| ManifestError::Malformed {
        path,
        reason: e.to_string(),
    })
}

/// Read a theme manifest, or synthesize a default when none exists.
///
/// Only a missing manifest falls back to the default; a malformed one is
/// still an error.
pub fn read_or_default(
    package_dir: &Path,
    name: &str,
    author: &str,
) -> ManifestResult<ThemeManifest> {
    match read_theme_manifest(package_dir) {
        Err(ManifestError::NotFound { .. }) => {
            tracing::debug!(
                package = %package_dir.display(),
                "No manifest found, using defaults"
            );
            Ok(ThemeManifest::create_default(name, author))
        }
        other => other,
    }
}

/// Read a component manifest, dispatching on its declared type.
pub fn read_component_manifest(package_dir: &Path) -> ManifestResult<ComponentManifest> {
    let path = manifest_path(package_dir);
    let value = read_json(&path)?;
    ComponentManifest::from_json(value, &path)
}

/// Write a theme manifest after refreshing counts and timestamps.
pub fn write_theme_manifest(
    package_dir: &Path,
    manifest: &mut ThemeManifest,
) -> ManifestResult<()> {
    manifest.refresh_content();
    manifest.touch();
    write_json(&manifest_path(package_dir), manifest)
}

/// Write a component manifest after refreshing counts and timestamps.
pub fn write_component_manifest(
    package_dir: &Path,
    manifest: &mut ComponentManifest,
) -> ManifestResult<()> {
    manifest.refresh_content();
    manifest.touch();
    write_json(&manifest_path(package_dir), manifest)
}

fn read_json(path: &Path) -> ManifestResult<Value> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ManifestError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ManifestError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;
    serde_json::from_str(&text).map_err(|e| ManifestError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> ManifestResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ManifestError::Write {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ManifestError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, json + "\n").map_err(|e| ManifestError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
