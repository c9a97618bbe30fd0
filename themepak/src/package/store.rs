//! On-disk locations of packages, backups and catalog entries.
//!
//! The [`PackageStore`] resolves every package location from a name and a
//! package type. Directory names produced here always end in the type's
//! extension.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::naming::{ensure_extension, validate_package_name, NameError};
use super::PackageType;
use crate::transfer::{remove_directory, TransferError};

/// Directory holding component packages, below the data directory.
pub const COMPONENTS_DIR: &str = "Components";

/// Directory holding backups, below the data directory.
pub const BACKUPS_DIR: &str = "Backups";

/// Directory holding exports, below the data directory.
pub const EXPORTS_DIR: &str = "Exports";

/// Directory holding downloaded catalog entries, below the data directory.
pub const CATALOG_DIR: &str = "Catalog";

/// File recording which theme/components are currently applied.
pub const STATE_FILENAME: &str = "applied_state.json";

/// Failure to delete a package from the store.
#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    /// The path is not below the store root.
    #[error("{} is outside the package store", .0.display())]
    OutsideStore(PathBuf),

    /// The path does not name a package directory.
    #[error("{} is not a package directory", .0.display())]
    NotAPackage(PathBuf),

    /// Removal failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// A package found in a store directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Directory name including extension.
    pub name: String,
    /// Package type derived from the extension.
    pub package_type: PackageType,
    /// Full path to the package directory.
    pub path: PathBuf,
    /// Last modification time of the package directory.
    pub modified: SystemTime,
}

/// Resolver for package locations below a data directory.
///
/// ```text
/// <data_dir>/
/// ├── Themes/                  *.theme
/// ├── Components/
/// │   ├── Wallpapers/          *.bg
/// │   ├── Icons/               *.icon
/// │   ├── Accents/             *.acc
/// │   ├── LEDs/                *.led
/// │   ├── Fonts/               *.font
/// │   └── Overlays/            *.over
/// ├── Backups/                 *.theme
/// ├── Exports/                 *.theme
/// ├── Catalog/
/// └── applied_state.json
/// ```
#[derive(Debug, Clone)]
pub struct PackageStore {
    root: PathBuf,
}

impl PackageStore {
    /// Create a store rooted at the given data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding full themes.
    pub fn themes_dir(&self) -> PathBuf {
        self.root.join(PackageType::Theme.store_dir_name())
    }

    /// Directory holding packages of the given type.
    ///
    /// Themes live in `Themes/`, components in `Components/<Category>/`.
    pub fn package_dir(&self, package_type: PackageType) -> PathBuf {
        match package_type {
            PackageType::Theme => self.themes_dir(),
            other => self
                .root
                .join(COMPONENTS_DIR)
                .join(other.store_dir_name()),
        }
    }

    /// Directory holding backups.
    pub fn backups_dir(&self) -> PathBuf {
        self.root.join(BACKUPS_DIR)
    }

    /// Directory holding exports.
    pub fn exports_dir(&self) -> PathBuf {
        self.root.join(EXPORTS_DIR)
    }

    /// Directory holding downloaded catalog files.
    pub fn catalog_dir(&self) -> PathBuf {
        self.root.join(CATALOG_DIR)
    }

    /// Location of a catalog entry (downloaded but not yet installed package).
    pub fn catalog_entry(
        &self,
        package_type: PackageType,
        name: &str,
    ) -> Result<PathBuf, NameError> {
        validate_package_name(name)?;
        Ok(self
            .catalog_dir()
            .join(package_type.store_dir_name())
            .join(ensure_extension(name, package_type)))
    }

    /// Path of the applied-state file.
    pub fn state_file(&self) -> PathBuf {
        self.root.join(STATE_FILENAME)
    }

    /// Canonical path of a package of the given type.
    pub fn package_path(
        &self,
        package_type: PackageType,
        name: &str,
    ) -> Result<PathBuf, NameError> {
        validate_package_name(name)?;
        Ok(self
            .package_dir(package_type)
            .join(ensure_extension(name, package_type)))
    }

    /// Canonical path of an export.
    pub fn export_path(&self, name: &str) -> Result<PathBuf, NameError> {
        validate_package_name(name)?;
        Ok(self
            .exports_dir()
            .join(ensure_extension(name, PackageType::Theme)))
    }

    /// Canonical path of a backup.
    pub fn backup_path(&self, name: &str) -> Result<PathBuf, NameError> {
        validate_package_name(name)?;
        Ok(self
            .backups_dir()
            .join(ensure_extension(name, PackageType::Theme)))
    }

    /// Find an existing full theme by name.
    ///
    /// Installed themes take precedence over exports of the same name.
    pub fn locate_theme(&self, name: &str) -> Result<Option<PathBuf>, NameError> {
        let installed = self.package_path(PackageType::Theme, name)?;
        if installed.is_dir() {
            return Ok(Some(installed));
        }
        let exported = self.export_path(name)?;
        if exported.is_dir() {
            return Ok(Some(exported));
        }
        Ok(None)
    }

    /// Find an existing component package.
    ///
    /// When `name` carries a component extension the type is taken from it;
    /// otherwise every component directory is searched in order.
    pub fn locate_component(
        &self,
        name: &str,
    ) -> Result<Option<(PackageType, PathBuf)>, NameError> {
        validate_package_name(name)?;
        if let Some(package_type) = PackageType::from_dir_name(name).filter(|t| t.is_component()) {
            let path = self.package_path(package_type, name)?;
            return Ok(path.is_dir().then_some((package_type, path)));
        }
        for package_type in PackageType::COMPONENTS {
            let path = self.package_path(package_type, name)?;
            if path.is_dir() {
                return Ok(Some((package_type, path)));
            }
        }
        Ok(None)
    }

    /// List installed packages of a type, sorted by name.
    pub fn list_packages(&self, package_type: PackageType) -> Vec<PackageEntry> {
        list_package_dir(&self.package_dir(package_type), package_type)
    }

    /// List exports, sorted by name.
    pub fn list_exports(&self) -> Vec<PackageEntry> {
        list_package_dir(&self.exports_dir(), PackageType::Theme)
    }

    /// List backups, sorted by name.
    pub fn list_backups(&self) -> Vec<PackageEntry> {
        list_package_dir(&self.backups_dir(), PackageType::Theme)
    }

    /// Delete an installed package, export or backup directory.
    ///
    /// Only directories inside this store with a package extension are
    /// removed. Returns `false` when nothing existed at `path`.
    pub fn delete_package(&self, path: &Path) -> Result<bool, DeleteError> {
        if !path.starts_with(&self.root) {
            return Err(DeleteError::OutsideStore(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if PackageType::from_dir_name(&name).is_none() {
            return Err(DeleteError::NotAPackage(path.to_path_buf()));
        }
        if !path.exists() {
            return Ok(false);
        }
        remove_directory(path)?;
        Ok(true)
    }

    /// Create every store directory.
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        for package_type in PackageType::ALL {
            fs::create_dir_all(self.package_dir(package_type))?;
        }
        fs::create_dir_all(self.backups_dir())?;
        fs::create_dir_all(self.exports_dir())?;
        fs::create_dir_all(self.catalog_dir())?;
        Ok(())
    }
}

/// List package directories of one type inside `dir`.
///
/// Entries without the type's extension or that are not directories are
/// ignored. A missing directory yields an empty list.
pub fn list_package_dir(dir: &Path, package_type: PackageType) -> Vec<PackageEntry> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut packages: Vec<PackageEntry> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            if PackageType::from_dir_name(&name) != Some(package_type) {
                return None;
            }
            let metadata = entry.metadata().ok()?;
            if !metadata.is_dir() {
                return None;
            }
            Some(PackageEntry {
                name,
                package_type,
                path: entry.path(),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            })
        })
        .collect();

    packages.sort_by(|a, b| a.name.cmp(&b.name));
    packages
}
