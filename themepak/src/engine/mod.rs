//! Theme engine: Apply, Export, Import, Deconstruct and backups.
//!
//! [`ThemeManager`] ties a [`DeviceLayout`], a [`PackageStore`] and a
//! [`SystemDirectory`] together and exposes one method per operation:
//!
//! | Operation            | Reads                 | Writes                          |
//! |----------------------|-----------------------|---------------------------------|
//! | `apply_theme`        | `Themes/`, `Exports/` | live theme, icons, settings     |
//! | `export_theme`       | live device           | `Exports/`                      |
//! | `import_component`   | `Components/`         | part of the live theme          |
//! | `deconstruct_theme`  | `Themes/`, `Exports/` | `Components/`                   |
//! | `create_backup`      | live device           | `Backups/`                      |
//! | `restore_backup`     | `Backups/`            | live theme, icons, settings     |
//! | `install_archive`    | a ZIP file            | `Catalog/`, then the store      |
//!
//! Operations that change what is applied take the current
//! [`AppliedState`] by value and return the updated one next to their
//! report; persisting it is up to the caller.
//!
//! Everything is synchronous and single-threaded; concurrent invocations
//! against the same device are not supported.

mod apply;
mod backup;
mod config;
mod deconstruct;
mod error;
mod export;
mod import;
mod install;
mod placement;
mod query;
mod report;

pub use config::ManagerConfig;
pub use error::{ThemeError, ThemeResult};
pub use query::{PackageInfo, StatusReport};
pub use report::{
    ApplyReport, BackupReport, DeconstructReport, ExportReport, ExtractedComponent,
    ImportReport, InstallReport, PackageOrigin, PlacementCounts, RemoveReport, RotationReport,
};

use std::path::Path;

use crate::device::{DeviceLayout, ScannedSystems, SystemDirectory};
use crate::manifest::{ManifestError, Strictness, ThemeManifest};
use crate::package::PackageStore;
use crate::state::AppliedState;

/// Entry point for every theme operation.
pub struct ThemeManager<D: SystemDirectory = ScannedSystems> {
    config: ManagerConfig,
    store: PackageStore,
    systems: D,
}

impl ThemeManager<ScannedSystems> {
    /// Create a manager that discovers systems by scanning the SD card.
    pub fn new(config: ManagerConfig) -> Self {
        let systems = ScannedSystems::new(config.layout.clone());
        Self::with_systems(config, systems)
    }
}

impl<D: SystemDirectory> ThemeManager<D> {
    /// Create a manager with a custom system directory.
    pub fn with_systems(config: ManagerConfig, systems: D) -> Self {
        let store = PackageStore::new(&config.data_dir);
        Self {
            config,
            store,
            systems,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn layout(&self) -> &DeviceLayout {
        &self.config.layout
    }

    pub fn store(&self) -> &PackageStore {
        &self.store
    }

    pub fn systems(&self) -> &D {
        &self.systems
    }

    /// Load the applied-state record from the store.
    pub fn load_state(&self) -> ThemeResult<AppliedState> {
        Ok(AppliedState::load(&self.store.state_file())?)
    }

    /// Persist the applied-state record.
    pub fn save_state(&self, state: &AppliedState) -> ThemeResult<()> {
        Ok(state.save(&self.store.state_file())?)
    }
}

/// Fail with every validation issue when a manifest does not pass.
fn ensure_valid(manifest: &ThemeManifest, strictness: Strictness) -> ThemeResult<()> {
    let issues = crate::manifest::validate(manifest, strictness);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ManifestError::Invalid { issues }.into())
    }
}

/// Directory name of a package path.
fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
