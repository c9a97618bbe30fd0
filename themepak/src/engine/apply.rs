//! Apply a full theme and restore a backup.

use super::error::{ThemeError, ThemeResult};
use super::placement::install_theme_tree;
use super::report::{ApplyReport, PackageOrigin};
use super::{dir_name, ensure_valid, ThemeManager};
use crate::device::SystemDirectory;
use crate::manifest::{read_theme_manifest, Strictness};
use crate::state::AppliedState;
use crate::transfer::count_files;

impl<D: SystemDirectory> ThemeManager<D> {
    /// Install a full theme onto the live device.
    ///
    /// The manifest is validated strictly before anything is touched. With
    /// auto-backup enabled, a non-empty live theme is backed up (and old
    /// backups rotated) first. The live theme directory is then replaced
    /// wholesale, external icons are cleared and re-placed, and the accent
    /// and LED blocks are merged into the shared settings files.
    pub fn apply_theme(
        &self,
        name: &str,
        state: AppliedState,
    ) -> ThemeResult<(ApplyReport, AppliedState)> {
        let path = self
            .store
            .locate_theme(name)?
            .ok_or_else(|| ThemeError::ThemeNotFound(name.to_string()))?;
        let origin = if path.starts_with(self.store.exports_dir()) {
            PackageOrigin::Export
        } else {
            PackageOrigin::Installed
        };

        let manifest = read_theme_manifest(&path)?;
        ensure_valid(&manifest, Strictness::Strict)?;

        let backup = if self.config.auto_backup
            && count_files(&self.layout().live_theme_dir()) > 0
        {
            Some(self.create_backup(None)?)
        } else {
            None
        };

        let package = dir_name(&path);
        tracing::info!(theme = %package, source = %path.display(), "Applying theme");
        let counts = install_theme_tree(self.layout(), &path, &manifest)?;
        tracing::info!(
            theme = %package,
            files = counts.files(),
            dangling = counts.dangling,
            "Theme applied"
        );

        let report = ApplyReport {
            name: package.clone(),
            origin,
            source: path,
            counts,
            backup,
        };
        Ok((report, state.with_theme(package)))
    }

    /// Put a backup back onto the live device.
    ///
    /// Backups are validated permissively and no auto-backup is taken, so a
    /// restore never rotates away the backup it is restoring.
    pub fn restore_backup(
        &self,
        name: &str,
        state: AppliedState,
    ) -> ThemeResult<(ApplyReport, AppliedState)> {
        let path = self.store.backup_path(name)?;
        if !path.is_dir() {
            return Err(ThemeError::BackupNotFound(name.to_string()));
        }

        let manifest = read_theme_manifest(&path)?;
        ensure_valid(&manifest, Strictness::Permissive)?;

        let package = dir_name(&path);
        tracing::info!(backup = %package, "Restoring backup");
        let counts = install_theme_tree(self.layout(), &path, &manifest)?;

        let report = ApplyReport {
            name: package.clone(),
            origin: PackageOrigin::Backup,
            source: path,
            counts,
            backup: None,
        };
        Ok((report, state.with_theme(package)))
    }
}
