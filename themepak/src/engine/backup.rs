//! Snapshots of the live theme and backup rotation.

use std::path::Path;

use chrono::Local;

use super::error::{ThemeError, ThemeResult};
use super::export::export_preview;
use super::report::{BackupReport, RotationReport};
use super::{dir_name, ThemeManager};
use crate::device::SystemDirectory;
use crate::manifest::classify::{
    self, COLLECTION_ICONS_DIR, ICONS_DIR, ROOT_MEDIA_NAMES, SETTINGS_DIR, TOOL_ICONS_DIR,
};
use crate::manifest::{
    rebuild_theme_manifest, write_theme_manifest, ThemeManifest, PREVIEW_FILENAME,
};
use crate::package::{backup_name_at, base_name, unique_name, PackageEntry, PackageType};
use crate::transfer::{copy_directory, copy_file, create_dir_all, list_files};

impl<D: SystemDirectory> ThemeManager<D> {
    /// Snapshot the live device into `Backups/`.
    ///
    /// The backup is a full theme package: the live theme directory, the
    /// icons placed outside it and the shared settings files, with a
    /// manifest rebuilt from what was copied. Without a name the backup is
    /// timestamped. Old backups are rotated afterwards.
    pub fn create_backup(&self, name: Option<&str>) -> ThemeResult<BackupReport> {
        let backups = self.store.backups_dir();
        let path = match name {
            Some(name) => {
                let path = self.store.backup_path(name)?;
                if path.exists() {
                    return Err(ThemeError::AlreadyExists(path));
                }
                path
            }
            None => {
                let stamped = backup_name_at(&Local::now());
                backups.join(unique_name(&backups, &stamped, PackageType::Theme))
            }
        };

        let package = dir_name(&path);
        let layout = self.layout();
        tracing::info!(backup = %package, "Backing up live theme");

        let live = layout.live_theme_dir();
        if live.is_dir() {
            copy_directory(&live, &path)?;
        } else {
            create_dir_all(&path)?;
        }
        let external = self.backup_external_files(&path)?;
        tracing::debug!(external, "Copied icons and settings outside the theme directory");

        let mut base = ThemeManifest::create_default(
            &base_name(&package, PackageType::Theme),
            &self.config.author,
        );
        base.theme_info.description = format!("Backup of the live theme on {}", layout.platform());
        base.theme_info.device = layout.platform().to_string();
        let mut manifest = rebuild_theme_manifest(&path, layout, base);
        if manifest.preview_image.is_none() {
            export_preview(&path, &manifest)?;
            manifest.preview_image = Some(PREVIEW_FILENAME.to_string());
        }
        write_theme_manifest(&path, &mut manifest)?;

        let rotation = self.rotate_backups()?;
        tracing::info!(
            backup = %package,
            files = manifest.path_mappings.len(),
            deleted = rotation.deleted.len(),
            "Backup complete"
        );
        Ok(BackupReport {
            name: package,
            path,
            content: manifest.content,
            rotation,
        })
    }

    /// Copy tool, collection and top-level icons plus the shared settings
    /// files into their package locations.
    fn backup_external_files(&self, package_dir: &Path) -> ThemeResult<usize> {
        let layout = self.layout();
        let mut copied = 0;

        let icon_dirs = [
            (layout.tools_media_dir(), TOOL_ICONS_DIR),
            (layout.collections_media_dir(), COLLECTION_ICONS_DIR),
        ];
        for (source_dir, package_subdir) in icon_dirs {
            for relative in list_files(&source_dir) {
                if relative.components().count() != 1 {
                    continue;
                }
                let name = relative.to_string_lossy();
                if !name.to_ascii_lowercase().ends_with(".png") {
                    continue;
                }
                let target = package_dir.join(ICONS_DIR).join(package_subdir).join(&relative);
                copy_file(&source_dir.join(&relative), &target)?;
                copied += 1;
            }
        }

        for stem in ROOT_MEDIA_NAMES {
            let Some(mapping) = classify::system_icon(layout, &format!("{}.png", stem)) else {
                continue;
            };
            let source = layout.localize(&mapping.device_path);
            if source.is_file() {
                copy_file(&source, &mapping.source_in(package_dir))?;
                copied += 1;
            }
        }

        for source in [layout.accent_settings_file(), layout.led_settings_file()] {
            if let Some(file_name) = source.file_name().filter(|_| source.is_file()) {
                copy_file(&source, &package_dir.join(SETTINGS_DIR).join(file_name))?;
                copied += 1;
            }
        }

        Ok(copied)
    }

    /// Delete the oldest backups matching the rotation pattern until at most
    /// `max_backups` remain.
    ///
    /// A backup that cannot be deleted is logged and left in place.
    pub fn rotate_backups(&self) -> ThemeResult<RotationReport> {
        let pattern = glob::Pattern::new(&self.config.backup_pattern).map_err(|e| {
            ThemeError::InvalidPattern {
                pattern: self.config.backup_pattern.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut candidates: Vec<PackageEntry> = self
            .store
            .list_backups()
            .into_iter()
            .filter(|entry| pattern.matches(&entry.name))
            .collect();

        let max = self.config.max_backups;
        if max == 0 || candidates.len() <= max {
            return Ok(RotationReport {
                kept: candidates.len(),
                ..RotationReport::default()
            });
        }

        candidates.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)));
        let excess = candidates.len() - max;
        let mut report = RotationReport::default();
        for entry in candidates.iter().take(excess) {
            match self.store.delete_package(&entry.path) {
                Ok(_) => {
                    tracing::info!(backup = %entry.name, "Rotated out old backup");
                    report.deleted.push(entry.name.clone());
                }
                Err(e) => {
                    tracing::warn!(backup = %entry.name, error = %e, "Failed to delete old backup");
                    report.failed.push(entry.name.clone());
                }
            }
        }
        report.kept = candidates.len() - report.deleted.len();
        Ok(report)
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Vec<PackageEntry> {
        let mut backups = self.store.list_backups();
        backups.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.name.cmp(&a.name)));
        backups
    }
}
