//! Placing package files on the device.
//!
//! Shared by Apply, Restore and Import. Placement is not transactional: a
//! failure leaves whatever was already written.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::{ThemeError, ThemeResult};
use super::report::PlacementCounts;
use crate::device::DeviceLayout;
use crate::manifest::{AccentColors, ContentCategory, LedSettings, PathMapping, ThemeManifest};
use crate::transfer::{
    clean_directory, copy_directory_filtered, copy_file, remove_file, replace_directory,
};

/// Package path with empty, `.` and `..` segments removed.
pub(crate) fn normalize_package_path(package_path: &str) -> String {
    package_path
        .split('/')
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .collect::<Vec<_>>()
        .join("/")
}

fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_png(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".png")
}

/// Remove every icon a theme may have placed outside the live theme
/// directory: all `*.png` in the tool and collection `.media` folders and
/// the three top-level folder icons.
pub(crate) fn clear_external_icons(layout: &DeviceLayout) -> ThemeResult<usize> {
    let mut removed = 0;
    for dir in [layout.tools_media_dir(), layout.collections_media_dir()] {
        removed += clean_directory(&dir, &|name: &str| !is_png(name))?;
    }
    for icon in [
        layout.collections_icon(),
        layout.recently_played_icon(),
        layout.tools_icon(),
    ] {
        if icon.is_file() {
            remove_file(&icon)?;
            removed += 1;
        }
    }
    tracing::debug!(removed, "Cleared external icons");
    Ok(removed)
}

/// Copy one mapped file from a package to its device location.
///
/// Missing package files and device paths outside the SD card are counted
/// and skipped.
pub(crate) fn place_mapping(
    layout: &DeviceLayout,
    package_dir: &Path,
    mapping: &PathMapping,
    counts: &mut PlacementCounts,
) -> ThemeResult<Option<PathBuf>> {
    let source = mapping.source_in(package_dir);
    if !source.is_file() {
        tracing::warn!(
            package_path = %mapping.package_path,
            "Mapped file missing from package, skipping"
        );
        counts.dangling += 1;
        return Ok(None);
    }
    let Some(target) = layout.resolve(&mapping.device_path) else {
        tracing::warn!(
            device_path = %mapping.device_path,
            "Device path outside the SD card, skipping"
        );
        counts.rejected += 1;
        return Ok(None);
    };
    copy_file(&source, &target)?;
    if layout.is_in_live_theme(&target) {
        counts.theme_files += 1;
    } else {
        counts.external_files += 1;
    }
    Ok(Some(target))
}

fn read_settings_text(path: &Path) -> ThemeResult<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ThemeError::SettingsFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn write_settings_text(path: &Path, text: &str) -> ThemeResult<()> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)
    };
    write().map_err(|e| ThemeError::SettingsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Merge an accent palette into the shared accent settings file.
pub(crate) fn write_accent_settings(
    layout: &DeviceLayout,
    colors: &AccentColors,
) -> ThemeResult<()> {
    let path = layout.accent_settings_file();
    let merged = colors.merge_into_settings_text(&read_settings_text(&path)?);
    write_settings_text(&path, &merged)?;
    tracing::info!(file = %path.display(), "Wrote accent colors");
    Ok(())
}

/// Merge an LED profile into the shared LED settings file.
pub(crate) fn write_led_settings(
    layout: &DeviceLayout,
    settings: &LedSettings,
) -> ThemeResult<()> {
    let path = layout.led_settings_file();
    let merged = settings
        .merge_into_settings_text(&read_settings_text(&path)?)
        .map_err(|reason| ThemeError::SettingsFile {
            path: path.clone(),
            reason,
        })?;
    write_settings_text(&path, &merged)?;
    tracing::info!(file = %path.display(), "Wrote LED settings");
    Ok(())
}

/// Replace the live theme with a full theme package.
///
/// 1. The live theme directory is removed and recreated.
/// 2. The package tree is copied into it, leaving out every file whose
///    mapping targets a location outside the live theme directory.
/// 3. In-theme mappings whose device path differs from the mirrored
///    location are copied there as well.
/// 4. External icons are cleared, then placed per mapping.
/// 5. Accent and LED blocks are merged into the shared settings files when
///    the theme carries them.
pub(crate) fn install_theme_tree(
    layout: &DeviceLayout,
    package_dir: &Path,
    manifest: &ThemeManifest,
) -> ThemeResult<PlacementCounts> {
    let live = layout.live_theme_dir();
    let mut counts = PlacementCounts::default();

    let mut in_theme = Vec::new();
    let mut external = Vec::new();
    let mut excluded = HashSet::new();
    for (category, mapping) in manifest.path_mappings.iter() {
        let key = normalize_package_path(&mapping.package_path);
        match layout.resolve(&mapping.device_path) {
            Some(target) if target.starts_with(&live) => in_theme.push((key, target, mapping)),
            _ => {
                excluded.insert(key);
                if !matches!(category, ContentCategory::Accents | ContentCategory::Leds) {
                    external.push(mapping);
                }
            }
        }
    }

    replace_directory(&live)?;
    counts.theme_files = copy_directory_filtered(package_dir, &live, &|relative: &Path| {
        excluded.contains(&relative_key(relative))
    })?;
    tracing::debug!(files = counts.theme_files, excluded = excluded.len(), "Copied theme tree");

    for (key, target, mapping) in in_theme {
        let source = mapping.source_in(package_dir);
        if !source.is_file() {
            tracing::warn!(package_path = %mapping.package_path, "Mapped file missing from package");
            counts.dangling += 1;
            continue;
        }
        if target != live.join(&key) {
            copy_file(&source, &target)?;
            counts.theme_files += 1;
        }
    }

    counts.cleared = clear_external_icons(layout)?;
    for mapping in external {
        place_mapping(layout, package_dir, mapping, &mut counts)?;
    }

    if manifest.content.accents.is_populated() {
        write_accent_settings(layout, &manifest.accent_colors)?;
        counts.settings_written += 1;
    }
    if manifest.content.leds.is_populated() {
        write_led_settings(layout, &manifest.led_settings)?;
        counts.settings_written += 1;
    }

    Ok(counts)
}
