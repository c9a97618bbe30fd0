//! Derive a theme manifest from the raw contents of a package directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::classify::{classify_theme_file, OVERLAYS_DIR};
use super::settings::{AccentColors, LedSettings};
use super::theme::{ContentCategory, ThemeManifest, ALL_SYSTEMS, PREVIEW_FILENAME};
use crate::device::{parse_system_tag, DeviceLayout};
use crate::transfer::list_files;

/// Recompute every content field of `base` from the files in `package_dir`.
///
/// Descriptive fields of `base` are kept. Mapping lists, counts, settings
/// blocks read from `Settings/`, the preview and the system list are
/// replaced.
///
/// Systems are collected from the package's top-level content rather than
/// from the mappings alone: tags on classified files, every folder under
/// `Overlays/`, and any other file named `<System> (<TAG>).<ext>`. When
/// none is found the list is `["all"]`.
pub fn rebuild_theme_manifest(
    package_dir: &Path,
    layout: &DeviceLayout,
    base: ThemeManifest,
) -> ThemeManifest {
    let mut manifest = base;
    for category in ContentCategory::ALL {
        manifest.path_mappings.get_mut(category).clear();
    }

    let files = list_files(package_dir);
    for relative in &files {
        let Some((category, mapping)) = classify_theme_file(layout, relative) else {
            continue;
        };
        let source = package_dir.join(relative);
        match category {
            ContentCategory::Accents => {
                match fs::read_to_string(&source)
                    .ok()
                    .and_then(|text| AccentColors::from_settings_text(&text))
                {
                    Some(colors) => manifest.accent_colors = colors,
                    None => {
                        tracing::warn!(file = %source.display(), "No accent colors in settings file");
                        continue;
                    }
                }
            }
            ContentCategory::Leds => {
                let parsed = fs::read_to_string(&source)
                    .map_err(|e| e.to_string())
                    .and_then(|text| LedSettings::from_settings_text(&text));
                match parsed {
                    Ok(Some(settings)) => manifest.led_settings = settings,
                    Ok(None) => {
                        tracing::warn!(file = %source.display(), "No LED zones in settings file");
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(file = %source.display(), error = %e, "Unreadable LED settings");
                        continue;
                    }
                }
            }
            _ => {}
        }
        manifest.path_mappings.get_mut(category).push(mapping);
    }

    let systems = package_system_tags(package_dir, &files, &manifest);
    manifest.theme_info.systems = if systems.is_empty() {
        vec![ALL_SYSTEMS.to_string()]
    } else {
        systems
    };
    manifest.preview_image = package_dir
        .join(PREVIEW_FILENAME)
        .is_file()
        .then(|| PREVIEW_FILENAME.to_string());
    manifest.refresh_content();
    manifest
}

fn package_system_tags(
    package_dir: &Path,
    files: &[PathBuf],
    manifest: &ThemeManifest,
) -> Vec<String> {
    let mut tags: BTreeSet<String> = manifest.mapped_system_tags().into_iter().collect();

    if let Ok(entries) = fs::read_dir(package_dir.join(OVERLAYS_DIR)) {
        tags.extend(
            entries
                .flatten()
                .filter(|entry| entry.path().is_dir())
                .map(|entry| entry.file_name().to_string_lossy().to_string())
                .filter(|name| !name.starts_with('.')),
        );
    }

    tags.extend(
        files
            .iter()
            .filter_map(|relative| relative.file_name())
            .filter_map(|name| parse_system_tag(&name.to_string_lossy())),
    );
    tags.into_iter().collect()
}
