//! Snapshot the live device into a new theme package.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::error::{ThemeError, ThemeResult};
use super::report::ExportReport;
use super::{dir_name, ThemeManager};
use crate::device::{SystemDirectory, COLLECTIONS, RECENTLY_PLAYED, TOOLS};
use crate::manifest::classify::{
    self, classify_theme_file, LIST_SUFFIX, ROOT_WALLPAPER, THEME_PACKAGE_DIRS,
};
use crate::manifest::{
    write_theme_manifest, AccentColors, ContentCategory, LedSettings, PathMapping, ThemeManifest,
    WallpaperType, ALL_SYSTEMS, PREVIEW_FILENAME,
};
use crate::package::{base_name, next_sequential_name, PackageType, EXPORT_PREFIX};
use crate::preview::write_placeholder;
use crate::transfer::{copy_file, create_dir_all, list_files};

type Candidates = BTreeMap<String, (ContentCategory, PathMapping)>;

fn add(candidates: &mut Candidates, category: ContentCategory, mapping: Option<PathMapping>) {
    if let Some(mapping) = mapping {
        candidates
            .entry(mapping.package_path.clone())
            .or_insert((category, mapping));
    }
}

/// Top-level file names of a directory.
fn file_names(dir: &Path) -> Vec<String> {
    list_files(dir)
        .into_iter()
        .filter(|relative| relative.components().count() == 1)
        .map(|relative| relative.to_string_lossy().to_string())
        .collect()
}

impl<D: SystemDirectory> ThemeManager<D> {
    /// Export the live device state as a new theme package in `Exports/`.
    ///
    /// Without a name the package is called `theme_N.theme`, one above the
    /// highest existing number. An explicit name that already exists is an
    /// error. Locations that do not exist on the device are skipped.
    pub fn export_theme(&self, name: Option<&str>) -> ThemeResult<ExportReport> {
        let exports = self.store.exports_dir();
        let path = match name {
            Some(name) => {
                let path = self.store.export_path(name)?;
                if path.exists() {
                    return Err(ThemeError::AlreadyExists(path));
                }
                path
            }
            None => exports.join(next_sequential_name(
                &exports,
                EXPORT_PREFIX,
                PackageType::Theme,
            )),
        };
        for dir in THEME_PACKAGE_DIRS {
            create_dir_all(&path.join(dir))?;
        }

        let package = dir_name(&path);
        let layout = self.layout();
        tracing::info!(export = %package, "Exporting live theme");

        let mut manifest = ThemeManifest::create_default(
            &base_name(&package, PackageType::Theme),
            &self.config.author,
        );
        manifest.theme_info.description = format!("Exported from {}", layout.platform());
        manifest.theme_info.device = layout.platform().to_string();

        let candidates = self.export_candidates();
        let checked = candidates.len();
        for (category, mapping) in candidates.into_values() {
            let Some(source) = layout.resolve(&mapping.device_path) else {
                continue;
            };
            if !source.is_file() {
                continue;
            }
            if let Err(e) = copy_file(&source, &mapping.source_in(&path)) {
                tracing::warn!(error = %e, %category, "Failed to export file, skipping");
                continue;
            }
            manifest.path_mappings.get_mut(category).push(mapping);
        }
        self.export_settings(&path, &mut manifest);

        let systems = manifest.mapped_system_tags();
        manifest.theme_info.systems = if systems.is_empty() {
            vec![ALL_SYSTEMS.to_string()]
        } else {
            systems
        };

        let placeholder_preview = !export_preview(&path, &manifest)?;
        manifest.preview_image = Some(PREVIEW_FILENAME.to_string());
        write_theme_manifest(&path, &mut manifest)?;

        tracing::info!(
            export = %package,
            files = manifest.path_mappings.len(),
            checked,
            "Export complete"
        );
        Ok(ExportReport {
            name: package,
            path,
            content: manifest.content.clone(),
            checked,
            placeholder_preview,
        })
    }

    /// Every known live location, keyed by package path.
    ///
    /// Locations come from the installed systems, tools and collections,
    /// plus whatever is already present in the live theme directory and the
    /// icon folders.
    fn export_candidates(&self) -> Candidates {
        let layout = self.layout();
        let systems = self.systems.systems();
        let tools = self.systems.tools();
        let collections = self.systems.collections();
        let mut candidates = Candidates::new();

        let mut wallpaper_stems = vec![ROOT_WALLPAPER.to_string()];
        for stem in [COLLECTIONS, RECENTLY_PLAYED, TOOLS] {
            wallpaper_stems.push(stem.to_string());
            wallpaper_stems.push(format!("{}{}", stem, LIST_SUFFIX));
        }
        for system in &systems {
            wallpaper_stems.push(system.folder_name.clone());
            wallpaper_stems.push(format!("{}{}", system.folder_name, LIST_SUFFIX));
        }
        for stem in &wallpaper_stems {
            let file = format!("{}.png", stem);
            add(
                &mut candidates,
                ContentCategory::Wallpapers,
                classify::system_wallpaper(layout, &file),
            );
        }

        for collection in &collections {
            let file = format!("{}.png", collection);
            add(
                &mut candidates,
                ContentCategory::Wallpapers,
                classify::collection_wallpaper(layout, &file),
            );
            add(
                &mut candidates,
                ContentCategory::Icons,
                classify::collection_icon(layout, &file),
            );
        }

        for stem in [COLLECTIONS, RECENTLY_PLAYED, TOOLS] {
            add(
                &mut candidates,
                ContentCategory::Icons,
                classify::system_icon(layout, &format!("{}.png", stem)),
            );
        }
        for system in &systems {
            add(
                &mut candidates,
                ContentCategory::Icons,
                classify::system_icon(layout, &format!("{}.png", system.folder_name)),
            );
        }
        for tool in &tools {
            add(
                &mut candidates,
                ContentCategory::Icons,
                classify::tool_icon(layout, &format!("{}.png", tool)),
            );
        }
        for file in file_names(&layout.tools_media_dir()) {
            add(
                &mut candidates,
                ContentCategory::Icons,
                classify::tool_icon(layout, &file),
            );
        }
        for file in file_names(&layout.collections_media_dir()) {
            add(
                &mut candidates,
                ContentCategory::Icons,
                classify::collection_icon(layout, &file),
            );
        }

        let live = layout.live_theme_dir();
        for system in &systems {
            let dir = live.join(classify::OVERLAYS_DIR).join(&system.tag);
            for file in file_names(&dir) {
                add(
                    &mut candidates,
                    ContentCategory::Overlays,
                    classify::overlay(layout, &system.tag, &file),
                );
            }
        }

        for slot in classify::FONT_SLOTS {
            add(
                &mut candidates,
                ContentCategory::Fonts,
                classify::font(layout, &format!("{}.ttf", slot)),
            );
        }

        for relative in list_files(&live) {
            if let Some((category, mapping)) = classify_theme_file(layout, &relative) {
                if !matches!(category, ContentCategory::Accents | ContentCategory::Leds) {
                    add(&mut candidates, category, Some(mapping));
                }
            }
        }

        candidates
    }

    /// Copy the shared settings files when they carry a palette or LED
    /// profile, and record the parsed blocks.
    fn export_settings(&self, package_dir: &Path, manifest: &mut ThemeManifest) {
        let layout = self.layout();

        let accent = classify::accent_settings(layout);
        let accent_file = layout.accent_settings_file();
        if let Some(colors) = fs::read_to_string(&accent_file)
            .ok()
            .and_then(|text| AccentColors::from_settings_text(&text))
        {
            match copy_file(&accent_file, &accent.source_in(package_dir)) {
                Ok(_) => {
                    manifest.accent_colors = colors;
                    manifest.path_mappings.accents.push(accent);
                }
                Err(e) => tracing::warn!(error = %e, "Failed to export accent settings"),
            }
        }

        let led = classify::led_settings(layout);
        let led_file = layout.led_settings_file();
        let parsed = match fs::read_to_string(&led_file) {
            Ok(text) => LedSettings::from_settings_text(&text),
            Err(_) => Ok(None),
        };
        match parsed {
            Ok(Some(settings)) => match copy_file(&led_file, &led.source_in(package_dir)) {
                Ok(_) => {
                    manifest.led_settings = settings;
                    manifest.path_mappings.leds.push(led);
                }
                Err(e) => tracing::warn!(error = %e, "Failed to export LED settings"),
            },
            Ok(None) => {}
            Err(reason) => {
                tracing::warn!(file = %led_file.display(), %reason, "Unreadable LED settings")
            }
        }
    }
}

/// Write `preview.png` from the main wallpaper.
///
/// Returns `false` when no main wallpaper was exported and a placeholder
/// was generated instead.
pub(super) fn export_preview(package_dir: &Path, manifest: &ThemeManifest) -> ThemeResult<bool> {
    let preview = package_dir.join(PREVIEW_FILENAME);
    let main = manifest
        .path_mappings
        .wallpapers
        .iter()
        .find(|mapping| mapping.wallpaper_type() == Some(WallpaperType::Main));
    if let Some(mapping) = main {
        copy_file(&mapping.source_in(package_dir), &preview)?;
        return Ok(true);
    }
    write_placeholder(&preview)?;
    Ok(false)
}
