//! Split a full theme into component packages.

use std::path::{Path, PathBuf};

use super::error::{ThemeError, ThemeResult};
use super::report::{DeconstructReport, ExtractedComponent};
use super::{dir_name, ensure_valid, ThemeManager};
use crate::device::{SystemDirectory, RECENTLY_PLAYED};
use crate::manifest::{
    component_path, read_theme_manifest, write_component_manifest, ComponentManifest,
    ContentCategory, IconType, PathMapping, Strictness, ThemeManifest, WallpaperType,
    PREVIEW_FILENAME,
};
use crate::package::{base_name, component_name};
use crate::preview::{accent_swatch_colors, led_swatch_colors, write_placeholder, write_swatch};
use crate::transfer::{copy_file, replace_directory};

impl<D: SystemDirectory> ThemeManager<D> {
    /// Extract every populated category of a theme into its own component.
    ///
    /// Components are named after the theme (`Neon.theme` gives `Neon.bg`,
    /// `Neon.icon`, ...) and replace any existing component of that name.
    /// A category that fails is logged and reported as skipped; the call
    /// only fails when no component could be extracted at all.
    pub fn deconstruct_theme(&self, name: &str) -> ThemeResult<DeconstructReport> {
        let path = self
            .store
            .locate_theme(name)?
            .ok_or_else(|| ThemeError::ThemeNotFound(name.to_string()))?;
        let manifest = read_theme_manifest(&path)?;
        ensure_valid(&manifest, Strictness::Strict)?;

        let theme = dir_name(&path);
        tracing::info!(theme = %theme, "Deconstructing theme");

        let mut report = DeconstructReport {
            theme: theme.clone(),
            components: Vec::new(),
            skipped: Vec::new(),
        };
        for category in manifest.populated_categories() {
            match self.extract_component(&path, &theme, &manifest, category) {
                Ok(component) => {
                    tracing::info!(
                        component = %component.name,
                        files = component.files,
                        "Extracted component"
                    );
                    report.components.push(component);
                }
                Err(e) => {
                    tracing::warn!(%category, error = %e, "Skipping category");
                    report.skipped.push((category, e.to_string()));
                }
            }
        }

        if report.components.is_empty() {
            return Err(ThemeError::NoComponentsExtracted(theme));
        }
        Ok(report)
    }

    fn extract_component(
        &self,
        theme_dir: &Path,
        theme: &str,
        manifest: &ThemeManifest,
        category: ContentCategory,
    ) -> ThemeResult<ExtractedComponent> {
        let component_type = category.package_type();
        let name = component_name(theme, component_type);
        let path = self.store.package_path(component_type, &name)?;

        let carries_files = !matches!(category, ContentCategory::Accents | ContentCategory::Leds);
        let mut files: Vec<(PathBuf, PathMapping)> = Vec::new();
        let mut dangling = 0;
        for mapping in manifest.path_mappings.get(category) {
            let Some(package_path) = component_path(category, mapping) else {
                if carries_files {
                    tracing::warn!(
                        package_path = %mapping.package_path,
                        %category,
                        "Mapping has no place in the component layout"
                    );
                    dangling += 1;
                }
                continue;
            };
            let source = mapping.source_in(theme_dir);
            if !source.is_file() {
                tracing::warn!(
                    package_path = %mapping.package_path,
                    "Mapped file missing from theme"
                );
                dangling += 1;
                continue;
            }
            files.push((source, mapping.rerooted(package_path)));
        }

        if carries_files && files.is_empty() {
            return Err(ThemeError::NothingToExtract(category));
        }

        replace_directory(&path)?;
        for (source, mapping) in &files {
            copy_file(source, &mapping.source_in(&path))?;
        }

        let mut component = ComponentManifest::create_minimal(
            category,
            &base_name(&name, component_type),
            &manifest.theme_info.author,
        );
        component.info_mut().description = format!("Extracted from {}", theme);
        match &mut component {
            ComponentManifest::Accent(accent) => accent.accent_colors = manifest.accent_colors,
            ComponentManifest::Led(led) => led.led_settings = manifest.led_settings,
            other => {
                if let Some(mappings) = other.mappings_mut() {
                    mappings.extend(files.iter().map(|(_, mapping)| mapping.clone()));
                }
            }
        }

        write_component_preview(&path, &component)?;
        component.set_preview_image(Some(PREVIEW_FILENAME.to_string()));
        write_component_manifest(&path, &mut component)?;

        Ok(ExtractedComponent {
            name: dir_name(&path),
            component_type,
            path,
            files: files.len(),
            dangling,
        })
    }
}

/// Pick or generate `preview.png` for a freshly extracted component.
fn write_component_preview(
    component_dir: &Path,
    component: &ComponentManifest,
) -> ThemeResult<()> {
    let preview = component_dir.join(PREVIEW_FILENAME);
    let mappings = component.mappings();

    let chosen = match component {
        ComponentManifest::Wallpaper(_) => mappings
            .iter()
            .find(|m| m.file_name() == format!("{}.png", RECENTLY_PLAYED))
            .or_else(|| {
                mappings
                    .iter()
                    .find(|m| m.wallpaper_type() == Some(WallpaperType::System))
            }),
        ComponentManifest::Icon(_) => mappings
            .iter()
            .find(|m| m.icon_type() == Some(IconType::System)),
        ComponentManifest::Overlay(_) => mappings.first(),
        ComponentManifest::Font(_) => None,
        ComponentManifest::Accent(accent) => {
            write_swatch(&preview, &accent_swatch_colors(&accent.accent_colors))?;
            return Ok(());
        }
        ComponentManifest::Led(led) => {
            write_swatch(&preview, &led_swatch_colors(&led.led_settings))?;
            return Ok(());
        }
    };

    match chosen {
        Some(mapping) => {
            copy_file(&mapping.source_in(component_dir), &preview)?;
        }
        None => write_placeholder(&preview)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceLayout;
    use crate::engine::ManagerConfig;
    use crate::manifest::{classify, read_component_manifest, write_theme_manifest};
    use crate::package::PackageType;
    use std::fs;
    use tempfile::TempDir;

    fn manager(temp: &TempDir) -> ThemeManager {
        let layout = DeviceLayout::new(temp.path().join("sd"), "tg5040");
        ThemeManager::new(ManagerConfig::new(layout).with_data_dir(temp.path().join("data")))
    }

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn sample_theme(manager: &ThemeManager) -> PathBuf {
        let layout = manager.layout();
        let dir = manager.store().themes_dir().join("Neon.theme");
        write(&dir.join("Wallpapers/SystemWallpapers/Recently Played.png"), "recent");
        write(&dir.join("Wallpapers/SystemWallpapers/Game Boy (GB).png"), "gb");
        write(&dir.join("Overlays/GB/grid.png"), "grid");

        let mut manifest = ThemeManifest::create_default("Neon", "Jane");
        manifest.theme_info.description = "Pink".to_string();
        manifest.path_mappings.wallpapers = vec![
            classify::system_wallpaper(layout, "Recently Played.png").unwrap(),
            classify::system_wallpaper(layout, "Game Boy (GB).png").unwrap(),
        ];
        manifest.path_mappings.overlays = vec![
            classify::overlay(layout, "GB", "grid.png").unwrap(),
            classify::overlay(layout, "GB", "missing.png").unwrap(),
        ];
        manifest.path_mappings.accents = vec![classify::accent_settings(layout)];
        write_theme_manifest(&dir, &mut manifest).unwrap();
        dir
    }

    #[test]
    fn test_deconstruct_extracts_populated_categories() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        sample_theme(&manager);

        let report = manager.deconstruct_theme("Neon").unwrap();
        let names: Vec<&str> = report.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Neon.bg", "Neon.over", "Neon.acc"]);
        assert!(report.skipped.is_empty());

        let overlays = &report.components[1];
        assert_eq!(overlays.files, 1);
        assert_eq!(overlays.dangling, 1);
        assert!(overlays.path.join("Systems/GB/grid.png").is_file());

        let wallpapers = read_component_manifest(&report.components[0].path).unwrap();
        assert_eq!(wallpapers.info().author, "Jane");
        assert_eq!(wallpapers.mappings().len(), 2);
        assert_eq!(
            fs::read_to_string(report.components[0].path.join(PREVIEW_FILENAME)).unwrap(),
            "recent"
        );
        assert!(report.components[2].path.join(PREVIEW_FILENAME).is_file());
    }

    #[test]
    fn test_unplaceable_overlay_counts_as_dangling() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let dir = sample_theme(&manager);
        write(&dir.join("grid.png"), "loose");

        let mut manifest = read_theme_manifest(&dir).unwrap();
        let mut loose = classify::overlay(manager.layout(), "GB", "grid.png").unwrap();
        loose.package_path = "grid.png".to_string();
        loose.metadata.clear();
        manifest.path_mappings.overlays.push(loose);
        write_theme_manifest(&dir, &mut manifest).unwrap();

        let report = manager.deconstruct_theme("Neon").unwrap();
        let overlays = report
            .components
            .iter()
            .find(|c| c.component_type == PackageType::Overlay)
            .unwrap();
        assert_eq!(overlays.files, 1);
        assert_eq!(overlays.dangling, 2);

        let accents = report
            .components
            .iter()
            .find(|c| c.component_type == PackageType::Accent)
            .unwrap();
        assert_eq!(accents.dangling, 0);
    }

    #[test]
    fn test_deconstruct_replaces_existing_component() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        sample_theme(&manager);
        let stale = manager
            .store()
            .package_path(PackageType::Wallpaper, "Neon")
            .unwrap()
            .join("stale.png");
        write(&stale, "old");

        manager.deconstruct_theme("Neon").unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn test_deconstruct_with_only_missing_files_fails() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let dir = manager.store().themes_dir().join("Ghost.theme");
        let mut manifest = ThemeManifest::create_default("Ghost", "Jane");
        manifest.theme_info.description = "Nothing here".to_string();
        manifest.path_mappings.fonts =
            vec![classify::font(manager.layout(), "OG.ttf").unwrap()];
        write_theme_manifest(&dir, &mut manifest).unwrap();

        let err = manager.deconstruct_theme("Ghost").unwrap_err();
        assert!(matches!(err, ThemeError::NoComponentsExtracted(_)));
    }
}
