//! Install a single component package over the live theme.

use std::collections::BTreeSet;

use super::error::{ThemeError, ThemeResult};
use super::placement::{
    clear_external_icons, place_mapping, write_accent_settings, write_led_settings,
};
use super::report::{ImportReport, PlacementCounts};
use super::{dir_name, ThemeManager};
use crate::device::SystemDirectory;
use crate::manifest::classify::{
    FONTS_DIR, ICONS_DIR, OVERLAYS_DIR, OVERLAY_SYSTEMS_DIR, SYSTEM_ICONS_DIR, WALLPAPERS_DIR,
};
use crate::manifest::{
    read_component_manifest, validate_component, ComponentManifest, ManifestError, PathMapping,
};
use crate::state::AppliedState;
use crate::transfer::replace_directory;

/// System tags of overlay mappings, from metadata or the `Systems/<TAG>/` path.
fn overlay_tags(mappings: &[PathMapping]) -> BTreeSet<String> {
    mappings
        .iter()
        .filter_map(|mapping| {
            mapping.system_tag().map(str::to_string).or_else(|| {
                let mut parts = mapping.package_path.split('/');
                match (parts.next(), parts.next()) {
                    (Some(OVERLAY_SYSTEMS_DIR), Some(tag)) if !tag.is_empty() => {
                        Some(tag.to_string())
                    }
                    _ => None,
                }
            })
        })
        .filter(|tag| !tag.contains("..") && !tag.starts_with('.'))
        .collect()
}

impl<D: SystemDirectory> ThemeManager<D> {
    /// Install one component package.
    ///
    /// The parts of the live theme the component owns are replaced first:
    ///
    /// | component | replaced                                              |
    /// |-----------|-------------------------------------------------------|
    /// | wallpaper | `Theme/Wallpapers`                                    |
    /// | icon      | `Theme/Icons/SystemIcons` and every external icon     |
    /// | overlay   | `Theme/Overlays/<TAG>` for each tag in the component  |
    /// | font      | `Theme/Fonts`                                         |
    /// | accent    | accent keys of the shared settings file               |
    /// | LED       | zone sections of the shared LED settings file         |
    pub fn import_component(
        &self,
        name: &str,
        state: AppliedState,
    ) -> ThemeResult<(ImportReport, AppliedState)> {
        let (component_type, path) = self
            .store
            .locate_component(name)?
            .ok_or_else(|| ThemeError::ComponentNotFound(name.to_string()))?;

        let manifest = read_component_manifest(&path)?;
        if manifest.package_type() != component_type {
            return Err(ManifestError::TypeMismatch {
                path,
                expected: component_type,
                found: manifest.package_type(),
            }
            .into());
        }
        let issues = validate_component(&manifest);
        if !issues.is_empty() {
            return Err(ManifestError::Invalid { issues }.into());
        }

        let package = dir_name(&path);
        let layout = self.layout();
        let live = layout.live_theme_dir();
        let mut counts = PlacementCounts::default();
        tracing::info!(component = %package, r#type = %component_type, "Importing component");

        match &manifest {
            ComponentManifest::Wallpaper(_) => replace_directory(&live.join(WALLPAPERS_DIR))?,
            ComponentManifest::Icon(_) => {
                replace_directory(&live.join(ICONS_DIR).join(SYSTEM_ICONS_DIR))?;
                counts.cleared = clear_external_icons(layout)?;
            }
            ComponentManifest::Overlay(overlays) => {
                for tag in overlay_tags(&overlays.path_mappings) {
                    replace_directory(&live.join(OVERLAYS_DIR).join(tag))?;
                }
            }
            ComponentManifest::Font(_) => replace_directory(&live.join(FONTS_DIR))?,
            ComponentManifest::Accent(accent) => {
                write_accent_settings(layout, &accent.accent_colors)?;
                counts.settings_written += 1;
            }
            ComponentManifest::Led(led) => {
                write_led_settings(layout, &led.led_settings)?;
                counts.settings_written += 1;
            }
        }

        for mapping in manifest.mappings() {
            place_mapping(layout, &path, mapping, &mut counts)?;
        }

        tracing::info!(
            component = %package,
            files = counts.files(),
            dangling = counts.dangling,
            "Component imported"
        );
        let report = ImportReport {
            name: package.clone(),
            component_type,
            counts,
        };
        Ok((report, state.with_component(component_type, package)))
    }
}
