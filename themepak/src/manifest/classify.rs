//! Package layout and filename classification.
//!
//! These builders are the only place file names are interpreted. They run
//! when a manifest is first derived from raw files (export, backup rebuild);
//! once written, the mapping list is authoritative.
//!
//! # Full Theme Layout
//!
//! ```text
//! <name>.theme/
//! ├── manifest.json
//! ├── preview.png
//! ├── Wallpapers/
//! │   ├── SystemWallpapers/     Root.png, Recently Played.png, Tools.png,
//! │   │                         Collections.png, <System (TAG)>.png, *-list.png
//! │   └── CollectionWallpapers/ <collection>.png
//! ├── Icons/
//! │   ├── SystemIcons/          <System (TAG)>.png, Collections.png, ...
//! │   ├── ToolIcons/            <tool>.png
//! │   └── CollectionIcons/      <collection>.png
//! ├── Overlays/<TAG>/*.png
//! ├── Fonts/                    OG.ttf, Next.ttf, OG.backup.ttf, Next.backup.ttf
//! └── Settings/                 minuisettings.txt, ledsettings_brick.txt
//! ```

use std::path::{Path, PathBuf};

use super::mapping::{
    IconType, PathMapping, SettingsKind, WallpaperType, FONT_SLOT, ICON_TYPE, LOCATION,
    SETTINGS_KIND, SYSTEM_TAG, WALLPAPER_TYPE,
};
use super::theme::ContentCategory;
use crate::device::{
    parse_system_tag, DeviceLayout, ACCENT_SETTINGS_FILE, COLLECTIONS, LED_SETTINGS_FILE,
    RECENTLY_PLAYED, TOOLS,
};

pub const WALLPAPERS_DIR: &str = "Wallpapers";
pub const SYSTEM_WALLPAPERS_DIR: &str = "SystemWallpapers";
pub const COLLECTION_WALLPAPERS_DIR: &str = "CollectionWallpapers";
/// Wallpaper component only: list-view variants.
pub const LIST_WALLPAPERS_DIR: &str = "ListWallpapers";
pub const ICONS_DIR: &str = "Icons";
pub const SYSTEM_ICONS_DIR: &str = "SystemIcons";
pub const TOOL_ICONS_DIR: &str = "ToolIcons";
pub const COLLECTION_ICONS_DIR: &str = "CollectionIcons";
pub const OVERLAYS_DIR: &str = "Overlays";
/// Overlay component only: per-system folders.
pub const OVERLAY_SYSTEMS_DIR: &str = "Systems";
pub const FONTS_DIR: &str = "Fonts";
pub const SETTINGS_DIR: &str = "Settings";

/// Main menu wallpaper stem.
pub const ROOT_WALLPAPER: &str = "Root";

/// Suffix marking a list-view wallpaper variant.
pub const LIST_SUFFIX: &str = "-list";

/// Recognized font slot stems.
pub const FONT_SLOTS: [&str; 4] = ["OG", "Next", "OG.backup", "Next.backup"];

/// Folder names whose icons live in the root `.media` directory.
pub const ROOT_MEDIA_NAMES: [&str; 3] = [COLLECTIONS, RECENTLY_PLAYED, TOOLS];

/// Directories every full theme package is created with.
pub const THEME_PACKAGE_DIRS: [&str; 8] = [
    "Wallpapers/SystemWallpapers",
    "Wallpapers/CollectionWallpapers",
    "Icons/SystemIcons",
    "Icons/ToolIcons",
    "Icons/CollectionIcons",
    "Overlays",
    "Fonts",
    "Settings",
];

const IMAGE_EXTENSION: &str = ".png";
const FONT_EXTENSION: &str = ".ttf";

fn png_stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(IMAGE_EXTENSION)
        .filter(|stem| !stem.is_empty() && !stem.starts_with('.'))
}

/// Classify a system wallpaper file name.
///
/// ```
/// use themepak::manifest::{classify_wallpaper, WallpaperType};
///
/// assert_eq!(classify_wallpaper("Root.png"), Some((WallpaperType::Main, None)));
/// assert_eq!(classify_wallpaper("Tools.png"), Some((WallpaperType::Media, None)));
/// assert_eq!(
///     classify_wallpaper("Game Boy (GB).png"),
///     Some((WallpaperType::System, Some("GB".to_string())))
/// );
/// assert_eq!(
///     classify_wallpaper("Game Boy (GB)-list.png"),
///     Some((WallpaperType::List, Some("GB".to_string())))
/// );
/// assert_eq!(classify_wallpaper("notes.txt"), None);
/// ```
pub fn classify_wallpaper(file_name: &str) -> Option<(WallpaperType, Option<String>)> {
    let stem = png_stem(file_name)?;
    if let Some(base) = stem.strip_suffix(LIST_SUFFIX) {
        return Some((WallpaperType::List, parse_system_tag(base)));
    }
    if stem == ROOT_WALLPAPER {
        return Some((WallpaperType::Main, None));
    }
    if ROOT_MEDIA_NAMES.contains(&stem) {
        return Some((WallpaperType::Media, None));
    }
    parse_system_tag(stem).map(|tag| (WallpaperType::System, Some(tag)))
}

/// Device path of a live theme file, recorded against the canonical root.
fn live_path(layout: &DeviceLayout, relative: &str) -> PathBuf {
    layout.canonical().live_theme_dir().join(relative)
}

fn with_tag(mapping: PathMapping, tag: Option<String>) -> PathMapping {
    match tag {
        Some(tag) => mapping.with_meta(SYSTEM_TAG, tag),
        None => mapping,
    }
}

/// Mapping for a file in `Wallpapers/SystemWallpapers/`.
pub fn system_wallpaper(layout: &DeviceLayout, file_name: &str) -> Option<PathMapping> {
    let (kind, tag) = classify_wallpaper(file_name)?;
    let relative = format!("{}/{}/{}", WALLPAPERS_DIR, SYSTEM_WALLPAPERS_DIR, file_name);
    let mapping = PathMapping::new(&relative, live_path(layout, &relative))
        .with_meta(WALLPAPER_TYPE, kind.as_str());
    Some(with_tag(mapping, tag))
}

/// Mapping for a file in `Wallpapers/CollectionWallpapers/`.
pub fn collection_wallpaper(layout: &DeviceLayout, file_name: &str) -> Option<PathMapping> {
    png_stem(file_name)?;
    let relative = format!(
        "{}/{}/{}",
        WALLPAPERS_DIR, COLLECTION_WALLPAPERS_DIR, file_name
    );
    Some(
        PathMapping::new(&relative, live_path(layout, &relative))
            .with_meta(WALLPAPER_TYPE, WallpaperType::Collection.as_str()),
    )
}

/// Mapping for a file in `Icons/SystemIcons/`.
///
/// Icons of the top-level folders are placed in the root `.media`
/// directory; every other system icon stays in the live theme.
pub fn system_icon(layout: &DeviceLayout, file_name: &str) -> Option<PathMapping> {
    let stem = png_stem(file_name)?;
    let relative = format!("{}/{}/{}", ICONS_DIR, SYSTEM_ICONS_DIR, file_name);
    if ROOT_MEDIA_NAMES.contains(&stem) {
        return Some(
            PathMapping::new(
                &relative,
                layout.canonical().root_media_dir().join(file_name),
            )
            .with_meta(ICON_TYPE, IconType::System.as_str())
            .with_meta(LOCATION, stem),
        );
    }
    let mapping = PathMapping::new(&relative, live_path(layout, &relative))
        .with_meta(ICON_TYPE, IconType::System.as_str());
    Some(with_tag(mapping, parse_system_tag(stem)))
}

/// Mapping for a file in `Icons/ToolIcons/`.
pub fn tool_icon(layout: &DeviceLayout, file_name: &str) -> Option<PathMapping> {
    let stem = png_stem(file_name)?;
    let relative = format!("{}/{}/{}", ICONS_DIR, TOOL_ICONS_DIR, file_name);
    Some(
        PathMapping::new(relative, layout.canonical().tools_media_dir().join(file_name))
            .with_meta(ICON_TYPE, IconType::Tool.as_str())
            .with_meta(LOCATION, stem),
    )
}

/// Mapping for a file in `Icons/CollectionIcons/`.
pub fn collection_icon(layout: &DeviceLayout, file_name: &str) -> Option<PathMapping> {
    let stem = png_stem(file_name)?;
    let relative = format!("{}/{}/{}", ICONS_DIR, COLLECTION_ICONS_DIR, file_name);
    Some(
        PathMapping::new(
            relative,
            layout.canonical().collections_media_dir().join(file_name),
        )
        .with_meta(ICON_TYPE, IconType::Collection.as_str())
        .with_meta(LOCATION, stem),
    )
}

/// Mapping for an overlay image of one system.
pub fn overlay(layout: &DeviceLayout, tag: &str, file_name: &str) -> Option<PathMapping> {
    png_stem(file_name)?;
    if tag.is_empty() || tag.starts_with('.') {
        return None;
    }
    let relative = format!("{}/{}/{}", OVERLAYS_DIR, tag, file_name);
    Some(
        PathMapping::new(&relative, live_path(layout, &relative))
            .with_meta(SYSTEM_TAG, tag),
    )
}

/// Mapping for a font file; only the four known slots are accepted.
pub fn font(layout: &DeviceLayout, file_name: &str) -> Option<PathMapping> {
    let slot = file_name.strip_suffix(FONT_EXTENSION)?;
    if !FONT_SLOTS.contains(&slot) {
        return None;
    }
    let relative = format!("{}/{}", FONTS_DIR, file_name);
    Some(
        PathMapping::new(&relative, live_path(layout, &relative))
            .with_meta(FONT_SLOT, slot),
    )
}

/// Mapping for the shared accent settings file.
pub fn accent_settings(layout: &DeviceLayout) -> PathMapping {
    PathMapping::new(
        format!("{}/{}", SETTINGS_DIR, ACCENT_SETTINGS_FILE),
        layout.canonical().accent_settings_file(),
    )
    .with_meta(SETTINGS_KIND, SettingsKind::Accent.as_str())
}

/// Mapping for the shared LED settings file.
pub fn led_settings(layout: &DeviceLayout) -> PathMapping {
    PathMapping::new(
        format!("{}/{}", SETTINGS_DIR, LED_SETTINGS_FILE),
        layout.canonical().led_settings_file(),
    )
    .with_meta(SETTINGS_KIND, SettingsKind::Led.as_str())
}

/// Classify a file of a full theme package by its relative path.
///
/// Returns `None` for files that belong to no category (the manifest,
/// the preview, stray files).
pub fn classify_theme_file(
    layout: &DeviceLayout,
    relative: &Path,
) -> Option<(ContentCategory, PathMapping)> {
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    let parts: Vec<&str> = parts.iter().map(String::as_str).collect();

    match parts.as_slice() {
        [WALLPAPERS_DIR, SYSTEM_WALLPAPERS_DIR, file] => {
            system_wallpaper(layout, file).map(|m| (ContentCategory::Wallpapers, m))
        }
        [WALLPAPERS_DIR, COLLECTION_WALLPAPERS_DIR, file] => {
            collection_wallpaper(layout, file).map(|m| (ContentCategory::Wallpapers, m))
        }
        [ICONS_DIR, SYSTEM_ICONS_DIR, file] => {
            system_icon(layout, file).map(|m| (ContentCategory::Icons, m))
        }
        [ICONS_DIR, TOOL_ICONS_DIR, file] => {
            tool_icon(layout, file).map(|m| (ContentCategory::Icons, m))
        }
        [ICONS_DIR, COLLECTION_ICONS_DIR, file] => {
            collection_icon(layout, file).map(|m| (ContentCategory::Icons, m))
        }
        [OVERLAYS_DIR, tag, file] => {
            overlay(layout, tag, file).map(|m| (ContentCategory::Overlays, m))
        }
        [FONTS_DIR, file] => font(layout, file).map(|m| (ContentCategory::Fonts, m)),
        [SETTINGS_DIR, file] if *file == ACCENT_SETTINGS_FILE => {
            Some((ContentCategory::Accents, accent_settings(layout)))
        }
        [SETTINGS_DIR, file] if *file == LED_SETTINGS_FILE => {
            Some((ContentCategory::Leds, led_settings(layout)))
        }
        _ => None,
    }
}

/// Package path of a theme mapping once moved into a component package.
///
/// Returns `None` for categories whose components carry no files.
///
/// | category   | theme path                            | component path                  |
/// |------------|---------------------------------------|---------------------------------|
/// | wallpapers | `Wallpapers/SystemWallpapers/x.png`   | `SystemWallpapers/x.png`        |
/// | wallpapers | `Wallpapers/SystemWallpapers/x-list.png` | `ListWallpapers/x-list.png`  |
/// | icons      | `Icons/ToolIcons/x.png`               | `ToolIcons/x.png`               |
/// | overlays   | `Overlays/GBA/x.png`                  | `Systems/GBA/x.png`             |
/// | fonts      | `Fonts/OG.ttf`                        | `OG.ttf`                        |
pub fn component_path(category: ContentCategory, mapping: &PathMapping) -> Option<String> {
    let file = mapping.file_name();
    match category {
        ContentCategory::Wallpapers => Some(match mapping.wallpaper_type() {
            Some(WallpaperType::List) => format!("{}/{}", LIST_WALLPAPERS_DIR, file),
            Some(WallpaperType::Collection) => format!("{}/{}", COLLECTION_WALLPAPERS_DIR, file),
            _ => strip_dir(&mapping.package_path, WALLPAPERS_DIR)
                .unwrap_or_else(|| format!("{}/{}", SYSTEM_WALLPAPERS_DIR, file)),
        }),
        ContentCategory::Icons => Some(
            strip_dir(&mapping.package_path, ICONS_DIR).unwrap_or_else(|| {
                let dir = match mapping.icon_type() {
                    Some(IconType::Tool) => TOOL_ICONS_DIR,
                    Some(IconType::Collection) => COLLECTION_ICONS_DIR,
                    _ => SYSTEM_ICONS_DIR,
                };
                format!("{}/{}", dir, file)
            }),
        ),
        ContentCategory::Overlays => {
            let tag = mapping.system_tag().map(str::to_string).or_else(|| {
                strip_dir(&mapping.package_path, OVERLAYS_DIR)
                    .and_then(|rest| rest.split('/').next().map(str::to_string))
            })?;
            Some(format!("{}/{}/{}", OVERLAY_SYSTEMS_DIR, tag, file))
        }
        ContentCategory::Fonts => Some(file.to_string()),
        ContentCategory::Accents | ContentCategory::Leds => None,
    }
}

fn strip_dir(package_path: &str, dir: &str) -> Option<String> {
    package_path
        .strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}
