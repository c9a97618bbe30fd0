//! Package-to-device file placement records.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Metadata key: wallpaper classification.
pub const WALLPAPER_TYPE: &str = "WallpaperType";

/// Metadata key: emulator system tag.
pub const SYSTEM_TAG: &str = "SystemTag";

/// Metadata key: icon classification.
pub const ICON_TYPE: &str = "IconType";

/// Metadata key: font slot name (`OG`, `Next`, `OG.backup`, `Next.backup`).
pub const FONT_SLOT: &str = "FontSlot";

/// Metadata key: settings block carried by a settings file mapping.
pub const SETTINGS_KIND: &str = "SettingsKind";

/// Metadata key: display name of the location a file was exported from.
pub const LOCATION: &str = "Location";

/// Binds a package-relative file to its absolute device destination.
///
/// The metadata carries the classification needed to re-derive either side
/// later without rescanning the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapping {
    /// Relative path inside the package, `/`-separated.
    pub package_path: String,

    /// Absolute path on the live device.
    pub device_path: String,

    /// Free-form classification metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl PathMapping {
    /// Create a mapping without metadata.
    pub fn new(package_path: impl Into<String>, device_path: impl AsRef<Path>) -> Self {
        Self {
            package_path: package_path.into(),
            device_path: device_path.as_ref().to_string_lossy().to_string(),
            metadata: BTreeMap::new(),
        }
    }

    /// Add a metadata entry (builder pattern).
    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Look up a metadata value.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Absolute path of the mapped file inside a package directory.
    ///
    /// Parent references are dropped so the result never leaves `package_dir`.
    pub fn source_in(&self, package_dir: &Path) -> PathBuf {
        self.package_path
            .split('/')
            .filter(|part| !part.is_empty() && *part != "." && *part != "..")
            .fold(package_dir.to_path_buf(), |path, part| path.join(part))
    }

    /// File name component of the package path.
    pub fn file_name(&self) -> &str {
        self.package_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.package_path)
    }

    /// Wallpaper classification, when present and valid.
    pub fn wallpaper_type(&self) -> Option<WallpaperType> {
        self.meta(WALLPAPER_TYPE).and_then(|v| v.parse().ok())
    }

    /// Icon classification, when present and valid.
    pub fn icon_type(&self) -> Option<IconType> {
        self.meta(ICON_TYPE).and_then(|v| v.parse().ok())
    }

    /// Settings block, when this mapping carries one.
    pub fn settings_kind(&self) -> Option<SettingsKind> {
        self.meta(SETTINGS_KIND).and_then(|v| v.parse().ok())
    }

    /// System tag, when present.
    pub fn system_tag(&self) -> Option<&str> {
        self.meta(SYSTEM_TAG)
    }

    /// Copy of this mapping with a new package path.
    pub fn rerooted(&self, package_path: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            ..self.clone()
        }
    }
}

macro_rules! metadata_enum {
    ($(#[$doc:meta])* $name:ident { $($(#[$vdoc:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vdoc])* $variant),+
        }

        impl $name {
            /// Metadata string for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Self::$variant),)+
                    other => Err(format!("unknown {}: {}", stringify!($name), other)),
                }
            }
        }
    };
}

metadata_enum!(
    /// Where a wallpaper is shown.
    WallpaperType {
        /// Main menu background.
        Main,
        /// Special folders (Recently Played, Tools, Collections).
        Media,
        /// Emulator system folder.
        System,
        /// List-view variant of another wallpaper.
        List,
        /// Individual collection.
        Collection,
    }
);

metadata_enum!(
    /// Which launcher entry an icon belongs to.
    IconType {
        System,
        Tool,
        Collection,
    }
);

metadata_enum!(
    /// Settings block carried by a settings file mapping.
    SettingsKind {
        Accent,
        Led,
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_serializes_metadata() {
        let mapping = PathMapping::new(
            "Wallpapers/SystemWallpapers/Game Boy (GB).png",
            "/mnt/SDCARD/Theme/Wallpapers/SystemWallpapers/Game Boy (GB).png",
        )
        .with_meta(WALLPAPER_TYPE, WallpaperType::System.as_str())
        .with_meta(SYSTEM_TAG, "GB");

        let json = serde_json::to_string(&mapping).unwrap();
        assert!(json.contains("\"WallpaperType\":\"System\""));

        let parsed: PathMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.wallpaper_type(), Some(WallpaperType::System));
        assert_eq!(parsed.system_tag(), Some("GB"));
        assert_eq!(parsed.file_name(), "Game Boy (GB).png");
    }

    #[test]
    fn test_mapping_without_metadata_field() {
        let parsed: PathMapping =
            serde_json::from_str(r#"{"package_path":"a.png","device_path":"/x/a.png"}"#).unwrap();
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.icon_type(), None);
    }

    #[test]
    fn test_source_in_joins_segments() {
        let mapping = PathMapping::new("Icons/ToolIcons/Clock.png", "/x");
        assert_eq!(
            mapping.source_in(Path::new("/pkg")),
            PathBuf::from("/pkg/Icons/ToolIcons/Clock.png")
        );
    }

    #[test]
    fn test_metadata_enum_parse() {
        assert_eq!("List".parse::<WallpaperType>(), Ok(WallpaperType::List));
        assert!("list".parse::<WallpaperType>().is_err());
        assert_eq!(IconType::Tool.to_string(), "Tool");
    }

    #[test]
    fn test_rerooted_keeps_device_path() {
        let mapping = PathMapping::new("Fonts/OG.ttf", "/d/OG.ttf").with_meta(FONT_SLOT, "OG");
        let moved = mapping.rerooted("OG.ttf");
        assert_eq!(moved.package_path, "OG.ttf");
        assert_eq!(moved.device_path, "/d/OG.ttf");
        assert_eq!(moved.meta(FONT_SLOT), Some("OG"));
    }
}
