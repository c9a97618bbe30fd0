//! Fixed device-side locations consumed and produced by the theme pipeline.
//!
//! The device is described by its SD card root and platform identifier.
//! Every path the pipeline reads or writes on the live device is derived
//! here so that the placement contract is defined in one place:
//!
//! ```text
//! <root>/
//! ├── Theme/                                 live theme directory
//! ├── .media/{Collections,Recently Played,Tools}.png
//! ├── Collections/.media/<collection>.png    collection icons
//! ├── Roms/<System (TAG)>/                   emulator systems
//! ├── Tools/<platform>/.media/<tool>.png     tool icons
//! ├── Tools/<platform>/Theme Manager.pak/    package store
//! └── .userdata/shared/{minuisettings,ledsettings_brick}.txt
//! ```

mod systems;

pub use systems::{parse_system_tag, ScannedSystems, SystemDirectory, SystemInfo};

use std::path::{Component, Path, PathBuf};

/// Canonical SD card mount point on the device.
pub const DEFAULT_SDCARD_ROOT: &str = "/mnt/SDCARD";

/// Default platform identifier.
pub const DEFAULT_PLATFORM: &str = "tg5040";

/// Live theme directory name below the SD card root.
pub const LIVE_THEME_DIR: &str = "Theme";

/// Hidden media directory name used by the launcher.
pub const MEDIA_DIR: &str = ".media";

/// Recently played folder name (wallpaper and icon stem).
pub const RECENTLY_PLAYED: &str = "Recently Played";

/// Collections folder name (wallpaper and icon stem).
pub const COLLECTIONS: &str = "Collections";

/// Tools folder name (wallpaper and icon stem).
pub const TOOLS: &str = "Tools";

/// Shared accent settings file name.
pub const ACCENT_SETTINGS_FILE: &str = "minuisettings.txt";

/// Shared LED settings file name.
pub const LED_SETTINGS_FILE: &str = "ledsettings_brick.txt";

/// Name of the tool pak that hosts the package store.
pub const STORE_PAK_NAME: &str = "Theme Manager.pak";

/// Fixed device paths derived from an SD card root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLayout {
    root: PathBuf,
    platform: String,
}

impl Default for DeviceLayout {
    fn default() -> Self {
        Self::new(DEFAULT_SDCARD_ROOT, DEFAULT_PLATFORM)
    }
}

impl DeviceLayout {
    /// Create a layout for the given SD card root and platform.
    pub fn new(root: impl Into<PathBuf>, platform: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            platform: platform.into(),
        }
    }

    /// SD card root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Platform identifier (e.g. `tg5040`).
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The same platform on the canonical `/mnt/SDCARD` root.
    ///
    /// Manifests record device paths against this layout; [`localize`]
    /// maps them back onto the configured root.
    ///
    /// [`localize`]: DeviceLayout::localize
    pub fn canonical(&self) -> DeviceLayout {
        Self::new(DEFAULT_SDCARD_ROOT, self.platform.clone())
    }

    /// Live theme directory, laid out like a full theme package.
    pub fn live_theme_dir(&self) -> PathBuf {
        self.root.join(LIVE_THEME_DIR)
    }

    /// Root `.media` directory holding the top-level folder icons.
    pub fn root_media_dir(&self) -> PathBuf {
        self.root.join(MEDIA_DIR)
    }

    /// Icon shown for the Collections folder.
    pub fn collections_icon(&self) -> PathBuf {
        self.root_media_dir().join(format!("{}.png", COLLECTIONS))
    }

    /// Icon shown for the Recently Played folder.
    pub fn recently_played_icon(&self) -> PathBuf {
        self.root_media_dir().join(format!("{}.png", RECENTLY_PLAYED))
    }

    /// Icon shown for the Tools folder.
    pub fn tools_icon(&self) -> PathBuf {
        self.root_media_dir().join(format!("{}.png", TOOLS))
    }

    /// Directory holding emulator system folders.
    pub fn roms_dir(&self) -> PathBuf {
        self.root.join("Roms")
    }

    /// Directory holding user collections.
    pub fn collections_dir(&self) -> PathBuf {
        self.root.join(COLLECTIONS)
    }

    /// Directory holding collection icons.
    pub fn collections_media_dir(&self) -> PathBuf {
        self.collections_dir().join(MEDIA_DIR)
    }

    /// Tool paks directory for this platform.
    pub fn tools_dir(&self) -> PathBuf {
        self.root.join(TOOLS).join(&self.platform)
    }

    /// Directory holding tool icons.
    pub fn tools_media_dir(&self) -> PathBuf {
        self.tools_dir().join(MEDIA_DIR)
    }

    /// Shared settings directory.
    pub fn shared_settings_dir(&self) -> PathBuf {
        self.root.join(".userdata").join("shared")
    }

    /// Shared accent-settings text file.
    pub fn accent_settings_file(&self) -> PathBuf {
        self.shared_settings_dir().join(ACCENT_SETTINGS_FILE)
    }

    /// Shared LED-settings text file.
    pub fn led_settings_file(&self) -> PathBuf {
        self.shared_settings_dir().join(LED_SETTINGS_FILE)
    }

    /// Default data directory for the package store.
    pub fn default_data_dir(&self) -> PathBuf {
        self.tools_dir().join(STORE_PAK_NAME)
    }

    /// Whether a device path lies inside the live theme directory.
    pub fn is_in_live_theme(&self, device_path: &Path) -> bool {
        device_path.starts_with(self.live_theme_dir())
    }

    /// Rebase a recorded device path onto this layout's root.
    ///
    /// Manifests record absolute paths against the canonical SD card mount
    /// point. When the layout is rooted elsewhere (a mounted card on a
    /// desktop, a test directory) those paths are rebased; any other path is
    /// returned unchanged.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use themepak::device::DeviceLayout;
    ///
    /// let layout = DeviceLayout::new("/media/card", "tg5040");
    /// assert_eq!(
    ///     layout.localize("/mnt/SDCARD/Theme/Fonts/OG.ttf"),
    ///     PathBuf::from("/media/card/Theme/Fonts/OG.ttf")
    /// );
    /// assert_eq!(
    ///     layout.localize("/media/card/Theme/Fonts/OG.ttf"),
    ///     PathBuf::from("/media/card/Theme/Fonts/OG.ttf")
    /// );
    /// ```
    pub fn localize(&self, device_path: impl AsRef<Path>) -> PathBuf {
        let device_path = device_path.as_ref();
        match device_path.strip_prefix(DEFAULT_SDCARD_ROOT) {
            Ok(rest) if self.root != Path::new(DEFAULT_SDCARD_ROOT) => self.root.join(rest),
            _ => device_path.to_path_buf(),
        }
    }

    /// Localize a recorded device path, refusing anything that would land
    /// outside the SD card root.
    pub fn resolve(&self, device_path: &str) -> Option<PathBuf> {
        let local = self.localize(device_path);
        let escapes = local
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::CurDir));
        (!escapes && local.starts_with(&self.root) && local != self.root).then_some(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_paths() {
        let layout = DeviceLayout::default();
        assert_eq!(layout.live_theme_dir(), PathBuf::from("/mnt/SDCARD/Theme"));
        assert_eq!(
            layout.tools_media_dir(),
            PathBuf::from("/mnt/SDCARD/Tools/tg5040/.media")
        );
        assert_eq!(
            layout.collections_icon(),
            PathBuf::from("/mnt/SDCARD/.media/Collections.png")
        );
        assert_eq!(
            layout.recently_played_icon(),
            PathBuf::from("/mnt/SDCARD/.media/Recently Played.png")
        );
        assert_eq!(
            layout.accent_settings_file(),
            PathBuf::from("/mnt/SDCARD/.userdata/shared/minuisettings.txt")
        );
        assert_eq!(
            layout.led_settings_file(),
            PathBuf::from("/mnt/SDCARD/.userdata/shared/ledsettings_brick.txt")
        );
        assert_eq!(
            layout.default_data_dir(),
            PathBuf::from("/mnt/SDCARD/Tools/tg5040/Theme Manager.pak")
        );
    }

    #[test]
    fn test_localize_on_canonical_root_is_identity() {
        let layout = DeviceLayout::default();
        assert_eq!(
            layout.localize("/mnt/SDCARD/.media/Collections.png"),
            PathBuf::from("/mnt/SDCARD/.media/Collections.png")
        );
    }

    #[test]
    fn test_canonical_keeps_platform() {
        let layout = DeviceLayout::new("/media/card", "rg35xxplus");
        let canonical = layout.canonical();
        assert_eq!(canonical.root(), Path::new(DEFAULT_SDCARD_ROOT));
        assert_eq!(canonical.platform(), "rg35xxplus");
        assert_eq!(
            layout.localize(canonical.tools_media_dir()),
            PathBuf::from("/media/card/Tools/rg35xxplus/.media")
        );
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let layout = DeviceLayout::new("/sd", "tg5040");
        assert_eq!(
            layout.resolve("/mnt/SDCARD/Theme/Fonts/OG.ttf"),
            Some(PathBuf::from("/sd/Theme/Fonts/OG.ttf"))
        );
        assert_eq!(
            layout.resolve("/sd/.media/Tools.png"),
            Some(PathBuf::from("/sd/.media/Tools.png"))
        );
        assert_eq!(layout.resolve("/etc/passwd"), None);
        assert_eq!(layout.resolve("/mnt/SDCARD/Theme/../../etc/passwd"), None);
        assert_eq!(layout.resolve("Theme/Fonts/OG.ttf"), None);
        assert_eq!(layout.resolve("/sd"), None);
    }

    #[test]
    fn test_is_in_live_theme() {
        let layout = DeviceLayout::new("/sd", "tg5040");
        assert!(layout.is_in_live_theme(Path::new("/sd/Theme/Fonts/OG.ttf")));
        assert!(!layout.is_in_live_theme(Path::new("/sd/.media/Tools.png")));
        assert!(!layout.is_in_live_theme(Path::new("/sd/Themes/x")));
    }
}
