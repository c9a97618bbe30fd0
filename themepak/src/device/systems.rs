//! Emulator system, tool and collection discovery.
//!
//! Full discovery of installed systems is owned by the launcher; the
//! pipeline only needs the names of what is present. [`SystemDirectory`] is
//! the seam, [`ScannedSystems`] a plain directory-listing implementation.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::{DeviceLayout, MEDIA_DIR};

/// An emulator system folder on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    /// Folder name, e.g. `Game Boy Advance (GBA)`.
    pub folder_name: String,
    /// Short system tag, e.g. `GBA`.
    pub tag: String,
}

impl SystemInfo {
    /// Build from a folder name; `None` when the name carries no tag.
    pub fn from_folder_name(folder_name: &str) -> Option<Self> {
        parse_system_tag(folder_name).map(|tag| Self {
            folder_name: folder_name.to_string(),
            tag,
        })
    }
}

/// Source of the systems, tools and collections present on a device.
pub trait SystemDirectory {
    /// Installed emulator systems.
    fn systems(&self) -> Vec<SystemInfo>;

    /// Installed tool names (pak folder names without `.pak`).
    fn tools(&self) -> Vec<String>;

    /// User collection names.
    fn collections(&self) -> Vec<String>;
}

/// Extract the system tag from a `Name (TAG)` folder or file stem.
///
/// ```
/// use themepak::device::parse_system_tag;
///
/// assert_eq!(parse_system_tag("Game Boy (GB)"), Some("GB".to_string()));
/// assert_eq!(parse_system_tag("Game Boy (GB).png"), Some("GB".to_string()));
/// assert_eq!(parse_system_tag("Recently Played"), None);
/// ```
pub fn parse_system_tag(name: &str) -> Option<String> {
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    let re = TAG
        .get_or_init(|| Regex::new(r"\(([^()]+)\)\s*(?:-list)?(?:\.[A-Za-z0-9]+)?$").ok())
        .as_ref()?;
    re.captures(name.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|tag| !tag.is_empty())
}

/// Directory-listing implementation of [`SystemDirectory`].
#[derive(Debug, Clone)]
pub struct ScannedSystems {
    layout: DeviceLayout,
}

impl ScannedSystems {
    /// Create a scanner for the given device layout.
    pub fn new(layout: DeviceLayout) -> Self {
        Self { layout }
    }
}

impl SystemDirectory for ScannedSystems {
    fn systems(&self) -> Vec<SystemInfo> {
        list_visible_dirs(&self.layout.roms_dir())
            .into_iter()
            .filter_map(|name| SystemInfo::from_folder_name(&name))
            .collect()
    }

    fn tools(&self) -> Vec<String> {
        list_visible_dirs(&self.layout.tools_dir())
            .into_iter()
            .filter_map(|name| name.strip_suffix(".pak").map(str::to_string))
            .collect()
    }

    fn collections(&self) -> Vec<String> {
        let dir = self.layout.collections_dir();
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if name.starts_with('.') {
                    return None;
                }
                // Collections are either folders or `<name>.txt` ROM lists.
                let path = entry.path();
                if path.is_dir() {
                    Some(name)
                } else {
                    name.strip_suffix(".txt").map(str::to_string)
                }
            })
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Sorted names of non-hidden subdirectories; empty when `dir` is missing.
fn list_visible_dirs(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| !name.starts_with('.') && name != MEDIA_DIR)
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_system_tag_variants() {
        assert_eq!(parse_system_tag("Sony PlayStation (PS)"), Some("PS".into()));
        assert_eq!(parse_system_tag("Game Boy (GB)-list.png"), Some("GB".into()));
        assert_eq!(parse_system_tag("Arcade (FBN) "), Some("FBN".into()));
        assert_eq!(parse_system_tag("()"), None);
        assert_eq!(parse_system_tag("Root.png"), None);
    }

    #[test]
    fn test_scanned_systems() {
        let temp = TempDir::new().unwrap();
        let layout = DeviceLayout::new(temp.path(), "tg5040");
        let roms = layout.roms_dir();
        fs::create_dir_all(roms.join("Game Boy (GB)")).unwrap();
        fs::create_dir_all(roms.join("Nintendo (FC)")).unwrap();
        fs::create_dir_all(roms.join("Untagged")).unwrap();
        fs::create_dir_all(roms.join(".media")).unwrap();
        fs::create_dir_all(layout.tools_dir().join("Clock.pak")).unwrap();
        fs::create_dir_all(layout.tools_dir().join("notes")).unwrap();
        fs::create_dir_all(layout.collections_dir().join("Favorites")).unwrap();
        fs::write(layout.collections_dir().join("RPGs.txt"), "").unwrap();

        let scanner = ScannedSystems::new(layout);
        let tags: Vec<_> = scanner.systems().into_iter().map(|s| s.tag).collect();
        assert_eq!(tags, vec!["GB", "FC"]);
        assert_eq!(scanner.tools(), vec!["Clock"]);
        assert_eq!(scanner.collections(), vec!["Favorites", "RPGs"]);
    }

    #[test]
    fn test_scanned_systems_missing_root() {
        let scanner = ScannedSystems::new(DeviceLayout::new("/no/such/card", "tg5040"));
        assert!(scanner.systems().is_empty());
        assert!(scanner.tools().is_empty());
        assert!(scanner.collections().is_empty());
    }
}
