//! Package type definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of theme package.
///
/// Every package directory name ends in the extension of its type, which is
/// how packages are recognized when listing a store directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// Full theme carrying every content category.
    Theme,
    /// Wallpaper component.
    Wallpaper,
    /// Icon component.
    Icon,
    /// Accent color component.
    Accent,
    /// LED profile component.
    Led,
    /// Font component.
    Font,
    /// Per-emulator overlay component.
    Overlay,
}

impl PackageType {
    /// All package types, full theme first.
    pub const ALL: [PackageType; 7] = [
        PackageType::Theme,
        PackageType::Wallpaper,
        PackageType::Icon,
        PackageType::Accent,
        PackageType::Led,
        PackageType::Font,
        PackageType::Overlay,
    ];

    /// The component types, in the order deconstruction emits them.
    pub const COMPONENTS: [PackageType; 6] = [
        PackageType::Wallpaper,
        PackageType::Icon,
        PackageType::Accent,
        PackageType::Led,
        PackageType::Font,
        PackageType::Overlay,
    ];

    /// Directory name extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Theme => ".theme",
            Self::Wallpaper => ".bg",
            Self::Icon => ".icon",
            Self::Accent => ".acc",
            Self::Led => ".led",
            Self::Font => ".font",
            Self::Overlay => ".over",
        }
    }

    /// Discriminator used in component manifests (`component_info.type`).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::Wallpaper => "wallpaper",
            Self::Icon => "icon",
            Self::Accent => "accent",
            Self::Led => "led",
            Self::Font => "font",
            Self::Overlay => "overlay",
        }
    }

    /// Store subdirectory holding packages of this type.
    pub fn store_dir_name(&self) -> &'static str {
        match self {
            Self::Theme => "Themes",
            Self::Wallpaper => "Wallpapers",
            Self::Icon => "Icons",
            Self::Accent => "Accents",
            Self::Led => "LEDs",
            Self::Font => "Fonts",
            Self::Overlay => "Overlays",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::Wallpaper => "wallpapers",
            Self::Icon => "icons",
            Self::Accent => "accent colors",
            Self::Led => "LED settings",
            Self::Font => "fonts",
            Self::Overlay => "overlays",
        }
    }

    /// Whether this is a single-category component type.
    pub fn is_component(&self) -> bool {
        *self != Self::Theme
    }

    /// Detect the package type from a directory name.
    ///
    /// ```
    /// use themepak::package::PackageType;
    ///
    /// assert_eq!(PackageType::from_dir_name("Neon.theme"), Some(PackageType::Theme));
    /// assert_eq!(PackageType::from_dir_name("Neon.bg"), Some(PackageType::Wallpaper));
    /// assert_eq!(PackageType::from_dir_name("Neon"), None);
    /// ```
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| {
            name.len() > t.extension().len() && name.ends_with(t.extension())
        })
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let trimmed = lower.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == trimmed || &t.extension()[1..] == trimmed)
            .ok_or_else(|| format!("unknown package type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_are_distinct() {
        let mut exts: Vec<_> = PackageType::ALL.iter().map(|t| t.extension()).collect();
        exts.sort();
        exts.dedup();
        assert_eq!(exts.len(), PackageType::ALL.len());
    }

    #[test]
    fn test_from_str_accepts_tag_and_extension() {
        assert_eq!("wallpaper".parse::<PackageType>(), Ok(PackageType::Wallpaper));
        assert_eq!("bg".parse::<PackageType>(), Ok(PackageType::Wallpaper));
        assert_eq!(".over".parse::<PackageType>(), Ok(PackageType::Overlay));
        assert_eq!("LED".parse::<PackageType>(), Ok(PackageType::Led));
        assert!("skin".parse::<PackageType>().is_err());
    }

    #[test]
    fn test_from_dir_name_requires_stem() {
        assert_eq!(PackageType::from_dir_name(".theme"), None);
        assert_eq!(PackageType::from_dir_name("x.font"), Some(PackageType::Font));
    }

    #[test]
    fn test_components_exclude_theme() {
        assert!(PackageType::COMPONENTS.iter().all(|t| t.is_component()));
        assert!(!PackageType::Theme.is_component());
    }
}
