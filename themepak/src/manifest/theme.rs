//! Full theme manifest schema.

use std::fmt;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

use super::mapping::PathMapping;
use super::settings::{AccentColors, LedSettings};
use crate::device::DEFAULT_PLATFORM;
use crate::package::PackageType;

/// File name of the preview image at a package root.
pub const PREVIEW_FILENAME: &str = "preview.png";

/// System list meaning "not restricted to particular systems".
pub const ALL_SYSTEMS: &str = "all";

/// One of the six content categories of a full theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentCategory {
    Wallpapers,
    Icons,
    Overlays,
    Fonts,
    Accents,
    Leds,
}

impl ContentCategory {
    /// Every category, in manifest order.
    pub const ALL: [ContentCategory; 6] = [
        ContentCategory::Wallpapers,
        ContentCategory::Icons,
        ContentCategory::Overlays,
        ContentCategory::Fonts,
        ContentCategory::Accents,
        ContentCategory::Leds,
    ];

    /// Manifest key for this category.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Wallpapers => "wallpapers",
            Self::Icons => "icons",
            Self::Overlays => "overlays",
            Self::Fonts => "fonts",
            Self::Accents => "accents",
            Self::Leds => "leds",
        }
    }

    /// Component package type carrying this category.
    pub fn package_type(&self) -> PackageType {
        match self {
            Self::Wallpapers => PackageType::Wallpaper,
            Self::Icons => PackageType::Icon,
            Self::Overlays => PackageType::Overlay,
            Self::Fonts => PackageType::Font,
            Self::Accents => PackageType::Accent,
            Self::Leds => PackageType::Led,
        }
    }

    /// Category carried by a component package type.
    pub fn from_package_type(package_type: PackageType) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.package_type() == package_type)
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Presence and file count of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryContent {
    pub present: bool,
    pub count: usize,
}

impl CategoryContent {
    /// Content summary for `count` mapped files.
    pub fn from_count(count: usize) -> Self {
        Self {
            present: count > 0,
            count,
        }
    }

    /// Whether the category should be installed or extracted.
    pub fn is_populated(&self) -> bool {
        self.present && self.count > 0
    }
}

/// Per-category content summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSummary {
    pub wallpapers: CategoryContent,
    pub icons: CategoryContent,
    pub overlays: CategoryContent,
    pub fonts: CategoryContent,
    pub accents: CategoryContent,
    pub leds: CategoryContent,
}

impl ContentSummary {
    pub fn get(&self, category: ContentCategory) -> &CategoryContent {
        match category {
            ContentCategory::Wallpapers => &self.wallpapers,
            ContentCategory::Icons => &self.icons,
            ContentCategory::Overlays => &self.overlays,
            ContentCategory::Fonts => &self.fonts,
            ContentCategory::Accents => &self.accents,
            ContentCategory::Leds => &self.leds,
        }
    }

    pub fn get_mut(&mut self, category: ContentCategory) -> &mut CategoryContent {
        match category {
            ContentCategory::Wallpapers => &mut self.wallpapers,
            ContentCategory::Icons => &mut self.icons,
            ContentCategory::Overlays => &mut self.overlays,
            ContentCategory::Fonts => &mut self.fonts,
            ContentCategory::Accents => &mut self.accents,
            ContentCategory::Leds => &mut self.leds,
        }
    }
}

/// Per-category file placement lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathMappings {
    pub wallpapers: Vec<PathMapping>,
    pub icons: Vec<PathMapping>,
    pub overlays: Vec<PathMapping>,
    pub fonts: Vec<PathMapping>,
    pub accents: Vec<PathMapping>,
    pub leds: Vec<PathMapping>,
}

impl PathMappings {
    pub fn get(&self, category: ContentCategory) -> &[PathMapping] {
        match category {
            ContentCategory::Wallpapers => &self.wallpapers,
            ContentCategory::Icons => &self.icons,
            ContentCategory::Overlays => &self.overlays,
            ContentCategory::Fonts => &self.fonts,
            ContentCategory::Accents => &self.accents,
            ContentCategory::Leds => &self.leds,
        }
    }

    pub fn get_mut(&mut self, category: ContentCategory) -> &mut Vec<PathMapping> {
        match category {
            ContentCategory::Wallpapers => &mut self.wallpapers,
            ContentCategory::Icons => &mut self.icons,
            ContentCategory::Overlays => &mut self.overlays,
            ContentCategory::Fonts => &mut self.fonts,
            ContentCategory::Accents => &mut self.accents,
            ContentCategory::Leds => &mut self.leds,
        }
    }

    /// Every mapping across all categories.
    pub fn iter(&self) -> impl Iterator<Item = (ContentCategory, &PathMapping)> {
        ContentCategory::ALL
            .into_iter()
            .flat_map(move |category| self.get(category).iter().map(move |m| (category, m)))
    }

    /// Total number of mappings.
    pub fn len(&self) -> usize {
        ContentCategory::ALL
            .iter()
            .map(|category| self.get(*category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Descriptive and provenance metadata of a full theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeInfo {
    pub name: String,
    pub author: String,
    pub description: String,
    pub version: Version,
    pub creation_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub tags: Vec<String>,

    /// Source repository, `https://github.com/<owner>/<repo>`.
    pub repository_url: String,
    pub commit: String,
    pub branch: String,

    /// Platform identifier the theme was made for.
    pub device: String,

    /// System tags the theme covers, or `["all"]`.
    pub systems: Vec<String>,
}

impl Default for ThemeInfo {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: String::new(),
            author: String::new(),
            description: String::new(),
            version: Version::new(1, 0, 0),
            creation_date: now,
            last_updated: now,
            tags: Vec::new(),
            repository_url: String::new(),
            commit: String::new(),
            branch: String::new(),
            device: String::new(),
            systems: Vec::new(),
        }
    }
}

/// Manifest of a full theme package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeManifest {
    pub theme_info: ThemeInfo,
    pub content: ContentSummary,
    pub path_mappings: PathMappings,
    pub accent_colors: AccentColors,
    pub led_settings: LedSettings,

    /// Preview image relative to the package root.
    pub preview_image: Option<String>,
}

impl Default for ThemeManifest {
    fn default() -> Self {
        Self {
            theme_info: ThemeInfo::default(),
            content: ContentSummary::default(),
            path_mappings: PathMappings::default(),
            accent_colors: AccentColors::default(),
            led_settings: LedSettings::default(),
            preview_image: None,
        }
    }
}

impl ThemeManifest {
    /// A manifest with every default filled in and no content.
    ///
    /// Provenance defaults point at `https://github.com/<author>/<name>` on
    /// branch `main`, commit `local`.
    pub fn create_default(name: &str, author: &str) -> Self {
        let mut manifest = Self::default();
        let info = &mut manifest.theme_info;
        info.name = name.to_string();
        info.author = author.to_string();
        info.repository_url = default_repository_url(author, name);
        info.commit = "local".to_string();
        info.branch = "main".to_string();
        info.device = DEFAULT_PLATFORM.to_string();
        info.systems = vec![ALL_SYSTEMS.to_string()];
        manifest
    }

    /// Recompute the content summary from the mapping lists.
    pub fn refresh_content(&mut self) {
        for category in ContentCategory::ALL {
            *self.content.get_mut(category) =
                CategoryContent::from_count(self.path_mappings.get(category).len());
        }
    }

    /// Stamp `last_updated` with the current time.
    pub fn touch(&mut self) {
        self.theme_info.last_updated = Utc::now();
    }

    /// Categories that are present with at least one mapped file.
    pub fn populated_categories(&self) -> Vec<ContentCategory> {
        ContentCategory::ALL
            .into_iter()
            .filter(|category| self.content.get(*category).is_populated())
            .collect()
    }

    /// System tags found in the mapping metadata, sorted and deduplicated.
    pub fn mapped_system_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .path_mappings
            .iter()
            .filter_map(|(_, mapping)| mapping.system_tag().map(str::to_string))
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }
}

/// Default repository URL derived from an author and a theme name.
///
/// Characters GitHub does not accept in owner and repository names are
/// replaced with `-`.
///
/// ```
/// use themepak::manifest::default_repository_url;
///
/// assert_eq!(
///     default_repository_url("Jane Doe", "theme_1"),
///     "https://github.com/Jane-Doe/theme_1"
/// );
/// ```
pub fn default_repository_url(author: &str, name: &str) -> String {
    fn slug(value: &str, fallback: &str) -> String {
        let slug: String = value
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        if slug.is_empty() {
            fallback.to_string()
        } else {
            slug
        }
    }
    format!(
        "https://github.com/{}/{}",
        slug(author, "unknown"),
        slug(name, "theme")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::mapping::SYSTEM_TAG;

    #[test]
    fn test_create_default_fills_provenance() {
        let manifest = ThemeManifest::create_default("Neon", "Jane");
        let info = &manifest.theme_info;
        assert_eq!(info.version, Version::new(1, 0, 0));
        assert_eq!(info.repository_url, "https://github.com/Jane/Neon");
        assert_eq!(info.commit, "local");
        assert_eq!(info.branch, "main");
        assert_eq!(info.device, "tg5040");
        assert_eq!(info.systems, vec!["all"]);
        assert!(manifest.path_mappings.is_empty());
    }

    #[test]
    fn test_refresh_content_matches_mappings() {
        let mut manifest = ThemeManifest::create_default("Neon", "Jane");
        manifest.content.fonts = CategoryContent {
            present: true,
            count: 9,
        };
        manifest
            .path_mappings
            .wallpapers
            .push(PathMapping::new("Wallpapers/SystemWallpapers/Root.png", "/d/Root.png"));

        manifest.refresh_content();

        for category in ContentCategory::ALL {
            let content = manifest.content.get(category);
            assert_eq!(content.count, manifest.path_mappings.get(category).len());
            assert_eq!(content.present, content.count > 0);
        }
        assert_eq!(
            manifest.populated_categories(),
            vec![ContentCategory::Wallpapers]
        );
    }

    #[test]
    fn test_missing_fields_parse_with_defaults() {
        let manifest: ThemeManifest =
            serde_json::from_str(r#"{"theme_info": {"name": "Bare"}}"#).unwrap();
        assert_eq!(manifest.theme_info.name, "Bare");
        assert!(manifest.theme_info.author.is_empty());
        assert_eq!(manifest.theme_info.version, Version::new(1, 0, 0));
        assert_eq!(manifest.accent_colors, AccentColors::default());
        assert!(!manifest.content.icons.present);
    }

    #[test]
    fn test_category_package_types_round_trip() {
        for category in ContentCategory::ALL {
            assert_eq!(
                ContentCategory::from_package_type(category.package_type()),
                Some(category)
            );
        }
        assert_eq!(ContentCategory::from_package_type(PackageType::Theme), None);
    }

    #[test]
    fn test_mapped_system_tags() {
        let mut manifest = ThemeManifest::default();
        manifest.path_mappings.overlays = vec![
            PathMapping::new("Overlays/GBA/a.png", "/d/a").with_meta(SYSTEM_TAG, "GBA"),
            PathMapping::new("Overlays/GB/b.png", "/d/b").with_meta(SYSTEM_TAG, "GB"),
        ];
        manifest.path_mappings.icons =
            vec![PathMapping::new("x.png", "/d/x").with_meta(SYSTEM_TAG, "GB")];
        assert_eq!(manifest.mapped_system_tags(), vec!["GB", "GBA"]);
    }
}
