//! Single-category component manifest schema.
//!
//! A component manifest is one of six shapes, discriminated by
//! `component_info.type`:
//!
//! | type        | payload                              |
//! |-------------|--------------------------------------|
//! | `wallpaper` | `content` + `path_mappings`          |
//! | `icon`      | `content` + `path_mappings`          |
//! | `overlay`   | `content` + `path_mappings`          |
//! | `font`      | `content` + `path_mappings`          |
//! | `accent`    | `accent_colors`                      |
//! | `led`       | `led_settings`                       |

use std::path::Path;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::error::{ManifestError, ManifestResult};
use super::mapping::PathMapping;
use super::settings::{AccentColors, LedSettings};
use super::theme::{CategoryContent, ContentCategory};
use crate::package::PackageType;

/// Descriptive metadata shared by every component manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentInfo {
    pub name: String,

    /// Component discriminator.
    #[serde(rename = "type")]
    pub component_type: PackageType,

    pub author: String,
    pub description: String,
    pub version: Version,
    pub creation_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl Default for ComponentInfo {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: String::new(),
            component_type: PackageType::Wallpaper,
            author: String::new(),
            description: String::new(),
            version: Version::new(1, 0, 0),
            creation_date: now,
            last_updated: now,
            tags: Vec::new(),
        }
    }
}

/// Component whose payload is a list of mapped files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileComponent {
    pub component_info: ComponentInfo,
    pub content: CategoryContent,
    pub path_mappings: Vec<PathMapping>,
    pub preview_image: Option<String>,
}

/// Accent color component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccentComponent {
    pub component_info: ComponentInfo,
    pub accent_colors: AccentColors,
    pub preview_image: Option<String>,
}

/// LED profile component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedComponent {
    pub component_info: ComponentInfo,
    pub led_settings: LedSettings,
    pub preview_image: Option<String>,
}

/// Manifest of a component package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentManifest {
    Wallpaper(FileComponent),
    Icon(FileComponent),
    Overlay(FileComponent),
    Font(FileComponent),
    Accent(AccentComponent),
    Led(LedComponent),
}

impl ComponentManifest {
    /// An empty component of the given category.
    pub fn create_minimal(category: ContentCategory, name: &str, author: &str) -> Self {
        let info = ComponentInfo {
            name: name.to_string(),
            component_type: category.package_type(),
            author: author.to_string(),
            ..ComponentInfo::default()
        };
        let files = || FileComponent {
            component_info: info.clone(),
            ..FileComponent::default()
        };
        match category {
            ContentCategory::Wallpapers => Self::Wallpaper(files()),
            ContentCategory::Icons => Self::Icon(files()),
            ContentCategory::Overlays => Self::Overlay(files()),
            ContentCategory::Fonts => Self::Font(files()),
            ContentCategory::Accents => Self::Accent(AccentComponent {
                component_info: info.clone(),
                ..AccentComponent::default()
            }),
            ContentCategory::Leds => Self::Led(LedComponent {
                component_info: info.clone(),
                ..LedComponent::default()
            }),
        }
    }

    /// Decode a parsed manifest, dispatching on `component_info.type`.
    ///
    /// `path` is only used for error reporting.
    pub fn from_json(value: Value, path: &Path) -> ManifestResult<Self> {
        let malformed = |reason: String| ManifestError::Malformed {
            path: path.to_path_buf(),
            reason,
        };

        let tag = value
            .get("component_info")
            .and_then(|info| info.get("type"))
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing component_info.type".to_string()))?;

        let package_type = tag
            .parse::<PackageType>()
            .ok()
            .filter(PackageType::is_component)
            .ok_or_else(|| ManifestError::UnknownComponentType {
                path: path.to_path_buf(),
                found: tag.to_string(),
            })?;

        let files = |value: Value| {
            serde_json::from_value::<FileComponent>(value).map_err(|e| malformed(e.to_string()))
        };
        match package_type {
            PackageType::Wallpaper => files(value).map(Self::Wallpaper),
            PackageType::Icon => files(value).map(Self::Icon),
            PackageType::Overlay => files(value).map(Self::Overlay),
            PackageType::Font => files(value).map(Self::Font),
            PackageType::Accent => serde_json::from_value(value)
                .map(Self::Accent)
                .map_err(|e| malformed(e.to_string())),
            PackageType::Led => serde_json::from_value(value)
                .map(Self::Led)
                .map_err(|e| malformed(e.to_string())),
            PackageType::Theme => Err(ManifestError::UnknownComponentType {
                path: path.to_path_buf(),
                found: tag.to_string(),
            }),
        }
    }

    pub fn info(&self) -> &ComponentInfo {
        match self {
            Self::Wallpaper(c) | Self::Icon(c) | Self::Overlay(c) | Self::Font(c) => {
                &c.component_info
            }
            Self::Accent(c) => &c.component_info,
            Self::Led(c) => &c.component_info,
        }
    }

    pub fn info_mut(&mut self) -> &mut ComponentInfo {
        match self {
            Self::Wallpaper(c) | Self::Icon(c) | Self::Overlay(c) | Self::Font(c) => {
                &mut c.component_info
            }
            Self::Accent(c) => &mut c.component_info,
            Self::Led(c) => &mut c.component_info,
        }
    }

    /// The category this component carries.
    pub fn category(&self) -> ContentCategory {
        match self {
            Self::Wallpaper(_) => ContentCategory::Wallpapers,
            Self::Icon(_) => ContentCategory::Icons,
            Self::Overlay(_) => ContentCategory::Overlays,
            Self::Font(_) => ContentCategory::Fonts,
            Self::Accent(_) => ContentCategory::Accents,
            Self::Led(_) => ContentCategory::Leds,
        }
    }

    pub fn package_type(&self) -> PackageType {
        self.category().package_type()
    }

    /// Mapped files; empty for accent and LED components.
    pub fn mappings(&self) -> &[PathMapping] {
        match self {
            Self::Wallpaper(c) | Self::Icon(c) | Self::Overlay(c) | Self::Font(c) => {
                &c.path_mappings
            }
            Self::Accent(_) | Self::Led(_) => &[],
        }
    }

    /// Mutable mapping list, for file-carrying components.
    pub fn mappings_mut(&mut self) -> Option<&mut Vec<PathMapping>> {
        match self {
            Self::Wallpaper(c) | Self::Icon(c) | Self::Overlay(c) | Self::Font(c) => {
                Some(&mut c.path_mappings)
            }
            Self::Accent(_) | Self::Led(_) => None,
        }
    }

    pub fn preview_image(&self) -> Option<&str> {
        match self {
            Self::Wallpaper(c) | Self::Icon(c) | Self::Overlay(c) | Self::Font(c) => {
                c.preview_image.as_deref()
            }
            Self::Accent(c) => c.preview_image.as_deref(),
            Self::Led(c) => c.preview_image.as_deref(),
        }
    }

    pub fn set_preview_image(&mut self, preview: Option<String>) {
        match self {
            Self::Wallpaper(c) | Self::Icon(c) | Self::Overlay(c) | Self::Font(c) => {
                c.preview_image = preview
            }
            Self::Accent(c) => c.preview_image = preview,
            Self::Led(c) => c.preview_image = preview,
        }
    }

    /// Recompute the content summary from the mapping list.
    pub fn refresh_content(&mut self) {
        if let Self::Wallpaper(c) | Self::Icon(c) | Self::Overlay(c) | Self::Font(c) = self {
            c.content = CategoryContent::from_count(c.path_mappings.len());
        }
    }

    /// Stamp `last_updated` with the current time.
    pub fn touch(&mut self) {
        self.info_mut().last_updated = Utc::now();
    }
}

impl Serialize for ComponentManifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Wallpaper(c) | Self::Icon(c) | Self::Overlay(c) | Self::Font(c) => {
                c.serialize(serializer)
            }
            Self::Accent(c) => c.serialize(serializer),
            Self::Led(c) => c.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_minimal_sets_discriminator() {
        for category in ContentCategory::ALL {
            let manifest = ComponentManifest::create_minimal(category, "Neon", "Jane");
            assert_eq!(manifest.category(), category);
            assert_eq!(manifest.info().component_type, category.package_type());
            assert_eq!(manifest.info().name, "Neon");
            assert!(manifest.mappings().is_empty());
        }
    }

    #[test]
    fn test_decode_dispatches_on_type() {
        let value = json!({
            "component_info": {"name": "Neon", "type": "overlay", "author": "Jane"},
            "content": {"present": true, "count": 1},
            "path_mappings": [{
                "package_path": "Systems/GBA/grid.png",
                "device_path": "/mnt/SDCARD/Theme/Overlays/GBA/grid.png",
                "metadata": {"SystemTag": "GBA"}
            }]
        });
        let manifest = ComponentManifest::from_json(value, Path::new("m.json")).unwrap();
        assert_eq!(manifest.category(), ContentCategory::Overlays);
        assert_eq!(manifest.mappings().len(), 1);
        assert_eq!(manifest.mappings()[0].system_tag(), Some("GBA"));
    }

    #[test]
    fn test_decode_accent() {
        let value = json!({
            "component_info": {"name": "Neon", "type": "accent"},
            "accent_colors": {"color2": "0x00FF00"}
        });
        let ComponentManifest::Accent(accent) =
            ComponentManifest::from_json(value, Path::new("m.json")).unwrap()
        else {
            panic!("expected accent component");
        };
        assert_eq!(accent.accent_colors.color2.0, 0x00FF00);
        assert_eq!(accent.accent_colors.color3.0, 0x1E2329);
    }

    #[test]
    fn test_decode_unknown_type_is_error() {
        let value = json!({"component_info": {"name": "x", "type": "sound"}});
        let err = ComponentManifest::from_json(value, Path::new("m.json")).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownComponentType { ref found, .. } if found == "sound"));

        let value = json!({"component_info": {"name": "x", "type": "theme"}});
        assert!(matches!(
            ComponentManifest::from_json(value, Path::new("m.json")),
            Err(ManifestError::UnknownComponentType { .. })
        ));
    }

    #[test]
    fn test_decode_missing_type_is_malformed() {
        let value = json!({"component_info": {"name": "x"}});
        assert!(matches!(
            ComponentManifest::from_json(value, Path::new("m.json")),
            Err(ManifestError::Malformed { .. })
        ));
    }

    #[test]
    fn test_serialize_keeps_type_field() {
        let mut manifest =
            ComponentManifest::create_minimal(ContentCategory::Fonts, "Neon", "Jane");
        if let Some(mappings) = manifest.mappings_mut() {
            mappings.push(PathMapping::new("OG.ttf", "/mnt/SDCARD/Theme/Fonts/OG.ttf"));
        }
        manifest.refresh_content();

        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["component_info"]["type"], "font");
        assert_eq!(value["content"]["count"], 1);
        assert_eq!(value["content"]["present"], true);

        let decoded = ComponentManifest::from_json(value, Path::new("m.json")).unwrap();
        assert_eq!(decoded, manifest);
    }
}
