//! Centralized package naming conventions.
//!
//! This module is the single source of truth for package directory names:
//! - Extension handling (e.g., `Neon` → `Neon.theme`)
//! - Base names (e.g., `Neon.theme` → `Neon`)
//! - Sequential export names (e.g., `theme_3.theme`)
//! - Timestamped backup names (e.g., `backup_20250101_120000.theme`)
//!
//! All other modules should use these functions rather than constructing names directly.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use regex::Regex;

use super::PackageType;

/// Prefix used for sequentially numbered exports.
pub const EXPORT_PREFIX: &str = "theme_";

/// Prefix used for timestamped backups.
pub const BACKUP_PREFIX: &str = "backup_";

/// Error returned for names that cannot be used as a package directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The name is empty once the extension is removed.
    #[error("package name is empty")]
    Empty,

    /// The name contains a path separator or a parent reference.
    #[error("package name '{0}' must not contain path separators or '..'")]
    InvalidCharacters(String),
}

/// Check that a name can be used as a single directory entry.
///
/// ```
/// use themepak::package::validate_package_name;
///
/// assert!(validate_package_name("Neon Nights").is_ok());
/// assert!(validate_package_name("../etc").is_err());
/// assert!(validate_package_name("").is_err());
/// ```
pub fn validate_package_name(name: &str) -> Result<(), NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains("..") {
        return Err(NameError::InvalidCharacters(name.to_string()));
    }
    if trimmed.starts_with('.') {
        return Err(NameError::InvalidCharacters(name.to_string()));
    }
    Ok(())
}

/// Append the package type's extension unless the name already has it.
///
/// ```
/// use themepak::package::{ensure_extension, PackageType};
///
/// assert_eq!(ensure_extension("Neon", PackageType::Theme), "Neon.theme");
/// assert_eq!(ensure_extension("Neon.theme", PackageType::Theme), "Neon.theme");
/// assert_eq!(ensure_extension("Neon", PackageType::Overlay), "Neon.over");
/// ```
pub fn ensure_extension(name: &str, package_type: PackageType) -> String {
    let trimmed = name.trim();
    if trimmed.ends_with(package_type.extension()) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, package_type.extension())
    }
}

/// Strip the package type's extension from a name.
///
/// ```
/// use themepak::package::{base_name, PackageType};
///
/// assert_eq!(base_name("Neon.theme", PackageType::Theme), "Neon");
/// assert_eq!(base_name("Neon", PackageType::Theme), "Neon");
/// ```
pub fn base_name(name: &str, package_type: PackageType) -> String {
    name.trim()
        .strip_suffix(package_type.extension())
        .unwrap_or(name.trim())
        .to_string()
}

/// Name of the component package derived from a theme.
///
/// Format: `{theme_base_name}{component_extension}`
pub fn component_name(theme_name: &str, component: PackageType) -> String {
    format!(
        "{}{}",
        base_name(theme_name, PackageType::Theme),
        component.extension()
    )
}

/// Next free sequentially numbered name in a directory.
///
/// Scans `dir` for `{prefix}{N}{ext}` entries and returns `N = max + 1`,
/// starting at 1 when none exist. A missing directory counts as empty.
pub fn next_sequential_name(dir: &Path, prefix: &str, package_type: PackageType) -> String {
    let pattern = format!(
        "^{}(\\d+){}$",
        regex::escape(prefix),
        regex::escape(package_type.extension())
    );
    // The pattern is built from escaped literals and always compiles.
    let highest = Regex::new(&pattern)
        .ok()
        .and_then(|re| {
            fs::read_dir(dir).ok().map(|entries| {
                entries
                    .flatten()
                    .filter_map(|entry| {
                        let name = entry.file_name().to_string_lossy().to_string();
                        re.captures(&name)
                            .and_then(|caps| caps.get(1))
                            .and_then(|m| m.as_str().parse::<u64>().ok())
                    })
                    .max()
                    .unwrap_or(0)
            })
        })
        .unwrap_or(0);

    format!(
        "{}{}{}",
        prefix,
        highest.saturating_add(1),
        package_type.extension()
    )
}

/// Timestamped backup name for the given instant.
///
/// ```
/// use chrono::{Local, TimeZone};
/// use themepak::package::backup_name_at;
///
/// let at = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
/// assert_eq!(backup_name_at(&at), "backup_20250314_092653.theme");
/// ```
pub fn backup_name_at(at: &DateTime<Local>) -> String {
    format!(
        "{}{}{}",
        BACKUP_PREFIX,
        at.format("%Y%m%d_%H%M%S"),
        PackageType::Theme.extension()
    )
}

/// Make `name` unique inside `dir` by appending `_2`, `_3`, ... before the extension.
pub fn unique_name(dir: &Path, name: &str, package_type: PackageType) -> String {
    let name = ensure_extension(name, package_type);
    if !dir.join(&name).exists() {
        return name;
    }
    let base = base_name(&name, package_type);
    (2u32..)
        .map(|n| format!("{}_{}{}", base, n, package_type.extension()))
        .find(|candidate| !dir.join(candidate).exists())
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_extension_each_type() {
        for t in PackageType::ALL {
            let name = ensure_extension("Sample", t);
            assert!(name.ends_with(t.extension()));
            assert_eq!(base_name(&name, t), "Sample");
        }
    }

    #[test]
    fn test_ensure_extension_trims_whitespace() {
        assert_eq!(ensure_extension("  Neon ", PackageType::Font), "Neon.font");
    }

    #[test]
    fn test_component_name() {
        assert_eq!(component_name("Neon.theme", PackageType::Wallpaper), "Neon.bg");
        assert_eq!(component_name("Neon", PackageType::Led), "Neon.led");
    }

    #[test]
    fn test_next_sequential_name_empty_dir() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            next_sequential_name(temp.path(), EXPORT_PREFIX, PackageType::Theme),
            "theme_1.theme"
        );
    }

    #[test]
    fn test_next_sequential_name_missing_dir() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert_eq!(
            next_sequential_name(&missing, EXPORT_PREFIX, PackageType::Theme),
            "theme_1.theme"
        );
    }

    #[test]
    fn test_next_sequential_name_increments() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("theme_1.theme")).unwrap();
        fs::create_dir(temp.path().join("theme_2.theme")).unwrap();
        fs::create_dir(temp.path().join("other.theme")).unwrap();
        fs::create_dir(temp.path().join("theme_9.bg")).unwrap();

        assert_eq!(
            next_sequential_name(temp.path(), EXPORT_PREFIX, PackageType::Theme),
            "theme_3.theme"
        );
    }

    #[test]
    fn test_next_sequential_name_past_u32_range() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("theme_4294967295.theme")).unwrap();
        fs::create_dir(temp.path().join("theme_99999999999999999999999.theme")).unwrap();

        assert_eq!(
            next_sequential_name(temp.path(), EXPORT_PREFIX, PackageType::Theme),
            "theme_4294967296.theme"
        );
    }

    #[test]
    fn test_unique_name_appends_suffix() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("snap.theme")).unwrap();
        fs::create_dir(temp.path().join("snap_2.theme")).unwrap();

        assert_eq!(
            unique_name(temp.path(), "snap", PackageType::Theme),
            "snap_3.theme"
        );
        assert_eq!(
            unique_name(temp.path(), "fresh", PackageType::Theme),
            "fresh.theme"
        );
    }

    #[test]
    fn test_validate_package_name_rejects_hidden() {
        assert_eq!(
            validate_package_name(".theme"),
            Err(NameError::InvalidCharacters(".theme".to_string()))
        );
        assert_eq!(validate_package_name("   "), Err(NameError::Empty));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_ensure_extension_always_suffixed(name in "[A-Za-z0-9 _-]{1,24}") {
                for t in PackageType::ALL {
                    let dir_name = ensure_extension(&name, t);
                    prop_assert!(dir_name.ends_with(t.extension()));
                    // Idempotent
                    prop_assert_eq!(ensure_extension(&dir_name, t), dir_name.clone());
                }
            }
        }
    }
}
