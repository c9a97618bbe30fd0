//! Package lookup, store status, store initialisation and removal.

use std::fmt;
use std::path::PathBuf;

use super::error::{ThemeError, ThemeResult};
use super::report::{ContentLine, RemoveReport};
use super::{dir_name, ThemeManager};
use crate::device::SystemDirectory;
use crate::manifest::{
    read_component_manifest, read_theme_manifest, validate, ComponentManifest, Strictness,
    ThemeManifest, ValidationIssue,
};
use crate::package::PackageType;
use crate::state::AppliedState;
use crate::transfer::TransferError;

/// A package and its manifest.
#[derive(Debug, Clone)]
pub enum PackageInfo {
    /// Installed theme, export or backup. `issues` holds the strict
    /// validation result.
    Theme {
        path: PathBuf,
        manifest: ThemeManifest,
        issues: Vec<ValidationIssue>,
    },
    Component {
        path: PathBuf,
        manifest: ComponentManifest,
    },
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Theme {
                path,
                manifest,
                issues,
            } => {
                let info = &manifest.theme_info;
                writeln!(f, "{} (theme)", dir_name(path))?;
                writeln!(f, "  Name:        {}", info.name)?;
                writeln!(f, "  Author:      {}", info.author)?;
                writeln!(f, "  Version:     {}", info.version)?;
                writeln!(f, "  Description: {}", info.description)?;
                writeln!(f, "  Device:      {}", info.device)?;
                writeln!(f, "  Systems:     {}", info.systems.join(", "))?;
                writeln!(f, "  Repository:  {}", info.repository_url)?;
                writeln!(f, "{}", ContentLine(&manifest.content))?;
                if issues.is_empty() {
                    write!(f, "  Valid")
                } else {
                    write!(f, "  {} validation issues:", issues.len())?;
                    for issue in issues {
                        write!(f, "\n    - {}", issue)?;
                    }
                    Ok(())
                }
            }
            Self::Component { path, manifest } => {
                let info = manifest.info();
                writeln!(f, "{} ({})", dir_name(path), info.component_type.label())?;
                writeln!(f, "  Name:        {}", info.name)?;
                writeln!(f, "  Author:      {}", info.author)?;
                writeln!(f, "  Version:     {}", info.version)?;
                writeln!(f, "  Description: {}", info.description)?;
                write!(f, "  Files:       {}", manifest.mappings().len())
            }
        }
    }
}

/// Overview of the store and the live device.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub data_dir: PathBuf,
    pub state: AppliedState,
    /// Name recorded in the live theme's manifest, if any.
    pub live_theme: Option<String>,
    /// Installed packages per type.
    pub installed: Vec<(PackageType, usize)>,
    pub backups: usize,
    pub exports: usize,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data directory: {}", self.data_dir.display())?;
        match (&self.state.theme, &self.live_theme) {
            (Some(entry), _) => writeln!(
                f,
                "Applied theme:  {} ({})",
                entry.name,
                entry.applied_at.format("%Y-%m-%d %H:%M")
            )?,
            (None, Some(live)) => {
                writeln!(f, "Live theme:     {} (not applied by this tool)", live)?
            }
            (None, None) => writeln!(f, "Applied theme:  none")?,
        }
        for (component_type, entry) in &self.state.components {
            writeln!(f, "  + {} {}", component_type.label(), entry.name)?;
        }
        for (package_type, count) in &self.installed {
            writeln!(f, "{:<15} {}", format!("{}:", package_type.label()), count)?;
        }
        writeln!(f, "{:<15} {}", "Exports:", self.exports)?;
        write!(f, "{:<15} {}", "Backups:", self.backups)
    }
}

impl<D: SystemDirectory> ThemeManager<D> {
    /// Find a package by name in themes, exports, backups and components,
    /// in that order.
    pub fn package_info(&self, name: &str) -> ThemeResult<PackageInfo> {
        let theme_path = match self.store.locate_theme(name)? {
            Some(path) => Some(path),
            None => Some(self.store.backup_path(name)?).filter(|path| path.is_dir()),
        };
        if let Some(path) = theme_path {
            let manifest = read_theme_manifest(&path)?;
            let issues = validate(&manifest, Strictness::Strict);
            return Ok(PackageInfo::Theme {
                path,
                manifest,
                issues,
            });
        }
        if let Some((_, path)) = self.store.locate_component(name)? {
            let manifest = read_component_manifest(&path)?;
            return Ok(PackageInfo::Component { path, manifest });
        }
        Err(ThemeError::PackageNotFound(name.to_string()))
    }

    /// Summarise the applied state and the store contents.
    pub fn status(&self) -> ThemeResult<StatusReport> {
        let state = self.load_state()?;
        let live_theme = read_theme_manifest(&self.layout().live_theme_dir())
            .ok()
            .map(|manifest| manifest.theme_info.name)
            .filter(|name| !name.is_empty());
        let installed = PackageType::ALL
            .into_iter()
            .map(|package_type| (package_type, self.store.list_packages(package_type).len()))
            .collect();
        Ok(StatusReport {
            data_dir: self.store.root().to_path_buf(),
            state,
            live_theme,
            installed,
            backups: self.store.list_backups().len(),
            exports: self.store.list_exports().len(),
        })
    }

    /// Create every store directory.
    pub fn init_store(&self) -> ThemeResult<PathBuf> {
        let root = self.store.root().to_path_buf();
        self.store
            .ensure_layout()
            .map_err(|e| TransferError::CreateDir {
                path: root.clone(),
                source: e,
            })?;
        tracing::info!(data_dir = %root.display(), "Initialised package store");
        Ok(root)
    }

    /// Delete an installed theme, export, component or backup.
    pub fn remove_package(&self, name: &str) -> ThemeResult<RemoveReport> {
        let path = match self.store.locate_theme(name)? {
            Some(path) => path,
            None => match self.store.locate_component(name)? {
                Some((_, path)) => path,
                None => {
                    let backup = self.store.backup_path(name)?;
                    if !backup.is_dir() {
                        return Err(ThemeError::PackageNotFound(name.to_string()));
                    }
                    backup
                }
            },
        };
        self.store.delete_package(&path)?;
        let removed = dir_name(&path);
        tracing::info!(package = %removed, "Removed package");
        Ok(RemoveReport {
            name: removed,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceLayout;
    use crate::engine::ManagerConfig;
    use crate::manifest::{write_component_manifest, write_theme_manifest, ContentCategory};
    use tempfile::TempDir;

    fn manager(temp: &TempDir) -> ThemeManager {
        let layout = DeviceLayout::new(temp.path().join("sd"), "tg5040");
        ThemeManager::new(ManagerConfig::new(layout).with_data_dir(temp.path().join("data")))
    }

    #[test]
    fn test_package_info_reports_strict_issues() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let dir = manager.store().themes_dir().join("Neon.theme");
        write_theme_manifest(&dir, &mut ThemeManifest::create_default("Neon", "Jane")).unwrap();

        match manager.package_info("Neon").unwrap() {
            PackageInfo::Theme { issues, .. } => {
                assert_eq!(
                    issues,
                    vec![ValidationIssue::MissingField("theme_info.description")]
                );
            }
            other => panic!("expected a theme, got {:?}", other),
        }
    }

    #[test]
    fn test_package_info_finds_components_and_backups() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let component = manager
            .store()
            .package_path(PackageType::Led, "Glow")
            .unwrap();
        let mut manifest =
            ComponentManifest::create_minimal(ContentCategory::Leds, "Glow", "Jane");
        write_component_manifest(&component, &mut manifest).unwrap();
        let backup = manager.store().backup_path("snap").unwrap();
        write_theme_manifest(&backup, &mut ThemeManifest::create_default("snap", "")).unwrap();

        assert!(matches!(
            manager.package_info("Glow.led").unwrap(),
            PackageInfo::Component { .. }
        ));
        assert!(matches!(
            manager.package_info("snap").unwrap(),
            PackageInfo::Theme { .. }
        ));
        assert!(matches!(
            manager.package_info("nothing"),
            Err(ThemeError::PackageNotFound(_))
        ));
    }

    #[test]
    fn test_init_and_status() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let root = manager.init_store().unwrap();
        assert!(root.join("Components/Wallpapers").is_dir());
        assert!(root.join("Backups").is_dir());

        let status = manager.status().unwrap();
        assert!(status.state.theme.is_none());
        assert_eq!(status.backups, 0);
        assert!(status.to_string().contains("Applied theme:  none"));
    }

    #[test]
    fn test_remove_package() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        let dir = manager.store().exports_dir().join("theme_1.theme");
        std::fs::create_dir_all(&dir).unwrap();

        let report = manager.remove_package("theme_1").unwrap();
        assert_eq!(report.name, "theme_1.theme");
        assert!(!dir.exists());
        assert!(matches!(
            manager.remove_package("theme_1"),
            Err(ThemeError::PackageNotFound(_))
        ));
    }
}
