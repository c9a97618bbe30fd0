//! Operation reports.
//!
//! Every engine operation returns a report describing what it did,
//! including partial counts for skipped or dangling entries. `Display`
//! renders the summary shown by the CLI.

use std::fmt;
use std::path::PathBuf;

use crate::archive::ExtractSummary;
use crate::manifest::{ContentCategory, ContentSummary};
use crate::package::PackageType;

/// Counts gathered while placing files on the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementCounts {
    /// Files written into the live theme directory.
    pub theme_files: usize,
    /// Files written outside it (icons in `.media` folders).
    pub external_files: usize,
    /// Stale icons removed before placing new ones.
    pub cleared: usize,
    /// Mappings whose package file is missing.
    pub dangling: usize,
    /// Mappings whose device path is outside the SD card.
    pub rejected: usize,
    /// Shared settings files rewritten.
    pub settings_written: usize,
}

impl PlacementCounts {
    pub fn files(&self) -> usize {
        self.theme_files + self.external_files
    }
}

impl fmt::Display for PlacementCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} theme files, {} external files, {} settings files",
            self.theme_files, self.external_files, self.settings_written
        )?;
        if self.dangling > 0 {
            write!(f, ", {} missing", self.dangling)?;
        }
        if self.rejected > 0 {
            write!(f, ", {} rejected", self.rejected)?;
        }
        Ok(())
    }
}

/// Where an applied package came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageOrigin {
    Installed,
    Export,
    Backup,
}

/// Result of applying a theme or restoring a backup.
#[derive(Debug, Clone)]
pub struct ApplyReport {
    /// Package directory name.
    pub name: String,
    pub origin: PackageOrigin,
    pub source: PathBuf,
    pub counts: PlacementCounts,
    /// Snapshot taken before the live theme was replaced.
    pub backup: Option<BackupReport>,
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(backup) = &self.backup {
            writeln!(f, "{}", backup)?;
        }
        let verb = match self.origin {
            PackageOrigin::Backup => "Restored",
            _ => "Applied",
        };
        write!(f, "{} {}: {}", verb, self.name, self.counts)
    }
}

/// Result of exporting the live device state.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub name: String,
    pub path: PathBuf,
    pub content: ContentSummary,
    /// Known locations checked on the device.
    pub checked: usize,
    /// Preview generated rather than taken from a wallpaper.
    pub placeholder_preview: bool,
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Exported {} to {}", self.name, self.path.display())?;
        write!(f, "{}", ContentLine(&self.content))
    }
}

/// Result of importing a component.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub name: String,
    pub component_type: PackageType,
    pub counts: PlacementCounts,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} {}: {}",
            self.component_type.label(),
            self.name,
            self.counts
        )
    }
}

/// A component written by deconstruction.
#[derive(Debug, Clone)]
pub struct ExtractedComponent {
    pub name: String,
    pub component_type: PackageType,
    pub path: PathBuf,
    pub files: usize,
    /// Mappings dropped because their file was missing.
    pub dangling: usize,
}

/// Result of splitting a theme into components.
#[derive(Debug, Clone)]
pub struct DeconstructReport {
    pub theme: String,
    pub components: Vec<ExtractedComponent>,
    /// Categories that failed, with the reason.
    pub skipped: Vec<(ContentCategory, String)>,
}

impl fmt::Display for DeconstructReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deconstructed {} into {} components",
            self.theme,
            self.components.len()
        )?;
        for component in &self.components {
            write!(
                f,
                "\n  {:<10} {} ({} files)",
                component.component_type.label(),
                component.name,
                component.files
            )?;
        }
        for (category, reason) in &self.skipped {
            write!(f, "\n  skipped {}: {}", category, reason)?;
        }
        Ok(())
    }
}

/// Result of rotating backups.
#[derive(Debug, Clone, Default)]
pub struct RotationReport {
    pub kept: usize,
    pub deleted: Vec<String>,
    /// Backups whose deletion failed.
    pub failed: Vec<String>,
}

impl fmt::Display for RotationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kept {} backups, deleted {}",
            self.kept,
            self.deleted.len()
        )?;
        if !self.failed.is_empty() {
            write!(f, " ({} could not be deleted)", self.failed.len())?;
        }
        Ok(())
    }
}

/// Result of creating a backup.
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub name: String,
    pub path: PathBuf,
    pub content: ContentSummary,
    pub rotation: RotationReport,
}

impl fmt::Display for BackupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backed up live theme to {}", self.name)?;
        writeln!(f, "{}", ContentLine(&self.content))?;
        write!(f, "{}", self.rotation)
    }
}

/// Result of installing a package archive.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub name: String,
    pub package_type: PackageType,
    pub path: PathBuf,
    pub summary: ExtractSummary,
}

impl fmt::Display for InstallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Installed {} {} ({} files) to {}",
            self.package_type.label(),
            self.name,
            self.summary.files,
            self.path.display()
        )
    }
}

/// Result of removing a package.
#[derive(Debug, Clone)]
pub struct RemoveReport {
    pub name: String,
    pub path: PathBuf,
}

impl fmt::Display for RemoveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Removed {}", self.name)
    }
}

pub(super) struct ContentLine<'a>(pub(super) &'a ContentSummary);

impl fmt::Display for ContentLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = ContentCategory::ALL
            .into_iter()
            .map(|category| format!("{} {}", self.0.get(category).count, category))
            .collect();
        write!(f, "  {}", parts.join(", "))
    }
}
