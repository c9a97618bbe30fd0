//! Common types and utilities shared across CLI commands.

use clap::ValueEnum;
use console::style;
use dialoguer::Confirm;
use themepak::package::{PackageEntry, PackageType};

use crate::error::CliError;

/// Package listing selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListKind {
    /// Installed full themes
    Themes,
    /// Exports of the live device
    Exports,
    /// Backups of the live device
    Backups,
    /// Wallpaper components (.bg)
    Wallpapers,
    /// Icon components (.icon)
    Icons,
    /// Accent color components (.acc)
    Accents,
    /// LED components (.led)
    Leds,
    /// Font components (.font)
    Fonts,
    /// Overlay components (.over)
    Overlays,
}

impl ListKind {
    /// Every kind, in listing order.
    pub const ALL: [ListKind; 9] = [
        ListKind::Themes,
        ListKind::Exports,
        ListKind::Backups,
        ListKind::Wallpapers,
        ListKind::Icons,
        ListKind::Accents,
        ListKind::Leds,
        ListKind::Fonts,
        ListKind::Overlays,
    ];

    /// Section heading.
    pub fn heading(&self) -> &'static str {
        match self {
            ListKind::Themes => "Themes",
            ListKind::Exports => "Exports",
            ListKind::Backups => "Backups",
            ListKind::Wallpapers => "Wallpapers",
            ListKind::Icons => "Icons",
            ListKind::Accents => "Accents",
            ListKind::Leds => "LEDs",
            ListKind::Fonts => "Fonts",
            ListKind::Overlays => "Overlays",
        }
    }

    /// Store package type for installed packages; `None` for exports and backups.
    pub fn package_type(&self) -> Option<PackageType> {
        match self {
            ListKind::Themes => Some(PackageType::Theme),
            ListKind::Wallpapers => Some(PackageType::Wallpaper),
            ListKind::Icons => Some(PackageType::Icon),
            ListKind::Accents => Some(PackageType::Accent),
            ListKind::Leds => Some(PackageType::Led),
            ListKind::Fonts => Some(PackageType::Font),
            ListKind::Overlays => Some(PackageType::Overlay),
            ListKind::Exports | ListKind::Backups => None,
        }
    }
}

/// Print a heading followed by one package per line.
pub fn print_entries(heading: &str, entries: &[PackageEntry]) {
    println!("{} ({})", style(heading).bold(), entries.len());
    if entries.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for entry in entries {
        println!("  {}", entry.name);
    }
}

/// Print a success line.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_component_kind_has_a_type() {
        let typed: Vec<PackageType> = ListKind::ALL
            .iter()
            .filter_map(ListKind::package_type)
            .collect();
        assert_eq!(typed.len(), PackageType::ALL.len());
    }

    #[test]
    fn test_value_names() {
        assert_eq!(ListKind::from_str("leds", true).unwrap(), ListKind::Leds);
    }
}
