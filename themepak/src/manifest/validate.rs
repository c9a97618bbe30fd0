//! Manifest validation.
//!
//! Validation never stops at the first problem: every issue is collected so
//! a user can fix a manifest in one pass.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::component::ComponentManifest;
use super::theme::ThemeManifest;

/// How much of a manifest must be filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Installing a theme: provenance and systems are required.
    Strict,
    /// Restoring a backup or importing a component: only a name is required.
    Permissive,
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A required field is empty.
    MissingField(&'static str),

    /// The repository URL is not a GitHub repository URL.
    InvalidRepositoryUrl(String),

    /// The systems list is empty.
    NoSystems,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field '{}'", field),
            Self::InvalidRepositoryUrl(url) => write!(
                f,
                "repository_url '{}' is not of the form https://github.com/<owner>/<repo>",
                url
            ),
            Self::NoSystems => write!(f, "systems list is empty"),
        }
    }
}

/// Whether `url` is `https://github.com/<owner>/<repo>`.
///
/// ```
/// use themepak::manifest::is_github_repository_url;
///
/// assert!(is_github_repository_url("https://github.com/jane/neon"));
/// assert!(is_github_repository_url("https://github.com/jane/neon.git"));
/// assert!(!is_github_repository_url("https://gitlab.com/jane/neon"));
/// assert!(!is_github_repository_url("https://github.com/jane"));
/// ```
pub fn is_github_repository_url(url: &str) -> bool {
    static GITHUB: OnceLock<Option<Regex>> = OnceLock::new();
    GITHUB
        .get_or_init(|| Regex::new(r"^https://github\.com/[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+/?$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(url.trim()))
}

/// Validate a theme manifest, returning every issue found.
pub fn validate(manifest: &ThemeManifest, strictness: Strictness) -> Vec<ValidationIssue> {
    let info = &manifest.theme_info;
    let mut issues = Vec::new();

    require(&mut issues, "theme_info.name", &info.name);
    if strictness == Strictness::Permissive {
        return issues;
    }

    require(&mut issues, "theme_info.author", &info.author);
    require(&mut issues, "theme_info.description", &info.description);
    if info.repository_url.trim().is_empty() {
        issues.push(ValidationIssue::MissingField("theme_info.repository_url"));
    } else if !is_github_repository_url(&info.repository_url) {
        issues.push(ValidationIssue::InvalidRepositoryUrl(
            info.repository_url.clone(),
        ));
    }
    require(&mut issues, "theme_info.commit", &info.commit);
    require(&mut issues, "theme_info.branch", &info.branch);
    require(&mut issues, "theme_info.device", &info.device);
    if info.systems.iter().all(|system| system.trim().is_empty()) {
        issues.push(ValidationIssue::NoSystems);
    }

    issues
}

/// Validate a component manifest. Components only require a name.
pub fn validate_component(manifest: &ComponentManifest) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    require(&mut issues, "component_info.name", &manifest.info().name);
    issues
}

fn require(issues: &mut Vec<ValidationIssue>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        issues.push(ValidationIssue::MissingField(field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::theme::ContentCategory;

    #[test]
    fn test_default_manifest_is_strictly_valid() {
        let mut manifest = ThemeManifest::create_default("Neon", "Jane");
        manifest.theme_info.description = "Pink and blue".to_string();
        assert!(validate(&manifest, Strictness::Strict).is_empty());
    }

    #[test]
    fn test_strict_enumerates_every_issue() {
        let mut manifest = ThemeManifest::default();
        manifest.theme_info.name = "Bare".to_string();
        manifest.theme_info.repository_url = "https://example.com/x".to_string();

        let issues = validate(&manifest, Strictness::Strict);
        assert_eq!(
            issues,
            vec![
                ValidationIssue::MissingField("theme_info.author"),
                ValidationIssue::MissingField("theme_info.description"),
                ValidationIssue::InvalidRepositoryUrl("https://example.com/x".to_string()),
                ValidationIssue::MissingField("theme_info.commit"),
                ValidationIssue::MissingField("theme_info.branch"),
                ValidationIssue::MissingField("theme_info.device"),
                ValidationIssue::NoSystems,
            ]
        );
    }

    #[test]
    fn test_permissive_requires_only_name() {
        let mut manifest = ThemeManifest::default();
        assert_eq!(
            validate(&manifest, Strictness::Permissive),
            vec![ValidationIssue::MissingField("theme_info.name")]
        );

        manifest.theme_info.name = "backup_20250101_000000".to_string();
        assert!(validate(&manifest, Strictness::Permissive).is_empty());
        assert!(!validate(&manifest, Strictness::Strict).is_empty());
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut manifest = ThemeManifest::create_default("  ", "Jane");
        manifest.theme_info.description = "x".to_string();
        manifest.theme_info.systems = vec![" ".to_string()];
        let issues = validate(&manifest, Strictness::Strict);
        assert!(issues.contains(&ValidationIssue::MissingField("theme_info.name")));
        assert!(issues.contains(&ValidationIssue::NoSystems));
    }

    #[test]
    fn test_validate_component() {
        let manifest = ComponentManifest::create_minimal(ContentCategory::Icons, "", "Jane");
        assert_eq!(
            validate_component(&manifest),
            vec![ValidationIssue::MissingField("component_info.name")]
        );
    }

    #[test]
    fn test_issue_display() {
        assert_eq!(
            ValidationIssue::MissingField("theme_info.commit").to_string(),
            "missing required field 'theme_info.commit'"
        );
    }
}
