//! Shared node types
//!
//! Project descriptors, documentation audiences and the source-location
//! helpers every documented entity carries.

use serde::{Deserialize, Serialize};

/// Target-framework family of the project an entity was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectKind {
    /// Classic, Windows-only framework
    LegacyFramework,
    /// Portable standard library target
    Standard,
    /// Current cross-platform runtime
    Modern,
    /// Could not be determined
    #[default]
    Unknown,
}

impl ProjectKind {
    /// Classify a target-framework moniker such as `net8.0` or `netstandard2.0`.
    ///
    /// Multi-target monikers (`net6.0;net8.0`) are classified by their first entry.
    pub fn from_target_framework(moniker: &str) -> Self {
        let first = moniker.split(';').next().unwrap_or("").trim().to_lowercase();

        if first.starts_with("netcoreapp") {
            ProjectKind::Modern
        } else if first.starts_with("netstandard") {
            ProjectKind::Standard
        } else if first.starts_with("netframework") || first.starts_with("v4") || first.starts_with("net4") {
            ProjectKind::LegacyFramework
        } else if first.starts_with("net")
            && first[3..].chars().next().is_some_and(|c| c.is_ascii_digit())
        {
            ProjectKind::Modern
        } else {
            ProjectKind::Unknown
        }
    }

    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            ProjectKind::LegacyFramework => "legacy-framework",
            ProjectKind::Standard => "standard",
            ProjectKind::Modern => "modern",
            ProjectKind::Unknown => "unknown",
        }
    }
}

/// Project an entity belongs to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Project name (file stem of the project file)
    pub name: String,

    /// Project directory
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<String>,

    /// Raw target-framework moniker
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target_framework: Option<String>,

    /// Framework family; derived from `target_framework` when left unknown
    #[serde(default)]
    pub kind: ProjectKind,

    /// Whether this is a test project
    #[serde(default)]
    pub is_test_project: bool,
}

impl ProjectInfo {
    /// Create a project of a known kind
    pub fn new(name: impl Into<String>, kind: ProjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    /// Mark as test project
    pub fn as_test(mut self) -> Self {
        self.is_test_project = true;
        self
    }

    /// Fill in `kind` from the target framework when the front end left it unknown
    pub fn resolved(mut self) -> Self {
        if self.kind == ProjectKind::Unknown {
            if let Some(tf) = &self.target_framework {
                self.kind = ProjectKind::from_target_framework(tf);
            }
        }
        self
    }
}

/// Reader group a documentation pass is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Audience {
    /// External API consumers
    Frontend,
    /// Internal developers; sees backend-only details
    Backend,
}

impl Audience {
    /// Both audiences in the order the passes run
    pub const ALL: [Audience; 2] = [Audience::Frontend, Audience::Backend];

    /// Whether backend-only properties are visible to this audience
    pub fn includes_backend_only(&self) -> bool {
        matches!(self, Audience::Backend)
    }

    /// Output directory name for this audience
    pub fn dir_name(&self) -> &'static str {
        match self {
            Audience::Frontend => "frontend",
            Audience::Backend => "backend",
        }
    }
}

/// Repository name derived from a source path: the last directory before `src`.
///
/// ```
/// use apidoc_etch::node::repository_of;
///
/// assert_eq!(repository_of("C:\\dev\\sensenet\\src\\Services\\Options.cs"), "sensenet");
/// assert_eq!(repository_of("/work/sn-io/src/App/Args.cs"), "sn-io");
/// ```
pub fn repository_of(file: &str) -> String {
    file.split(['\\', '/'])
        .filter(|s| !s.is_empty())
        .take_while(|s| !s.eq_ignore_ascii_case("src"))
        .last()
        .unwrap_or("")
        .to_string()
}

/// Path of `file` relative to `root`, or `file` itself when it lies outside.
pub fn relative_to(file: &str, root: Option<&str>) -> String {
    let Some(root) = root else {
        return file.to_string();
    };
    let root = root.trim_end_matches(['\\', '/']);
    if root.is_empty() {
        return file.to_string();
    }
    match file.strip_prefix(root) {
        Some(rest) if rest.starts_with(['\\', '/']) => rest[1..].to_string(),
        _ => file.to_string(),
    }
}

/// Split a relative path into (directory, file name), accepting both separators.
pub fn split_file_name(path: &str) -> (&str, &str) {
    match path.rfind(['\\', '/']) {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_kind_from_moniker() {
        assert_eq!(ProjectKind::from_target_framework("net8.0"), ProjectKind::Modern);
        assert_eq!(ProjectKind::from_target_framework("netcoreapp3.1"), ProjectKind::Modern);
        assert_eq!(ProjectKind::from_target_framework("netstandard2.0"), ProjectKind::Standard);
        assert_eq!(
            ProjectKind::from_target_framework("netframework4.8"),
            ProjectKind::LegacyFramework
        );
        assert_eq!(ProjectKind::from_target_framework("net48"), ProjectKind::LegacyFramework);
        assert_eq!(ProjectKind::from_target_framework("net6.0;net8.0"), ProjectKind::Modern);
        assert_eq!(ProjectKind::from_target_framework("uap10"), ProjectKind::Unknown);
        assert_eq!(ProjectKind::from_target_framework(""), ProjectKind::Unknown);
    }

    #[test]
    fn test_project_resolved() {
        let project = ProjectInfo {
            name: "SenseNet.Services".into(),
            target_framework: Some("netstandard2.0".into()),
            ..Default::default()
        }
        .resolved();
        assert_eq!(project.kind, ProjectKind::Standard);

        let explicit = ProjectInfo::new("Legacy", ProjectKind::LegacyFramework).resolved();
        assert_eq!(explicit.kind, ProjectKind::LegacyFramework);
    }

    #[test]
    fn test_repository_of() {
        assert_eq!(repository_of("sensenet/src/ContentRepository/Foo.cs"), "sensenet");
        assert_eq!(repository_of("Foo.cs"), "Foo.cs");
        assert_eq!(repository_of(""), "");
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(relative_to("/repo/src/a.cs", Some("/repo")), "src/a.cs");
        assert_eq!(relative_to("/repo/src/a.cs", Some("/repo/")), "src/a.cs");
        assert_eq!(relative_to("/other/a.cs", Some("/repo")), "/other/a.cs");
        assert_eq!(relative_to("/repo2/a.cs", Some("/repo")), "/repo2/a.cs");
        assert_eq!(relative_to("a.cs", None), "a.cs");
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("src\\Options\\A.cs"), ("src\\Options", "A.cs"));
        assert_eq!(split_file_name("A.cs"), ("", "A.cs"));
    }

    #[test]
    fn test_audience() {
        assert!(!Audience::Frontend.includes_backend_only());
        assert!(Audience::Backend.includes_backend_only());
        assert_eq!(Audience::ALL[0].dir_name(), "frontend");
    }
}
