//! Operation definitions
//!
//! A documented operation is a callable endpoint extracted from an annotated
//! method. Functions are read-only (`GET`), actions mutate state (`POST`).

use crate::node::{repository_of, ProjectInfo, ProjectKind};
use crate::params::{ParamDef, ReturnDef, TypeParamDef};
use serde::{Deserialize, Serialize};

/// Documented operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDef {
    /// Namespace of the declaring class
    pub namespace: String,

    /// Declaring class name
    pub class_name: String,

    /// Method name in source
    pub method_name: String,

    /// Public operation name (defaults to the method name)
    pub operation_name: String,

    /// Display category
    pub category: String,

    /// Category as used in links and file names
    pub category_slug: String,

    /// Unique link slug, assigned once per generation run
    #[serde(default)]
    pub slug: String,

    /// Mutating action (`POST`) rather than a read-only function
    #[serde(default)]
    pub is_action: bool,

    /// Optional icon name
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<String>,

    /// Short description from the operation attribute
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    /// Render-ready documentation body
    #[serde(default)]
    pub documentation: String,

    /// Parameters; the first one is always the target content
    #[serde(default)]
    pub parameters: Vec<ParamDef>,

    /// Generic type parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParamDef>,

    /// Return value
    #[serde(default)]
    pub return_value: ReturnDef,

    /// Roles allowed to call the operation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_roles: Vec<String>,

    /// Permissions required on the target content
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_permissions: Vec<String>,

    /// Policies that must be satisfied
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_policies: Vec<String>,

    /// Scenarios the operation appears in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<String>,

    /// Content types the operation is bound to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_types: Vec<String>,

    /// Source file
    pub file: String,

    /// Source file relative to the scanned root
    #[serde(default)]
    pub file_relative: String,

    /// Owning project, when known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project: Option<ProjectInfo>,
}

/// Partition an operation falls into when documentation is grouped by project family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationGroup {
    /// Standard or modern, non-test project
    Core,
    /// Legacy framework or unknown project kind
    LegacyFramework,
    /// Test project or no project at all
    Test,
}

impl OperationGroup {
    /// Heading used when groups are rendered separately
    pub fn title(&self) -> &'static str {
        match self {
            OperationGroup::Core => ".NET Standard / Core Operations",
            OperationGroup::LegacyFramework => ".NET Framework Operations",
            OperationGroup::Test => "Test Operations",
        }
    }
}

impl OperationDef {
    /// HTTP method label
    pub fn method_label(&self) -> &'static str {
        if self.is_action {
            "POST"
        } else {
            "GET"
        }
    }

    /// Fully-qualified declaring class
    pub fn full_class_name(&self) -> String {
        if self.namespace.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.class_name)
        }
    }

    /// Kind of the owning project
    pub fn project_kind(&self) -> ProjectKind {
        self.project
            .as_ref()
            .map(|p| p.kind)
            .unwrap_or(ProjectKind::Unknown)
    }

    /// Name of the owning project
    pub fn project_name(&self) -> &str {
        self.project.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    /// Repository derived from the source path
    pub fn repository(&self) -> String {
        repository_of(&self.file)
    }

    /// Group used by the include-all rendering
    ///
    /// Test membership wins over framework classification, so a legacy test
    /// project lands in [`OperationGroup::Test`].
    pub fn group(&self) -> OperationGroup {
        let is_test = self.project.as_ref().map(|p| p.is_test_project).unwrap_or(true);
        if is_test {
            return OperationGroup::Test;
        }
        match self.project_kind() {
            ProjectKind::LegacyFramework | ProjectKind::Unknown => OperationGroup::LegacyFramework,
            ProjectKind::Standard | ProjectKind::Modern => OperationGroup::Core,
        }
    }

    /// Parameters after the implicit target content parameter
    pub fn request_params(&self) -> &[ParamDef] {
        self.parameters.get(1..).unwrap_or(&[])
    }

    /// Whether the operation can only be called on the repository root
    pub fn is_root_only(&self) -> bool {
        self.content_types.len() == 1 && self.content_types[0] == "N.CT.PortalRoot"
    }

    /// Whether any requirement list is populated
    pub fn has_requirements(&self) -> bool {
        !(self.content_types.is_empty()
            && self.allowed_roles.is_empty()
            && self.required_permissions.is_empty()
            && self.required_policies.is_empty()
            && self.scenarios.is_empty())
    }

    /// Names of undocumented parts: summary, request parameters and the return value of functions
    pub fn missing_documentation(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.documentation.trim().is_empty() {
            missing.push("<summary>".to_string());
        }
        for param in self.request_params() {
            if param.is_undocumented() {
                missing.push(param.name.clone());
            }
        }
        if !self.is_action && self.return_value.documentation.trim().is_empty() {
            missing.push("<returns>".to_string());
        }
        missing
    }
}

/// Split operations into (core, legacy framework, test) groups, keeping encounter order.
pub fn partition_operations(ops: &[OperationDef]) -> (Vec<&OperationDef>, Vec<&OperationDef>, Vec<&OperationDef>) {
    let mut core = Vec::new();
    let mut legacy = Vec::new();
    let mut test = Vec::new();
    for op in ops {
        match op.group() {
            OperationGroup::Core => core.push(op),
            OperationGroup::LegacyFramework => legacy.push(op),
            OperationGroup::Test => test.push(op),
        }
    }
    (core, legacy, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::mock_operation;

    #[test]
    fn test_method_label() {
        let mut op = mock_operation("GetSchema", "Tools");
        assert_eq!(op.method_label(), "GET");
        op.is_action = true;
        assert_eq!(op.method_label(), "POST");
    }

    #[test]
    fn test_group() {
        let op = mock_operation("GetSchema", "Tools");
        assert_eq!(op.group(), OperationGroup::Core);

        let mut legacy = op.clone();
        legacy.project = Some(ProjectInfo::new("Portal", ProjectKind::LegacyFramework));
        assert_eq!(legacy.group(), OperationGroup::LegacyFramework);

        let mut test = op.clone();
        test.project = Some(ProjectInfo::new("Tests", ProjectKind::Modern).as_test());
        assert_eq!(test.group(), OperationGroup::Test);

        let mut orphan = op;
        orphan.project = None;
        assert_eq!(orphan.group(), OperationGroup::Test);
    }

    #[test]
    fn test_partition_operations() {
        let core = mock_operation("A", "Tools");
        let mut legacy = mock_operation("B", "Tools");
        legacy.project = Some(ProjectInfo::new("Portal", ProjectKind::Unknown));
        let ops = vec![legacy, core];

        let (core, legacy, test) = partition_operations(&ops);
        assert_eq!(core.len(), 1);
        assert_eq!(core[0].operation_name, "A");
        assert_eq!(legacy.len(), 1);
        assert!(test.is_empty());
    }

    #[test]
    fn test_missing_documentation() {
        let mut op = mock_operation("GetSchema", "Tools");
        op.parameters.push(ParamDef::new("contentTypeName", "string"));
        assert_eq!(op.missing_documentation(), vec!["<summary>", "contentTypeName", "<returns>"]);

        op.documentation = "Gets the schema.".into();
        op.parameters[1].documentation = "Name.".into();
        op.return_value.documentation = "Schema.".into();
        assert!(op.missing_documentation().is_empty());
    }

    #[test]
    fn test_root_only() {
        let mut op = mock_operation("Install", "Tools");
        op.content_types = vec!["N.CT.PortalRoot".into()];
        assert!(op.is_root_only());
        assert!(op.has_requirements());
    }
}
