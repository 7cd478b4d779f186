//! Options class definitions
//!
//! An options class is a configuration class bound to a hierarchical
//! configuration section such as `sensenet:Authentication`.

use crate::node::{repository_of, ProjectInfo};
use serde::{Deserialize, Serialize};

/// Characters that separate the segments of a configuration section path
pub const SECTION_SEPARATORS: [char; 3] = [':', '/', '.'];

/// Property of an options class or a plain class
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    /// Property name
    pub name: String,

    /// Declared type as written in source
    #[serde(rename = "type")]
    pub type_name: String,

    /// Fully-qualified type resolved by the front end
    #[serde(default)]
    pub resolved_type: String,

    /// Type is an enum
    #[serde(default)]
    pub is_enum: bool,

    /// Type cannot be exposed outside the service (callbacks)
    #[serde(default)]
    pub is_backend_only: bool,

    /// Has a getter
    #[serde(default)]
    pub has_getter: bool,

    /// Has a setter
    #[serde(default)]
    pub has_setter: bool,

    /// Initializer text, e.g. `= 42`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub initializer: Option<String>,

    /// Render-ready documentation
    #[serde(default)]
    pub documentation: String,
}

impl PropertyDef {
    /// Create a property whose resolved type equals the declared one
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            name: name.into(),
            resolved_type: type_name.clone(),
            type_name,
            has_getter: true,
            has_setter: true,
            ..Default::default()
        }
    }

    /// Set the resolved type
    pub fn with_resolved_type(mut self, resolved: impl Into<String>) -> Self {
        self.resolved_type = resolved.into();
        self
    }

    /// Mark as enum-typed
    pub fn as_enum(mut self) -> Self {
        self.is_enum = true;
        self
    }

    /// Set the initializer
    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = Some(initializer.into());
        self
    }

    /// Default value shown in backend pages (initializer without `=`)
    pub fn default_value(&self) -> Option<String> {
        self.initializer
            .as_ref()
            .map(|init| init.replace('=', "").trim().to_string())
    }

    /// Accessor list as written in a class body: ` get; set;`
    pub fn accessors(&self) -> String {
        let mut accessors = String::new();
        if self.has_getter {
            accessors.push_str(" get;");
        }
        if self.has_setter {
            accessors.push_str(" set;");
        }
        accessors
    }
}

/// Whether a resolved type is a callback that cannot be configured externally
pub fn is_backend_only_type(resolved_type: &str) -> bool {
    resolved_type.starts_with("System.Func<") || resolved_type.starts_with("System.Action")
}

/// Documented options class
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsClassDef {
    /// Namespace
    pub namespace: String,

    /// Class name
    pub class_name: String,

    /// Configuration section path
    pub section: String,

    /// Render-ready documentation
    #[serde(default)]
    pub documentation: String,

    /// Public properties in declaration order
    #[serde(default)]
    pub properties: Vec<PropertyDef>,

    /// Using directives active in the declaring file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub using_directives: Vec<String>,

    /// Unique link slug
    #[serde(default)]
    pub slug: String,

    /// Source file
    pub file: String,

    /// Source file relative to the scanned root
    #[serde(default)]
    pub file_relative: String,

    /// Owning project, when known
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project: Option<ProjectInfo>,
}

impl OptionsClassDef {
    /// Fully-qualified class name
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.class_name)
        }
    }

    /// Non-empty segments of the configuration section path
    pub fn section_segments(&self) -> Vec<&str> {
        section_segments(&self.section)
    }

    /// Repository derived from the source path
    pub fn repository(&self) -> String {
        repository_of(&self.file)
    }

    /// Name of the owning project
    pub fn project_name(&self) -> &str {
        self.project.as_ref().map(|p| p.name.as_str()).unwrap_or("")
    }

    /// Property listing used in logs and the report: `int Port; string Host`
    pub fn property_signature(&self, separator: &str) -> String {
        self.properties
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Names of undocumented parts: class summary and properties
    pub fn missing_documentation(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.documentation.trim().is_empty() {
            missing.push("<class summary>".to_string());
        }
        for prop in &self.properties {
            if prop.documentation.trim().is_empty() {
                missing.push(prop.name.clone());
            }
        }
        missing
    }
}

/// Split a section path on `:`, `/` and `.`, dropping empty segments.
pub fn section_segments(section: &str) -> Vec<&str> {
    section
        .split(SECTION_SEPARATORS)
        .filter(|s| !s.is_empty())
        .collect()
}
