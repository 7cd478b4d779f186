//! Parameter definition types
//!
//! This module provides the parameter, type-parameter and return value
//! descriptors attached to documented operations.

use serde::{Deserialize, Serialize};

/// Parameter of an operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDef {
    /// Parameter name
    pub name: String,

    /// Declared type as written in source
    #[serde(rename = "type")]
    pub type_name: String,

    /// Fully-qualified type resolved by the front end
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resolved_type: Option<String>,

    /// Whether the parameter has a default value
    #[serde(default)]
    pub optional: bool,

    /// Documentation attached by the doc-comment transformer
    #[serde(default)]
    pub documentation: String,

    /// Literal example override from the `example` attribute of the param tag
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub example: Option<String>,
}

impl ParamDef {
    /// Create a new parameter definition
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Set the resolved type
    pub fn with_resolved_type(mut self, resolved: impl Into<String>) -> Self {
        self.resolved_type = Some(resolved.into());
        self
    }

    /// Mark as optional
    pub fn as_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set documentation
    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = doc.into();
        self
    }

    /// Resolved type, falling back to the declared one
    pub fn full_type(&self) -> &str {
        self.resolved_type.as_deref().unwrap_or(&self.type_name)
    }

    /// Declared type without namespace qualification
    pub fn simple_type(&self) -> &str {
        simple_type_name(&self.type_name)
    }

    /// Whether documentation is missing
    pub fn is_undocumented(&self) -> bool {
        self.documentation.trim().is_empty()
    }
}

/// Generic type parameter of an operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParamDef {
    /// Type parameter name
    pub name: String,

    /// Documentation from the matching `typeparam` tag
    #[serde(default)]
    pub documentation: String,
}

impl TypeParamDef {
    /// Create a new type parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: String::new(),
        }
    }
}

/// Return value of an operation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnDef {
    /// Declared return type
    #[serde(rename = "type")]
    pub type_name: String,

    /// Documentation from the `returns` tag
    #[serde(default)]
    pub documentation: String,
}

impl ReturnDef {
    /// Create a return value descriptor
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            documentation: String::new(),
        }
    }

    /// Whether the operation returns nothing
    pub fn is_void(&self) -> bool {
        matches!(self.type_name.as_str(), "" | "void" | "Task" | "System.Threading.Tasks.Task")
    }
}

/// Strip namespace qualification from a type name, keeping generic arguments intact.
///
/// `System.Collections.Generic.List<System.String>` becomes `List<System.String>`.
pub fn simple_type_name(type_name: &str) -> &str {
    let head_end = type_name.find('<').unwrap_or(type_name.len());
    match type_name[..head_end].rfind('.') {
        Some(dot) => &type_name[dot + 1..],
        None => type_name,
    }
}
