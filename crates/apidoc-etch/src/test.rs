//! Test utilities and mock objects for apidoc-etch.
//!
//! Fixtures for unit and integration tests: ready-made operations, options
//! classes and declaration dumps.
//!
//! # Example
//!
//! ```
//! use apidoc_etch::test::{mock_operation, mock_options_class};
//!
//! let op = mock_operation("GetSchema", "Tools");
//! assert_eq!(op.category_slug, "tools");
//!
//! let oc = mock_options_class("DataOptions", "sensenet:Data", vec![]);
//! assert_eq!(oc.full_name(), "SenseNet.Configuration.DataOptions");
//! ```

use crate::node::{ProjectInfo, ProjectKind};
use crate::operation::OperationDef;
use crate::options_class::{OptionsClassDef, PropertyDef};
use crate::params::{ParamDef, ReturnDef};
use crate::slug::category_slug;
use serde_json::{json, Value};

/// Project every mock entity belongs to
pub fn mock_project() -> ProjectInfo {
    ProjectInfo::new("SenseNet.Services", ProjectKind::Modern)
}

/// Create a mock function operation.
///
/// The operation has only the implicit `content` parameter, returns `string`
/// and belongs to a modern non-test project, so it is a core operation.
///
/// ```
/// use apidoc_etch::test::mock_operation;
///
/// let op = mock_operation("Approve", "Content");
/// assert_eq!(op.method_label(), "GET");
/// assert!(op.request_params().is_empty());
/// ```
pub fn mock_operation(name: &str, category: &str) -> OperationDef {
    OperationDef {
        namespace: "SenseNet.Services".to_string(),
        class_name: "ODataOperations".to_string(),
        method_name: name.to_string(),
        operation_name: name.to_string(),
        category: category.to_string(),
        category_slug: category_slug(category),
        parameters: vec![ParamDef::new("content", "Content")],
        return_value: ReturnDef::new("string"),
        project: Some(mock_project()),
        ..Default::default()
    }
}

/// Create a mock options class bound to `section`
pub fn mock_options_class(name: &str, section: &str, properties: Vec<PropertyDef>) -> OptionsClassDef {
    OptionsClassDef {
        namespace: "SenseNet.Configuration".to_string(),
        class_name: name.to_string(),
        section: section.to_string(),
        properties,
        project: Some(mock_project()),
        ..Default::default()
    }
}

/// Create a mock property with documentation
pub fn mock_property(name: &str, type_name: &str, documentation: &str) -> PropertyDef {
    let mut prop = PropertyDef::new(name, type_name);
    prop.documentation = documentation.to_string();
    prop
}

/// Raw operation declaration in dump format
pub fn mock_operation_json(method: &str, attribute: &str, category: &str) -> Value {
    json!({
        "kind": "operation",
        "namespace": "SenseNet.Services",
        "className": "ODataOperations",
        "methodName": method,
        "attribute": attribute,
        "category": category,
        "parameters": [{ "name": "content", "type": "Content" }],
        "returnType": "string",
        "documentation": format!("/// <summary>{} operation.</summary>", method)
    })
}

/// Raw options class declaration in dump format
pub fn mock_options_json(class_name: &str, section: &str, properties: &[(&str, &str)]) -> Value {
    let properties: Vec<Value> = properties
        .iter()
        .map(|(name, type_name)| {
            json!({
                "name": name,
                "type": type_name,
                "isPublic": true,
                "hasGetter": true,
                "hasSetter": true
            })
        })
        .collect();
    json!({
        "kind": "optionsClass",
        "namespace": "SenseNet.Configuration",
        "className": class_name,
        "isPublic": true,
        "section": section,
        "properties": properties
    })
}

/// Declaration dump with one source file per entry of `files`
pub fn mock_dump(root: &str, files: Vec<(&str, Vec<Value>)>) -> Value {
    let files: Vec<Value> = files
        .into_iter()
        .map(|(path, declarations)| {
            json!({
                "path": format!("{}/{}", root, path),
                "project": { "name": "SenseNet.Services", "targetFramework": "net8.0" },
                "usingDirectives": ["System"],
                "declarations": declarations
            })
        })
        .collect();
    json!({ "root": root, "files": files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::DeclarationDump;
    use crate::operation::OperationGroup;

    #[test]
    fn test_mock_operation() {
        let op = mock_operation("GetSchema", "Content Types");
        assert_eq!(op.category_slug, "contenttypes");
        assert_eq!(op.group(), OperationGroup::Core);
        assert_eq!(op.parameters.len(), 1);
    }

    #[test]
    fn test_mock_dump_decodes() {
        let dump = mock_dump(
            "/work/sensenet",
            vec![(
                "src/Options.cs",
                vec![
                    mock_options_json("DataOptions", "sensenet:Data", &[("Timeout", "int")]),
                    mock_operation_json("Ping", "ODataFunction", "Tools"),
                ],
            )],
        );
        let dump = DeclarationDump::from_json(&dump.to_string()).unwrap();
        assert_eq!(dump.files[0].path, "/work/sensenet/src/Options.cs");
        assert_eq!(dump.declaration_count(), 2);
    }
}
