//! Configuration example synthesis
//!
//! Builds a representative JSON value for an options class by walking its
//! property types: primitives get canonical literals, enums list their
//! members, nested classes recurse. The result is nested under the class's
//! configuration section path.
//!
//! ```
//! use apidoc_etch::example::{generate_example, nest_under_section};
//! use apidoc_etch::node::Audience;
//! use apidoc_etch::options_class::{OptionsClassDef, PropertyDef};
//! use apidoc_etch::{ClassRegistry, EnumRegistry};
//!
//! let oc = OptionsClassDef {
//!     class_name: "ServerOptions".into(),
//!     section: "A:B".into(),
//!     properties: vec![PropertyDef::new("Name", "string"), PropertyDef::new("Count", "int")],
//!     ..Default::default()
//! };
//! let example = generate_example(&oc, &ClassRegistry::new(), &EnumRegistry::new(), Audience::Frontend);
//! let nested = nest_under_section(&oc.section, example).unwrap();
//! assert_eq!(nested.to_string(), r#"{"A":{"B":{"Name":"_stringValue_","Count":0}}}"#);
//! ```

use crate::class::{ClassDef, ClassRegistry, ClassShape};
use crate::diagnostics::{DocError, DocResult};
use crate::node::Audience;
use crate::options_class::{section_segments, OptionsClassDef, PropertyDef};
use crate::r#enum::EnumRegistry;
use crate::types::{element_type, is_array_type, json_type};
use serde_json::{Map, Value};
use std::iter;

/// Placeholder for string values
pub const STRING_PLACEHOLDER: &str = "_stringValue_";

/// Reference date for date and time values
pub const DATE_PLACEHOLDER: &str = "2023-10-19T09:45:18";

/// Placeholder for time spans
pub const TIME_SPAN_PLACEHOLDER: &str = "00:00:00";

/// Default limit of nested classes expanded below the root class
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Example generator bound to a set of registries
#[derive(Debug, Clone, Copy)]
pub struct ExampleGenerator<'a> {
    classes: &'a ClassRegistry,
    enums: &'a EnumRegistry,
    audience: Audience,
    max_depth: usize,
}

impl<'a> ExampleGenerator<'a> {
    /// Create a generator
    pub fn new(classes: &'a ClassRegistry, enums: &'a EnumRegistry, audience: Audience) -> Self {
        Self {
            classes,
            enums,
            audience,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit the nested class chain
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Example object of a class, one entry per visible property
    pub fn class_example(&self, class: &dyn ClassShape) -> Map<String, Value> {
        let mut path = vec![class.full_name()];
        self.object(class, &mut path)
    }

    /// Example of an options class nested under its section path
    pub fn section_example(&self, oc: &OptionsClassDef) -> DocResult<Value> {
        nest_under_section(&oc.section, self.class_example(oc))
    }

    /// Merge the section examples of several classes into one document
    pub fn merged_example<'b>(&self, classes: impl IntoIterator<Item = &'b OptionsClassDef>) -> DocResult<Value> {
        let mut document = Map::new();
        for oc in classes {
            merge_into(&mut document, self.section_example(oc)?);
        }
        Ok(Value::Object(document))
    }

    fn object(&self, class: &dyn ClassShape, path: &mut Vec<String>) -> Map<String, Value> {
        class
            .properties()
            .iter()
            .filter(|p| self.audience.includes_backend_only() || !p.is_backend_only)
            .map(|p| (p.name.clone(), self.property(class, p, path)))
            .collect()
    }

    fn property(&self, owner: &dyn ClassShape, property: &PropertyDef, path: &mut Vec<String>) -> Value {
        if property.is_backend_only {
            return Value::Object(Map::new());
        }
        if let Some(value) = self.enum_value(property) {
            return value;
        }
        if let Some(value) = primitive_value(&property.type_name) {
            return value;
        }

        let nested = self.resolve_class(owner, property);
        let value = match nested {
            Some(class) => self.nested(class, path),
            None => Value::Object(Map::new()),
        };
        if is_array_type(&property.type_name) {
            Value::Array(vec![value])
        } else {
            value
        }
    }

    fn nested(&self, class: &ClassDef, path: &mut Vec<String>) -> Value {
        let full_name = class.full_name();
        if path.len() > self.max_depth || path.contains(&full_name) {
            tracing::debug!(class = %full_name, "example recursion stopped");
            return Value::Object(Map::new());
        }
        path.push(full_name);
        let object = self.object(class, path);
        path.pop();
        Value::Object(object)
    }

    fn enum_value(&self, property: &PropertyDef) -> Option<Value> {
        let type_name = property.resolved_type.trim_end_matches('?');
        match self.enums.get(type_name) {
            Some(def) => Some(Value::String(def.placeholder())),
            None if property.is_enum => Some(Value::String(format!("_enum_value_of_{}_", type_name))),
            None => None,
        }
    }

    /// Resolve a nested class by its fully-qualified name, then through the
    /// owner's using directives and namespace.
    fn resolve_class(&self, owner: &dyn ClassShape, property: &PropertyDef) -> Option<&'a ClassDef> {
        let resolved = element_type(&property.resolved_type);
        if resolved.contains('.') {
            if let Some(class) = self.classes.get(resolved) {
                return Some(class);
            }
        }

        let declared = element_type(&property.type_name);
        owner
            .using_directives()
            .iter()
            .map(String::as_str)
            .chain(iter::once(owner.namespace()))
            .find_map(|ns| self.classes.get(&format!("{}.{}", ns, declared)))
    }
}

/// Example object of `class` for `audience`
pub fn generate_example(
    class: &dyn ClassShape,
    classes: &ClassRegistry,
    enums: &EnumRegistry,
    audience: Audience,
) -> Map<String, Value> {
    ExampleGenerator::new(classes, enums, audience).class_example(class)
}

/// Canonical literal of a primitive type, `None` for anything else
pub fn primitive_value(type_name: &str) -> Option<Value> {
    let public = json_type(type_name);
    let public = public.trim_end_matches('?');
    let simple = public.strip_prefix("System.").unwrap_or(public);

    let value = match simple {
        "string" | "String" | "char" | "Char" => Value::from(STRING_PLACEHOLDER),
        "string[]" | "String[]" => Value::Array(vec![Value::from(STRING_PLACEHOLDER)]),
        "bool" | "Boolean" => Value::Bool(true),
        "int" | "long" | "short" | "byte" | "sbyte" | "uint" | "ulong" | "ushort" | "Int16" | "Int32"
        | "Int64" | "UInt16" | "UInt32" | "UInt64" | "Byte" | "SByte" => Value::from(0),
        "float" | "double" | "decimal" | "Single" | "Double" | "Decimal" => Value::from(0.0),
        "DateTime" | "DateTimeOffset" | "DateOnly" => Value::from(DATE_PLACEHOLDER),
        "TimeSpan" | "TimeOnly" => Value::from(TIME_SPAN_PLACEHOLDER),
        _ => return None,
    };
    Some(value)
}

/// Nest `object` under every segment of a section path.
///
/// `"A:B"` with `{x}` gives `{"A":{"B":{x}}}`.
pub fn nest_under_section(section: &str, object: Map<String, Value>) -> DocResult<Value> {
    let segments = section_segments(section);
    if segments.is_empty() {
        return Err(DocError::other(format!("Section '{}' has no segments", section)));
    }
    let nested = segments
        .iter()
        .rev()
        .fold(Value::Object(object), |inner, segment| {
            let mut level = Map::new();
            level.insert(segment.to_string(), inner);
            Value::Object(level)
        });
    Ok(nested)
}

/// Deep-merge `value` into `target`; objects merge key by key, anything else is replaced.
pub fn merge_into(target: &mut Map<String, Value>, value: Value) {
    let Value::Object(source) = value else {
        return;
    };
    for (key, incoming) in source {
        match target.get_mut(&key) {
            Some(Value::Object(existing)) if incoming.is_object() => merge_into(existing, incoming),
            _ => {
                target.insert(key, incoming);
            }
        }
    }
}

/// Merge several section documents into one
pub fn merge_examples(values: impl IntoIterator<Item = Value>) -> Value {
    let mut document = Map::new();
    for value in values {
        merge_into(&mut document, value);
    }
    Value::Object(document)
}

/// Environment variable form of every configurable property:
/// `Section__Sub__Property="_type_value_"`
pub fn environment_variables(oc: &OptionsClassDef) -> Vec<String> {
    let prefix = section_segments(&oc.section).join("__");
    oc.properties
        .iter()
        .filter(|p| !p.is_backend_only)
        .map(|p| format!("{}__{}=\"_{}_value_\"", prefix, p.name, p.type_name))
        .collect()
}

/// Pretty-printed JSON
pub fn to_pretty_json(value: &Value) -> DocResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
