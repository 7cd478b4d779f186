//! Class definitions
//!
//! Plain classes are never documented on their own. They are registered so
//! the example generator can resolve nested-object property types.

use crate::options_class::{OptionsClassDef, PropertyDef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Registry of classes keyed by fully-qualified name, in encounter order
pub type ClassRegistry = IndexMap<String, ClassDef>;

/// Plain (non-options) class, interface or struct
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    /// Namespace
    pub namespace: String,

    /// Class name
    pub class_name: String,

    /// Declared as an interface
    #[serde(default)]
    pub is_interface: bool,

    /// Declared as a struct
    #[serde(default)]
    pub is_struct: bool,

    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<PropertyDef>,

    /// Using directives active in the declaring file
    #[serde(default)]
    pub using_directives: Vec<String>,

    /// Source file
    #[serde(default)]
    pub file: String,
}

impl ClassDef {
    /// Create an empty class
    pub fn new(namespace: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            class_name: class_name.into(),
            ..Default::default()
        }
    }

    /// Add a property
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }
}

impl From<&OptionsClassDef> for ClassDef {
    fn from(oc: &OptionsClassDef) -> Self {
        Self {
            namespace: oc.namespace.clone(),
            class_name: oc.class_name.clone(),
            is_interface: false,
            is_struct: false,
            properties: oc.properties.clone(),
            using_directives: oc.using_directives.clone(),
            file: oc.file.clone(),
        }
    }
}

/// Anything with a property list the example generator can walk
pub trait ClassShape {
    /// Namespace of the declaration
    fn namespace(&self) -> &str;

    /// Simple class name
    fn class_name(&self) -> &str;

    /// Using directives active at the declaration
    fn using_directives(&self) -> &[String];

    /// Properties in declaration order
    fn properties(&self) -> &[PropertyDef];

    /// Fully-qualified name
    fn full_name(&self) -> String {
        if self.namespace().is_empty() {
            self.class_name().to_string()
        } else {
            format!("{}.{}", self.namespace(), self.class_name())
        }
    }
}

impl ClassShape for ClassDef {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn using_directives(&self) -> &[String] {
        &self.using_directives
    }

    fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }
}

impl ClassShape for OptionsClassDef {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn using_directives(&self) -> &[String] {
        &self.using_directives
    }

    fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let class = ClassDef::new("SenseNet.Storage", "BlobProvider");
        assert_eq!(class.full_name(), "SenseNet.Storage.BlobProvider");

        let global = ClassDef::new("", "Loose");
        assert_eq!(global.full_name(), "Loose");
    }

    #[test]
    fn test_from_options_class() {
        let oc = OptionsClassDef {
            namespace: "SenseNet.Configuration".into(),
            class_name: "DataOptions".into(),
            section: "sensenet:Data".into(),
            properties: vec![PropertyDef::new("DbCommandTimeout", "int")],
            using_directives: vec!["System".into()],
            ..Default::default()
        };
        let class = ClassDef::from(&oc);
        assert_eq!(class.full_name(), oc.full_name());
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.using_directives, vec!["System".to_string()]);
    }
}
