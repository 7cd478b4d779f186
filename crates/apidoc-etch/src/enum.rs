//! Enum definitions
//!
//! Enums only feed example synthesis, where their members become a
//! pipe-joined placeholder such as `"Off | On | Auto"`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Registry of enums keyed by fully-qualified name, in encounter order
pub type EnumRegistry = IndexMap<String, EnumDef>;

/// Enum declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    /// Namespace
    pub namespace: String,

    /// Enum name
    pub name: String,

    /// Member names in declaration order
    #[serde(default)]
    pub members: Vec<String>,

    /// Source file
    #[serde(default)]
    pub file: String,
}

impl EnumDef {
    /// Create an enum
    pub fn new<I, S>(namespace: impl Into<String>, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
            file: String::new(),
        }
    }

    /// Fully-qualified name
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Example placeholder listing every member
    pub fn placeholder(&self) -> String {
        self.members.join(" | ")
    }
}
