//! Generator configuration
//!
//! Everything the pipeline needs besides the declarations themselves.
//! A configuration can be built in code with the `with_*` methods or read
//! from a TOML file; every key is optional.

use crate::diagnostics::{DocError, DocResult};
use crate::router::FileLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parameter types that never appear in public documentation
pub const DEFAULT_HIDDEN_PARAMETER_TYPES: [&str; 6] = [
    "HttpContext",
    "ODataRequest",
    "IConfiguration",
    "Microsoft.AspNetCore.Http.HttpContext",
    "SenseNet.OData.ODataRequest",
    "Microsoft.Extensions.Configuration.IConfiguration",
];

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Declaration dump file or directory of dumps
    pub input: PathBuf,
    /// Output directory (replaced as a whole on success)
    pub output_dir: PathBuf,
    /// File granularity
    pub file_level: FileLevel,
    /// Also document legacy-framework and test operations
    pub include_all: bool,
    /// Product name used in front matter
    pub site_name: String,
    /// Link prefix of operation pages
    pub operation_link_base: String,
    /// Link prefix of configuration pages
    pub configuration_link_base: String,
    /// Simple type name the first operation parameter must have
    pub content_type_name: String,
    /// Parameter types hidden from the frontend audience
    pub hidden_parameter_types: Vec<String>,
    /// Leave the attribute description out of operation pages
    pub hide_description: bool,
    /// Classification dataset replacing the built-in one
    pub classification: Option<PathBuf>,
    /// Deepest nested-class chain expanded in examples
    pub max_example_depth: usize,
    /// Write into a staging directory and swap it in at the end
    pub atomic_publish: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::from("docs"),
            file_level: FileLevel::default(),
            include_all: false,
            site_name: "sensenet".to_string(),
            operation_link_base: "/restapi".to_string(),
            configuration_link_base: "/configuration".to_string(),
            content_type_name: "Content".to_string(),
            hidden_parameter_types: DEFAULT_HIDDEN_PARAMETER_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hide_description: true,
            classification: None,
            max_example_depth: 8,
            atomic_publish: true,
        }
    }
}

impl GeneratorConfig {
    /// Create a config for an input and output pair
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> DocResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text, path)
    }

    /// Parse TOML text; `origin` names the source in errors
    pub fn from_toml(text: &str, origin: &Path) -> DocResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| DocError::toml(origin, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> DocResult<()> {
        if self.content_type_name.trim().is_empty() {
            return Err(DocError::config("contentTypeName must not be empty"));
        }
        if self.max_example_depth == 0 {
            return Err(DocError::config("maxExampleDepth must be at least 1"));
        }
        Ok(())
    }

    /// Set the file granularity
    pub fn with_file_level(mut self, level: FileLevel) -> Self {
        self.file_level = level;
        self
    }

    /// Document every project family
    pub fn with_include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }

    /// Use a classification dataset file
    pub fn with_classification(mut self, path: impl Into<PathBuf>) -> Self {
        self.classification = Some(path.into());
        self
    }

    /// Set whether the output is staged and swapped in
    pub fn with_atomic_publish(mut self, atomic: bool) -> Self {
        self.atomic_publish = atomic;
        self
    }

    /// Whether a parameter type is hidden from the frontend audience
    pub fn is_hidden_parameter_type(&self, type_name: &str) -> bool {
        self.hidden_parameter_types.iter().any(|t| t == type_name)
    }
}
