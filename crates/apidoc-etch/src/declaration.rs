//! Raw declarations handed over by the language front end
//!
//! The front end parses source text, resolves fully-qualified types and
//! flattens every interesting declaration into a JSON dump. This module
//! defines that wire format and discovers dumps on disk; turning raw
//! declarations into documented entities is the normalizer's job.

use crate::diagnostics::{Diagnostic, DiagnosticsCollector, DocError, DocResult};
use crate::node::ProjectInfo;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never scanned for dumps
pub const SKIPPED_DIRS: [&str; 4] = ["obj", ".git", ".vs", "lut"];

/// One front-end run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationDump {
    /// Root directory the front end scanned
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub root: Option<String>,

    /// Parsed source files
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

impl DeclarationDump {
    /// Parse a dump from JSON text
    pub fn from_json(json: &str) -> DocResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append another dump's files; the first non-empty root is kept
    pub fn merge(&mut self, other: DeclarationDump) {
        if self.root.is_none() {
            self.root = other.root;
        }
        self.files.extend(other.files);
    }

    /// Number of declarations over all files
    pub fn declaration_count(&self) -> usize {
        self.files.iter().map(|f| f.declarations.len()).sum()
    }
}

/// Declarations of a single source file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// Source path
    pub path: String,

    /// Owning project
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project: Option<ProjectInfo>,

    /// Using directives of the file
    #[serde(default)]
    pub using_directives: Vec<String>,

    /// Declarations in source order
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// A single raw declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Declaration {
    /// Annotated operation method
    Operation(RawOperation),
    /// Class carrying an options attribute
    OptionsClass(RawOptionsClass),
    /// Enum type
    Enum(RawEnum),
    /// Any other class, interface or struct
    Class(RawClass),
}

/// Operation method as seen by the front end
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperation {
    /// Namespace
    #[serde(default)]
    pub namespace: String,

    /// Declaring class
    pub class_name: String,

    /// Method name
    pub method_name: String,

    /// Operation attribute name (`ODataFunction` or `ODataAction`)
    pub attribute: String,

    /// Explicit operation name argument
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation_name: Option<String>,

    /// Icon argument
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<String>,

    /// Description argument
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    /// Grouping key from the category attribute
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,

    /// Parameters in signature order
    #[serde(default)]
    pub parameters: Vec<RawParameter>,

    /// Generic type parameters
    #[serde(default)]
    pub type_parameters: Vec<String>,

    /// Declared return type
    #[serde(default)]
    pub return_type: String,

    /// Allowed roles
    #[serde(default)]
    pub allowed_roles: Vec<String>,

    /// Required permissions
    #[serde(default)]
    pub required_permissions: Vec<String>,

    /// Required policies
    #[serde(default)]
    pub required_policies: Vec<String>,

    /// Scenarios
    #[serde(default)]
    pub scenarios: Vec<String>,

    /// Content type constraints
    #[serde(default)]
    pub content_types: Vec<String>,

    /// Raw documentation comment
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub documentation: Option<String>,
}

/// Method parameter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParameter {
    /// Name
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub type_name: String,

    /// Resolved type
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resolved_type: Option<String>,

    /// Has a default value
    #[serde(default)]
    pub has_default: bool,
}

/// Options class as seen by the front end
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptionsClass {
    /// Namespace
    #[serde(default)]
    pub namespace: String,

    /// Class name
    pub class_name: String,

    /// Declared `public`
    #[serde(default)]
    pub is_public: bool,

    /// First argument of the options attribute
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section: Option<String>,

    /// Explicit constructors
    #[serde(default)]
    pub constructors: Vec<RawConstructor>,

    /// Properties
    #[serde(default)]
    pub properties: Vec<RawProperty>,

    /// Raw documentation comment
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub documentation: Option<String>,
}

/// Explicit constructor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConstructor {
    /// Number of parameters
    #[serde(default)]
    pub parameter_count: usize,
}

/// Property declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    /// Name
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub type_name: String,

    /// Resolved type
    #[serde(default)]
    pub resolved_type: Option<String>,

    /// Declared `public`
    #[serde(default = "default_true")]
    pub is_public: bool,

    /// Has a getter
    #[serde(default)]
    pub has_getter: bool,

    /// Has a setter
    #[serde(default)]
    pub has_setter: bool,

    /// Initializer text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub initializer: Option<String>,

    /// Type resolved to an enum
    #[serde(default)]
    pub is_enum: bool,

    /// Raw documentation comment
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub documentation: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Enum declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnum {
    /// Namespace
    #[serde(default)]
    pub namespace: String,

    /// Name
    pub name: String,

    /// Member names
    #[serde(default)]
    pub members: Vec<String>,
}

/// Plain class declaration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClass {
    /// Namespace
    #[serde(default)]
    pub namespace: String,

    /// Class name
    pub class_name: String,

    /// Interface
    #[serde(default)]
    pub is_interface: bool,

    /// Struct
    #[serde(default)]
    pub is_struct: bool,

    /// Properties
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

/// Load every dump reachable from `input`.
///
/// `input` is either a `.json` dump or a directory scanned recursively for
/// dumps. A missing path or a non-JSON file aborts before anything is read.
/// JSON files in a directory that are not dumps are skipped with a warning.
pub fn load_input(input: &Path, diagnostics: &mut DiagnosticsCollector) -> DocResult<DeclarationDump> {
    if input.is_file() {
        if !is_dump_file(input) {
            return Err(DocError::UnsupportedInput(input.to_path_buf()));
        }
        return load_dump(input);
    }
    if !input.is_dir() {
        return Err(DocError::InvalidInputPath(input.to_path_buf()));
    }

    let mut dump = DeclarationDump::default();
    for path in discover_dumps(input)? {
        match load_dump(&path) {
            Ok(loaded) => dump.merge(loaded),
            Err(DocError::Serialization(e)) => diagnostics.add(
                Diagnostic::warning(format!("Not a declaration dump, skipped: {}", e))
                    .in_file(&path)
                    .with_code("skipped-dump"),
            ),
            Err(e) => return Err(e),
        }
    }
    if dump.root.is_none() {
        dump.root = Some(input.display().to_string());
    }
    Ok(dump)
}

/// Read and decode a single dump file
pub fn load_dump(path: &Path) -> DocResult<DeclarationDump> {
    tracing::debug!(path = %path.display(), "reading declaration dump");
    let text = fs::read_to_string(path)?;
    DeclarationDump::from_json(&text)
}

/// Dump files under `dir`, sorted for a stable encounter order
pub fn discover_dumps(dir: &Path) -> DocResult<Vec<PathBuf>> {
    let mut dumps = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e));

    for entry in walker {
        let entry = entry.map_err(|e| DocError::other(format!("Cannot scan {}: {}", dir.display(), e)))?;
        if entry.file_type().is_file() && is_dump_file(entry.path()) {
            dumps.push(entry.into_path());
        }
    }
    Ok(dumps)
}

fn is_dump_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.iter().any(|s| s.eq_ignore_ascii_case(name)))
}
