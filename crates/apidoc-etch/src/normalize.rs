//! Metadata normalization
//!
//! Converts raw front-end declarations into the canonical model: computes
//! categories, filters declarations that do not have a documentable shape,
//! runs doc comments through the transformer and builds the class and enum
//! registries used by the example generator.

use crate::class::{ClassDef, ClassRegistry, ClassShape};
use crate::declaration::{
    Declaration, DeclarationDump, RawClass, RawEnum, RawOperation, RawOptionsClass, RawProperty, SourceFile,
};
use crate::diagnostics::{Diagnostic, DiagnosticsCollector};
use crate::doc_comment::DocComment;
use crate::docgen::GeneratorConfig;
use crate::node::relative_to;
use crate::operation::OperationDef;
use crate::options_class::{is_backend_only_type, section_segments, OptionsClassDef, PropertyDef};
use crate::params::{simple_type_name, ParamDef, ReturnDef, TypeParamDef};
use crate::r#enum::{EnumDef, EnumRegistry};
use crate::slug::category_slug;

/// Category of operations without a grouping key
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Attribute marking a read-only operation
pub const FUNCTION_ATTRIBUTE: &str = "ODataFunction";

/// Attribute marking a mutating operation
pub const ACTION_ATTRIBUTE: &str = "ODataAction";

/// Outcome of normalizing one declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    /// Documentable entity
    Ok(T),
    /// Declaration does not have the required shape; silently skipped
    UnsupportedShape,
    /// Declaration is broken in a way worth reporting
    Fatal(String),
}

impl<T> Extracted<T> {
    /// Convert into an option, discarding the failure reason
    pub fn ok(self) -> Option<T> {
        match self {
            Extracted::Ok(value) => Some(value),
            _ => None,
        }
    }
}

/// Everything the renderers need, in encounter order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Root directory the front end scanned
    pub root: Option<String>,
    /// Documentable operations
    pub operations: Vec<OperationDef>,
    /// Documentable options classes
    pub options_classes: Vec<OptionsClassDef>,
    /// Options and plain classes by full name
    pub classes: ClassRegistry,
    /// Enums by full name
    pub enums: EnumRegistry,
}

/// Normalize a whole dump
pub fn normalize(dump: DeclarationDump, config: &GeneratorConfig, diagnostics: &mut DiagnosticsCollector) -> Catalog {
    let mut normalizer = Normalizer::new(config, diagnostics);
    normalizer.catalog.root = dump.root.clone();
    for file in &dump.files {
        normalizer.file(file, dump.root.as_deref());
    }
    normalizer.finish()
}

/// Stateful normalizer over a sequence of source files
pub struct Normalizer<'a> {
    config: &'a GeneratorConfig,
    diagnostics: &'a mut DiagnosticsCollector,
    catalog: Catalog,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer
    pub fn new(config: &'a GeneratorConfig, diagnostics: &'a mut DiagnosticsCollector) -> Self {
        Self {
            config,
            diagnostics,
            catalog: Catalog::default(),
        }
    }

    /// Normalize every declaration of one file
    pub fn file(&mut self, file: &SourceFile, root: Option<&str>) {
        for declaration in &file.declarations {
            match declaration {
                Declaration::Operation(raw) => {
                    if let Some(op) = self.operation(raw, file, root).ok() {
                        self.catalog.operations.push(op);
                    }
                }
                Declaration::OptionsClass(raw) => match self.options_class(raw, file, root) {
                    Extracted::Ok(oc) => {
                        self.register_class(ClassDef::from(&oc));
                        self.catalog.options_classes.push(oc);
                    }
                    Extracted::UnsupportedShape => {}
                    Extracted::Fatal(reason) => self.diagnostics.add(
                        Diagnostic::error(reason)
                            .in_file(&file.path)
                            .with_code("invalid-options-class"),
                    ),
                },
                Declaration::Enum(raw) => {
                    let def = enum_def(raw, file);
                    self.register_enum(def);
                }
                Declaration::Class(raw) => {
                    let def = self.class(raw, file);
                    self.register_class(def);
                }
            }
        }
    }

    /// Finish and hand out the catalog
    pub fn finish(self) -> Catalog {
        self.catalog
    }

    /// Normalize an operation method
    pub fn operation(&mut self, raw: &RawOperation, file: &SourceFile, root: Option<&str>) -> Extracted<OperationDef> {
        let is_action = match raw.attribute.as_str() {
            FUNCTION_ATTRIBUTE => false,
            ACTION_ATTRIBUTE => true,
            _ => return Extracted::UnsupportedShape,
        };
        let Some(first) = raw.parameters.first() else {
            return Extracted::UnsupportedShape;
        };
        if simple_type_name(&first.type_name) != self.config.content_type_name {
            return Extracted::UnsupportedShape;
        }

        let category = raw
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED)
            .to_string();

        let mut op = OperationDef {
            namespace: raw.namespace.clone(),
            class_name: raw.class_name.clone(),
            method_name: raw.method_name.clone(),
            operation_name: raw
                .operation_name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| raw.method_name.clone()),
            category_slug: category_slug(&category),
            category,
            slug: String::new(),
            is_action,
            icon: raw.icon.clone().filter(|i| !i.is_empty()),
            description: raw.description.clone().filter(|d| !d.is_empty()),
            documentation: String::new(),
            parameters: raw
                .parameters
                .iter()
                .map(|p| ParamDef {
                    name: p.name.clone(),
                    type_name: p.type_name.clone(),
                    resolved_type: p.resolved_type.clone(),
                    optional: p.has_default,
                    documentation: String::new(),
                    example: None,
                })
                .collect(),
            type_params: raw.type_parameters.iter().map(TypeParamDef::new).collect(),
            return_value: ReturnDef::new(raw.return_type.clone()),
            allowed_roles: raw.allowed_roles.clone(),
            required_permissions: raw.required_permissions.clone(),
            required_policies: raw.required_policies.clone(),
            scenarios: raw.scenarios.clone(),
            content_types: raw.content_types.clone(),
            file: file.path.clone(),
            file_relative: relative_to(&file.path, root),
            project: file.project.clone().map(|p| p.resolved()),
        };

        let doc = self.doc_comment(raw.documentation.as_deref(), &file.path, &raw.method_name);
        doc.attach(&mut op.parameters, &mut op.type_params, Some(&mut op.return_value));
        op.documentation = doc.body;

        Extracted::Ok(op)
    }

    /// Normalize an options class
    pub fn options_class(
        &mut self,
        raw: &RawOptionsClass,
        file: &SourceFile,
        root: Option<&str>,
    ) -> Extracted<OptionsClassDef> {
        if !raw.is_public {
            return Extracted::UnsupportedShape;
        }
        if !raw.constructors.is_empty() && raw.constructors.iter().all(|c| c.parameter_count > 0) {
            return Extracted::UnsupportedShape;
        }
        let section = match raw.section.as_deref().map(|s| s.trim().trim_matches('"')) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Extracted::UnsupportedShape,
        };
        if section_segments(&section).is_empty() {
            return Extracted::Fatal(format!(
                "Options class '{}' has no usable configuration section in '{}'.",
                raw.class_name, section
            ));
        }

        let properties = raw
            .properties
            .iter()
            .filter(|p| p.is_public)
            .map(|p| self.property(p, &file.path))
            .collect();
        let documentation = self
            .doc_comment(raw.documentation.as_deref(), &file.path, &raw.class_name)
            .body;

        Extracted::Ok(OptionsClassDef {
            namespace: raw.namespace.clone(),
            class_name: raw.class_name.clone(),
            section,
            documentation,
            properties,
            using_directives: file.using_directives.clone(),
            slug: String::new(),
            file: file.path.clone(),
            file_relative: relative_to(&file.path, root),
            project: file.project.clone().map(|p| p.resolved()),
        })
    }

    fn class(&mut self, raw: &RawClass, file: &SourceFile) -> ClassDef {
        ClassDef {
            namespace: raw.namespace.clone(),
            class_name: raw.class_name.clone(),
            is_interface: raw.is_interface,
            is_struct: raw.is_struct,
            properties: raw
                .properties
                .iter()
                .filter(|p| p.is_public)
                .map(|p| self.property(p, &file.path))
                .collect(),
            using_directives: file.using_directives.clone(),
            file: file.path.clone(),
        }
    }

    fn property(&mut self, raw: &RawProperty, file: &str) -> PropertyDef {
        let resolved_type = raw
            .resolved_type
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| raw.type_name.clone());
        let is_backend_only = is_backend_only_type(&resolved_type)
            || raw.type_name.starts_with("Func<")
            || raw.type_name.starts_with("Action<");

        PropertyDef {
            name: raw.name.clone(),
            type_name: raw.type_name.clone(),
            is_enum: raw.is_enum,
            is_backend_only,
            has_getter: raw.has_getter,
            has_setter: raw.has_setter,
            initializer: raw.initializer.clone(),
            documentation: self.doc_comment(raw.documentation.as_deref(), file, &raw.name).body,
            resolved_type,
        }
    }

    fn doc_comment(&mut self, raw: Option<&str>, file: &str, owner: &str) -> DocComment {
        let (doc, err) = DocComment::parse_lenient(raw);
        if let Some(err) = err {
            self.diagnostics.add(
                Diagnostic::warning(format!("Documentation of '{}' is not well-formed: {}", owner, err))
                    .in_file(file)
                    .with_code("malformed-doc"),
            );
        }
        doc
    }

    fn register_class(&mut self, class: ClassDef) {
        let key = class.full_name();
        if let Some(existing) = self.catalog.classes.get(&key) {
            self.diagnostics.add(
                Diagnostic::info(format!(
                    "Duplicated class '{}': kept '{}', skipped '{}'.",
                    key, existing.file, class.file
                ))
                .with_code("duplicate-type"),
            );
            return;
        }
        self.catalog.classes.insert(key, class);
    }

    fn register_enum(&mut self, def: EnumDef) {
        let key = def.full_name();
        if let Some(existing) = self.catalog.enums.get(&key) {
            self.diagnostics.add(
                Diagnostic::info(format!(
                    "Duplicated enum '{}': kept '{}', skipped '{}'.",
                    key, existing.file, def.file
                ))
                .with_code("duplicate-type"),
            );
            return;
        }
        self.catalog.enums.insert(key, def);
    }
}

fn enum_def(raw: &RawEnum, file: &SourceFile) -> EnumDef {
    EnumDef {
        namespace: raw.namespace.clone(),
        name: raw.name.clone(),
        members: raw.members.clone(),
        file: file.path.clone(),
    }
}
