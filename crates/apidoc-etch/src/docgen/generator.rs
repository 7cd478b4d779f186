//! Generator - main documentation generation orchestrator
//!
//! Coordinates a whole run: loading the declaration dumps, normalizing,
//! resolving section conflicts, writing the report and running one output
//! pass per audience.

use super::GeneratorConfig;
use crate::classification::{Category, ClassificationTable};
use crate::conflicts::resolve_conflicts;
use crate::declaration::{load_input, DeclarationDump};
use crate::diagnostics::{Diagnostic, DiagnosticsCollector, DocError, DocResult};
use crate::node::Audience;
use crate::normalize::{normalize, Catalog};
use crate::operation::{partition_operations, OperationDef, OperationGroup};
use crate::options_class::OptionsClassDef;
use crate::publish::{prepare_direct, StagingDir};
use crate::render::{create_renderer, RenderContext, Renderer};
use crate::report::{render_report, ReportInput, REPORT_FILE};
use crate::router::{
    audience_key, category_root_key, operation_key, operation_title, options_keys, FsStreamFactory,
    OutputRouter, StreamFactory, CONFIGURATION_DIR, OPERATIONS_DIR,
};
use crate::slug::{assign_operation_slugs, assign_options_slugs, RESERVED_SLUGS};
use std::io::Write;
use std::path::PathBuf;

/// Result of a generation run
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    /// Directory the documentation was published to
    pub output_dir: PathBuf,
    /// Written files, relative to the output directory, in writing order
    pub files: Vec<String>,
    /// Number of documented operations
    pub operation_count: usize,
    /// Number of documented options classes
    pub options_class_count: usize,
}

impl GenerationOutput {
    /// Written files below one audience tree
    pub fn audience_files(&self, audience: Audience) -> impl Iterator<Item = &str> {
        let prefix = format!("{}/", audience.dir_name());
        self.files
            .iter()
            .map(String::as_str)
            .filter(move |f| f.starts_with(&prefix))
    }
}

/// The main documentation generator
///
/// A run goes through these steps:
/// 1. Load the declaration dumps
/// 2. Normalize declarations into operations, options classes and registries
/// 3. Assign link slugs and drop conflicting or unclassified options classes
/// 4. Write the generation report
/// 5. Write the frontend and the backend documentation trees
pub struct Generator {
    config: GeneratorConfig,
    diagnostics: DiagnosticsCollector,
}

impl Generator {
    /// Create a generator with the given configuration
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            diagnostics: DiagnosticsCollector::new(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Diagnostics gathered so far
    pub fn diagnostics(&self) -> &DiagnosticsCollector {
        &self.diagnostics
    }

    /// Run the pipeline and write into the configured output directory.
    ///
    /// An invalid input path fails before the output directory is touched.
    pub fn run(&mut self) -> DocResult<GenerationOutput> {
        let dump = load_input(&self.config.input, &mut self.diagnostics)?;
        let target = self.config.output_dir.clone();

        let mut output = if self.config.atomic_publish {
            let staging = StagingDir::create(&target)?;
            let mut factory = FsStreamFactory::new(staging.path());
            let output = self.generate(dump, &mut factory)?;
            staging.publish()?;
            output
        } else {
            prepare_direct(&target)?;
            let mut factory = FsStreamFactory::new(&target);
            self.generate(dump, &mut factory)?
        };

        output.output_dir = target;
        Ok(output)
    }

    /// Run the pipeline against any stream factory
    pub fn run_with(&mut self, factory: &mut dyn StreamFactory) -> DocResult<GenerationOutput> {
        let dump = load_input(&self.config.input, &mut self.diagnostics)?;
        let mut output = self.generate(dump, factory)?;
        output.output_dir = self.config.output_dir.clone();
        Ok(output)
    }

    /// Generate documentation for an already loaded dump
    pub fn generate(&mut self, dump: DeclarationDump, factory: &mut dyn StreamFactory) -> DocResult<GenerationOutput> {
        let config = &self.config;
        let diagnostics = &mut self.diagnostics;
        let input = config.input.display().to_string();
        tracing::info!(input = %input, declarations = dump.declaration_count(), "generating documentation");

        let Catalog {
            mut operations,
            options_classes,
            classes,
            enums,
            ..
        } = normalize(dump, config, diagnostics);
        diagnostics.info(format!(
            "Extracted {} operations and {} options classes",
            operations.len(),
            options_classes.len()
        ));

        let include_all = config.include_all;
        assign_operation_slugs(
            operations
                .iter_mut()
                .filter(|op| include_all || op.group() == OperationGroup::Core),
        );
        for op in operations
            .iter()
            .filter(|op| !op.slug.is_empty() && RESERVED_SLUGS.contains(&op.operation_name.to_lowercase().as_str()))
        {
            diagnostics.add(
                Diagnostic::hint(format!(
                    "Operation '{}' is linked as '{}'; its name belongs to a generated document",
                    op.operation_name, op.slug
                ))
                .in_file(&op.file)
                .with_code("reserved-slug"),
            );
        }

        let classification = ClassificationTable::load_or_builtin(config.classification.as_deref())?;

        let extracted_options = options_classes;
        let mut documented_options = extracted_options.clone();
        let problems = resolve_conflicts(&mut documented_options, diagnostics);
        drop_unclassified(&mut documented_options, &classification, diagnostics);
        assign_options_slugs(&mut documented_options);

        let (core, legacy, test) = partition_operations(&operations);
        let documented_ops: Vec<&OperationDef> = if include_all {
            operations.iter().collect()
        } else {
            core.clone()
        };

        let mut files = Vec::new();
        let report = render_report(&ReportInput {
            input: &input,
            operations: &operations,
            core_operations: &core,
            extracted_options: &extracted_options,
            documented_options: &documented_options,
            problems: &problems,
            hidden_parameter_types: &config.hidden_parameter_types,
        });
        let mut stream = factory.create(REPORT_FILE)?;
        stream.write_all(report.as_bytes())?;
        stream.flush()?;
        files.push(REPORT_FILE.to_string());

        let groups: Vec<(&str, &[&OperationDef])> = if include_all {
            vec![
                (OperationGroup::Core.title(), core.as_slice()),
                (OperationGroup::LegacyFramework.title(), legacy.as_slice()),
                (OperationGroup::Test.title(), test.as_slice()),
            ]
        } else {
            vec![("Operations", core.as_slice())]
        };
        let documented_classes: Vec<&OptionsClassDef> = documented_options.iter().collect();
        let context = RenderContext::new(config, &classification, &classes, &enums);

        for audience in Audience::ALL {
            let renderer = create_renderer(audience, context);
            let mut router = OutputRouter::new(&mut *factory);
            let pass = AudiencePass {
                renderer: renderer.as_ref(),
                context,
                audience,
            };
            pass.write_operations(&mut router, &groups, &documented_ops, diagnostics)?;
            pass.write_configuration(&mut router, &documented_classes, diagnostics)?;
            let written = router.finish()?;
            tracing::debug!(audience = audience.dir_name(), files = written.len(), "audience pass finished");
            files.extend(written);
        }

        Ok(GenerationOutput {
            output_dir: config.output_dir.clone(),
            files,
            operation_count: documented_ops.len(),
            options_class_count: documented_options.len(),
        })
    }
}

/// Remove options classes without a category, logging each as an error
fn drop_unclassified(
    classes: &mut Vec<OptionsClassDef>,
    classification: &ClassificationTable,
    diagnostics: &mut DiagnosticsCollector,
) {
    classes.retain(|oc| {
        if classification.is_classified(&oc.class_name) {
            return true;
        }
        diagnostics.add(
            Diagnostic::error(DocError::Unclassified(oc.class_name.clone()).to_string())
                .in_file(&oc.file)
                .with_code("unclassified"),
        );
        false
    });
}

/// One output pass for a single audience
struct AudiencePass<'r, 'a> {
    renderer: &'r dyn Renderer,
    context: RenderContext<'a>,
    audience: Audience,
}

impl AudiencePass<'_, '_> {
    fn operations_key(&self, key: &str) -> String {
        audience_key(self.audience, OPERATIONS_DIR, key)
    }

    fn configuration_key(&self, key: &str) -> String {
        audience_key(self.audience, CONFIGURATION_DIR, key)
    }

    fn write_operations(
        &self,
        router: &mut OutputRouter<'_>,
        groups: &[(&str, &[&OperationDef])],
        documented: &[&OperationDef],
        diagnostics: &mut DiagnosticsCollector,
    ) -> DocResult<()> {
        let mut index = self.context.front_matter("Api references");
        let mut cheat_sheet = self.context.front_matter("Cheat sheet");
        for (title, ops) in groups {
            index.push_str(&self.renderer.operation_table(title, ops));
            let tree_title = if groups.len() == 1 { "CHEAT SHEET" } else { *title };
            cheat_sheet.push_str(&self.renderer.operation_tree(tree_title, ops));
        }
        router.write_document(&self.operations_key("index.md"), &index)?;
        router.write_document(&self.operations_key("cheatsheet.md"), &cheat_sheet)?;

        let level = self.context.file_level();
        for op in documented {
            match self.renderer.operation_page(op) {
                Ok(md) => {
                    let key = self.operations_key(&operation_key(level, op));
                    let head = self.context.front_matter(operation_title(level, op));
                    router.stream(&key, &head)?.write_all(md.as_bytes())?;
                }
                Err(e) => diagnostics.add(
                    Diagnostic::error(format!("Cannot render operation '{}': {}", op.operation_name, e))
                        .in_file(&op.file)
                        .with_code("render-failed"),
                ),
            }
        }
        Ok(())
    }

    fn write_configuration(
        &self,
        router: &mut OutputRouter<'_>,
        classes: &[&OptionsClassDef],
        diagnostics: &mut DiagnosticsCollector,
    ) -> DocResult<()> {
        let mut index = self.context.front_matter("Option class references");
        index.push_str(&self.renderer.options_index("Option classes", classes));
        router.write_document(&self.configuration_key("configuration-index.md"), &index)?;

        let mut cheat_sheet = self.context.front_matter("Cheat sheet");
        match self.renderer.options_cheat_sheet("CHEAT SHEET", classes) {
            Ok(md) => cheat_sheet.push_str(&md),
            Err(e) => diagnostics.add(
                Diagnostic::error(format!("Cannot render the configuration cheat sheet: {}", e))
                    .with_code("render-failed"),
            ),
        }
        router.write_document(&self.configuration_key("cheatsheet.md"), &cheat_sheet)?;

        for oc in classes {
            let categories = match self.context.classification.categories_of(&oc.class_name) {
                Ok(categories) => categories,
                Err(e) => {
                    diagnostics.add(Diagnostic::error(e.to_string()).in_file(&oc.file).with_code("unclassified"));
                    continue;
                }
            };
            for category in &categories {
                self.ensure_category_root(router, category, classes, diagnostics)?;
            }

            let md = match self.renderer.options_page(oc) {
                Ok(md) => md,
                Err(e) => {
                    diagnostics.add(
                        Diagnostic::error(format!("Cannot render options class '{}': {}", oc.class_name, e))
                            .in_file(&oc.file)
                            .with_code("render-failed"),
                    );
                    continue;
                }
            };
            let head = self.context.front_matter(&oc.class_name);
            for key in options_keys(oc, &categories) {
                router
                    .stream(&self.configuration_key(&key), &head)?
                    .write_all(md.as_bytes())?;
            }
        }
        Ok(())
    }

    fn ensure_category_root(
        &self,
        router: &mut OutputRouter<'_>,
        category: &Category,
        classes: &[&OptionsClassDef],
        diagnostics: &mut DiagnosticsCollector,
    ) -> DocResult<()> {
        let key = self.configuration_key(&category_root_key(category));
        if router.is_open(&key) {
            return Ok(());
        }
        let members: Vec<&OptionsClassDef> = classes
            .iter()
            .copied()
            .filter(|oc| {
                self.context
                    .categories_of(oc)
                    .iter()
                    .any(|c| c.key == category.key)
            })
            .collect();
        let md = match self.renderer.category_root(category, &members) {
            Ok(md) => md,
            Err(e) => {
                diagnostics.add(
                    Diagnostic::error(format!("Cannot render category '{}': {}", category.name, e))
                        .with_code("render-failed"),
                );
                category.header()
            }
        };
        router.write_document(&key, &md)
    }
}
