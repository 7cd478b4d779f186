//! Markdown renderers
//!
//! One renderer per audience. Renderers only produce text; where it ends up
//! is decided by the [`OutputRouter`](crate::router::OutputRouter).

pub mod backend;
pub mod frontend;

pub use backend::BackendRenderer;
pub use frontend::FrontendRenderer;

use crate::class::ClassRegistry;
use crate::classification::{Category, ClassificationTable};
use crate::diagnostics::DocResult;
use crate::docgen::GeneratorConfig;
use crate::example::{environment_variables, to_pretty_json, ExampleGenerator};
use crate::node::Audience;
use crate::operation::OperationDef;
use crate::options_class::OptionsClassDef;
use crate::params::ParamDef;
use crate::r#enum::EnumRegistry;
use crate::router::FileLevel;
use indexmap::IndexMap;
use std::cmp::Ordering;

/// Warning printed above merged configuration examples
pub const SAMPLE_WARNING: &str = "**WARNING** This is a sample configuration containing example values. \
     Do not use it without modifying it to reflect your environment.";

/// Renders every document kind for one audience
pub trait Renderer {
    /// Audience this renderer writes for
    fn audience(&self) -> Audience;

    /// Operation index table
    fn operation_table(&self, title: &str, ops: &[&OperationDef]) -> String;

    /// Operation cheat sheet grouped by category
    fn operation_tree(&self, title: &str, ops: &[&OperationDef]) -> String;

    /// Detail section of one operation
    fn operation_page(&self, op: &OperationDef) -> DocResult<String>;

    /// Options class index table
    fn options_index(&self, title: &str, classes: &[&OptionsClassDef]) -> String;

    /// Options class cheat sheet
    fn options_cheat_sheet(&self, title: &str, classes: &[&OptionsClassDef]) -> DocResult<String>;

    /// Detail page of one options class
    fn options_page(&self, oc: &OptionsClassDef) -> DocResult<String>;

    /// Root aggregation file of a category
    fn category_root(&self, category: &Category, classes: &[&OptionsClassDef]) -> DocResult<String> {
        let mut md = category.header();
        if classes.is_empty() {
            return Ok(md);
        }
        let example = self.context().examples(self.audience()).merged_example(classes.iter().copied())?;
        md.push('\n');
        md.push_str("## Configuration example\n\n");
        md.push_str(SAMPLE_WARNING);
        md.push('\n');
        md.push_str(&json_block(&to_pretty_json(&example)?));
        Ok(md)
    }

    /// Shared rendering context
    fn context(&self) -> &RenderContext<'_>;
}

/// Everything a renderer reads besides the entity itself
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Generator settings
    pub config: &'a GeneratorConfig,
    /// Category dataset
    pub classification: &'a ClassificationTable,
    /// Classes for nested examples
    pub classes: &'a ClassRegistry,
    /// Enums for example placeholders
    pub enums: &'a EnumRegistry,
}

impl<'a> RenderContext<'a> {
    /// Create a context
    pub fn new(
        config: &'a GeneratorConfig,
        classification: &'a ClassificationTable,
        classes: &'a ClassRegistry,
        enums: &'a EnumRegistry,
    ) -> Self {
        Self {
            config,
            classification,
            classes,
            enums,
        }
    }

    /// File granularity
    pub fn file_level(&self) -> FileLevel {
        self.config.file_level
    }

    /// Front matter opening every generated document
    pub fn front_matter(&self, title: &str) -> String {
        format!(
            "---\ntitle: {}\nmetaTitle: \"{} API - {}\"\nmetaDescription: \"{}\"\n---\n\n",
            title, self.config.site_name, title, title
        )
    }

    /// Example generator for an audience
    pub fn examples(&self, audience: Audience) -> ExampleGenerator<'a> {
        ExampleGenerator::new(self.classes, self.enums, audience).with_max_depth(self.config.max_example_depth)
    }

    /// Whether a parameter is shown to the public audience
    pub fn is_allowed_parameter(&self, param: &ParamDef) -> bool {
        !self.config.is_hidden_parameter_type(&param.type_name)
    }

    /// Link to an operation
    pub fn operation_href(&self, relative: &str) -> String {
        format!("{}/{}", self.config.operation_link_base, relative)
    }

    /// Link to a configuration page
    pub fn configuration_href(&self, category_key: &str, slug: &str) -> String {
        format!("{}/{}/{}", self.config.configuration_link_base, category_key, slug)
    }

    /// Categories of a class; unclassified classes have none here
    pub fn categories_of(&self, oc: &OptionsClassDef) -> Vec<&'a Category> {
        self.classification.categories_of(&oc.class_name).unwrap_or_default()
    }

    /// Configuration example section of a page
    pub fn configuration_example(&self, oc: &OptionsClassDef, audience: Audience) -> DocResult<String> {
        let example = self.examples(audience).section_example(oc)?;
        let mut md = String::from("### Configuration example:\n");
        md.push_str(&json_block(&to_pretty_json(&example)?));
        Ok(md)
    }
}

/// Environment variables section of a page
pub fn environment_example(oc: &OptionsClassDef) -> String {
    let mut md = String::from("### Environment variables example:\n```\n");
    for line in environment_variables(oc) {
        md.push_str(&line);
        md.push('\n');
    }
    md.push_str("```\n");
    md
}

/// Fenced JSON block
pub fn json_block(json: &str) -> String {
    format!("``` json\n{}\n```\n", json)
}

/// Case-insensitive ordering used for categories in tables
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Operations grouped by category, groups and members sorted by name
pub fn group_by_category<'o>(ops: &[&'o OperationDef]) -> Vec<(&'o str, Vec<&'o OperationDef>)> {
    let mut groups: IndexMap<&str, Vec<&OperationDef>> = IndexMap::new();
    for op in ops {
        groups.entry(op.category.as_str()).or_default().push(op);
    }
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|a, b| compare_ignore_case(a.0, b.0));
    for (_, members) in groups.iter_mut() {
        members.sort_by(|a, b| a.operation_name.cmp(&b.operation_name));
    }
    groups
}

/// Requirements section lines; empty when the operation has none
pub fn requirements(op: &OperationDef) -> String {
    if !op.has_requirements() {
        return String::new();
    }
    let mut md = String::from("### Requirements:\n");
    for (label, values, prefix) in [
        ("AllowedRoles", &op.allowed_roles, "N.R."),
        ("RequiredPermissions", &op.required_permissions, "N.P."),
        ("RequiredPolicies", &op.required_policies, "N.Pol."),
        ("Scenarios", &op.scenarios, "N.S."),
    ] {
        if values.is_empty() {
            continue;
        }
        let items: Vec<&str> = values
            .iter()
            .map(|v| v.strip_prefix(prefix).unwrap_or(v))
            .collect();
        md.push_str(&format!("- **{}**: {}\n", label, items.join(", ")));
    }
    md
}

/// Renderer for an audience
pub fn create_renderer<'a>(audience: Audience, context: RenderContext<'a>) -> Box<dyn Renderer + 'a> {
    match audience {
        Audience::Frontend => Box::new(FrontendRenderer::new(context)),
        Audience::Backend => Box::new(BackendRenderer::new(context)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::mock_operation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_front_matter() {
        let config = GeneratorConfig::default();
        let table = ClassificationTable::default();
        let (classes, enums) = (ClassRegistry::new(), EnumRegistry::new());
        let context = RenderContext::new(&config, &table, &classes, &enums);
        assert_eq!(
            context.front_matter("Api references"),
            "---\ntitle: Api references\nmetaTitle: \"sensenet API - Api references\"\nmetaDescription: \"Api references\"\n---\n\n"
        );
    }

    #[test]
    fn test_group_by_category() {
        let ops = [
            mock_operation("Zed", "tools"),
            mock_operation("Alpha", "Tools"),
            mock_operation("Beta", "Admin"),
            mock_operation("Alpha", "tools"),
        ];
        let refs: Vec<&OperationDef> = ops.iter().collect();
        let groups = group_by_category(&refs);
        let shape: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|(cat, members)| (*cat, members.iter().map(|o| o.operation_name.as_str()).collect()))
            .collect();
        assert_eq!(
            shape,
            vec![("Admin", vec!["Beta"]), ("Tools", vec!["Alpha"]), ("tools", vec!["Alpha", "Zed"])]
        );
    }

    #[test]
    fn test_requirements() {
        let mut op = mock_operation("Foo", "Bar");
        assert_eq!(requirements(&op), "");
        op.allowed_roles = vec!["N.R.Everyone".into()];
        op.required_permissions = vec!["N.P.Open".into(), "N.P.Save".into()];
        op.content_types = vec!["N.CT.File".into()];
        assert_eq!(
            requirements(&op),
            "### Requirements:\n- **AllowedRoles**: Everyone\n- **RequiredPermissions**: Open, Save\n"
        );
    }
}
