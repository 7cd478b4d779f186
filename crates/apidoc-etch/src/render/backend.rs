//! Internal documentation
//!
//! Pages for the developers of the documented services. Declared types are
//! kept as written, and every page names the repository, project and file the
//! entity comes from.

use super::{environment_example, group_by_category, requirements, RenderContext, Renderer};
use crate::diagnostics::DocResult;
use crate::node::{split_file_name, Audience};
use crate::operation::OperationDef;
use crate::options_class::OptionsClassDef;
use crate::router::operation_link;
use crate::types::format_type;

/// Renderer for service developers
pub struct BackendRenderer<'a> {
    context: RenderContext<'a>,
}

impl<'a> BackendRenderer<'a> {
    /// Create a renderer
    pub fn new(context: RenderContext<'a>) -> Self {
        Self { context }
    }

    fn signature(op: &OperationDef) -> String {
        op.request_params()
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn category_names(&self, oc: &OptionsClassDef) -> String {
        self.context
            .categories_of(oc)
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Renderer for BackendRenderer<'_> {
    fn audience(&self) -> Audience {
        Audience::Backend
    }

    fn context(&self) -> &RenderContext<'_> {
        &self.context
    }

    fn operation_table(&self, title: &str, ops: &[&OperationDef]) -> String {
        if ops.is_empty() {
            return String::new();
        }
        let mut ordered = ops.to_vec();
        ordered.sort_by(|a, b| {
            a.file_relative
                .cmp(&b.file_relative)
                .then_with(|| a.operation_name.cmp(&b.operation_name))
        });

        let mut md = format!("## {} ({} operations)\n", title, ops.len());
        md.push_str("| Operation | Category | Method | Repository | Project | File | Directory |\n");
        md.push_str("| --------- | -------- | ------ | ---------- | ------- | ---- | --------- |\n");
        for op in ordered {
            let (directory, file_name) = split_file_name(&op.file_relative);
            md.push_str(&format!(
                "| [{}]({}) | {} | {} | {} | {} | {} | {} |\n",
                op.operation_name,
                self.context.operation_href(&operation_link(self.context.file_level(), op)),
                op.category,
                op.method_label(),
                op.repository(),
                op.project_name(),
                file_name,
                directory
            ));
        }
        md
    }

    fn operation_tree(&self, title: &str, ops: &[&OperationDef]) -> String {
        if ops.is_empty() {
            return String::new();
        }
        let mut md = format!("## {} ({} operations)\n\n", title, ops.len());
        for (category, members) in group_by_category(ops) {
            md.push_str(&format!("- {}\n", category));
            for op in members {
                md.push_str(&format!(
                    "  - {} [{}]({})({}) : {}\n",
                    if op.is_action { "POST" } else { "GET " },
                    op.operation_name,
                    self.context.operation_href(&operation_link(self.context.file_level(), op)),
                    Self::signature(op),
                    op.return_value.type_name
                ));
            }
        }
        md
    }

    fn operation_page(&self, op: &OperationDef) -> DocResult<String> {
        let mut head = vec![
            format!("- Method: **{}**", op.method_label()),
            format!("- Repository: **{}**", op.repository()),
            format!("- Project: **{}**", op.project_name()),
            format!("- File: **{}**", op.file_relative),
            format!("- Class: **{}**", op.full_class_name()),
            format!("- Method name: **{}**", op.method_name),
        ];
        if let Some(icon) = &op.icon {
            head.push(format!("- Icon: **{}**", icon));
        }

        let mut md = format!("## {}\n{}.\n", op.operation_name, head.join("\n"));
        if let Some(description) = op.description.as_deref().filter(|d| !d.is_empty()) {
            md.push_str(&format!("\n{}\n", description));
        }
        md.push('\n');
        if !op.documentation.is_empty() {
            md.push_str(&op.documentation);
            md.push('\n');
        }
        md.push('\n');

        if !op.type_params.is_empty() {
            md.push_str("### Type parameters:\n");
            for tp in &op.type_params {
                md.push_str(&format!("- **{}**: {}\n", tp.name, tp.documentation));
            }
            md.push('\n');
        }

        md.push_str("### Parameters:\n");
        for param in &op.parameters {
            md.push_str(&format!(
                "- **{}** ({}){}: {}\n",
                param.name,
                format_type(&param.type_name),
                if param.optional { " optional" } else { "" },
                param.documentation
            ));
        }

        md.push_str("\n### Return value:\n");
        let return_doc = &op.return_value.documentation;
        if return_doc.is_empty() {
            md.push_str(&format!("Type: {}.\n", format_type(&op.return_value.type_name)));
        } else {
            md.push_str(&format!(
                "{} (Type: {}).\n",
                return_doc,
                format_type(&op.return_value.type_name)
            ));
        }

        md.push('\n');
        if !op.content_types.is_empty() {
            md.push_str(&format!("- ContentTypes: {}\n", op.content_types.join(", ")));
        }
        md.push_str(&requirements(op));
        md.push('\n');
        Ok(md)
    }

    fn options_index(&self, title: &str, classes: &[&OptionsClassDef]) -> String {
        if classes.is_empty() {
            return String::new();
        }
        let mut ordered = classes.to_vec();
        ordered.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.class_name.cmp(&b.class_name)));

        let mut md = format!("## {} ({} classes)\n", title, classes.len());
        md.push_str("| OptionClass | Category | Repository | Project | File | Directory |\n");
        md.push_str("| ----------- | -------- | ---------- | ------- | ---- | --------- |\n");
        for oc in ordered {
            let (directory, file_name) = split_file_name(&oc.file_relative);
            let link = match self.context.categories_of(oc).first() {
                Some(category) => self.context.configuration_href(&category.key, &oc.slug),
                None => oc.slug.clone(),
            };
            md.push_str(&format!(
                "| [{}]({}) | {} | {} | {} | {} | {} |\n",
                oc.class_name,
                link,
                self.category_names(oc),
                oc.repository(),
                oc.project_name(),
                file_name,
                directory
            ));
        }
        md
    }

    fn options_cheat_sheet(&self, title: &str, classes: &[&OptionsClassDef]) -> DocResult<String> {
        if classes.is_empty() {
            return Ok(String::new());
        }
        let mut md = format!("## {} ({} classes)\n\n", title, classes.len());
        for oc in classes {
            md.push_str(&format!("- **{}** (`{}`)\n", oc.full_name(), oc.section));
            for prop in &oc.properties {
                let initializer = prop
                    .initializer
                    .as_deref()
                    .map(|init| format!(" {}", init))
                    .unwrap_or_default();
                md.push_str(&format!(
                    "  - `{} {} {{{} }}{}`\n",
                    prop.type_name,
                    prop.name,
                    prop.accessors(),
                    initializer
                ));
            }
        }
        Ok(md)
    }

    fn options_page(&self, oc: &OptionsClassDef) -> DocResult<String> {
        let head = [
            format!("- Repository: **{}**", oc.repository()),
            format!("- Project: **{}**", oc.project_name()),
            format!("- File: **{}**", oc.file_relative),
            format!("- Class: **{}**", oc.full_name()),
            format!("- Section: **{}**", oc.section),
        ];
        let mut md = format!("## {}\n{}.\n\n", oc.class_name, head.join("\n"));
        if !oc.documentation.is_empty() {
            md.push_str(&oc.documentation);
            md.push('\n');
        }
        md.push('\n');

        md.push_str("### Properties:\n");
        for prop in &oc.properties {
            let mut line = format!(
                "- **{}** ({}): {}.",
                prop.name,
                format_type(&prop.type_name),
                prop.documentation.trim_matches('.')
            );
            if let Some(default) = prop.default_value() {
                line.push_str(&format!(" Default value: **{}**", default));
            }
            md.push_str(&line);
            md.push('\n');
        }
        md.push('\n');

        md.push_str(&self.context.configuration_example(oc, Audience::Backend)?);
        md.push_str(&environment_example(oc));
        Ok(md)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassRegistry;
    use crate::classification::ClassificationTable;
    use crate::docgen::GeneratorConfig;
    use crate::options_class::PropertyDef;
    use crate::params::ParamDef;
    use crate::r#enum::EnumRegistry;
    use crate::router::FileLevel;
    use crate::test::{mock_operation, mock_options_class};
    use pretty_assertions::assert_eq;

    fn render<T>(f: impl FnOnce(&BackendRenderer<'_>) -> T) -> T {
        let mut config = GeneratorConfig::default();
        config.file_level = FileLevel::Operation;
        let table = ClassificationTable::builtin().unwrap();
        let (classes, enums) = (ClassRegistry::new(), EnumRegistry::new());
        let renderer = BackendRenderer::new(RenderContext::new(&config, &table, &classes, &enums));
        f(&renderer)
    }

    #[test]
    fn test_operation_table() {
        let mut op = mock_operation("GetSchema", "Tools");
        op.slug = "getschema".into();
        op.file = "/work/sensenet/src/Services/SchemaActions.cs".into();
        op.file_relative = "sensenet/src/Services/SchemaActions.cs".into();

        let md = render(|r| r.operation_table("Operations", &[&op]));
        assert!(md.starts_with("## Operations (1 operations)\n| Operation | Category |"));
        assert!(md.ends_with(
            "| [GetSchema](/restapi/tools/getschema) | Tools | GET | sensenet | SenseNet.Services | SchemaActions.cs | sensenet/src/Services |\n"
        ));
    }

    #[test]
    fn test_operation_page_keeps_raw_types() {
        let mut op = mock_operation("Search", "Querying");
        op.namespace = "SenseNet.Services".into();
        op.class_name = "QueryActions".into();
        op.method_name = "SearchAsync".into();
        op.parameters.push(ParamDef::new("httpContext", "HttpContext"));
        op.parameters.push(ParamDef::new("types", "IEnumerable<string>").as_optional());
        op.return_value.type_name = "Task<object>".into();

        let md = render(|r| r.operation_page(&op)).unwrap();
        assert!(md.contains("- Class: **SenseNet.Services.QueryActions**\n- Method name: **SearchAsync**.\n"));
        assert!(md.contains("- **httpContext** (HttpContext): \n"));
        assert!(md.contains("- **types** (`IEnumerable<string>`) optional: \n"));
        assert!(md.contains("### Return value:\nType: `Task<object>`.\n"));
    }

    #[test]
    fn test_options_page() {
        let mut callback = PropertyDef::new("OnError", "Func<Exception, Task>");
        callback.is_backend_only = true;
        let mut oc = mock_options_class(
            "EmailOptions",
            "sensenet:Email",
            vec![PropertyDef::new("Port", "int").with_initializer("= 25"), callback],
        );
        oc.file = "/work/sensenet/src/Email/EmailOptions.cs".into();
        oc.file_relative = "sensenet/src/Email/EmailOptions.cs".into();
        oc.properties[0].documentation = "SMTP port.".into();

        let md = render(|r| r.options_page(&oc)).unwrap();
        assert!(md.starts_with(
            "## EmailOptions\n\
             - Repository: **sensenet**\n\
             - Project: **SenseNet.Services**\n\
             - File: **sensenet/src/Email/EmailOptions.cs**\n\
             - Class: **SenseNet.Configuration.EmailOptions**\n\
             - Section: **sensenet:Email**.\n"
        ));
        assert!(md.contains("### Properties:\n- **Port** (int): SMTP port. Default value: **25**\n"));
        assert!(md.contains("- **OnError** (`Func<Exception, Task>`): .\n"));
        assert!(md.contains("\"Port\": 0,\n      \"OnError\": {}"));
        assert!(md.ends_with("```\nsensenet__Email__Port=\"_int_value_\"\n```\n"));
    }

    #[test]
    fn test_options_index_sorted_by_file() {
        let mut a = mock_options_class("RabbitMqOptions", "sensenet:rabbitmq", vec![]);
        a.slug = "rabbitmqoptions".into();
        a.file = "b.cs".into();
        a.file_relative = "src/Messaging/b.cs".into();
        let mut b = mock_options_class("DataOptions", "sensenet:Data", vec![]);
        b.slug = "dataoptions".into();
        b.file = "a.cs".into();
        b.file_relative = "src/Storage/a.cs".into();

        let md = render(|r| r.options_index("Option classes", &[&a, &b]));
        let rows: Vec<&str> = md.lines().skip(3).collect();
        assert_eq!(
            rows,
            vec![
                "| [DataOptions](/configuration/sensenet/dataoptions) | SenseNet | a.cs | SenseNet.Services | a.cs | src/Storage |",
                "| [RabbitMqOptions](/configuration/sensenet/rabbitmqoptions) | SenseNet, SearchService | b.cs | SenseNet.Services | b.cs | src/Messaging |",
            ]
        );
    }

    #[test]
    fn test_options_cheat_sheet() {
        let oc = mock_options_class(
            "DataOptions",
            "sensenet:Data",
            vec![PropertyDef::new("Timeout", "int").with_initializer("= 30")],
        );
        let md = render(|r| r.options_cheat_sheet("CHEAT SHEET", &[&oc])).unwrap();
        assert_eq!(
            md,
            "## CHEAT SHEET (1 classes)\n\n\
             - **SenseNet.Configuration.DataOptions** (`sensenet:Data`)\n  \
             - `int Timeout { get; set; } = 30`\n"
        );
    }
}
