//! Public documentation
//!
//! Pages for API consumers: hidden infrastructure parameters are removed and
//! types are shown in their JSON form.

use super::{
    compare_ignore_case, environment_example, group_by_category, json_block, requirements, RenderContext,
    Renderer,
};
use crate::diagnostics::DocResult;
use crate::example::to_pretty_json;
use crate::node::Audience;
use crate::operation::OperationDef;
use crate::options_class::OptionsClassDef;
use crate::params::ParamDef;
use crate::router::{operation_link, FileLevel};
use crate::types::{frontend_type, json_type};
use indexmap::IndexMap;

const CHEAT_SHEET_INTRO: &str = "This article contains configuration examples, grouped by github repositories. \
     Some of these can be combined into a single configuration file, \
     but this is determined by the application.";

const CHEAT_SHEET_WARNING: &str = "**WARNING** These are sample configurations containing example values. \
     Do not use it without modifying it to reflect your environment.";

/// Renderer for API consumers
pub struct FrontendRenderer<'a> {
    context: RenderContext<'a>,
}

impl<'a> FrontendRenderer<'a> {
    /// Create a renderer
    pub fn new(context: RenderContext<'a>) -> Self {
        Self { context }
    }

    /// Public copy of the parameters: hidden types removed, types in JSON form
    fn public_parameters(&self, op: &OperationDef) -> Vec<ParamDef> {
        op.parameters
            .iter()
            .filter(|p| self.context.is_allowed_parameter(p))
            .map(|p| ParamDef {
                type_name: json_type(&p.type_name),
                ..p.clone()
            })
            .collect()
    }

    /// Public parameters after the target content, as `type name` pairs
    fn signature(&self, op: &OperationDef) -> String {
        op.request_params()
            .iter()
            .filter(|p| self.context.is_allowed_parameter(p))
            .map(|p| format!("{} {}", frontend_type(&p.type_name), p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn request_example(&self, op: &OperationDef, params: &[ParamDef]) -> String {
        let mut md = String::from("### Request example:\n");
        if let Some(target) = params.first() {
            if !target.documentation.is_empty() {
                md.push_str(&target.documentation);
                md.push('\n');
            }
        }

        let root_only = op.is_root_only();
        let target = if root_only {
            "/odata.svc/('Root')"
        } else {
            "/odata.svc/Root/...('targetContent')"
        };
        let request_params = params.get(1..).unwrap_or(&[]);

        let post = |md: &mut String| {
            md.push_str(&format!("```\nPOST {}/{}\n", target, op.operation_name));
            if !request_params.is_empty() {
                md.push_str("DATA:\n");
                md.push_str(&post_payload(request_params));
                md.push('\n');
            }
            md.push_str("```\n");
        };

        if op.is_action {
            post(&mut md);
        } else {
            md.push_str(&format!(
                "```\nGET {}/{}{}\n```\n",
                target,
                op.operation_name,
                query_string(request_params)
            ));
            if !request_params.is_empty() {
                md.push_str("or\n");
                post(&mut md);
            }
        }

        if root_only {
            md.push_str("Can only be called on the root content.\n");
        } else if !op.content_types.is_empty() {
            let types: Vec<&str> = op
                .content_types
                .iter()
                .map(|t| t.strip_prefix("N.CT.").unwrap_or(t))
                .collect();
            let types = types.join(", ");
            if types == "GenericContent, ContentType" {
                md.push_str("The `targetContent` can be any content type\n");
            } else {
                md.push_str(&format!("The `targetContent` can be {}\n", types));
            }
        }
        md
    }
}

/// `?a=_value_&b=x&b=y` for a GET request; empty without parameters
fn query_string(params: &[ParamDef]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = params.iter().map(query_pair).collect();
    format!("?{}", pairs.join("&"))
}

fn query_pair(param: &ParamDef) -> String {
    let (element, is_array) = split_array(&param.type_name);
    if is_array && element == "string" {
        let example = param
            .example
            .clone()
            .unwrap_or_else(|| "[\"_item1_\", \"_item2_\"]".to_string());
        return example
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|item| format!("{}={}", param.name, item.trim().trim_matches('"')))
            .collect::<Vec<_>>()
            .join("&");
    }
    let example = param.example.as_deref().unwrap_or("_value_");
    format!("{}={}", param.name, example.trim_matches(['\'', '"']))
}

/// `models=[{ ... }]` payload of a POST request
fn post_payload(params: &[ParamDef]) -> String {
    let fields: Vec<String> = params.iter().map(post_field).collect();
    format!("models=[{{\n  {}\n}}]", fields.join(",\n  "))
}

fn post_field(param: &ParamDef) -> String {
    let (element, is_array) = split_array(&param.type_name);
    let mut example = match (&param.example, element == "string", is_array) {
        (Some(example), _, _) => example.clone(),
        (None, true, true) => "[\"_item1_\", \"_item2_\"]".to_string(),
        (None, true, false) => "\"_value_\"".to_string(),
        (None, false, true) => "[_item1_, _item2_]".to_string(),
        (None, false, false) => "_value_".to_string(),
    };
    if param.type_name == "string" && !is_quoted(&example) {
        example = format!("\"{}\"", example);
    }
    format!("\"{}\": {}", param.name, example)
}

fn split_array(type_name: &str) -> (&str, bool) {
    match type_name.strip_suffix("[]") {
        Some(element) => (element, true),
        None => (type_name, false),
    }
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && (text.starts_with('"') || text.starts_with('\'')) && text.ends_with('"')
}

impl Renderer for FrontendRenderer<'_> {
    fn audience(&self) -> Audience {
        Audience::Frontend
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
            compare_ignore_case(&a.category, &b.category).then_with(|| a.operation_name.cmp(&b.operation_name))
        });

        let mut md = format!("## {} ({})\n", title, ops.len());
        md.push_str("| Category | Operation | Method |\n");
        md.push_str("| -------- | --------- | ------ |\n");
        for op in ordered {
            let link = self.context.operation_href(&operation_link(self.context.file_level(), op));
            let category = match self.context.file_level() {
                FileLevel::Category => {
                    format!("[{}]({})", op.category, self.context.operation_href(&op.category_slug))
                }
                FileLevel::Operation | FileLevel::Flat => op.category.clone(),
            };
            md.push_str(&format!(
                "| {} | [{}]({}) | {} |\n",
                category,
                op.operation_name,
                link,
                op.method_label()
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
            match self.context.file_level() {
                FileLevel::Category => md.push_str(&format!(
                    "- [{}]({})\n",
                    category,
                    self.context.operation_href(&members[0].category_slug)
                )),
                FileLevel::Operation | FileLevel::Flat => md.push_str(&format!("- {}\n", category)),
            }
            for op in members {
                md.push_str(&format!(
                    "  - {} [{}]({})({}) : {}\n",
                    if op.is_action { "POST" } else { "GET " },
                    op.operation_name,
                    self.context.operation_href(&operation_link(self.context.file_level(), op)),
                    self.signature(op),
                    frontend_type(&op.return_value.type_name)
                ));
            }
        }
        md
    }

    fn operation_page(&self, op: &OperationDef) -> DocResult<String> {
        let params = self.public_parameters(op);

        let mut head = vec![if op.is_action {
            "- Method: **POST**".to_string()
        } else {
            "- Method: **GET** or optionally POST".to_string()
        }];
        if let Some(icon) = &op.icon {
            head.push(format!("- Icon: **{}**", icon));
        }

        let mut md = format!("## {}\n{}.\n", op.operation_name, head.join("\n"));
        if let Some(description) = op.description.as_deref().filter(|d| !d.is_empty()) {
            if !self.context.config.hide_description {
                md.push_str(&format!("\n{}\n", description));
            }
        }
        md.push('\n');
        if !op.documentation.is_empty() {
            md.push_str(&op.documentation);
            md.push('\n');
        }
        md.push('\n');

        md.push_str(&self.request_example(op, &params));

        md.push_str("### Parameters:\n");
        let request_params = params.get(1..).unwrap_or(&[]);
        if request_params.is_empty() {
            md.push_str("There are no parameters.\n");
        }
        for param in request_params {
            md.push_str(&format!(
                "- **{}** (`{}`){}: {}\n",
                param.name,
                param.type_name,
                if param.optional { " optional" } else { "" },
                param.documentation
            ));
        }

        let return_type = frontend_type(&op.return_value.type_name);
        let return_doc = &op.return_value.documentation;
        if return_type != "`void`" || !return_doc.is_empty() {
            md.push_str("\n### Return value:\n");
            if return_type == "`void`" {
                md.push_str(&format!("{}\n", return_doc));
            } else if return_doc.is_empty() {
                md.push_str(&format!("Type: {}.\n", return_type));
            } else {
                md.push_str(&format!("{} (Type: {}).\n", return_doc, return_type));
            }
        }

        md.push('\n');
        md.push_str(&requirements(op));
        md.push('\n');
        Ok(md)
    }

    fn options_index(&self, title: &str, classes: &[&OptionsClassDef]) -> String {
        if classes.is_empty() {
            return String::new();
        }
        let mut md = format!("## {} ({} sections)\n", title, classes.len());
        md.push_str("| ClassName | Application | Section |\n");
        md.push_str("| --------- | ----------- | ------- |\n");
        for category in self.context.classification.categories() {
            let mut members: Vec<&&OptionsClassDef> = classes
                .iter()
                .filter(|oc| self.context.categories_of(oc).iter().any(|c| c.key == category.key))
                .collect();
            members.sort_by(|a, b| a.class_name.cmp(&b.class_name));
            for oc in members {
                md.push_str(&format!(
                    "| [{}]({}) | {} | {} |\n",
                    oc.class_name,
                    self.context.configuration_href(&category.key, &oc.slug),
                    category.name,
                    oc.section
                ));
            }
        }
        md
    }

    fn options_cheat_sheet(&self, title: &str, classes: &[&OptionsClassDef]) -> DocResult<String> {
        if classes.is_empty() {
            return Ok(String::new());
        }
        let mut by_repository: IndexMap<String, Vec<&OptionsClassDef>> = IndexMap::new();
        for oc in classes {
            by_repository.entry(oc.repository()).or_default().push(*oc);
        }

        let examples = self.context.examples(Audience::Frontend);
        let mut md = format!("## {} ({} sections)\n", title, classes.len());
        md.push_str(CHEAT_SHEET_INTRO);
        md.push_str("\n\n");
        md.push_str(CHEAT_SHEET_WARNING);
        md.push('\n');
        for (repository, members) in by_repository {
            let example = examples.merged_example(members)?;
            md.push_str(&format!("## {}\n", repository));
            md.push_str(&json_block(&to_pretty_json(&example)?));
        }
        Ok(md)
    }

    fn options_page(&self, oc: &OptionsClassDef) -> DocResult<String> {
        let mut md = format!("## {}\n\n", oc.class_name);
        if !oc.documentation.is_empty() {
            md.push_str(&oc.documentation);
            md.push('\n');
        }
        md.push('\n');

        md.push_str(&self.context.configuration_example(oc, Audience::Frontend)?);
        md.push_str(&environment_example(oc));

        md.push_str("### Properties:\n");
        for prop in oc.properties.iter().filter(|p| !p.is_backend_only) {
            md.push_str(&format!(
                "- **{}** ({}): {}\n",
                prop.name,
                frontend_type(&prop.type_name),
                prop.documentation
            ));
        }
        md.push('\n');
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
    use crate::r#enum::EnumRegistry;
    use crate::test::{mock_operation, mock_options_class};
    use pretty_assertions::assert_eq;

    struct Fixture {
        config: GeneratorConfig,
        table: ClassificationTable,
        classes: ClassRegistry,
        enums: EnumRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                config: GeneratorConfig::default(),
                table: ClassificationTable::builtin().unwrap(),
                classes: ClassRegistry::new(),
                enums: EnumRegistry::new(),
            }
        }

        fn renderer(&self) -> FrontendRenderer<'_> {
            FrontendRenderer::new(RenderContext::new(&self.config, &self.table, &self.classes, &self.enums))
        }
    }

    #[test]
    fn test_operation_table_flat() {
        let fixture = Fixture::new();
        let mut a = mock_operation("GetSchema", "Tools");
        a.slug = "getschema".into();
        let mut b = mock_operation("Approve", "content");
        b.slug = "approve".into();
        b.is_action = true;

        let md = fixture.renderer().operation_table("Operations", &[&a, &b]);
        assert_eq!(
            md,
            "## Operations (2)\n\
             | Category | Operation | Method |\n\
             | -------- | --------- | ------ |\n\
             | content | [Approve](/restapi/approve) | POST |\n\
             | Tools | [GetSchema](/restapi/getschema) | GET |\n"
        );
        assert_eq!(fixture.renderer().operation_table("Operations", &[]), "");
    }

    #[test]
    fn test_operation_table_by_category() {
        let mut fixture = Fixture::new();
        fixture.config.file_level = FileLevel::Category;
        let mut op = mock_operation("GetSchema", "Content Types");
        op.slug = "getschema".into();

        let md = fixture.renderer().operation_table("Operations", &[&op]);
        assert!(md.ends_with(
            "| [Content Types](/restapi/contenttypes) | [GetSchema](/restapi/contenttypes#getschema) | GET |\n"
        ));
    }

    #[test]
    fn test_operation_tree_hides_infrastructure_parameters() {
        let fixture = Fixture::new();
        let mut op = mock_operation("Search", "Querying");
        op.slug = "search".into();
        op.parameters.push(ParamDef::new("httpContext", "HttpContext"));
        op.parameters.push(ParamDef::new("text", "string"));
        op.parameters.push(ParamDef::new("types", "IEnumerable<string>"));
        op.return_value.type_name = "Task<object>".into();

        let md = fixture.renderer().operation_tree("CHEAT SHEET", &[&op]);
        assert_eq!(
            md,
            "## CHEAT SHEET (1 operations)\n\n\
             - Querying\n  \
             - GET  [Search](/restapi/search)(`string` text, `string[]` types) : `object`\n"
        );
    }

    #[test]
    fn test_function_page() {
        let fixture = Fixture::new();
        let mut op = mock_operation("GetChildren", "Tree");
        op.icon = Some("folder".into());
        op.description = Some("Lists children".into());
        op.documentation = "Returns the children.".into();
        op.parameters[0].documentation = "Container.".into();
        op.parameters.push(ParamDef::new("types", "string[]").with_documentation("Filter.").as_optional());
        op.parameters.push(ParamDef::new("depth", "int").with_documentation("Depth."));
        op.return_value.documentation = "The children".into();
        op.content_types = vec!["N.CT.Folder".into(), "N.CT.Workspace".into()];

        let md = fixture.renderer().operation_page(&op).unwrap();
        assert_eq!(
            md,
            "## GetChildren\n\
             - Method: **GET** or optionally POST\n\
             - Icon: **folder**.\n\
             \n\
             Returns the children.\n\
             \n\
             ### Request example:\n\
             Container.\n\
             ```\n\
             GET /odata.svc/Root/...('targetContent')/GetChildren?types=_item1_&types=_item2_&depth=_value_\n\
             ```\n\
             or\n\
             ```\n\
             POST /odata.svc/Root/...('targetContent')/GetChildren\n\
             DATA:\n\
             models=[{\n  \"types\": [\"_item1_\", \"_item2_\"],\n  \"depth\": _value_\n}]\n\
             ```\n\
             The `targetContent` can be Folder, Workspace\n\
             ### Parameters:\n\
             - **types** (`string[]`) optional: Filter.\n\
             - **depth** (`int`): Depth.\n\
             \n\
             ### Return value:\n\
             The children (Type: `string`).\n\
             \n\
             ### Requirements:\n\
             \n"
        );
    }

    #[test]
    fn test_root_only_action_page() {
        let mut fixture = Fixture::new();
        fixture.config.hide_description = false;
        let mut op = mock_operation("Reindex", "Indexing");
        op.is_action = true;
        op.description = Some("Rebuilds the index".into());
        op.content_types = vec!["N.CT.PortalRoot".into()];
        op.return_value.type_name = "Task".into();
        op.parameters.push(ParamDef::new("request", "ODataRequest"));

        let md = fixture.renderer().operation_page(&op).unwrap();
        assert!(md.starts_with("## Reindex\n- Method: **POST**.\n\nRebuilds the index\n"));
        assert!(md.contains("```\nPOST /odata.svc/('Root')/Reindex\n```\nCan only be called on the root content.\n"));
        assert!(md.contains("### Parameters:\nThere are no parameters.\n"));
        assert!(!md.contains("### Return value:"));
        assert!(!md.contains("ODataRequest"));
    }

    #[test]
    fn test_any_content_type() {
        let fixture = Fixture::new();
        let mut op = mock_operation("Info", "Tools");
        op.content_types = vec!["N.CT.GenericContent".into(), "N.CT.ContentType".into()];
        let md = fixture.renderer().operation_page(&op).unwrap();
        assert!(md.contains("The `targetContent` can be any content type\n"));
    }

    #[test]
    fn test_post_field_examples() {
        let quoted = ParamDef {
            example: Some("'abc\"".into()),
            ..ParamDef::new("name", "string")
        };
        assert_eq!(post_field(&quoted), "\"name\": 'abc\"");
        let bare = ParamDef {
            example: Some("abc".into()),
            ..ParamDef::new("name", "string")
        };
        assert_eq!(post_field(&bare), "\"name\": \"abc\"");
        assert_eq!(post_field(&ParamDef::new("ids", "int[]")), "\"ids\": [_item1_, _item2_]");
        let listed = ParamDef {
            example: Some("[\"Task\", \"Event\"]".into()),
            ..ParamDef::new("types", "string[]")
        };
        assert_eq!(query_pair(&listed), "types=Task&types=Event");
    }

    #[test]
    fn test_options_page() {
        let fixture = Fixture::new();
        let mut callback = PropertyDef::new("OnError", "Func<Exception, Task>");
        callback.is_backend_only = true;
        let mut oc = mock_options_class(
            "EmailOptions",
            "sensenet:Email",
            vec![
                PropertyDef::new("Server", "string"),
                PropertyDef::new("Port", "int"),
                callback,
            ],
        );
        oc.documentation = "Email settings.".into();
        oc.properties[0].documentation = "SMTP host.".into();

        let md = fixture.renderer().options_page(&oc).unwrap();
        assert_eq!(
            md,
            "## EmailOptions\n\
             \n\
             Email settings.\n\
             \n\
             ### Configuration example:\n\
             ``` json\n\
             {\n  \"sensenet\": {\n    \"Email\": {\n      \"Server\": \"_stringValue_\",\n      \"Port\": 0\n    }\n  }\n}\n\
             ```\n\
             ### Environment variables example:\n\
             ```\n\
             sensenet__Email__Server=\"_string_value_\"\n\
             sensenet__Email__Port=\"_int_value_\"\n\
             ```\n\
             ### Properties:\n\
             - **Server** (`string`): SMTP host.\n\
             - **Port** (`int`): \n\
             \n"
        );
    }

    #[test]
    fn test_options_index_by_category() {
        let fixture = Fixture::new();
        let mut rabbit = mock_options_class("RabbitMqOptions", "sensenet:rabbitmq", vec![]);
        rabbit.slug = "rabbitmqoptions".into();
        let mut data = mock_options_class("DataOptions", "sensenet:Data", vec![]);
        data.slug = "dataoptions".into();

        let md = fixture.renderer().options_index("Option classes", &[&rabbit, &data]);
        assert_eq!(
            md,
            "## Option classes (2 sections)\n\
             | ClassName | Application | Section |\n\
             | --------- | ----------- | ------- |\n\
             | [DataOptions](/configuration/sensenet/dataoptions) | SenseNet | sensenet:Data |\n\
             | [RabbitMqOptions](/configuration/sensenet/rabbitmqoptions) | SenseNet | sensenet:rabbitmq |\n\
             | [RabbitMqOptions](/configuration/searchservice/rabbitmqoptions) | SearchService | sensenet:rabbitmq |\n"
        );
    }

    #[test]
    fn test_cheat_sheet_groups_by_repository() {
        let fixture = Fixture::new();
        let mut a = mock_options_class("DataOptions", "sensenet:Data", vec![PropertyDef::new("Timeout", "int")]);
        a.file = "/work/sensenet/src/Storage/DataOptions.cs".into();
        let mut b = mock_options_class("FsReaderArgs", "reader", vec![PropertyDef::new("Path", "string")]);
        b.file = "/work/sn-io/src/Reader/FsReaderArgs.cs".into();

        let md = fixture.renderer().options_cheat_sheet("CHEAT SHEET", &[&a, &b]).unwrap();
        assert!(md.starts_with("## CHEAT SHEET (2 sections)\nThis article contains configuration examples"));
        assert!(md.contains("## sensenet\n``` json\n{\n  \"sensenet\": {\n    \"Data\": {\n      \"Timeout\": 0\n"));
        assert!(md.contains("## sn-io\n``` json\n{\n  \"reader\": {\n    \"Path\": \"_stringValue_\"\n  }\n}\n```\n"));
    }

    #[test]
    fn test_category_root() {
        let fixture = Fixture::new();
        let oc = mock_options_class("TaskManagementOptions", "TaskManagement", vec![PropertyDef::new("Url", "string")]);
        let category = fixture.table.category("taskmanagement").unwrap();

        let md = fixture.renderer().category_root(category, &[&oc]).unwrap();
        assert!(md.starts_with("---\ntitle: \"TaskManagement\"\n"));
        assert!(md.contains(
            "sensenet TaskManagement.\n\n## Configuration example\n\n**WARNING** This is a sample configuration"
        ));
        assert!(md.ends_with("``` json\n{\n  \"TaskManagement\": {\n    \"Url\": \"_stringValue_\"\n  }\n}\n```\n"));
    }
}
