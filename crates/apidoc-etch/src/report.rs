//! Generation report
//!
//! `generation.txt` is the audit trail of a run: counts, documentation gaps,
//! section conflicts and flat listings of everything that was documented.

use crate::operation::OperationDef;
use crate::options_class::OptionsClassDef;
use crate::render::group_by_category;
use crate::types::json_type;

/// File name of the report inside the output directory
pub const REPORT_FILE: &str = "generation.txt";

/// What a report is built from
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// Input path as given
    pub input: &'a str,
    /// Every extracted operation
    pub operations: &'a [OperationDef],
    /// Operations of standard and modern non-test projects
    pub core_operations: &'a [&'a OperationDef],
    /// Options classes before conflict resolution
    pub extracted_options: &'a [OptionsClassDef],
    /// Options classes that will be documented
    pub documented_options: &'a [OptionsClassDef],
    /// Section conflict messages
    pub problems: &'a [String],
    /// Parameter types hidden from the public signature listing
    pub hidden_parameter_types: &'a [String],
}

/// Render the report text
pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut out = String::new();
    line(&mut out, format!("Path:            {}", input.input));
    line(&mut out, format!("Operations:      {}", input.operations.len()));
    line(&mut out, format!("Options classes: {}", input.extracted_options.len()));

    let undocumented_ops: Vec<(&OperationDef, Vec<String>)> = input
        .core_operations
        .iter()
        .map(|op| (*op, op.missing_documentation()))
        .filter(|(_, missing)| !missing.is_empty())
        .collect();
    out.push('\n');
    line(
        &mut out,
        format!(
            "Missing documentation of operations (except the first 'content' parameter) (count: {}):",
            undocumented_ops.len()
        ),
    );
    line(&mut out, "File\tMethodName\tParameter");
    for (op, missing) in &undocumented_ops {
        line(&mut out, format!("'{}'\t{}\t{}", op.file, op.method_name, missing.join(", ")));
    }

    let undocumented_classes: Vec<(&OptionsClassDef, Vec<String>)> = input
        .extracted_options
        .iter()
        .map(|oc| (oc, oc.missing_documentation()))
        .filter(|(_, missing)| !missing.is_empty())
        .collect();
    out.push('\n');
    line(
        &mut out,
        format!("Missing documentation of options classes (count: {}):", undocumented_classes.len()),
    );
    line(&mut out, "File\tClassName\tProperty");
    for (oc, missing) in &undocumented_classes {
        line(&mut out, format!("'{}'\t{}\t{}", oc.file, oc.class_name, missing.join(", ")));
    }

    if !input.problems.is_empty() {
        out.push('\n');
        for problem in input.problems {
            line(&mut out, problem);
        }
    }

    out.push('\n');
    line(&mut out, "Operation descriptions:");
    line(&mut out, "Description\tMethodName\tFile");
    for op in input.core_operations {
        if let Some(description) = op.description.as_deref().filter(|d| !d.is_empty()) {
            line(&mut out, format!("'{}'\t{}\t{}", description, op.method_name, op.file));
        }
    }

    for (heading, actions) in [("Functions and parameters:", false), ("Actions and parameters:", true)] {
        out.push('\n');
        line(&mut out, heading);
        line(&mut out, "File\tMethodName\tParameters");
        for op in input.core_operations.iter().filter(|op| op.is_action == actions) {
            let params: Vec<String> = op
                .request_params()
                .iter()
                .map(|p| format!("{} {}", p.type_name, p.name))
                .collect();
            line(&mut out, format!("{}\t{}\t{}", op.file, op.method_name, params.join(", ")));
        }
    }

    out.push('\n');
    line(&mut out, "Options classes and properties:");
    line(&mut out, "File\tClassName\tProperties");
    for oc in input.documented_options {
        line(&mut out, format!("{}\t{}\t{}", oc.file, oc.class_name, oc.property_signature(", ")));
    }

    out.push('\n');
    line(&mut out, "ODATA CHEAT SHEET:");
    for (category, members) in group_by_category(input.core_operations) {
        line(&mut out, format!("  {}", category));
        for op in members {
            let params: Vec<String> = op
                .request_params()
                .iter()
                .filter(|p| !input.hidden_parameter_types.contains(&p.type_name))
                .map(|p| format!("{} {}", json_type(&p.type_name), p.name))
                .collect();
            line(
                &mut out,
                format!(
                    "    {} {}({}) : {}",
                    if op.is_action { "POST" } else { "GET " },
                    op.operation_name,
                    params.join(", "),
                    json_type(&op.return_value.type_name)
                ),
            );
        }
    }

    out.push('\n');
    line(&mut out, "OPTION CLASSES CHEAT SHEET:");
    for oc in input.documented_options {
        line(&mut out, format!("  {}", oc.class_name));
        for prop in &oc.properties {
            line(
                &mut out,
                format!(
                    "    {} {} {{{} }} {}",
                    prop.type_name,
                    prop.name,
                    prop.accessors(),
                    prop.initializer.as_deref().unwrap_or("")
                ),
            );
        }
    }
    out
}

fn line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}
