//! Type vocabulary
//!
//! Maps declared source types onto the JSON-ish vocabulary used in public
//! documentation: tasks are unwrapped, collections become arrays.

use crate::params::simple_type_name;

/// Generic collection heads rendered as arrays
const COLLECTION_TYPES: [&str; 7] = [
    "IEnumerable",
    "ICollection",
    "IList",
    "List",
    "IReadOnlyList",
    "IReadOnlyCollection",
    "ODataArray",
];

/// Split `Head<Inner>` into its simple head name and inner argument text
fn generic_parts(type_name: &str) -> Option<(&str, &str)> {
    let open = type_name.find('<')?;
    let inner = type_name[open + 1..].strip_suffix('>')?;
    Some((simple_type_name(&type_name[..open]), inner.trim()))
}

/// Public type of a declared type.
///
/// ```
/// use apidoc_etch::types::json_type;
///
/// assert_eq!(json_type("Task<IEnumerable<string>>"), "string[]");
/// assert_eq!(json_type("System.Threading.Tasks.Task"), "void");
/// assert_eq!(json_type("ODataArray<int>"), "int[]");
/// ```
pub fn json_type(type_name: &str) -> String {
    let type_name = type_name.trim();
    match type_name {
        "Task" | "STT.Task" | "System.Threading.Tasks.Task" | "void" => return "void".to_string(),
        _ => {}
    }
    match generic_parts(type_name) {
        Some(("Task", inner)) => json_type(inner),
        Some((head, inner)) if COLLECTION_TYPES.contains(&head) => format!("{}[]", json_type(inner)),
        _ => type_name.to_string(),
    }
}

/// Public type wrapped as inline code, e.g. `` `string[]` ``
pub fn frontend_type(type_name: &str) -> String {
    format!("`{}`", json_type(type_name))
}

/// Backtick generic types so Markdown does not swallow the angle brackets
pub fn format_type(type_name: &str) -> String {
    if type_name.contains('<') {
        format!("`{}`", type_name)
    } else {
        type_name.to_string()
    }
}

/// Element type of a (possibly nullable) array or collection type, or the type itself
pub fn element_type(type_name: &str) -> &str {
    let type_name = type_name.trim().trim_end_matches('?');
    if let Some(element) = type_name.strip_suffix("[]") {
        return element;
    }
    match generic_parts(type_name) {
        Some((head, inner)) if COLLECTION_TYPES.contains(&head) => inner,
        _ => type_name,
    }
}

/// Whether the public type is an array
pub fn is_array_type(type_name: &str) -> bool {
    json_type(type_name).trim_end_matches('?').ends_with("[]")
}
