//! Doc-comment transformation
//!
//! Turns a raw structured documentation comment (`/// <summary>...`) into a
//! render-ready Markdown block plus the fragments that belong to individual
//! parameters, type parameters and the return value.
//!
//! The markup is parsed into a small element tree with `quick-xml` and then
//! rewritten in a fixed order; later stages see the output of earlier ones:
//!
//! 1. `see`/`seealso` cross references become `_target_`
//! 2. `c` becomes inline code, `code` becomes a fenced block
//! 3. `value` becomes `_text_`, `paramref` becomes `_name_`
//! 4. `nodoc` blocks are removed, `param` tags are detached
//! 5. `typeparam` tags are detached
//! 6. `returns` is detached
//! 7. `para`, `summary` and `remarks` become paragraphs
//! 8. `example` tags move to an `### Example(s)` section at the end
//! 9. `exception` tags move to an `### Exception(s)` list at the end
//! 10. whitespace is normalized

use crate::diagnostics::{DocError, DocResult};
use crate::params::{ParamDef, ReturnDef, TypeParamDef};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::{Captures, Regex};

lazy_static! {
    /// Character and predefined entity references
    static ref ENTITY_REGEX: Regex =
        Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|lt|gt|amp|quot|apos);").unwrap();

    /// Any start, end or empty tag
    static ref TAG_REGEX: Regex = Regex::new(r"</?[A-Za-z][^>]*>").unwrap();

    /// Comment markers at the start of a line
    static ref COMMENT_MARKER_REGEX: Regex = Regex::new(r"^\s*///").unwrap();
}

/// Name of the synthetic root element wrapped around every comment
const ROOT: &str = "doc";

/// Documentation detached from a `param` tag
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamDoc {
    /// Inner content of the tag
    pub documentation: String,
    /// Value of the `example` attribute
    pub example: Option<String>,
}

/// Result of transforming one documentation comment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocComment {
    /// Render-ready body
    pub body: String,
    /// Parameter documentation by name
    pub params: IndexMap<String, ParamDoc>,
    /// Type parameter documentation by name
    pub type_params: IndexMap<String, String>,
    /// Return value documentation
    pub returns: Option<String>,
}

impl DocComment {
    /// Transform a raw comment. An absent or blank comment yields an empty body.
    pub fn parse(raw: Option<&str>) -> DocResult<Self> {
        let mut doc = DocComment::default();
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Ok(doc);
        };

        let mut root = parse_markup(&wrap_comment(raw))?;

        render_links(&mut root);
        render_code(&mut root);
        render_values(&mut root);
        remove_suppressed(&mut root);
        doc.detach_params(&mut root);
        doc.detach_type_params(&mut root);
        doc.detach_returns(&mut root);
        render_blocks(&mut root);
        let examples = take_top_level(&mut root, "example");
        let exceptions = take_top_level(&mut root, "exception");

        let mut text = root.rendered();
        text.push_str(&examples_section(&examples));
        text.push_str(&exceptions_section(&exceptions));
        doc.body = normalize_whitespace(&text);

        Ok(doc)
    }

    /// Transform a comment, degrading malformed markup to its plain text.
    ///
    /// The markup error is handed back so the caller can report it.
    pub fn parse_lenient(raw: Option<&str>) -> (Self, Option<DocError>) {
        match Self::parse(raw) {
            Ok(doc) => (doc, None),
            Err(err) => {
                let body = raw.map(plain_text).unwrap_or_default();
                (
                    DocComment {
                        body,
                        ..Default::default()
                    },
                    Some(err),
                )
            }
        }
    }

    /// Attach detached fragments to the owning entity's descriptors.
    ///
    /// Names without a matching descriptor are dropped.
    pub fn attach(
        &self,
        params: &mut [ParamDef],
        type_params: &mut [TypeParamDef],
        return_value: Option<&mut ReturnDef>,
    ) {
        for param in params.iter_mut() {
            if let Some(doc) = self.params.get(&param.name) {
                param.documentation = doc.documentation.clone();
                if doc.example.is_some() {
                    param.example = doc.example.clone();
                }
            }
        }
        for type_param in type_params.iter_mut() {
            if let Some(doc) = self.type_params.get(&type_param.name) {
                type_param.documentation = doc.clone();
            }
        }
        if let (Some(ret), Some(doc)) = (return_value, &self.returns) {
            ret.documentation = doc.clone();
        }
    }

    fn detach_params(&mut self, root: &mut Element) {
        for param in take_top_level(root, "param") {
            let Some(name) = param.attr("name") else {
                continue;
            };
            self.params.insert(
                name.to_string(),
                ParamDoc {
                    documentation: normalize_whitespace(&param.rendered()),
                    example: param.attr("example").map(decode_entities),
                },
            );
        }
    }

    fn detach_type_params(&mut self, root: &mut Element) {
        for type_param in take_top_level(root, "typeparam") {
            if let Some(name) = type_param.attr("name") {
                self.type_params
                    .insert(name.to_string(), normalize_whitespace(&type_param.rendered()));
            }
        }
    }

    fn detach_returns(&mut self, root: &mut Element) {
        if let Some(first) = take_top_level(root, "returns").into_iter().next() {
            self.returns = Some(normalize_whitespace(&first.rendered()));
        }
    }
}

/// Transform a comment and keep only the body
pub fn transform(raw: Option<&str>) -> DocResult<String> {
    Ok(DocComment::parse(raw)?.body)
}

/// Strip comment markers and tags, leaving readable text
pub fn plain_text(raw: &str) -> String {
    let lines: Vec<String> = raw
        .lines()
        .map(|line| COMMENT_MARKER_REGEX.replace(line, "").trim().to_string())
        .collect();
    let joined = lines.join("\n");
    let text = TAG_REGEX.replace_all(&joined, "");
    normalize_whitespace(&decode_entities(&text))
}

/// Unify line terminators, collapse blank-line runs to one and trim.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.trim().replace("\r\n", "\n").replace('\r', "\n");

    let mut result: Vec<&str> = Vec::new();
    let mut blank_run = 0;
    for line in unified.split('\n') {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push(line);
    }

    result.join("\n")
}

/// Decode predefined and character entity references
pub fn decode_entities(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            match entity {
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "amp" => "&".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity[1..].parse::<u32>().ok()
                    };
                    code.and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}

/// Split into lines, drop blank ones, strip `///` and wrap in the synthetic root
fn wrap_comment(raw: &str) -> String {
    let lines: Vec<String> = raw
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(|line| line.replace("///", "").trim().to_string())
        .collect();
    format!("<{ROOT}>{}</{ROOT}>", lines.join("\n"))
}

// ---------------------------------------------------------------------------
// Markup tree
// ---------------------------------------------------------------------------

/// Text nodes always hold escaped markup text
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Children serialized back to markup
    fn inner_xml(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            write_node(child, &mut out);
        }
        out
    }

    /// Concatenated text of all descendants with entities decoded
    fn inner_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        decode_entities(&out)
    }

    /// Direct text children decoded, remaining elements kept as markup
    fn rendered(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(&decode_entities(text)),
                element => write_node(element, &mut out),
            }
        }
        out
    }
}

/// Escape text so it can live in a markup text node
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (key, value) in &el.attributes {
                out.push_str(&format!(" {}=\"{}\"", key, value));
            }
            if el.children.is_empty() {
                out.push_str(" />");
            } else {
                out.push('>');
                out.push_str(&el.inner_xml());
                out.push_str(&format!("</{}>", el.name));
            }
        }
    }
}

fn collect_text(children: &[Node], out: &mut String) {
    for child in children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
        }
    }
}

fn parse_markup(source: &str) -> DocResult<Element> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(element_from(&start)?),
            Ok(Event::Empty(start)) => {
                let element = element_from(&start)?;
                attach_node(&mut stack, &mut root, Node::Element(element))?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DocError::markup("unexpected closing tag"))?;
                attach_node(&mut stack, &mut root, Node::Element(element))?;
            }
            Ok(Event::Text(text)) => {
                push_text(&mut stack, &String::from_utf8_lossy(&text))?;
            }
            Ok(Event::CData(data)) => {
                push_text(&mut stack, &String::from_utf8_lossy(&data))?;
            }
            Ok(Event::GeneralRef(reference)) => {
                push_text(&mut stack, &format!("&{};", String::from_utf8_lossy(&reference)))?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DocError::markup(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(DocError::markup(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| DocError::markup("empty document"))
}

fn element_from(start: &BytesStart) -> DocResult<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocError::markup(format!("<{}>: {}", name, e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = decode_entities(&String::from_utf8_lossy(attr.value.as_ref()));
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach_node(stack: &mut [Element], root: &mut Option<Element>, node: Node) -> DocResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None => match node {
            Node::Element(element) if root.is_none() => {
                *root = Some(element);
                Ok(())
            }
            _ => Err(DocError::markup("content after the end of the comment")),
        },
    }
}

fn push_text(stack: &mut [Element], text: &str) -> DocResult<()> {
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(DocError::markup("text outside of the comment"));
    };
    match parent.children.last_mut() {
        Some(Node::Text(prev)) => prev.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rewrite stages
// ---------------------------------------------------------------------------

enum Rewrite {
    Keep,
    Replace(Node),
    Remove,
}

/// Rewrite every descendant named in `names`, innermost first
fn rewrite_descendants(children: &mut Vec<Node>, names: &[&str], f: &mut dyn FnMut(&Element) -> Rewrite) {
    let mut i = 0;
    while i < children.len() {
        let action = match &mut children[i] {
            Node::Element(el) => {
                rewrite_descendants(&mut el.children, names, f);
                if names.contains(&el.name.as_str()) {
                    f(el)
                } else {
                    Rewrite::Keep
                }
            }
            Node::Text(_) => Rewrite::Keep,
        };
        match action {
            Rewrite::Keep => i += 1,
            Rewrite::Replace(node) => {
                children[i] = node;
                i += 1;
            }
            Rewrite::Remove => {
                children.remove(i);
            }
        }
    }
}

/// Remove and return the direct children of `root` named `name`
fn take_top_level(root: &mut Element, name: &str) -> Vec<Element> {
    let mut taken = Vec::new();
    let mut kept = Vec::with_capacity(root.children.len());
    for child in root.children.drain(..) {
        match child {
            Node::Element(el) if el.name == name => taken.push(el),
            other => kept.push(other),
        }
    }
    root.children = kept;
    taken
}

fn text(value: String) -> Rewrite {
    Rewrite::Replace(Node::Text(escape_text(&value)))
}

fn render_links(root: &mut Element) {
    rewrite_descendants(&mut root.children, &["see", "seealso"], &mut |el| {
        if let Some(cref) = el.attr("cref") {
            text(format!("_{}_", cref))
        } else if let Some(word) = el.attr("langword") {
            text(format!("`{}`", word))
        } else {
            Rewrite::Keep
        }
    });
}

fn render_code(root: &mut Element) {
    rewrite_descendants(&mut root.children, &["c"], &mut |el| text(format!("`{}`", el.inner_text())));
    rewrite_descendants(&mut root.children, &["code"], &mut |el| {
        let source = el.inner_text();
        let source = source.trim_matches(|c: char| c == '\r' || c == '\n' || c == ' ' || c == '\t');
        let fence = match el.attr("lang") {
            Some(lang) if !lang.is_empty() => format!("``` {}", lang),
            _ => "```".to_string(),
        };
        text(format!("{}\n{}\n```\n", fence, source))
    });
}

fn render_values(root: &mut Element) {
    rewrite_descendants(&mut root.children, &["value", "paramref"], &mut |el| {
        if el.name == "value" {
            let inner = el.inner_xml();
            if inner.is_empty() {
                Rewrite::Keep
            } else {
                Rewrite::Replace(Node::Text(format!("_{}_", inner)))
            }
        } else {
            match el.attr("name") {
                Some(name) => text(format!("_{}_", name)),
                None => Rewrite::Keep,
            }
        }
    });
}

fn remove_suppressed(root: &mut Element) {
    rewrite_descendants(&mut root.children, &["nodoc"], &mut |_| Rewrite::Remove);
}

fn render_blocks(root: &mut Element) {
    let paragraph = |el: &Element| text(format!("\n\n{}\n\n", el.inner_text()));
    rewrite_descendants(&mut root.children, &["para"], &mut |el| paragraph(el));

    for child in root.children.iter_mut() {
        if let Node::Element(el) = child {
            if el.name == "summary" || el.name == "remarks" {
                *child = Node::Text(escape_text(&format!("\n\n{}\n\n", el.inner_text())));
            }
        }
    }
}

fn examples_section(examples: &[Element]) -> String {
    if examples.is_empty() {
        return String::new();
    }
    let mut section = String::from("\n### Example");
    if examples.len() > 1 {
        section.push('s');
    }
    section.push('\n');
    for example in examples {
        section.push('\n');
        section.push_str(example.inner_text().trim());
        section.push('\n');
    }
    section
}

fn exceptions_section(exceptions: &[Element]) -> String {
    let items: Vec<String> = exceptions
        .iter()
        .filter_map(|ex| {
            ex.attr("cref")
                .map(|cref| format!("- {}: {}\n", cref, normalize_inline(&ex.inner_text())))
        })
        .collect();
    if items.is_empty() {
        return String::new();
    }
    let mut section = String::from("\n### Exception");
    if exceptions.len() > 1 {
        section.push('s');
    }
    section.push('\n');
    for item in items {
        section.push_str(&item);
    }
    section
}

fn normalize_inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn body(raw: &str) -> String {
        transform(Some(raw)).unwrap()
    }

    #[test]
    fn test_empty_comment() {
        assert_eq!(transform(None).unwrap(), "");
        assert_eq!(transform(Some("   \n ")).unwrap(), "");
    }

    #[test]
    fn test_summary_and_remarks() {
        let raw = "/// <summary>\n/// Gets the schema.\n/// </summary>\n/// <remarks>Cached.</remarks>";
        assert_eq!(body(raw), "Gets the schema.\n\nCached.");
    }

    #[test]
    fn test_cross_references() {
        let raw = "<summary>See <see cref=\"Content\"/> and <seealso cref=\"Node\" />.</summary>";
        assert_eq!(body(raw), "See _Content_ and _Node_.");
    }

    #[test]
    fn test_langword_reference() {
        assert_eq!(body("<summary>Returns <see langword=\"null\"/>.</summary>"), "Returns `null`.");
    }

    #[test]
    fn test_inline_and_block_code() {
        let raw = "<summary>Use <c>List&lt;T&gt;</c>.</summary>\n<code lang=\"javascript\">\n\nawait fetch();\n\n</code>";
        assert_eq!(body(raw), "Use `List<T>`.\n\n``` javascript\nawait fetch();\n```");
    }

    #[test]
    fn test_entities_decoded_once() {
        assert_eq!(body("<summary>Use <c>a &amp;lt; b</c>.</summary>"), "Use `a &lt; b`.");
        assert_eq!(body("<code>if (a &lt; b &amp;&amp; c)</code>"), "```\nif (a < b && c)\n```");

        let doc = DocComment::parse(Some("<param name=\"x\">Less than <c>&amp;lt;</c> &amp; more.</param>")).unwrap();
        assert_eq!(doc.params["x"].documentation, "Less than `&lt;` & more.");
    }

    #[test]
    fn test_plain_text_strips_markup() {
        assert_eq!(plain_text("/// <summary>\n/// A &amp; B\n/// </summary>"), "A & B");
    }

    #[test]
    fn test_value_and_paramref() {
        let raw = "<summary>Sets <value>Depth</value> for <paramref name=\"path\"/>.</summary>";
        assert_eq!(body(raw), "Sets _Depth_ for _path_.");
    }

    #[test]
    fn test_param_detached() {
        let raw = "<summary>Copies.</summary>\n<param name=\"targetPath\" example=\"'/Root/Target'\">Target <c>path</c>.</param>\n<param name=\"ghost\">Unused.</param>";
        let doc = DocComment::parse(Some(raw)).unwrap();

        assert_eq!(doc.body, "Copies.");
        let target = &doc.params["targetPath"];
        assert_eq!(target.documentation, "Target `path`.");
        assert_eq!(target.example.as_deref(), Some("'/Root/Target'"));

        let mut params = vec![ParamDef::new("content", "Content"), ParamDef::new("targetPath", "string")];
        doc.attach(&mut params, &mut [], None);
        assert_eq!(params[1].documentation, "Target `path`.");
        assert_eq!(params[1].example.as_deref(), Some("'/Root/Target'"));
        assert!(params[0].documentation.is_empty());
        assert!(!doc.body.contains("Unused"));
    }

    #[test]
    fn test_type_params_and_returns() {
        let raw = "<summary>Loads.</summary><typeparam name=\"T\">Item type.</typeparam><returns>The <see cref=\"T\"/> list.</returns>";
        let doc = DocComment::parse(Some(raw)).unwrap();

        let mut type_params = vec![TypeParamDef::new("T")];
        let mut ret = ReturnDef::new("T[]");
        doc.attach(&mut [], &mut type_params, Some(&mut ret));

        assert_eq!(doc.body, "Loads.");
        assert_eq!(type_params[0].documentation, "Item type.");
        assert_eq!(ret.documentation, "The _T_ list.");
    }

    #[test]
    fn test_nodoc_removed() {
        let raw = "<summary>Public.<nodoc>Internal detail.</nodoc></summary>";
        assert_eq!(body(raw), "Public.");
    }

    #[test]
    fn test_para() {
        let raw = "<summary>First.<para>Second.</para>Third.</summary>";
        assert_eq!(body(raw), "First.\n\nSecond.\n\nThird.");
    }

    #[test]
    fn test_single_example() {
        let raw = "<example>Call it.</example><summary>Does it.</summary>";
        assert_eq!(body(raw), "Does it.\n\n### Example\n\nCall it.");
    }

    #[test]
    fn test_multiple_examples_after_body() {
        let raw = "<summary>Does it.</summary><example>One.</example><remarks>Note.</remarks><example>Two.</example>";
        let text = body(raw);

        assert_eq!(text.matches("### Example").count(), 1);
        let heading = text.find("### Examples").unwrap();
        assert!(text.find("Note.").unwrap() < heading);
        assert!(text.find("Does it.").unwrap() < heading);
        assert!(text.find("One.").unwrap() > heading);
        assert!(text.find("Two.").unwrap() > heading);
    }

    #[test]
    fn test_exceptions() {
        let raw = "<summary>Deletes.</summary>\n<exception cref=\"InvalidOperationException\">When\nlocked.</exception>\n<exception>No target.</exception>";
        assert_eq!(body(raw), "Deletes.\n\n### Exceptions\n- InvalidOperationException: When locked.");

        let raw = "<exception>No target.</exception>";
        assert_eq!(body(raw), "");

        let raw = "<exception cref=\"A\">a</exception><exception cref=\"B\">b</exception>";
        assert_eq!(body(raw), "### Exceptions\n- A: a\n- B: b");
    }

    #[test]
    fn test_unknown_elements_kept() {
        assert_eq!(body("<summary>x</summary><custom a=\"1\">y</custom>"), "x\n\n<custom a=\"1\">y</custom>");
    }

    #[test]
    fn test_malformed_markup() {
        let err = DocComment::parse(Some("<summary>broken")).unwrap_err();
        assert!(matches!(err, DocError::Markup(_)));

        let (doc, err) = DocComment::parse_lenient(Some("/// <summary>broken <b>text"));
        assert!(err.is_some());
        assert_eq!(doc.body, "broken text");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("\r\n a\r\n\r\n\r\nb  \rc\n\n"), "a\n\nb\nc");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt; b &amp;&amp; &#65;&#x42; &nbsp;"), "a < b && AB &nbsp;");
    }

    #[test]
    fn test_idempotent_transform() {
        let raw = "<summary>Same <c>code</c>.</summary><example>e</example>";
        assert_eq!(body(raw), body(raw));
    }
}
