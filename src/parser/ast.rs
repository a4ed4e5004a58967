// Declarations extracted from a parsed Go file
//
// These borrow nodes from the file's syntax tree, so they live only as long
// as the `ParsedFile` they came from. Rendering works directly on those nodes.

use tree_sitter::Node;

/// A top-level declaration worth documenting
#[derive(Debug, Clone)]
pub enum Declaration<'t> {
    Func(FuncDecl<'t>),
    Type(TypeDecl<'t>),
    Const(ValueDecl<'t>),
    Var(ValueDecl<'t>),
}

/// A function or method declaration
#[derive(Debug, Clone)]
pub struct FuncDecl<'t> {
    pub node: Node<'t>,
    pub name: String,
    pub doc: String,
    /// Base type name of the receiver, for methods
    pub receiver: Option<String>,
    /// Base type name of each result field that names a type directly,
    /// through a pointer, or as a slice/array element
    pub result_types: Vec<String>,
}

/// One type spec, together with the declaration that holds it
#[derive(Debug, Clone)]
pub struct TypeDecl<'t> {
    pub decl: Node<'t>,
    pub spec: Node<'t>,
    pub name: String,
    pub doc: String,
}

/// A `const` or `var` declaration (a whole group when parenthesized)
#[derive(Debug, Clone)]
pub struct ValueDecl<'t> {
    pub node: Node<'t>,
    pub names: Vec<String>,
    pub doc: String,
}

impl ValueDecl<'_> {
    /// Whether any declared name is exported
    pub fn has_exported(&self) -> bool {
        self.names.iter().any(|n| is_exported(n))
    }
}

/// Whether a Go identifier is exported (starts with an upper-case letter)
pub fn is_exported(name: &str) -> bool {
    name.chars().next().map_or(false, char::is_uppercase)
}

/// Source text of a node
pub fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Strip pointers, parentheses and generic instantiation from a type node
pub fn strip_type(node: Node) -> Node {
    match node.kind() {
        "pointer_type" | "parenthesized_type" => node.named_child(0).map_or(node, strip_type),
        "generic_type" => node.child_by_field_name("type").map_or(node, strip_type),
        _ => node,
    }
}

/// Name of the type a type expression is based on, if it names one.
/// For a qualified type this is the selected name.
pub fn base_type_name<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    let node = strip_type(node);
    match node.kind() {
        "type_identifier" => Some(node_text(node, source)),
        "qualified_type" => node.child_by_field_name("name").map(|n| node_text(n, source)),
        _ => None,
    }
}

/// Name of a package-local type a type expression is based on
pub fn local_type_name<'s>(node: Node, source: &'s str) -> Option<&'s str> {
    let node = strip_type(node);
    if node.kind() == "type_identifier" {
        Some(node_text(node, source))
    } else {
        None
    }
}

/// The const or var specs of a declaration, in source order
pub fn value_specs(decl: Node) -> Vec<Node> {
    let mut specs = Vec::new();
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "const_spec" | "var_spec" => specs.push(child),
            "var_spec_list" => specs.extend(value_specs(child)),
            _ => {}
        }
    }
    specs
}

/// Whether any name declared by a const or var spec is exported
pub fn spec_is_exported(spec: Node, source: &str) -> bool {
    spec_names(spec, source).iter().any(|n| is_exported(n))
}

/// Names declared by a const or var spec
pub fn spec_names(spec: Node, source: &str) -> Vec<String> {
    let mut cursor = spec.walk();
    let names = spec
        .children_by_field_name("name", &mut cursor)
        .map(|n| node_text(n, source).to_string())
        .collect();
    names
}

/// Doc comment attached to `node`: the comments directly above it, with no
/// blank line in between. A comment trailing other code on its line is
/// never part of a doc comment.
pub fn doc_comment(node: Node, source: &str) -> String {
    let mut group = Vec::new();
    let mut next = node;

    while let Some(prev) = next.prev_sibling() {
        if prev.kind() != "comment" || prev.end_position().row + 1 < next.start_position().row {
            break;
        }
        if let Some(before) = prev.prev_sibling() {
            if ends_code_on_row(before, prev.start_position().row) {
                break;
            }
        }
        group.push(node_text(prev, source));
        next = prev;
    }

    group.reverse();
    comment_text(group)
}

/// Whether `node` is code that ends on `row`, before a comment there.
/// Statement terminators reach up to column 0 of the following line and
/// do not count.
fn ends_code_on_row(node: Node, row: usize) -> bool {
    let end = node.end_position();
    node.kind() != "comment" && node.kind() != "\n" && end.row == row && end.column > 0
}

/// Text of a comment group with comment markers removed.
///
/// Directive lines are dropped, trailing whitespace trimmed, leading and
/// trailing blank lines removed and runs of blank lines collapsed.
pub fn comment_text<'s>(comments: impl IntoIterator<Item = &'s str>) -> String {
    let mut lines: Vec<String> = Vec::new();
    for comment in comments {
        if let Some(body) = comment.strip_prefix("//") {
            if is_directive(body) {
                continue;
            }
            lines.push(body.strip_prefix(' ').unwrap_or(body).trim_end().to_string());
        } else if let Some(body) = comment.strip_prefix("/*") {
            let body = body.strip_suffix("*/").unwrap_or(body);
            lines.extend(body.lines().map(|l| l.trim_end().to_string()));
        }
    }

    let mut out: Vec<&str> = Vec::new();
    for line in &lines {
        if line.is_empty() {
            if out.last().map_or(true, |l| l.is_empty()) {
                continue;
            }
        }
        out.push(line);
    }
    while out.last().map_or(false, |l| l.is_empty()) {
        out.pop();
    }

    out.join("\n")
}

/// `//go:generate`, `//nolint:x`, `//line`, `//export` and friends
fn is_directive(body: &str) -> bool {
    if ["line ", "extern ", "export "].iter().any(|p| body.starts_with(p)) {
        return true;
    }
    let Some(colon) = body.find(':') else {
        return false;
    };
    let (head, tail) = (&body[..colon], &body[colon + 1..]);
    !head.is_empty()
        && head.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && tail
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_exported() {
        assert!(is_exported("Config"));
        assert!(is_exported("Ünicode"));
        assert!(!is_exported("config"));
        assert!(!is_exported("_Config"));
        assert!(!is_exported(""));
    }

    #[test]
    fn test_line_comment_text() {
        let text = comment_text(["// Run starts processing.", "//", "// It blocks."]);
        assert_eq!(text, "Run starts processing.\n\nIt blocks.");
    }

    #[test]
    fn test_block_comment_text() {
        let text = comment_text(["/*\nPackage demo does things.\n\n\nReally.\n*/"]);
        assert_eq!(text, "Package demo does things.\n\nReally.");
    }

    #[test]
    fn test_directives_are_dropped() {
        let text = comment_text([
            "// Gen is generated.",
            "//go:generate stringer -type=Gen",
            "//nolint:all",
        ]);
        assert_eq!(text, "Gen is generated.");
    }

    #[test]
    fn test_prose_with_colon_is_kept() {
        let text = comment_text(["// Note: this is prose."]);
        assert_eq!(text, "Note: this is prose.");
    }

    #[test]
    fn test_indentation_inside_comment_is_kept() {
        let text = comment_text(["// Example:", "//", "//\tx := New()"]);
        assert_eq!(text, "Example:\n\n\tx := New()");
    }
}
