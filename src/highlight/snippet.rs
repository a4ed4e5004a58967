//! Declaration rendering
//!
//! A declaration is rendered from the parse of the file it lives in: its
//! text is assembled from sub-slices of the file source, and every
//! identifier that refers to a type of the current package is recorded as a
//! file offset, then mapped into snippet coordinates while the text is copied.
//! Nothing is re-parsed.

use super::highlight;
use crate::error::{Error, Result};
use crate::parser::{base_type_name, is_exported, node_text, spec_is_exported, value_specs};
use std::collections::{BTreeSet, HashSet};
use std::ops::Range;
use tree_sitter::Node;

/// Names of the types declared in one package
pub type TypeNames = HashSet<String>;

/// Rendered declaration text plus the positions of its type references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    text: String,
    type_refs: BTreeSet<usize>,
}

impl Snippet {
    /// Plain declaration text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Offsets into `text` where a local type reference starts
    pub fn type_refs(&self) -> &BTreeSet<usize> {
        &self.type_refs
    }

    /// Highlighted, HTML-safe rendering
    pub fn to_html(&self) -> String {
        highlight(&self.text, &self.type_refs)
    }
}

/// A replaced (or removed) byte range of the source
#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    replacement: String,
}

/// Renders declarations of one source file
pub struct DeclFormatter<'a> {
    source: &'a str,
    type_names: &'a TypeNames,
}

impl<'a> DeclFormatter<'a> {
    pub fn new(source: &'a str, type_names: &'a TypeNames) -> Self {
        Self { source, type_names }
    }

    /// Signature of a function or method declaration, without its body
    pub fn function(&self, decl: Node) -> Result<Snippet> {
        let end = match decl.child_by_field_name("body") {
            Some(body) => body.start_byte(),
            None => decl.end_byte(),
        };
        let end = self.trim_end(decl.start_byte(), end);

        let mut refs = BTreeSet::new();
        for field in ["receiver", "type_parameters", "parameters", "result"] {
            if let Some(child) = decl.child_by_field_name(field) {
                collect_type_refs(child, self.source, self.type_names, &mut refs);
            }
        }

        self.render(decl.start_byte()..end, "", "", Vec::new(), &refs)
    }

    /// A single type spec. Specs taken out of a `type ( ... )` group are
    /// shown as standalone `type` declarations.
    pub fn type_spec(&self, decl: Node, spec: Node) -> Result<Snippet> {
        let mut refs = BTreeSet::new();
        for field in ["type_parameters", "type"] {
            if let Some(child) = spec.child_by_field_name(field) {
                collect_type_refs(child, self.source, self.type_names, &mut refs);
            }
        }

        let grouped = is_grouped(decl);
        let (range, prefix, indent) = if grouped {
            (spec.byte_range(), "type ", self.indentation(spec.start_byte()))
        } else {
            (decl.byte_range(), "", "")
        };

        let mut edits = Vec::new();
        if let Some(body) = spec.child_by_field_name("type") {
            self.filter_members(body, indent, &mut edits);
        }

        self.render(range, prefix, indent, edits, &refs)
    }

    /// A whole `const` or `var` declaration, dropping unexported specs of a group
    pub fn value_decl(&self, decl: Node) -> Result<Snippet> {
        let specs = value_specs(decl);

        let mut refs = BTreeSet::new();
        for spec in &specs {
            if let Some(ty) = spec.child_by_field_name("type") {
                collect_type_refs(ty, self.source, self.type_names, &mut refs);
            }
        }

        let mut edits = Vec::new();
        if is_grouped(decl) {
            for spec in specs.iter().filter(|s| !spec_is_exported(**s, self.source)) {
                if let Some(range) = self.member_lines(*spec) {
                    edits.push(Edit {
                        range,
                        replacement: String::new(),
                    });
                }
            }
        }

        self.render(decl.byte_range(), "", "", edits, &refs)
    }

    /// Find unexported struct fields and interface methods under `node` and
    /// schedule them for removal.
    fn filter_members(&self, node: Node, base_indent: &str, edits: &mut Vec<Edit>) {
        let (member_kinds, what): (&[&str], &str) = match node.kind() {
            "field_declaration_list" => (&["field_declaration"], "fields"),
            "interface_type" | "method_spec_list" => (&["method_elem", "method_spec"], "methods"),
            _ => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.filter_members(child, base_indent, edits);
                }
                return;
            }
        };

        let multiline = node.start_position().row != node.end_position().row;
        let mut first_removed: Option<Node> = None;

        let mut cursor = node.walk();
        for member in node.named_children(&mut cursor) {
            if member.kind() == "method_spec_list" {
                self.filter_members(member, base_indent, edits);
                continue;
            }
            if !member_kinds.contains(&member.kind()) {
                continue;
            }

            if !member_is_exported(member, self.source) {
                let range = if multiline {
                    self.member_lines(member)
                } else {
                    Some(self.inline_member(member))
                };
                if let Some(range) = range {
                    edits.push(Edit {
                        range,
                        replacement: String::new(),
                    });
                    first_removed.get_or_insert(member);
                    continue;
                }
            }

            self.filter_members(member, base_indent, edits);
        }

        let Some(member) = first_removed else {
            return;
        };
        if multiline {
            if let Some(at) = self.closing_line_start(node) {
                let indent = self.indentation(member.start_byte());
                let indent = indent.strip_prefix(base_indent).unwrap_or(indent);
                edits.push(Edit {
                    range: at..at,
                    replacement: format!("{}// contains filtered or unexported {}\n", indent, what),
                });
            }
        } else if let Some(close) = closing_brace(node) {
            let at = close.start_byte();
            edits.push(Edit {
                range: at..at,
                replacement: format!("/* contains filtered or unexported {} */ ", what),
            });
        }
    }

    /// A member of a one-line body together with its `;` terminator and the
    /// blanks that follow it.
    fn inline_member(&self, member: Node) -> Range<usize> {
        let mut end = member.end_byte();
        if let Some(next) = member.next_sibling() {
            if next.kind() == ";" {
                end = next.end_byte();
            }
        }
        let rest = &self.source[end..];
        end += rest.len() - rest.trim_start_matches([' ', '\t']).len();
        member.start_byte()..end
    }

    /// The full lines a member occupies, including doc comments directly
    /// above it. `None` when the member shares a line with other code.
    fn member_lines(&self, member: Node) -> Option<Range<usize>> {
        if !self.is_first_on_line(member.start_byte()) {
            return None;
        }
        let end = line_end(self.source, member.end_byte());
        let rest = self.source[member.end_byte()..end].trim();
        if !(rest.is_empty() || rest.starts_with("//")) {
            return None;
        }

        let mut first = member;
        while let Some(prev) = first.prev_named_sibling() {
            let adjacent = prev.end_position().row + 1 >= first.start_position().row;
            if prev.kind() != "comment" || !adjacent || !self.is_first_on_line(prev.start_byte()) {
                break;
            }
            first = prev;
        }

        Some(line_start(self.source, first.start_byte())..end)
    }

    /// Start of the line holding the closing brace of `node`, if that brace
    /// is alone on its line.
    fn closing_line_start(&self, node: Node) -> Option<usize> {
        let last = closing_brace(node)?;
        if !self.is_first_on_line(last.start_byte()) {
            return None;
        }
        Some(line_start(self.source, last.start_byte()))
    }

    fn render(
        &self,
        range: Range<usize>,
        prefix: &str,
        indent: &str,
        mut edits: Vec<Edit>,
        refs: &BTreeSet<usize>,
    ) -> Result<Snippet> {
        if range.start > range.end || range.end > self.source.len() {
            return Err(Error::format(format!(
                "declaration range {}..{} lies outside the source ({} bytes)",
                range.start,
                range.end,
                self.source.len()
            )));
        }

        edits.sort_by_key(|e| (e.range.start, e.range.end));

        let mut builder = SnippetBuilder::new(self.source, refs, indent);
        builder.push_text(prefix);

        let mut cursor = range.start;
        for edit in edits {
            if edit.range.start < cursor || edit.range.end > range.end {
                continue;
            }
            builder.copy(cursor..edit.range.start)?;
            builder.push_text(&edit.replacement);
            cursor = edit.range.end;
        }
        builder.copy(cursor..range.end)?;

        Ok(builder.finish())
    }

    fn trim_end(&self, start: usize, mut end: usize) -> usize {
        while end > start && self.source.as_bytes()[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        end
    }

    fn indentation(&self, pos: usize) -> &'a str {
        let start = line_start(self.source, pos);
        let lead = &self.source[start..pos];
        if lead.trim().is_empty() {
            lead
        } else {
            ""
        }
    }

    fn is_first_on_line(&self, pos: usize) -> bool {
        self.source[line_start(self.source, pos)..pos].trim().is_empty()
    }
}

/// Copies source ranges into the snippet, de-indenting continuation lines
/// and translating type reference offsets.
struct SnippetBuilder<'a> {
    source: &'a str,
    refs: &'a BTreeSet<usize>,
    indent: &'a str,
    text: String,
    mapped: BTreeSet<usize>,
    at_line_start: bool,
}

impl<'a> SnippetBuilder<'a> {
    fn new(source: &'a str, refs: &'a BTreeSet<usize>, indent: &'a str) -> Self {
        Self {
            source,
            refs,
            indent,
            text: String::new(),
            mapped: BTreeSet::new(),
            at_line_start: false,
        }
    }

    fn push_text(&mut self, s: &str) {
        if !s.is_empty() {
            self.text.push_str(s);
            self.at_line_start = s.ends_with('\n');
        }
    }

    fn copy(&mut self, range: Range<usize>) -> Result<()> {
        let mut from = range.start;
        while from < range.end {
            let rest = self.source.get(from..range.end).ok_or_else(|| {
                Error::format(format!("byte range {}..{} is not on a character boundary", from, range.end))
            })?;

            if self.at_line_start && !self.indent.is_empty() && rest.starts_with(self.indent) {
                from += self.indent.len();
                self.at_line_start = false;
                continue;
            }

            let line_end = rest.find('\n').map_or(range.end, |i| from + i + 1);
            let out_start = self.text.len();
            self.text.push_str(&self.source[from..line_end]);
            for &offset in self.refs.range(from..line_end) {
                self.mapped.insert(out_start + offset - from);
            }
            self.at_line_start = self.source[from..line_end].ends_with('\n');
            from = line_end;
        }
        Ok(())
    }

    fn finish(self) -> Snippet {
        Snippet {
            text: self.text,
            type_refs: self.mapped,
        }
    }
}

/// Record the start offset of every identifier under `node` that names a
/// type in `names`.
///
/// `node` is a type position: a type expression, parameter or result list,
/// receiver, or type parameter list. The walk descends through pointer,
/// slice, array, map, channel, function, struct, interface, parenthesized
/// and generic type shapes. Only the package qualifier of a qualified type
/// is checked; its selected name belongs to another package.
pub fn collect_type_refs(node: Node, source: &str, names: &TypeNames, out: &mut BTreeSet<usize>) {
    match node.kind() {
        "type_identifier" => {
            if names.contains(node_text(node, source)) {
                out.insert(node.start_byte());
            }
        }
        "qualified_type" => {
            if let Some(pkg) = node.child_by_field_name("package") {
                if names.contains(node_text(pkg, source)) {
                    out.insert(pkg.start_byte());
                }
            }
        }
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_type_refs(child, source, names, out);
            }
        }
    }
}

/// Whether a declaration wraps its specs in parentheses
fn is_grouped(decl: Node) -> bool {
    let mut cursor = decl.walk();
    let grouped = decl.children(&mut cursor).any(|c| c.kind() == "(");
    grouped
        || decl
            .named_child(0)
            .map_or(false, |c| c.kind() == "var_spec_list")
}

/// The `}` closing a struct or interface body
fn closing_brace<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let last = node.child(node.child_count().checked_sub(1)?)?;
    (last.kind() == "}").then_some(last)
}

fn member_is_exported(member: Node, source: &str) -> bool {
    let mut cursor = member.walk();
    let names: Vec<Node> = member.children_by_field_name("name", &mut cursor).collect();
    if !names.is_empty() {
        return names.iter().any(|n| is_exported(node_text(*n, source)));
    }

    // Embedded field or interface element
    match member.child_by_field_name("type") {
        Some(ty) => base_type_name(ty, source).map_or(false, is_exported),
        None => true,
    }
}

fn line_start(source: &str, pos: usize) -> usize {
    source[..pos].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(source: &str, pos: usize) -> usize {
    source[pos..].find('\n').map_or(source.len(), |i| pos + i + 1)
}
