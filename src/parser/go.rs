// Go parser using tree-sitter

use crate::error::{Error, Result};
use crate::parser::ast::{
    doc_comment, local_type_name, node_text, spec_names, value_specs, Declaration, FuncDecl,
    TypeDecl, ValueDecl,
};
use std::path::PathBuf;
use tree_sitter::{Node, Parser, Tree};

/// Parser for Go source files
pub struct GoParser {
    parser: Parser,
}

/// A Go file parsed once; the tree is kept for rendering
pub struct ParsedFile {
    pub path: PathBuf,
    pub source: String,
    pub tree: Tree,
    /// Name from the `package` clause
    pub package_name: String,
    /// Doc comment above the `package` clause
    pub package_doc: String,
}

impl GoParser {
    /// Create a new Go parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_go::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::Parser(format!("Failed to set Go language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Parse Go source code, rejecting files with syntax errors
    pub fn parse_source(&mut self, source: String, path: PathBuf) -> Result<ParsedFile> {
        let tree = self.parse_tree(&source)?;

        // Cursors borrow the tree and must go out of scope before it moves
        let (package_name, package_doc) = {
            let root = tree.root_node();
            if root.has_error() {
                let line = first_error_line(root).unwrap_or(1);
                return Err(Error::parse(path, format!("syntax error at line {}", line)));
            }

            let mut cursor = root.walk();
            let clause = root
                .named_children(&mut cursor)
                .find(|n| n.kind() == "package_clause")
                .ok_or_else(|| Error::parse(&path, "missing package clause"))?;

            // In tree-sitter-go, the package name is a child node, not a field
            let mut pkg_cursor = clause.walk();
            let name = clause
                .named_children(&mut pkg_cursor)
                .find(|n| n.kind() == "package_identifier")
                .map(|n| node_text(n, &source).to_string())
                .ok_or_else(|| Error::parse(&path, "missing package name"))?;
            (name, doc_comment(clause, &source))
        };

        Ok(ParsedFile {
            path,
            source,
            tree,
            package_name,
            package_doc,
        })
    }

    /// Parse source into a raw syntax tree
    pub fn parse_tree(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse Go source"))
    }
}

impl ParsedFile {
    /// Top-level declarations, in source order
    pub fn declarations(&self) -> Vec<Declaration<'_>> {
        let source = self.source.as_str();
        let root = self.tree.root_node();
        let mut decls = Vec::new();

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "function_declaration" | "method_declaration" => {
                    if let Some(func) = parse_function(child, source) {
                        decls.push(Declaration::Func(func));
                    }
                }
                "type_declaration" => {
                    decls.extend(parse_type_specs(child, source).into_iter().map(Declaration::Type));
                }
                "const_declaration" => {
                    decls.push(Declaration::Const(parse_values(child, source)));
                }
                "var_declaration" => {
                    decls.push(Declaration::Var(parse_values(child, source)));
                }
                _ => {}
            }
        }

        decls
    }
}

/// Parse a function or method declaration
fn parse_function<'t>(node: Node<'t>, source: &str) -> Option<FuncDecl<'t>> {
    let name = node_text(node.child_by_field_name("name")?, source).to_string();

    // Receiver base type, pointer and type arguments stripped
    let receiver = node.child_by_field_name("receiver").and_then(|r| {
        let mut cursor = r.walk();
        let param = r
            .named_children(&mut cursor)
            .find(|c| c.kind() == "parameter_declaration")?;
        local_type_name(param.child_by_field_name("type")?, source).map(str::to_string)
    });

    let type_params = type_parameter_names(node, source);
    let result_types = node
        .child_by_field_name("result")
        .map(|r| result_type_names(r, source))
        .unwrap_or_default()
        .into_iter()
        .filter(|n| !type_params.contains(n))
        .collect();

    Some(FuncDecl {
        node,
        name,
        doc: doc_comment(node, source),
        receiver,
        result_types,
    })
}

/// Names of a function's own type parameters
fn type_parameter_names(node: Node, source: &str) -> Vec<String> {
    let Some(list) = node.child_by_field_name("type_parameters") else {
        return Vec::new();
    };
    let mut names = Vec::new();
    let mut cursor = list.walk();
    for decl in list.named_children(&mut cursor) {
        let mut name_cursor = decl.walk();
        names.extend(
            decl.children_by_field_name("name", &mut name_cursor)
                .map(|n| node_text(n, source).to_string()),
        );
    }
    names
}

/// Base type name per result field. Slices and arrays of `T` count as `T`.
fn result_type_names(result: Node, source: &str) -> Vec<String> {
    let types: Vec<Node> = if result.kind() == "parameter_list" {
        let mut cursor = result.walk();
        let fields = result
            .named_children(&mut cursor)
            .filter_map(|p| p.child_by_field_name("type"))
            .collect();
        fields
    } else {
        vec![result]
    };

    types
        .into_iter()
        .filter_map(|ty| {
            let ty = match ty.kind() {
                "slice_type" | "array_type" | "implicit_length_array_type" => {
                    ty.child_by_field_name("element")?
                }
                _ => ty,
            };
            local_type_name(ty, source).map(str::to_string)
        })
        .collect()
}

/// Parse every spec of a type declaration (one for `type T ...`, several
/// for a parenthesized group)
fn parse_type_specs<'t>(decl: Node<'t>, source: &str) -> Vec<TypeDecl<'t>> {
    let mut specs = Vec::new();
    let mut cursor = decl.walk();
    let children: Vec<Node<'t>> = decl.named_children(&mut cursor).collect();
    let single = children
        .iter()
        .filter(|c| c.kind() == "type_spec" || c.kind() == "type_alias")
        .count()
        == 1;

    for spec in children {
        if spec.kind() != "type_spec" && spec.kind() != "type_alias" {
            continue;
        }
        let Some(name) = spec.child_by_field_name("name") else {
            continue;
        };

        let mut doc = doc_comment(spec, source);
        if doc.is_empty() && single {
            doc = doc_comment(decl, source);
        }

        specs.push(TypeDecl {
            decl,
            spec,
            name: node_text(name, source).to_string(),
            doc,
        });
    }

    specs
}

/// Parse a const or var declaration
fn parse_values<'t>(node: Node<'t>, source: &str) -> ValueDecl<'t> {
    let names = value_specs(node)
        .into_iter()
        .flat_map(|spec| spec_names(spec, source))
        .collect();

    ValueDecl {
        node,
        names,
        doc: doc_comment(node, source),
    }
}

/// Line (1-based) of the first error or missing node
fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error())
        .find_map(first_error_line)
}
