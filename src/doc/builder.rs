// Package doc builder
//
// Parses every Go file of one directory once, keeps exported declarations,
// groups constructors and methods under their types, and renders each
// declaration from the parse it came from.

use super::{FuncDoc, PackageDoc, TypeDoc, VarDoc};
use crate::discover::{is_build_ignored, is_source_file_name};
use crate::error::{Error, Result};
use crate::highlight::{DeclFormatter, TypeNames};
use crate::parser::{is_exported, Declaration, FuncDecl, GoParser, ParsedFile, TypeDecl, ValueDecl};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A type and the indices of the functions grouped under it
struct TypeGroup {
    index: usize,
    constructors: Vec<usize>,
    methods: Vec<usize>,
}

/// Builds `PackageDoc`s, reusing one parser across packages
pub struct PackageBuilder {
    parser: GoParser,
}

impl PackageBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: GoParser::new()?,
        })
    }

    /// Build the documentation of the package in `dir` (direct children only)
    pub fn build(&mut self, dir: &Path) -> Result<PackageDoc> {
        let files = self.parse_dir(dir)?;
        let name = package_name(dir, &files)?;
        let doc = files
            .iter()
            .map(|f| f.package_doc.as_str())
            .find(|d| !d.is_empty())
            .unwrap_or_default()
            .to_string();

        let items: Vec<(&ParsedFile, Declaration<'_>)> = files
            .iter()
            .flat_map(|file| file.declarations().into_iter().map(move |d| (file, d)))
            .collect();

        let mut groups: Vec<TypeGroup> = Vec::new();
        let mut type_index: HashMap<&str, usize> = HashMap::new();
        for (i, (_, decl)) in items.iter().enumerate() {
            if let Declaration::Type(t) = decl {
                if is_exported(&t.name) && !type_index.contains_key(t.name.as_str()) {
                    type_index.insert(t.name.as_str(), groups.len());
                    groups.push(TypeGroup {
                        index: i,
                        constructors: Vec::new(),
                        methods: Vec::new(),
                    });
                }
            }
        }
        let type_names: TypeNames = type_index.keys().map(|n| n.to_string()).collect();

        let mut functions = Vec::new();
        let mut constants = Vec::new();
        let mut variables = Vec::new();
        for (i, (_, decl)) in items.iter().enumerate() {
            match decl {
                Declaration::Func(f) if is_exported(&f.name) => match &f.receiver {
                    Some(recv) => {
                        if let Some(&g) = type_index.get(recv.as_str()) {
                            groups[g].methods.push(i);
                        }
                    }
                    None => match constructed_type(f, &type_index) {
                        Some(g) => groups[g].constructors.push(i),
                        None => functions.push(i),
                    },
                },
                Declaration::Const(v) if v.has_exported() => constants.push(i),
                Declaration::Var(v) if v.has_exported() => variables.push(i),
                _ => {}
            }
        }

        let name_of = |i: &usize| decl_name(&items[*i].1);
        functions.sort_by_key(name_of);
        groups.sort_by_key(|g| decl_name(&items[g.index].1));
        for group in &mut groups {
            group.constructors.sort_by_key(name_of);
            group.methods.sort_by_key(name_of);
        }

        let render_func = |i: &usize| match &items[*i] {
            (file, Declaration::Func(f)) => func_doc(file, f, &type_names),
            (file, _) => Err(Error::format(format!(
                "expected a function declaration in {}",
                file.path.display()
            ))),
        };

        let mut package = PackageDoc {
            name,
            doc,
            ..Default::default()
        };

        for i in &functions {
            package.functions.push(render_func(i)?);
        }

        for group in &groups {
            let (file, decl) = match &items[group.index] {
                (file, Declaration::Type(t)) => (*file, t),
                (file, _) => {
                    return Err(Error::format(format!(
                        "expected a type declaration in {}",
                        file.path.display()
                    )))
                }
            };
            let mut type_doc = type_doc(file, decl, &type_names)?;
            for i in &group.constructors {
                type_doc.functions.push(render_func(i)?);
            }
            for i in &group.methods {
                type_doc.methods.push(render_func(i)?);
            }
            package.types.push(type_doc);
        }

        for (indices, out) in [
            (&constants, &mut package.constants),
            (&variables, &mut package.variables),
        ] {
            for i in indices {
                if let (file, Declaration::Const(v) | Declaration::Var(v)) = &items[*i] {
                    out.push(var_doc(file, v, &type_names)?);
                }
            }
        }

        debug!(
            "Built package {} from {}: {} functions, {} types",
            package.name,
            dir.display(),
            package.functions.len(),
            package.types.len()
        );

        Ok(package)
    }

    /// Parse the qualifying Go files of `dir`, in file name order
    fn parse_dir(&mut self, dir: &Path) -> Result<Vec<ParsedFile>> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if is_source_file_name(&entry.file_name().to_string_lossy()) {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut files = Vec::new();
        for path in paths {
            let source = fs::read_to_string(&path)?;
            if is_build_ignored(&source) {
                debug!("Ignoring build-constrained file: {}", path.display());
                continue;
            }
            debug!("Parsing {}", path.display());
            files.push(self.parser.parse_source(source, path)?);
        }

        if files.is_empty() {
            return Err(Error::NoSourceFiles(dir.to_path_buf()));
        }
        Ok(files)
    }
}

/// Build the documentation of the package in `dir`
pub fn build_package(dir: &Path) -> Result<PackageDoc> {
    PackageBuilder::new()?.build(dir)
}

/// The package name all files agree on
fn package_name(dir: &Path, files: &[ParsedFile]) -> Result<String> {
    let first = &files[0].package_name;
    if let Some(other) = files.iter().find(|f| &f.package_name != first) {
        return Err(Error::PackageMismatch {
            dir: dir.to_path_buf(),
            first: first.clone(),
            second: other.package_name.clone(),
        });
    }
    Ok(first.clone())
}

/// The type a receiver-less function constructs: exactly one result field
/// must name an exported type of this package.
fn constructed_type(func: &FuncDecl, type_index: &HashMap<&str, usize>) -> Option<usize> {
    let mut found = func
        .result_types
        .iter()
        .filter_map(|name| type_index.get(name.as_str()).copied());
    let group = found.next()?;
    match found.next() {
        Some(_) => None,
        None => Some(group),
    }
}

fn decl_name<'a>(decl: &'a Declaration<'_>) -> &'a str {
    match decl {
        Declaration::Func(f) => &f.name,
        Declaration::Type(t) => &t.name,
        Declaration::Const(_) | Declaration::Var(_) => "",
    }
}

fn func_doc(file: &ParsedFile, func: &FuncDecl, names: &TypeNames) -> Result<FuncDoc> {
    let snippet = DeclFormatter::new(&file.source, names).function(func.node)?;
    Ok(FuncDoc {
        name: func.name.clone(),
        doc: func.doc.clone(),
        signature: snippet.to_html(),
    })
}

fn type_doc(file: &ParsedFile, decl: &TypeDecl, names: &TypeNames) -> Result<TypeDoc> {
    let snippet = DeclFormatter::new(&file.source, names).type_spec(decl.decl, decl.spec)?;
    Ok(TypeDoc {
        name: decl.name.clone(),
        doc: decl.doc.clone(),
        definition: snippet.to_html(),
        functions: Vec::new(),
        methods: Vec::new(),
    })
}

fn var_doc(file: &ParsedFile, decl: &ValueDecl, names: &TypeNames) -> Result<VarDoc> {
    let snippet = DeclFormatter::new(&file.source, names).value_decl(decl.node)?;
    Ok(VarDoc {
        doc: decl.doc.clone(),
        definition: snippet.to_html(),
    })
}
