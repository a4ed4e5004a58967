//! Documentation model
//!
//! A `PackageDoc` is built from source alone by [`build_package`]. Where the
//! site is published (repository, version, paths) is attached afterwards
//! with [`PackageDoc::with_meta`].

mod builder;

pub use builder::{build_package, PackageBuilder};

use serde::Serialize;

/// Documentation for one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageDoc {
    pub name: String,
    pub doc: String,
    pub functions: Vec<FuncDoc>,
    pub types: Vec<TypeDoc>,
    pub constants: Vec<VarDoc>,
    pub variables: Vec<VarDoc>,
    /// Only set on the root page
    pub sub_packages: Vec<PackageInfo>,
    pub meta: SiteMeta,
}

/// A function or method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuncDoc {
    pub name: String,
    pub doc: String,
    /// Highlighted signature (HTML)
    pub signature: String,
}

/// A type with its constructors and methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDoc {
    pub name: String,
    pub doc: String,
    /// Highlighted definition (HTML)
    pub definition: String,
    pub functions: Vec<FuncDoc>,
    pub methods: Vec<FuncDoc>,
}

/// A const or var declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarDoc {
    pub doc: String,
    /// Highlighted declaration (HTML)
    pub definition: String,
}

/// Navigation entry for a sub-package on the root page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub path: String,
}

/// Publishing context shared by every page of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteMeta {
    pub repository_url: String,
    pub version: String,
    pub import_path: String,
    pub stylesheet_path: String,
}

impl PackageDoc {
    /// A page with nothing but a name, used for a root without sources
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// True when there is no doc and no exported declarations
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
            && self.functions.is_empty()
            && self.types.is_empty()
            && self.constants.is_empty()
            && self.variables.is_empty()
    }

    /// Attach publishing metadata
    pub fn with_meta(mut self, meta: SiteMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Attach the sub-package navigation list
    pub fn with_sub_packages(mut self, sub_packages: Vec<PackageInfo>) -> Self {
        self.sub_packages = sub_packages;
        self
    }
}
