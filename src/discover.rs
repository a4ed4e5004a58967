//! Package discovery
//!
//! Walks a source tree once and reports every directory that holds at least
//! one buildable, non-test Go file.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Extension of Go source files
pub const SOURCE_EXTENSION: &str = ".go";

/// Suffix of files that only build under `go test`
pub const TEST_SUFFIX: &str = "_test.go";

/// Directory the Go tool treats as vendored dependencies
const VENDOR_DIR: &str = "vendor";

/// Directory the Go tool ignores for package purposes
const TESTDATA_DIR: &str = "testdata";

/// A package directory, relative to the source tree root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageDir {
    /// The source tree root itself
    Root,
    /// A subdirectory, as a forward-slash relative path
    Sub(String),
}

impl PackageDir {
    /// Build from a path relative to the tree root
    pub fn from_relative(rel: &Path) -> Self {
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if parts.is_empty() {
            PackageDir::Root
        } else {
            PackageDir::Sub(parts.join("/"))
        }
    }

    /// Whether this is the sentinel root path
    pub fn is_root(&self) -> bool {
        matches!(self, PackageDir::Root)
    }

    /// The relative path as a forward-slash string (`.` for the root)
    pub fn as_str(&self) -> &str {
        match self {
            PackageDir::Root => ".",
            PackageDir::Sub(p) => p,
        }
    }

    /// Resolve against a base directory
    pub fn join_to(&self, base: &Path) -> PathBuf {
        match self {
            PackageDir::Root => base.to_path_buf(),
            PackageDir::Sub(p) => p.split('/').fold(base.to_path_buf(), |acc, seg| acc.join(seg)),
        }
    }
}

impl fmt::Display for PackageDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds package directories under a source root
#[derive(Debug, Default)]
pub struct PackageDiscoverer {
    exclude: Vec<glob::Pattern>,
}

impl PackageDiscoverer {
    /// Create a discoverer with extra directory globs to prune
    pub fn new(exclude: &[String]) -> Result<Self> {
        let exclude = exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { exclude })
    }

    /// Walk `root` and return every package directory in sorted order.
    ///
    /// Any traversal error aborts the walk; no partial set is returned.
    pub fn discover(&self, root: &Path) -> Result<BTreeSet<PackageDir>> {
        if root.exists() && !root.is_dir() {
            return Err(Error::discovery(format!(
                "source root is not a directory: {}",
                root.display()
            )));
        }

        let mut packages = BTreeSet::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_pruned(e, root));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !is_source_file_name(&name) {
                continue;
            }

            let bytes = std::fs::read(entry.path())?;
            if is_build_ignored(&String::from_utf8_lossy(&bytes)) {
                debug!("Ignoring build-constrained file: {}", entry.path().display());
                continue;
            }

            let dir = entry.path().parent().unwrap_or(root);
            let rel = dir.strip_prefix(root).unwrap_or_else(|_| Path::new(""));
            packages.insert(PackageDir::from_relative(rel));
        }

        Ok(packages)
    }

    fn is_pruned(&self, entry: &DirEntry, root: &Path) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if is_ignored_dir_name(&name) {
            debug!("Pruning directory: {}", entry.path().display());
            return true;
        }

        if self.exclude.is_empty() {
            return false;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or_else(|_| entry.path());
        let rel = PackageDir::from_relative(rel);
        let pruned = self.exclude.iter().any(|p| p.matches(rel.as_str()));
        if pruned {
            debug!("Excluding directory: {}", rel);
        }
        pruned
    }
}

/// Walk `root` with no extra exclusions
pub fn discover(root: &Path) -> Result<BTreeSet<PackageDir>> {
    PackageDiscoverer::default().discover(root)
}

/// Directory names whose whole subtree never contributes packages
pub fn is_ignored_dir_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_') || name == VENDOR_DIR || name == TESTDATA_DIR
}

/// Whether a file name denotes a buildable, non-test Go file
pub fn is_source_file_name(name: &str) -> bool {
    name.ends_with(SOURCE_EXTENSION)
        && !name.ends_with(TEST_SUFFIX)
        && !name.starts_with('.')
        && !name.starts_with('_')
}

/// Whether the file header carries an `ignore` build constraint.
///
/// Only comment lines above the package clause are considered.
pub fn is_build_ignored(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim();
        if line.starts_with("package ") || line == "package" {
            break;
        }
        if let Some(expr) = line.strip_prefix("//go:build") {
            if expr.split(|c: char| !(c.is_alphanumeric() || c == '_')).any(|w| w == "ignore")
                && !expr.contains('!')
            {
                return true;
            }
        }
        if let Some(expr) = line.strip_prefix("// +build") {
            if expr.split_whitespace().any(|w| w == "ignore") {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_source_file_names() {
        assert!(is_source_file_name("main.go"));
        assert!(!is_source_file_name("main_test.go"));
        assert!(!is_source_file_name("main.go.txt"));
        assert!(!is_source_file_name(".hidden.go"));
        assert!(!is_source_file_name("_scratch.go"));
        assert!(!is_source_file_name("README.md"));
    }

    #[test]
    fn test_build_ignored() {
        assert!(is_build_ignored("//go:build ignore\n\npackage main\n"));
        assert!(is_build_ignored("// +build ignore\n\npackage main\n"));
        assert!(!is_build_ignored("//go:build linux\n\npackage main\n"));
        assert!(!is_build_ignored("//go:build !ignore\n\npackage main\n"));
        assert!(!is_build_ignored("package main\n\n//go:build ignore\n"));
    }

    #[test]
    fn test_package_dir_ordering() {
        let mut set = BTreeSet::new();
        set.insert(PackageDir::Sub("b".to_string()));
        set.insert(PackageDir::Sub("a/z".to_string()));
        set.insert(PackageDir::Root);
        set.insert(PackageDir::Sub("a".to_string()));
        let order: Vec<&str> = set.iter().map(|p| p.as_str()).collect();
        assert_eq!(order, vec![".", "a", "a/z", "b"]);
    }

    #[test]
    fn test_package_dir_from_relative() {
        assert_eq!(PackageDir::from_relative(Path::new("")), PackageDir::Root);
        assert_eq!(
            PackageDir::from_relative(&Path::new("a").join("b")),
            PackageDir::Sub("a/b".to_string())
        );
    }

    #[test]
    fn test_discover_root_and_subpackages() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.go", "package demo\n");
        write(dir.path(), "sub/b.go", "package helper\n");
        write(dir.path(), "sub/deep/c.go", "package deep\n");
        write(dir.path(), "docs/readme.md", "# nothing\n");

        let found = discover(dir.path()).unwrap();
        let paths: Vec<&str> = found.iter().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec![".", "sub", "sub/deep"]);
        assert!(found.iter().next().unwrap().is_root());
    }

    #[test]
    fn test_hidden_and_vendor_dirs_are_pruned() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".git/x.go", "package x\n");
        write(dir.path(), "vendor/y.go", "package y\n");
        write(dir.path(), "vendor/nested/z.go", "package z\n");
        write(dir.path(), "testdata/t.go", "package t\n");
        write(dir.path(), "real/r.go", "package real\n");

        let found = discover(dir.path()).unwrap();
        let paths: Vec<&str> = found.iter().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec!["real"]);
    }

    #[test]
    fn test_test_only_directory_is_not_a_package() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "onlytests/x_test.go", "package onlytests\n");
        write(dir.path(), "ignored/gen.go", "//go:build ignore\n\npackage main\n");

        let found = discover(dir.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_exclude_globs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "internal/gen/g.go", "package gen\n");
        write(dir.path(), "internal/api/a.go", "package api\n");

        let discoverer = PackageDiscoverer::new(&["internal/gen".to_string()]).unwrap();
        let found = discoverer.discover(dir.path()).unwrap();
        let paths: Vec<&str> = found.iter().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec!["internal/api"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = discover(&dir.path().join("missing"));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_root_is_a_discovery_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "main.go", "package main\n");
        let result = discover(&dir.path().join("main.go"));
        assert!(matches!(result, Err(Error::Discovery(_))));
    }

    #[test]
    fn test_join_to() {
        let base = Path::new("out");
        assert_eq!(PackageDir::Root.join_to(base), PathBuf::from("out"));
        assert_eq!(
            PackageDir::Sub("a/b".to_string()).join_to(base),
            Path::new("out").join("a").join("b")
        );
    }
}
