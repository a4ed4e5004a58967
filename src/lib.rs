//! gopages - Generate a static documentation site from Go packages
//!
//! Discovers the packages of a Go source tree, extracts the exported API of
//! each one with tree-sitter, and renders one HTML page per package with
//! highlighted, cross-linked declarations.

pub mod cli;
pub mod config;
pub mod discover;
pub mod doc;
pub mod error;
pub mod highlight;
pub mod output;
pub mod parser;

// Re-export main types
pub use config::Config;
pub use discover::{discover, PackageDir, PackageDiscoverer};
pub use doc::{build_package, PackageDoc};
pub use error::{Error, Result};
pub use highlight::highlight;
pub use output::{GenerationReport, SiteConfig, SiteGenerator};
