// Go source parsing and declaration extraction

pub mod ast;
mod go;

pub use ast::*;
pub use go::{GoParser, ParsedFile};
