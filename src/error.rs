use std::path::PathBuf;
use thiserror::Error;

/// gopages error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON config file: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("No Go source files found in directory: {0}")]
    NoSourceFiles(PathBuf),

    #[error("Multiple package names found in {dir}: {first} and {second}")]
    PackageMismatch {
        dir: PathBuf,
        first: String,
        second: String,
    },

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("Failed to format declaration: {0}")]
    Format(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Failed to write asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Expected output file is missing: {0}")]
    MissingOutput(PathBuf),
}

/// Result type alias for gopages operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error for a required field that was not supplied
    pub fn missing_field(field: &str) -> Self {
        Error::ConfigValidation(format!("missing required field '{}'", field))
    }

    /// Create a parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Create a format error
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Error::Discovery(msg.into())
    }

    /// Create an asset error
    pub fn asset(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Asset {
            path: path.into(),
            source,
        }
    }
}
