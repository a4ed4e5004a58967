use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Invocation settings for one documentation run
///
/// Keys are snake_case; capitalized field names are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Import path of the module root, e.g. `github.com/user/repo`
    #[serde(alias = "ImportPath")]
    pub import_path: String,
    /// Root of the Go source tree
    #[serde(alias = "Input")]
    pub input: Option<PathBuf>,
    /// Directory the site is written to (wiped before every run)
    #[serde(alias = "Output")]
    pub output: Option<PathBuf>,
    /// Repository URL shown on every page
    #[serde(alias = "Repository")]
    pub repository: String,
    /// Version label shown on every page
    #[serde(alias = "Version")]
    pub version: String,
    /// Extra directory globs to leave out of discovery
    #[serde(alias = "Exclude")]
    pub exclude: Vec<String>,
}

impl Config {
    /// Load config from a TOML or JSON file, picked by extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&contents)?,
            _ => serde_json::from_str(&contents)?,
        };
        Ok(config)
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        import_path: Option<String>,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        repository: Option<String>,
        version: Option<String>,
        exclude: Vec<String>,
    ) {
        if let Some(p) = import_path {
            self.import_path = p;
        }
        if input.is_some() {
            self.input = input;
        }
        if output.is_some() {
            self.output = output;
        }
        if let Some(r) = repository {
            self.repository = r;
        }
        if let Some(v) = version {
            self.version = v;
        }
        if !exclude.is_empty() {
            self.exclude.extend(exclude);
        }
    }

    /// Validate configuration, naming the first required field that is missing
    pub fn validate(&self) -> Result<()> {
        if self.import_path.trim().is_empty() {
            return Err(Error::missing_field("import_path"));
        }
        if self.input.as_ref().map_or(true, |p| p.as_os_str().is_empty()) {
            return Err(Error::missing_field("input"));
        }
        if self.output.as_ref().map_or(true, |p| p.as_os_str().is_empty()) {
            return Err(Error::missing_field("output"));
        }
        if self.repository.trim().is_empty() {
            return Err(Error::missing_field("repository"));
        }
        if self.version.trim().is_empty() {
            return Err(Error::missing_field("version"));
        }

        for pattern in &self.exclude {
            glob::Pattern::new(pattern)?;
        }

        Ok(())
    }

    /// Source directory; only meaningful after `validate`
    pub fn input_dir(&self) -> &Path {
        self.input.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Output directory; only meaningful after `validate`
    pub fn output_dir(&self) -> &Path {
        self.output.as_deref().unwrap_or_else(|| Path::new("."))
    }
}
