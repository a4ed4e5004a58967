//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate a static documentation site from a tree of Go packages
#[derive(Parser, Debug)]
#[command(name = "gopages")]
#[command(about = "Generate a static documentation site from a tree of Go packages")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate documentation (the output directory is replaced)
    Generate {
        /// Config file (TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Import path of the source tree root, e.g. github.com/acme/tool
        #[arg(long)]
        import_path: Option<String>,

        /// Root of the Go source tree
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Repository URL shown on every page
        #[arg(long)]
        repository: Option<String>,

        /// Version label shown on every page
        #[arg(long = "doc-version")]
        doc_version: Option<String>,

        /// Directory globs to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let args = Args::try_parse_from(["gopages", "generate"]).unwrap();
        match args.command {
            Command::Generate {
                config,
                import_path,
                input,
                exclude,
                verbose,
                ..
            } => {
                assert!(config.is_none());
                assert!(import_path.is_none());
                assert!(input.is_none());
                assert!(exclude.is_empty());
                assert!(!verbose);
            }
        }
    }

    #[test]
    fn test_generate_with_options() {
        let args = Args::try_parse_from([
            "gopages", "generate",
            "--config", "gopages.toml",
            "--import-path", "github.com/acme/tool",
            "--input", "./src",
            "--output", "/tmp/docs",
            "--repository", "https://github.com/acme/tool",
            "--doc-version", "v1.0.0",
            "--exclude", "internal/**",
            "--exclude", "cmd/*",
            "--verbose",
        ])
        .unwrap();

        let Command::Generate {
            config,
            import_path,
            input,
            output,
            repository,
            doc_version,
            exclude,
            verbose,
        } = args.command;
        assert_eq!(config, Some(PathBuf::from("gopages.toml")));
        assert_eq!(import_path.as_deref(), Some("github.com/acme/tool"));
        assert_eq!(input, Some(PathBuf::from("./src")));
        assert_eq!(output, Some(PathBuf::from("/tmp/docs")));
        assert_eq!(repository.as_deref(), Some("https://github.com/acme/tool"));
        assert_eq!(doc_version.as_deref(), Some("v1.0.0"));
        assert_eq!(exclude, vec!["internal/**".to_string(), "cmd/*".to_string()]);
        assert!(verbose);
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert!(Args::try_parse_from(["gopages", "serve"]).is_err());
    }

    #[test]
    fn test_command_is_required() {
        assert!(Args::try_parse_from(["gopages"]).is_err());
    }
}
