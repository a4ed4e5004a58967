//! CLI module for gopages

mod args;

pub use args::{Args, Command};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{SiteConfig, SiteGenerator, INDEX_PAGE, STYLESHEET};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            config,
            import_path,
            input,
            output,
            repository,
            doc_version,
            exclude,
            verbose,
        } => {
            init_logging(verbose);

            let mut cfg = match &config {
                Some(path) => Config::load(path)?,
                None => Config::default(),
            };
            cfg.merge_cli(import_path, input, output, repository, doc_version, exclude);
            cfg.validate()?;

            if !cfg.input_dir().exists() {
                return Err(Error::PathNotFound(cfg.input_dir().to_path_buf()));
            }

            let output_dir = cfg.output_dir().to_path_buf();
            if output_dir.exists() {
                info!("RemoveAll {}", output_dir.display());
                std::fs::remove_dir_all(&output_dir)?;
            }

            let generator = SiteGenerator::new(SiteConfig {
                input_dir: cfg.input_dir().to_path_buf(),
                output_dir,
                import_path: cfg.import_path.clone(),
                repository_url: cfg.repository.clone(),
                version: cfg.version.clone(),
                exclude: cfg.exclude.clone(),
                show_progress: verbose,
            })?;
            let report = generator.generate()?;
            verify_output(generator.output_dir())?;

            println!("{}", report.summary());
            println!("Documentation written to: {}", generator.output_dir().display());
            Ok(())
        }
    }
}

/// Install the log subscriber; `RUST_LOG` wins over the verbose flag
fn init_logging(verbose: bool) {
    let default = if verbose { "gopages=debug" } else { "gopages=info" };

    // A subscriber may already be installed when run from tests
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Check that the root page and the stylesheet were written
fn verify_output(output_dir: &Path) -> Result<()> {
    for name in [INDEX_PAGE, STYLESHEET] {
        let path: PathBuf = output_dir.join(name);
        if !path.is_file() {
            return Err(Error::MissingOutput(path));
        }
    }
    Ok(())
}
