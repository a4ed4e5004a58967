// HTML site generator
//
// Writes the static site to disk: the shared style.css, one index.html per
// non-empty sub-package, and the root index.html linking them.

use crate::discover::{PackageDir, PackageDiscoverer};
use crate::doc::{PackageBuilder, PackageDoc, PackageInfo, SiteMeta};
use crate::error::{Error, Result};
use crate::output::templates::TemplateEngine;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the shared stylesheet in the output root
pub const STYLESHEET: &str = "style.css";

/// Name of every generated page
pub const INDEX_PAGE: &str = "index.html";

/// Configuration for site generation
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    /// Root of the Go source tree
    pub input_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Import path of the source tree root, e.g. `github.com/acme/tool`
    pub import_path: String,
    pub repository_url: String,
    pub version: String,
    /// Extra directory globs to skip during discovery
    pub exclude: Vec<String>,
    /// Show a progress bar while rendering packages
    pub show_progress: bool,
}

/// Static site generator
pub struct SiteGenerator {
    config: SiteConfig,
    template_engine: TemplateEngine,
}

impl SiteGenerator {
    /// Create a new site generator
    pub fn new(config: SiteConfig) -> Result<Self> {
        let template_engine = TemplateEngine::new()?;
        Ok(Self {
            config,
            template_engine,
        })
    }

    /// Generate the complete static site
    pub fn generate(&self) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        fs::create_dir_all(&self.config.output_dir)?;
        self.write_stylesheet()?;

        let stylesheet_path = stylesheet_path(&self.config.import_path);
        let discoverer = PackageDiscoverer::new(&self.config.exclude)?;
        let packages = discoverer.discover(&self.config.input_dir)?;
        info!("Discovered {} packages", packages.len());

        let has_root = packages.contains(&PackageDir::Root);
        // BTreeSet iteration is already lexicographic by relative path
        let subs: Vec<&PackageDir> = packages.iter().filter(|p| !p.is_root()).collect();

        let mut builder = PackageBuilder::new()?;
        let mut sub_packages = Vec::new();

        let progress = if self.config.show_progress {
            let pb = ProgressBar::new(subs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for dir in subs {
            if let Some(ref pb) = progress {
                pb.set_message(dir.to_string());
            }

            let package = builder.build(&dir.join_to(&self.config.input_dir))?;
            if package.is_empty() {
                debug!("Skipping empty package: {}", dir);
                report.packages_skipped += 1;
            } else {
                let info = PackageInfo {
                    name: package.name.clone(),
                    path: dir.to_string(),
                };
                let import_path = join_import_path(&self.config.import_path, dir.as_str());
                let meta = self.meta(import_path, &stylesheet_path);
                let page = dir.join_to(&self.config.output_dir).join(INDEX_PAGE);
                self.render_page(&package.with_meta(meta), &page)?;

                sub_packages.push(info);
                report.packages_rendered += 1;
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        let root = if has_root {
            builder.build(&self.config.input_dir)?
        } else {
            PackageDoc::named(last_segment(&self.config.import_path))
        };
        let meta = self.meta(join_import_path(&self.config.import_path, ""), &stylesheet_path);
        let root = root.with_meta(meta).with_sub_packages(sub_packages);
        self.render_page(&root, &self.config.output_dir.join(INDEX_PAGE))?;
        report.root_rendered = true;

        Ok(report)
    }

    /// Write the embedded stylesheet into the output root
    fn write_stylesheet(&self) -> Result<()> {
        let path = self.config.output_dir.join(STYLESHEET);
        let css_content = include_str!("../../assets/style.css");
        info!("Creating file: {}", path.display());
        fs::write(&path, css_content).map_err(|e| Error::asset(&path, e))
    }

    fn meta(&self, import_path: String, stylesheet_path: &str) -> SiteMeta {
        SiteMeta {
            repository_url: self.config.repository_url.clone(),
            version: self.config.version.clone(),
            import_path,
            stylesheet_path: stylesheet_path.to_string(),
        }
    }

    /// Render one package page to `path`
    fn render_page(&self, package: &PackageDoc, path: &Path) -> Result<()> {
        let html = self.template_engine.render_package(package)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        info!("Creating file: {}", path.display());
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(html.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Get the output directory
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }
}

/// Report of what was generated
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub packages_rendered: usize,
    pub packages_skipped: usize,
    pub root_rendered: bool,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Generated {} package pages, skipped {} empty, root: {}",
            self.packages_rendered,
            self.packages_skipped,
            if self.root_rendered { "yes" } else { "no" }
        )
    }
}

/// Site URL of the stylesheet: the import path without its first segment,
/// anchored at the site root. `github.com/acme/tool` gives `/acme/tool/style.css`.
pub fn stylesheet_path(import_path: &str) -> String {
    let rest = import_path
        .split('/')
        .filter(|s| !s.is_empty())
        .skip(1)
        .collect::<Vec<_>>()
        .join("/");

    if rest.is_empty() {
        format!("/{}", STYLESHEET)
    } else {
        format!("/{}/{}", rest, STYLESHEET)
    }
}

/// Join an import path and a relative package path with forward slashes
pub fn join_import_path(base: &str, rel: &str) -> String {
    base.split('/')
        .chain(rel.split(['/', '\\']))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Last segment of an import path
fn last_segment(import_path: &str) -> &str {
    import_path
        .rsplit('/')
        .find(|s| !s.is_empty())
        .unwrap_or(import_path)
}
