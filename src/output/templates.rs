// Template engine for generating HTML output

use crate::doc::PackageDoc;
use crate::error::Result;
use crate::highlight::escape_html;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Template engine wrapping Tera with custom filters and templates
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Create a new template engine with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html.tera")),
            ("package.html", include_str!("../../templates/package.html.tera")),
        ])?;

        tera.register_filter("paragraphs", paragraphs);

        Ok(Self { tera })
    }

    /// Render a package page
    pub fn render_package(&self, package: &PackageDoc) -> Result<String> {
        let mut context = Context::new();
        context.insert("package", package);

        Ok(self.tera.render("package.html", &context)?)
    }
}

/// Render doc text as `<p>` blocks, one per blank-line separated paragraph.
/// The text is escaped; the filter output is marked safe by the template.
fn paragraphs(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value.as_str().unwrap_or("");

    let html: Vec<String> = text
        .split("\n\n")
        .map(str::trim_end)
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            if p.lines().all(|l| l.starts_with('\t') || l.starts_with("  ") || l.is_empty()) {
                format!("<pre>{}</pre>", escape_html(p))
            } else {
                format!("<p>{}</p>", escape_html(p))
            }
        })
        .collect();

    Ok(Value::String(html.join("\n")))
}
