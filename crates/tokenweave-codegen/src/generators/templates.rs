//! Template engine for file headers.

use crate::error::{CodegenError, Result};
use crate::model::GenerationMode;
use handlebars::Handlebars;
use serde::Serialize;
use tokenweave_core::SourceFormat;

/// One comment line per header line, in the file's comment syntax.
const HEADER_TEMPLATE: &str = "{{#each lines}}{{comment ../format this}}\n{{/each}}";

/// Template engine using Handlebars.
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Create a new template engine.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Output is source code, never HTML.
        handlebars.register_escape_fn(handlebars::no_escape);

        Self::register_helpers(&mut handlebars);

        Self { handlebars }
    }

    /// Render a template string directly.
    pub fn render_string<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(CodegenError::TemplateError)
    }

    /// Render the header block of a generated file.
    pub fn render_header(&self, header: &FileHeader) -> Result<String> {
        self.render_string(HEADER_TEMPLATE, header)
    }

    fn register_helpers(handlebars: &mut Handlebars) {
        // {{comment format text}}: a single-line comment in `format`.
        handlebars.register_helper(
            "comment",
            Box::new(
                |h: &handlebars::Helper,
                 _r: &Handlebars,
                 _ctx: &handlebars::Context,
                 _rc: &mut handlebars::RenderContext,
                 out: &mut dyn handlebars::Output| {
                    let format = h
                        .param(0)
                        .and_then(|v| v.value().as_str())
                        .and_then(|s| s.parse::<SourceFormat>().ok())
                        .unwrap_or(SourceFormat::Swift);
                    let text = h
                        .param(1)
                        .and_then(|v| v.value().as_str())
                        .unwrap_or("");
                    out.write(&format.comment(text))?;
                    Ok(())
                },
            ),
        );
    }
}

impl Default for TemplateEngine<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Data for the header block every generated file starts with.
#[derive(Debug, Clone, Serialize)]
pub struct FileHeader {
    pub format: SourceFormat,
    pub lines: Vec<String>,
}

impl FileHeader {
    pub fn new(format: SourceFormat, mode: GenerationMode, timestamp: &str, references: &[String]) -> Self {
        let mut lines = vec![
            "Generated by tokenweave. Do not edit by hand.".to_string(),
            format!("Generated at: {}", timestamp),
            format!("Mode: {}", mode),
        ];
        if mode == GenerationMode::MatchExisting {
            if references.is_empty() {
                lines.push("Reference files: none".to_string());
            } else {
                lines.push("Reference files:".to_string());
                lines.extend(references.iter().map(|r| format!("  - {}", r)));
            }
        }
        Self { format, lines }
    }
}
