//! Indentation-aware source builder that tracks declared symbols and
//! annotates them against a reference file.

use super::colors::Collision;
use indexmap::IndexMap;
use std::collections::HashSet;
use tokenweave_core::SourceFormat;
use tokenweave_diff::{extract_declarations, Declaration};

/// Comment placed before a declaration the reference does not have.
pub const NEW_MARKER: &str = "NEW";
/// Prefix of trailing comments for reference declarations no longer generated.
pub const REMOVED_MARKER: &str = "REMOVED";

/// Builds one generated file.
pub struct SourceWriter {
    format: SourceFormat,
    indent: String,
    depth: usize,
    lines: Vec<String>,
    /// Named container stack; `None` for anonymous blocks.
    scope: Vec<Option<String>>,
    reference: Option<Vec<Declaration>>,
    reference_names: HashSet<String>,
    symbols: IndexMap<String, String>,
    collisions: Vec<Collision>,
}

impl SourceWriter {
    pub fn new(format: SourceFormat, indent: &str, reference: Option<&str>) -> Self {
        let reference = reference.map(|text| extract_declarations(text, format));
        let reference_names = reference
            .iter()
            .flatten()
            .map(|d| d.name.clone())
            .collect();
        Self {
            format,
            indent: indent.to_string(),
            depth: 0,
            lines: Vec::new(),
            scope: Vec::new(),
            reference,
            reference_names,
            symbols: IndexMap::new(),
            collisions: Vec::new(),
        }
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// One indented line; an empty string is a blank line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", self.indent.repeat(self.depth), text));
        }
    }

    /// A blank line, never two in a row and never at the top of a block.
    pub fn blank(&mut self) {
        match self.lines.last() {
            None => {}
            Some(last) if last.is_empty() || last.trim_end().ends_with(['{', '(']) => {}
            Some(_) => self.lines.push(String::new()),
        }
    }

    /// A comment in the file's syntax.
    pub fn comment(&mut self, text: &str) {
        let comment = self.format.comment(text);
        self.line(comment);
    }

    /// Open a block. `name` qualifies declarations inside it.
    pub fn open(&mut self, text: impl AsRef<str>, name: Option<&str>) {
        self.line(text);
        self.depth += 1;
        self.scope.push(name.map(str::to_string));
    }

    /// Close the innermost block.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.trim_trailing_blank();
        self.depth = self.depth.saturating_sub(1);
        self.scope.pop();
        self.line(text);
    }

    fn trim_trailing_blank(&mut self) {
        while self.lines.last().map_or(false, |l| l.is_empty()) {
            self.lines.pop();
        }
    }

    /// Name as the declaration extractor would report it.
    fn qualified(&self, name: &str) -> String {
        match self.format {
            SourceFormat::Css | SourceFormat::Scss => name.to_string(),
            _ => {
                let mut parts: Vec<&str> = self.scope.iter().flatten().map(String::as_str).collect();
                parts.push(name);
                parts.join(".")
            }
        }
    }

    /// A token declaration, one line. `name` is the identifier as declared
    /// (`--grey-750`, `$grey-750`, `grey750`).
    pub fn declare(&mut self, name: &str, token_path: &str, text: impl AsRef<str>) {
        self.declare_lines(name, token_path, &[text.as_ref().to_string()]);
    }

    /// A token declaration spanning several lines; continuation lines are
    /// indented one level deeper.
    pub fn declare_lines(&mut self, name: &str, token_path: &str, lines: &[String]) {
        let qualified = self.qualified(name);
        let first = !self.symbols.contains_key(&qualified);
        if first && self.reference.is_some() && !self.reference_names.contains(&qualified) {
            self.comment(NEW_MARKER);
        }
        for (i, text) in lines.iter().enumerate() {
            if i == 0 {
                self.line(text);
            } else {
                self.depth += 1;
                self.line(text);
                self.depth -= 1;
            }
        }
        if first {
            self.symbols.insert(qualified, token_path.to_string());
        }
    }

    /// A declaration that opens a block (`val LightColorScheme = lightColorScheme(`).
    pub fn open_declared(&mut self, name: &str, token_path: &str, text: impl AsRef<str>) {
        self.declare(name, token_path, text);
        self.depth += 1;
        self.scope.push(None);
    }

    /// A member the declaration extractor does not report (SCSS map
    /// entries): recorded as a symbol, never annotated.
    pub fn member(&mut self, name: &str, token_path: &str, text: impl AsRef<str>) {
        let qualified = self.qualified(name);
        self.line(text);
        self.symbols
            .entry(qualified)
            .or_insert_with(|| token_path.to_string());
    }

    /// Record tokens left out because their identifier was taken.
    pub fn collided(&mut self, collisions: &[Collision]) {
        self.collisions.extend_from_slice(collisions);
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Whether nothing has been declared yet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Join header and body, appending REMOVED comments for reference
    /// declarations that were not generated.
    pub fn finish(mut self, header: &str) -> (String, IndexMap<String, String>) {
        self.trim_trailing_blank();
        let removed: Vec<String> = self
            .reference
            .iter()
            .flatten()
            .filter(|d| !self.symbols.contains_key(&d.name))
            .map(|d| {
                self.format
                    .comment(&format!("{}: {} (was {})", REMOVED_MARKER, d.name, d.value))
            })
            .collect();
        let mut seen = HashSet::new();
        let removed: Vec<String> = removed.into_iter().filter(|r| seen.insert(r.clone())).collect();
        if !removed.is_empty() {
            self.lines.push(String::new());
            self.lines.extend(removed);
        }

        let mut content = String::with_capacity(header.len() + self.lines.len() * 48);
        content.push_str(header);
        if !header.is_empty() {
            content.push('\n');
        }
        for line in &self.lines {
            content.push_str(line);
            content.push('\n');
        }
        (content, self.symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_and_qualified_symbols() {
        let mut w = SourceWriter::new(SourceFormat::Swift, "    ", None);
        w.open("struct AppColors {", Some("AppColors"));
        w.open("enum Primitives {", Some("Primitives"));
        w.declare("grey750", "Colour/Grey/750", "static let grey750 = Color.black");
        w.close("}");
        w.close("}");
        let (content, symbols) = w.finish("");
        assert_eq!(
            content,
            "struct AppColors {\n    enum Primitives {\n        static let grey750 = Color.black\n    }\n}\n"
        );
        assert_eq!(
            symbols.get("AppColors.Primitives.grey750").map(String::as_str),
            Some("Colour/Grey/750")
        );
    }

    #[test]
    fn test_new_and_removed_markers() {
        let reference = ":root {\n  --grey-750: #1d1d1d;\n  --grey-900: #111111;\n}\n";
        let mut w = SourceWriter::new(SourceFormat::Css, "  ", Some(reference));
        w.open(":root {", None);
        w.declare("--grey-750", "Grey/750", "--grey-750: #1d1d1d;");
        w.declare("--grey-50", "Grey/50", "--grey-50: #f5f5f5;");
        w.close("}");
        let (content, _) = w.finish("/* header */");
        assert_eq!(
            content,
            "/* header */\n:root {\n  --grey-750: #1d1d1d;\n  /* NEW */\n  --grey-50: #f5f5f5;\n}\n\n/* REMOVED: --grey-900 (was #111111) */\n"
        );
    }

    #[test]
    fn test_blank_lines_collapse() {
        let mut w = SourceWriter::new(SourceFormat::Kotlin, "    ", None);
        w.blank();
        w.open("object A {", Some("A"));
        w.blank();
        w.declare("X", "X", "val X = 1");
        w.blank();
        w.blank();
        w.close("}");
        let (content, _) = w.finish("");
        assert_eq!(content, "object A {\n    val X = 1\n}\n");
    }
}
