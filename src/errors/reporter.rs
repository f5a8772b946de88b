//! Renders diagnostics against the source text.
//!
//! Every diagnostic prints as a four line block: a `file:line[:column]`
//! header, the offending source line verbatim, a caret underline and a
//! severity-tagged message. Lines are shown 1-based; a zero column is
//! omitted from the header.

use super::errors::{Carets, Error, Mark, Warning};

pub struct Reporter {
    file: String,
    lines: Vec<String>,
}

impl Reporter {
    pub fn new(source: &str, file: impl Into<String>) -> Self {
        Reporter {
            file: file.into(),
            lines: source.lines().map(String::from).collect(),
        }
    }

    pub fn render_error(&self, error: &Error) -> String {
        self.render(
            error.line(),
            error.column(),
            error.mark(),
            "panic",
            &error.message(),
        )
    }

    pub fn render_warning(&self, warning: &Warning) -> String {
        self.render(
            warning.line,
            warning.column,
            &warning.mark,
            "warning",
            &warning.message,
        )
    }

    pub fn print_error(&self, error: &Error) {
        eprint!("{}", self.render_error(error));
    }

    pub fn print_warning(&self, warning: &Warning) {
        eprint!("{}", self.render_warning(warning));
    }

    fn render(&self, line: u32, column: u32, mark: &Mark, severity: &str, message: &str) -> String {
        let line_text = self
            .lines
            .get(line as usize)
            .map(String::as_str)
            .unwrap_or("");

        let spaces = mark
            .spaces
            .unwrap_or_else(|| (column as usize).saturating_sub(1));
        let carets = match mark.carets {
            Carets::Width(width) => width.max(1),
            Carets::ToEndOfLine => line_text.chars().count().saturating_sub(spaces).max(1),
        };

        let mut out = format!("{}:{}", self.file, line + 1);
        if column > 0 {
            out.push_str(&format!(":{}", column));
        }
        out.push('\n');
        out.push_str(line_text);
        out.push('\n');
        out.push_str(&" ".repeat(spaces));
        out.push_str(&"^".repeat(carets));
        out.push('\n');
        out.push_str(&format!("[{}]: {}\n", severity, message));
        out
    }
}
