//! Multi-line ANSI snippet rendering for diagnostics.
//!
//! Unlike [`SourceSnippet`](super::SourceSnippet), which renders a single
//! already-extracted line, this module walks a [`SourceMap`] directly and
//! reproduces every source line a diagnostic's span crosses, underlining
//! the covered columns on each one.

use super::{Diagnostic, Level};
use crate::span::SourceMap;

const COLOR_RED: &str = "\x1b[0;31m";
const COLOR_MAGENTA: &str = "\x1b[0;35m";
const COLOR_UWHITE: &str = "\x1b[4;37m";
const COLOR_RESET: &str = "\x1b[0m";

impl Level {
    fn underline_color(self) -> &'static str {
        match self {
            Level::Error => COLOR_RED,
            Level::Warning => COLOR_MAGENTA,
            Level::Note | Level::Help => COLOR_UWHITE,
        }
    }
}

fn count_digits(mut n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let mut digits = 0;
    while n > 0 {
        digits += 1;
        n /= 10;
    }
    digits
}

/// A single physical line covered by a diagnostic's span, plus the byte
/// range within it that should be underlined.
struct GatheredLine {
    number: usize,
    text: String,
    underline_start: usize,
    underline_end: usize,
}

fn gather_lines(content: &str, start: usize, end: usize) -> Vec<GatheredLine> {
    let len = content.len();
    let start = start.min(len);
    let end = end.max(start).min(len);

    let mut lines = Vec::new();
    let mut line_start = 0usize;
    let mut line_number = 1usize;

    for (idx, _) in content.match_indices('\n') {
        let line_end = idx;
        if line_end >= start && line_start <= end {
            let col_start = if start > line_start { start - line_start } else { 0 };
            let col_end = if end < line_end { end - line_start } else { line_end - line_start };
            lines.push(GatheredLine {
                number: line_number,
                text: content[line_start..line_end].to_string(),
                underline_start: col_start,
                underline_end: col_end.max(col_start),
            });
        }
        line_start = idx + 1;
        line_number += 1;
        if line_start > end {
            break;
        }
    }

    if line_start <= end && line_start <= len {
        let line_end = len;
        if line_end >= start {
            let col_start = if start > line_start { start - line_start } else { 0 };
            let col_end = if end < line_end { end - line_start } else { line_end - line_start };
            lines.push(GatheredLine {
                number: line_number,
                text: content[line_start..line_end].to_string(),
                underline_start: col_start,
                underline_end: col_end.max(col_start),
            });
        }
    }

    lines
}

fn print_line(
    out: &mut String,
    gutter_width: usize,
    color: &str,
    line: &GatheredLine,
    label: Option<&str>,
) {
    out.push_str(&format!(
        "{:>width$} | {}\n",
        line.number,
        line.text,
        width = gutter_width
    ));

    let underline_len = (line.underline_end - line.underline_start).max(1);
    out.push_str(&" ".repeat(gutter_width));
    out.push_str(" | ");
    out.push_str(&" ".repeat(line.underline_start));
    out.push_str(color);
    out.push_str(&"^".repeat(underline_len));
    out.push_str(COLOR_RESET);
    if let Some(label) = label {
        out.push_str("    ");
        out.push_str(label);
    }
    out.push('\n');
}

/// Render a single diagnostic, including every line its span crosses, as a
/// colored multi-line snippet terminated with a trailing newline. Follows
/// the format `<path>:<line>:<col>: error|warning: <message>`, the source
/// line(s) underlined with the label under the last one, and a single
/// `Hint:` line carrying the first help registered on the diagnostic.
pub fn render_diagnostic(diag: &Diagnostic, vfs: &SourceMap) -> String {
    let mut out = String::new();
    let path = vfs.get(diag.span.file_id).map(|f| f.name()).unwrap_or_default();

    out.push_str(&format!(
        "{path}:{}:{}: {}: {}\n",
        diag.span.line, diag.span.column, diag.level, diag.message
    ));

    if let Some(file) = vfs.get(diag.span.file_id) {
        let lines = gather_lines(file.content(), diag.span.start, diag.span.end);
        if !lines.is_empty() {
            let gutter_width = lines
                .iter()
                .map(|l| count_digits(l.number))
                .max()
                .unwrap_or(1);
            out.push_str(&format!("{} |\n", " ".repeat(gutter_width)));
            let last = lines.len() - 1;
            for (idx, line) in lines.iter().enumerate() {
                let label = if idx == last { diag.label.as_deref() } else { None };
                print_line(&mut out, gutter_width, diag.level.underline_color(), line, label);
            }
        }
    }

    if let Some(hint) = diag.helps.first() {
        out.push_str(&format!("{}Hint:{} {}\n", COLOR_UWHITE, COLOR_RESET, hint));
    }

    out
}

/// Render every diagnostic in order and concatenate the results.
pub fn render_diagnostics(diags: &[Diagnostic], vfs: &SourceMap) -> String {
    diags
        .iter()
        .map(|d| render_diagnostic(d, vfs))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render and print every diagnostic to stderr.
pub fn emit_diagnostics(diags: &[Diagnostic], vfs: &SourceMap) {
    eprint!("{}", render_diagnostics(diags, vfs));
}
