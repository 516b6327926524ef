// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rich terminal formatter for diagnostics.
//!
//! Produces multi-line, color-coded error output in the familiar style:
//!
//! ```text
//! error[E0200]: undefined name `countr`
//!   --> demo.ula:4:12
//!     |
//!   4 |     return countr
//!     |            ^^^^^^ not found in this scope
//!     = help: did you mean `count`?
//! ```

use colored::Colorize;

use ula_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

/// A source line with its labels.
struct AnnotatedLine {
    line_num: usize,
    text: String,
    annotations: Vec<Annotation>,
}

struct Annotation {
    col_start: usize,
    col_end: usize,
    style: LabelStyle,
    message: Option<String>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_map = LineMap::new(source);
        Self {
            source,
            file_name: None,
            line_map,
        }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();

        // Line 1: severity[code]: message
        self.format_header(&mut out, diagnostic);

        // No source context: just print notes/help
        let Some(primary) = diagnostic.primary_span() else {
            self.format_footer(&mut out, diagnostic, 2);
            return out;
        };

        // Group labels by source line
        let annotated = self.collect_annotated_lines(diagnostic);

        // Line 2: --> file:line:col, pointing at the primary label even
        // when a secondary label sits on an earlier line
        let file = self.file_name.unwrap_or("<source>");
        let (line, col) = self.offset_to_line_col(primary.start);
        out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue(), file, line, col));

        // Calculate gutter width from max line number
        let max_line = annotated.last().map(|a| a.line_num).unwrap_or(1);
        let gutter_width = max_line.to_string().len().max(2);

        // Render each annotated line
        let mut prev_line_num: Option<usize> = None;
        for annotated_line in &annotated {
            // Gap indicator for non-consecutive lines
            if let Some(prev) = prev_line_num {
                if annotated_line.line_num > prev + 1 {
                    out.push_str(&format!("{} {}\n", " ".repeat(gutter_width), "...".blue()));
                }
            }

            // Empty pipe line before first source line
            if prev_line_num.is_none() {
                out.push_str(&format!(
                    "{} {}\n",
                    " ".repeat(gutter_width + 1),
                    "|".blue()
                ));
            }

            // Source line: NN | code
            // Pad the number before coloring; ANSI escapes confuse {:>w}.
            let num = format!("{:>width$}", annotated_line.line_num, width = gutter_width + 1);
            out.push_str(&format!(
                "{} {} {}\n",
                num.blue().bold(),
                "|".blue(),
                annotated_line.text,
            ));

            // Annotation lines beneath
            self.format_annotations(&mut out, annotated_line, gutter_width);

            prev_line_num = Some(annotated_line.line_num);
        }

        self.format_footer(&mut out, diagnostic, gutter_width);

        out
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Internal => "internal error".red().bold(),
        };

        if let Some(ref code) = diagnostic.code {
            out.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code.0.clone().red().bold(),
                diagnostic.message.bold()
            ));
        } else {
            out.push_str(&format!("{}: {}\n", severity_str, diagnostic.message.bold()));
        }
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic, gutter_width: usize) {
        for note in &diagnostic.notes {
            out.push_str(&format!(
                "{} {} {}: {}\n",
                " ".repeat(gutter_width + 1),
                "=".cyan(),
                "note".cyan().bold(),
                note
            ));
        }

        if let Some(ref help) = diagnostic.help {
            out.push_str(&format!(
                "{} {} {}: {}\n",
                " ".repeat(gutter_width + 1),
                "=".cyan(),
                "help".cyan().bold(),
                help
            ));
        }
    }

    fn collect_annotated_lines(&self, diagnostic: &Diagnostic) -> Vec<AnnotatedLine> {
        let mut lines_map: std::collections::BTreeMap<usize, AnnotatedLine> =
            std::collections::BTreeMap::new();

        for label in &diagnostic.labels {
            let (line_num, col_start) = self.offset_to_line_col(label.span.start);
            let (end_line, col_end) = self.offset_to_line_col(label.span.end);

            // For multi-line spans, just annotate the start line
            let effective_col_end = if end_line == line_num {
                col_end
            } else {
                let line_text = self.get_line(line_num).unwrap_or("");
                line_text.len() + 1
            };

            let entry = lines_map.entry(line_num).or_insert_with(|| {
                let text = self.get_line(line_num).unwrap_or("").to_string();
                AnnotatedLine {
                    line_num,
                    text,
                    annotations: Vec::new(),
                }
            });

            entry.annotations.push(Annotation {
                col_start,
                col_end: effective_col_end.max(col_start + 1), // At least 1 char wide
                style: label.style,
                message: label.message.clone(),
            });
        }

        lines_map.into_values().collect()
    }

    fn format_annotations(
        &self,
        out: &mut String,
        annotated_line: &AnnotatedLine,
        gutter_width: usize,
    ) {
        // Sort annotations: primary first, then by column
        let mut sorted: Vec<&Annotation> = annotated_line.annotations.iter().collect();
        sorted.sort_by(|a, b| {
            a.style
                .cmp_priority()
                .cmp(&b.style.cmp_priority())
                .then(a.col_start.cmp(&b.col_start))
        });

        // Build the underline characters
        let line_len = annotated_line.text.len() + 10;
        let mut underline = vec![' '; line_len];
        let mut messages: Vec<(usize, LabelStyle, &str)> = Vec::new();

        for ann in &sorted {
            let ch = match ann.style {
                LabelStyle::Primary => '^',
                LabelStyle::Secondary => '-',
            };

            for i in (ann.col_start - 1)..ann.col_end.saturating_sub(1).min(line_len) {
                underline[i] = ch;
            }

            if let Some(ref msg) = ann.message {
                messages.push((ann.col_start, ann.style, msg));
            }
        }

        let underline_str: String = underline.iter().collect::<String>().trim_end().to_string();
        if underline_str.is_empty() {
            return;
        }

        let colored_underline = color_underline(&underline_str);

        // A single message goes inline after the underline; several stack
        // on their own lines with a connector pipe under each span start
        if messages.len() <= 1 {
            if let Some((_, style, msg)) = messages.first() {
                out.push_str(&format!(
                    "{} {} {} {}\n",
                    " ".repeat(gutter_width + 1),
                    "|".blue(),
                    colored_underline,
                    style_message(msg, *style),
                ));
            } else {
                out.push_str(&format!(
                    "{} {} {}\n",
                    " ".repeat(gutter_width + 1),
                    "|".blue(),
                    colored_underline,
                ));
            }
        } else {
            out.push_str(&format!(
                "{} {} {}\n",
                " ".repeat(gutter_width + 1),
                "|".blue(),
                colored_underline,
            ));

            // Bottom-up so the primary message lands closest to the reader
            for (col, style, msg) in messages.iter().rev() {
                let pipe = match style {
                    LabelStyle::Primary => "|".red().bold().to_string(),
                    LabelStyle::Secondary => "|".blue().to_string(),
                };
                out.push_str(&format!(
                    "{} {} {}{} {}\n",
                    " ".repeat(gutter_width + 1),
                    "|".blue(),
                    " ".repeat(col.saturating_sub(1)),
                    pipe,
                    style_message(msg, *style),
                ));
            }
        }
    }

    /// Convert byte offset to (line, col), both 1-based.
    fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let (line, col) = self.line_map.offset_to_line_col(offset);
        (line as usize, col as usize)
    }

    /// Get source line text by 1-based line number.
    fn get_line(&self, line_num: usize) -> Option<&str> {
        self.line_map.line_text(self.source, line_num as u32)
    }
}

impl LabelStyle {
    fn cmp_priority(&self) -> u8 {
        match self {
            LabelStyle::Primary => 0,
            LabelStyle::Secondary => 1,
        }
    }
}

fn style_message(msg: &str, style: LabelStyle) -> String {
    match style {
        LabelStyle::Primary => msg.red().bold().to_string(),
        LabelStyle::Secondary => msg.blue().to_string(),
    }
}

/// Color the underline characters (^ in red, - in blue).
fn color_underline(s: &str) -> String {
    let mut result = String::new();
    let mut current_char = None;
    let mut run = String::new();

    for ch in s.chars() {
        let kind = match ch {
            '^' => Some('^'),
            '-' => Some('-'),
            _ => None,
        };

        if kind != current_char && !run.is_empty() {
            result.push_str(&flush_run(&run, current_char));
            run.clear();
        }
        run.push(ch);
        current_char = kind;
    }

    if !run.is_empty() {
        result.push_str(&flush_run(&run, current_char));
    }

    result
}

fn flush_run(run: &str, kind: Option<char>) -> String {
    match kind {
        Some('^') => run.red().bold().to_string(),
        Some('-') => run.blue().to_string(),
        _ => run.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Diagnostic;
    use ula_ast::Span;

    fn render(source: &str, diagnostic: &Diagnostic) -> String {
        colored::control::set_override(false);
        DiagnosticFormatter::new(source)
            .with_file_name("demo.ula")
            .format(diagnostic)
    }

    #[test]
    fn single_label_renders_arrow_gutter_and_caret() {
        let src = "def f(count: u8) -> u8:\n    return countr\n";
        let start = src.find("countr").unwrap();
        let diag = Diagnostic::error("undefined name `countr`")
            .with_code("E0200")
            .with_primary(Span::new(start, start + 6), "not found in this scope")
            .with_help("did you mean `count`?");

        let out = render(src, &diag);
        assert!(out.starts_with("error[E0200]: undefined name `countr`\n"));
        assert!(out.contains("--> demo.ula:2:12"));
        assert!(out.contains("  2 |     return countr"));
        assert!(out.contains("^^^^^^ not found in this scope"));
        assert!(out.contains("= help: did you mean `count`?"));
    }

    #[test]
    fn arrow_points_at_the_primary_label() {
        let src = "def f() -> void:\n    return\n\ndef f() -> void:\n    return\n";
        let first = src.find("f()").unwrap();
        let second = src.rfind("def f").unwrap() + 4;
        let diag = Diagnostic::error("duplicate definition of `f`")
            .with_primary(Span::new(second, second + 1), "redefined here")
            .with_secondary(Span::new(first, first + 1), "first defined here");

        let out = render(src, &diag);
        // The secondary line renders first, but the arrow targets line 4.
        assert!(out.contains("--> demo.ula:4:5"));
        let line1 = out.find("  1 | def f()").unwrap();
        let gap = out.find("...").unwrap();
        let line4 = out.find("  4 | def f()").unwrap();
        assert!(line1 < gap && gap < line4);
        assert!(out.contains("- first defined here"));
        assert!(out.contains("^ redefined here"));
    }

    #[test]
    fn two_labels_on_one_line_stack_their_messages() {
        let src = "def f(x: u8, x: i8) -> void:\n    return\n";
        let first = src.find('x').unwrap();
        let second = src.rfind("x:").unwrap();
        let diag = Diagnostic::error("duplicate definition of `x`")
            .with_primary(Span::new(second, second + 1), "redefined here")
            .with_secondary(Span::new(first, first + 1), "first defined here");

        let out = render(src, &diag);
        // One underline row carrying both markers, then one line per message.
        assert!(out.contains("-      ^"));
        assert!(out.contains("| first defined here"));
        assert!(out.contains("| redefined here"));
    }

    #[test]
    fn multi_line_span_annotates_only_its_first_line() {
        let src = "def f() -> u8:\n    let x: u8 = 1\n";
        let diag = Diagnostic::error("missing return statement in `f`")
            .with_primary(Span::new(0, src.len() - 1), "declared to return `u8`");

        let out = render(src, &diag);
        assert!(out.contains("  1 | def f() -> u8:"));
        assert!(out.contains("^^^^^^^^^^^^^^ declared to return `u8`"));
        assert!(!out.contains("  2 |"));
    }

    #[test]
    fn no_labels_prints_header_and_footer_only() {
        let diag = Diagnostic::internal("no symbol recorded for node NodeId(7)")
            .with_code("E0900")
            .with_note("this is a compiler bug, not an error in your program");

        let out = render("", &diag);
        assert!(out.starts_with("internal error[E0900]:"));
        assert!(out.contains("= note: this is a compiler bug"));
        assert!(!out.contains("-->"));
    }
}
