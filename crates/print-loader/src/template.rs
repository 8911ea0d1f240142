//! The output template wrapping source lines into a printing module.
//!
//! Generated code for `a\nb` looks like:
//!
//! ```text
//! exports.print = function(){
//!
//!   console.log("a");
//!   console.log("b");
//! }
//! ```
//!
//! Source maps point at the statements, so their position is derived from the
//! template definition itself: [`HEADER_LINES`] is the number of header lines
//! and [`STATEMENT_COLUMN`] the width of the indent.

use crate::escape::push_js_string;
use crate::TransformError;
use source_map::{ByteOffset, LineCol, LineIndex};

/// The shape of a generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Lines emitted before the first statement.
    pub header: &'static [&'static str],
    /// Prefix of every statement line.
    pub indent: &'static str,
    /// Function called with each source line.
    pub callee: &'static str,
    /// Lines emitted after the last statement.
    pub footer: &'static [&'static str],
}

/// The template used by the print transform.
pub const PRINT_TEMPLATE: Template = Template {
    header: &["exports.print = function(){", ""],
    indent: "  ",
    callee: "console.log",
    footer: &["}"],
};

/// Number of lines preceding the first statement of [`PRINT_TEMPLATE`].
pub const HEADER_LINES: u32 = PRINT_TEMPLATE.header_lines();

/// 0-indexed column where each statement of [`PRINT_TEMPLATE`] begins.
pub const STATEMENT_COLUMN: u32 = PRINT_TEMPLATE.statement_column();

impl Template {
    /// Number of header lines, i.e. the generated-line offset of source line 0.
    pub const fn header_lines(&self) -> u32 {
        self.header.len() as u32
    }

    /// Column at which every statement starts.
    pub const fn statement_column(&self) -> u32 {
        self.indent.len() as u32
    }

    /// Generated position of the statement for the 0-indexed source `line`.
    pub fn statement_position(&self, line: u32) -> LineCol {
        LineCol::new(line + self.header_lines(), self.statement_column())
    }

    /// Renders the module for `lines`, one statement per line.
    pub fn render(&self, lines: &[&str]) -> String {
        let capacity = lines.iter().map(|l| l.len() + 24).sum::<usize>() + 64;
        let mut out = String::with_capacity(capacity);

        for line in self.header {
            out.push_str(line);
            out.push('\n');
        }
        for line in lines {
            self.push_statement(&mut out, line);
            out.push('\n');
        }
        for line in self.footer {
            out.push_str(line);
            out.push('\n');
        }

        out
    }

    /// Renders the single statement printing `line`.
    pub fn statement(&self, line: &str) -> String {
        let mut out = String::new();
        self.push_statement(&mut out, line);
        out
    }

    fn push_statement(&self, out: &mut String, line: &str) {
        out.push_str(self.indent);
        out.push_str(self.callee);
        out.push('(');
        push_js_string(out, line);
        out.push_str(");");
    }

    /// Checks that rendered statements sit where [`Self::statement_position`] says.
    ///
    /// Renders a two-line probe document and locates both statements in the
    /// output text. Fails with [`TransformError::TemplateInconsistency`] if a
    /// header line spans several lines, the indent is not blank, or the
    /// statements are otherwise displaced.
    pub fn verify(&self) -> Result<(), TransformError> {
        const PROBE: [&str; 2] = ["print-loader probe 0", "print-loader probe 1"];

        let rendered = self.render(&PROBE);
        let index = LineIndex::new(&rendered)?;
        let mut search_from = 0;

        for (line, probe) in PROBE.iter().enumerate() {
            let expected = self.statement_position(line as u32);
            let statement = self.statement(probe);

            let found = match rendered[search_from..].find(&statement) {
                Some(at) => {
                    let at = search_from + at;
                    search_from = at + statement.len();
                    index.line_col(ByteOffset::from((at + self.indent.len()) as u32))
                }
                None => None,
            };

            let indent_is_blank = self.indent.chars().all(|c| c == ' ' || c == '\t');
            if found != Some(expected) || !indent_is_blank {
                return Err(TransformError::TemplateInconsistency {
                    expected: format_position(Some(expected)),
                    found: format_position(found),
                });
            }
        }

        Ok(())
    }
}

fn format_position(position: Option<LineCol>) -> String {
    match position {
        Some(pos) => format!("{}:{}", pos.line + 1, pos.col),
        None => "nowhere".to_string(),
    }
}
