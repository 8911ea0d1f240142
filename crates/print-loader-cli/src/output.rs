//! Output formatting.

use crate::cli::OutputFormat;
use camino::{Utf8Path, Utf8PathBuf};
use print_loader::LoaderKind;
use serde::{Serialize, Serializer};

/// The outcome of building one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// The input file.
    pub input: Utf8PathBuf,
    /// The generated module, if the build succeeded.
    pub output: Option<Utf8PathBuf>,
    /// The loader selected for the file.
    #[serde(serialize_with = "serialize_loader")]
    pub loader: Option<LoaderKind>,
    /// Dependencies the loader registered.
    pub dependencies: Vec<Utf8PathBuf>,
    /// The error message, if the build failed.
    pub error: Option<String>,
}

fn serialize_loader<S: Serializer>(loader: &Option<LoaderKind>, s: S) -> Result<S::Ok, S::Error> {
    match loader {
        Some(kind) => s.collect_str(kind),
        None => s.serialize_none(),
    }
}

/// Summary of a build run.
#[derive(Debug, Default, Serialize)]
pub struct BuildSummary {
    /// The workspace source paths are relative to.
    pub workspace: Utf8PathBuf,
    /// Number of files processed.
    pub file_count: usize,
    /// Number of files that failed.
    pub error_count: usize,
    /// Per-file results, in input order.
    pub files: Vec<FileReport>,
}

impl BuildSummary {
    /// Formats the summary line.
    pub fn format(&self) -> String {
        let file_word = if self.file_count == 1 {
            "file"
        } else {
            "files"
        };
        let error_word = if self.error_count == 1 {
            "error"
        } else {
            "errors"
        };

        format!(
            "====================================\nprint-loader built {} {} with {} {}",
            self.file_count, file_word, self.error_count, error_word
        )
    }
}

/// An original position found by `lookup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPosition {
    /// Source path from the map.
    pub source: String,
    /// 1-indexed original line.
    pub line: u32,
    /// 0-indexed original column.
    pub column: u32,
    /// The original line, from the embedded source content.
    pub text: Option<String>,
}

/// The result of a `lookup`.
#[derive(Debug, Serialize)]
pub struct LookupReport {
    /// The source map consulted.
    pub map: Utf8PathBuf,
    /// 1-indexed generated line.
    pub line: u32,
    /// 0-indexed generated column.
    pub column: u32,
    /// Where the position came from, if it is mapped.
    pub original: Option<ResolvedPosition>,
}

/// Formats command results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a build summary.
    pub fn format_build(&self, summary: &BuildSummary) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Human => Ok(Self::format_build_human(summary)),
            OutputFormat::Json => Self::format_json(summary),
        }
    }

    fn format_build_human(summary: &BuildSummary) -> String {
        let display = |path: &Utf8Path| -> String {
            path.strip_prefix(&summary.workspace)
                .unwrap_or(path)
                .to_string()
        };
        let mut output = String::new();

        for file in &summary.files {
            let loader = file
                .loader
                .map(|kind| kind.to_string())
                .unwrap_or_else(|| "-".to_string());
            match (&file.output, &file.error) {
                (_, Some(error)) => {
                    output.push_str(&format!("{}\nError: {}\n\n", display(&file.input), error));
                }
                (Some(out), None) => {
                    output.push_str(&format!(
                        "{} -> {} ({})\n",
                        display(&file.input),
                        display(out),
                        loader
                    ));
                }
                (None, None) => {}
            }
        }

        output.push_str(&summary.format());
        output.push('\n');
        output
    }

    fn format_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        Ok(json)
    }

    /// Formats a lookup result.
    pub fn format_lookup(&self, report: &LookupReport) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Human => Ok(Self::format_lookup_human(report)),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    fn format_lookup_human(report: &LookupReport) -> String {
        let generated = format!("{}:{}:{}", report.map, report.line, report.column);
        match &report.original {
            Some(pos) => {
                let mut output = format!("{} -> {}:{}:{}\n", generated, pos.source, pos.line, pos.column);
                if let Some(text) = &pos.text {
                    output.push_str(&format!("{:>5} | {}\n", pos.line, text));
                }
                output
            }
            None => format!("{} is not mapped\n", generated),
        }
    }
}
