//! Main orchestration logic.

use crate::cli::{BuildArgs, LookupArgs};
use crate::config::{ignore_set, ConfigError, LoaderConfig, RuleSet, CONFIG_FILE};
use crate::output::{BuildSummary, FileReport, LookupReport, ResolvedPosition};
use camino::{Utf8Path, Utf8PathBuf};
use globset::GlobSet;
use indexmap::IndexSet;
use miette::Diagnostic;
use print_loader::{Host, ResourceIdentity, TransformError};
use rayon::prelude::*;
use source_map::{LineCol, SourceMap, SourceMapError};
use std::fs;
use thiserror::Error;
use walkdir::WalkDir;

/// Default output directory, relative to the workspace.
const DEFAULT_OUT_DIR: &str = "dist";

/// Patterns never walked into.
const DEFAULT_IGNORES: [&str; 2] = ["**/node_modules/**", "**/.git/**"];

/// Orchestration errors.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(print_loader::read))]
    ReadFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    #[diagnostic(code(print_loader::write))]
    WriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input path does not exist.
    #[error("input not found: {0}")]
    #[diagnostic(code(print_loader::missing_input))]
    MissingInput(Utf8PathBuf),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// A lookup position is out of range.
    #[error("invalid position: {0}")]
    #[diagnostic(help("lines are 1-indexed"))]
    InvalidPosition(String),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A transform failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A source map could not be read or written.
    #[error(transparent)]
    SourceMap(#[from] SourceMapError),

    /// A report could not be serialized.
    #[error("failed to serialize output: {0}")]
    #[diagnostic(code(print_loader::output))]
    Output(#[from] serde_json::Error),
}

/// A [`Host`] for one file on disk.
#[derive(Debug)]
struct FileHost {
    resource: ResourceIdentity,
    dependencies: Vec<Utf8PathBuf>,
}

impl FileHost {
    fn new(resource: ResourceIdentity) -> Self {
        Self {
            resource,
            dependencies: Vec::new(),
        }
    }
}

impl Host for FileHost {
    fn resource(&self) -> &ResourceIdentity {
        &self.resource
    }

    fn add_dependency(&mut self, path: &Utf8Path) {
        tracing::trace!(resource = %self.resource.resource_path(), dependency = %path, "add dependency");
        if !self.dependencies.iter().any(|d| d == path) {
            self.dependencies.push(path.to_path_buf());
        }
    }
}

/// Settings shared by every file of a build.
#[derive(Debug)]
struct BuildContext {
    workspace: Utf8PathBuf,
    out_dir: Utf8PathBuf,
    rules: RuleSet,
    ignore: GlobSet,
}

/// Runs `build` over all inputs.
///
/// Per-file failures are recorded in the summary and do not stop other files.
pub fn run_build(args: &BuildArgs) -> Result<BuildSummary, CliError> {
    let workspace = absolutize(&args.workspace)?;
    let config = LoaderConfig::load(&workspace);

    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| config.out_dir.clone())
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUT_DIR));
    let out_dir = if out_dir.is_relative() {
        workspace.join(out_dir)
    } else {
        out_dir
    };

    let rules = RuleSet::new(&config.rules, args.loader.unwrap_or_default())?;
    let ignore = ignore_set(
        DEFAULT_IGNORES
            .into_iter()
            .chain(config.ignore.iter().map(String::as_str))
            .chain(args.ignore.iter().map(String::as_str)),
    )?;

    let ctx = BuildContext {
        workspace,
        out_dir,
        rules,
        ignore,
    };

    let files = collect_files(&ctx, &args.inputs)?;
    tracing::debug!(count = files.len(), out_dir = %ctx.out_dir, "collected input files");

    let files: Vec<FileReport> = files
        .par_iter()
        .map(|path| build_file(&ctx, path))
        .collect();

    let error_count = files.iter().filter(|f| f.error.is_some()).count();
    Ok(BuildSummary {
        workspace: ctx.workspace,
        file_count: files.len(),
        error_count,
        files,
    })
}

fn absolutize(path: &Utf8Path) -> Result<Utf8PathBuf, CliError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| CliError::ReadFailed {
        path: Utf8PathBuf::from("."),
        source,
    })?;
    let cwd = Utf8PathBuf::try_from(cwd)
        .map_err(|e| CliError::NonUtf8Path(e.into_path_buf().display().to_string()))?;
    Ok(cwd.join(path))
}

/// Expands inputs into the list of files to transform, in a stable order.
///
/// A file reached through several inputs is listed once, at its first position.
fn collect_files(ctx: &BuildContext, inputs: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>, CliError> {
    let mut files = IndexSet::new();

    for input in inputs {
        let input = if input.is_relative() {
            ctx.workspace.join(input)
        } else {
            input.clone()
        };

        if input.is_file() {
            files.insert(input);
        } else if input.is_dir() {
            for entry in WalkDir::new(&input).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("skipping unreadable entry: {e}");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = match Utf8PathBuf::try_from(entry.into_path()) {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::warn!("skipping non-UTF-8 path {}", e.into_path_buf().display());
                        continue;
                    }
                };
                if !is_ignored(ctx, &path) {
                    files.insert(path);
                }
            }
        } else {
            return Err(CliError::MissingInput(input));
        }
    }

    Ok(files.into_iter().collect())
}

fn is_ignored(ctx: &BuildContext, path: &Utf8Path) -> bool {
    if path.starts_with(&ctx.out_dir) {
        return true;
    }
    let rel = path.strip_prefix(&ctx.workspace).unwrap_or(path);
    ctx.ignore.is_match(rel.as_std_path()) || rel.file_name() == Some(CONFIG_FILE)
}

fn build_file(ctx: &BuildContext, path: &Utf8Path) -> FileReport {
    let mut host = FileHost::new(ResourceIdentity::new(path, &ctx.workspace));
    let mut report = FileReport {
        input: path.to_path_buf(),
        output: None,
        loader: None,
        dependencies: Vec::new(),
        error: None,
    };

    match transform_file(ctx, &mut host, &mut report) {
        Ok(output) => {
            tracing::debug!(input = %path, output = %output, "built");
            report.output = Some(output);
        }
        Err(e) => {
            tracing::error!(input = %path, "{e}");
            report.error = Some(e.to_string());
        }
    }

    report.dependencies = host.dependencies;
    report
}

fn transform_file(
    ctx: &BuildContext,
    host: &mut FileHost,
    report: &mut FileReport,
) -> Result<Utf8PathBuf, CliError> {
    let path = host.resource().resource_path().to_path_buf();
    let source = fs::read(&path).map_err(|source| CliError::ReadFailed {
        path: path.clone(),
        source,
    })?;

    let relative = host.resource().relative_path()?;
    let kind = ctx.rules.loader_for(Utf8Path::new(&relative));
    report.loader = Some(kind);

    let output = kind.loader().load(host, &source)?;

    let js_path = ctx.out_dir.join(format!("{}.js", output_stem(&relative)));
    if let Some(parent) = js_path.parent() {
        fs::create_dir_all(parent).map_err(|source| CliError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let js_name = js_path.file_name().unwrap_or_default().to_string();

    let mut code = output.code;
    if let Some(map) = output.map {
        let map_name = format!("{js_name}.map");
        let map_path = js_path.with_file_name(&map_name);
        let json = map.with_file(js_name.as_str()).to_json()?;
        write_file(&map_path, &json)?;

        // Appended after the footer, so no mapped line moves
        if !code.ends_with('\n') {
            code.push('\n');
        }
        code.push_str(&format!("//# sourceMappingURL={map_name}\n"));
    }
    write_file(&js_path, &code)?;

    Ok(js_path)
}

/// Maps a workspace-relative path into the output directory.
///
/// `..` segments become `__` so files outside the workspace stay inside it.
fn output_stem(relative: &str) -> String {
    relative
        .split('/')
        .map(|segment| if segment == ".." { "__" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

fn write_file(path: &Utf8Path, content: &str) -> Result<(), CliError> {
    fs::write(path, content).map_err(|source| CliError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs `lookup`.
pub fn run_lookup(args: &LookupArgs) -> Result<LookupReport, CliError> {
    if args.line == 0 {
        return Err(CliError::InvalidPosition(format!(
            "line {} (expected 1 or more)",
            args.line
        )));
    }

    let json = fs::read_to_string(&args.map).map_err(|source| CliError::ReadFailed {
        path: args.map.clone(),
        source,
    })?;
    let map = SourceMap::from_json(&json)?;

    let generated = LineCol::new(args.line - 1, args.column);
    let original = map.original_position(generated).map(|pos| {
        let text = map
            .source_content(pos.source)
            .and_then(|content| content.split('\n').nth(pos.position.line as usize))
            .map(str::to_string);
        ResolvedPosition {
            source: pos.source.to_string(),
            line: pos.position.line + 1,
            column: pos.position.col,
            text,
        }
    });

    Ok(LookupReport {
        map: args.map.clone(),
        line: args.line,
        column: args.column,
        original,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use pretty_assertions::assert_eq;
    use print_loader::LoaderKind;

    fn build_args(workspace: &Utf8Path, inputs: &[&str]) -> BuildArgs {
        BuildArgs {
            inputs: inputs.iter().map(Utf8PathBuf::from).collect(),
            workspace: workspace.to_path_buf(),
            out_dir: None,
            loader: None,
            ignore: Vec::new(),
            output: OutputFormat::Human,
        }
    }

    fn workspace() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem("app/main.scss"), "app/main.scss");
        assert_eq!(output_stem("../shared/a.txt"), "__/shared/a.txt");
    }

    #[test]
    fn test_build_writes_module_and_map() {
        let (_dir, root) = workspace();
        fs::create_dir_all(root.join("app/style")).unwrap();
        fs::write(root.join("app/style/main.scss"), "body{\n  background:yellow;\n}").unwrap();

        let summary = run_build(&build_args(&root, &["app"])).unwrap();
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.error_count, 0);

        let report = &summary.files[0];
        assert_eq!(report.loader, Some(LoaderKind::Print));
        assert_eq!(report.dependencies, vec![root.join("app/style/main.scss")]);

        let js = fs::read_to_string(root.join("dist/app/style/main.scss.js")).unwrap();
        assert!(js.starts_with("exports.print = function(){\n\n  console.log(\"body{\");\n"));
        assert!(js.ends_with("}\n//# sourceMappingURL=main.scss.js.map\n"));

        let map = SourceMap::from_json(
            &fs::read_to_string(root.join("dist/app/style/main.scss.js.map")).unwrap(),
        )
        .unwrap();
        assert_eq!(map.file(), "main.scss.js");
        assert_eq!(map.sources().collect::<Vec<_>>(), vec!["app/style/main.scss"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_build_uses_configured_rules_and_skips_out_dir() {
        let (_dir, root) = workspace();
        fs::write(
            root.join(CONFIG_FILE),
            r#"{ "outDir": "out", "rules": [{ "test": "**/*.names", "loader": "start-case" }] }"#,
        )
        .unwrap();
        fs::write(root.join("people.names"), "fooBar\nbaz_qux").unwrap();
        fs::write(root.join("notes.txt"), "hello").unwrap();

        let summary = run_build(&build_args(&root, &["."])).unwrap();
        assert_eq!(summary.file_count, 2);

        let names = fs::read_to_string(root.join("out/people.names.js")).unwrap();
        assert_eq!(names, "Foo Bar\nBaz Qux");
        assert!(!root.join("out/people.names.js.map").exists());
        assert!(root.join("out/notes.txt.js.map").exists());

        // A second build must not pick up its own output or the config file
        let summary = run_build(&build_args(&root, &["."])).unwrap();
        assert_eq!(summary.file_count, 2);
    }

    #[test]
    fn test_build_reports_invalid_utf8_and_continues() {
        let (_dir, root) = workspace();
        fs::write(root.join("bad.txt"), [0xffu8, 0xfe]).unwrap();
        fs::write(root.join("good.txt"), "ok").unwrap();

        let summary = run_build(&build_args(&root, &["bad.txt", "good.txt"])).unwrap();
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.error_count, 1);
        assert!(summary.files[0]
            .error
            .as_deref()
            .unwrap()
            .contains("not valid UTF-8"));
        assert!(!root.join("dist/bad.txt.js").exists());
        assert!(root.join("dist/good.txt.js").exists());
    }

    #[test]
    fn test_build_lists_repeated_inputs_once() {
        let (_dir, root) = workspace();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("docs/c.txt"), "c").unwrap();

        let inputs = ["a.txt", "b.txt", "a.txt", "docs", "docs/c.txt"];
        let summary = run_build(&build_args(&root, &inputs)).unwrap();
        let inputs: Vec<_> = summary.files.iter().map(|f| f.input.clone()).collect();
        assert_eq!(
            inputs,
            vec![root.join("a.txt"), root.join("b.txt"), root.join("docs/c.txt")]
        );
        assert_eq!(summary.file_count, 3);
    }

    #[test]
    fn test_build_missing_input() {
        let (_dir, root) = workspace();
        let result = run_build(&build_args(&root, &["nope.txt"]));
        assert!(matches!(result, Err(CliError::MissingInput(_))));
    }

    #[test]
    fn test_lookup_resolves_statement_line() {
        let (_dir, root) = workspace();
        fs::write(root.join("main.txt"), "first\nsecond").unwrap();
        run_build(&build_args(&root, &["main.txt"])).unwrap();

        let args = LookupArgs {
            map: root.join("dist/main.txt.js.map"),
            line: 4,
            column: 2,
            output: OutputFormat::Human,
        };
        let report = run_lookup(&args).unwrap();
        assert_eq!(
            report.original,
            Some(ResolvedPosition {
                source: "main.txt".to_string(),
                line: 2,
                column: 0,
                text: Some("second".to_string()),
            })
        );

        let header = run_lookup(&LookupArgs { line: 1, ..args }).unwrap();
        assert_eq!(header.original, None);
    }

    #[test]
    fn test_lookup_rejects_line_zero() {
        let args = LookupArgs {
            map: Utf8PathBuf::from("unused.map"),
            line: 0,
            column: 0,
            output: OutputFormat::Human,
        };
        assert!(matches!(run_lookup(&args), Err(CliError::InvalidPosition(_))));
    }
}
