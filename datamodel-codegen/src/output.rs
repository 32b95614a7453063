//! Writing generated classes into the source tree
//!
//! Each class lands at `output_dir/<namespace path>.php`. Existing files are
//! kept unless forced; refusals and write failures are collected rather than
//! aborting the run.

use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::codegen::naming::class_file_path;
use crate::codegen::GeneratedFile;
use crate::config::CodegenConfig;

/// Output driver switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    pub ignored_namespace: String,
    pub dry_run: bool,
    pub force: bool,
    pub print: bool,
}

impl From<&CodegenConfig> for OutputOptions {
    fn from(config: &CodegenConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            ignored_namespace: config.ignored_namespace.clone(),
            dry_run: config.dry_run,
            force: config.force,
            print: config.print,
        }
    }
}

/// What happened to one generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// New file written
    Created(PathBuf),
    /// Existing file replaced
    Overwritten(PathBuf),
    /// Dry run: the file would be written
    Ready(PathBuf),
    /// File exists and force is off
    Skipped(PathBuf),
    /// Writing failed
    Failed(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Created(p)
            | WriteOutcome::Overwritten(p)
            | WriteOutcome::Ready(p)
            | WriteOutcome::Skipped(p)
            | WriteOutcome::Failed(p) => p,
        }
    }

    /// Whether the file was written to disk
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Created(_) | WriteOutcome::Overwritten(_))
    }
}

/// Writes generated files, echoing to `out` when printing is enabled
pub struct OutputWriter<W: Write = io::Stdout> {
    options: OutputOptions,
    out: W,
    errors: Vec<String>,
}

impl OutputWriter<io::Stdout> {
    pub fn new(options: OutputOptions) -> Self {
        Self::with_output(options, io::stdout())
    }
}

impl<W: Write> OutputWriter<W> {
    /// Use a custom sink for printed content
    pub fn with_output(options: OutputOptions, out: W) -> Self {
        Self {
            options,
            out,
            errors: Vec::new(),
        }
    }

    /// Target path of a generated class
    pub fn path_for(&self, file: &GeneratedFile) -> PathBuf {
        self.options
            .output_dir
            .join(class_file_path(&file.fqcn, &self.options.ignored_namespace))
    }

    /// Write (or preview) one generated file
    pub fn write(&mut self, file: &GeneratedFile) -> WriteOutcome {
        let path = self.path_for(file);
        let exists = path.exists();

        if self.options.dry_run {
            if exists && !self.options.force {
                warn!(
                    "File {} exists. You must use force (--force|-f) to recreate.",
                    path.display()
                );
            } else {
                info!("File {} is ready for create.", path.display());
            }
        }

        if self.options.print {
            self.print(&path, &file.content);
        }

        if self.options.dry_run {
            return if exists && !self.options.force {
                WriteOutcome::Skipped(path)
            } else {
                WriteOutcome::Ready(path)
            };
        }

        if exists && !self.options.force {
            let msg = format!(
                "File {} exists. Use force (--force|-f) if you need recreate the model.",
                path.display()
            );
            warn!("{}", msg);
            self.errors.push(msg);
            return WriteOutcome::Skipped(path);
        }

        match write_file(&path, &file.content) {
            Ok(()) if exists => {
                info!("Overwritten {}", path.display());
                WriteOutcome::Overwritten(path)
            }
            Ok(()) => {
                info!("Created {}", path.display());
                WriteOutcome::Created(path)
            }
            Err(err) => {
                let msg = format!("File {} cannot be written: {}", path.display(), err);
                warn!("{}", msg);
                self.errors.push(msg);
                WriteOutcome::Failed(path)
            }
        }
    }

    /// Echo the content, or a diff against the existing file
    fn print(&mut self, path: &Path, content: &str) {
        let rendered = match fs::read_to_string(path) {
            Ok(existing) => render_diff(&existing, content),
            Err(_) => content.to_string(),
        };

        let result = writeln!(self.out, "{}", path.display())
            .and_then(|_| write!(self.out, "{}", rendered))
            .and_then(|_| self.out.flush());

        if let Err(err) = result {
            warn!("Cannot print {}: {}", path.display(), err);
        }
    }

    /// Problems collected so far
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Line diff of two texts, prefixed `-`, `+` or ` `
pub fn render_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        out.push(sign);
        out.push_str(change.value());
        if change.missing_newline() {
            out.push('\n');
        }
    }

    out
}
