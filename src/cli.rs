//! File-level driver behind the `minipy` binary.
//!
//! Expands the inputs, runs each file through [`crate::minimize_candidate`]
//! (or [`crate::restore_with`] in unparse mode), writes the outputs and
//! reports one line per file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use minipy_ast::Document;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{MinipyError, Result};
use crate::restore::{restore_with, PlainFormatter};
use crate::select::Origin;
use crate::{minimize_candidate, MinimizeInput};

/// Everything one run needs, after flags have been merged into the config.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub inputs: Vec<PathBuf>,
    /// Explicit output paths, one per expanded input.
    pub outputs: Vec<PathBuf>,
    /// Restore stubs instead of minimizing trees.
    pub unparse: bool,
    /// Write `<stem>.py` instead of `<stem><suffix>.py`.
    pub no_suffix: bool,
    pub config: Config,
}

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub input: PathBuf,
    /// `None` for skipped (empty) inputs.
    pub output: Option<PathBuf>,
    pub input_len: usize,
    pub output_len: usize,
    pub origin: Option<Origin>,
}

impl FileReport {
    /// Size reduction relative to the input, in percent.
    pub fn level(&self) -> f64 {
        if self.input_len == 0 {
            return 0.0;
        }
        (1.0 - self.output_len as f64 / self.input_len as f64) * 100.0
    }
}

/// Directories contribute their files with `extension`, sorted; files are
/// taken as given.
pub fn expand_inputs(inputs: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input) {
                let entry = entry.map_err(|e| {
                    let path = e.path().unwrap_or(input).to_path_buf();
                    MinipyError::io(path, e.into())
                })?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == extension)
                {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// `<dir>/<stem><suffix>.py`. A stem already carrying `strip` (the other
/// mode's suffix) loses it first.
pub fn output_path(input: &Path, suffix: &str, strip: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match stem.strip_suffix(strip) {
        Some(base) if !strip.is_empty() && !base.is_empty() => base.to_string(),
        _ => stem,
    };
    input.with_file_name(format!("{}{}.py", stem, suffix))
}

/// Process every input and write one report line per file to `out`.
pub fn run(options: &RunOptions, out: &mut dyn Write) -> Result<Vec<FileReport>> {
    let started = Instant::now();
    let extension = if options.unparse { "py" } else { "json" };
    let inputs = expand_inputs(&options.inputs, extension)?;
    if !options.outputs.is_empty() && options.outputs.len() != inputs.len() {
        return Err(MinipyError::InvalidArguments {
            message: format!(
                "{} output paths for {} input files",
                options.outputs.len(),
                inputs.len()
            ),
        });
    }

    let settings = &options.config.minipy;
    let (suffix, strip) = match (options.no_suffix, options.unparse) {
        (true, _) => ("", ""),
        (false, false) => (settings.min_suffix.as_str(), settings.max_suffix.as_str()),
        (false, true) => (settings.max_suffix.as_str(), settings.min_suffix.as_str()),
    };

    let mut reports = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let text = fs::read_to_string(input).map_err(|e| MinipyError::io(input, e))?;
        if text.trim().is_empty() {
            report_line(out, "Empty input file.")?;
            reports.push(FileReport {
                input: input.clone(),
                output: None,
                input_len: 0,
                output_len: 0,
                origin: None,
            });
            continue;
        }

        let output = options
            .outputs
            .get(index)
            .cloned()
            .unwrap_or_else(|| output_path(input, suffix, strip));

        let (input_len, result, origin) = if options.unparse {
            (text.len(), restore_with(&text, &PlainFormatter), None)
        } else {
            let document = Document::from_json(&text)?;
            let input_len = document.source.as_ref().map_or(text.len(), String::len);
            let candidate = minimize_candidate(
                MinimizeInput::Document(&document),
                &options.config.select_options(),
            )?;
            (input_len, candidate.text, Some(candidate.origin))
        };

        fs::write(&output, &result).map_err(|e| MinipyError::io(&output, e))?;
        let report = FileReport {
            input: input.clone(),
            output: Some(output.clone()),
            input_len,
            output_len: result.len(),
            origin,
        };
        info!("{} -> {} ({} bytes)", input.display(), output.display(), result.len());
        report_line(
            out,
            &format!(
                "{} -> {} | Compressing level {:.3}%",
                input.display(),
                output.display(),
                report.level()
            ),
        )?;
        reports.push(report);
    }

    let elapsed = started.elapsed().as_secs_f64();
    debug!("processed {} files", reports.len());
    report_line(out, &format!("Total time = {:.3}s", elapsed))?;
    Ok(reports)
}

fn report_line(out: &mut dyn Write, line: &str) -> Result<()> {
    writeln!(out, "{}", line).map_err(|e| MinipyError::io("<stdout>", e))
}
