//! Command-line front end: argument parsing, option resolution and the run
//! loop used by the `flowstrip` binary.

use crate::reporter::Reporter;
use crate::{CompileError, CompileOptions, compile};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const EXIT_SUCCESS: i32 = 0;
/// The input did not parse; a diagnostic was written.
pub const EXIT_DIAGNOSTICS: i32 = 1;

/// CLI arguments for the flowstrip binary.
#[derive(Parser, Debug, Default)]
#[command(
    name = "flowstrip",
    version,
    about = "Strip Flow type annotations from JavaScript, keeping the original formatting"
)]
pub struct CliArgs {
    /// File to strip. Reads standard input when omitted.
    pub input: Option<PathBuf>,

    /// Name used in diagnostics and in the source map's `sources`.
    #[arg(long)]
    pub source_file_name: Option<String>,

    /// Produce a source map whose `file` is this name.
    #[arg(long)]
    pub source_map_name: Option<String>,

    /// Write the source map JSON to this path.
    #[arg(long)]
    pub map_file: Option<PathBuf>,

    /// JSON file holding compile options (`sourceFileName`, `sourceMapName`).
    /// Flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Config file values, then flags, then defaults derived from the paths.
    pub fn compile_options(&self) -> Result<CompileOptions> {
        let mut options = match &self.config {
            Some(path) => load_config(path)?,
            None => CompileOptions::default(),
        };

        if let Some(name) = &self.source_file_name {
            options.source_file_name = Some(name.clone());
        }
        if let Some(name) = &self.source_map_name {
            options.source_map_name = Some(name.clone());
        }

        if options.source_file_name.is_none() {
            options.source_file_name = self.input.as_ref().map(|path| path.display().to_string());
        }
        if options.source_map_name.is_none() {
            // `out.js.map` describes `out.js`.
            options.source_map_name = self
                .map_file
                .as_ref()
                .and_then(|path| path.file_stem())
                .map(|stem| stem.to_string_lossy().into_owned());
        }
        Ok(options)
    }
}

pub fn load_config(path: &Path) -> Result<CompileOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))
}

/// Strip one input and write the code to `output`.
///
/// Parse errors are reported to `diagnostics` and give
/// [`EXIT_DIAGNOSTICS`]; I/O and printer failures are errors.
pub fn run(
    args: &CliArgs,
    input: &mut dyn Read,
    output: &mut dyn Write,
    diagnostics: &mut dyn Write,
    color: bool,
) -> Result<i32> {
    let options = args.compile_options()?;
    let source = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut source = String::new();
            input
                .read_to_string(&mut source)
                .context("failed to read standard input")?;
            source
        }
    };

    let result = match compile(&source, &options) {
        Ok(result) => result,
        Err(CompileError::Parse(err)) => {
            let rendered = Reporter::new(color).format_parse_error(&err, &source);
            writeln!(diagnostics, "{rendered}").context("failed to write diagnostics")?;
            return Ok(EXIT_DIAGNOSTICS);
        }
        Err(err) => return Err(err).context("failed to print stripped code"),
    };

    output
        .write_all(result.code.as_bytes())
        .context("failed to write output")?;
    output.flush().context("failed to write output")?;

    if let (Some(path), Some(map)) = (&args.map_file, &result.map) {
        std::fs::write(path, map.to_json())
            .with_context(|| format!("failed to write source map {}", path.display()))?;
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod cli_tests;
