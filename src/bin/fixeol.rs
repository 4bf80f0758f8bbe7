//! Purpose: `fixeol` CLI entry point.
//! Role: Parses flags, resolves the target, and streams one status line per file.
//! Invariants: Check mode (no `--auto-convert`) never writes.
//! Invariants: Exit code is 0 on success, 8 when any file failed, else derived from `to_exit_code`.
use std::path::PathBuf;

use clap::{Parser, ValueHint};
use clap_complete::aot::Shell;
use treefix::cli::{
    ColorMode, OutputFormat, Parsed, emit_entry, emit_error, emit_summary_json, exit_code_for,
    init_tracing, parse_args, print_completions, usage_error,
};
use treefix::core::content::Eol;
use treefix::core::error::{Error, to_exit_code};
use treefix::core::fixeol::{self, FixEolOptions};

const BIN: &str = "fixeol";

#[derive(Parser)]
#[command(
    name = "fixeol",
    version,
    about = "Check or fix end-of-line characters in a file or directory tree",
    after_help = r#"EXAMPLES
  $ fixeol --eol unix src/                   # report files that are not LF
  $ fixeol --eol crlf --auto-convert README  # rewrite in place

MARKERS
  [ ]       untouched (already uses the target ending, or binary)
  [X]       detected, not converted (check mode)
  [C]       converted
  [ ERROR]  could not read or write the file

NOTES
  - Files containing a NUL byte are treated as binary and never modified
  - .pyc .pyo .jpg .png .gif .exe .i files are skipped
  - Set RUST_LOG=debug to log every skipped file on stderr"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        short = 'e',
        long = "eol",
        value_name = "FORMAT",
        help = "Desired end-of-line format: win/crlf, unix/lf, mac/cr"
    )]
    eol: Option<String>,
    #[arg(long, help = "Rewrite files whose line endings differ (check only by default)")]
    auto_convert: bool,
    #[arg(long, default_value = "text", value_enum, help = "Stdout format: text|jsonl")]
    format: OutputFormat,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,
    #[arg(long, value_name = "SHELL", help = "Print a shell completion script and exit")]
    completions: Option<Shell>,
    #[arg(
        value_name = "INPUT_FILE_OR_DIR",
        help = "File or directory to check",
        value_hint = ValueHint::AnyPath
    )]
    paths: Vec<PathBuf>,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, (Error, ColorMode)> {
    let cli = match parse_args::<Cli, _>(BIN, std::env::args_os()) {
        Ok(Parsed::Run(cli)) => cli,
        Ok(Parsed::Exit(code)) => return Ok(code),
        Err(err) => return Err((err, ColorMode::Auto)),
    };
    let color_mode = cli.color;
    execute(cli).map_err(|err| (err, color_mode))
}

fn execute(cli: Cli) -> Result<i32, Error> {
    if let Some(shell) = cli.completions {
        print_completions::<Cli>(shell, BIN);
        return Ok(0);
    }
    let Some(eol) = cli.eol else {
        return Err(usage_error(BIN, "the desired end-of-line format is not specified"));
    };
    let eol: Eol = eol.parse()?;
    let target = match cli.paths.as_slice() {
        [] => {
            return Err(usage_error(BIN, "the input file or directory is not specified"));
        }
        [target] => target.clone(),
        _ => {
            return Err(usage_error(BIN, "too many input file or directory arguments"));
        }
    };

    let options = FixEolOptions {
        eol,
        auto_convert: cli.auto_convert,
    };
    tracing::debug!(path = %target.display(), ?eol, auto_convert = cli.auto_convert, "fixeol start");
    let format = cli.format;
    let summary = fixeol::run(&target, options, |entry| emit_entry(entry, format))?;

    match format {
        OutputFormat::Text => println!(
            "{} files checked: {} untouched, {} detected, {} converted, {} failed",
            summary.total(),
            summary.untouched,
            summary.detected,
            summary.converted,
            summary.failed
        ),
        OutputFormat::Jsonl => emit_summary_json(&summary),
    }
    Ok(exit_code_for(&summary))
}
