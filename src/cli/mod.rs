//! Purpose: CLI plumbing shared by `fixeol` and `renametree`.
//! Exports: `ColorMode`, `OutputFormat`, `Parsed`, `parse_args`, `init_tracing`,
//!   `emit_entry`, `emit_summary_json`, `print_completions`, `exit_code_for`, diagnostics.
//! Role: Binaries own their flag structs; everything they print goes through here.
//! Invariants: Status lines and summaries go to stdout; diagnostics and logs go to stderr.
//! Invariants: Help/version exit 0; a bare invocation prints help and exits 2.
mod diagnostics;

use std::ffi::OsString;
use std::io;

use clap::error::ErrorKind as ClapErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::aot::Shell;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::core::error::{Error, ErrorKind, to_exit_code};
use crate::core::report::{Entry, Summary};

pub use diagnostics::{
    ErrorReport, clap_error_hint, clap_error_summary, emit_error, error_json, error_text,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `<marker> <path>` line per entry plus a summary line.
    Text,
    /// One JSON object per entry plus a final summary object.
    Jsonl,
}

pub enum Parsed<C> {
    Run(C),
    Exit(i32),
}

/// Logs go to stderr at `warn` unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

pub fn parse_args<C, I>(bin: &str, args: I) -> Result<Parsed<C>, Error>
where
    C: Parser,
    I: IntoIterator<Item = OsString>,
{
    match C::try_parse_from(args) {
        Ok(cli) => Ok(Parsed::Run(cli)),
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                Ok(Parsed::Exit(exit_code))
            }
            _ => Err(Error::new(ErrorKind::Usage)
                .with_message(clap_error_summary(&err))
                .with_hint(clap_error_hint(bin))),
        },
    }
}

pub fn print_completions<C: CommandFactory>(shell: Shell, bin: &str) {
    let mut cmd = C::command();
    clap_complete::aot::generate(shell, &mut cmd, bin, &mut io::stdout());
}

pub fn usage_error(bin: &str, message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Usage)
        .with_message(message)
        .with_hint(clap_error_hint(bin))
}

pub fn entry_text(entry: &Entry) -> String {
    let mut line = format!("{} {}", entry.status.marker(), entry.path.display());
    if let Some(output) = &entry.output {
        line.push_str(&format!(" -> {}", output.display()));
    }
    if let Some(message) = &entry.message {
        line.push_str(&format!(": {message}"));
    }
    line
}

pub fn emit_entry(entry: &Entry, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", entry_text(entry)),
        OutputFormat::Jsonl => {
            let json = serde_json::to_string(entry)
                .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
            println!("{json}");
        }
    }
}

pub fn emit_summary_json(summary: &Summary) {
    let value = json!({ "summary": summary });
    println!("{value}");
}

/// A finished run exits 0 unless some entry failed.
pub fn exit_code_for(summary: &Summary) -> i32 {
    if summary.has_failures() {
        to_exit_code(ErrorKind::Io)
    } else {
        0
    }
}
