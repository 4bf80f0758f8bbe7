//! Purpose: `renametree` CLI entry point.
//! Role: Validates flags, then mirrors a template tree into a new directory with the token renamed.
//! Invariants: All validation happens before the first filesystem write.
//! Invariants: Exit code is 0 on success, 8 when any entry failed, else derived from `to_exit_code`.
use std::path::PathBuf;

use clap::{Parser, ValueHint};
use clap_complete::aot::Shell;
use treefix::cli::{
    ColorMode, OutputFormat, Parsed, emit_entry, emit_error, emit_summary_json, exit_code_for,
    init_tracing, parse_args, print_completions, usage_error,
};
use treefix::core::error::{Error, to_exit_code};
use treefix::core::rename::{self, DEFAULT_TOKEN, RenameOptions};
use treefix::core::walk::IgnoreRules;

const BIN: &str = "renametree";

#[derive(Parser)]
#[command(
    name = "renametree",
    version,
    about = "Copy a template project tree under a new name",
    after_help = r#"EXAMPLES
  $ renametree -n leaf -o ../leaf ./xtree
  $ renametree -t widget -n gizmo -o out --exclude '^build$' template/
  $ renametree -n leaf -o ../leaf --dry-run ./xtree

NOTES
  - File contents: the token and its UPPERCASE form are replaced
  - Entry names: only the token itself is replaced
  - Binary files (containing a NUL byte) are reported as [IGNORE] and not copied
  - VCS dirs, dist/temp/tmp, backups (~, .bak) and build junk are skipped"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(short = 'n', long = "new-name", value_name = "NAME", help = "New name replacing the token")]
    new_name: Option<String>,
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (must not exist)",
        value_hint = ValueHint::DirPath
    )]
    output: Option<PathBuf>,
    #[arg(
        short = 't',
        long = "token",
        default_value = DEFAULT_TOKEN,
        help = "Template token to replace"
    )]
    token: String,
    #[arg(
        short = 'x',
        long = "exclude",
        value_name = "REGEX",
        help = "Extra entry-name pattern to skip (repeatable)"
    )]
    exclude: Vec<String>,
    #[arg(long, help = "Report what would be done without writing anything")]
    dry_run: bool,
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
        value_name = "TEMPLATE_DIR",
        help = "Template codebase directory",
        value_hint = ValueHint::DirPath
    )]
    templates: Vec<PathBuf>,
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
    let Some(new_name) = cli.new_name else {
        return Err(usage_error(BIN, "the new name is not specified"));
    };
    let Some(output) = cli.output else {
        return Err(usage_error(BIN, "the output directory is not specified"));
    };
    let template = match cli.templates.as_slice() {
        [] => {
            return Err(usage_error(BIN, "the template directory is not specified"));
        }
        [template] => template.clone(),
        _ => {
            return Err(usage_error(BIN, "too many template directory arguments"));
        }
    };

    let ignore = IgnoreRules::new(cli.exclude.as_slice())?;
    let options = RenameOptions::new(cli.token, new_name, ignore)?.with_dry_run(cli.dry_run);
    tracing::debug!(
        template = %template.display(),
        output = %output.display(),
        token = %options.token,
        new_name = %options.new_name,
        dry_run = options.dry_run,
        "renametree start"
    );
    let format = cli.format;
    let summary = rename::run(&template, &output, &options, |entry| {
        emit_entry(entry, format)
    })?;

    match format {
        OutputFormat::Text if summary.failed > 0 => println!(
            "{} entries converted successfully ({} failed)",
            summary.renamed, summary.failed
        ),
        OutputFormat::Text => println!("{} entries converted successfully", summary.renamed),
        OutputFormat::Jsonl => emit_summary_json(&summary),
    }
    Ok(exit_code_for(&summary))
}
