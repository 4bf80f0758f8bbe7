//! Purpose: Render fatal errors on stderr for both binaries.
//! Exports: `ErrorReport`, `emit_error`, `error_text`, `error_json`, `clap_error_summary`, `clap_error_hint`.
//! Role: Keeps stderr formats identical across tools.
//! Invariants: Terminal stderr gets labeled human text; anything else gets one JSON object.
//! Invariants: Both renderings are built from the same `ErrorReport`.
//! Invariants: ANSI escapes appear only when the color mode allows them.
use std::error::Error as StdError;
use std::io::{self, IsTerminal};

use serde::Serialize;
use serde_json::Value;

use super::ColorMode;
use crate::core::error::Error;

const RED: &str = "31";
const YELLOW: &str = "33";

/// What a user needs to see about a fatal error, with the source chain flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: &'a ErrorReport,
}

impl ErrorReport {
    pub fn from_error(err: &Error) -> Self {
        let mut causes = Vec::new();
        let mut cur = err.source();
        while let Some(source) = cur {
            causes.push(source.to_string());
            cur = source.source();
        }
        Self {
            kind: format!("{:?}", err.kind()),
            message: err
                .message()
                .unwrap_or_else(|| err.kind().summary())
                .to_string(),
            hint: err.hint().map(str::to_string),
            path: err.path().map(|path| path.display().to_string()),
            causes,
        }
    }

    /// `error:` line first, then whichever of hint, path and first cause exist.
    pub fn render_text(&self, use_color: bool) -> String {
        let mut lines = vec![format!("{} {}", paint("error:", RED, use_color), self.message)];
        let details = [
            ("hint:", self.hint.as_deref()),
            ("path:", self.path.as_deref()),
            ("caused by:", self.causes.first().map(String::as_str)),
        ];
        for (label, value) in details {
            if let Some(value) = value {
                lines.push(format!("{} {value}", paint(label, YELLOW, use_color)));
            }
        }
        lines.join("\n")
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(Envelope { error: self }).unwrap_or(Value::Null)
    }
}

fn paint(label: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("\u{1b}[{code}m{label}\u{1b}[0m")
    } else {
        label.to_string()
    }
}

pub fn emit_error(err: &Error, color_mode: ColorMode) {
    let report = ErrorReport::from_error(err);
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", report.render_text(color_mode.use_color(is_tty)));
    } else {
        eprintln!("{}", report.to_json());
    }
}

pub fn error_json(err: &Error) -> Value {
    ErrorReport::from_error(err).to_json()
}

pub fn error_text(err: &Error, use_color: bool) -> String {
    ErrorReport::from_error(err).render_text(use_color)
}

/// First non-empty line of clap's rendering, without its `error:` prefix.
pub fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.strip_prefix("error:").unwrap_or(line).trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

pub fn clap_error_hint(bin: &str) -> String {
    format!("Try `{bin} --help`.")
}
