//! Purpose: Byte-level content transforms shared by both tools.
//! Exports: `is_binary`, `Eol`, `normalize_eol`, `substitute_token`.
//! Role: Pure functions over in-memory buffers; no filesystem access.
//! Invariants: Buffers containing a NUL byte are treated as binary and never transformed here.
//! Invariants: `normalize_eol` is idempotent for every `Eol`.
use std::borrow::Cow;
use std::str::FromStr;

use bstr::ByteSlice;

use crate::core::error::{Error, ErrorKind};

/// True when the buffer holds a NUL byte.
pub fn is_binary(data: &[u8]) -> bool {
    data.find_byte(0).is_some()
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Eol {
    Crlf,
    Lf,
    Cr,
}

impl Eol {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Eol::Crlf => b"\r\n",
            Eol::Lf => b"\n",
            Eol::Cr => b"\r",
        }
    }
}

impl FromStr for Eol {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "win" | "crlf" => Ok(Eol::Crlf),
            "unix" | "lf" => Ok(Eol::Lf),
            "mac" | "cr" => Ok(Eol::Cr),
            _ => Err(Error::new(ErrorKind::Usage)
                .with_message(format!("unknown end-of-line format: {value}"))
                .with_hint("Use one of win/crlf, unix/lf, mac/cr.")),
        }
    }
}

/// Rewrites every CRLF, lone CR and LF in `data` as `eol`.
///
/// Returns `Cow::Borrowed` when the input already uses `eol` everywhere, so
/// callers can compare cheaply and skip writes.
pub fn normalize_eol(data: &[u8], eol: Eol) -> Cow<'_, [u8]> {
    if is_normalized(data, eol) {
        return Cow::Borrowed(data);
    }
    let target = eol.as_bytes();
    let mut out = Vec::with_capacity(data.len() + data.len() / 16);
    let mut idx = 0;
    while idx < data.len() {
        match data[idx] {
            b'\r' => {
                out.extend_from_slice(target);
                if data.get(idx + 1) == Some(&b'\n') {
                    idx += 1;
                }
            }
            b'\n' => out.extend_from_slice(target),
            byte => out.push(byte),
        }
        idx += 1;
    }
    Cow::Owned(out)
}

fn is_normalized(data: &[u8], eol: Eol) -> bool {
    let mut idx = 0;
    while let Some(pos) = data[idx..].find_byteset(b"\r\n") {
        let at = idx + pos;
        let next = data.get(at + 1).copied();
        let ok = match (eol, data[at], next) {
            (Eol::Lf, b'\n', _) => true,
            (Eol::Cr, b'\r', Some(b'\n')) => false,
            (Eol::Cr, b'\r', _) => true,
            (Eol::Crlf, b'\r', Some(b'\n')) => {
                idx = at + 2;
                continue;
            }
            _ => false,
        };
        if !ok {
            return false;
        }
        idx = at + 1;
    }
    true
}

/// Replaces `token` with `replacement`, then the uppercased token with the
/// uppercased replacement.
pub fn substitute_token(data: &[u8], token: &str, replacement: &str) -> Vec<u8> {
    let lower = data.replace(token.as_bytes(), replacement.as_bytes());
    lower.replace(
        token.to_uppercase().as_bytes(),
        replacement.to_uppercase().as_bytes(),
    )
}
