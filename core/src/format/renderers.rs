//! format/renderers.rs
//! Built-in renderers registered by `ExtensionRegistry::with_defaults`.

use chrono::{Local, TimeZone};

use crate::constants::NOT_A_NUMBER;
use crate::format::types::{FormatArg, Padding};

/// Default rendering when no (known) renderer is named.
pub fn plain(arg: &FormatArg<'_>, pad: &Padding) -> String {
    match arg {
        FormatArg::Integer(n) => pad.apply(&n.to_string()),
        FormatArg::Text(s) => pad.apply(s),
        FormatArg::Binary(b) => pad.apply(&hex::encode(b)),
    }
}

pub fn octal(arg: &FormatArg<'_>, pad: &Padding) -> String {
    match arg {
        FormatArg::Integer(n) => pad.apply(&format!("{:o}", unsigned(*n))),
        _ => pad.apply(NOT_A_NUMBER),
    }
}

pub fn hex(arg: &FormatArg<'_>, pad: &Padding) -> String {
    match arg {
        FormatArg::Integer(n) => pad.apply(&format!("{:x}", unsigned(*n))),
        _ => pad.apply(NOT_A_NUMBER),
    }
}

/// Unsigned bit pattern of `n`: values that fit 32 bits
/// come from 8/16/32-bit tags and print as unsigned 32-bit.
fn unsigned(n: i64) -> u64 {
    match i32::try_from(n) {
        Ok(v) => u64::from(v as u32),
        Err(_) => n as u64,
    }
}

/// Local date and time of a unix timestamp.
pub fn date(arg: &FormatArg<'_>, pad: &Padding) -> String {
    timestamp(arg, pad, "%c")
}

/// Local calendar day of a unix timestamp.
pub fn day(arg: &FormatArg<'_>, pad: &Padding) -> String {
    timestamp(arg, pad, "%a %b %d %Y")
}

fn timestamp(arg: &FormatArg<'_>, pad: &Padding, fmt: &str) -> String {
    let FormatArg::Integer(secs) = *arg else {
        return pad.apply(NOT_A_NUMBER);
    };
    match Local.timestamp_opt(secs, 0).single() {
        Some(t) => pad.apply(&t.format(fmt).to_string()),
        None => pad.apply(NOT_A_NUMBER),
    }
}

/// Single-quote for a POSIX shell; integers are left bare.
pub fn shescape(arg: &FormatArg<'_>, pad: &Padding) -> String {
    let text = match arg {
        FormatArg::Integer(n) => return pad.apply(&n.to_string()),
        FormatArg::Text(s) => s.to_string(),
        FormatArg::Binary(b) => hex::encode(b),
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in pad.apply(&text).chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}
