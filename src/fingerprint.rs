//! Fingerprints: the registry key and the tag value of an instance.
//!
//! A fingerprint is the kind name followed by one segment per recognized
//! parameter, in declared order:
//!
//! | value | segment |
//! |---|---|
//! | text `s` | `<byte length of s>:s` |
//! | integer `n` | `#n` |
//! | flag | `+` (on) / `-` (off) |
//! | absent | `~` |
//!
//! Segments are joined with `|`. The length prefix keeps the encoding
//! injective even when a value contains `|`, so two parameter tuples share a
//! fingerprint only when every effective value is equal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::{ParamValue, Params};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Attribute selector matching every element tagged with this fingerprint,
    /// e.g. `[data-i="Grid-5:250px|9:var(--s0)"]`
    pub fn selector(&self, attribute: &str) -> String {
        format!("[{}=\"{}\"]", attribute, escape_attribute_value(&self.0))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the fingerprint of `params` for the kind called `kind`
pub fn fingerprint(kind: &str, params: &Params) -> Fingerprint {
    let mut out = String::with_capacity(kind.len() + 1 + params.len() * 12);
    out.push_str(kind);
    out.push('-');
    for (i, (_, value)) in params.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        push_segment(&mut out, value);
    }
    Fingerprint(out)
}

fn push_segment(out: &mut String, value: &ParamValue) {
    match value {
        ParamValue::Text(s) => {
            out.push_str(&s.len().to_string());
            out.push(':');
            out.push_str(s);
        }
        ParamValue::Integer(n) => {
            out.push('#');
            out.push_str(&n.to_string());
        }
        ParamValue::Flag(true) => out.push('+'),
        ParamValue::Flag(false) => out.push('-'),
        ParamValue::Absent => out.push('~'),
    }
}

/// Escapes `"` and `\` so the value can sit inside a double-quoted attribute selector.
fn escape_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(ch),
        }
    }
    out
}
