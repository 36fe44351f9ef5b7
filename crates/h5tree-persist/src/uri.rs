//! Resolving a destination string (`file:` URI or plain path) to a path.

use std::path::PathBuf;

use crate::error::PersistError;

/// Resolve `destination` to a filesystem path.
///
/// Accepted forms: a plain path (`out/sim.h5t`, `C:\data\x.h5t`),
/// `file:relative/path`, `file:/abs/path`, `file:///abs/path` and
/// `file://localhost/abs/path`. Percent-escapes in URIs are decoded.
pub fn resolve(destination: &str) -> Result<PathBuf, PersistError> {
    let trimmed = destination.trim();
    if trimmed.is_empty() {
        return Err(PersistError::InvalidUri(destination.to_string()));
    }

    let Some(scheme) = scheme_of(trimmed) else {
        return Ok(PathBuf::from(trimmed));
    };
    if !scheme.eq_ignore_ascii_case("file") {
        return Err(PersistError::UnsupportedScheme(scheme.to_string()));
    }

    let rest = &trimmed[scheme.len() + 1..];
    let path = match rest.strip_prefix("//") {
        Some(after) => {
            let (authority, path) = match after.find('/') {
                Some(pos) => after.split_at(pos),
                None => (after, ""),
            };
            if !authority.is_empty() && !authority.eq_ignore_ascii_case("localhost") {
                return Err(PersistError::InvalidUri(destination.to_string()));
            }
            path
        }
        None => rest,
    };

    let decoded =
        percent_decode(path).ok_or_else(|| PersistError::InvalidUri(destination.to_string()))?;
    if decoded.is_empty() {
        return Err(PersistError::InvalidUri(destination.to_string()));
    }
    Ok(PathBuf::from(decoded))
}

/// The URI scheme, if `s` has one. Single letters are drive letters, not schemes.
fn scheme_of(s: &str) -> Option<&str> {
    let colon = s.find(':')?;
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if scheme.len() < 2 || !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}

fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
