//! File-name sanitisation.
//!
//! The illegal set is the union of the Windows reserved characters, which
//! also covers the path separators of every common platform:
//! `: * ? \ / < > | "`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters stripped from file and folder names.
pub const ILLEGAL_FILENAME_CHARS: &[char] = &[':', '*', '?', '\\', '/', '<', '>', '|', '"'];

static RE_ILLEGAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[:*?\\/<>|"]"#).unwrap());

/// Remove every illegal character from a single name component.
pub fn sanitize_file_name(name: &str) -> String {
    RE_ILLEGAL.replace_all(name, "").into_owned()
}

/// Sanitize `name` for use as the last component of a path.
///
/// `None` when nothing usable is left: the empty string, or a `.` / `..`
/// that would point at the directory itself or its parent.
pub fn sanitize_component(name: &str) -> Option<String> {
    let clean = sanitize_file_name(name);
    match clean.as_str() {
        "" | "." | ".." => None,
        _ => Some(clean),
    }
}

/// True when `name` contains no illegal character.
#[cfg(test)]
pub(crate) fn is_sanitized(name: &str) -> bool {
    !RE_ILLEGAL.is_match(name)
}
