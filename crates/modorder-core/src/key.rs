//! Identifier normalization.
//!
//! Callers refer to entities in several shapes: a bare package id, a native's
//! file name, a relative or absolute path, and any of those carrying the
//! external decoration appended by the scanner. Everything is funnelled
//! through [`EntityKey::parse`] and [`path_matches`].

use std::fmt;

/// Decoration appended to scan entries that come from the external registry.
pub const EXTERNAL_SUFFIX: &str = " (external)";

/// A caller-supplied identifier with the external decoration stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    raw: String,
    external: bool,
}

impl EntityKey {
    /// Parse a caller-supplied identifier.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.strip_suffix(EXTERNAL_SUFFIX) {
            Some(stripped) => Self {
                raw: stripped.trim_end().to_string(),
                external: true,
            },
            None => Self {
                raw: trimmed.to_string(),
                external: false,
            },
        }
    }

    /// The identifier without decoration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the input carried the external decoration.
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// The final path segment of the identifier.
    pub fn file_name(&self) -> &str {
        file_name(&self.raw)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Append the external decoration to `name`.
pub fn decorate_external(name: &str) -> String {
    format!("{name}{EXTERNAL_SUFFIX}")
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Final segment of a path, treating both `/` and `\` as separators.
pub fn file_name(path: &str) -> &str {
    path.rsplit(is_separator).next().unwrap_or(path)
}

/// Returns `true` if `key` names the entity stored under `path`.
///
/// Accepts an exact match, or `key` being a trailing run of whole path
/// segments of `path` (so `nrsc.dll` and `SeamlessCoop/nrsc.dll` both match
/// `Mods/SeamlessCoop/nrsc.dll`, but `sc.dll` does not).
pub fn path_matches(path: &str, key: &str) -> bool {
    if key.is_empty() {
        return false;
    }
    if path == key {
        return true;
    }
    match path.strip_suffix(key) {
        Some(prefix) => prefix.ends_with(is_separator) || key.starts_with(is_separator),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_decoration() {
        let key = EntityKey::parse("SeamlessCoop (external)");
        assert_eq!(key.as_str(), "SeamlessCoop");
        assert!(key.is_external());
    }

    #[test]
    fn parse_plain() {
        let key = EntityKey::parse("nighter.dll");
        assert_eq!(key.as_str(), "nighter.dll");
        assert!(!key.is_external());
    }

    #[test]
    fn file_name_handles_both_separators() {
        assert_eq!(file_name("Mods/a/b.dll"), "b.dll");
        assert_eq!(file_name(r"C:\Games\mods\c.dll"), "c.dll");
        assert_eq!(file_name("plain.dll"), "plain.dll");
    }

    #[test]
    fn path_matches_segment_suffix() {
        assert!(path_matches("SeamlessCoop/nrsc.dll", "nrsc.dll"));
        assert!(path_matches("SeamlessCoop/nrsc.dll", "SeamlessCoop/nrsc.dll"));
        assert!(path_matches(r"D:\ext\nighter.dll", "nighter.dll"));
        assert!(!path_matches("SeamlessCoop/nrsc.dll", "sc.dll"));
        assert!(!path_matches("SeamlessCoop/nrsc.dll", ""));
    }
}
