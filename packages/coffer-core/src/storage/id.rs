//! Envelope identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Extension of the envelope file
pub const ENVELOPE_EXT: &str = "json";

/// Extension of the ciphertext blob
pub const BLOB_EXT: &str = "data";

/// Stem shared by `<id>.json` and `<id>.data`
///
/// Always a single path component: no separators, no leading dot, not
/// empty. Parsing tolerates a trailing `.json` or `.data`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvelopeId(String);

impl EnvelopeId {
    pub(crate) fn from_stem(stem: String) -> Self {
        Self(stem)
    }

    /// The stem as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `stem` is usable as-is: one path component, no leading dot
    pub(crate) fn is_valid_stem(stem: &str) -> bool {
        !stem.is_empty()
            && !stem.starts_with('.')
            && !stem.chars().any(|c| c == '/' || c == '\\' || c.is_control())
    }

    pub(crate) fn envelope_file(&self) -> String {
        format!("{}.{}", self.0, ENVELOPE_EXT)
    }

    pub(crate) fn blob_file(&self) -> String {
        format!("{}.{}", self.0, BLOB_EXT)
    }
}

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EnvelopeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let stem = s
            .strip_suffix(".json")
            .or_else(|| s.strip_suffix(".data"))
            .unwrap_or(s);

        if !Self::is_valid_stem(stem) {
            return Err(Error::EnvelopeNotFound(format!("invalid envelope id `{}`", s)));
        }
        Ok(Self(stem.to_string()))
    }
}

/// Reduce a caller-supplied filename to a single safe path component
///
/// Keeps only the final component (either separator style), replaces
/// control characters and each leading dot with `_`, and falls back to
/// `file` when nothing is left.
pub fn safe_file_name(filename: &str) -> String {
    let last = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let mut leading = true;
    let stem: String = last
        .chars()
        .map(|c| {
            if leading && c == '.' {
                return '_';
            }
            leading = false;
            if c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if stem.is_empty() {
        "file".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("report.pdf"), "report.pdf");
        assert_eq!(safe_file_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_file_name("C:\\Users\\me\\notes.txt"), "notes.txt");
        assert_eq!(safe_file_name(".bashrc"), "_bashrc");
        assert_eq!(safe_file_name(".."), "__");
        assert_eq!(safe_file_name("dir/"), "file");
        assert_eq!(safe_file_name("tab\there"), "tab_here");
    }

    #[test]
    fn test_parse_id() {
        let id: EnvelopeId = "report.pdf.1717171717".parse().unwrap();
        assert_eq!(id.as_str(), "report.pdf.1717171717");
        assert_eq!(id.envelope_file(), "report.pdf.1717171717.json");
        assert_eq!(id.blob_file(), "report.pdf.1717171717.data");
    }

    #[test]
    fn test_parse_strips_known_extensions() {
        let a: EnvelopeId = "a.txt.5.json".parse().unwrap();
        let b: EnvelopeId = "a.txt.5.data".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "a.txt.5");
    }

    #[test]
    fn test_parse_rejects_paths() {
        for bad in ["", ".json", "../x.1", "a/b.1", "a\\b.1", ".hidden.1", "nul\0.1"] {
            let result = bad.parse::<EnvelopeId>();
            assert!(matches!(result, Err(Error::EnvelopeNotFound(_))), "{:?}", bad);
        }
    }
}
