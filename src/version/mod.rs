//! Version rules for Tizen application metadata.
//!
//! Cached versions may have two or three numeric segments. Versions typed at
//! the prompt must have exactly three.

use regex::Regex;
use std::sync::OnceLock;

/// Whether a cached version can be reused as-is.
///
/// Valid iff the string splits on `.` into 2 or 3 segments that all parse as
/// unsigned integers.
pub fn is_reusable_version(version: &str) -> bool {
    parse_segments(version).is_some_and(|segments| (2..=3).contains(&segments.len()))
}

/// Bump the revision: `major.minor[.revision]` becomes `major.minor.(revision + 1)`.
///
/// A missing revision counts as 0, so `1.2` becomes `1.2.1`. Segments are
/// normalised by the integer parse (`01.02` becomes `1.2.1`). Returns `None`
/// when major or minor is missing or non-numeric, or the revision is non-numeric.
pub fn bump_revision(version: &str) -> Option<String> {
    let mut parts = version.split('.');
    let major: u64 = parts.next()?.parse().ok()?;
    let minor: u64 = parts.next()?.parse().ok()?;
    let revision = match parts.next() {
        Some(rev) => rev.parse::<u64>().ok()?.checked_add(1)?,
        None => 1,
    };
    Some(format!("{}.{}.{}", major, minor, revision))
}

/// Pad a two-segment version with a zero revision: `1.0` becomes `1.0.0`.
///
/// Three numeric segments are passed through normalised. Anything else is
/// not a usable prompt default and yields `None`.
pub fn normalize_version(version: &str) -> Option<String> {
    match parse_segments(version.trim())?.as_slice() {
        [major, minor] => Some(format!("{}.{}.0", major, minor)),
        [major, minor, revision] => Some(format!("{}.{}.{}", major, minor, revision)),
        _ => None,
    }
}

fn version_input_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("valid version pattern"))
}

/// Prompt validator for versions typed by the user.
pub fn validate_version_input(input: &str) -> Result<(), String> {
    if version_input_regex().is_match(input) {
        Ok(())
    } else {
        Err("invalid version string for tizen platform".to_string())
    }
}

fn parse_segments(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|segment| segment.parse::<u64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_revision() {
        assert_eq!(bump_revision("1.2.3").as_deref(), Some("1.2.4"));
        assert_eq!(bump_revision("1.2").as_deref(), Some("1.2.1"));
        assert_eq!(bump_revision("2.9").as_deref(), Some("2.9.1"));
        assert_eq!(bump_revision("1.0").as_deref(), Some("1.0.1"));
        assert_eq!(bump_revision("01.02.09").as_deref(), Some("1.2.10"));
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("1.0").as_deref(), Some("1.0.0"));
        assert_eq!(normalize_version("2.1.0").as_deref(), Some("2.1.0"));
        assert_eq!(normalize_version("01.2.03").as_deref(), Some("1.2.3"));
        assert_eq!(normalize_version("1"), None);
        assert_eq!(normalize_version("1.0.0-beta"), None);
        for version in ["1.0", "3.4.5"] {
            let normalized = normalize_version(version).unwrap();
            assert!(validate_version_input(&normalized).is_ok());
        }
    }

    #[test]
    fn test_bump_revision_rejects_garbage() {
        assert_eq!(bump_revision("a.b.c"), None);
        assert_eq!(bump_revision("1"), None);
        assert_eq!(bump_revision("1.x"), None);
    }

    #[test]
    fn test_reusable_versions() {
        assert!(is_reusable_version("1.2.3"));
        assert!(is_reusable_version("1.2"));
        assert!(!is_reusable_version("1"));
        assert!(!is_reusable_version("1.2.3.4"));
        assert!(!is_reusable_version("a.b.c"));
        assert!(!is_reusable_version("1..2"));
        assert!(!is_reusable_version(""));
    }

    #[test]
    fn test_validate_version_input() {
        assert!(validate_version_input("1.0.0").is_ok());
        assert!(validate_version_input("10.20.30").is_ok());
        assert!(validate_version_input("1x2y3").is_err());
        assert!(validate_version_input("1.2").is_err());
        assert!(validate_version_input("v1.2.3").is_err());
        assert!(validate_version_input("1.2.3-beta").is_err());
    }
}
