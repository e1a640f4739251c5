// src/release.rs

//! Release identifiers and conversion planning
//!
//! NBDC releases are dotted numeric strings ("1.0", "2.0.1"). They are not
//! semver-compliant on their own, so ordering normalizes each release to a
//! major.minor.patch triple for comparison, with a component-wise tiebreak
//! for longer identifiers.

use crate::error::{Error, Result};
use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

fn release_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(\.\d+)*$").expect("valid release pattern"))
}

/// A data release identifier such as "1.0"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Release(String);

impl Release {
    /// Parse a release string
    ///
    /// Accepts dotted numeric identifiers only:
    /// - "1.0" and "2.0.1" parse
    /// - "v1.0", "1.0-rc1", and "" are rejected
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !release_pattern().is_match(trimmed) {
            return Err(Error::InvalidRelease(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The release string as given ("1.0")
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The git tag name for this release ("v1.0")
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }

    /// Parse a release from a git tag name
    ///
    /// Accepts "v"-prefixed release tags; anything else (branch-style tags,
    /// snapshot tags) returns None so tag listings can be filtered.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let stripped = tag.trim().strip_prefix('v')?;
        Self::parse(stripped).ok()
    }

    /// Numeric components of the identifier
    fn components(&self) -> Vec<u64> {
        // Parse cannot fail: the release pattern admits only digit runs.
        self.0.split('.').map(|p| p.parse::<u64>().unwrap_or(0)).collect()
    }

    /// Normalize to a semver version for comparison
    ///
    /// Releases shorter than three components are zero-padded:
    /// "1.0" compares as 1.0.0.
    fn to_semver(&self) -> Version {
        let parts = self.components();
        Version::new(
            parts.first().copied().unwrap_or(0),
            parts.get(1).copied().unwrap_or(0),
            parts.get(2).copied().unwrap_or(0),
        )
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Ord for Release {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_semver()
            .cmp(&other.to_semver())
            .then_with(|| self.components().cmp(&other.components()))
            // Keep Ord consistent with Eq for identifiers that only differ
            // textually ("1.0" vs "1.00")
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Release {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Releases present in the source file but not yet converted
///
/// Exactly the set difference between `available` and `converted`, in
/// ascending version order with duplicates removed.
pub fn pending(available: &[Release], converted: &BTreeSet<Release>) -> Vec<Release> {
    let mut out: Vec<Release> = available
        .iter()
        .filter(|r| !converted.contains(*r))
        .cloned()
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_releases() {
        assert_eq!(Release::parse("1.0").unwrap().as_str(), "1.0");
        assert_eq!(Release::parse("2.0.1").unwrap().as_str(), "2.0.1");
        assert_eq!(Release::parse("10").unwrap().as_str(), "10");
        assert_eq!(Release::parse(" 1.0 ").unwrap().as_str(), "1.0");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Release::parse("").is_err());
        assert!(Release::parse("v1.0").is_err());
        assert!(Release::parse("1.0-rc1").is_err());
        assert!(Release::parse("1..0").is_err());
        assert!(Release::parse("latest").is_err());
    }

    #[test]
    fn test_tag_round_trip() {
        let rel = Release::parse("1.0").unwrap();
        assert_eq!(rel.tag(), "v1.0");
        assert_eq!(Release::from_tag("v1.0"), Some(rel));
    }

    #[test]
    fn test_from_tag_ignores_non_release_tags() {
        assert_eq!(Release::from_tag("snapshot-2024"), None);
        assert_eq!(Release::from_tag("1.0"), None); // missing v prefix
        assert_eq!(Release::from_tag("vlatest"), None);
    }

    #[test]
    fn test_ordering_normalizes_short_versions() {
        let v1 = Release::parse("1.0").unwrap();
        let v2 = Release::parse("2.0").unwrap();
        let v10 = Release::parse("10.0").unwrap();
        assert!(v1 < v2);
        assert!(v2 < v10); // numeric, not lexicographic
        assert!(Release::parse("1.0").unwrap() < Release::parse("1.0.1").unwrap());
    }

    #[test]
    fn test_ordering_four_components() {
        let a = Release::parse("1.0.0.1").unwrap();
        let b = Release::parse("1.0.0.2").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_pending_is_set_difference() {
        let available = vec![
            Release::parse("2.0").unwrap(),
            Release::parse("1.0").unwrap(),
            Release::parse("3.0").unwrap(),
        ];
        let converted: BTreeSet<Release> = [Release::parse("2.0").unwrap()].into_iter().collect();

        let plan = pending(&available, &converted);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].as_str(), "1.0");
        assert_eq!(plan[1].as_str(), "3.0");
    }

    #[test]
    fn test_pending_empty_when_all_converted() {
        let available = vec![Release::parse("1.0").unwrap()];
        let converted: BTreeSet<Release> = available.iter().cloned().collect();
        assert!(pending(&available, &converted).is_empty());
    }

    #[test]
    fn test_pending_dedups_discovered_releases() {
        let available = vec![
            Release::parse("1.0").unwrap(),
            Release::parse("1.0").unwrap(),
        ];
        let plan = pending(&available, &BTreeSet::new());
        assert_eq!(plan.len(), 1);
    }
}
