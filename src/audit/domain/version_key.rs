use serde::{Serialize, Serializer};
use std::fmt;

/// One dot-separated component of a version core.
///
/// The variant order defines the cross-type rule: every `Numeric` sorts
/// before every `Literal`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionComponent {
    Numeric(u64),
    Literal(String),
}

impl VersionComponent {
    fn parse(part: &str) -> Self {
        if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = part.parse::<u64>() {
                return VersionComponent::Numeric(value);
            }
        }
        VersionComponent::Literal(part.to_string())
    }
}

impl Default for VersionComponent {
    fn default() -> Self {
        VersionComponent::Numeric(0)
    }
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionComponent::Numeric(value) => write!(f, "{}", value),
            VersionComponent::Literal(value) => write!(f, "{}", value),
        }
    }
}

/// Comparable key for a loosely formatted version string.
///
/// Ordering is lexicographic over `(major, minor, patch, extra)`. The extra
/// tag (anything after the first `-` or `+`) compares as a plain string, so
/// `1.2.0 < 1.2.0-rc1`.
///
/// # Examples
/// ```
/// use govuln::audit::domain::VersionKey;
///
/// assert_eq!(VersionKey::parse("v1.2.0"), VersionKey::parse("1.2.0"));
/// assert_eq!(VersionKey::parse("go1.21"), VersionKey::parse("1.21.0"));
/// assert!(VersionKey::parse("v1.9.9") < VersionKey::parse("v1.10.0"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey {
    major: VersionComponent,
    minor: VersionComponent,
    patch: VersionComponent,
    extra: String,
}

impl VersionKey {
    /// Parses `raw`, falling back to the minimum key `0.0.0` when the input
    /// has fewer than two core components.
    pub fn parse(raw: &str) -> Self {
        Self::try_parse(raw).unwrap_or_default()
    }

    fn try_parse(raw: &str) -> Option<Self> {
        let stripped = strip_prefix(raw.trim());

        let (core, extra) = match stripped.find(|c| c == '-' || c == '+') {
            Some(index) => (&stripped[..index], &stripped[index + 1..]),
            None => (stripped, ""),
        };

        let mut parts = core.split('.');
        let major = VersionComponent::parse(parts.next()?);
        let minor = VersionComponent::parse(parts.next()?);
        let patch = parts.next().map(VersionComponent::parse).unwrap_or_default();

        Some(Self {
            major,
            minor,
            patch,
            extra: extra.to_string(),
        })
    }

    pub fn major(&self) -> &VersionComponent {
        &self.major
    }

    pub fn minor(&self) -> &VersionComponent {
        &self.minor
    }

    pub fn patch(&self) -> &VersionComponent {
        &self.patch
    }

    pub fn extra(&self) -> &str {
        &self.extra
    }

    pub fn is_minimum(&self) -> bool {
        *self == Self::default()
    }
}

/// `v1.2.3` and `go1.21.0` both carry a prefix in front of the core. The
/// `go` prefix only counts when a digit follows, so literal words are kept.
fn strip_prefix(raw: &str) -> &str {
    if let Some(rest) = raw.strip_prefix('v') {
        return rest;
    }
    if let Some(rest) = raw.strip_prefix("go") {
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return rest;
        }
    }
    raw
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.extra.is_empty() {
            write!(f, "-{}", self.extra)?;
        }
        Ok(())
    }
}

impl Serialize for VersionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn key(raw: &str) -> VersionKey {
        VersionKey::parse(raw)
    }

    #[test]
    fn test_prefixes_are_ignored() {
        assert_eq!(key("v1.2.0"), key("1.2.0"));
        assert_eq!(key("go1.2.0"), key("1.2.0"));
        assert_eq!(key(" v1.2.0 "), key("1.2.0"));
    }

    #[test]
    fn test_missing_patch_defaults_to_zero() {
        assert_eq!(key("go1.21"), key("1.21.0"));
        assert_eq!(key("go1.21").to_string(), "1.21.0");
    }

    #[test]
    fn test_go_prefix_requires_a_digit() {
        let parsed = key("gopher.1.0");
        assert_eq!(
            parsed.major(),
            &VersionComponent::Literal("gopher".to_string())
        );
    }

    #[test]
    fn test_unparseable_input_is_minimum() {
        assert!(key("").is_minimum());
        assert!(key("v").is_minimum());
        assert!(key("latest").is_minimum());
        assert!(key("7").is_minimum());
        assert_eq!(key("garbage"), key("0.0.0"));
    }

    #[test]
    fn test_numeric_comparison_is_not_lexical() {
        assert!(key("v1.9.0") < key("v1.10.0"));
        assert!(key("v0.0.20") > key("v0.0.3"));
        assert!(key("v2.0.0") > key("v1.99.99"));
    }

    #[test]
    fn test_extra_tag_compares_as_string() {
        assert_eq!(key("v1.2.0-rc1").extra(), "rc1");
        assert!(key("v1.2.0") < key("v1.2.0-rc1"));
        assert!(key("v1.2.0-alpha") < key("v1.2.0-beta"));
        assert_eq!(key("v1.2.0+incompatible").extra(), "incompatible");
    }

    #[test]
    fn test_pseudo_version_keeps_full_extra() {
        let parsed = key("v0.0.0-20230101120000-abcdef123456");
        assert_eq!(parsed.extra(), "20230101120000-abcdef123456");
        assert!(parsed < key("v0.0.1"));
    }

    #[test]
    fn test_numeric_sorts_before_literal() {
        assert!(key("1.2.0") < key("1.x.0"));
        assert!(key("1.999.0") < key("1.x.0"));
        assert!(key("1.x.0") < key("1.y.0"));
        assert!(key("1.x.0") < key("2.0.0"));
    }

    #[test]
    fn test_order_is_total_and_transitive() {
        let mut keys: Vec<VersionKey> = [
            "v1.10.0", "1.2", "go1.2.0", "1.x.0", "v0.0.0-2023", "junk", "1.2.0-rc1", "v1.2.1",
        ]
        .iter()
        .map(|raw| key(raw))
        .collect();
        keys.sort();

        for window in keys.windows(2) {
            assert_ne!(window[0].cmp(&window[1]), Ordering::Greater);
        }
        for a in &keys {
            for b in &keys {
                assert_eq!(a.cmp(b), b.cmp(a).reverse());
                for c in &keys {
                    if a <= b && b <= c {
                        assert!(a <= c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_string_gives_equal_keys() {
        for raw in ["v1.2.3", "1.x", "", "go1.22.4", "v0.0.0-2024-abc"] {
            assert_eq!(key(raw).cmp(&key(raw)), Ordering::Equal);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(key("v1.0.0").to_string(), "1.0.0");
        assert_eq!(key("v1.2.0-rc1").to_string(), "1.2.0-rc1");
        assert_eq!(key("nonsense").to_string(), "0.0.0");
    }

    #[test]
    fn test_serializes_as_display_string() {
        let json = serde_json::to_string(&key("v1.2.0")).unwrap();
        assert_eq!(json, "\"1.2.0\"");
    }
}
