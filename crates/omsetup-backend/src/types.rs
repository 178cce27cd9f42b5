use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Strict three-component release version, ordered by semantic precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ReleaseVersion {
    #[must_use]
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionComponent {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum VersionParseError {
    #[error("Expected X.Y.Z format, got: {input}")]
    InvalidFormat { input: String },
    #[error("Invalid {component} version: {value}")]
    InvalidComponent {
        component: VersionComponent,
        value: String,
    },
    #[error("Expected X.Y.Z-dev-N format, got: {input}")]
    InvalidDevFormat { input: String },
    #[error("Invalid dev build sequence number: {value}")]
    InvalidDevSequence { value: String },
}

impl FromStr for ReleaseVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let mut parts = s.split('.');
        let major_str = parts
            .next()
            .ok_or_else(|| VersionParseError::InvalidFormat {
                input: s.to_string(),
            })?;
        let minor_str = parts
            .next()
            .ok_or_else(|| VersionParseError::InvalidFormat {
                input: s.to_string(),
            })?;
        let patch_str = parts
            .next()
            .ok_or_else(|| VersionParseError::InvalidFormat {
                input: s.to_string(),
            })?;
        if parts.next().is_some() {
            return Err(VersionParseError::InvalidFormat {
                input: s.to_string(),
            });
        }

        Ok(ReleaseVersion::new(
            parse_component(major_str, VersionComponent::Major)?,
            parse_component(minor_str, VersionComponent::Minor)?,
            parse_component(patch_str, VersionComponent::Patch)?,
        ))
    }
}

fn parse_component(value: &str, component: VersionComponent) -> Result<u32, VersionParseError> {
    value
        .parse()
        .map_err(|_| VersionParseError::InvalidComponent {
            component,
            value: value.to_string(),
        })
}

/// Nightly build identifier of the form `<X.Y.Z>-dev-<N>`.
///
/// The sequence number orders numerically: `1.20.0-dev-10` is newer than
/// `1.20.0-dev-9` even though it sorts lower as a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DevVersion {
    pub base: ReleaseVersion,
    pub seq: u32,
}

impl Ord for DevVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.base.cmp(&other.base).then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for DevVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DevVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-dev-{}", self.base, self.seq)
    }
}

impl FromStr for DevVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (base_str, seq_str) =
            s.split_once("-dev-")
                .ok_or_else(|| VersionParseError::InvalidDevFormat {
                    input: s.to_string(),
                })?;

        let base = base_str.parse()?;
        let seq = seq_str
            .parse()
            .map_err(|_| VersionParseError::InvalidDevSequence {
                value: seq_str.to_string(),
            })?;

        Ok(Self { base, seq })
    }
}

/// Release track a catalog entry belongs to.
///
/// Channel entries are version-less pointers to whatever the package source
/// currently serves; the resolver never compares them numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Release,
    Stable,
    Nightly,
}

impl Channel {
    /// Interpret a specifier as a channel literal.
    #[must_use]
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "release" => Some(Self::Release),
            "stable" => Some(Self::Stable),
            "nightly" => Some(Self::Nightly),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Stable => "stable",
            Self::Nightly => "nightly",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix constraint parsed from a loose specifier such as `1` or `1.18`.
///
/// Missing components are wildcards: `1.18` matches every `1.18.*` release
/// and nothing else. This is deliberately narrower than caret semantics,
/// where `1.18` would also match `1.19.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionFilter {
    major: u32,
    minor: Option<u32>,
    patch: Option<u32>,
}

impl VersionFilter {
    #[must_use]
    pub fn matches(&self, version: ReleaseVersion) -> bool {
        self.major == version.major
            && self.minor.is_none_or(|minor| minor == version.minor)
            && self.patch.is_none_or(|patch| patch == version.patch)
    }
}

impl FromStr for VersionFilter {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.split('.');

        let major_str = parts
            .next()
            .filter(|part| !part.is_empty())
            .ok_or_else(|| VersionParseError::InvalidFormat {
                input: s.to_string(),
            })?;
        let major = parse_component(major_str, VersionComponent::Major)?;
        let minor = parts
            .next()
            .map(|part| parse_component(part, VersionComponent::Minor))
            .transpose()?;
        let patch = parts
            .next()
            .map(|part| parse_component(part, VersionComponent::Patch))
            .transpose()?;
        if parts.next().is_some() {
            return Err(VersionParseError::InvalidFormat {
                input: s.to_string(),
            });
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DevVersion, ReleaseVersion, VersionFilter};

    #[test]
    fn release_version_parses_and_displays() {
        let v: ReleaseVersion = "1.18.1".parse().unwrap();
        assert_eq!(v, ReleaseVersion::new(1, 18, 1));
        assert_eq!(v.to_string(), "1.18.1");
    }

    #[test]
    fn release_version_rejects_short_and_long_forms() {
        assert!("1.18".parse::<ReleaseVersion>().is_err());
        assert!("1".parse::<ReleaseVersion>().is_err());
        assert!("1.18.1.2".parse::<ReleaseVersion>().is_err());
        assert!("1.x.0".parse::<ReleaseVersion>().is_err());
    }

    #[test]
    fn release_version_orders_by_semantic_precedence() {
        let older: ReleaseVersion = "1.18.1".parse().unwrap();
        let newer: ReleaseVersion = "1.19.0".parse().unwrap();
        assert!(newer > older);

        let patch_older: ReleaseVersion = "1.18.0".parse().unwrap();
        assert!(older > patch_older);
    }

    #[test]
    fn dev_version_parses_base_and_sequence() {
        let v: DevVersion = "1.26.0-dev-37".parse().unwrap();
        assert_eq!(v.base, ReleaseVersion::new(1, 26, 0));
        assert_eq!(v.seq, 37);
        assert_eq!(v.to_string(), "1.26.0-dev-37");
    }

    #[test]
    fn dev_version_rejects_malformed_input() {
        assert!("1.26.0".parse::<DevVersion>().is_err());
        assert!("1.26.0-dev-".parse::<DevVersion>().is_err());
        assert!("1.26.0-dev-x7".parse::<DevVersion>().is_err());
        assert!("1.26-dev-7".parse::<DevVersion>().is_err());
    }

    #[test]
    fn dev_sequence_compares_numerically_not_lexically() {
        let nine: DevVersion = "1.20.0-dev-9".parse().unwrap();
        let ten: DevVersion = "1.20.0-dev-10".parse().unwrap();
        assert!(ten > nine, "dev-10 must beat dev-9 despite lexical order");
    }

    #[test]
    fn dev_sequence_orders_across_power_of_ten_boundaries() {
        for (lo, hi) in [(9u32, 10u32), (99, 100), (999, 1000)] {
            let lower: DevVersion = format!("1.22.0-dev-{lo}").parse().unwrap();
            let higher: DevVersion = format!("1.22.0-dev-{hi}").parse().unwrap();
            assert!(higher > lower, "dev-{hi} must beat dev-{lo}");
        }
    }

    #[test]
    fn dev_base_takes_precedence_over_sequence() {
        let old_base: DevVersion = "1.19.0-dev-500".parse().unwrap();
        let new_base: DevVersion = "1.20.0-dev-2".parse().unwrap();
        assert!(new_base > old_base);
    }

    #[test]
    fn filter_matches_prefixes_only() {
        let filter: VersionFilter = "1.18".parse().unwrap();
        assert!(filter.matches("1.18.0".parse().unwrap()));
        assert!(filter.matches("1.18.1".parse().unwrap()));
        assert!(!filter.matches("1.19.0".parse().unwrap()));
        assert!(!filter.matches("2.18.0".parse().unwrap()));
    }

    #[test]
    fn major_only_filter_spans_all_minors() {
        let filter: VersionFilter = "1".parse().unwrap();
        assert!(filter.matches("1.0.0".parse().unwrap()));
        assert!(filter.matches("1.25.3".parse().unwrap()));
        assert!(!filter.matches("2.0.0".parse().unwrap()));
    }

    #[test]
    fn exact_filter_matches_one_version() {
        let filter: VersionFilter = "1.18.1".parse().unwrap();
        assert!(filter.matches("1.18.1".parse().unwrap()));
        assert!(!filter.matches("1.18.0".parse().unwrap()));
    }

    #[test]
    fn filter_rejects_garbage() {
        assert!("".parse::<VersionFilter>().is_err());
        assert!("abc".parse::<VersionFilter>().is_err());
        assert!("1.18.1.9".parse::<VersionFilter>().is_err());
    }
}
