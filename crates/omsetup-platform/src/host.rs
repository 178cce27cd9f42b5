use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Operating system an install runs on.
///
/// Detected once in `main` from [`Platform::current`] and passed explicitly
/// into the resolver and the installer factory; nothing below the entry point
/// reads the ambient host OS, which keeps every platform variant testable
/// from a single process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
}

impl Platform {
    /// Detect the platform of the running process, or `None` when the host
    /// OS has no installer variant.
    #[must_use]
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            "macos" => Some(Self::MacOs),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::MacOs => "mac",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested bit width of the installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitWidth {
    ThirtyTwo,
    SixtyFour,
}

impl BitWidth {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThirtyTwo => "32",
            Self::SixtyFour => "64",
        }
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Not a valid architecture {input}, expected \"64\" or \"32\"")]
pub struct BitWidthParseError {
    input: String,
}

impl FromStr for BitWidth {
    type Err = BitWidthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "32" => Ok(Self::ThirtyTwo),
            "64" => Ok(Self::SixtyFour),
            other => Err(BitWidthParseError {
                input: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BitWidth, Platform};

    #[test]
    fn current_platform_is_detected_on_supported_hosts() {
        // The test suite only runs on the three supported platforms.
        let platform = Platform::current().expect("host platform should be supported");
        assert!(matches!(
            platform,
            Platform::Linux | Platform::Windows | Platform::MacOs
        ));
    }

    #[test]
    fn platform_display_matches_catalog_keys() {
        assert_eq!(Platform::Linux.to_string(), "linux");
        assert_eq!(Platform::Windows.to_string(), "windows");
        assert_eq!(Platform::MacOs.to_string(), "mac");
    }

    #[test]
    fn bit_width_parses_valid_inputs() {
        assert_eq!("64".parse::<BitWidth>().unwrap(), BitWidth::SixtyFour);
        assert_eq!("32".parse::<BitWidth>().unwrap(), BitWidth::ThirtyTwo);
        assert_eq!(" 64 ".parse::<BitWidth>().unwrap(), BitWidth::SixtyFour);
    }

    #[test]
    fn bit_width_rejects_other_inputs() {
        assert!("16".parse::<BitWidth>().is_err());
        assert!("sixty-four".parse::<BitWidth>().is_err());
        assert!("".parse::<BitWidth>().is_err());
    }

    #[test]
    fn bit_width_display_round_trips() {
        assert_eq!(BitWidth::SixtyFour.to_string(), "64");
        assert_eq!(BitWidth::ThirtyTwo.to_string(), "32");
    }
}
