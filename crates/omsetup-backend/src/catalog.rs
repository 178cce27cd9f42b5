use serde::Deserialize;
use std::collections::HashSet;

use omsetup_platform::Platform;

use crate::error::{CatalogError, ResolveError};
use crate::types::Channel;

/// One installable OpenModelica build for one platform.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseEntry {
    /// Canonical version string: strict `X.Y.Z`, a channel literal, or a
    /// nightly identifier like `1.26.0-dev-37`.
    pub version: String,

    /// Package-manager pin selecting this exact build; absent for channel
    /// entries that track whatever apt currently serves.
    #[serde(default, rename = "aptname")]
    pub package_name: Option<String>,

    #[serde(rename = "type")]
    pub channel: Channel,

    /// Bit width of the artifact; only installer-executable platforms
    /// record it.
    #[serde(default)]
    pub arch: Option<String>,

    /// Download URL of the installer artifact, or the apt repository root
    /// on Linux.
    pub address: String,
}

const BUILTIN: &str = include_str!("versions.json");

/// Immutable per-platform table of known releases. Loaded once at startup
/// and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    linux: Vec<ReleaseEntry>,
    windows: Vec<ReleaseEntry>,
    mac: Vec<ReleaseEntry>,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    linux: Vec<ReleaseEntry>,
    #[serde(default)]
    windows: Vec<ReleaseEntry>,
    #[serde(default)]
    mac: Vec<ReleaseEntry>,
}

impl Catalog {
    /// Load the catalog embedded at build time.
    ///
    /// # Errors
    /// Returns an error if the embedded data is malformed; that is a build
    /// defect, not a runtime condition.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN)
    }

    /// Parse a catalog from JSON keyed by platform name.
    ///
    /// # Errors
    /// Returns an error on malformed JSON or when a platform lists the same
    /// version twice.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;

        let catalog = Self {
            linux: raw.linux,
            windows: raw.windows,
            mac: raw.mac,
        };
        for platform in [Platform::Linux, Platform::Windows, Platform::MacOs] {
            ensure_unique_versions(platform, catalog.platform_entries(platform))?;
        }
        Ok(catalog)
    }

    fn platform_entries(&self, platform: Platform) -> &[ReleaseEntry] {
        match platform {
            Platform::Linux => &self.linux,
            Platform::Windows => &self.windows,
            Platform::MacOs => &self.mac,
        }
    }

    /// Release list for `platform`, in catalog-declaration order.
    ///
    /// # Errors
    /// Returns [`ResolveError::UnsupportedPlatform`] when the catalog has no
    /// releases for the platform.
    pub fn entries(&self, platform: Platform) -> Result<&[ReleaseEntry], ResolveError> {
        let entries = self.platform_entries(platform);
        if entries.is_empty() {
            return Err(ResolveError::UnsupportedPlatform {
                platform: platform.to_string(),
            });
        }
        Ok(entries)
    }

    /// All version strings known for `platform`; empty for unsupported
    /// platforms.
    #[must_use]
    pub fn available_versions(&self, platform: Platform) -> Vec<&str> {
        self.platform_entries(platform)
            .iter()
            .map(|entry| entry.version.as_str())
            .collect()
    }
}

fn ensure_unique_versions(
    platform: Platform,
    entries: &[ReleaseEntry],
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.version.as_str()) {
            return Err(CatalogError::DuplicateVersion {
                platform: platform.to_string(),
                version: entry.version.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use omsetup_platform::Platform;

    use super::Catalog;
    use crate::error::{CatalogError, ResolveError};
    use crate::types::Channel;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().expect("embedded catalog must be valid");
        assert!(!catalog.available_versions(Platform::Linux).is_empty());
        assert!(!catalog.available_versions(Platform::Windows).is_empty());
        assert!(!catalog.available_versions(Platform::MacOs).is_empty());
    }

    #[test]
    fn builtin_linux_catalog_has_all_channels() {
        let catalog = Catalog::builtin().unwrap();
        let versions = catalog.available_versions(Platform::Linux);

        for channel in ["release", "stable", "nightly"] {
            assert!(versions.contains(&channel), "missing channel {channel}");
        }
    }

    #[test]
    fn entry_fields_deserialize_from_catalog_schema() {
        let catalog = Catalog::from_json(
            r#"{"linux": [
                {"version": "1.18.1", "aptname": "1.18.1-1", "type": "release",
                 "address": "https://build.openmodelica.org/apt/"}
            ]}"#,
        )
        .unwrap();

        let entries = catalog.entries(Platform::Linux).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].version, "1.18.1");
        assert_eq!(entries[0].package_name.as_deref(), Some("1.18.1-1"));
        assert_eq!(entries[0].channel, Channel::Release);
        assert!(entries[0].arch.is_none());
    }

    #[test]
    fn duplicate_versions_are_rejected() {
        let result = Catalog::from_json(
            r#"{"windows": [
                {"version": "1.18.1", "type": "release", "arch": "64", "address": "https://a/x.exe"},
                {"version": "1.18.1", "type": "release", "arch": "32", "address": "https://a/y.exe"}
            ]}"#,
        );

        assert!(matches!(
            result,
            Err(CatalogError::DuplicateVersion { ref platform, ref version })
                if platform == "windows" && version == "1.18.1"
        ));
    }

    #[test]
    fn empty_platform_list_is_unsupported() {
        let catalog = Catalog::from_json(
            r#"{"linux": [
                {"version": "release", "type": "release", "address": "https://build.openmodelica.org/apt/"}
            ]}"#,
        )
        .unwrap();

        assert!(matches!(
            catalog.entries(Platform::MacOs),
            Err(ResolveError::UnsupportedPlatform { ref platform }) if platform == "mac"
        ));
    }
}
