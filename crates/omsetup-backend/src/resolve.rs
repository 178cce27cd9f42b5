//! Map a loose version specifier onto exactly one catalog entry.
//!
//! The resolver is a pure "latest matching" search: when more than one
//! release satisfies the specifier, the highest version wins, never the
//! first or lowest.

use crate::catalog::ReleaseEntry;
use crate::error::ResolveError;
use crate::types::{Channel, DevVersion, ReleaseVersion, VersionFilter};

/// Resolve `specifier` against one platform's release list.
///
/// Channel literals (`release`, `stable`, `nightly`) look themselves up
/// directly. Numeric specifiers (`1`, `1.18`, `1.18.1`) select the maximum
/// strict release matching the prefix, falling back to the newest matching
/// `X.Y.Z-dev-N` nightly build when no strict release qualifies.
///
/// # Errors
/// [`ResolveError::SpecifierNotFound`] when nothing satisfies the
/// specifier, [`ResolveError::MissingCatalogEntry`] when a computed match
/// key has no catalog row.
pub fn resolve<'a>(
    specifier: &str,
    entries: &'a [ReleaseEntry],
) -> Result<&'a ReleaseEntry, ResolveError> {
    let key = match_key(specifier, entries)?;
    entries
        .iter()
        .find(|entry| entry.version == key)
        .ok_or(ResolveError::MissingCatalogEntry { version: key })
}

fn match_key(specifier: &str, entries: &[ReleaseEntry]) -> Result<String, ResolveError> {
    let specifier = specifier.trim();

    if Channel::from_literal(specifier).is_some() {
        return Ok(specifier.to_string());
    }

    // Specifiers that already name a dev build skip range resolution and are
    // looked up verbatim. Narrow special case; do not extend it to
    // participate in maximization.
    if specifier.contains("dev") {
        return Ok(specifier.to_string());
    }

    let Ok(filter) = specifier.parse::<VersionFilter>() else {
        return Err(ResolveError::SpecifierNotFound {
            specifier: specifier.to_string(),
        });
    };

    if let Some(max) = max_release(entries, filter) {
        return Ok(max.to_string());
    }
    if let Some(max) = max_dev_build(entries, filter) {
        return Ok(max.to_string());
    }

    Err(ResolveError::SpecifierNotFound {
        specifier: specifier.to_string(),
    })
}

/// Maximum strict `X.Y.Z` release satisfying the filter. Channel literals
/// and dev-tagged versions never participate here.
fn max_release(entries: &[ReleaseEntry], filter: VersionFilter) -> Option<ReleaseVersion> {
    entries
        .iter()
        .filter_map(|entry| entry.version.parse::<ReleaseVersion>().ok())
        .filter(|version| filter.matches(*version))
        .max()
}

/// Maximum `X.Y.Z-dev-N` build whose base satisfies the filter. Sequence
/// numbers compare numerically through [`DevVersion`]'s ordering.
fn max_dev_build(entries: &[ReleaseEntry], filter: VersionFilter) -> Option<DevVersion> {
    entries
        .iter()
        .filter_map(|entry| entry.version.parse::<DevVersion>().ok())
        .filter(|dev| filter.matches(dev.base))
        .max()
}
