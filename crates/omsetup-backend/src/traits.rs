use async_trait::async_trait;

use omsetup_platform::{BitWidth, Platform};

use crate::catalog::ReleaseEntry;
use crate::error::InstallError;

/// Platform-specific installation strategy.
///
/// One implementation exists per supported operating system. The variant is
/// selected once at startup from the injected [`Platform`] and held as a
/// single strategy object, so no platform switch leaks into the install
/// flow itself.
#[async_trait]
pub trait PlatformInstaller: Send + Sync {
    /// Platform this strategy installs for.
    fn platform(&self) -> Platform;

    /// Install `packages` from the resolved `release` for the requested bit
    /// width. Strictly sequential; returns after the last package finished.
    ///
    /// # Errors
    /// Architecture mismatches, unavailable distributions, download
    /// failures and non-zero subprocess exits all fail the whole operation
    /// immediately; nothing is retried here.
    async fn install(
        &self,
        packages: &[String],
        release: &ReleaseEntry,
        bit: BitWidth,
    ) -> Result<(), InstallError>;
}
