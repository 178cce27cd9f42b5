use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppPathsError {
    #[error("Could not determine cache directory")]
    CacheDirUnavailable,
}

/// Locations omsetup owns on disk. Only the persistent installer cache for
/// now; scratch space is always a fresh temporary directory owned by the
/// running install.
pub struct AppPaths {
    pub cache_dir: PathBuf,
}

impl AppPaths {
    /// Build application paths for the current platform.
    ///
    /// # Errors
    /// Returns an error when the user cache directory cannot be determined.
    pub fn new() -> Result<Self, AppPathsError> {
        Ok(Self {
            cache_dir: dirs::cache_dir()
                .ok_or(AppPathsError::CacheDirUnavailable)?
                .join("omsetup"),
        })
    }

    /// Directory holding cached installer artifacts, keyed by download URL.
    #[must_use]
    pub fn installers_dir(&self) -> PathBuf {
        self.cache_dir.join("installers")
    }

    /// Ensure all application directories exist on disk.
    ///
    /// # Errors
    /// Returns an error if any directory cannot be created.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.installers_dir())?;
        Ok(())
    }
}
