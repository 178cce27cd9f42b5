//! macOS install flow: fetch the package archive and hand it to the system
//! package installer, targeting the current user's home directory.

use async_trait::async_trait;
use log::info;
use tokio::process::Command;

use omsetup_backend::{Channel, InstallError, PlatformInstaller, ReleaseEntry};
use omsetup_platform::{BitWidth, Platform};

use crate::download::Downloader;
use crate::exec::run;

pub struct MacInstaller {
    downloader: Downloader,
}

impl MacInstaller {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            downloader: Downloader::new(client),
        }
    }
}

#[async_trait]
impl PlatformInstaller for MacInstaller {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    // The package bundles everything, so the package list does not influence
    // the macOS flow.
    async fn install(
        &self,
        _packages: &[String],
        release: &ReleaseEntry,
        bit: BitWidth,
    ) -> Result<(), InstallError> {
        if let Some(release_arch) = release.arch.as_deref()
            && release_arch != bit.as_str()
        {
            return Err(InstallError::ArchitectureMismatch {
                requested: bit.as_str().to_string(),
                release: release_arch.to_string(),
            });
        }

        // Scratch dir removed on drop, including every error path below.
        let scratch = tempfile::tempdir()?;

        let ignore_cache = release.channel == Channel::Nightly;
        let package = self
            .downloader
            .fetch_cached(&release.address, scratch.path(), ignore_cache)
            .await?;

        info!("Running installer {}", package.display());
        let mut command = Command::new("installer");
        command.arg("-pkg");
        command.arg(&package);
        command.args(["-target", "CurrentUserHomeDirectory"]);
        run(command).await?;

        Ok(())
    }
}
