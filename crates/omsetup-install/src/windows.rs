//! Windows install flow: fetch the signed installer executable and run it
//! silently, then publish the new installation to the environment.

use async_trait::async_trait;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use omsetup_backend::{Channel, InstallError, PlatformInstaller, ReleaseEntry};
use omsetup_platform::{BitWidth, HideWindow as _, Platform, env_export};

use crate::download::Downloader;
use crate::exec::run;

const PROGRAM_FILES: &str = "C:\\Program Files";
const PRODUCT_PREFIX: &str = "OpenModelica";
const SCRATCH_REMOVE_ATTEMPTS: u32 = 10;

/// Confirm the requested bit width matches the artifact the release entry
/// describes.
fn ensure_architecture(bit: BitWidth, release: &ReleaseEntry) -> Result<(), InstallError> {
    let release_arch = release.arch.as_deref().unwrap_or_default();
    if bit.as_str() == release_arch {
        return Ok(());
    }
    Err(InstallError::ArchitectureMismatch {
        requested: bit.as_str().to_string(),
        release: release_arch.to_string(),
    })
}

/// Locate the installation directory the installer just created: the first
/// `OpenModelica*` directory under the parent, in name order.
fn find_install_root(parent: &Path) -> Result<PathBuf, InstallError> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(parent)?
        .flatten()
        .filter(|entry| {
            entry.path().is_dir()
                && entry
                    .file_name()
                    .to_string_lossy()
                    .starts_with(PRODUCT_PREFIX)
        })
        .map(|entry| entry.path())
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| InstallError::InstallRootNotFound {
            product: PRODUCT_PREFIX,
            parent: parent.display().to_string(),
        })
}

/// Remove the scratch directory, tolerating the installer briefly holding
/// files open after it exits. The `TempDir` drop guard still covers the
/// paths this gives up on.
async fn remove_scratch(scratch: tempfile::TempDir) {
    for attempt in 1..=SCRATCH_REMOVE_ATTEMPTS {
        match tokio::fs::remove_dir_all(scratch.path()).await {
            Ok(()) => break,
            Err(err) if attempt == SCRATCH_REMOVE_ATTEMPTS => {
                warn!(
                    "Leaving scratch directory {} behind: {err}",
                    scratch.path().display()
                );
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(200)).await,
        }
    }
    drop(scratch);
}

pub struct WindowsInstaller {
    downloader: Downloader,
}

impl WindowsInstaller {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            downloader: Downloader::new(client),
        }
    }
}

#[async_trait]
impl PlatformInstaller for WindowsInstaller {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    // The installer bundles all packages, so the package list does not
    // influence the Windows flow.
    async fn install(
        &self,
        _packages: &[String],
        release: &ReleaseEntry,
        bit: BitWidth,
    ) -> Result<(), InstallError> {
        let scratch = tempfile::tempdir()?;

        let ignore_cache = release.channel == Channel::Nightly;
        let installer = self
            .downloader
            .fetch_cached(&release.address, scratch.path(), ignore_cache)
            .await?;

        ensure_architecture(bit, release)?;

        info!("Running installer {}", installer.display());
        let mut command = Command::new(&installer);
        command.args(["/S", "/v", "/qn"]);
        command.hide_window();
        run(command).await?;

        let root = find_install_root(Path::new(PROGRAM_FILES))?;
        let bin_dir = root.join("bin");
        info!("Adding {} to PATH", bin_dir.display());
        env_export::add_search_path(&bin_dir)?;
        env_export::export_variable("OPENMODELICAHOME", &root.display().to_string())?;

        remove_scratch(scratch).await;
        Ok(())
    }
}
