//! Installation of the `omc-diff` result comparison tool.
//!
//! Linux gets a prebuilt tarball unpacked into `/usr/bin`; the Windows
//! installer already ships the tool, and no macOS build exists.

use log::info;

use omsetup_backend::InstallError;
use omsetup_platform::Platform;

use crate::download::Downloader;
use crate::exec::run;

const OMC_DIFF_URL: &str =
    "https://github.com/AnHeuermann/omc-diff/releases/download/v0.1/linux-64.tar.gz";

/// Install `omc-diff` for the given platform.
///
/// # Errors
/// Returns [`InstallError::OmcDiffUnavailable`] on macOS and propagates
/// download and extraction failures on Linux.
pub async fn install_omc_diff(
    downloader: &Downloader,
    platform: Platform,
    sudo: bool,
) -> Result<(), InstallError> {
    match platform {
        Platform::Windows => {
            info!("Windows version of OpenModelica already installs omc-diff.");
            Ok(())
        }
        Platform::MacOs => Err(InstallError::OmcDiffUnavailable {
            platform: platform.as_str().to_string(),
        }),
        Platform::Linux => {
            // Scratch dir removed on drop, including the error paths.
            let scratch = tempfile::tempdir()?;
            let tarball = downloader
                .fetch_cached(OMC_DIFF_URL, scratch.path(), false)
                .await?;

            info!("Extracting {} into /usr/bin", tarball.display());
            let mut command = if sudo {
                let mut command = tokio::process::Command::new("sudo");
                command.arg("tar");
                command
            } else {
                tokio::process::Command::new("tar")
            };
            command.arg("-xvf");
            command.arg(&tarball);
            command.args(["-C", "/usr/bin/"]);
            run(command).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use omsetup_backend::InstallError;
    use omsetup_platform::Platform;

    use super::install_omc_diff;
    use crate::download::Downloader;

    #[tokio::test]
    async fn windows_is_a_no_op() {
        let downloader = Downloader::new(reqwest::Client::new());
        install_omc_diff(&downloader, Platform::Windows, false)
            .await
            .expect("bundled tool means nothing to do");
    }

    #[tokio::test]
    async fn macos_has_no_build() {
        let downloader = Downloader::new(reqwest::Client::new());
        let result = install_omc_diff(&downloader, Platform::MacOs, false).await;
        assert!(matches!(
            result,
            Err(InstallError::OmcDiffUnavailable { ref platform }) if platform == "mac"
        ));
    }
}
