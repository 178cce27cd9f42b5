//! Linux install flow: register the OpenModelica apt repository and install
//! the requested packages through `apt-get`.

use async_trait::async_trait;
use log::{debug, info};
use tokio::process::Command;

use omsetup_backend::{Channel, InstallError, PlatformInstaller, ReleaseEntry};
use omsetup_platform::{BitWidth, Platform};

use crate::exec::{run, run_with_stdin};

const SOURCES_LIST: &str = "/etc/apt/sources.list.d/openmodelica.list";
const KEYRING: &str = "/usr/share/keyrings/openmodelica-keyring.gpg";
const SIGNING_KEY_URL: &str = "https://build.openmodelica.org/apt/openmodelica.asc";

/// Remap the dpkg architecture for the requested bit width.
///
/// 32-bit requests on 64-bit hosts select the matching 32-bit port; 64-bit
/// requests on natively 32-bit hosts cannot be satisfied.
fn remap_architecture(arch: &str, bit: BitWidth) -> Result<String, InstallError> {
    match (arch, bit) {
        ("amd64", BitWidth::ThirtyTwo) => Ok("i386".to_string()),
        ("arm64", BitWidth::ThirtyTwo) => Ok("armhf".to_string()),
        ("amd64" | "arm64", BitWidth::SixtyFour)
        | ("armhf" | "i386", BitWidth::ThirtyTwo) => Ok(arch.to_string()),
        ("armhf" | "i386", BitWidth::SixtyFour) => Err(InstallError::UnsupportedBitWidth {
            arch: arch.to_string(),
            bit: "64",
        }),
        _ => Err(InstallError::UnknownArchitecture {
            arch: arch.to_string(),
        }),
    }
}

/// One line of `sources.list` syntax pinning the repository to the resolved
/// architecture, distribution and channel.
fn sources_entry(arch: &str, address: &str, codename: &str, channel: Channel) -> String {
    format!("deb [arch={arch} signed-by={KEYRING}] {address} {codename} {channel}\n")
}

pub struct AptInstaller {
    client: reqwest::Client,
    sudo: bool,
}

impl AptInstaller {
    #[must_use]
    pub fn new(client: reqwest::Client, sudo: bool) -> Self {
        Self { client, sudo }
    }

    /// Build a command, prefixed with `sudo` when root rights are required.
    fn command(&self, program: &str, args: &[&str]) -> Command {
        if self.sudo {
            let mut command = Command::new("sudo");
            command.arg(program);
            command.args(args);
            command
        } else {
            let mut command = Command::new(program);
            command.args(args);
            command
        }
    }

    async fn host_architecture(&self) -> Result<String, InstallError> {
        let mut command = Command::new("dpkg");
        command.arg("--print-architecture");
        let output = run(command).await?;
        Ok(output.trim().to_string())
    }

    async fn distribution_codename(&self) -> Result<String, InstallError> {
        let mut command = Command::new("lsb_release");
        command.arg("-cs");
        let output = run(command).await?;
        Ok(output.trim().to_string())
    }

    /// Probe the repository for the distribution before touching apt state.
    /// Channel entries track whatever the repository currently serves, so
    /// only pinned numeric releases need the probe.
    async fn check_distribution(
        &self,
        release: &ReleaseEntry,
        codename: &str,
    ) -> Result<(), InstallError> {
        if Channel::from_literal(&release.version).is_some() {
            return Ok(());
        }

        let url = format!("{}dists/{codename}", release.address);
        debug!("Probing {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| InstallError::network("distribution probe", err))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(InstallError::DistributionUnavailable {
                codename: codename.to_string(),
                version: release.version.clone(),
            });
        }
        Ok(())
    }

    /// Replace any previous repository registration: old source list and
    /// keyring go away, the current signing key and a fresh sources entry
    /// come in.
    async fn register_repository(
        &self,
        release: &ReleaseEntry,
        arch: &str,
        codename: &str,
    ) -> Result<(), InstallError> {
        run(self.command("rm", &["-f", SOURCES_LIST, KEYRING])).await?;

        info!("Fetching OpenModelica signing key");
        let response = self
            .client
            .get(SIGNING_KEY_URL)
            .send()
            .await
            .map_err(|err| InstallError::network("signing key fetch", err))?;
        if !response.status().is_success() {
            return Err(InstallError::Network {
                operation: "signing key fetch",
                details: format!("Server responded with {}", response.status()),
            });
        }
        let key = response
            .bytes()
            .await
            .map_err(|err| InstallError::network("signing key fetch", err))?;

        run_with_stdin(self.command("gpg", &["--dearmor", "-o", KEYRING]), &key).await?;

        let entry = sources_entry(arch, &release.address, codename, release.channel);
        run_with_stdin(self.command("tee", &[SOURCES_LIST]), entry.as_bytes()).await?;
        Ok(())
    }

    async fn apt_install(
        &self,
        packages: &[String],
        release: &ReleaseEntry,
    ) -> Result<(), InstallError> {
        info!("Running apt-get install");
        run(self.command("apt-get", &["clean"])).await?;
        run(self.command("apt-get", &["update"])).await?;

        for package in packages {
            // Nightly entries and entries without a pin install whatever apt
            // currently serves.
            if release.channel == Channel::Nightly || release.package_name.is_none() {
                run(self.command("apt-get", &["install", package, "-qy"])).await?;
            } else if let Some(pin) = &release.package_name {
                let pinned = format!("{package}={pin}");
                run(self.command("apt-get", &["install", &pinned, "-V", "-qy"])).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PlatformInstaller for AptInstaller {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    async fn install(
        &self,
        packages: &[String],
        release: &ReleaseEntry,
        bit: BitWidth,
    ) -> Result<(), InstallError> {
        let host_arch = self.host_architecture().await?;
        let arch = remap_architecture(&host_arch, bit)?;
        debug!("Using apt architecture {arch}");

        let codename = self.distribution_codename().await?;
        self.check_distribution(release, &codename).await?;
        self.register_repository(release, &arch, &codename).await?;
        self.apt_install(packages, release).await
    }
}
