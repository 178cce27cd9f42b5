//! Platform-specific installation flows for OpenModelica.
//!
//! The three [`PlatformInstaller`] implementations live here, together with
//! the shared plumbing they need: subprocess execution, cached artifact
//! download, post-install verification, Modelica library installation and
//! the auxiliary omc-diff install.

pub mod download;
pub mod exec;
pub mod libraries;
pub mod linux;
pub mod macos;
pub mod omc_diff;
pub mod verify;
pub mod windows;

pub use download::Downloader;
pub use libraries::{LibrarySpec, install_libraries};
pub use linux::AptInstaller;
pub use macos::MacInstaller;
pub use omc_diff::install_omc_diff;
pub use verify::show_version;
pub use windows::WindowsInstaller;

use omsetup_backend::PlatformInstaller;
use omsetup_platform::Platform;

/// Select the install strategy for the injected host platform.
///
/// Called once at startup; the returned strategy drives the whole install.
#[must_use]
pub fn installer_for(
    platform: Platform,
    client: reqwest::Client,
    sudo: bool,
) -> Box<dyn PlatformInstaller> {
    match platform {
        Platform::Linux => Box::new(AptInstaller::new(client, sudo)),
        Platform::Windows => Box::new(WindowsInstaller::new(client)),
        Platform::MacOs => Box::new(MacInstaller::new(client)),
    }
}
