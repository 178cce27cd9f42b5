use log::{debug, error, info};

use omsetup_backend::{Catalog, InstallError, resolve};
use omsetup_install::{Downloader, install_libraries, install_omc_diff, installer_for, show_version};
use omsetup_platform::Platform;

use crate::cli::Args;

/// Executable name behind an apt package, for post-install verification.
/// Packages without a known executable are installed but not verified.
fn program_for_package(package: &str) -> Option<&'static str> {
    match package {
        "omc" => Some("omc"),
        "omsimulator" => Some("OMSimulator"),
        _ => None,
    }
}

/// Run the whole setup: resolve, install, verify, then libraries and tools.
///
/// Returns the resolved version string on success.
///
/// # Errors
/// Propagates the first resolution or installation failure. Verification
/// failures are deferred: the remaining steps still run, then the first
/// failing program is reported.
pub async fn run(args: &Args, platform: Platform) -> Result<String, InstallError> {
    let catalog = Catalog::builtin()?;
    debug!(
        "Available versions for {platform}: {:?}",
        catalog.available_versions(platform)
    );

    let entries = catalog.entries(platform).map_err(InstallError::from)?;
    let release = resolve(&args.version, entries).map_err(InstallError::from)?;
    info!(
        "Installing OpenModelica {} ({}bit) on {platform}",
        release.version, args.arch
    );

    let client = reqwest::Client::new();
    let sudo = platform == Platform::Linux;
    let installer = installer_for(platform, client.clone(), sudo);
    installer.install(&args.packages, release, args.arch).await?;

    // A broken binary should not stop the remaining steps; remember the
    // first failure and surface it at the end.
    let mut failed_program = None;
    for package in &args.packages {
        let Some(program) = program_for_package(package) else {
            debug!("No verification command known for package {package}");
            continue;
        };
        if let Err(err) = show_version(program).await {
            error!("Verification of {program} failed: {err}");
            failed_program.get_or_insert(program);
        }
    }

    if !args.libraries.is_empty() {
        install_libraries(&args.libraries).await?;
    }

    if args.omc_diff {
        let downloader = Downloader::new(client);
        install_omc_diff(&downloader, platform, sudo).await?;
    }

    if let Some(program) = failed_program {
        return Err(InstallError::VerificationFailed {
            program: program.to_string(),
        });
    }
    Ok(release.version.clone())
}
