//! Modelica library installation through the OpenModelica package manager.
//!
//! All requested libraries are folded into one generated `.mos` script that
//! runs in a single `omc` invocation; each library prints a success or
//! failure marker so CI logs show exactly what happened.

use log::{debug, info};
use std::fmt::Write as _;
use std::io::Write as _;
use tokio::process::Command;

use omsetup_backend::InstallError;

use crate::exec::run;

/// One `<name> <version-constraint>` library request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySpec {
    pub name: String,
    pub version: String,
}

impl LibrarySpec {
    /// Parse a `<name> <version-constraint>` line.
    ///
    /// # Errors
    /// Returns [`InstallError::MalformedLibrarySpec`] when the line does not
    /// split into a word-shaped name and a version token.
    pub fn parse(entry: &str) -> Result<Self, InstallError> {
        let mut tokens = entry.split_whitespace();
        let name = tokens.next();
        let version = tokens.collect::<Vec<_>>().join(" ");

        match name {
            Some(name)
                if !version.is_empty()
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
            {
                Ok(Self {
                    name: name.to_string(),
                    version,
                })
            }
            _ => Err(InstallError::MalformedLibrarySpec {
                entry: entry.to_string(),
            }),
        }
    }
}

/// Render the omc script installing every requested library exactly at its
/// constraint, in one package-manager transaction.
fn render_install_script(specs: &[LibrarySpec]) -> String {
    let mut script = String::from("updatePackageIndex(); getErrorString();\n");
    for LibrarySpec { name, version } in specs {
        let _ = write!(
            script,
            "if not installPackage({name}, \"{version}\", exactMatch=true) then\n\
             \x20 print(\"Failed to install {name} {version}\");\n\
             \x20 print(getErrorString());\n\
             \x20 exit(1);\n\
             else\n\
             \x20 print(\"Installed: {name} {version}\\n\");\n\
             end if;\n"
        );
    }
    script
}

/// Install Modelica libraries with the already-installed `omc`.
///
/// Every entry is validated before anything runs; the generated script is
/// removed on every exit path, success or not.
///
/// # Errors
/// Fails fast with [`InstallError::MalformedLibrarySpec`] on the first bad
/// entry, and propagates script execution failures.
pub async fn install_libraries(entries: &[String]) -> Result<(), InstallError> {
    let specs = entries
        .iter()
        .map(|entry| LibrarySpec::parse(entry))
        .collect::<Result<Vec<_>, _>>()?;
    if specs.is_empty() {
        return Ok(());
    }

    let script = render_install_script(&specs);
    debug!("Install script contents:\n{script}");

    // NamedTempFile removes the script on drop, covering the error paths.
    let mut file = tempfile::Builder::new()
        .prefix("installLibs")
        .suffix(".mos")
        .tempfile()?;
    file.write_all(script.as_bytes())?;

    info!("Running install script {}", file.path().display());
    let mut command = Command::new("omc");
    command.arg(file.path());
    run(command).await?;
    Ok(())
}
