//! Export values to the surrounding CI environment.
//!
//! When run as a CI step, `GITHUB_PATH` and `GITHUB_ENV` name append-only
//! files that the runner folds into later steps. Outside CI there is nothing
//! durable to write to, so the values are logged for a wrapping script to
//! pick up.

use log::info;
use std::io::Write as _;
use std::path::Path;

/// Register `dir` on the execution search path of subsequent steps.
///
/// # Errors
/// Returns an error if the `GITHUB_PATH` file cannot be appended to.
pub fn add_search_path(dir: &Path) -> std::io::Result<()> {
    match std::env::var_os("GITHUB_PATH") {
        Some(file) => append_line(Path::new(&file), &dir.display().to_string()),
        None => {
            info!("Add {} to your PATH to use the installed tools", dir.display());
            Ok(())
        }
    }
}

/// Export `name=value` into the environment of subsequent steps.
///
/// # Errors
/// Returns an error if the `GITHUB_ENV` file cannot be appended to.
pub fn export_variable(name: &str, value: &str) -> std::io::Result<()> {
    match std::env::var_os("GITHUB_ENV") {
        Some(file) => append_line(Path::new(&file), &format!("{name}={value}")),
        None => {
            info!("Set {name}={value} in your environment");
            Ok(())
        }
    }
}

fn append_line(file: &Path, line: &str) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)?;
    writeln!(file, "{line}")
}
