//! Post-install verification: run the installed program and read back the
//! version it reports.

use log::{debug, info};
use tokio::process::Command;

use omsetup_backend::InstallError;

use crate::exec::run;

/// Extract the version token from `--version` output shaped like
/// `<name> <version> ...`.
fn parse_version_output(output: &str) -> Option<&str> {
    output.lines().next()?.split_whitespace().nth(1)
}

/// Run `<program> --version` and return the reported version string.
///
/// Repeated calls against an unchanged binary return the same string; the
/// check has no side effects.
///
/// # Errors
/// Returns [`InstallError::SubprocessFailure`] on a non-zero exit and
/// [`InstallError::UnexpectedVersionOutput`] when the output does not follow
/// the `<name> <version> ...` convention.
pub async fn show_version(program: &str) -> Result<String, InstallError> {
    if let Ok(path) = which::which(program) {
        debug!("Found {program} at {}", path.display());
    }

    let mut command = Command::new(program);
    command.arg("--version");
    let output = run(command).await?;

    let version = parse_version_output(&output).ok_or_else(|| {
        InstallError::UnexpectedVersionOutput {
            program: program.to_string(),
            output: output.trim().to_string(),
        }
    })?;

    info!("{program} reports version {version}");
    Ok(version.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_version_output;

    #[test]
    fn second_token_of_first_line_is_the_version() {
        assert_eq!(
            parse_version_output("OpenModelica 1.18.1\n"),
            Some("1.18.1")
        );
        assert_eq!(
            parse_version_output("OMSimulator v2.1.1.post194-g75de4c6-linux\n"),
            Some("v2.1.1.post194-g75de4c6-linux")
        );
    }

    #[test]
    fn only_the_first_line_is_consulted() {
        assert_eq!(
            parse_version_output("OpenModelica 1.26.0~dev-37\nextra diagnostics here\n"),
            Some("1.26.0~dev-37")
        );
    }

    #[test]
    fn missing_version_token_is_rejected() {
        assert_eq!(parse_version_output("OpenModelica\n"), None);
        assert_eq!(parse_version_output(""), None);
        assert_eq!(parse_version_output("\n"), None);
    }

    #[cfg(unix)]
    mod with_fake_program {
        use std::os::unix::fs::PermissionsExt as _;

        use crate::verify::show_version;

        fn fake_program(dir: &std::path::Path) -> String {
            let path = dir.join("fake-omc");
            std::fs::write(&path, "#!/bin/sh\necho \"OpenModelica 1.18.1\"\n")
                .expect("fake program should be written");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("fake program should be executable");
            path.display().to_string()
        }

        #[tokio::test]
        async fn reported_version_is_parsed() {
            let dir = tempfile::tempdir().expect("fixture dir should be created");
            let program = fake_program(dir.path());

            let version = show_version(&program).await.expect("verification should pass");
            assert_eq!(version, "1.18.1");
        }

        #[tokio::test]
        async fn verification_is_idempotent() {
            let dir = tempfile::tempdir().expect("fixture dir should be created");
            let program = fake_program(dir.path());

            let first = show_version(&program).await.expect("first check should pass");
            let second = show_version(&program).await.expect("second check should pass");
            assert_eq!(first, second);
        }
    }
}
