//! Subprocess execution helpers shared by all install flows.

use log::{debug, error, info, trace};
use std::process::Stdio;
use tokio::io::AsyncWriteExt as _;
use tokio::process::Command;

use omsetup_backend::InstallError;

/// Render the command line for logging and error reporting.
fn render(command: &Command) -> String {
    let std_command = command.as_std();
    let mut line = std_command.get_program().to_string_lossy().into_owned();
    for arg in std_command.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

fn check(line: String, output: std::process::Output) -> Result<String, InstallError> {
    debug!("Exit status: {:?}", output.status);
    trace!("stdout: {}", String::from_utf8_lossy(&output.stdout));
    if !output.stderr.is_empty() {
        trace!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    }

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        error!("Command failed: {line}: {stderr}");
        Err(InstallError::SubprocessFailure {
            command: line,
            status: output.status.to_string(),
            stderr,
        })
    }
}

/// Run a command to completion and return its captured stdout.
///
/// # Errors
/// Returns [`InstallError::SubprocessFailure`] when the command exits
/// non-zero, or an IO error when it cannot be spawned.
pub async fn run(mut command: Command) -> Result<String, InstallError> {
    let line = render(&command);
    info!("Running: {line}");

    let output = command.output().await?;
    check(line, output)
}

/// Run a command feeding `input` to its stdin. The apt setup uses this for
/// `gpg --dearmor` and `tee`, which consume piped data.
///
/// # Errors
/// Same failure modes as [`run`], plus IO errors while writing to stdin.
pub async fn run_with_stdin(mut command: Command, input: &[u8]) -> Result<String, InstallError> {
    let line = render(&command);
    info!("Running: {line} (with piped stdin)");

    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command.spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).await?;
        // Dropping the handle closes the pipe so the child sees EOF.
    }

    let output = child.wait_with_output().await?;
    check(line, output)
}

#[cfg(test)]
mod tests {
    use tokio::process::Command;

    use super::{run, run_with_stdin};
    use omsetup_backend::InstallError;

    #[cfg(unix)]
    #[tokio::test]
    async fn run_captures_stdout_of_successful_command() {
        let mut command = Command::new("echo");
        command.arg("hello");

        let output = run(command).await.expect("echo should succeed");
        assert_eq!(output, "hello\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_reports_non_zero_exit_with_command_line() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo boom >&2; exit 3"]);

        let result = run(command).await;
        assert!(matches!(
            result,
            Err(InstallError::SubprocessFailure { ref command, ref stderr, .. })
                if command.starts_with("sh -c") && stderr.contains("boom")
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn run_with_stdin_pipes_input_through() {
        let command = Command::new("cat");

        let output = run_with_stdin(command, b"piped data")
            .await
            .expect("cat should succeed");
        assert_eq!(output, "piped data");
    }

    #[tokio::test]
    async fn missing_program_maps_to_io_error() {
        let command = Command::new("omsetup-does-not-exist");

        let result = run(command).await;
        assert!(matches!(result, Err(InstallError::Io { .. })));
    }
}
