#[cfg(windows)]
use std::os::windows::process::CommandExt;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Suppress the console window that Windows pops up for spawned installers.
pub trait HideWindow {
    fn hide_window(&mut self) -> &mut Self;
}

impl HideWindow for tokio::process::Command {
    #[cfg(windows)]
    fn hide_window(&mut self) -> &mut Self {
        self.creation_flags(CREATE_NO_WINDOW)
    }

    #[cfg(not(windows))]
    fn hide_window(&mut self) -> &mut Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::HideWindow;

    #[test]
    fn hide_window_keeps_the_configured_command_line() {
        let mut cmd = tokio::process::Command::new("installer.exe");
        cmd.args(["/S", "/v", "/qn"]).hide_window();

        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "installer.exe");
        let args: Vec<_> = std_cmd.get_args().collect();
        assert_eq!(args, ["/S", "/v", "/qn"]);
    }
}
