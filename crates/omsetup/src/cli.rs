use clap::Parser;

use omsetup_platform::BitWidth;

/// Install OpenModelica, Modelica libraries and supporting tools.
#[derive(Debug, Parser)]
#[command(name = "omsetup", disable_version_flag = true)]
pub struct Args {
    /// OpenModelica version to install: a channel (`release`, `stable`,
    /// `nightly`), a full version like `1.18.1`, or a prefix like `1.18`.
    #[arg(long, default_value = "release")]
    pub version: String,

    /// Bit width of the installation, `64` or `32`.
    #[arg(long, default_value = "64", value_parser = parse_bit_width)]
    pub arch: BitWidth,

    /// Package to install; repeat for several. Linux only, the Windows and
    /// macOS installers bundle everything.
    #[arg(long = "package", default_values_t = [String::from("omc")])]
    pub packages: Vec<String>,

    /// Modelica library to install, written as `<name> <version>`; repeat
    /// for several.
    #[arg(long = "library")]
    pub libraries: Vec<String>,

    /// Also install the omc-diff result comparison tool.
    #[arg(long)]
    pub omc_diff: bool,

    /// Enable debug logging.
    #[arg(long, short)]
    pub verbose: bool,
}

fn parse_bit_width(input: &str) -> Result<BitWidth, String> {
    input.parse().map_err(|err| format!("{err}"))
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;
    use omsetup_platform::BitWidth;

    use super::Args;

    #[test]
    fn defaults_install_the_latest_release_compiler() {
        let args = Args::parse_from(["omsetup"]);

        assert_eq!(args.version, "release");
        assert_eq!(args.arch, BitWidth::SixtyFour);
        assert_eq!(args.packages, ["omc"]);
        assert!(args.libraries.is_empty());
        assert!(!args.omc_diff);
        assert!(!args.verbose);
    }

    #[test]
    fn version_flag_is_an_input_not_a_help_shortcut() {
        let args = Args::parse_from(["omsetup", "--version", "1.18"]);
        assert_eq!(args.version, "1.18");
    }

    #[test]
    fn repeated_flags_accumulate() {
        let args = Args::parse_from([
            "omsetup",
            "--package",
            "omc",
            "--package",
            "omsimulator",
            "--library",
            "Modelica 4.0.0",
            "--library",
            "Buildings 9.1.0",
        ]);

        assert_eq!(args.packages, ["omc", "omsimulator"]);
        assert_eq!(args.libraries, ["Modelica 4.0.0", "Buildings 9.1.0"]);
    }

    #[test]
    fn arch_rejects_unknown_widths() {
        assert!(Args::try_parse_from(["omsetup", "--arch", "16"]).is_err());
        assert!(Args::try_parse_from(["omsetup", "--arch", "32"]).is_ok());
    }
}
