mod cli;
mod logging;
mod run;

use clap::Parser as _;

use omsetup_platform::Platform;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    logging::init(args.verbose);

    let Some(platform) = Platform::current() else {
        eprintln!(
            "Host OS {} is not supported; expected linux, windows or macos.",
            std::env::consts::OS
        );
        std::process::exit(1);
    };

    match run::run(&args, platform).await {
        Ok(version) => println!("{version}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
