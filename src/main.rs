//! Main entry point for the dirsnap CLI app

use dirsnap::{cli, cli_runner};

fn main() -> std::process::ExitCode {
    let args = cli::run();
    cli_runner::init_logging(args.verbose);

    if let Err(e) = cli_runner::run_cli_app(args) {
        eprintln!("Error: {}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}
