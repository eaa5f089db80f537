use campus_ip_policy::cli::{self, CliArgs};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = CliArgs::parse();
    if let Err(e) = log4rs::init_file(&args.log_config, Default::default()) {
        eprintln!(
            "{} logging disabled, cannot load {}: {e}",
            "WARN".on_yellow(),
            args.log_config.display()
        );
    }
    log::info!("#Start main()");

    match cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{} {e}", "ERROR".on_red());
            ExitCode::FAILURE
        }
    }
}
