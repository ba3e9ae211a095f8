//! Broom - periodic filesystem sweeper.

use broom_cli::logging::{self, LogOptions};
use broom_cli::Cli;
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    let formatter = cli.formatter();

    let options = LogOptions {
        verbose: cli.console_verbose(),
        dry_run: cli.dry_run,
        log_file: logging::default_log_path(),
    };
    let guard = match logging::init(&options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", formatter.error(&e.to_string()));
            std::process::exit(1);
        }
    };

    match broom_cli::execute(&cli) {
        Ok(Some(summary)) => println!("{}", summary),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{}", formatter.error(&e.to_string()));
            drop(guard);
            std::process::exit(1);
        }
    }
}
