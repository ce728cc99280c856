use std::process::ExitCode;

use clap::Parser;

use swift_test_codecov::cli::{self, Args};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let cwd = std::env::current_dir().unwrap_or_default();

    match cli::run(&args, &cwd) {
        Ok(outcome) => {
            print!("{}", outcome.output);
            if outcome.passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            match cli::error_output(args.print_format, &e) {
                Some(out) => print!("{out}"),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
