use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    astra_lib::run(astra_lib::cli::Cli::parse())
}
