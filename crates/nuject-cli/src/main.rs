use std::error::Error;

use clap::{Parser, Subcommand};

use commands::{
    run::{self, RunArgs},
    validate::{self, ValidateArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "nuject", about = "Monte Carlo neutrino event injection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an event stream from a run configuration.
    Run(RunArgs),
    /// Validate a run configuration and its cross-section table.
    Validate(ValidateArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Validate(args) => validate::run(&args),
    }
}
