mod commands;
mod input_output;
mod logging;

use clap::Parser;
use commands::Commands;

/// pwright: synthesize, parse and translate regexes.
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
