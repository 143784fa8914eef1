mod parse;
mod synth;
mod translate;

/// Subcommands for pwright
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build a regex matching exactly a list of words.
    Synth(synth::SynthArgs),

    /// Tokenize a delimited pattern.
    Parse(parse::ParseArgs),

    /// Translate delimited patterns to JavaScript regex literals.
    Translate(translate::TranslateArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Synth(cmd) => cmd.run(),
            Commands::Parse(cmd) => cmd.run(),
            Commands::Translate(cmd) => cmd.run(),
        }
    }
}
