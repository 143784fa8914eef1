use std::io::Write;

use patternwright::synthesis::{DEFAULT_MAX_MERGE_DEPTH, WordListOptions, build_regex_from_words};

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
};

/// Args for the synth command.
#[derive(clap::Args, Debug)]
pub struct SynthArgs {
    /// Words to match; read one per line from the input when omitted.
    words: Vec<String>,

    /// Prefix the pattern with a lookahead over the first symbols.
    #[clap(long)]
    lookahead: bool,

    /// Render a symbol as raw regex text, e.g. `--special '*=.*?'`.
    #[clap(long = "special", value_name = "SYM=TEXT", value_parser = parse_special)]
    specials: Vec<(char, String)>,

    /// Recursion limit for chain merging.
    #[clap(long, default_value_t = DEFAULT_MAX_MERGE_DEPTH)]
    max_depth: usize,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    logging: LogArgs,
}

impl SynthArgs {
    /// Run the synth command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let mut words = self.words.clone();
        if words.is_empty() || self.input.is_set() {
            words.extend(self.input.read_lines()?);
        }
        log::info!("synthesizing from {} words", words.len());

        let mut options = WordListOptions::default()
            .with_lookahead(self.lookahead)
            .with_max_depth(self.max_depth);
        for (symbol, text) in &self.specials {
            options = options.with_special_char(*symbol, text.as_str());
        }

        let pattern = build_regex_from_words(&words, &options)?;

        let mut writer = self.output.open_writer()?;
        writeln!(writer, "{pattern}")?;
        writer.flush()?;

        Ok(())
    }
}

/// Parse `SYM=TEXT`, where `SYM` is one character.
fn parse_special(arg: &str) -> Result<(char, String), String> {
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), Some('=')) => Ok((symbol, chars.as_str().to_string())),
        _ => Err(format!("expected SYM=TEXT, got {arg:?}")),
    }
}
