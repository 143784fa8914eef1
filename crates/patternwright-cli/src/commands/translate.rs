use std::io::Write;

use patternwright::pattern::translate_pattern;

use crate::{input_output::OutputArgs, logging::LogArgs};

/// Args for the translate command.
#[derive(clap::Args, Debug)]
pub struct TranslateArgs {
    /// Delimited source patterns.
    #[clap(required = true)]
    patterns: Vec<String>,

    /// Emit one JSON object per pattern.
    #[clap(long)]
    json: bool,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    logging: LogArgs,
}

impl TranslateArgs {
    /// Run the translate command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let mut writer = self.output.open_writer()?;
        for pattern in &self.patterns {
            let translated = match translate_pattern(pattern) {
                Ok(translated) => translated,
                Err(err) => {
                    if err.is_dialect_gap() {
                        log::warn!("cannot translate {pattern:?}: {err}");
                    }
                    return Err(err.into());
                }
            };

            if self.json {
                serde_json::to_writer(&mut writer, &translated)?;
                writeln!(writer)?;
            } else {
                writeln!(writer, "{}", translated.pattern)?;
                for (name, idx) in translated.capture_map.iter() {
                    writeln!(writer, "  {name} = {idx}")?;
                }
            }
        }
        writer.flush()?;

        Ok(())
    }
}
