use std::io::Write;

use patternwright::pattern::{DEFAULT_MAX_GROUP_DEPTH, PatternParser, Token, TokenItem};

use crate::{input_output::OutputArgs, logging::LogArgs};

/// Args for the parse command.
#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// A delimited pattern, e.g. `#^[a-z]+$#i`.
    pattern: String,

    /// Emit the parsed pattern as JSON.
    #[clap(long)]
    json: bool,

    /// Limit on group nesting.
    #[clap(long, default_value_t = DEFAULT_MAX_GROUP_DEPTH)]
    max_depth: usize,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    logging: LogArgs,
}

impl ParseArgs {
    /// Run the parse command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let info = PatternParser::default()
            .with_max_depth(self.max_depth)
            .parse(&self.pattern)?;

        let mut writer = self.output.open_writer()?;
        if self.json {
            serde_json::to_writer_pretty(&mut writer, &info)?;
            writeln!(writer)?;
        } else {
            writeln!(writer, "delimiter: {}", info.delimiter)?;
            writeln!(writer, "modifiers: {}", info.modifiers)?;
            writeln!(writer, "body:      {}", info.body)?;
            for (idx, token) in info.tokens.iter().enumerate() {
                writeln!(writer, "{}", describe_token(idx, token, &info.body))?;
            }
        }
        writer.flush()?;

        Ok(())
    }
}

fn describe_token(
    idx: usize,
    token: &Token,
    body: &str,
) -> String {
    let text = &body[token.pos..token.end()];
    let detail = match &token.item {
        TokenItem::GroupStart(start) => {
            let mut detail = format!("-> #{}", start.end_token);
            if let Some(name) = &start.name {
                detail.push_str(&format!(" name={name}"));
            }
            if !start.options.is_empty() {
                detail.push_str(&format!(" options={}", start.options));
            }
            if start.atomic {
                detail.push_str(" atomic");
            }
            detail
        }
        TokenItem::GroupEnd(end) => format!("<- #{}", end.start_token),
        TokenItem::CharacterClass { .. } | TokenItem::OptionGroup { .. } => String::new(),
    };
    format!(
        "#{idx:<3} {:>4}+{:<3} {:<24} {text:<12} {detail}",
        token.pos,
        token.len,
        token.kind().to_string()
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use patternwright::parse_pattern;

    use super::*;

    #[test]
    fn test_describe_token() {
        let info = parse_pattern("/(?<n>a)/").unwrap();
        assert_eq!(
            describe_token(0, &info.tokens[0], &info.body),
            "#0      0+5   CapturingGroupStart      (?<n>        -> #1 name=n"
        );
        assert_eq!(
            describe_token(1, &info.tokens[1], &info.body),
            "#1      6+1   CapturingGroupEnd        )            <- #0"
        );
    }
}
