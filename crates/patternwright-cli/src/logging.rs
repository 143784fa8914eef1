use stderrlog::{LogLevelNum, Timestamp};

/// Modules whose records reach stderr: the library and this binary.
const LOG_MODULES: &[&str] = &["patternwright", env!("CARGO_CRATE_NAME")];

/// Logging setup arg group.
#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Silence log messages.
    #[clap(short, long)]
    pub quiet: bool,

    /// Turn debugging information on (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, default_value = None)]
    verbose: Option<u8>,

    /// Enable timestamped logging.
    #[clap(short, long)]
    pub ts: bool,
}

impl LogArgs {
    /// The `-v` count, or `default` when none was given.
    pub fn verbosity(
        &self,
        default: u8,
    ) -> u8 {
        match self.verbose {
            Some(verbose) if verbose > 0 => verbose,
            _ => default,
        }
    }

    /// Install the stderr logger for [`LOG_MODULES`].
    ///
    /// `default` is the verbosity used when no `-v` flag is given; `2` shows
    /// dialect-gap warnings from `translate`.
    pub fn setup_logging(
        &self,
        default: u8,
    ) -> Result<(), Box<dyn std::error::Error>> {
        stderrlog::new()
            .modules(LOG_MODULES.iter().copied())
            .quiet(self.quiet)
            .verbosity(level_for(self.verbosity(default)))
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()?;

        Ok(())
    }
}

/// Map a verbosity count onto a log level; `0` is off.
fn level_for(verbosity: u8) -> LogLevelNum {
    match verbosity {
        0 => LogLevelNum::Off,
        1 => LogLevelNum::Error,
        2 => LogLevelNum::Warn,
        3 => LogLevelNum::Info,
        4 => LogLevelNum::Debug,
        _ => LogLevelNum::Trace,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    struct TestArgs {
        #[command(flatten)]
        logging: LogArgs,
    }

    fn parse(args: &[&str]) -> LogArgs {
        TestArgs::parse_from(std::iter::once("pwright").chain(args.iter().copied())).logging
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&[]).verbosity(2), 2);
        assert_eq!(parse(&["-v"]).verbosity(2), 1);
        assert_eq!(parse(&["-vvvv"]).verbosity(2), 4);

        let args = parse(&["-q", "--ts"]);
        assert!(args.quiet);
        assert!(args.ts);
    }

    #[test]
    fn test_level_for() {
        assert!(matches!(level_for(0), LogLevelNum::Off));
        assert!(matches!(level_for(2), LogLevelNum::Warn));
        assert!(matches!(level_for(9), LogLevelNum::Trace));
    }

    #[test]
    fn test_log_modules() {
        assert_eq!(LOG_MODULES, &["patternwright", "pwright"]);
    }
}
