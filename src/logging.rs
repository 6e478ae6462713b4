use std::fs::File;

use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};

/// Installs the global logger described by `config`.
///
/// Nothing in this crate calls this on its own: the process driving the
/// harness decides whether it wants output, since log writes show up in the
/// very memory numbers a leak detector is watching.
pub fn init(config: &HarnessConfig) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(config.log_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
    ];

    if let Some(path) = &config.log_file {
        let file = File::create(path).map_err(|e| HarnessError::Logger(Box::new(e)))?;
        loggers.push(WriteLogger::new(LevelFilter::Info, Config::default(), file));
    }

    CombinedLogger::init(loggers).map_err(|e| HarnessError::Logger(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected() {
        let config = HarnessConfig { log_level: LevelFilter::Off, ..HarnessConfig::default() };
        // another test may already have installed one, either way the second call fails
        let _ = init(&config);
        assert!(matches!(init(&config), Err(HarnessError::Logger(_))));
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        let config = HarnessConfig {
            log_level: LevelFilter::Off,
            log_file: Some("/nonexistent-dir/for/sure/harness.log".into()),
            ..HarnessConfig::default()
        };
        assert!(matches!(init(&config), Err(HarnessError::Logger(_))));
    }
}
