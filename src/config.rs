use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// How long a controller thread sleeps between checks of its stop signal.
    pub poll_interval: Duration,
    /// Level for the terminal logger installed by [`crate::logging::init`].
    pub log_level: LevelFilter,
    /// If set, everything at `Info` and above is also written here.
    pub log_file: Option<PathBuf>,
}

impl HarnessConfig {
    pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

    pub const ENV_POLL_MS: &'static str = "NATIVELEAK_POLL_MS";
    pub const ENV_LOG: &'static str = "NATIVELEAK_LOG";
    pub const ENV_LOG_FILE: &'static str = "NATIVELEAK_LOG_FILE";

    /// The defaults, overridden by any `NATIVELEAK_*` variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::ENV_POLL_MS) {
            let millis = value.trim().parse::<u64>().ok().filter(|&ms| ms > 0);
            match millis {
                Some(ms) => config.poll_interval = Duration::from_millis(ms),
                None => return Err(HarnessError::InvalidConfig { key: Self::ENV_POLL_MS, value }),
            }
        }

        if let Some(value) = lookup(Self::ENV_LOG) {
            config.log_level = LevelFilter::from_str(value.trim())
                .map_err(|_| HarnessError::InvalidConfig { key: Self::ENV_LOG, value })?;
        }

        if let Some(value) = lookup(Self::ENV_LOG_FILE).filter(|v| !v.is_empty()) {
            config.log_file = Some(PathBuf::from(value));
        }

        Ok(config)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::POLL_INTERVAL,
            log_level: LevelFilter::Warn,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = HarnessConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn overrides() {
        let config = HarnessConfig::from_lookup(lookup_in(&[
            ("NATIVELEAK_POLL_MS", "25"),
            ("NATIVELEAK_LOG", "debug"),
            ("NATIVELEAK_LOG_FILE", "harness.log"),
        ])).unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(25));
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file, Some(PathBuf::from("harness.log")));
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [("NATIVELEAK_POLL_MS", "soon"), ("NATIVELEAK_POLL_MS", "0"), ("NATIVELEAK_LOG", "loud")] {
            match HarnessConfig::from_lookup(lookup_in(&[(key, value)])) {
                Err(HarnessError::InvalidConfig { key: k, value: v }) => {
                    assert_eq!(k, key);
                    assert_eq!(v, value);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
