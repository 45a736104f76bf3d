//! Configuration from environment variables.
//!
//! Plugins are loaded by a host, so there is no command line to pass options on.
//! The following environment variables are read instead:
//!
//! * `AUTOPANNER_LOG_LEVEL`: one of `off`, `error`, `warning` (or `warn`), `info`, `debug`
//!   and `trace`. When not set, logging is off.
//! * `AUTOPANNER_LOG_FILE`: the file to write the log to. When not set, the log is written
//!   to standard error.
//! * `AUTOPANNER_COMPATIBILITY`: `legacy` (the default) or `corrected`, see
//!   [`OscillatorSettings`].
//!
//! Note that the environment variables must be visible to the host process.
//!
//! [`OscillatorSettings`]: ../dsp/pan_oscillator/struct.OscillatorSettings.html
use crate::dsp::OscillatorSettings;
use log::{LevelFilter, SetLoggerError};
use simplelog::{Config, SimpleLogger, WriteLogger};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io;
use std::path::PathBuf;

pub const LOG_LEVEL_VARIABLE: &str = "AUTOPANNER_LOG_LEVEL";
pub const LOG_FILE_VARIABLE: &str = "AUTOPANNER_LOG_FILE";
pub const COMPATIBILITY_VARIABLE: &str = "AUTOPANNER_COMPATIBILITY";

#[derive(Debug)]
pub enum ConfigError {
    UnknownLogLevel(String),
    UnknownCompatibility(String),
    LogFile { path: PathBuf, error: io::Error },
    Logger(SetLoggerError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        match self {
            ConfigError::UnknownLogLevel(value) => write!(
                f,
                "Unknown log level {:?} in {}, expected one of \
                 off, error, warning, info, debug or trace",
                value, LOG_LEVEL_VARIABLE
            ),
            ConfigError::UnknownCompatibility(value) => write!(
                f,
                "Unknown compatibility mode {:?} in {}, expected legacy or corrected",
                value, COMPATIBILITY_VARIABLE
            ),
            ConfigError::LogFile { path, error } => {
                write!(f, "Could not create log file {}: {}", path.display(), error)
            }
            ConfigError::Logger(e) => write!(f, "Could not install the logger: {}", e),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::LogFile { error, .. } => Some(error),
            ConfigError::Logger(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SetLoggerError> for ConfigError {
    fn from(e: SetLoggerError) -> Self {
        ConfigError::Logger(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_level: LevelFilter,
    /// `None` means standard error.
    pub log_file: Option<PathBuf>,
    pub oscillator: OscillatorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_level: LevelFilter::Off,
            log_file: None,
            oscillator: OscillatorSettings::default(),
        }
    }
}

impl Settings {
    /// Read the settings from the environment variables of the process.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the settings, using `lookup` to get the value of an environment variable.
    /// Empty values are treated as if the variable is not set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key| lookup(key).filter(|value: &String| !value.trim().is_empty());
        let mut settings = Settings::default();
        if let Some(level) = lookup(LOG_LEVEL_VARIABLE) {
            settings.log_level = parse_log_level(&level)?;
        }
        settings.log_file = lookup(LOG_FILE_VARIABLE).map(PathBuf::from);
        if let Some(mode) = lookup(COMPATIBILITY_VARIABLE) {
            settings.oscillator = parse_compatibility(&mode)?;
        }
        Ok(settings)
    }

    /// Install the logger. Does nothing when logging is off.
    pub fn initialize_logging(&self) -> Result<(), ConfigError> {
        if self.log_level == LevelFilter::Off {
            return Ok(());
        }
        match &self.log_file {
            Some(path) => {
                let file = File::create(path).map_err(|error| ConfigError::LogFile {
                    path: path.clone(),
                    error,
                })?;
                WriteLogger::init(self.log_level, Config::default(), file)?;
            }
            None => SimpleLogger::init(self.log_level, Config::default())?,
        }
        info!("Logging initialized at level {}", self.log_level);
        Ok(())
    }
}

fn parse_log_level(value: &str) -> Result<LevelFilter, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warning" | "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(ConfigError::UnknownLogLevel(value.to_string())),
    }
}

fn parse_compatibility(value: &str) -> Result<OscillatorSettings, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "legacy" => Ok(OscillatorSettings::legacy()),
        "corrected" => Ok(OscillatorSettings::corrected()),
        _ => Err(ConfigError::UnknownCompatibility(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn nothing_set_gives_the_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level, LevelFilter::Off);
        assert_eq!(settings.oscillator, OscillatorSettings::legacy());
    }

    #[test]
    fn log_levels_are_case_insensitive() {
        for (value, expected) in &[
            ("off", LevelFilter::Off),
            ("ERROR", LevelFilter::Error),
            ("Warning", LevelFilter::Warn),
            ("warn", LevelFilter::Warn),
            ("info", LevelFilter::Info),
            ("debug", LevelFilter::Debug),
            (" trace ", LevelFilter::Trace),
        ] {
            let settings = settings_from(&[(LOG_LEVEL_VARIABLE, value)]).unwrap();
            assert_eq!(settings.log_level, *expected, "for {:?}", value);
        }
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        match settings_from(&[(LOG_LEVEL_VARIABLE, "loud")]) {
            Err(ConfigError::UnknownLogLevel(value)) => assert_eq!(value, "loud"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn compatibility_mode_selects_the_oscillator_settings() {
        let settings = settings_from(&[(COMPATIBILITY_VARIABLE, "corrected")]).unwrap();
        assert_eq!(settings.oscillator, OscillatorSettings::corrected());
        let settings = settings_from(&[(COMPATIBILITY_VARIABLE, "legacy")]).unwrap();
        assert_eq!(settings.oscillator, OscillatorSettings::legacy());
        assert!(matches!(
            settings_from(&[(COMPATIBILITY_VARIABLE, "modern")]),
            Err(ConfigError::UnknownCompatibility(_))
        ));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let settings = settings_from(&[
            (LOG_LEVEL_VARIABLE, ""),
            (LOG_FILE_VARIABLE, "  "),
            (COMPATIBILITY_VARIABLE, ""),
        ])
        .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn log_file_is_taken_as_is() {
        let settings = settings_from(&[(LOG_FILE_VARIABLE, "/tmp/autopanner.log")]).unwrap();
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/autopanner.log")));
    }

    #[test]
    fn logging_off_installs_nothing() {
        assert!(Settings::default().initialize_logging().is_ok());
    }
}
