use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::parser::locator::{
    Locator, DEFAULT_ANCHOR, DEFAULT_FORWARD, DEFAULT_LOOKBACK, DEFAULT_RECORD_OPENING,
};

const CONFIG_FILE: &str = "workout_programs";
const ENV_PREFIX: &str = "WORKOUT";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub anchor: String,
    pub record_opening: String,
    pub lookback_window: usize,
    pub forward_window: usize,
}

impl Settings {
    /// Defaults, then `workout_programs.toml` if present, then `WORKOUT_*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_window == 0 {
            return Err(ConfigError::ZeroWindow {
                name: "lookback_window",
            });
        }
        if self.forward_window == 0 {
            return Err(ConfigError::ZeroWindow {
                name: "forward_window",
            });
        }
        Ok(())
    }

    pub fn locator(&self) -> Result<Locator, ConfigError> {
        Locator::new(
            &self.anchor,
            &self.record_opening,
            self.lookback_window,
            self.forward_window,
        )
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("input", "src/App.js")?
        .set_default("output", "workout_programs.json")?
        .set_default("anchor", DEFAULT_ANCHOR)?
        .set_default("record_opening", DEFAULT_RECORD_OPENING)?
        .set_default("lookback_window", DEFAULT_LOOKBACK as u64)?
        .set_default("forward_window", DEFAULT_FORWARD as u64)?)
}
