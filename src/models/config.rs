use anyhow::Error;
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "mango-detector.json";
pub const ENV_PREFIX: &str = "MANGO_DETECTOR_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub camera_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            camera_command: None,
        }
    }
}

impl Config {
    /// Defaults, then the JSON file (if present), then `MANGO_DETECTOR_*` variables.
    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Json::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(file: Option<&Path>) -> Result<Config, Error> {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config = Config::figment(file).extract::<Config>()?;

        Ok(config)
    }

    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
