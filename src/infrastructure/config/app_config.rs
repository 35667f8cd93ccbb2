use config::Config;
use error_stack::{Report, ResultExt};
use serde::de::IntoDeserializer;
use serde::Deserialize;
use serde_path_to_error::{Deserializer as PathDeserializer, Segment, Track};
use thiserror::Error;

use super::site_config::SiteConfig;
use super::webdriver_config::WebDriverConfig;

pub const ENV_PREFIX: &str = "ORDER_TOTAL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration sources")]
    Load,
    #[error("Failed to deserialize configuration")]
    Deserialize,
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub webdriver: WebDriverConfig,
}

impl AppConfig {
    /// Merges the optional config file `path` (any format the `config` crate
    /// knows, extension optional) with `ORDER_TOTAL__SECTION__KEY` variables.
    #[tracing::instrument]
    pub fn load(path: &str) -> error_stack::Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .change_context(ConfigError::Load)
            .attach_printable_lazy(|| format!("Config path: {}", path))?;

        Self::from_config(config)
    }

    fn from_config(config: Config) -> error_stack::Result<Self, ConfigError> {
        let value = config
            .try_deserialize::<serde_json::Value>()
            .change_context(ConfigError::Deserialize)?;

        let mut track = Track::new();
        let path_de = PathDeserializer::new(value.into_deserializer(), &mut track);
        AppConfig::deserialize(path_de).map_err(|error| {
            let field_path = track
                .path()
                .iter()
                .map(|segment| match segment {
                    Segment::Seq { index } => format!("[{}]", index),
                    Segment::Map { key } => format!(".{}", key),
                    Segment::Enum { variant } => format!("::{}", variant),
                    Segment::Unknown => String::from("<?>"),
                })
                .collect::<String>();

            Report::new(ConfigError::Deserialize)
                .attach_printable(error.to_string())
                .attach_printable(format!(
                    "Field path: {}",
                    field_path.trim_start_matches('.')
                ))
        })
    }
}
