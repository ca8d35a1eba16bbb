//! The configuration record (spec.md §6 Inputs), serializable with `serde`
//! the way `petridecus-viso` and `bretzle-aperture` keep their on-disk
//! scene/config structures — a plain data record validated once at startup
//! rather than threaded through as loose CLI arguments.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub num_samples: u32,
    pub num_sub_samples: u32,
    pub max_bounce_count: u32,
    pub max_rendering_sec: f32,
    pub cpu_core_count: u32,
    pub scene_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 512,
            height: 512,
            num_samples: 64,
            num_sub_samples: 2,
            max_bounce_count: 16,
            max_rendering_sec: f32::INFINITY,
            cpu_core_count: num_cpus::get() as u32,
            scene_name: "ball".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations spec.md §7 classifies as configuration
    /// errors — these must be caught before a render starts, since nothing
    /// downstream can recover from them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroResolution { width: self.width, height: self.height });
        }
        if self.num_samples == 0 {
            return Err(ConfigError::ZeroSamples(self.num_samples));
        }
        if self.num_sub_samples == 0 {
            return Err(ConfigError::ZeroSubSamples(self.num_sub_samples));
        }
        if self.max_bounce_count == 0 {
            return Err(ConfigError::ZeroBounceCount(self.max_bounce_count));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let mut config = Config::default();
        config.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroResolution { .. })));
    }

    #[test]
    fn zero_samples_is_rejected() {
        let mut config = Config::default();
        config.num_samples = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSamples(0))));
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config::default();
        let text = serde_json::to_string(&config).unwrap();
        let parsed = Config::from_json(&text).unwrap();
        assert_eq!(parsed.width, config.width);
        assert_eq!(parsed.scene_name, config.scene_name);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(Config::from_json("not json"), Err(ConfigError::Parse(_))));
    }
}
