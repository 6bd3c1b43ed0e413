use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::INSTRUCTIONS_PER_SECOND;
use crate::error::ConfigError;

/// # Quirks
/// Points where the COSMAC VIP interpreter and later reimplementations disagree.
///
/// The defaults follow the original hardware. Many ROMs written for later interpreters
/// expect the `modern` behavior instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quirks {
    /// 8XY1, 8XY2 and 8XY3 reset VF to 0
    pub logic_resets_flag: bool,
    /// 8XY6 and 8XYE shift Vy into Vx rather than shifting Vx in place
    pub shift_uses_vy: bool,
    /// FX55 and FX65 leave I pointing just past the last register transferred
    pub load_store_increments_index: bool,
}

impl Quirks {
    pub fn original() -> Self {
        Quirks {
            logic_resets_flag: true,
            shift_uses_vy: true,
            load_store_increments_index: true,
        }
    }

    pub fn modern() -> Self {
        Quirks {
            logic_resets_flag: false,
            shift_uses_vy: false,
            load_store_increments_index: false,
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::original()
    }
}

/// Machine and scheduler settings, loadable from JSON.
///
/// Missing fields fall back to their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub quirks: Quirks,
    pub instructions_per_second: u32,
    /// Seed for CXNN; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quirks: Quirks::default(),
            instructions_per_second: INSTRUCTIONS_PER_SECOND,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.quirks, Quirks::original());
    }

    #[test]
    fn test_partial_quirks() {
        let config =
            Config::from_json_str(r#"{"quirks": {"shift_uses_vy": false}, "seed": 7}"#).unwrap();
        assert!(!config.quirks.shift_uses_vy);
        assert!(config.quirks.logic_resets_flag);
        assert!(config.quirks.load_store_increments_index);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.instructions_per_second, INSTRUCTIONS_PER_SECOND);
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            Config::from_json_str(r#"{"instructions_per_second": "fast"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            Config::from_path("/nonexistent/vip8.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
