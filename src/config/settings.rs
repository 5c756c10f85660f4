// src/config/settings.rs - Engine settings loaded from JSON

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::{cuckoo::solver::DEFAULT_MAX_PATH_LEN, Algorithm};
use crate::consensus::{DEFAULT_SIZE_SHIFT, EASINESS, MAX_SIZE_SHIFT, MIN_SIZE_SHIFT};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed to load
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for [`Settings`]
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Size shift outside the supported range
    #[error("size shift {0} outside {min}..={max}", min = MIN_SIZE_SHIFT, max = MAX_SIZE_SHIFT)]
    SizeShift(u8),

    /// Easiness is a percentage
    #[error("easiness {0} outside 1..=100")]
    Easiness(u64),

    /// Miner path bound must allow at least one step
    #[error("max path length must be positive")]
    MaxPathLen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Engine settings for verification and the reference miner
pub struct Settings {
    /// Graph flavour used by the command line tools
    pub algorithm: Algorithm,
    /// Log2 of the graph node count (edge bits for Cuckaroo)
    pub size_shift: u8,
    /// Percentage of nonces usable on a Cuckoo graph
    pub easiness: u64,
    /// Bound on the miner's forest path length
    pub max_path_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Cuckoo,
            size_shift: DEFAULT_SIZE_SHIFT,
            easiness: EASINESS,
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every field is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SIZE_SHIFT..=MAX_SIZE_SHIFT).contains(&self.size_shift) {
            return Err(ConfigError::SizeShift(self.size_shift));
        }
        if !(1..=100).contains(&self.easiness) {
            return Err(ConfigError::Easiness(self.easiness));
        }
        if self.max_path_len == 0 {
            return Err(ConfigError::MaxPathLen);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.size_shift, 30);
        assert_eq!(settings.easiness, 50);
        assert_eq!(settings.algorithm, Algorithm::Cuckoo);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let settings: Settings =
            serde_json::from_str(r#"{"algorithm":"cuckaroo","size_shift":19}"#).unwrap();
        assert_eq!(settings.algorithm, Algorithm::Cuckaroo);
        assert_eq!(settings.size_shift, 19);
        assert_eq!(settings.easiness, EASINESS);
        assert_eq!(settings.max_path_len, DEFAULT_MAX_PATH_LEN);
    }

    #[test]
    fn test_validate_rejects() {
        let mut settings = Settings {
            size_shift: 34,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::SizeShift(34))));

        settings.size_shift = 20;
        settings.easiness = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::Easiness(0))));

        settings.easiness = 101;
        assert!(matches!(settings.validate(), Err(ConfigError::Easiness(101))));

        settings.easiness = 75;
        settings.max_path_len = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::MaxPathLen)));
    }

    #[test]
    fn test_load() {
        let path = std::env::temp_dir()
            .join(format!("cuckoo-pow-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{"size_shift":20,"easiness":75}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.size_shift, 20);
        assert_eq!(settings.easiness, 75);

        fs::write(&path, r#"{"easiness":500}"#).unwrap();
        assert!(matches!(Settings::load(&path), Err(ConfigError::Easiness(500))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(ConfigError::Parse(_))));

        fs::remove_file(&path).unwrap();
        assert!(matches!(Settings::load(&path), Err(ConfigError::Read { .. })));
    }
}
