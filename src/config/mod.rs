//! Engine configuration

/// JSON settings and their validation
pub mod settings;

pub use settings::{ConfigError, Settings};
