//! # World Configuration
//!
//! Tuning knobs for type storages and query dispatch.
//! Loaded once at startup, usually from a TOML file.
//!
//! ```toml
//! initial_capacity = 1024
//! growth_factor = 1.5
//! max_chunk_size = 256
//! ```

use serde::Deserialize;

use crate::error::{EcsError, EcsResult};
use crate::math::highest_power_of_two_in;

/// Configuration for a [`World`](crate::ecs::World).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Records reserved up front in every type storage.
    pub initial_capacity: usize,
    /// Multiplier applied to the capacity when a storage grows.
    pub growth_factor: f32,
    /// Upper bound on the records handed to a system in one chunk.
    ///
    /// Rounded down to a power of two when the world is built.
    pub max_chunk_size: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 10,
            growth_factor: 1.2,
            max_chunk_size: 1024,
        }
    }
}

impl WorldConfig {
    /// Config for worlds expected to hold many entities from the start.
    #[must_use]
    pub const fn large() -> Self {
        Self {
            initial_capacity: 65_536,
            growth_factor: 1.5,
            max_chunk_size: 4096,
        }
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys fall back to [`WorldConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] if the text is not valid TOML,
    /// contains unknown keys, or holds out-of-range values.
    pub fn from_toml_str(text: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that all values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> EcsResult<()> {
        if !(self.growth_factor > 1.0 && self.growth_factor.is_finite()) {
            return Err(EcsError::InvalidConfig(format!(
                "growth_factor must be a finite value above 1.0, got {}",
                self.growth_factor
            )));
        }
        if self.max_chunk_size == 0 {
            return Err(EcsError::InvalidConfig(
                "max_chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Chunk size actually used by query dispatch.
    #[must_use]
    pub fn effective_chunk_size(&self) -> usize {
        let clamped = u32::try_from(self.max_chunk_size).unwrap_or(u32::MAX);
        (highest_power_of_two_in(clamped) as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(WorldConfig::default().validate().is_ok());
        assert!(WorldConfig::large().validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = WorldConfig::from_toml_str("max_chunk_size = 300").unwrap();
        assert_eq!(config.max_chunk_size, 300);
        assert_eq!(config.initial_capacity, 10);
        assert_eq!(config.effective_chunk_size(), 256);
    }

    #[test]
    fn test_rejects_bad_growth() {
        let err = WorldConfig::from_toml_str("growth_factor = 1.0").unwrap_err();
        assert!(matches!(err, EcsError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(WorldConfig::from_toml_str("chunk = 4").is_err());
    }

    #[test]
    fn test_rejects_zero_chunk() {
        assert!(WorldConfig::from_toml_str("max_chunk_size = 0").is_err());
    }
}
