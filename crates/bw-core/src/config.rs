//! Dispatcher configuration.
//!
//! The thresholds that separate a click from a drag-start, and a click from
//! a double click, belong to the dispatcher rather than to individual tools.
//! Hosts typically map these to platform settings or user preferences.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for gesture detection in the tool box connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Pointer travel from the press position, in pixels, beyond which a
    /// held press becomes a drag-start. Measured per axis (the larger of
    /// |dx| and |dy|); the travel must strictly exceed it. Default: **3.0**.
    pub drag_threshold: f32,

    /// Maximum time between two releases for the second one to count as a
    /// double click. Default: **400 ms**.
    pub double_click_interval_ms: u64,

    /// Maximum pointer distance between the two releases of a double click.
    /// Default: **4.0**.
    pub double_click_distance: f32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
            double_click_interval_ms: 400,
            double_click_distance: 4.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse dispatch config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid dispatch config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl DispatchConfig {
    /// Parse a JSON object; missing keys take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distance("drag_threshold", self.drag_threshold)?;
        check_distance("double_click_distance", self.double_click_distance)?;
        if self.double_click_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "double_click_interval_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

fn check_distance(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must not be negative",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_keys_use_defaults() {
        let config = DispatchConfig::from_json(r#"{ "drag_threshold": 8.0 }"#).unwrap();
        assert_eq!(
            config,
            DispatchConfig {
                drag_threshold: 8.0,
                ..DispatchConfig::default()
            }
        );
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(DispatchConfig::from_json("{}").unwrap(), DispatchConfig::default());
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let err = DispatchConfig::from_json(r#"{ "drag_threshold": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "drag_threshold",
                ..
            }
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = DispatchConfig::from_json(r#"{ "double_click_interval_ms": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("double_click_interval_ms"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = DispatchConfig::from_json("{ drag_threshold: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
