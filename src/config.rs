use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const DEFAULT_CELL_PITCH: f64 = 50.0;
pub const DEFAULT_MIN_SCALE: f64 = 0.01;
pub const DEFAULT_MAX_SCALE: f64 = 2.0;
pub const DEFAULT_TICK_PERIOD_MS: u32 = 200;
pub const DEFAULT_WHEEL_DIVISOR: f64 = 5000.0;

/// Tunables for one engine instance. Every field has a default, so a stored
/// override only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Unscaled pixel size of one grid cell.
    pub cell_pitch: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Simulation tick period while running.
    pub tick_period_ms: u32,
    /// Wheel delta is divided by this before being applied as a scale step.
    pub wheel_divisor: f64,
    /// Key code that arms pan-drag while held.
    pub pan_modifier: String,
    /// Key code that starts/stops the simulation.
    pub run_toggle: String,
    /// Max pointer travel between press and release that still counts as a click.
    pub click_slop_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cell_pitch: DEFAULT_CELL_PITCH,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            wheel_divisor: DEFAULT_WHEEL_DIVISOR,
            pan_modifier: "ShiftLeft".into(),
            run_toggle: "Space".into(),
            click_slop_px: 4.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            serde_json::from_str(raw).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: &str| Err(EngineError::InvalidConfig(msg.into()));
        if !(self.cell_pitch.is_finite() && self.cell_pitch > 0.0) {
            return invalid("cell_pitch must be positive");
        }
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return invalid("min_scale must be positive");
        }
        if !(self.max_scale.is_finite() && self.max_scale >= self.min_scale) {
            return invalid("max_scale must not be below min_scale");
        }
        if self.tick_period_ms == 0 {
            return invalid("tick_period_ms must be positive");
        }
        if !(self.wheel_divisor.is_finite() && self.wheel_divisor > 0.0) {
            return invalid("wheel_divisor must be positive");
        }
        if !(self.click_slop_px.is_finite() && self.click_slop_px >= 0.0) {
            return invalid("click_slop_px must not be negative");
        }
        if self.pan_modifier.is_empty() || self.run_toggle.is_empty() {
            return invalid("key codes must not be empty");
        }
        if self.pan_modifier == self.run_toggle {
            return invalid("pan_modifier and run_toggle must differ");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_pitch, 50.0);
        assert_eq!(config.tick_period_ms, 200);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = EngineConfig::from_json(r#"{"tick_period_ms": 80, "run_toggle": "Enter"}"#)
            .expect("override parses");
        assert_eq!(config.tick_period_ms, 80);
        assert_eq!(config.run_toggle, "Enter");
        assert_eq!(config.pan_modifier, "ShiftLeft");
        assert_eq!(config.max_scale, DEFAULT_MAX_SCALE);
    }

    #[test]
    fn rejects_unusable_values() {
        for raw in [
            r#"{"cell_pitch": 0}"#,
            r#"{"min_scale": 3.0}"#,
            r#"{"tick_period_ms": 0}"#,
            r#"{"pan_modifier": "Space"}"#,
            r#"{"wheel_divisor": -1}"#,
        ] {
            assert!(
                matches!(EngineConfig::from_json(raw), Err(EngineError::InvalidConfig(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
