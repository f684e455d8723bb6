//! Simulation tunables.

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Global parameters for the step pipeline. The world is y-down, so a
/// positive `gravity` pulls bodies toward the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f64,
    pub drag_coeff: f64,
    /// Tangential damping factor applied on floor and ceiling contact.
    pub ground_friction: f64,
    /// Tangential damping factor applied on wall contact.
    pub wall_friction: f64,
    /// Fixed AABB padding, also the floor of the predictive margin.
    pub fat_margin: f64,
    /// Predictive margin is `|v| * dt * predictive_factor`.
    pub predictive_factor: f64,
    /// Normal velocities below this are zeroed after a boundary hit.
    pub rest_velocity: f64,
    /// Tangential velocities below this are zeroed on floor and ceiling.
    pub floor_stop_velocity: f64,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 500.0,
            drag_coeff: 0.47,
            ground_friction: 0.98,
            wall_friction: 0.98,
            fat_margin: 2.0,
            predictive_factor: 3.0,
            rest_velocity: 0.1,
            floor_stop_velocity: 2.0,
        }
    }
}

impl PhysicsSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let all_finite = [
            self.gravity,
            self.drag_coeff,
            self.ground_friction,
            self.wall_friction,
            self.fat_margin,
            self.predictive_factor,
            self.rest_velocity,
            self.floor_stop_velocity,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(PhysicsError::InvalidSettings("values must be finite"));
        }
        if self.drag_coeff < 0.0 {
            return Err(PhysicsError::InvalidSettings("drag_coeff must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.ground_friction) || !(0.0..=1.0).contains(&self.wall_friction) {
            return Err(PhysicsError::InvalidSettings("friction factors must lie in [0, 1]"));
        }
        if self.fat_margin < 0.0 || self.predictive_factor < 0.0 {
            return Err(PhysicsError::InvalidSettings("margins must be non-negative"));
        }
        if self.rest_velocity < 0.0 || self.floor_stop_velocity < 0.0 {
            return Err(PhysicsError::InvalidSettings("velocity thresholds must be non-negative"));
        }
        Ok(())
    }

    /// Broadphase padding for a body moving at `speed` over `dt`.
    pub fn predictive_margin(&self, speed: f64, dt: f64) -> f64 {
        self.fat_margin.max(speed * dt * self.predictive_factor)
    }
}
