use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// How vertical pointer movement maps onto pitch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchInput {
    /// Moving the pointer down looks down.
    #[default]
    Standard,
    /// Moving the pointer down looks up.
    Inverted,
}

impl PitchInput {
    /// Pitch change for a vertical pointer delta.
    pub fn pitch_delta(self, dy: f32, sensitivity: f32) -> f32 {
        match self {
            Self::Standard => -dy * sensitivity,
            Self::Inverted => dy * sensitivity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World units per second.
    pub speed: f32,
    /// Radians per pointer unit.
    pub sensitivity: f32,
    /// Distance kept between the pitch limit and ±π/2.
    pub pitch_margin: f32,
    pub pitch_input: PitchInput,
    pub start_position: Vec3,
    pub start_yaw: f32,
    pub start_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            sensitivity: 0.002,
            pitch_margin: 0.1,
            pitch_input: PitchInput::Standard,
            start_position: Vec3::new(0.0, 12.0, 20.0),
            start_yaw: -FRAC_PI_2,
            start_pitch: -0.4,
        }
    }
}

impl CameraConfig {
    pub fn pitch_limit(&self) -> f32 {
        FRAC_PI_2 - self.pitch_margin
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        let invalid = |name, reason: String| Err(CameraError::InvalidParameter { name, reason });
        if !self.speed.is_finite() || self.speed < 0.0 {
            return invalid("speed", format!("must be finite and non-negative, got {}", self.speed));
        }
        if !self.sensitivity.is_finite() {
            return invalid("sensitivity", format!("must be finite, got {}", self.sensitivity));
        }
        if !(self.pitch_margin > 0.0 && self.pitch_margin < FRAC_PI_2) {
            return invalid(
                "pitch_margin",
                format!("must be inside (0, π/2), got {}", self.pitch_margin),
            );
        }
        if !self.start_position.is_finite() || !self.start_yaw.is_finite() || !self.start_pitch.is_finite() {
            return invalid("start_pose", "start position and angles must be finite".into());
        }
        Ok(())
    }
}
