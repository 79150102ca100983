use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Interpolation curve for a tween.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// Ease-in-out quadratic.
    Quadratic,
    /// Ease-in-out cubic.
    Cubic,
    /// Positional cubic Bezier from the start position through two control
    /// points to the target. Time drives the curve parameter directly.
    Bezier { control1: Vec3, control2: Vec3 },
}

impl Easing {
    /// Eased progress for `t` in `[0, 1]`.
    ///
    /// Bezier is a path rather than a scalar ease, so its progress is `t`.
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear | Self::Bezier { .. } => t,
            Self::Quadratic => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::Cubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    /// False when a Bezier control point is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Bezier { control1, control2 } => control1.is_finite() && control2.is_finite(),
            _ => true,
        }
    }

    /// Position at progress `t` between `start` and `target`.
    pub fn position(&self, start: Vec3, target: Vec3, t: f32) -> Vec3 {
        match self {
            Self::Bezier { control1, control2 } => {
                cubic_bezier(start, *control1, *control2, target, t.clamp(0.0, 1.0))
            }
            _ => start.lerp(target, self.ease(t)),
        }
    }
}

/// Evaluate the cubic Bezier curve `p0 p1 p2 p3` at `t`.
pub fn cubic_bezier(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown easing `{0}` (expected linear, quadratic or cubic)")]
pub struct ParseEasingError(pub String);

/// Parses the host-style easing names ("LINEAR", "cubic", ...).
///
/// Bezier needs control points and cannot be named.
impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "quadratic" | "quad" => Ok(Self::Quadratic),
            "cubic" => Ok(Self::Cubic),
            _ => Err(ParseEasingError(s.to_string())),
        }
    }
}
