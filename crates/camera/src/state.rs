use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};
use serde::Serialize;

use crate::error::CameraError;

/// Camera pose: position plus yaw/pitch, with a derived orthonormal basis.
///
/// Yaw 0 looks along +X; positive yaw turns toward +Z. Positive pitch looks up.
/// The basis fields are private so they can only change together with the angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraState {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    pitch_limit: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl CameraState {
    /// `pitch_limit` must lie in `(0, π/2)`; pitch is clamped to `±pitch_limit`.
    pub fn new(position: Vec3, yaw: f32, pitch: f32, pitch_limit: f32) -> Result<Self, CameraError> {
        if !(pitch_limit > 0.0 && pitch_limit < FRAC_PI_2) {
            return Err(CameraError::InvalidParameter {
                name: "pitch_limit",
                reason: format!("must be inside (0, π/2), got {pitch_limit}"),
            });
        }
        if !position.is_finite() {
            return Err(CameraError::InvalidParameter {
                name: "position",
                reason: "must be finite".into(),
            });
        }
        let mut state = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            pitch_limit,
            forward: Vec3::X,
            right: Vec3::Z,
            up: Vec3::Y,
        };
        state.set_orientation(yaw, pitch);
        Ok(state)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Set yaw and pitch, clamping pitch, and recompute the basis.
    ///
    /// Returns false and changes nothing if either angle is not finite.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) -> bool {
        if !yaw.is_finite() || !pitch.is_finite() {
            return false;
        }
        let pitch = pitch.clamp(-self.pitch_limit, self.pitch_limit);
        let forward = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        if !(forward.is_finite() && right.is_finite() && up.is_finite()) {
            return false;
        }
        self.yaw = yaw;
        self.pitch = pitch;
        self.forward = forward;
        self.right = right;
        self.up = up;
        true
    }

    /// Rotation taking +X to `forward` without roll.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw) * Quat::from_rotation_z(self.pitch)
    }

    /// Adopt the orientation of `rotation`, ignoring any roll it carries.
    pub fn set_rotation(&mut self, rotation: Quat) -> bool {
        let forward = rotation * Vec3::X;
        if !forward.is_finite() || forward.length_squared() < 1e-12 {
            return false;
        }
        let forward = forward.normalize();
        self.set_orientation(forward.z.atan2(forward.x), forward.y.clamp(-1.0, 1.0).asin())
    }

    /// Turn toward `target`. A target at the camera position is ignored.
    pub fn look_at(&mut self, target: Vec3) -> bool {
        let dir = target - self.position;
        if dir.length_squared() < 1e-12 {
            return false;
        }
        let dir = dir.normalize();
        self.set_orientation(dir.z.atan2(dir.x), dir.y.clamp(-1.0, 1.0).asin())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, Vec3::Y)
    }
}

/// Rotation that looks from `from` toward `to`, if they are distinct.
pub fn look_rotation(from: Vec3, to: Vec3, pitch_limit: f32) -> Option<Quat> {
    let mut probe = CameraState::new(from, 0.0, 0.0, pitch_limit).ok()?;
    probe.look_at(to).then(|| probe.rotation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const LIMIT: f32 = FRAC_PI_2 - 0.1;

    fn assert_orthonormal(s: &CameraState) {
        let eps = 1e-5;
        assert!((s.forward().length() - 1.0).abs() < eps);
        assert!((s.right().length() - 1.0).abs() < eps);
        assert!((s.up().length() - 1.0).abs() < eps);
        assert!(s.forward().dot(s.right()).abs() < eps);
        assert!(s.forward().dot(s.up()).abs() < eps);
        assert!(s.right().dot(s.up()).abs() < eps);
    }

    #[test]
    fn zero_angles_look_along_x() {
        let s = CameraState::new(Vec3::ZERO, 0.0, 0.0, LIMIT).unwrap();
        assert!((s.forward() - Vec3::X).length() < 1e-6);
        assert!((s.right() - Vec3::Z).length() < 1e-6);
        assert!((s.up() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn bad_pitch_limit_rejected() {
        for limit in [-0.5, 0.0, FRAC_PI_2, f32::NAN] {
            assert!(matches!(
                CameraState::new(Vec3::ZERO, 0.0, 0.0, limit),
                Err(CameraError::InvalidParameter {
                    name: "pitch_limit",
                    ..
                })
            ));
        }
        assert!(CameraState::new(Vec3::splat(f32::INFINITY), 0.0, 0.0, LIMIT).is_err());
        assert_eq!(look_rotation(Vec3::ZERO, Vec3::X, f32::NAN), None);
    }

    #[test]
    fn basis_is_orthonormal_across_orientations() {
        let mut s = CameraState::new(Vec3::ZERO, 0.0, 0.0, LIMIT).unwrap();
        for i in 0..50 {
            let yaw = i as f32 * 0.7 - 10.0;
            let pitch = (i as f32 * 0.31).sin() * 3.0;
            assert!(s.set_orientation(yaw, pitch));
            assert_orthonormal(&s);
        }
    }

    #[test]
    fn pitch_is_clamped_inside_half_pi() {
        let mut s = CameraState::new(Vec3::ZERO, 0.0, 0.0, LIMIT).unwrap();
        s.set_orientation(0.0, 1e9);
        assert!(s.pitch() < FRAC_PI_2);
        assert_eq!(s.pitch(), LIMIT);
        s.set_orientation(0.0, -1e9);
        assert!(s.pitch() > -FRAC_PI_2);
    }

    #[test]
    fn non_finite_angles_are_rejected() {
        let mut s = CameraState::new(Vec3::ZERO, 0.3, 0.2, LIMIT).unwrap();
        let before = s;
        assert!(!s.set_orientation(f32::NAN, 0.0));
        assert!(!s.set_orientation(0.0, f32::INFINITY));
        assert_eq!(s, before);
    }

    #[test]
    fn rotation_maps_x_to_forward() {
        let s = CameraState::new(Vec3::ZERO, 1.2, -0.4, LIMIT).unwrap();
        assert!((s.rotation() * Vec3::X - s.forward()).length() < 1e-5);
    }

    #[test]
    fn set_rotation_recovers_angles() {
        let source = CameraState::new(Vec3::ZERO, 2.0, 0.5, LIMIT).unwrap();
        let mut s = CameraState::new(Vec3::ZERO, 0.0, 0.0, LIMIT).unwrap();
        assert!(s.set_rotation(source.rotation()));
        assert!((s.yaw() - 2.0).abs() < 1e-5);
        assert!((s.pitch() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut s = CameraState::new(Vec3::new(0.0, 5.0, 0.0), 0.0, 0.0, LIMIT).unwrap();
        assert!(s.look_at(Vec3::new(-10.0, 5.0, 0.0)));
        assert!((s.yaw().abs() - PI).abs() < 1e-5);
        assert!((s.forward() - Vec3::NEG_X).length() < 1e-5);
        assert!(!s.look_at(s.position));
    }

    #[test]
    fn look_at_straight_down_clamps_pitch() {
        let mut s = CameraState::new(Vec3::new(0.0, 5.0, 0.0), 0.0, 0.0, LIMIT).unwrap();
        assert!(s.look_at(Vec3::ZERO));
        assert_eq!(s.pitch(), -LIMIT);
        assert_orthonormal(&s);
    }

    #[test]
    fn view_matrix_is_finite() {
        let s = CameraState::new(Vec3::new(1.0, 2.0, 3.0), 0.5, -0.3, LIMIT).unwrap();
        assert!(s.view_matrix().is_finite());
    }
}
