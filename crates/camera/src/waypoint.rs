use std::f32::consts::TAU;

use glade_tween::Easing;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::state::CameraState;

/// One leg of a scripted flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vec3,
    /// Point to face on arrival. `None` keeps the current orientation.
    #[serde(default)]
    pub look_at: Option<Vec3>,
    pub duration_ms: f32,
    #[serde(default)]
    pub easing: Easing,
}

impl Waypoint {
    pub fn new(position: Vec3, duration_ms: f32) -> Self {
        Self {
            position,
            look_at: None,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.look_at = Some(target);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Supplies the next leg of a scripted path when the current one completes.
///
/// Returning `None` ends the flight and hands control back to free-look.
pub trait WaypointPolicy {
    fn next_waypoint(&mut self, camera: &CameraState) -> Option<Waypoint>;
}

/// A fixed list of waypoints, optionally repeated forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointList {
    waypoints: Vec<Waypoint>,
    cursor: usize,
    looping: bool,
}

impl WaypointList {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            cursor: 0,
            looping: false,
        }
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.waypoints.len().saturating_sub(self.cursor)
    }
}

impl WaypointPolicy for WaypointList {
    fn next_waypoint(&mut self, _camera: &CameraState) -> Option<Waypoint> {
        if self.cursor >= self.waypoints.len() {
            if !self.looping || self.waypoints.is_empty() {
                return None;
            }
            self.cursor = 0;
        }
        let next = self.waypoints.get(self.cursor).cloned();
        self.cursor += 1;
        next
    }
}

/// Circles `center` at `radius` and `height`, always facing the centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitPath {
    pub center: Vec3,
    pub radius: f32,
    pub height: f32,
    /// Legs per full turn.
    pub segments: u32,
    pub segment_ms: f32,
    /// Number of full turns, or `None` to orbit until cancelled.
    pub laps: Option<u32>,
    angle: f32,
    issued: u32,
}

impl OrbitPath {
    pub fn new(center: Vec3, radius: f32, height: f32) -> Self {
        Self {
            center,
            radius,
            height,
            segments: 12,
            segment_ms: 500.0,
            laps: None,
            angle: 0.0,
            issued: 0,
        }
    }

    pub fn with_segments(mut self, segments: u32, segment_ms: f32) -> Self {
        self.segments = segments.max(3);
        self.segment_ms = segment_ms;
        self
    }

    pub fn with_laps(mut self, laps: u32) -> Self {
        self.laps = Some(laps);
        self
    }

    /// Position on the orbit at `angle` radians.
    pub fn point_at(&self, angle: f32) -> Vec3 {
        self.center + Vec3::new(self.radius * angle.cos(), self.height, self.radius * angle.sin())
    }
}

impl WaypointPolicy for OrbitPath {
    fn next_waypoint(&mut self, _camera: &CameraState) -> Option<Waypoint> {
        if let Some(laps) = self.laps {
            if self.issued >= laps.saturating_mul(self.segments) {
                return None;
            }
        }
        self.issued += 1;
        self.angle = (self.angle + TAU / self.segments as f32) % TAU;
        Some(Waypoint::new(self.point_at(self.angle), self.segment_ms).looking_at(self.center))
    }
}
