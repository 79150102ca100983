use std::f32::consts::TAU;

use glade_common::{ObjectId, Transform};
use glade_graph::TransformGraph;
use glade_input::{InputState, KeyBindings, MoveIntent};
use glade_tween::{TweenEngine, TweenRequest, TweenUpdate};
use glam::{Vec2, Vec3};

use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::state::{CameraState, look_rotation};
use crate::waypoint::{Waypoint, WaypointPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Pointer look and key movement.
    Free,
    /// Pose driven by a tween on the camera node.
    Scripted,
}

/// What [`CameraController::after_tweens`] did when a flight leg ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraTransition {
    /// The waypoint policy supplied another leg, which is now running.
    NextLeg,
    /// The flight is over; the camera is back in free-look.
    Finished,
}

/// Owns the camera's pose and mode. The pose is mirrored into a transform
/// graph node created by [`CameraController::spawn`].
pub struct CameraController {
    id: ObjectId,
    state: CameraState,
    config: CameraConfig,
    mode: CameraMode,
    policy: Option<Box<dyn WaypointPolicy>>,
}

impl std::fmt::Debug for CameraController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("has_policy", &self.policy.is_some())
            .finish()
    }
}

impl CameraController {
    /// Create the camera and its graph node at the configured start pose.
    pub fn spawn(graph: &mut TransformGraph, config: CameraConfig) -> Result<Self, CameraError> {
        config.validate()?;
        let state = CameraState::new(
            config.start_position,
            config.start_yaw,
            config.start_pitch,
            config.pitch_limit(),
        )?;
        let controller = Self {
            id: ObjectId::new(),
            state,
            config,
            mode: CameraMode::Free,
            policy: None,
        };
        graph.insert(controller.id, controller.transform())?;
        tracing::debug!(id = %controller.id.short(), "camera spawned");
        Ok(controller)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.state.position, self.state.rotation())
    }

    /// Apply one frame of recorded input. `dt` is in seconds.
    ///
    /// The pointer delta is consumed in both modes; in Scripted mode it is
    /// discarded. Returns whether the pose changed.
    pub fn update(
        &mut self,
        graph: &mut TransformGraph,
        input: &mut InputState,
        bindings: &KeyBindings,
        dt: f32,
    ) -> Result<bool, CameraError> {
        let pointer = input.take_pointer_delta();
        if self.mode == CameraMode::Scripted {
            return Ok(false);
        }
        let turned = self.apply_look(pointer);
        let moved = self.apply_move(input.move_intent(bindings), dt);
        if turned || moved {
            self.write(graph)?;
        }
        Ok(turned || moved)
    }

    /// Accumulate a pointer delta into yaw/pitch. Non-finite deltas are dropped.
    pub fn apply_look(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        if !delta.is_finite() {
            tracing::debug!(?delta, "discarding non-finite look delta");
            return false;
        }
        let sensitivity = self.config.sensitivity;
        let yaw = (self.state.yaw() + delta.x * sensitivity).rem_euclid(TAU);
        let pitch = self.state.pitch() + self.config.pitch_input.pitch_delta(delta.y, sensitivity);
        self.state.set_orientation(yaw, pitch)
    }

    /// Translate by held-key intent over `dt` seconds.
    ///
    /// Forward and right use their horizontal projections so pitch does not
    /// change ground speed; up is world-up. A non-finite delta is dropped.
    pub fn apply_move(&mut self, intent: MoveIntent, dt: f32) -> bool {
        let step = self.config.speed * dt;
        let forward = self.state.forward();
        let right = self.state.right();
        let flat_forward = Vec3::new(forward.x, 0.0, forward.z).normalize();
        let flat_right = Vec3::new(right.x, 0.0, right.z).normalize();
        let delta = (flat_forward * intent.forward + flat_right * intent.right) * step
            + Vec3::Y * (intent.up * step);
        if !delta.is_finite() {
            tracing::debug!(?delta, dt, "discarding non-finite movement delta");
            return false;
        }
        if delta == Vec3::ZERO {
            return false;
        }
        self.state.position += delta;
        true
    }

    /// Free-look: move to `position` without changing orientation.
    pub fn teleport(&mut self, graph: &mut TransformGraph, position: Vec3) -> Result<bool, CameraError> {
        if !position.is_finite() {
            return Ok(false);
        }
        self.state.position = position;
        self.write(graph)?;
        Ok(true)
    }

    /// Free-look: turn toward `target`.
    pub fn look_at(&mut self, graph: &mut TransformGraph, target: Vec3) -> Result<bool, CameraError> {
        if !self.state.look_at(target) {
            return Ok(false);
        }
        self.write(graph)?;
        Ok(true)
    }

    /// Fly to a single waypoint, replacing any flight in progress.
    pub fn fly_to(
        &mut self,
        graph: &TransformGraph,
        tweens: &mut TweenEngine,
        waypoint: Waypoint,
    ) -> Result<(), CameraError> {
        self.start_leg(graph, tweens, waypoint)?;
        self.policy = None;
        Ok(())
    }

    /// Fly a path, asking `policy` for each next leg as the previous completes.
    pub fn follow_path(
        &mut self,
        graph: &TransformGraph,
        tweens: &mut TweenEngine,
        mut policy: impl WaypointPolicy + 'static,
    ) -> Result<(), CameraError> {
        let first = policy.next_waypoint(&self.state).ok_or(CameraError::EmptyPath)?;
        self.start_leg(graph, tweens, first)?;
        self.policy = Some(Box::new(policy));
        Ok(())
    }

    /// Stop a flight, leaving the camera where the tween left it.
    pub fn cancel_flight(&mut self, graph: &TransformGraph, tweens: &mut TweenEngine) -> bool {
        if self.mode == CameraMode::Free {
            return false;
        }
        tweens.cancel(self.id);
        if let Ok(local) = graph.local(self.id) {
            self.sync(local);
        }
        self.finish_flight();
        true
    }

    /// Mirror this step's tween output and move the flight along.
    ///
    /// Call once per step after [`TweenEngine::advance`].
    pub fn after_tweens(
        &mut self,
        graph: &TransformGraph,
        tweens: &mut TweenEngine,
        updates: &[TweenUpdate],
    ) -> Result<Option<CameraTransition>, CameraError> {
        if self.mode != CameraMode::Scripted {
            return Ok(None);
        }
        match updates.iter().find(|u| u.id == self.id) {
            Some(update) => {
                self.sync(update.local);
                if !update.completed {
                    return Ok(None);
                }
            }
            None if tweens.is_active(self.id) => return Ok(None),
            None => {}
        }

        let state = self.state;
        let next = self.policy.as_mut().and_then(|p| p.next_waypoint(&state));
        match next {
            Some(waypoint) => {
                if let Err(err) = self.start_leg(graph, tweens, waypoint) {
                    self.finish_flight();
                    return Err(err);
                }
                Ok(Some(CameraTransition::NextLeg))
            }
            None => {
                self.finish_flight();
                Ok(Some(CameraTransition::Finished))
            }
        }
    }

    fn start_leg(
        &mut self,
        graph: &TransformGraph,
        tweens: &mut TweenEngine,
        waypoint: Waypoint,
    ) -> Result<(), CameraError> {
        let mut request =
            TweenRequest::new(waypoint.position, waypoint.duration_ms).with_easing(waypoint.easing);
        if let Some(rotation) = waypoint
            .look_at
            .and_then(|target| look_rotation(waypoint.position, target, self.state.pitch_limit()))
        {
            request = request.with_rotation(rotation);
        }
        tweens.start(graph, self.id, request)?;
        self.mode = CameraMode::Scripted;
        tracing::debug!(id = %self.id.short(), target = ?waypoint.position, "camera flight leg started");
        Ok(())
    }

    fn finish_flight(&mut self) {
        self.mode = CameraMode::Free;
        self.policy = None;
        tracing::debug!(id = %self.id.short(), "camera back in free-look");
    }

    fn sync(&mut self, local: Transform) {
        if local.position.is_finite() {
            self.state.position = local.position;
        }
        self.state.set_rotation(local.rotation);
    }

    fn write(&self, graph: &mut TransformGraph) -> Result<(), CameraError> {
        graph.set_local(self.id, self.state.position, self.state.rotation())?;
        Ok(())
    }
}
