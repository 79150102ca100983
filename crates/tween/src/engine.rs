use std::collections::BTreeMap;

use glade_common::{ObjectId, Transform};
use glade_graph::TransformGraph;
use glam::{Quat, Vec3};

use crate::easing::Easing;

/// Progress at which "nearing end" fires unless configured otherwise.
pub const DEFAULT_NEAR_END_THRESHOLD: f32 = 0.9;

/// One-shot notification, called with the animated object's id.
pub type TweenCallback = Box<dyn FnOnce(ObjectId)>;

/// Errors from tween operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TweenError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("object {0} is not in the transform graph")]
    UnknownObject(ObjectId),
}

/// An animated move request.
pub struct TweenRequest {
    pub target_position: Vec3,
    pub target_rotation: Option<Quat>,
    pub duration_ms: f32,
    pub easing: Easing,
    on_nearing_end: Option<TweenCallback>,
    on_complete: Option<TweenCallback>,
}

impl TweenRequest {
    pub fn new(target_position: Vec3, duration_ms: f32) -> Self {
        Self {
            target_position,
            target_rotation: None,
            duration_ms,
            easing: Easing::Linear,
            on_nearing_end: None,
            on_complete: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.target_rotation = Some(rotation);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_nearing_end(mut self, callback: impl FnOnce(ObjectId) + 'static) -> Self {
        self.on_nearing_end = Some(Box::new(callback));
        self
    }

    pub fn on_complete(mut self, callback: impl FnOnce(ObjectId) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for TweenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenRequest")
            .field("target_position", &self.target_position)
            .field("target_rotation", &self.target_rotation)
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("on_nearing_end", &self.on_nearing_end.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Result of advancing one tween by one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenUpdate {
    pub id: ObjectId,
    /// The node's local transform after this step.
    pub local: Transform,
    /// "Nearing end" fired during this step.
    pub nearing_end: bool,
    /// The tween finished during this step and has been removed.
    pub completed: bool,
}

struct Tween {
    start: Transform,
    request: TweenRequest,
    elapsed_ms: f32,
    nearing_end_fired: bool,
}

impl Tween {
    fn progress(&self, elapsed_ms: f32) -> f32 {
        (elapsed_ms / self.request.duration_ms).clamp(0.0, 1.0)
    }

    /// Position and rotation at progress `t`; exactly the target at `t = 1`.
    fn sample(&self, t: f32) -> (Vec3, Quat) {
        let request = &self.request;
        let target_rotation = request.target_rotation.unwrap_or(self.start.rotation);
        if t >= 1.0 {
            return (request.target_position, target_rotation);
        }
        let position = request
            .easing
            .position(self.start.position, request.target_position, t);
        let rotation = match request.target_rotation {
            Some(target) => self.start.rotation.slerp(target, request.easing.ease(t)),
            None => self.start.rotation,
        };
        (position, rotation)
    }
}

/// Drives all active tweens, at most one per object.
pub struct TweenEngine {
    tweens: BTreeMap<ObjectId, Tween>,
    near_end_threshold: f32,
}

impl Default for TweenEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TweenEngine {
    pub fn new() -> Self {
        Self {
            tweens: BTreeMap::new(),
            near_end_threshold: DEFAULT_NEAR_END_THRESHOLD,
        }
    }

    /// Use a different "nearing end" progress threshold, strictly inside `(0, 1)`.
    pub fn with_near_end_threshold(mut self, threshold: f32) -> Result<Self, TweenError> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(TweenError::InvalidParameter {
                name: "near_end_threshold",
                reason: format!("must be inside (0, 1), got {threshold}"),
            });
        }
        self.near_end_threshold = threshold;
        Ok(self)
    }

    pub fn near_end_threshold(&self) -> f32 {
        self.near_end_threshold
    }

    /// Start animating `id` from its current local transform.
    ///
    /// Replaces any active tween on `id`; the replaced tween's pending
    /// callbacks are dropped without firing.
    pub fn start(
        &mut self,
        graph: &TransformGraph,
        id: ObjectId,
        request: TweenRequest,
    ) -> Result<(), TweenError> {
        if !request.duration_ms.is_finite() || request.duration_ms <= 0.0 {
            return Err(TweenError::InvalidParameter {
                name: "duration_ms",
                reason: format!("must be finite and positive, got {}", request.duration_ms),
            });
        }
        let finite_target = request.target_position.is_finite()
            && request.target_rotation.is_none_or(|r| r.is_finite());
        if !finite_target {
            return Err(TweenError::InvalidParameter {
                name: "target",
                reason: "target position and rotation must be finite".into(),
            });
        }
        if !request.easing.is_finite() {
            return Err(TweenError::InvalidParameter {
                name: "control_points",
                reason: "bezier control points must be finite".into(),
            });
        }
        let start = graph.local(id).map_err(|_| TweenError::UnknownObject(id))?;

        let replaced = self.tweens.insert(
            id,
            Tween {
                start,
                request,
                elapsed_ms: 0.0,
                nearing_end_fired: false,
            },
        );
        if replaced.is_some() {
            tracing::debug!(id = %id.short(), "replaced active tween");
        }
        Ok(())
    }

    /// Remove the tween on `id`, leaving the node wherever it currently is.
    pub fn cancel(&mut self, id: ObjectId) -> bool {
        self.tweens.remove(&id).is_some()
    }

    pub fn is_active(&self, id: ObjectId) -> bool {
        self.tweens.contains_key(&id)
    }

    /// Progress in `[0, 1]` of the tween on `id`.
    pub fn progress(&self, id: ObjectId) -> Option<f32> {
        self.tweens.get(&id).map(|t| t.progress(t.elapsed_ms))
    }

    /// Ids with an active tween, in id order.
    pub fn active(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.tweens.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Advance every active tween by `delta_ms` and write the results into `graph`.
    ///
    /// A step whose output is not finite is not written, but its time still
    /// counts toward the tween's duration. A tween whose node has left the graph is dropped. Callbacks run
    /// after all tweens have been advanced.
    pub fn advance(&mut self, graph: &mut TransformGraph, delta_ms: f32) -> Vec<TweenUpdate> {
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            tracing::debug!(delta_ms, "ignoring invalid tween delta");
            return Vec::new();
        }

        let mut updates = Vec::with_capacity(self.tweens.len());
        let mut finished = Vec::new();
        let mut callbacks: Vec<(ObjectId, TweenCallback)> = Vec::new();

        for (&id, tween) in self.tweens.iter_mut() {
            tween.elapsed_ms += delta_ms;
            let t = tween.progress(tween.elapsed_ms);
            let (position, rotation) = tween.sample(t);
            // Time still moves on, so the pinned target at t = 1 ends the tween.
            if !position.is_finite() || !rotation.is_finite() {
                tracing::trace!(id = %id.short(), t, "discarding non-finite tween output");
                continue;
            }
            if graph.set_local(id, position, rotation).is_err() {
                tracing::warn!(id = %id.short(), "tween target left the graph; dropping tween");
                finished.push(id);
                continue;
            }

            let nearing_end = !tween.nearing_end_fired && t >= self.near_end_threshold;
            if nearing_end {
                tween.nearing_end_fired = true;
                if let Some(cb) = tween.request.on_nearing_end.take() {
                    callbacks.push((id, cb));
                }
            }
            let completed = t >= 1.0;
            if completed {
                finished.push(id);
                if let Some(cb) = tween.request.on_complete.take() {
                    callbacks.push((id, cb));
                }
            }

            let local = graph.local(id).unwrap_or(tween.start);
            updates.push(TweenUpdate {
                id,
                local,
                nearing_end,
                completed,
            });
        }

        for id in finished {
            self.tweens.remove(&id);
        }
        for (id, cb) in callbacks {
            cb(id);
        }
        updates
    }
}
