use std::collections::BTreeSet;
use std::time::Duration;

use glade_camera::{CameraController, CameraTransition, Waypoint, WaypointPolicy};
use glade_common::{ObjectId, Transform};
use glade_graph::TransformGraph;
use glade_host::{ObjectSpec, SceneHost, UniformTarget, UniformValue};
use glade_input::{InputEvent, InputState};
use glade_terrain::{DecorationKind, DecorationRegistry, HeightMap, PlacementDirective, TerrainBuilder};
use glade_tween::{TweenEngine, TweenRequest};
use glam::{Quat, Vec3};

use crate::config::SessionConfig;
use crate::error::RuntimeError;
use crate::flush::{FlushStats, flush_events};

/// Global uniform carrying elapsed session time in seconds.
pub const TIME_UNIFORM: &str = "uTime";

/// A world that has been placed into the host.
#[derive(Debug, Clone)]
pub struct BuiltWorld {
    pub heightmap: HeightMap,
    pub registry: DecorationRegistry,
    pub terrain_count: usize,
    pub water_count: usize,
    pub decoration_count: usize,
    ids: Vec<ObjectId>,
}

impl BuiltWorld {
    /// Ids of every placed object, in directive order.
    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn object_count(&self) -> usize {
        self.ids.len()
    }
}

/// What one [`Session::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub tick: u64,
    /// Simulated seconds after clamping to `max_step`.
    pub dt: f32,
    pub tween_updates: usize,
    pub tweens_completed: usize,
    pub camera_moved: bool,
    pub camera_transition: Option<CameraTransition>,
    pub crystals_spun: usize,
    pub flush: FlushStats,
}

/// Owns the transform graph, tweens, camera, recorded input and the built
/// world, and mirrors all of it into a [`SceneHost`] once per step.
pub struct Session {
    config: SessionConfig,
    graph: TransformGraph,
    tweens: TweenEngine,
    camera: CameraController,
    input: InputState,
    world: Option<BuiltWorld>,
    spawned: BTreeSet<ObjectId>,
    tick: u64,
    elapsed: Duration,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        let mut graph = TransformGraph::new();
        let tweens = TweenEngine::new().with_near_end_threshold(config.near_end_threshold)?;
        let camera = CameraController::spawn(&mut graph, config.camera.clone())?;
        Ok(Self {
            config,
            graph,
            tweens,
            camera,
            input: InputState::new(),
            world: None,
            spawned: BTreeSet::new(),
            tick: 0,
            elapsed: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn graph(&self) -> &TransformGraph {
        &self.graph
    }

    pub fn tweens(&self) -> &TweenEngine {
        &self.tweens
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn world(&self) -> Option<&BuiltWorld> {
        self.world.as_ref()
    }

    /// Objects created through [`Session::spawn_object`] that still exist.
    pub fn spawned(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.spawned.iter().copied()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Generate the configured world and create every directive in `host`.
    ///
    /// Issues exactly one create call per directive, plus one parent call per
    /// parented directive. On failure everything placed so far is removed again.
    pub fn build_world(&mut self, host: &mut dyn SceneHost) -> Result<&BuiltWorld, RuntimeError> {
        if self.world.is_some() {
            return Err(RuntimeError::WorldAlreadyBuilt);
        }
        let build = TerrainBuilder::new(self.config.terrain.clone())?.build()?;
        let _span = tracing::info_span!("world_build", directives = build.directives.len()).entered();

        // Anything pending belongs to earlier steps and must reach the host
        // before the build's own events are discarded below.
        flush_events(self.graph.drain_events(), &self.graph, self.camera.id(), host)?;

        let mut placed = Vec::with_capacity(build.directives.len());
        if let Err(err) = self.place(host, &build.directives, &mut placed) {
            tracing::warn!(error = %err, placed = placed.len(), "world build failed; rolling back");
            self.rollback(host, &placed);
            self.graph.drain_events();
            return Err(err);
        }
        self.graph.drain_events();

        let world = BuiltWorld {
            terrain_count: build.terrain_count(),
            water_count: build.water_count(),
            decoration_count: build.decoration_count(),
            heightmap: build.heightmap,
            registry: build.registry,
            ids: placed,
        };
        tracing::info!(
            objects = world.object_count(),
            terrain = world.terrain_count,
            water = world.water_count,
            decorations = world.registry.len(),
            "world placed"
        );
        Ok(self.world.insert(world))
    }

    fn place(
        &mut self,
        host: &mut dyn SceneHost,
        directives: &[PlacementDirective],
        placed: &mut Vec<ObjectId>,
    ) -> Result<(), RuntimeError> {
        for directive in directives {
            self.graph.insert(directive.id, directive.transform())?;
            placed.push(directive.id);
            let spec = ObjectSpec {
                primitive: directive.primitive,
                material: directive.material.clone(),
                transform: directive.transform(),
            };
            host.create_object(directive.id, &spec)?;
            if let Some(parent) = directive.parent {
                self.graph.set_parent(directive.id, Some(parent))?;
                host.set_parent(directive.id, Some(parent))?;
            }
        }
        Ok(())
    }

    fn rollback(&mut self, host: &mut dyn SceneHost, placed: &[ObjectId]) {
        for &id in placed.iter().rev() {
            self.tweens.cancel(id);
            if self.graph.contains(id) {
                let _ = self.graph.remove(id);
            }
            if let Err(err) = host.destroy_object(id) {
                tracing::debug!(id = %id.short(), error = %err, "rollback skipped host object");
            }
        }
    }

    /// Destroy every object the current world placed. Returns how many were destroyed.
    ///
    /// Spawned objects parented to world objects survive as roots at their
    /// previous world transform.
    pub fn teardown_world(&mut self, host: &mut dyn SceneHost) -> Result<usize, RuntimeError> {
        let Some(world) = self.world.take() else {
            return Ok(0);
        };
        let _span = tracing::info_span!("world_teardown", objects = world.object_count()).entered();
        let mut destroyed = 0;
        for &id in world.ids.iter().rev() {
            if !self.graph.contains(id) {
                continue;
            }
            self.tweens.cancel(id);
            self.graph.remove(id)?;
            host.destroy_object(id)?;
            destroyed += 1;
        }
        tracing::info!(destroyed, "world torn down");
        Ok(destroyed)
    }

    /// Record an input event. Nothing moves until the next step.
    pub fn handle_input(&mut self, event: &InputEvent) {
        self.input.record(event);
    }

    /// Create a runtime object, optionally under `parent`.
    ///
    /// The host sees the parent link on the next step.
    pub fn spawn_object(
        &mut self,
        host: &mut dyn SceneHost,
        spec: ObjectSpec,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId, RuntimeError> {
        if let Some(p) = parent {
            self.scene_object(p)?;
        }
        if !spec.transform.is_finite() {
            return Err(RuntimeError::InvalidParameter {
                name: "transform",
                reason: "spawn transform must be finite".into(),
            });
        }
        let id = ObjectId::new();
        self.graph.insert(id, spec.transform)?;
        if let Err(err) = host.create_object(id, &spec) {
            self.graph.remove(id)?;
            return Err(err.into());
        }
        if parent.is_some() {
            self.graph.set_parent(id, parent)?;
        }
        self.spawned.insert(id);
        tracing::debug!(id = %id.short(), kind = spec.primitive.kind_name(), "spawned object");
        Ok(id)
    }

    /// Destroy one object. Its children become roots without moving.
    pub fn remove_object(&mut self, host: &mut dyn SceneHost, id: ObjectId) -> Result<(), RuntimeError> {
        self.scene_object(id)?;
        self.tweens.cancel(id);
        self.graph.remove(id)?;
        host.destroy_object(id)?;
        self.spawned.remove(&id);
        if let Some(world) = self.world.as_mut() {
            world.registry.remove(id);
        }
        Ok(())
    }

    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<(), RuntimeError> {
        self.scene_object(id)?;
        if let Some(p) = parent {
            self.scene_object(p)?;
        }
        self.graph.set_parent(id, parent)?;
        Ok(())
    }

    pub fn set_local(&mut self, id: ObjectId, position: Vec3, rotation: Quat) -> Result<(), RuntimeError> {
        self.scene_object(id)?;
        if !position.is_finite() || !rotation.is_finite() {
            return Err(RuntimeError::InvalidParameter {
                name: "transform",
                reason: "position and rotation must be finite".into(),
            });
        }
        self.graph.set_local(id, position, rotation)?;
        Ok(())
    }

    pub fn world_transform(&self, id: ObjectId) -> Result<Transform, RuntimeError> {
        Ok(self.graph.world_transform(id)?)
    }

    /// Tween a scene object. Replaces any tween already running on it.
    pub fn animate(&mut self, id: ObjectId, request: TweenRequest) -> Result<(), RuntimeError> {
        self.scene_object(id)?;
        self.tweens.start(&self.graph, id, request)?;
        Ok(())
    }

    pub fn cancel_animation(&mut self, id: ObjectId) -> bool {
        id != self.camera.id() && self.tweens.cancel(id)
    }

    pub fn fly_camera_to(&mut self, waypoint: Waypoint) -> Result<(), RuntimeError> {
        self.camera.fly_to(&self.graph, &mut self.tweens, waypoint)?;
        Ok(())
    }

    pub fn follow_camera_path(&mut self, policy: impl WaypointPolicy + 'static) -> Result<(), RuntimeError> {
        self.camera.follow_path(&self.graph, &mut self.tweens, policy)?;
        Ok(())
    }

    pub fn cancel_camera_flight(&mut self) -> bool {
        self.camera.cancel_flight(&self.graph, &mut self.tweens)
    }

    /// Advance everything by `dt` (clamped to `max_step`) and push the
    /// resulting changes to `host` in one batch.
    pub fn step(&mut self, dt: Duration, host: &mut dyn SceneHost) -> Result<StepReport, RuntimeError> {
        self.tick += 1;
        let _span = tracing::info_span!("session_step", tick = self.tick).entered();

        let requested = dt.as_secs_f32();
        let dt = requested.min(self.config.max_step);
        if dt < requested {
            tracing::trace!(requested, dt, "clamped frame delta");
        }
        self.elapsed += Duration::from_secs_f32(dt);

        let camera_moved = self
            .camera
            .update(&mut self.graph, &mut self.input, &self.config.bindings, dt)?;
        let updates = self.tweens.advance(&mut self.graph, dt * 1000.0);
        let camera_transition = self
            .camera
            .after_tweens(&self.graph, &mut self.tweens, &updates)?;
        let crystals_spun = self.spin_crystals(dt)?;

        host.set_uniform(
            UniformTarget::Global,
            TIME_UNIFORM,
            UniformValue::Float(self.elapsed.as_secs_f32()),
        )?;
        let flush = flush_events(self.graph.drain_events(), &self.graph, self.camera.id(), host)?;

        let report = StepReport {
            tick: self.tick,
            dt,
            tween_updates: updates.len(),
            tweens_completed: updates.iter().filter(|u| u.completed).count(),
            camera_moved,
            camera_transition,
            crystals_spun,
            flush,
        };
        tracing::trace!(?report, "step complete");
        Ok(report)
    }

    /// Rotate crystal roots about world-up. Crystals under a tween are left alone.
    fn spin_crystals(&mut self, dt: f32) -> Result<usize, RuntimeError> {
        let spin = Quat::from_rotation_y(self.config.crystal_spin * dt);
        let Some(world) = self.world.as_ref() else {
            return Ok(0);
        };
        if self.config.crystal_spin == 0.0 {
            return Ok(0);
        }
        let mut spun = 0;
        for id in world.registry.ids(DecorationKind::Crystal) {
            if self.tweens.is_active(id) || !self.graph.contains(id) {
                continue;
            }
            let local = self.graph.local(id)?;
            self.graph
                .set_local(id, local.position, (spin * local.rotation).normalize())?;
            spun += 1;
        }
        Ok(spun)
    }

    /// Checks that `id` is a live scene object, not the camera.
    fn scene_object(&self, id: ObjectId) -> Result<(), RuntimeError> {
        if id == self.camera.id() {
            return Err(RuntimeError::CameraNode);
        }
        if !self.graph.contains(id) {
            return Err(RuntimeError::UnknownObject(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glade_camera::{CameraMode, WaypointList};
    use glade_common::{Material, Primitive};
    use glade_host::{HostCommand, HostError, RecordingHost};
    use glade_terrain::{TerrainConfig, TerrainError};
    use std::collections::BTreeMap;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn sphere_at(position: Vec3) -> ObjectSpec {
        ObjectSpec {
            primitive: Primitive::Sphere {
                radius: 0.5,
                segments: 16,
            },
            material: Material::default(),
            transform: Transform::from_position(position),
        }
    }

    fn session_with(terrain: TerrainConfig) -> Session {
        Session::new(SessionConfig {
            terrain,
            max_step: 1.0,
            ..SessionConfig::default()
        })
        .unwrap()
    }

    fn small_world() -> TerrainConfig {
        TerrainConfig {
            world_size: 4,
            octaves: 1,
            seed: Some(1234),
            ..TerrainConfig::default()
        }
    }

    /// Wraps a recording host and refuses object creation after a limit.
    struct FailingHost {
        inner: RecordingHost,
        creates_left: usize,
    }

    impl SceneHost for FailingHost {
        fn create_object(&mut self, id: ObjectId, spec: &ObjectSpec) -> Result<(), HostError> {
            if self.creates_left == 0 {
                return Err(HostError::DuplicateObject(id));
            }
            self.creates_left -= 1;
            self.inner.create_object(id, spec)
        }
        fn destroy_object(&mut self, id: ObjectId) -> Result<(), HostError> {
            self.inner.destroy_object(id)
        }
        fn set_position(&mut self, id: ObjectId, position: Vec3) -> Result<(), HostError> {
            self.inner.set_position(id, position)
        }
        fn set_rotation(&mut self, id: ObjectId, euler: Vec3) -> Result<(), HostError> {
            self.inner.set_rotation(id, euler)
        }
        fn set_scale(&mut self, id: ObjectId, scale: Vec3) -> Result<(), HostError> {
            self.inner.set_scale(id, scale)
        }
        fn object_position(&self, id: ObjectId) -> Result<Vec3, HostError> {
            self.inner.object_position(id)
        }
        fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<(), HostError> {
            self.inner.set_parent(id, parent)
        }
        fn set_uniform(&mut self, target: UniformTarget, name: &str, value: UniformValue) -> Result<(), HostError> {
            self.inner.set_uniform(target, name, value)
        }
        fn set_camera_position(&mut self, position: Vec3) {
            self.inner.set_camera_position(position)
        }
        fn set_camera_rotation(&mut self, euler: Vec3) {
            self.inner.set_camera_rotation(euler)
        }
        fn camera_look_at(&mut self, target: Vec3) {
            self.inner.camera_look_at(target)
        }
    }

    #[test]
    fn end_to_end_world_tween_and_parenting() {
        // World: size 4, one octave, fixed seed, water above every column.
        let terrain = TerrainConfig {
            water_level: 9,
            ..small_world()
        };
        let water_level = terrain.water_level;
        let mut session = session_with(terrain);
        let mut host = RecordingHost::new();
        let world = session.build_world(&mut host).unwrap();

        let expected_terrain: usize = world.heightmap.cells().map(|(_, _, l)| l as usize + 1).sum();
        let expected_water: usize = world
            .heightmap
            .cells()
            .map(|(_, _, l)| (water_level - l).max(0) as usize)
            .sum();
        assert_eq!(world.terrain_count, expected_terrain);
        assert_eq!(world.water_count, expected_water);
        assert!(water_level > world.heightmap.min_level());
        assert!(world.water_count > 0);
        assert_eq!(world.object_count(), expected_terrain + expected_water);
        assert_eq!(host.object_count(), world.object_count());

        // Tween: (0,0,0) -> (10,0,0) over 1000 ms, linear, sampled at 500 ms.
        let mover = session.spawn_object(&mut host, sphere_at(Vec3::ZERO), None).unwrap();
        session
            .animate(mover, TweenRequest::new(Vec3::new(10.0, 0.0, 0.0), 1000.0))
            .unwrap();
        session.step(ms(500), &mut host).unwrap();
        let x = session.world_transform(mover).unwrap().position.x;
        assert!((x - 5.0).abs() < 1e-4, "x = {x}");
        assert!((host.object_position(mover).unwrap().x - 5.0).abs() < 1e-4);

        // Parenting: B under A at (1,0,0) follows A without being touched.
        let a = session
            .spawn_object(&mut host, sphere_at(Vec3::new(1.0, 0.0, 0.0)), None)
            .unwrap();
        let b = session.spawn_object(&mut host, sphere_at(Vec3::ZERO), Some(a)).unwrap();
        assert_eq!(session.world_transform(b).unwrap().position, Vec3::new(1.0, 0.0, 0.0));
        session.set_local(a, Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY).unwrap();
        assert_eq!(session.world_transform(b).unwrap().position, Vec3::new(2.0, 0.0, 0.0));

        host.drain_commands();
        session.step(ms(16), &mut host).unwrap();
        assert_eq!(host.object(b).unwrap().parent, Some(a));
        assert!(
            !host
                .commands()
                .iter()
                .any(|c| matches!(c, HostCommand::SetPosition { id, .. } if *id == b))
        );
    }

    #[test]
    fn build_issues_one_create_per_directive() {
        let terrain = TerrainConfig {
            world_size: 8,
            decoration_chance: 1.0,
            water_level: -1,
            rainbow_count: 1,
            ..small_world()
        };
        let expected = TerrainBuilder::new(terrain.clone()).unwrap().build().unwrap();
        let mut session = session_with(terrain);
        let mut host = RecordingHost::new();
        session.build_world(&mut host).unwrap();

        let creates = host
            .commands()
            .iter()
            .filter(|c| matches!(c, HostCommand::Create { .. }))
            .count();
        let parents = host
            .commands()
            .iter()
            .filter(|c| matches!(c, HostCommand::SetParent { .. }))
            .count();
        assert_eq!(creates, expected.directives.len());
        assert_eq!(parents, expected.directives.iter().filter(|d| d.parent.is_some()).count());
        // Build events never come back as per-step updates.
        host.drain_commands();
        let report = session.step(ms(0), &mut host).unwrap();
        assert_eq!(report.flush.parents, 0);
    }

    #[test]
    fn second_build_requires_teardown() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        session.build_world(&mut host).unwrap();
        assert!(matches!(
            session.build_world(&mut host),
            Err(RuntimeError::WorldAlreadyBuilt)
        ));
    }

    #[test]
    fn invalid_terrain_builds_nothing() {
        let mut session = session_with(TerrainConfig {
            octaves: 0,
            ..small_world()
        });
        let mut host = RecordingHost::new();
        let err = session.build_world(&mut host).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Terrain(TerrainError::InvalidParameter { name: "octaves", .. })
        ));
        assert!(session.world().is_none());
        assert_eq!(host.object_count(), 0);
        assert_eq!(session.graph().len(), 1);
    }

    #[test]
    fn failed_build_rolls_back() {
        let mut session = session_with(small_world());
        let mut host = FailingHost {
            inner: RecordingHost::new(),
            creates_left: 10,
        };
        assert!(session.build_world(&mut host).is_err());
        assert!(session.world().is_none());
        assert_eq!(host.inner.object_count(), 0);
        // Only the camera node is left.
        assert_eq!(session.graph().len(), 1);
        assert!(session.graph().contains(session.camera().id()));
    }

    #[test]
    fn teardown_then_rebuild_gives_same_ids() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        let first: Vec<ObjectId> = session.build_world(&mut host).unwrap().ids().to_vec();
        let destroyed = session.teardown_world(&mut host).unwrap();
        assert_eq!(destroyed, first.len());
        assert_eq!(host.object_count(), 0);
        assert_eq!(session.teardown_world(&mut host).unwrap(), 0);

        let second = session.build_world(&mut host).unwrap().ids().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn input_only_applies_on_step() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        let start = session.camera().state().position;
        session.handle_input(&InputEvent::key_down("KeyQ"));
        assert_eq!(session.camera().state().position, start);

        let report = session.step(ms(100), &mut host).unwrap();
        assert!(report.camera_moved);
        let moved = session.camera().state().position;
        assert!((moved.y - start.y - session.config().camera.speed * 0.1).abs() < 1e-4);
        assert_eq!(host.camera_position(), moved);
    }

    #[test]
    fn step_clamps_long_frames() {
        let mut session = Session::new(SessionConfig {
            max_step: 0.05,
            ..SessionConfig::default()
        })
        .unwrap();
        let mut host = RecordingHost::new();
        let report = session.step(Duration::from_secs(10), &mut host).unwrap();
        assert_eq!(report.dt, 0.05);
        assert!(session.elapsed() <= Duration::from_millis(51));
    }

    #[test]
    fn time_uniform_advances() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        session.step(ms(250), &mut host).unwrap();
        session.step(ms(250), &mut host).unwrap();
        match host.uniform(UniformTarget::Global, TIME_UNIFORM) {
            Some(UniformValue::Float(t)) => assert!((t - 0.5).abs() < 1e-4),
            other => panic!("unexpected uniform {other:?}"),
        }
    }

    #[test]
    fn each_changed_object_gets_one_call_per_step() {
        let terrain = TerrainConfig {
            world_size: 8,
            decoration_chance: 1.0,
            water_level: -1,
            ..small_world()
        };
        let mut session = session_with(terrain);
        let mut host = RecordingHost::new();
        session.build_world(&mut host).unwrap();
        let obj = session.spawn_object(&mut host, sphere_at(Vec3::ZERO), None).unwrap();
        session.animate(obj, TweenRequest::new(Vec3::ONE, 100.0)).unwrap();
        session.set_local(obj, Vec3::Y, Quat::IDENTITY).unwrap();
        host.drain_commands();

        let report = session.step(ms(16), &mut host).unwrap();
        assert!(report.crystals_spun > 0);
        let mut positions: BTreeMap<ObjectId, usize> = BTreeMap::new();
        let mut rotations: BTreeMap<ObjectId, usize> = BTreeMap::new();
        for command in host.commands() {
            match command {
                HostCommand::SetPosition { id, .. } => *positions.entry(*id).or_default() += 1,
                HostCommand::SetRotation { id, .. } => *rotations.entry(*id).or_default() += 1,
                _ => {}
            }
        }
        assert!(positions.values().all(|&n| n == 1));
        assert!(rotations.values().all(|&n| n == 1));
        assert_eq!(rotations.len(), report.crystals_spun);
        assert_eq!(positions.get(&obj), Some(&1));
    }

    #[test]
    fn crystal_spin_uses_registry() {
        let terrain = TerrainConfig {
            world_size: 8,
            decoration_chance: 1.0,
            water_level: -1,
            ..small_world()
        };
        let mut session = session_with(terrain);
        let mut host = RecordingHost::new();
        let crystals: Vec<ObjectId> = session
            .build_world(&mut host)
            .unwrap()
            .registry
            .ids(DecorationKind::Crystal)
            .collect();
        assert!(!crystals.is_empty());
        let before = session.graph().local(crystals[0]).unwrap().rotation;
        session.step(ms(100), &mut host).unwrap();
        let after = session.graph().local(crystals[0]).unwrap().rotation;
        let expected = (Quat::from_rotation_y(session.config().crystal_spin * 0.1) * before).normalize();
        assert!(after.angle_between(expected) < 1e-4);
    }

    #[test]
    fn removing_parent_keeps_child_in_place() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        let a = session
            .spawn_object(&mut host, sphere_at(Vec3::new(1.0, 0.0, 0.0)), None)
            .unwrap();
        let b = session
            .spawn_object(&mut host, sphere_at(Vec3::new(0.0, 1.0, 0.0)), Some(a))
            .unwrap();
        session.step(ms(16), &mut host).unwrap();

        session.remove_object(&mut host, a).unwrap();
        assert_eq!(session.world_transform(b).unwrap().position, Vec3::new(1.0, 1.0, 0.0));
        session.step(ms(16), &mut host).unwrap();
        let host_b = host.object(b).unwrap();
        assert_eq!(host_b.parent, None);
        assert_eq!(host_b.position, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(session.spawned().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn cyclic_parenting_is_rejected() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        let a = session.spawn_object(&mut host, sphere_at(Vec3::ZERO), None).unwrap();
        let b = session.spawn_object(&mut host, sphere_at(Vec3::ZERO), Some(a)).unwrap();
        assert!(matches!(
            session.set_parent(a, Some(b)),
            Err(RuntimeError::Graph(glade_graph::GraphError::CycleDetected { .. }))
        ));
        assert_eq!(session.graph().parent(a).unwrap(), None);
        assert_eq!(session.graph().parent(b).unwrap(), Some(a));
    }

    #[test]
    fn camera_node_is_not_a_scene_object() {
        let mut session = session_with(small_world());
        let camera = session.camera().id();
        assert!(matches!(
            session.animate(camera, TweenRequest::new(Vec3::ONE, 100.0)),
            Err(RuntimeError::CameraNode)
        ));
        assert!(matches!(
            session.set_local(camera, Vec3::ONE, Quat::IDENTITY),
            Err(RuntimeError::CameraNode)
        ));
        assert!(!session.cancel_animation(camera));
    }

    #[test]
    fn unknown_parent_rejected_before_spawning() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        let ghost = ObjectId::new();
        assert!(matches!(
            session.spawn_object(&mut host, sphere_at(Vec3::ZERO), Some(ghost)),
            Err(RuntimeError::UnknownObject(id)) if id == ghost
        ));
        assert_eq!(host.object_count(), 0);
    }

    #[test]
    fn camera_flight_reaches_host_and_returns_to_free() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        let target = Vec3::new(5.0, 8.0, 5.0);
        session
            .follow_camera_path(WaypointList::new(vec![
                Waypoint::new(Vec3::new(0.0, 8.0, 5.0), 200.0),
                Waypoint::new(target, 200.0).looking_at(Vec3::ZERO),
            ]))
            .unwrap();
        assert_eq!(session.camera().mode(), CameraMode::Scripted);

        let mut transitions = Vec::new();
        for _ in 0..10 {
            let report = session.step(ms(100), &mut host).unwrap();
            transitions.extend(report.camera_transition);
        }
        assert_eq!(
            transitions,
            vec![CameraTransition::NextLeg, CameraTransition::Finished]
        );
        assert_eq!(session.camera().mode(), CameraMode::Free);
        assert_eq!(host.camera_position(), target);
    }

    #[test]
    fn cancelled_flight_stays_mid_air() {
        let mut session = session_with(small_world());
        let mut host = RecordingHost::new();
        session
            .fly_camera_to(Waypoint::new(Vec3::new(0.0, 50.0, 0.0), 1000.0))
            .unwrap();
        session.step(ms(100), &mut host).unwrap();
        let mid = session.camera().state().position;
        assert!(session.cancel_camera_flight());
        session.step(ms(100), &mut host).unwrap();
        assert_eq!(session.camera().state().position, mid);
        assert_eq!(session.camera().mode(), CameraMode::Free);
    }
}
