use glade_camera::CameraMode;
use glade_common::ObjectId;
use glade_runtime::Session;
use glade_terrain::DecorationKind;

/// Read-only queries against a session for debugging and the CLI.
pub struct SessionInspector;

impl SessionInspector {
    pub fn summary(session: &Session) -> SessionSummary {
        let camera = session.camera();
        let state = camera.state();
        SessionSummary {
            tick: session.tick(),
            elapsed_secs: session.elapsed().as_secs_f32(),
            node_count: session.graph().len(),
            active_tweens: session.tweens().len(),
            pending_events: session.graph().events().len(),
            camera_mode: camera.mode(),
            camera_position: state.position.to_array(),
            camera_yaw: state.yaw(),
            camera_pitch: state.pitch(),
            graph_hash: session.graph().state_hash(),
            world: Self::world_stats(session),
        }
    }

    pub fn world_stats(session: &Session) -> Option<WorldStats> {
        session.world().map(|world| WorldStats {
            size: world.heightmap.size(),
            objects: world.object_count(),
            terrain: world.terrain_count,
            water: world.water_count,
            decoration_parts: world.decoration_count,
            trees: world.registry.count(DecorationKind::Tree),
            crystals: world.registry.count(DecorationKind::Crystal),
            rainbows: world.registry.count(DecorationKind::Rainbow),
            min_level: world.heightmap.min_level(),
            max_level: world.heightmap.max_level(),
        })
    }

    pub fn inspect_object(session: &Session, id: ObjectId) -> Option<ObjectInfo> {
        let node = session.graph().get(id)?;
        let world = session.graph().world_transform(id).ok()?;
        Some(ObjectInfo {
            id,
            parent: node.parent(),
            children: node.children().len(),
            local_position: node.local.position.to_array(),
            world_position: world.position.to_array(),
            euler: node.local.euler().to_array(),
            scale: node.local.scale.to_array(),
            tweening: session.tweens().is_active(id),
            progress: session.tweens().progress(id),
        })
    }

    /// Root nodes of the graph, in id order.
    pub fn list_roots(session: &Session) -> Vec<ObjectId> {
        session
            .graph()
            .nodes()
            .iter()
            .filter(|(_, node)| node.parent().is_none())
            .map(|(id, _)| *id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldStats {
    pub size: usize,
    pub objects: usize,
    pub terrain: usize,
    pub water: usize,
    pub decoration_parts: usize,
    pub trees: usize,
    pub crystals: usize,
    pub rainbows: usize,
    pub min_level: i32,
    pub max_level: i32,
}

impl std::fmt::Display for WorldStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: {size}x{size} objects={} terrain={} water={} decorations={} (trees={} crystals={} rainbows={}) levels={}..={}",
            self.objects,
            self.terrain,
            self.water,
            self.decoration_parts,
            self.trees,
            self.crystals,
            self.rainbows,
            self.min_level,
            self.max_level,
            size = self.size,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub tick: u64,
    pub elapsed_secs: f32,
    pub node_count: usize,
    pub active_tweens: usize,
    pub pending_events: usize,
    pub camera_mode: CameraMode,
    pub camera_position: [f32; 3],
    pub camera_yaw: f32,
    pub camera_pitch: f32,
    pub graph_hash: u64,
    pub world: Option<WorldStats>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.camera_position;
        writeln!(
            f,
            "Session: tick={} elapsed={:.2}s nodes={} tweens={} pending_events={} hash={:016x}",
            self.tick, self.elapsed_secs, self.node_count, self.active_tweens, self.pending_events, self.graph_hash
        )?;
        write!(
            f,
            "Camera: {:?} pos=({:.2}, {:.2}, {:.2}) yaw={:.3} pitch={:.3}",
            self.camera_mode, p[0], p[1], p[2], self.camera_yaw, self.camera_pitch
        )?;
        if let Some(world) = &self.world {
            write!(f, "\n{world}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub parent: Option<ObjectId>,
    pub children: usize,
    pub local_position: [f32; 3],
    pub world_position: [f32; 3],
    pub euler: [f32; 3],
    pub scale: [f32; 3],
    pub tweening: bool,
    pub progress: Option<f32>,
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let w = self.world_position;
        let l = self.local_position;
        write!(
            f,
            "Object [{}] world=({:.2}, {:.2}, {:.2}) local=({:.2}, {:.2}, {:.2}) children={}",
            self.id.short(),
            w[0],
            w[1],
            w[2],
            l[0],
            l[1],
            l[2],
            self.children
        )?;
        if let Some(parent) = self.parent {
            write!(f, " parent={}", parent.short())?;
        }
        if let Some(progress) = self.progress {
            write!(f, " tween={:.0}%", progress * 100.0)?;
        }
        Ok(())
    }
}
