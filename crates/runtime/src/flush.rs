use std::collections::BTreeMap;

use glade_common::ObjectId;
use glade_graph::{GraphEvent, TransformGraph};
use glade_host::{HostError, SceneHost};

/// Host calls issued by one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub positions: usize,
    pub rotations: usize,
    pub scales: usize,
    pub parents: usize,
    pub camera: bool,
}

impl FlushStats {
    pub fn total(&self) -> usize {
        self.positions + self.rotations + self.scales + self.parents
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Dirty {
    position: bool,
    rotation: bool,
    scale: bool,
}

/// Collapse a step's graph events into one host call per changed property.
///
/// Inserted nodes are skipped since their creation call carried the
/// transform, except the camera whose first pose must reach the host.
/// Removed nodes are skipped entirely. Parent changes go first so that
/// the positions sent afterwards are read relative to the right parent.
pub(crate) fn flush_events<H: SceneHost + ?Sized>(
    events: Vec<GraphEvent>,
    graph: &TransformGraph,
    camera: ObjectId,
    host: &mut H,
) -> Result<FlushStats, HostError> {
    let mut dirty: BTreeMap<ObjectId, Dirty> = BTreeMap::new();
    let mut parents: BTreeMap<ObjectId, Option<ObjectId>> = BTreeMap::new();

    for event in events {
        match event {
            GraphEvent::Inserted { id, .. } if id == camera => {
                let d = dirty.entry(id).or_default();
                d.position = true;
                d.rotation = true;
            }
            GraphEvent::Inserted { .. } => {}
            GraphEvent::LocalChanged { id, old, new } => {
                let d = dirty.entry(id).or_default();
                d.position |= old.position != new.position;
                d.rotation |= old.rotation != new.rotation;
                d.scale |= old.scale != new.scale;
            }
            GraphEvent::Reparented { id, new, .. } => {
                parents.insert(id, new);
            }
            GraphEvent::Removed { id, .. } => {
                dirty.remove(&id);
                parents.remove(&id);
            }
        }
    }

    let mut stats = FlushStats::default();
    for (id, parent) in parents {
        if id == camera || !graph.contains(id) {
            continue;
        }
        host.set_parent(id, parent)?;
        stats.parents += 1;
    }

    for (id, d) in dirty {
        let Ok(local) = graph.local(id) else {
            continue;
        };
        if id == camera {
            if d.position {
                host.set_camera_position(local.position);
            }
            if d.rotation {
                host.set_camera_rotation(local.euler());
            }
            stats.camera = d.position || d.rotation;
            continue;
        }
        if d.position {
            host.set_position(id, local.position)?;
            stats.positions += 1;
        }
        if d.rotation {
            host.set_rotation(id, local.euler())?;
            stats.rotations += 1;
        }
        if d.scale {
            host.set_scale(id, local.scale)?;
            stats.scales += 1;
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glade_common::{Material, Primitive, Transform};
    use glade_host::{HostCommand, ObjectSpec, RecordingHost};
    use glam::{Quat, Vec3};

    fn setup(n: usize) -> (TransformGraph, RecordingHost, Vec<ObjectId>) {
        let mut graph = TransformGraph::new();
        let mut host = RecordingHost::new();
        let ids: Vec<ObjectId> = (0..n).map(|_| ObjectId::new()).collect();
        for &id in &ids {
            graph.insert(id, Transform::default()).unwrap();
            host.create_object(
                id,
                &ObjectSpec {
                    primitive: Primitive::cube(1.0),
                    material: Material::default(),
                    transform: Transform::default(),
                },
            )
            .unwrap();
        }
        graph.drain_events();
        host.drain_commands();
        (graph, host, ids)
    }

    #[test]
    fn repeated_moves_collapse_to_one_call() {
        let (mut graph, mut host, ids) = setup(1);
        let id = ids[0];
        for i in 1..=5 {
            graph.set_local(id, Vec3::X * i as f32, Quat::IDENTITY).unwrap();
        }
        let stats = flush_events(graph.drain_events(), &graph, ObjectId::new(), &mut host).unwrap();
        assert_eq!(stats.positions, 1);
        assert_eq!(stats.rotations, 0);
        assert_eq!(
            host.commands(),
            &[HostCommand::SetPosition {
                id,
                position: Vec3::new(5.0, 0.0, 0.0)
            }]
        );
    }

    #[test]
    fn reparent_precedes_position() {
        let (mut graph, mut host, ids) = setup(2);
        graph.set_local(ids[1], Vec3::Y, Quat::IDENTITY).unwrap();
        graph.set_parent(ids[1], Some(ids[0])).unwrap();
        let stats = flush_events(graph.drain_events(), &graph, ObjectId::new(), &mut host).unwrap();
        assert_eq!(stats.parents, 1);
        assert!(matches!(host.commands()[0], HostCommand::SetParent { .. }));
        assert!(matches!(host.commands()[1], HostCommand::SetPosition { .. }));
        assert_eq!(host.object(ids[1]).unwrap().parent, Some(ids[0]));
    }

    #[test]
    fn removed_nodes_are_skipped() {
        let (mut graph, mut host, ids) = setup(1);
        graph.set_local(ids[0], Vec3::ONE, Quat::IDENTITY).unwrap();
        graph.remove(ids[0]).unwrap();
        let stats = flush_events(graph.drain_events(), &graph, ObjectId::new(), &mut host).unwrap();
        assert_eq!(stats.total(), 0);
        assert!(host.commands().is_empty());
    }

    #[test]
    fn camera_changes_go_to_camera_calls() {
        let mut graph = TransformGraph::new();
        let mut host = RecordingHost::new();
        let camera = ObjectId::new();
        graph
            .insert(camera, Transform::from_position(Vec3::new(0.0, 3.0, 0.0)))
            .unwrap();
        let stats = flush_events(graph.drain_events(), &graph, camera, &mut host).unwrap();
        assert!(stats.camera);
        assert_eq!(stats.total(), 0);
        assert_eq!(host.camera_position(), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn scale_changes_are_mirrored() {
        let (mut graph, mut host, ids) = setup(1);
        graph.set_scale(ids[0], Vec3::splat(2.0)).unwrap();
        let stats = flush_events(graph.drain_events(), &graph, ObjectId::new(), &mut host).unwrap();
        assert_eq!(stats.scales, 1);
        assert_eq!(host.object(ids[0]).unwrap().scale, Vec3::splat(2.0));
    }
}
