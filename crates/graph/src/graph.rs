use glade_common::{ObjectId, Transform};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A record produced by every mutation of the graph.
///
/// The log is drained once per simulation step to batch host updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphEvent {
    /// Node was added with the given local transform.
    Inserted { id: ObjectId, local: Transform },
    /// Node was removed. Carries its former children, which are now roots.
    Removed {
        id: ObjectId,
        local: Transform,
        parent: Option<ObjectId>,
        orphans: Vec<ObjectId>,
    },
    /// Node local transform changed.
    LocalChanged {
        id: ObjectId,
        old: Transform,
        new: Transform,
    },
    /// Node moved under a different parent (or became a root).
    Reparented {
        id: ObjectId,
        old: Option<ObjectId>,
        new: Option<ObjectId>,
    },
}

impl GraphEvent {
    /// The node this event is about.
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Inserted { id, .. }
            | Self::Removed { id, .. }
            | Self::LocalChanged { id, .. }
            | Self::Reparented { id, .. } => *id,
        }
    }
}

/// Errors from graph operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0} not found")]
    NodeNotFound(ObjectId),
    #[error("node {0} already exists")]
    AlreadyExists(ObjectId),
    #[error("parenting {child} under {parent} would create a cycle")]
    CycleDetected { child: ObjectId, parent: ObjectId },
}

/// Per-object data stored in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformNode {
    pub local: Transform,
    parent: Option<ObjectId>,
    children: BTreeSet<ObjectId>,
}

impl TransformNode {
    fn new(local: Transform) -> Self {
        Self {
            local,
            parent: None,
            children: BTreeSet::new(),
        }
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &BTreeSet<ObjectId> {
        &self.children
    }
}

/// Owner of every object's local transform and parent link.
///
/// Uses BTreeMap for deterministic iteration order across all platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformGraph {
    nodes: BTreeMap<ObjectId, TransformNode>,
    /// Append-only log of mutations since the last drain.
    #[serde(skip)]
    event_log: Vec<GraphEvent>,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&TransformNode> {
        self.nodes.get(&id)
    }

    /// Read-only access to all nodes in id order.
    pub fn nodes(&self) -> &BTreeMap<ObjectId, TransformNode> {
        &self.nodes
    }

    pub fn local(&self, id: ObjectId) -> Result<Transform, GraphError> {
        self.node(id).map(|n| n.local)
    }

    pub fn parent(&self, id: ObjectId) -> Result<Option<ObjectId>, GraphError> {
        self.node(id).map(|n| n.parent)
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GraphEvent] {
        &self.event_log
    }

    /// Add a root node with the given local transform.
    pub fn insert(&mut self, id: ObjectId, local: Transform) -> Result<(), GraphError> {
        if self.nodes.contains_key(&id) {
            return Err(GraphError::AlreadyExists(id));
        }
        self.nodes.insert(id, TransformNode::new(local));
        self.event_log.push(GraphEvent::Inserted { id, local });
        Ok(())
    }

    /// Set local position and rotation, keeping the node's scale.
    pub fn set_local(&mut self, id: ObjectId, position: Vec3, rotation: Quat) -> Result<(), GraphError> {
        let scale = self.node(id)?.local.scale;
        self.set_transform(
            id,
            Transform {
                position,
                rotation,
                scale,
            },
        )
    }

    pub fn set_scale(&mut self, id: ObjectId, scale: Vec3) -> Result<(), GraphError> {
        let local = self.node(id)?.local;
        self.set_transform(id, Transform { scale, ..local })
    }

    /// Replace the local transform. Logs only when the value actually changes.
    pub fn set_transform(&mut self, id: ObjectId, new: Transform) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        let old = node.local;
        if old != new {
            node.local = new;
            self.event_log.push(GraphEvent::LocalChanged { id, old, new });
        }
        Ok(())
    }

    /// Attach `id` under `parent`, or make it a root with `None`.
    ///
    /// The local transform is kept and is from now on relative to the new
    /// parent. Fails with `CycleDetected` if `parent` is `id` or one of its
    /// descendants; the graph is unchanged on failure.
    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<(), GraphError> {
        let old = self.node(id)?.parent;
        if let Some(p) = parent {
            self.node(p)?;
            if self.ancestors_inclusive(p).any(|a| a == id) {
                tracing::debug!(child = %id.short(), parent = %p.short(), "rejected cyclic parent");
                return Err(GraphError::CycleDetected { child: id, parent: p });
            }
        }
        if old == parent {
            return Ok(());
        }

        if let Some(o) = old {
            if let Some(node) = self.nodes.get_mut(&o) {
                node.children.remove(&id);
            }
        }
        if let Some(p) = parent {
            if let Some(node) = self.nodes.get_mut(&p) {
                node.children.insert(id);
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
        self.event_log.push(GraphEvent::Reparented {
            id,
            old,
            new: parent,
        });
        Ok(())
    }

    /// Compose local transforms from the root down to `id`.
    ///
    /// A root's world transform is its local transform.
    pub fn world_transform(&self, id: ObjectId) -> Result<Transform, GraphError> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            chain.push(node.local);
            cursor = node.parent;
        }
        let mut locals = chain.into_iter().rev();
        let root = locals.next().ok_or(GraphError::NodeNotFound(id))?;
        Ok(locals.fold(root, |world, local| world.compose(&local)))
    }

    pub fn world_position(&self, id: ObjectId) -> Result<Vec3, GraphError> {
        self.world_transform(id).map(|t| t.position)
    }

    /// Remove `id`. Its children become roots whose new local transform is
    /// their previous world transform, so nothing visibly jumps.
    pub fn remove(&mut self, id: ObjectId) -> Result<TransformNode, GraphError> {
        let node = self.node(id)?;
        let orphans: Vec<ObjectId> = node.children.iter().copied().collect();
        let parent = node.parent;

        let baked: Vec<(ObjectId, Transform)> = orphans
            .iter()
            .map(|&child| self.world_transform(child).map(|w| (child, w)))
            .collect::<Result<_, _>>()?;
        for (child, world) in baked {
            self.set_transform(child, world)?;
            if let Some(node) = self.nodes.get_mut(&child) {
                node.parent = None;
            }
            self.event_log.push(GraphEvent::Reparented {
                id: child,
                old: Some(id),
                new: None,
            });
        }

        if let Some(p) = parent {
            if let Some(node) = self.nodes.get_mut(&p) {
                node.children.remove(&id);
            }
        }
        let mut removed = self.nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?;
        removed.children.clear();
        self.event_log.push(GraphEvent::Removed {
            id,
            local: removed.local,
            parent,
            orphans,
        });
        Ok(removed)
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors_inclusive(&self, id: ObjectId) -> impl Iterator<Item = ObjectId> + '_ {
        std::iter::successors(
            self.nodes.contains_key(&id).then_some(id),
            move |current| self.nodes.get(current).and_then(|n| n.parent),
        )
    }

    /// Compute a deterministic hash of the graph for comparison.
    /// Uses canonical (BTreeMap) iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (id, node) in &self.nodes {
            mix(&mut h, id.0.as_bytes());
            let t = node.local;
            for v in t.position.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.rotation.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.scale.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            if let Some(p) = node.parent {
                mix(&mut h, p.0.as_bytes());
            }
        }
        h
    }

    fn node(&self, id: ObjectId) -> Result<&TransformNode, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }
}
