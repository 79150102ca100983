use glade_common::{Material, ObjectId, Primitive, Transform};
use glam::{IVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::decoration::DecorationKind;

/// Material band of a terrain block within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainLayer {
    /// The topmost block of a column.
    Surface,
    /// The few blocks directly beneath the surface.
    Subsurface,
    /// Everything deeper.
    Core,
}

/// What a directive places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectiveKind {
    Terrain { layer: TerrainLayer },
    Water,
    /// A decoration root (`root: true`) or one of its parts.
    Decoration { kind: DecorationKind, root: bool },
}

/// One object to instantiate in the host scene.
///
/// Produced in bulk by the terrain builder and never mutated afterwards.
/// When `parent` is set, `position` and `rotation` are relative to the parent;
/// otherwise they are world-space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDirective {
    pub id: ObjectId,
    pub kind: DirectiveKind,
    /// Voxel coordinate for grid-aligned blocks.
    pub cell: Option<IVec3>,
    pub position: Vec3,
    pub rotation: Quat,
    pub primitive: Primitive,
    pub material: Material,
    pub parent: Option<ObjectId>,
}

impl PlacementDirective {
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }

    pub fn is_terrain(&self) -> bool {
        matches!(self.kind, DirectiveKind::Terrain { .. })
    }

    pub fn is_water(&self) -> bool {
        matches!(self.kind, DirectiveKind::Water)
    }

    pub fn is_decoration(&self) -> bool {
        matches!(self.kind, DirectiveKind::Decoration { .. })
    }
}

/// Accumulates directives and hands out seed-derived ids in emission order.
pub(crate) struct DirectiveSink {
    seed: u64,
    directives: Vec<PlacementDirective>,
}

/// Parameters for one emitted directive, minus the id the sink assigns.
pub(crate) struct Placement {
    pub kind: DirectiveKind,
    pub cell: Option<IVec3>,
    pub position: Vec3,
    pub rotation: Quat,
    pub primitive: Primitive,
    pub material: Material,
    pub parent: Option<ObjectId>,
}

impl Placement {
    pub fn at(kind: DirectiveKind, position: Vec3, primitive: Primitive, material: &Material) -> Self {
        Self {
            kind,
            cell: None,
            position,
            rotation: Quat::IDENTITY,
            primitive,
            material: material.clone(),
            parent: None,
        }
    }

    pub fn in_cell(mut self, cell: IVec3) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn child_of(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl DirectiveSink {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            directives: Vec::new(),
        }
    }

    pub fn push(&mut self, placement: Placement) -> ObjectId {
        let id = ObjectId::derived(self.seed, self.directives.len() as u64);
        self.directives.push(PlacementDirective {
            id,
            kind: placement.kind,
            cell: placement.cell,
            position: placement.position,
            rotation: placement.rotation,
            primitive: placement.primitive,
            material: placement.material,
            parent: placement.parent,
        });
        id
    }

    pub fn into_directives(self) -> Vec<PlacementDirective> {
        self.directives
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_assigns_reproducible_ids() {
        let material = Material::default();
        let mut a = DirectiveSink::new(3);
        let mut b = DirectiveSink::new(3);
        for _ in 0..4 {
            a.push(Placement::at(DirectiveKind::Water, Vec3::ZERO, Primitive::cube(1.0), &material));
            b.push(Placement::at(DirectiveKind::Water, Vec3::ZERO, Primitive::cube(1.0), &material));
        }
        let ids_a: Vec<_> = a.into_directives().iter().map(|d| d.id).collect();
        let ids_b: Vec<_> = b.into_directives().iter().map(|d| d.id).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn kind_predicates() {
        let material = Material::default();
        let mut sink = DirectiveSink::new(0);
        let root = sink.push(Placement::at(
            DirectiveKind::Decoration {
                kind: DecorationKind::Tree,
                root: true,
            },
            Vec3::ZERO,
            Primitive::Group,
            &material,
        ));
        sink.push(
            Placement::at(
                DirectiveKind::Terrain {
                    layer: TerrainLayer::Surface,
                },
                Vec3::ONE,
                Primitive::cube(1.0),
                &material,
            )
            .in_cell(IVec3::new(1, 1, 1))
            .child_of(root),
        );
        let directives = sink.into_directives();
        assert!(directives[0].is_decoration());
        assert!(directives[1].is_terrain());
        assert_eq!(directives[1].parent, Some(root));
        assert_eq!(directives[1].transform().position, Vec3::ONE);
    }

    #[test]
    fn directive_serializes_to_json() {
        let mut sink = DirectiveSink::new(1);
        sink.push(Placement::at(
            DirectiveKind::Water,
            Vec3::new(1.0, 2.0, 3.0),
            Primitive::cube(1.0),
            &Material::default(),
        ));
        let json = serde_json::to_string(&sink.into_directives()).unwrap();
        assert!(json.contains("\"water\""));
    }
}
