use std::f32::consts::{FRAC_PI_2, TAU};

use glade_common::{ObjectId, Primitive};
use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::builder::Palette;
use crate::directive::{DirectiveKind, DirectiveSink, Placement};

/// Decoration categories tracked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    Tree,
    Crystal,
    Rainbow,
}

impl DecorationKind {
    fn root(self) -> DirectiveKind {
        DirectiveKind::Decoration {
            kind: self,
            root: true,
        }
    }

    fn part(self) -> DirectiveKind {
        DirectiveKind::Decoration {
            kind: self,
            root: false,
        }
    }
}

/// Emit a tree rooted at `base`: a twisting trunk and two rings of leaf clusters.
pub(crate) fn tree(
    sink: &mut DirectiveSink,
    palette: &Palette,
    rng: &mut impl Rng,
    base: Vec3,
    scale: f32,
) -> ObjectId {
    let kind = DecorationKind::Tree;
    let root = sink.push(Placement::at(kind.root(), base, Primitive::Group, &palette.trunk));

    let segments = rng.random_range(3..=5);
    let segment_height = 0.8 * scale;
    let twist_phase = rng.random_range(0.0..TAU);
    let twist = 0.15 * scale;
    for i in 0..segments {
        let angle = twist_phase + i as f32 * 0.8;
        let offset = Vec3::new(
            angle.sin() * twist,
            (i as f32 + 0.5) * segment_height,
            angle.cos() * twist,
        );
        sink.push(
            Placement::at(
                kind.part(),
                offset,
                Primitive::Cylinder {
                    radius: 0.18 * scale,
                    height: segment_height,
                    segments: 8,
                },
                &palette.trunk,
            )
            .child_of(root),
        );
    }

    let crown = segments as f32 * segment_height;
    // (height above crown, ring radius, cluster count, cluster radius)
    let rings = [(-0.2, 0.6, 6, 0.45), (0.5, 0.35, 4, 0.35)];
    for (lift, ring_radius, count, cluster) in rings {
        let ring_phase = rng.random_range(0.0..TAU);
        for j in 0..count {
            let angle = ring_phase + TAU * j as f32 / count as f32;
            let offset = Vec3::new(
                angle.cos() * ring_radius * scale,
                crown + lift * scale,
                angle.sin() * ring_radius * scale,
            );
            sink.push(
                Placement::at(
                    kind.part(),
                    offset,
                    Primitive::Sphere {
                        radius: cluster * scale,
                        segments: 12,
                    },
                    &palette.leaves,
                )
                .child_of(root),
            );
        }
    }
    root
}

/// Emit a cluster of cones on a small ring around `base`.
pub(crate) fn crystal(
    sink: &mut DirectiveSink,
    palette: &Palette,
    rng: &mut impl Rng,
    base: Vec3,
    scale: f32,
) -> ObjectId {
    let kind = DecorationKind::Crystal;
    let root = sink.push(Placement::at(kind.root(), base, Primitive::Group, &palette.crystal));

    let count = rng.random_range(5..=7);
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32 + rng.random_range(-0.3..0.3);
        let ring = rng.random_range(0.2..0.6) * scale;
        let height = rng.random_range(0.6..1.8) * scale;
        let outward = Vec3::new(angle.cos(), 0.0, angle.sin());
        // Lean each cone away from the cluster centre.
        let tilt = Quat::from_axis_angle(Vec3::Y.cross(outward).normalize(), 0.25);
        sink.push(
            Placement::at(
                kind.part(),
                outward * ring + Vec3::Y * (height * 0.5),
                Primitive::Cone {
                    radius: rng.random_range(0.1..0.22) * scale,
                    height,
                    segments: 6,
                },
                &palette.crystal,
            )
            .rotated(tilt)
            .child_of(root),
        );
    }
    root
}

/// Emit a rainbow arc at `position`, turned to face along X.
pub(crate) fn rainbow(sink: &mut DirectiveSink, palette: &Palette, position: Vec3, radius: f32) -> ObjectId {
    let kind = DecorationKind::Rainbow;
    let root = sink.push(Placement::at(kind.root(), position, Primitive::Group, &palette.rainbow));
    sink.push(
        Placement::at(
            kind.part(),
            Vec3::ZERO,
            Primitive::Arc {
                radius,
                segments: 20,
            },
            &palette.rainbow,
        )
        .rotated(Quat::from_rotation_y(FRAC_PI_2))
        .child_of(root),
    );
    root
}
