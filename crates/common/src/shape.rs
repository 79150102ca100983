use serde::{Deserialize, Serialize};

/// Primitive kinds the host knows how to create, with per-instance dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32, segments: u32 },
    Cone { radius: f32, height: f32, segments: u32 },
    Cylinder { radius: f32, height: f32, segments: u32 },
    Plane { width: f32, depth: f32 },
    /// Half-disc arc in the local XY plane, rendered as a triangle fan.
    Arc { radius: f32, segments: u32 },
    /// Invisible anchor used to parent other objects.
    Group,
}

impl Primitive {
    pub fn cube(size: f32) -> Self {
        Self::Box {
            width: size,
            height: size,
            depth: size,
        }
    }

    /// Host-facing kind name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Cone { .. } => "cone",
            Self::Cylinder { .. } => "cylinder",
            Self::Plane { .. } => "plane",
            Self::Arc { .. } => "custom",
            Self::Group => "group",
        }
    }
}

/// Material/style descriptor handed to the host untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub color: [f32; 3],
    #[serde(default = "opaque")]
    pub opacity: f32,
    #[serde(default)]
    pub emission: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Material {
    pub fn new(name: impl Into<String>, color: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            color,
            opacity: 1.0,
            emission: 0.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_emission(mut self, emission: f32) -> Self {
        self.emission = emission;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", [0.8, 0.8, 0.8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_equal_sides() {
        let Primitive::Box {
            width,
            height,
            depth,
        } = Primitive::cube(2.0)
        else {
            panic!("cube should be a box");
        };
        assert_eq!((width, height, depth), (2.0, 2.0, 2.0));
    }

    #[test]
    fn arc_is_a_custom_host_object() {
        let arc = Primitive::Arc {
            radius: 3.0,
            segments: 20,
        };
        assert_eq!(arc.kind_name(), "custom");
        assert_eq!(Primitive::Group.kind_name(), "group");
    }

    #[test]
    fn material_builder() {
        let m = Material::new("water", [0.1, 0.3, 0.8]).with_opacity(0.6);
        assert_eq!(m.opacity, 0.6);
        assert_eq!(m.emission, 0.0);
    }
}
