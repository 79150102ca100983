use glade_common::{Material, ObjectId, Primitive, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Everything the host needs to create one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub primitive: Primitive,
    pub material: Material,
    pub transform: Transform,
}

/// Where a uniform is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UniformTarget {
    Global,
    Object(ObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniformValue {
    Float(f32),
    Vec3(Vec3),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("host has no object {0}")]
    UnknownObject(ObjectId),
    #[error("host already has object {0}")]
    DuplicateObject(ObjectId),
}

/// The external scene and camera runtime.
///
/// Object positions and rotations are local to the object's host parent,
/// mirroring the transform graph.
pub trait SceneHost {
    fn create_object(&mut self, id: ObjectId, spec: &ObjectSpec) -> Result<(), HostError>;
    fn destroy_object(&mut self, id: ObjectId) -> Result<(), HostError>;

    fn set_position(&mut self, id: ObjectId, position: Vec3) -> Result<(), HostError>;
    /// XYZ Euler angles in radians.
    fn set_rotation(&mut self, id: ObjectId, euler: Vec3) -> Result<(), HostError>;
    fn set_scale(&mut self, id: ObjectId, scale: Vec3) -> Result<(), HostError>;
    fn object_position(&self, id: ObjectId) -> Result<Vec3, HostError>;

    /// Attach `id` under `parent` in the host scene graph, or detach with `None`.
    fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<(), HostError>;

    fn set_uniform(&mut self, target: UniformTarget, name: &str, value: UniformValue) -> Result<(), HostError>;

    fn set_camera_position(&mut self, position: Vec3);
    /// XYZ Euler angles in radians.
    fn set_camera_rotation(&mut self, euler: Vec3);
    fn camera_look_at(&mut self, target: Vec3);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_values_serialize_untagged() {
        assert_eq!(serde_json::to_string(&UniformValue::Float(1.5)).unwrap(), "1.5");
        assert_eq!(
            serde_json::to_string(&UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0))).unwrap(),
            "[1.0,2.0,3.0]"
        );
    }

    #[test]
    fn global_target_orders_first() {
        assert!(UniformTarget::Global < UniformTarget::Object(ObjectId::new()));
    }
}
