use std::collections::BTreeMap;

use glade_common::{ObjectId, Primitive};
use glam::Vec3;
use serde::Serialize;

use crate::host::{HostError, ObjectSpec, SceneHost, UniformTarget, UniformValue};

/// One call made against a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCommand {
    Create { id: ObjectId, kind: &'static str },
    Destroy { id: ObjectId },
    SetPosition { id: ObjectId, position: Vec3 },
    SetRotation { id: ObjectId, euler: Vec3 },
    SetScale { id: ObjectId, scale: Vec3 },
    SetParent { id: ObjectId, parent: Option<ObjectId> },
    SetUniform { target: UniformTarget, name: String, value: UniformValue },
    CameraPosition { position: Vec3 },
    CameraRotation { euler: Vec3 },
    CameraLookAt { target: Vec3 },
}

impl HostCommand {
    /// The object this call touched, if it was an object call.
    pub fn object(&self) -> Option<ObjectId> {
        match self {
            Self::Create { id, .. }
            | Self::Destroy { id }
            | Self::SetPosition { id, .. }
            | Self::SetRotation { id, .. }
            | Self::SetScale { id, .. }
            | Self::SetParent { id, .. } => Some(*id),
            Self::SetUniform {
                target: UniformTarget::Object(id),
                ..
            } => Some(*id),
            _ => None,
        }
    }
}

/// Host-side state of one object.
#[derive(Debug, Clone, PartialEq)]
pub struct HostObject {
    pub primitive: Primitive,
    pub material: String,
    pub position: Vec3,
    pub euler: Vec3,
    pub scale: Vec3,
    pub parent: Option<ObjectId>,
}

/// In-memory host that applies and records every call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    objects: BTreeMap<ObjectId, HostObject>,
    uniforms: BTreeMap<(UniformTarget, String), UniformValue>,
    camera_position: Vec3,
    camera_euler: Vec3,
    commands: Vec<HostCommand>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, id: ObjectId) -> Option<&HostObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> &BTreeMap<ObjectId, HostObject> {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn uniform(&self, target: UniformTarget, name: &str) -> Option<UniformValue> {
        self.uniforms.get(&(target, name.to_string())).copied()
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub fn camera_euler(&self) -> Vec3 {
        self.camera_euler
    }

    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut HostObject, HostError> {
        self.objects.get_mut(&id).ok_or(HostError::UnknownObject(id))
    }
}

impl SceneHost for RecordingHost {
    fn create_object(&mut self, id: ObjectId, spec: &ObjectSpec) -> Result<(), HostError> {
        if self.objects.contains_key(&id) {
            return Err(HostError::DuplicateObject(id));
        }
        self.objects.insert(
            id,
            HostObject {
                primitive: spec.primitive,
                material: spec.material.name.clone(),
                position: spec.transform.position,
                euler: spec.transform.euler(),
                scale: spec.transform.scale,
                parent: None,
            },
        );
        self.commands.push(HostCommand::Create {
            id,
            kind: spec.primitive.kind_name(),
        });
        Ok(())
    }

    fn destroy_object(&mut self, id: ObjectId) -> Result<(), HostError> {
        self.objects.remove(&id).ok_or(HostError::UnknownObject(id))?;
        for object in self.objects.values_mut() {
            if object.parent == Some(id) {
                object.parent = None;
            }
        }
        self.uniforms
            .retain(|(target, _), _| *target != UniformTarget::Object(id));
        self.commands.push(HostCommand::Destroy { id });
        Ok(())
    }

    fn set_position(&mut self, id: ObjectId, position: Vec3) -> Result<(), HostError> {
        self.object_mut(id)?.position = position;
        self.commands.push(HostCommand::SetPosition { id, position });
        Ok(())
    }

    fn set_rotation(&mut self, id: ObjectId, euler: Vec3) -> Result<(), HostError> {
        self.object_mut(id)?.euler = euler;
        self.commands.push(HostCommand::SetRotation { id, euler });
        Ok(())
    }

    fn set_scale(&mut self, id: ObjectId, scale: Vec3) -> Result<(), HostError> {
        self.object_mut(id)?.scale = scale;
        self.commands.push(HostCommand::SetScale { id, scale });
        Ok(())
    }

    fn object_position(&self, id: ObjectId) -> Result<Vec3, HostError> {
        self.objects
            .get(&id)
            .map(|o| o.position)
            .ok_or(HostError::UnknownObject(id))
    }

    fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<(), HostError> {
        if let Some(p) = parent {
            if !self.objects.contains_key(&p) {
                return Err(HostError::UnknownObject(p));
            }
        }
        self.object_mut(id)?.parent = parent;
        self.commands.push(HostCommand::SetParent { id, parent });
        Ok(())
    }

    fn set_uniform(&mut self, target: UniformTarget, name: &str, value: UniformValue) -> Result<(), HostError> {
        if let UniformTarget::Object(id) = target {
            if !self.objects.contains_key(&id) {
                return Err(HostError::UnknownObject(id));
            }
        }
        self.uniforms.insert((target, name.to_string()), value);
        self.commands.push(HostCommand::SetUniform {
            target,
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.camera_position = position;
        self.commands.push(HostCommand::CameraPosition { position });
    }

    fn set_camera_rotation(&mut self, euler: Vec3) {
        self.camera_euler = euler;
        self.commands.push(HostCommand::CameraRotation { euler });
    }

    fn camera_look_at(&mut self, target: Vec3) {
        let dir = target - self.camera_position;
        if dir.length_squared() > 0.0 && dir.is_finite() {
            let dir = dir.normalize();
            // Yaw about Y then pitch about Z, taking +X to `dir`.
            let rotation = glam::Quat::from_rotation_y(-dir.z.atan2(dir.x))
                * glam::Quat::from_rotation_z(dir.y.clamp(-1.0, 1.0).asin());
            self.camera_euler = rotation.to_euler(glam::EulerRot::XYZ).into();
        } else {
            tracing::debug!(?target, "ignoring degenerate camera look-at");
        }
        self.commands.push(HostCommand::CameraLookAt { target });
    }
}

/// Text dump of the host scene, one line per object.
impl std::fmt::Display for RecordingHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "=== Host Scene (objects={}, uniforms={}, calls={}) ===",
            self.objects.len(),
            self.uniforms.len(),
            self.commands.len()
        )?;
        let c = self.camera_position;
        writeln!(f, "Camera: pos=({:.2}, {:.2}, {:.2})", c.x, c.y, c.z)?;
        for (id, object) in &self.objects {
            let p = object.position;
            write!(
                f,
                "  [{}] {} {} pos=({:.2}, {:.2}, {:.2})",
                id.short(),
                object.primitive.kind_name(),
                object.material,
                p.x,
                p.y,
                p.z
            )?;
            if let Some(parent) = object.parent {
                write!(f, " parent={}", parent.short())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
