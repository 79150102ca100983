use glade_camera::CameraError;
use glade_common::ObjectId;
use glade_graph::GraphError;
use glade_host::HostError;
use glade_terrain::TerrainError;
use glade_tween::TweenError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid session parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("a world is already built; tear it down first")]
    WorldAlreadyBuilt,
    #[error("object {0} is not part of this session")]
    UnknownObject(ObjectId),
    #[error("the camera node cannot be used as a scene object")]
    CameraNode,
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Tween(#[from] TweenError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Host(#[from] HostError),
}
