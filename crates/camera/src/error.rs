use glade_graph::GraphError;
use glade_tween::TweenError;

/// Errors from camera operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("invalid camera parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("waypoint policy produced no waypoints")]
    EmptyPath,
    #[error(transparent)]
    Tween(#[from] TweenError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
