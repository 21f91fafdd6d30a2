//! Tracked controllers
//!
//! A controller is a scene node posed by the input subsystem each frame, with
//! a ray indicator child: a unit line along the local forward axis whose Z
//! scale is the current ray length.

use crate::error::{InteractionError, InteractionResult};
use crate::foundation::collections::NodeId;
use crate::foundation::math::{Quat, Transform, Vec3};
use crate::scene::{Node, SceneGraph};

/// World pose reported by the input subsystem
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerPose {
    /// Position in world space
    pub position: Vec3,
    /// Orientation in world space
    pub rotation: Quat,
}

impl ControllerPose {
    /// Create a pose from position and orientation
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` looking down -Z
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::identity())
    }
}

impl Default for ControllerPose {
    fn default() -> Self {
        Self::at(Vec3::zeros())
    }
}

/// A tracked input device
#[derive(Debug, Clone)]
pub struct Controller {
    name: String,
    node: NodeId,
    ray_indicator: NodeId,
    ray_targeting: bool,
}

impl Controller {
    /// Create the controller node under `parent` along with its ray indicator
    ///
    /// `ray_targeting` is the capability flag reported by the input
    /// subsystem; controllers without it never hover but can still grab.
    pub fn spawn(
        graph: &mut SceneGraph,
        parent: NodeId,
        name: impl Into<String>,
        ray_targeting: bool,
        ray_length: f32,
    ) -> InteractionResult<Self> {
        let name = name.into();
        let node = graph.add_child(parent, Node::new(name.clone()))?;
        let ray_indicator = graph.add_child(
            node,
            Node::new(format!("{name} Ray"))
                .with_transform(Transform::identity().with_scale(Vec3::new(1.0, 1.0, ray_length))),
        )?;

        Ok(Self {
            name,
            node,
            ray_indicator,
            ray_targeting,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_nodes(name: &str, node: NodeId, ray_indicator: NodeId, ray_targeting: bool) -> Self {
        Self {
            name: name.to_string(),
            node,
            ray_indicator,
            ray_targeting,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scene node carrying the controller pose
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Scene node of the ray indicator line
    pub fn ray_indicator(&self) -> NodeId {
        self.ray_indicator
    }

    /// Whether this controller may target by ray
    pub fn ray_targeting(&self) -> bool {
        self.ray_targeting
    }

    /// Update the ray targeting capability
    pub fn set_ray_targeting(&mut self, enabled: bool) {
        self.ray_targeting = enabled;
    }

    /// Move the controller node to a new world pose
    ///
    /// Controllers hang directly off the scene root, so the world pose is
    /// also the local transform.
    pub fn set_pose(&self, graph: &mut SceneGraph, pose: ControllerPose) -> InteractionResult<()> {
        let scale = graph
            .get(self.node)
            .ok_or(InteractionError::UnknownNode(self.node))?
            .local
            .scale;
        graph.set_local_transform(
            self.node,
            Transform::from_position_rotation(pose.position, pose.rotation).with_scale(scale),
        )
    }

    /// Current ray indicator length
    pub fn ray_length(&self, graph: &SceneGraph) -> Option<f32> {
        graph.get(self.ray_indicator).map(|node| node.local.scale.z)
    }

    /// Stretch the ray indicator to `length`
    pub fn set_ray_length(&self, graph: &mut SceneGraph, length: f32) -> InteractionResult<()> {
        let indicator = graph
            .get_mut(self.ray_indicator)
            .ok_or(InteractionError::UnknownNode(self.ray_indicator))?;
        indicator.local.scale.z = length;
        Ok(())
    }
}
