//! Standard scene layout for interactive VR scenes
//!
//! ```text
//! Scene
//! ├── World Group
//! │   ├── Environment Group      (static scenery)
//! │   └── Interactables Group    (home of grabbable objects)
//! └── controllers...
//! ```

use crate::foundation::collections::NodeId;
use crate::error::InteractionResult;
use super::node::Node;
use super::scene_graph::SceneGraph;

/// Name of the scene root node
pub const SCENE_ROOT_NAME: &str = "Scene";
/// Name of the group holding everything placed in the world
pub const WORLD_GROUP_NAME: &str = "World Group";
/// Name of the group holding static scenery
pub const ENVIRONMENT_GROUP_NAME: &str = "Environment Group";
/// Name of the group holding grabbable objects
pub const INTERACTABLES_GROUP_NAME: &str = "Interactables Group";

/// Handles to the well-known groups of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLayout {
    /// Scene root; controllers are attached directly below it
    pub root: NodeId,
    /// Parent of the environment and interactables groups
    pub world: NodeId,
    /// Static scenery, never targeted
    pub environment: NodeId,
    /// The interaction group
    pub interactables: NodeId,
}

impl SceneLayout {
    /// Create the standard groups in `graph`
    pub fn build(graph: &mut SceneGraph) -> InteractionResult<Self> {
        let root = graph.add_root(Node::new(SCENE_ROOT_NAME));
        let world = graph.add_child(root, Node::new(WORLD_GROUP_NAME))?;
        let environment = graph.add_child(world, Node::new(ENVIRONMENT_GROUP_NAME))?;
        let interactables = graph.add_child(world, Node::new(INTERACTABLES_GROUP_NAME))?;

        log::debug!("SceneLayout: built standard groups under {:?}", root);

        Ok(Self {
            root,
            world,
            environment,
            interactables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_structure() {
        let mut graph = SceneGraph::new();
        let layout = SceneLayout::build(&mut graph).unwrap();

        assert_eq!(graph.parent(layout.world), Some(layout.root));
        assert_eq!(graph.children(layout.world), &[layout.environment, layout.interactables]);
        assert_eq!(graph.find_by_name(INTERACTABLES_GROUP_NAME), Some(layout.interactables));
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![layout.root]);
    }
}
