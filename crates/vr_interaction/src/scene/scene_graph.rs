//! Arena-backed scene graph
//!
//! Nodes live in a slot map and refer to each other by [`NodeId`]. Reparenting
//! is an index relink plus a world transform recomputation, so there are no
//! reference cycles to manage.

use crate::error::{AttachFailure, InteractionError, InteractionResult};
use crate::foundation::collections::{NodeId, SlotMap};
use crate::foundation::math::{has_orthogonal_basis, matrix_position, Mat4, Quat, Transform, Vec3};
use super::node::Node;

/// Tree of nodes with parent/child attachment
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
}

impl SceneGraph {
    /// Create an empty scene graph
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Insert a node with no parent
    pub fn add_root(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.reset_links(id);
        id
    }

    /// Insert a node as the last child of `parent`
    ///
    /// The node's transform is taken as relative to `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> InteractionResult<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(InteractionError::UnknownNode(parent));
        }

        let id = self.nodes.insert(node);
        self.reset_links(id);
        if let Some(child) = self.nodes.get_mut(id) {
            child.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    // Nodes arrive detached; links are only ever set by the graph.
    fn reset_links(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
            node.children.clear();
        }
    }

    /// Number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` resolves to a node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutably borrow a node
    ///
    /// Links cannot be changed this way; use [`attach`](Self::attach).
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Parent of a node, `None` for roots and unknown nodes
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Ordered children of a node, empty for unknown nodes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// First node with the given name, in arena order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// Root nodes in arena order
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Whether `node` lies strictly below `ancestor`
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Replace a node's local transform
    pub fn set_local_transform(&mut self, id: NodeId, transform: Transform) -> InteractionResult<()> {
        let node = self.nodes.get_mut(id).ok_or(InteractionError::UnknownNode(id))?;
        node.local = transform;
        Ok(())
    }

    /// Cached world matrix
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.nodes.get(id).map(|node| node.world)
    }

    /// Cached world position
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.nodes.get(id).map(|node| matrix_position(&node.world))
    }

    /// Cached world orientation
    pub fn world_rotation(&self, id: NodeId) -> Option<Quat> {
        self.nodes
            .get(id)
            .map(|node| Transform::from_matrix(&node.world).rotation)
    }

    /// Recompute the world matrix of `id` from its ancestor chain, then
    /// refresh everything below it
    pub fn update_world_transform(&mut self, id: NodeId) -> InteractionResult<()> {
        if !self.nodes.contains_key(id) {
            return Err(InteractionError::UnknownNode(id));
        }

        // Walk up to the root, then evaluate top-down
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            chain.push(ancestor);
            current = self.parent(ancestor);
        }

        let mut parent_world = Mat4::identity();
        for ancestor in chain.into_iter().rev() {
            if let Some(node) = self.nodes.get_mut(ancestor) {
                node.world = parent_world * node.local.to_matrix();
                parent_world = node.world;
            }
        }

        self.update_subtree(id, parent_world);
        Ok(())
    }

    /// Recompute world matrices for every root subtree
    pub fn update_world_transforms(&mut self) {
        let roots: Vec<NodeId> = self.roots().collect();
        for root in roots {
            self.update_subtree(root, Mat4::identity());
        }
    }

    fn update_subtree(&mut self, id: NodeId, parent_world: Mat4) {
        let mut stack = vec![(id, parent_world)];
        while let Some((current, parent_world)) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current) {
                node.world = parent_world * node.local.to_matrix();
                let world = node.world;
                stack.extend(node.children.iter().map(|&child| (child, world)));
            }
        }
    }

    /// Move `node` under `new_parent`, keeping its world transform
    ///
    /// The node's local transform is recomputed against the new parent's
    /// world matrix and it is appended to the new parent's children. On
    /// failure nothing in the graph changes.
    pub fn attach(&mut self, node: NodeId, new_parent: NodeId) -> InteractionResult<()> {
        let result = self.try_attach(node, new_parent);
        if let Err(err) = &result {
            log::warn!("SceneGraph: attach aborted: {}", err);
        }
        result
    }

    fn try_attach(&mut self, node: NodeId, new_parent: NodeId) -> InteractionResult<()> {
        let refuse = |reason| InteractionError::InvalidAttach {
            node,
            parent: new_parent,
            reason,
        };

        if !self.nodes.contains_key(node) {
            return Err(refuse(AttachFailure::MissingNode));
        }
        if !self.nodes.contains_key(new_parent) {
            return Err(refuse(AttachFailure::MissingParent));
        }
        if node == new_parent || self.is_descendant_of(new_parent, node) {
            return Err(refuse(AttachFailure::Cycle));
        }

        self.update_world_transform(new_parent)?;
        self.update_world_transform(node)?;

        let parent_world = self.world_matrix(new_parent).ok_or_else(|| refuse(AttachFailure::MissingParent))?;
        let node_world = self.world_matrix(node).ok_or_else(|| refuse(AttachFailure::MissingNode))?;
        let parent_inverse = parent_world
            .try_inverse()
            .ok_or_else(|| refuse(AttachFailure::SingularParent))?;
        let relative = parent_inverse * node_world;
        if !has_orthogonal_basis(&relative) {
            log::warn!(
                "SceneGraph: {:?} is sheared relative to {:?}; keeping position, orientation will drift",
                node,
                new_parent
            );
        }
        let local = Transform::from_matrix(&relative);

        // Validation is done; relink
        if let Some(old_parent) = self.parent(node) {
            if let Some(old) = self.nodes.get_mut(old_parent) {
                old.children.retain(|&child| child != node);
            }
        }
        if let Some(moved) = self.nodes.get_mut(node) {
            moved.parent = Some(new_parent);
            moved.local = local;
        }
        if let Some(parent) = self.nodes.get_mut(new_parent) {
            parent.children.push(node);
        }

        self.update_subtree(node, parent_world);
        log::trace!("SceneGraph: attached {:?} under {:?}", node, new_parent);
        Ok(())
    }

    /// Depth-first, pre-order walk over `id` and all of its descendants
    ///
    /// Children are visited in their stored order. Each call starts a fresh
    /// walk; an unknown `id` yields nothing.
    pub fn traverse(&self, id: NodeId) -> Traverse<'_> {
        Traverse {
            graph: self,
            stack: vec![id],
        }
    }
}

/// Lazy depth-first iterator returned by [`SceneGraph::traverse`]
#[derive(Debug, Clone)]
pub struct Traverse<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl Iterator for Traverse<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.graph.get(id) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some(id);
            }
        }
        None
    }
}
