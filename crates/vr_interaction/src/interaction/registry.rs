//! Interaction registry
//!
//! The interaction group is the home of every grabbable object that is not
//! being held. Membership is read live from the scene graph, and held objects
//! are additionally recorded here so they are excluded even if topology and
//! traversal order ever disagree.

use std::collections::HashMap;

use crate::foundation::collections::{ControllerId, NodeId};
use crate::scene::SceneGraph;

/// Authoritative set of interactable objects
#[derive(Debug, Clone)]
pub struct InteractionRegistry {
    group: NodeId,
    held_by: HashMap<NodeId, ControllerId>,
}

impl InteractionRegistry {
    /// Create a registry rooted at the interaction group node
    pub fn new(group: NodeId) -> Self {
        Self {
            group,
            held_by: HashMap::new(),
        }
    }

    /// The interaction group node
    pub fn group(&self) -> NodeId {
        self.group
    }

    /// Every targetable node below the interaction group, depth first
    ///
    /// The group itself is not included. A subtree whose root is recorded as
    /// held is skipped entirely.
    pub fn candidates(&self, graph: &SceneGraph) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = graph.children(self.group).iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if self.held_by.contains_key(&id) {
                continue;
            }
            result.push(id);
            stack.extend(graph.children(id).iter().rev().copied());
        }

        result
    }

    /// Whether `node` currently lives in the interaction group subtree
    pub fn contains(&self, graph: &SceneGraph, node: NodeId) -> bool {
        graph.is_descendant_of(node, self.group)
    }

    /// Controller holding `node`, if any
    pub fn holder(&self, node: NodeId) -> Option<ControllerId> {
        self.held_by.get(&node).copied()
    }

    /// Whether `node` is held by any controller
    pub fn is_held(&self, node: NodeId) -> bool {
        self.held_by.contains_key(&node)
    }

    /// Record that `controller` holds `node`
    pub fn mark_held(&mut self, node: NodeId, controller: ControllerId) {
        self.held_by.insert(node, controller);
    }

    /// Clear the hold record for `node`, returning the previous holder
    pub fn release(&mut self, node: NodeId) -> Option<ControllerId> {
        self.held_by.remove(&node)
    }

    /// Number of objects currently held
    pub fn held_count(&self) -> usize {
        self.held_by.len()
    }
}
