//! Grab and release
//!
//! Each controller is either idle or holding exactly one node. A grab
//! reparents the nearest targeted node under the controller; a release puts
//! it back where it came from inside the interaction group. Both keep the
//! node's world placement.

use crate::error::{InteractionError, InteractionResult};
use crate::foundation::collections::{ControllerId, NodeId, SecondaryMap};
use crate::scene::SceneGraph;
use super::registry::InteractionRegistry;
use super::targeting::RayTargetingEngine;

/// Hold state of one controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabState {
    /// Not holding anything
    #[default]
    Idle,
    /// Holding `node`, which came from `home`
    Holding {
        /// Held node, parented under the controller
        node: NodeId,
        /// Parent the node had when grabbed
        home: NodeId,
    },
}

impl GrabState {
    /// Held node, if any
    pub fn held(&self) -> Option<NodeId> {
        match *self {
            Self::Idle => None,
            Self::Holding { node, .. } => Some(node),
        }
    }
}

/// Result of a select event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabOutcome {
    /// The node is now held
    Grabbed(NodeId),
    /// Select-start with nothing under the ray; still idle
    NothingTargeted,
    /// The node went back to the interaction group
    Released(NodeId),
    /// Select-end while idle; nothing to do
    NothingHeld,
}

/// Per-controller hold state and the transitions between states
#[derive(Debug, Default)]
pub struct GrabStateMachine {
    states: SecondaryMap<ControllerId, GrabState>,
}

impl GrabStateMachine {
    /// Create an empty state machine
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a controller in the idle state
    pub fn register(&mut self, controller: ControllerId) {
        self.states.insert(controller, GrabState::Idle);
    }

    /// Current state of a controller
    pub fn state(&self, controller: ControllerId) -> Option<GrabState> {
        self.states.get(controller).copied()
    }

    /// Node held by a controller
    pub fn held(&self, controller: ControllerId) -> Option<NodeId> {
        self.state(controller).and_then(|state| state.held())
    }

    /// Whether a controller is holding something
    pub fn is_holding(&self, controller: ControllerId) -> bool {
        self.held(controller).is_some()
    }

    /// Handle select-start
    ///
    /// Idle: the nearest hit is attached to `controller_node` and recorded as
    /// held; with no hit the controller stays idle. Holding: the event is a
    /// duplicate and is refused with [`InteractionError::InvalidState`],
    /// leaving the current hold untouched.
    pub fn select_start(
        &mut self,
        controller: ControllerId,
        controller_node: NodeId,
        graph: &mut SceneGraph,
        registry: &mut InteractionRegistry,
        targeting: &RayTargetingEngine,
    ) -> InteractionResult<GrabOutcome> {
        let state = self
            .state(controller)
            .ok_or(InteractionError::UnknownController(controller))?;

        if let GrabState::Holding { node, .. } = state {
            log::warn!(
                "GrabStateMachine: duplicate select-start on {:?} while holding {:?}; ignored",
                controller,
                node
            );
            return Err(InteractionError::InvalidState { controller, held: node });
        }

        let hits = targeting.cast(graph, registry, controller_node)?;
        let Some(nearest) = hits.first() else {
            log::debug!("GrabStateMachine: {:?} selected nothing", controller);
            return Ok(GrabOutcome::NothingTargeted);
        };

        let node = nearest.node;
        let home = graph.parent(node).unwrap_or_else(|| registry.group());
        graph.attach(node, controller_node)?;
        registry.mark_held(node, controller);
        self.states.insert(controller, GrabState::Holding { node, home });

        log::debug!(
            "GrabStateMachine: {:?} grabbed {:?} at {:.2}",
            controller,
            node,
            nearest.distance
        );
        Ok(GrabOutcome::Grabbed(node))
    }

    /// Handle select-end
    ///
    /// Holding: the node goes back under its home when that is still inside
    /// the interaction group, otherwise under the group itself. Idle: no-op.
    pub fn select_end(
        &mut self,
        controller: ControllerId,
        graph: &mut SceneGraph,
        registry: &mut InteractionRegistry,
    ) -> InteractionResult<GrabOutcome> {
        let state = self
            .state(controller)
            .ok_or(InteractionError::UnknownController(controller))?;

        let GrabState::Holding { node, home } = state else {
            return Ok(GrabOutcome::NothingHeld);
        };

        let group = registry.group();
        let home_valid = home == group || registry.contains(graph, home);
        let destination = if home_valid { home } else { group };

        if let Err(err) = graph.attach(node, destination) {
            if destination == group {
                return Err(err);
            }
            log::warn!("GrabStateMachine: returning {:?} to the group instead: {}", node, err);
            graph.attach(node, group)?;
        }

        registry.release(node);
        self.states.insert(controller, GrabState::Idle);

        log::debug!("GrabStateMachine: {:?} released {:?}", controller, node);
        Ok(GrabOutcome::Released(node))
    }
}
