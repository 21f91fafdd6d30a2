//! Interaction errors

use thiserror::Error;

use crate::foundation::collections::{ControllerId, NodeId};

/// Why a reparent request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachFailure {
    /// The node to move is not in the graph
    MissingNode,
    /// The requested parent is not in the graph
    MissingParent,
    /// The requested parent is the node itself or one of its descendants
    Cycle,
    /// The requested parent's world matrix cannot be inverted
    SingularParent,
}

impl std::fmt::Display for AttachFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingNode => "node is not in the scene graph",
            Self::MissingParent => "parent is not in the scene graph",
            Self::Cycle => "parent is the node or one of its descendants",
            Self::SingularParent => "parent world transform is not invertible",
        };
        f.write_str(text)
    }
}

/// Errors raised by the scene graph and the interaction state machines
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// A reparent request was refused; the graph is unchanged
    #[error("Invalid attach of {node:?} under {parent:?}: {reason}")]
    InvalidAttach {
        /// Node that was to be moved
        node: NodeId,
        /// Requested new parent
        parent: NodeId,
        /// What was wrong with the request
        reason: AttachFailure,
    },

    /// Select-start arrived for a controller that is already holding
    #[error("Controller {controller:?} is already holding {held:?}")]
    InvalidState {
        /// Controller that received the duplicate event
        controller: ControllerId,
        /// Node it keeps holding
        held: NodeId,
    },

    /// Controller handle does not resolve
    #[error("Unknown controller: {0:?}")]
    UnknownController(ControllerId),

    /// Node handle does not resolve
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),
}

/// Result alias for interaction operations
pub type InteractionResult<T> = Result<T, InteractionError>;
