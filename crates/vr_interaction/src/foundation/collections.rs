//! Arena key types
//!
//! Scene nodes and controllers live in slot maps and are referred to by
//! generational keys. A key from a removed slot, or `Default::default()`,
//! never resolves, which is how "node absent from the graph" is represented.

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle to a node stored in a [`SceneGraph`](crate::scene::SceneGraph)
    pub struct NodeId;

    /// Handle to a controller registered with an
    /// [`InteractionSystem`](crate::interaction::InteractionSystem)
    pub struct ControllerId;
}
