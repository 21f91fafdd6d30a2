//! Scene graph adapter
//!
//! Nodes, their material state, the arena-backed [`SceneGraph`] and the
//! standard [`SceneLayout`] of world, environment and interactables groups.

pub mod node;
pub mod scene_graph;
pub mod layout;

pub use node::{Material, Node};
pub use scene_graph::{SceneGraph, Traverse};
pub use layout::SceneLayout;
