//! Controller interaction
//!
//! # Module Organization
//!
//! - [`controller`] - Tracked controllers and their ray indicators
//! - [`registry`] - The interaction group and the held-object record
//! - [`targeting`] - Ray casting against interactables, nearest first
//! - [`highlight`] - Per-frame hover feedback as a set diff
//! - [`grab`] - Per-controller grab/release state machine
//! - [`system`] - [`InteractionSystem`] facade running the frame loop

pub mod controller;
pub mod registry;
pub mod targeting;
pub mod highlight;
pub mod grab;
pub mod system;

pub use controller::{Controller, ControllerPose};
pub use registry::InteractionRegistry;
pub use targeting::{Intersection, RayTargetingEngine};
pub use highlight::{HighlightController, HighlightPass};
pub use grab::{GrabOutcome, GrabState, GrabStateMachine};
pub use system::{FrameReport, InteractionSystem};
