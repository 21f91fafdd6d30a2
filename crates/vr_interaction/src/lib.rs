//! # VR Interaction
//!
//! Controller-driven hover, grab and release for VR scene graphs.
//!
//! ## Features
//!
//! - **Arena Scene Graph**: Reparenting that keeps world placement
//! - **Ray Targeting**: Controller rays against spheres, boxes and meshes
//! - **Hover Feedback**: Set-diff highlighting with no stale hover state
//! - **Grab/Release**: One held object per controller, returned home on release
//! - **Config Files**: TOML and RON tuning
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vr_interaction::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let mut system = InteractionSystem::new(InteractionConfig::default())?;
//!     let hand = system.add_controller(true)?;
//!
//!     let group = system.layout().interactables;
//!     system.graph_mut().add_child(
//!         group,
//!         Node::new("crate")
//!             .with_transform(Transform::from_position(Vec3::new(0.0, 1.0, -2.0)))
//!             .with_geometry(Geometry::cube(0.5)),
//!     )?;
//!
//!     system.set_controller_pose(hand, ControllerPose::at(Vec3::new(0.0, 1.0, 0.0)))?;
//!     system.update_frame();
//!     let outcome = system.handle_event(InputEvent::SelectStart(hand))?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod geometry;
pub mod scene;
pub mod interaction;
pub mod events;
pub mod app;
pub mod config;

mod error;

pub use error::{AttachFailure, InteractionError, InteractionResult};
pub use app::AppError;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        AppError, InteractionError, InteractionResult,
        app::{AssetSource, FrameDriver, FrameRenderer, InputSource},
        config::{Config, ConfigError, InteractionConfig},
        events::InputEvent,
        foundation::{
            collections::{ControllerId, NodeId},
            math::{Quat, Transform, Vec3},
        },
        geometry::{Geometry, Ray},
        interaction::{
            ControllerPose, FrameReport, GrabOutcome, GrabState, InteractionSystem, Intersection,
        },
        scene::{Material, Node, SceneGraph, SceneLayout},
    };
}
