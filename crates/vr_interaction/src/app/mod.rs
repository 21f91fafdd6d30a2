//! Application layer
//!
//! The interaction core does not load assets, talk to tracking hardware or
//! draw anything. Those collaborators plug in through the traits here, and a
//! [`FrameDriver`] runs them around the [`InteractionSystem`] one frame at a
//! time.

use thiserror::Error;

use crate::config::ConfigError;
use crate::error::InteractionError;
use crate::events::InputEvent;
use crate::foundation::collections::ControllerId;
use crate::interaction::{ControllerPose, FrameReport, InteractionSystem};
use crate::scene::{SceneGraph, SceneLayout};

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Interaction error propagated to application level
    #[error("Interaction error: {0}")]
    Interaction(#[from] InteractionError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(String),

    /// Rendering error
    #[error("Render error: {0}")]
    Render(String),
}

/// Fills a scene with content
pub trait AssetSource {
    /// Add scenery under `layout.environment` and grabbable objects under
    /// `layout.interactables`
    fn populate(&mut self, graph: &mut SceneGraph, layout: &SceneLayout) -> Result<(), AppError>;
}

/// Tracking and button state from the input subsystem
pub trait InputSource {
    /// Current world pose of each tracked controller
    fn poses(&mut self) -> Vec<(ControllerId, ControllerPose)>;

    /// Select events since the last call, in arrival order
    fn events(&mut self) -> Vec<InputEvent>;
}

/// Draws the scene
pub trait FrameRenderer {
    /// Draw `graph` for frame number `frame`
    fn render(&mut self, graph: &SceneGraph, frame: u64) -> Result<(), AppError>;
}

/// Cooperative frame loop around an [`InteractionSystem`]
pub struct FrameDriver<I, R> {
    system: InteractionSystem,
    input: I,
    renderer: R,
}

impl<I: InputSource, R: FrameRenderer> FrameDriver<I, R> {
    /// Wrap a system with its input and renderer
    pub fn new(system: InteractionSystem, input: I, renderer: R) -> Self {
        Self { system, input, renderer }
    }

    /// Populate the scene from `assets`
    pub fn load_assets(&mut self, assets: &mut impl AssetSource) -> Result<(), AppError> {
        let layout = *self.system.layout();
        assets.populate(self.system.graph_mut(), &layout)?;
        self.system.graph_mut().update_world_transforms();

        log::info!(
            "FrameDriver: scene populated ({} nodes, {} interactables)",
            self.system.graph().len(),
            self.system.registry().candidates(self.system.graph()).len()
        );
        Ok(())
    }

    /// Run one frame: poses, events, interaction update, render
    ///
    /// A pose for an unknown controller is logged and skipped. Only a render
    /// failure ends the frame with an error.
    pub fn step(&mut self) -> Result<FrameReport, AppError> {
        for (id, pose) in self.input.poses() {
            if let Err(err) = self.system.set_controller_pose(id, pose) {
                log::warn!("FrameDriver: dropped pose: {}", err);
            }
        }
        for event in self.input.events() {
            self.system.queue_event(event);
        }

        let report = self.system.update_frame();
        self.renderer.render(self.system.graph(), report.frame)?;
        Ok(report)
    }

    /// Run `frames` frames, returning each frame's report
    pub fn run(&mut self, frames: usize) -> Result<Vec<FrameReport>, AppError> {
        log::info!("FrameDriver: running {} frames", frames);
        (0..frames).map(|_| self.step()).collect()
    }

    /// The driven system
    pub fn system(&self) -> &InteractionSystem {
        &self.system
    }

    /// Mutable access to the driven system
    pub fn system_mut(&mut self) -> &mut InteractionSystem {
        &mut self.system
    }

    /// The input source
    pub fn input(&self) -> &I {
        &self.input
    }

    /// The renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InteractionConfig;
    use crate::foundation::math::{Transform, Vec3};
    use crate::geometry::Geometry;
    use crate::interaction::GrabOutcome;
    use crate::scene::Node;

    struct OneBox;

    impl AssetSource for OneBox {
        fn populate(&mut self, graph: &mut SceneGraph, layout: &SceneLayout) -> Result<(), AppError> {
            graph.add_child(
                layout.interactables,
                Node::new("box")
                    .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -3.0)))
                    .with_geometry(Geometry::cube(1.0)),
            )?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Script {
        frames: Vec<(Vec<(ControllerId, ControllerPose)>, Vec<InputEvent>)>,
    }

    impl InputSource for Script {
        fn poses(&mut self) -> Vec<(ControllerId, ControllerPose)> {
            self.frames.first().map(|(poses, _)| poses.clone()).unwrap_or_default()
        }

        fn events(&mut self) -> Vec<InputEvent> {
            if self.frames.is_empty() {
                return Vec::new();
            }
            self.frames.remove(0).1
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        frames: Vec<u64>,
        fail: bool,
    }

    impl FrameRenderer for CountingRenderer {
        fn render(&mut self, _graph: &SceneGraph, frame: u64) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::Render("device lost".to_string()));
            }
            self.frames.push(frame);
            Ok(())
        }
    }

    #[test]
    fn test_step_runs_input_update_render() {
        let mut system = InteractionSystem::new(InteractionConfig::default()).unwrap();
        let hand = system.add_controller(true).unwrap();
        let script = Script {
            frames: vec![
                (vec![(hand, ControllerPose::at(Vec3::new(0.0, 0.0, 0.0)))], Vec::new()),
                (Vec::new(), vec![InputEvent::SelectStart(hand)]),
                (Vec::new(), vec![InputEvent::SelectEnd(hand)]),
            ],
        };

        let mut driver = FrameDriver::new(system, script, CountingRenderer::default());
        driver.load_assets(&mut OneBox).unwrap();
        let reports = driver.run(3).unwrap();

        assert_eq!(reports[0].hovered, 1);
        assert!(matches!(reports[1].outcomes[0].1, GrabOutcome::Grabbed(_)));
        assert!(matches!(reports[2].outcomes[0].1, GrabOutcome::Released(_)));
        assert_eq!(reports[2].hovered, 1);
        assert_eq!(driver.renderer().frames, vec![1, 2, 3]);
    }

    #[test]
    fn test_render_failure_is_returned() {
        let system = InteractionSystem::new(InteractionConfig::default()).unwrap();
        let renderer = CountingRenderer {
            fail: true,
            ..CountingRenderer::default()
        };
        let mut driver = FrameDriver::new(system, Script::default(), renderer);

        assert!(matches!(driver.step(), Err(AppError::Render(_))));
    }
}
