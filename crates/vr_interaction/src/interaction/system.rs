//! Interaction system
//!
//! Owns the scene graph, the standard layout, the controllers and every
//! interaction component, and runs them in a fixed order once per frame:
//! queued select events, world transforms, then the highlight pass.

use crate::config::InteractionConfig;
use crate::error::{InteractionError, InteractionResult};
use crate::events::{EventQueue, InputEvent};
use crate::foundation::collections::{ControllerId, NodeId, SlotMap};
use crate::scene::{SceneGraph, SceneLayout};
use super::controller::{Controller, ControllerPose};
use super::grab::{GrabOutcome, GrabState, GrabStateMachine};
use super::highlight::HighlightController;
use super::registry::InteractionRegistry;
use super::targeting::{Intersection, RayTargetingEngine};

/// Summary of one [`InteractionSystem::update_frame`] call
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Queued events handled at the start of the frame
    pub events_applied: usize,
    /// Outcome of every queued event that succeeded, in arrival order
    pub outcomes: Vec<(InputEvent, GrabOutcome)>,
    /// Nodes carrying the hovered look after the frame
    pub hovered: usize,
    /// Events and controllers that failed this frame; all were logged
    pub failures: usize,
}

/// Facade over the scene and the interaction state machines
#[derive(Debug)]
pub struct InteractionSystem {
    config: InteractionConfig,
    graph: SceneGraph,
    layout: SceneLayout,
    registry: InteractionRegistry,
    targeting: RayTargetingEngine,
    highlight: HighlightController,
    grabs: GrabStateMachine,
    controllers: SlotMap<ControllerId, Controller>,
    events: EventQueue,
    frame: u64,
}

impl InteractionSystem {
    /// Create a system with an empty standard scene layout
    pub fn new(config: InteractionConfig) -> InteractionResult<Self> {
        let mut graph = SceneGraph::new();
        let layout = SceneLayout::build(&mut graph)?;

        log::info!(
            "InteractionSystem: created (ray length {}, hover opacity {})",
            config.default_ray_length,
            config.hover_opacity
        );

        Ok(Self {
            registry: InteractionRegistry::new(layout.interactables),
            targeting: RayTargetingEngine::from_config(&config),
            highlight: HighlightController::new(&config),
            grabs: GrabStateMachine::new(),
            controllers: SlotMap::with_key(),
            events: EventQueue::new(),
            frame: 0,
            config,
            graph,
            layout,
        })
    }

    /// Interaction tuning in use
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access to the scene graph, for populating and moving content
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Handles to the standard groups
    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// The interaction registry
    pub fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    /// The highlight controller
    pub fn highlight(&self) -> &HighlightController {
        &self.highlight
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Add a controller under the scene root
    pub fn add_controller(&mut self, ray_targeting: bool) -> InteractionResult<ControllerId> {
        let name = format!("Controller {}", self.controllers.len() + 1);
        let controller = Controller::spawn(
            &mut self.graph,
            self.layout.root,
            name,
            ray_targeting,
            self.config.default_ray_length,
        )?;

        log::info!("InteractionSystem: added {}", controller.name());
        let id = self.controllers.insert(controller);
        self.grabs.register(id);
        Ok(id)
    }

    /// Look up a controller
    pub fn controller(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(id)
    }

    /// Every controller with its handle
    pub fn controllers(&self) -> impl Iterator<Item = (ControllerId, &Controller)> + '_ {
        self.controllers.iter()
    }

    /// Apply a pose reported by the input subsystem
    pub fn set_controller_pose(&mut self, id: ControllerId, pose: ControllerPose) -> InteractionResult<()> {
        self.controllers
            .get(id)
            .ok_or(InteractionError::UnknownController(id))?
            .set_pose(&mut self.graph, pose)
    }

    /// Update a controller's ray targeting capability
    pub fn set_ray_targeting(&mut self, id: ControllerId, enabled: bool) -> InteractionResult<()> {
        self.controllers
            .get_mut(id)
            .ok_or(InteractionError::UnknownController(id))?
            .set_ray_targeting(enabled);
        Ok(())
    }

    /// Hold state of a controller
    pub fn grab_state(&self, id: ControllerId) -> Option<GrabState> {
        self.grabs.state(id)
    }

    /// Node held by a controller
    pub fn held(&self, id: ControllerId) -> Option<NodeId> {
        self.grabs.held(id)
    }

    /// Cast a controller's ray now, nearest hit first
    pub fn cast(&mut self, id: ControllerId) -> InteractionResult<Vec<Intersection>> {
        let node = self.controller_node(id)?;
        self.targeting.cast(&mut self.graph, &self.registry, node)
    }

    /// Handle select-start for a controller immediately
    ///
    /// Grabbing does not depend on the ray targeting capability; that only
    /// decides whether the controller hovers.
    pub fn select_start(&mut self, id: ControllerId) -> InteractionResult<GrabOutcome> {
        let node = self.controller_node(id)?;
        self.grabs
            .select_start(id, node, &mut self.graph, &mut self.registry, &self.targeting)
    }

    /// Handle select-end for a controller immediately
    pub fn select_end(&mut self, id: ControllerId) -> InteractionResult<GrabOutcome> {
        self.grabs.select_end(id, &mut self.graph, &mut self.registry)
    }

    /// Handle an input event immediately, between frames
    pub fn handle_event(&mut self, event: InputEvent) -> InteractionResult<GrabOutcome> {
        match event {
            InputEvent::SelectStart(id) => self.select_start(id),
            InputEvent::SelectEnd(id) => self.select_end(id),
        }
    }

    /// Park an input event until the next [`update_frame`](Self::update_frame)
    pub fn queue_event(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Number of events waiting for the next frame
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Run one frame
    ///
    /// Queued events are handled first, then world transforms are refreshed,
    /// then the highlight pass runs for every controller that is not holding.
    /// Failures are logged and counted in the report; they never abort the
    /// frame.
    pub fn update_frame(&mut self) -> FrameReport {
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };

        let pending: Vec<InputEvent> = self.events.drain().collect();
        for event in pending {
            report.events_applied += 1;
            match self.handle_event(event) {
                Ok(outcome) => report.outcomes.push((event, outcome)),
                Err(err) => {
                    log::warn!("InteractionSystem: {:?} failed: {}", event, err);
                    report.failures += 1;
                }
            }
        }

        self.graph.update_world_transforms();

        let pass = self.highlight.update(
            &mut self.graph,
            &self.registry,
            &self.targeting,
            &self.controllers,
            &self.grabs,
        );
        report.hovered = pass.hovered;
        report.failures += pass.failures.len();

        log::trace!(
            "InteractionSystem: frame {} ({} events, {} hovered, {} failures)",
            report.frame,
            report.events_applied,
            report.hovered,
            report.failures
        );
        report
    }

    fn controller_node(&self, id: ControllerId) -> InteractionResult<NodeId> {
        self.controllers
            .get(id)
            .map(Controller::node)
            .ok_or(InteractionError::UnknownController(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Transform, Vec3};
    use crate::geometry::Geometry;
    use crate::scene::Node;

    fn system_with_box(z: f32) -> (InteractionSystem, NodeId) {
        let mut system = InteractionSystem::new(InteractionConfig::default()).unwrap();
        let group = system.layout().interactables;
        let target = system
            .graph_mut()
            .add_child(
                group,
                Node::new("crate")
                    .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, z)))
                    .with_geometry(Geometry::cube(1.0)),
            )
            .unwrap();
        (system, target)
    }

    #[test]
    fn test_new_builds_layout() {
        let system = InteractionSystem::new(InteractionConfig::default()).unwrap();
        let layout = *system.layout();

        assert_eq!(system.registry().group(), layout.interactables);
        assert_eq!(system.graph().parent(layout.interactables), Some(layout.world));
        assert_eq!(system.frame_count(), 0);
    }

    #[test]
    fn test_controllers_are_named_and_idle() {
        let mut system = InteractionSystem::new(InteractionConfig::default()).unwrap();
        let left = system.add_controller(true).unwrap();
        let right = system.add_controller(true).unwrap();

        assert_eq!(system.controller(left).unwrap().name(), "Controller 1");
        assert_eq!(system.controller(right).unwrap().name(), "Controller 2");
        assert_eq!(system.grab_state(left), Some(GrabState::Idle));
        assert_eq!(
            system.graph().parent(system.controller(right).unwrap().node()),
            Some(system.layout().root)
        );
    }

    #[test]
    fn test_queued_events_apply_before_highlight() {
        let (mut system, target) = system_with_box(-3.0);
        let hand = system.add_controller(true).unwrap();

        system.queue_event(InputEvent::SelectStart(hand));
        assert_eq!(system.pending_events(), 1);
        assert_eq!(system.held(hand), None);

        let report = system.update_frame();

        assert_eq!(report.frame, 1);
        assert_eq!(report.events_applied, 1);
        assert_eq!(report.outcomes, vec![(InputEvent::SelectStart(hand), GrabOutcome::Grabbed(target))]);
        assert_eq!(report.hovered, 0);
        assert_eq!(system.held(hand), Some(target));
        assert_eq!(system.pending_events(), 0);
    }

    #[test]
    fn test_failed_events_are_counted_not_propagated() {
        let (mut system, _target) = system_with_box(-3.0);
        let hand = system.add_controller(true).unwrap();
        system.handle_event(InputEvent::SelectStart(hand)).unwrap();

        system.queue_event(InputEvent::SelectStart(hand));
        let report = system.update_frame();

        assert_eq!(report.events_applied, 1);
        assert_eq!(report.failures, 1);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_controller_without_ray_grabs_but_never_hovers() {
        let (mut system, target) = system_with_box(-3.0);
        let hand = system.add_controller(false).unwrap();

        assert_eq!(system.update_frame().hovered, 0);
        assert_eq!(system.handle_event(InputEvent::SelectStart(hand)).unwrap(), GrabOutcome::Grabbed(target));
        assert_eq!(system.held(hand), Some(target));
        assert_eq!(system.graph().parent(target), Some(system.controller(hand).unwrap().node()));
    }

    #[test]
    fn test_unknown_controller_is_reported() {
        let mut system = InteractionSystem::new(InteractionConfig::default()).unwrap();
        let mut other = SlotMap::<ControllerId, ()>::with_key();
        other.insert(());
        let ghost = other.insert(());

        assert_eq!(
            system.select_start(ghost).unwrap_err(),
            InteractionError::UnknownController(ghost)
        );
        assert_eq!(
            system.set_controller_pose(ghost, ControllerPose::default()).unwrap_err(),
            InteractionError::UnknownController(ghost)
        );
    }
}
