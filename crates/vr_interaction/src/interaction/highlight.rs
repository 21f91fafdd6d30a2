//! Hover highlighting
//!
//! Every frame the set of hovered nodes is recomputed from scratch and then
//! diffed against the previous frame: nodes that dropped out are reverted,
//! nodes that came in are marked, and nodes present in both are left alone.
//! Nothing outside the current set can stay hovered, and unchanged targeting
//! produces no material writes at all.

use std::collections::HashSet;

use crate::config::InteractionConfig;
use crate::error::InteractionError;
use crate::foundation::collections::{ControllerId, NodeId, SlotMap};
use crate::scene::SceneGraph;
use super::controller::Controller;
use super::grab::GrabStateMachine;
use super::registry::InteractionRegistry;
use super::targeting::RayTargetingEngine;

/// Outcome of one highlight pass
#[derive(Debug, Default)]
pub struct HighlightPass {
    /// Nodes carrying the hovered look after the pass
    pub hovered: usize,
    /// Nodes that switched to the hovered look this pass
    pub applied: usize,
    /// Nodes that switched back this pass
    pub reverted: usize,
    /// Controllers whose targeting failed; they contributed no hover
    pub failures: Vec<(ControllerId, InteractionError)>,
}

/// Owner of the hovered set
#[derive(Debug, Clone)]
pub struct HighlightController {
    highlighted: HashSet<NodeId>,
    hover_opacity: f32,
    default_ray_length: f32,
}

impl HighlightController {
    /// Create a controller with the hover look and reach from `config`
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            highlighted: HashSet::new(),
            hover_opacity: config.hover_opacity,
            default_ray_length: config.default_ray_length,
        }
    }

    /// Nodes currently carrying the hovered look
    pub fn highlighted(&self) -> &HashSet<NodeId> {
        &self.highlighted
    }

    /// Whether `node` currently carries the hovered look
    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.highlighted.contains(&node)
    }

    /// Run the per-frame pass
    ///
    /// Controllers that are holding, or that lack the ray targeting
    /// capability, are skipped and keep their ray length. For the rest the
    /// nearest hit (and every material-bearing node below it) is hovered and
    /// the ray indicator is stretched to the hit; without a hit the ray goes
    /// back to the default reach. One controller failing does not stop the
    /// others.
    pub fn update(
        &mut self,
        graph: &mut SceneGraph,
        registry: &InteractionRegistry,
        targeting: &RayTargetingEngine,
        controllers: &SlotMap<ControllerId, Controller>,
        grabs: &GrabStateMachine,
    ) -> HighlightPass {
        let mut next = HashSet::new();
        let mut failures = Vec::new();

        for (id, controller) in controllers {
            if !controller.ray_targeting() || grabs.is_holding(id) {
                continue;
            }

            let result = targeting
                .cast(graph, registry, controller.node())
                .and_then(|hits| match hits.first() {
                    Some(nearest) => {
                        next.extend(
                            graph
                                .traverse(nearest.node)
                                .filter(|&node| graph.get(node).is_some_and(|n| n.material.is_some())),
                        );
                        controller.set_ray_length(graph, nearest.distance)
                    }
                    None => controller.set_ray_length(graph, self.default_ray_length),
                });

            if let Err(err) = result {
                log::warn!("HighlightController: targeting failed for {}: {}", controller.name(), err);
                failures.push((id, err));
            }
        }

        let (applied, reverted) = self.apply(graph, next);
        HighlightPass {
            hovered: self.highlighted.len(),
            applied,
            reverted,
            failures,
        }
    }

    /// Make `next` the hovered set, touching only nodes that changed
    ///
    /// Returns how many nodes were marked and how many were reverted.
    pub fn apply(&mut self, graph: &mut SceneGraph, next: HashSet<NodeId>) -> (usize, usize) {
        let mut reverted = 0;
        for &stale in self.highlighted.difference(&next) {
            if let Some(material) = graph.get_mut(stale).and_then(|node| node.material.as_mut()) {
                material.revert_hover();
                reverted += 1;
            }
        }

        let mut applied = 0;
        for &fresh in next.difference(&self.highlighted) {
            if let Some(material) = graph.get_mut(fresh).and_then(|node| node.material.as_mut()) {
                material.apply_hover(self.hover_opacity);
                applied += 1;
            }
        }

        if applied > 0 || reverted > 0 {
            log::trace!("HighlightController: +{} -{}", applied, reverted);
        }

        self.highlighted = next;
        (applied, reverted)
    }

    /// Revert every hovered node
    pub fn clear(&mut self, graph: &mut SceneGraph) {
        self.apply(graph, HashSet::new());
    }
}
