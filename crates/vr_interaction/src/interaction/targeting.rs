//! Ray targeting
//!
//! Casts a ray from a controller along its forward axis into the interaction
//! registry's live members and reports every hit, nearest first.

use crate::config::InteractionConfig;
use crate::error::{InteractionError, InteractionResult};
use crate::foundation::collections::NodeId;
use crate::foundation::math::{forward_axis, matrix_position, Vec3};
use crate::geometry::Ray;
use crate::scene::SceneGraph;
use super::registry::InteractionRegistry;

/// A ray hit against a candidate node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Node whose geometry was hit
    pub node: NodeId,
    /// Distance from the ray origin in world units
    pub distance: f32,
    /// Hit point in world space
    pub point: Vec3,
}

/// Builds controller rays and intersects them with interactables
#[derive(Debug, Clone, Default)]
pub struct RayTargetingEngine {
    max_distance: Option<f32>,
}

impl RayTargetingEngine {
    /// Create an engine with unlimited reach
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine using the reach from `config`
    pub fn from_config(config: &InteractionConfig) -> Self {
        Self {
            max_distance: config.max_ray_distance,
        }
    }

    /// Ignore hits farther than `max_distance`
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = Some(max_distance);
        self
    }

    /// World-space ray from a controller node
    ///
    /// Brings the controller's world transform up to date first, since its
    /// pose changes every frame.
    pub fn ray_for(&self, graph: &mut SceneGraph, controller_node: NodeId) -> InteractionResult<Ray> {
        graph.update_world_transform(controller_node)?;
        let world = graph
            .world_matrix(controller_node)
            .ok_or(InteractionError::UnknownNode(controller_node))?;

        Ok(Ray::new(matrix_position(&world), world.transform_vector(&forward_axis())))
    }

    /// Cast from a controller node into the registry's candidates
    ///
    /// Returns intersections ascending by distance; an empty list means
    /// nothing was hit, which is a normal outcome.
    pub fn cast(
        &self,
        graph: &mut SceneGraph,
        registry: &InteractionRegistry,
        controller_node: NodeId,
    ) -> InteractionResult<Vec<Intersection>> {
        let ray = self.ray_for(graph, controller_node)?;
        graph.update_world_transform(registry.group())?;
        Ok(self.intersect(graph, registry, &ray))
    }

    /// Intersect a world-space ray with the registry's candidates
    ///
    /// World transforms are used as cached. Equal distances keep candidate
    /// traversal order, so identical input always gives identical output.
    pub fn intersect(&self, graph: &SceneGraph, registry: &InteractionRegistry, ray: &Ray) -> Vec<Intersection> {
        // A controller scaled to nothing has no usable direction
        if !ray.direction.iter().all(|c| c.is_finite()) {
            return Vec::new();
        }

        let mut hits: Vec<Intersection> = registry
            .candidates(graph)
            .into_iter()
            .filter_map(|id| {
                let node = graph.get(id)?;
                let geometry = node.geometry.as_ref()?;
                let distance = geometry.intersect_world(node.world_matrix(), ray)?;
                Some(Intersection {
                    node: id,
                    distance,
                    point: ray.point_at(distance),
                })
            })
            .filter(|hit| self.max_distance.map_or(true, |max| hit.distance <= max))
            .collect();

        // Stable sort: ties stay in traversal order
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        log::trace!("RayTargetingEngine: {} hits", hits.len());
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform};
    use crate::geometry::Geometry;
    use crate::scene::Node;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    struct Fixture {
        graph: SceneGraph,
        registry: InteractionRegistry,
        controller: NodeId,
    }

    fn fixture() -> Fixture {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(Node::new("Scene"));
        let group = graph.add_child(root, Node::new("Interactables Group")).unwrap();
        let controller = graph.add_child(root, Node::new("controller")).unwrap();
        Fixture {
            graph,
            registry: InteractionRegistry::new(group),
            controller,
        }
    }

    fn sphere_at(graph: &mut SceneGraph, parent: NodeId, name: &str, position: Vec3) -> NodeId {
        graph
            .add_child(
                parent,
                Node::new(name)
                    .with_transform(Transform::from_position(position))
                    .with_geometry(Geometry::Sphere { radius: 0.5 }),
            )
            .unwrap()
    }

    #[test]
    fn test_hits_sorted_nearest_first() {
        let mut f = fixture();
        let group = f.registry.group();
        let far = sphere_at(&mut f.graph, group, "far", Vec3::new(0.0, 0.0, -5.5));
        let near = sphere_at(&mut f.graph, group, "near", Vec3::new(0.0, 0.0, -2.5));

        let hits = RayTargetingEngine::new().cast(&mut f.graph, &f.registry, f.controller).unwrap();

        assert_eq!(hits.iter().map(|h| h.node).collect::<Vec<_>>(), vec![near, far]);
        assert_relative_eq!(hits[0].distance, 2.0, epsilon = 1e-4);
        assert_relative_eq!(hits[1].distance, 5.0, epsilon = 1e-4);
        assert_relative_eq!(hits[0].point, Vec3::new(0.0, 0.0, -2.0), epsilon = 1e-4);
    }

    #[test]
    fn test_ray_follows_controller_pose() {
        let mut f = fixture();
        let group = f.registry.group();
        let target = sphere_at(&mut f.graph, group, "left", Vec3::new(-3.0, 1.0, 0.0));

        // Facing -Z sees nothing
        let engine = RayTargetingEngine::new();
        assert!(engine.cast(&mut f.graph, &f.registry, f.controller).unwrap().is_empty());

        // Turn to face -X and raise to the target's height
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        f.graph
            .set_local_transform(f.controller, Transform::from_position_rotation(Vec3::new(0.0, 1.0, 0.0), rotation))
            .unwrap();

        let hits = engine.cast(&mut f.graph, &f.registry, f.controller).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, target);
        assert_relative_eq!(hits[0].distance, 2.5, epsilon = 1e-4);
    }

    #[test]
    fn test_nested_children_are_targeted() {
        let mut f = fixture();
        let group = f.registry.group();
        let model = f
            .graph
            .add_child(group, Node::new("model").with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -4.0))))
            .unwrap();
        let part = sphere_at(&mut f.graph, model, "part", Vec3::new(0.0, 0.0, 1.0));

        let hits = RayTargetingEngine::new().cast(&mut f.graph, &f.registry, f.controller).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, part);
        assert_relative_eq!(hits[0].distance, 2.5, epsilon = 1e-4);
    }

    #[test]
    fn test_equal_distances_keep_traversal_order() {
        let mut f = fixture();
        let group = f.registry.group();
        let first = sphere_at(&mut f.graph, group, "first", Vec3::new(0.0, 0.0, -3.0));
        let second = sphere_at(&mut f.graph, group, "second", Vec3::new(0.0, 0.0, -3.0));

        let engine = RayTargetingEngine::new();
        for _ in 0..3 {
            let hits = engine.cast(&mut f.graph, &f.registry, f.controller).unwrap();
            assert_eq!(hits.iter().map(|h| h.node).collect::<Vec<_>>(), vec![first, second]);
        }
    }

    #[test]
    fn test_max_distance_drops_far_hits() {
        let mut f = fixture();
        let group = f.registry.group();
        let near = sphere_at(&mut f.graph, group, "near", Vec3::new(0.0, 0.0, -2.5));
        sphere_at(&mut f.graph, group, "far", Vec3::new(0.0, 0.0, -20.0));

        let hits = RayTargetingEngine::new()
            .with_max_distance(10.0)
            .cast(&mut f.graph, &f.registry, f.controller)
            .unwrap();
        assert_eq!(hits.iter().map(|h| h.node).collect::<Vec<_>>(), vec![near]);
    }

    #[test]
    fn test_reach_comes_from_config() {
        let mut f = fixture();
        let group = f.registry.group();
        let near = sphere_at(&mut f.graph, group, "near", Vec3::new(0.0, 0.0, -2.5));
        sphere_at(&mut f.graph, group, "far", Vec3::new(0.0, 0.0, -13.5));

        let config = InteractionConfig {
            max_ray_distance: Some(12.0),
            ..InteractionConfig::default()
        };
        let hits = RayTargetingEngine::from_config(&config)
            .cast(&mut f.graph, &f.registry, f.controller)
            .unwrap();
        assert_eq!(hits.iter().map(|h| h.node).collect::<Vec<_>>(), vec![near]);

        let unlimited = RayTargetingEngine::from_config(&InteractionConfig::default())
            .cast(&mut f.graph, &f.registry, f.controller)
            .unwrap();
        assert_eq!(unlimited.len(), 2);
    }

    #[test]
    fn test_empty_registry_and_unknown_controller() {
        let mut f = fixture();
        let engine = RayTargetingEngine::new();
        assert!(engine.cast(&mut f.graph, &f.registry, f.controller).unwrap().is_empty());

        let err = engine.cast(&mut f.graph, &f.registry, NodeId::default()).unwrap_err();
        assert_eq!(err, InteractionError::UnknownNode(NodeId::default()));
    }
}
