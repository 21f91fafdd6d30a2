//! Scene nodes and their material state

use crate::foundation::collections::NodeId;
use crate::foundation::math::{Mat4, Transform};
use crate::geometry::Geometry;

/// Surface state that hover feedback toggles
///
/// The values the material was created with are kept so that reverting a
/// hover restores exactly what the asset asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Current opacity in `[0, 1]`
    pub opacity: f32,
    /// Whether blending is enabled
    pub transparent: bool,
    base_opacity: f32,
    base_transparent: bool,
    hovered: bool,
}

impl Material {
    /// Create a material with explicit opacity and transparency
    pub fn new(opacity: f32, transparent: bool) -> Self {
        Self {
            opacity,
            transparent,
            base_opacity: opacity,
            base_transparent: transparent,
            hovered: false,
        }
    }

    /// Fully opaque material, transparency disabled
    pub fn opaque() -> Self {
        Self::new(1.0, false)
    }

    /// Switch to the hovered look
    pub fn apply_hover(&mut self, hover_opacity: f32) {
        self.transparent = true;
        self.opacity = hover_opacity;
        self.hovered = true;
    }

    /// Restore the look the material was created with
    pub fn revert_hover(&mut self) {
        self.opacity = self.base_opacity;
        self.transparent = self.base_transparent;
        self.hovered = false;
    }

    /// Whether the hovered look is currently applied
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::opaque()
    }
}

/// A node in the scene graph
///
/// Parent and child links are owned by the [`SceneGraph`](super::SceneGraph)
/// and can only change through it.
#[derive(Debug, Clone)]
pub struct Node {
    /// Human readable name, used for lookups and logging
    pub name: String,
    /// Transform relative to the parent
    pub local: Transform,
    /// Shape used for rendering and ray targeting
    pub geometry: Option<Geometry>,
    /// Surface state, present on nodes with renderable content
    pub material: Option<Material>,
    pub(super) world: Mat4,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl Node {
    /// Create an empty node (a group) with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Transform::identity(),
            geometry: None,
            material: None,
            world: Mat4::identity(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.local = transform;
        self
    }

    /// Attach renderable geometry with a default opaque material
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self.material.get_or_insert_with(Material::opaque);
        self
    }

    /// Set the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Cached world matrix, valid after the last world transform update
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// Parent handle, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child handles
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node has something to draw
    pub fn is_renderable(&self) -> bool {
        self.geometry.is_some() || self.material.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_round_trip_restores_base() {
        let mut material = Material::new(0.8, true);

        material.apply_hover(0.5);
        assert!(material.is_hovered());
        assert_eq!(material.opacity, 0.5);
        assert!(material.transparent);

        material.revert_hover();
        assert!(!material.is_hovered());
        assert_eq!(material.opacity, 0.8);
        assert!(material.transparent);
    }

    #[test]
    fn test_opaque_revert_disables_transparency() {
        let mut material = Material::opaque();
        material.apply_hover(0.5);
        material.revert_hover();

        assert_eq!(material, Material::opaque());
    }

    #[test]
    fn test_geometry_brings_default_material() {
        let node = Node::new("crate").with_geometry(Geometry::cube(1.0));
        assert_eq!(node.material, Some(Material::opaque()));

        let tinted = Node::new("glass")
            .with_material(Material::new(0.3, true))
            .with_geometry(Geometry::cube(1.0));
        assert_eq!(tinted.material.map(|m| m.opacity), Some(0.3));
    }
}
