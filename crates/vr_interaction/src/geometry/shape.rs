//! Renderable geometry attached to scene nodes
//!
//! Shapes are stored in model space and tested on demand: the world ray is
//! carried into the node's local space with the inverse world matrix, so a
//! shape under any parent chain intersects exactly.

use crate::foundation::math::{Mat4, Vec3};
use super::primitives::{BoundingSphere, Ray, Triangle, AABB};

/// Model-space shape of a renderable node
#[derive(Debug, Clone)]
pub enum Geometry {
    /// Sphere centered on the node origin
    Sphere {
        /// Radius in model units
        radius: f32,
    },
    /// Box centered on the node origin
    Cuboid {
        /// Half size along each local axis
        half_extents: Vec3,
    },
    /// Arbitrary triangle soup
    Mesh(Vec<Triangle>),
}

impl Geometry {
    /// Unit cube convenience constructor
    pub fn cube(size: f32) -> Self {
        Self::Cuboid {
            half_extents: Vec3::new(size, size, size) * 0.5,
        }
    }

    /// Build a triangle mesh from indexed vertices
    ///
    /// Trailing indices that do not form a full triangle are ignored, as are
    /// triangles referencing vertices out of range.
    pub fn mesh_from_indexed(vertices: &[Vec3], indices: &[u32]) -> Self {
        let triangles = indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let v0 = vertices.get(tri[0] as usize)?;
                let v1 = vertices.get(tri[1] as usize)?;
                let v2 = vertices.get(tri[2] as usize)?;
                Some(Triangle::new(*v0, *v1, *v2))
            })
            .collect();
        Self::Mesh(triangles)
    }

    /// Intersect a ray already expressed in this shape's model space
    pub fn intersect_local(&self, ray: &Ray) -> Option<f32> {
        match self {
            Self::Sphere { radius } => BoundingSphere::new(Vec3::zeros(), *radius).intersect_ray(ray),
            Self::Cuboid { half_extents } => {
                AABB::from_center_extents(Vec3::zeros(), *half_extents).intersect_ray(ray)
            }
            Self::Mesh(triangles) => triangles
                .iter()
                .filter_map(|triangle| triangle.intersect_ray(ray))
                .min_by(f32::total_cmp),
        }
    }

    /// Intersect a world-space ray with this shape placed by `world_matrix`
    ///
    /// Returns `None` for a degenerate (non-invertible) placement.
    pub fn intersect_world(&self, world_matrix: &Mat4, ray: &Ray) -> Option<f32> {
        let inverse = world_matrix.try_inverse()?;
        self.intersect_local(&ray.transformed(&inverse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn forward_ray() -> Ray {
        Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_scaled_sphere_distance_is_world_space() {
        let sphere = Geometry::Sphere { radius: 1.0 };
        let world = Transform::from_position(Vec3::new(0.0, 0.0, -10.0))
            .with_scale(Vec3::new(2.0, 2.0, 2.0))
            .to_matrix();

        // Radius 1 scaled by 2 puts the front surface at z = -8
        let distance = sphere.intersect_world(&world, &forward_ray()).unwrap();
        assert_relative_eq!(distance, 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rotated_cube() {
        let cube = Geometry::cube(1.0);
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_4);
        let world = Transform::from_position_rotation(Vec3::new(0.0, 0.0, -5.0), rotation).to_matrix();

        // A cube turned 45 degrees presents its edge, half a diagonal closer
        let distance = cube.intersect_world(&world, &forward_ray()).unwrap();
        assert_relative_eq!(distance, 5.0 - 0.5_f32.hypot(0.5), epsilon = 1e-4);
    }

    #[test]
    fn test_mesh_returns_nearest_triangle() {
        let vertices = [
            Vec3::new(-1.0, -1.0, -3.0),
            Vec3::new(1.0, -1.0, -3.0),
            Vec3::new(0.0, 1.0, -3.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        ];
        let mesh = Geometry::mesh_from_indexed(&vertices, &[0, 1, 2, 3, 4, 5, 9]);

        let distance = mesh.intersect_world(&Mat4::identity(), &forward_ray()).unwrap();
        assert_relative_eq!(distance, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_placement_never_hits() {
        let sphere = Geometry::Sphere { radius: 1.0 };
        assert!(sphere.intersect_world(&Mat4::zeros(), &forward_ray()).is_none());
    }
}
