//! Math utilities and types
//!
//! Thin aliases over nalgebra plus a decomposed [`Transform`] used as the
//! local transform of every scene node.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Local forward axis of nodes and controllers (right-handed, Y-up, -Z forward)
pub fn forward_axis() -> Vec3 {
    Vec3::new(0.0, 0.0, -1.0)
}

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Replace the scale, builder style
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix (T * R * S)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Create a transform from an affine transformation matrix
    ///
    /// A mirrored basis comes back as a negative X scale. Shear cannot be
    /// represented; a matrix built from non-uniform scale under a rotated
    /// parent loses it here (see [`has_orthogonal_basis`]).
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

        let mut scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
        if matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0 {
            scale_x = -scale_x;
        }
        let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
        let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
        let scale = Vec3::new(scale_x, scale_y, scale_z);

        // Remove scale from the upper 3x3 to leave a pure rotation
        let rotation_matrix = Mat3::new(
            matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
            matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
            matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
        );
        let rotation = Quat::from_matrix(&rotation_matrix);

        Self {
            position,
            rotation,
            scale,
        }
    }
}

/// Translation component of an affine matrix
pub fn matrix_position(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Whether the basis vectors of an affine matrix are mutually perpendicular
///
/// Only such matrices decompose into a [`Transform`] without losing shear.
pub fn has_orthogonal_basis(matrix: &Mat4) -> bool {
    let x = Vec3::new(matrix.m11, matrix.m21, matrix.m31);
    let y = Vec3::new(matrix.m12, matrix.m22, matrix.m32);
    let z = Vec3::new(matrix.m13, matrix.m23, matrix.m33);
    let tolerance = 1e-4 * x.magnitude().max(y.magnitude()).max(z.magnitude()).powi(2);

    x.dot(&y).abs() <= tolerance && y.dot(&z).abs() <= tolerance && z.dot(&x).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_matrix() {
        assert_relative_eq!(Transform::identity().to_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_decomposition() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        let transform = Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), rotation)
            .with_scale(Vec3::new(2.0, 2.0, 2.0));

        let decomposed = Transform::from_matrix(&transform.to_matrix());

        assert_relative_eq!(decomposed.position, transform.position, epsilon = EPSILON);
        assert_relative_eq!(decomposed.scale, transform.scale, epsilon = EPSILON);
        assert!(decomposed.rotation.angle_to(&rotation) < EPSILON);
    }

    #[test]
    fn test_forward_axis_rotates_with_node() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        let forward = rotation * forward_axis();

        // Turning left by 90 degrees about +Y points -Z at -X
        assert_relative_eq!(forward, Vec3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_mirrored_matrix_keeps_handedness() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 0.4);
        let transform = Transform::from_position_rotation(Vec3::new(0.0, 1.0, -3.0), rotation)
            .with_scale(Vec3::new(-1.0, 2.0, 1.0));
        let matrix = transform.to_matrix();

        let decomposed = Transform::from_matrix(&matrix);

        assert!(decomposed.scale.x < 0.0);
        assert_relative_eq!(decomposed.to_matrix(), matrix, epsilon = EPSILON);
    }

    #[test]
    fn test_orthogonal_basis_detection() {
        let rotated = Transform::from_position_rotation(Vec3::zeros(), Quat::from_axis_angle(&Vec3::z_axis(), 0.7))
            .with_scale(Vec3::new(3.0, 1.0, 1.0));
        assert!(has_orthogonal_basis(&rotated.to_matrix()));

        // Non-uniform scale applied after a rotation shears the basis
        let stretch = Transform::identity().with_scale(Vec3::new(2.0, 1.0, 1.0)).to_matrix();
        assert!(!has_orthogonal_basis(&(stretch * rotated.to_matrix())));
    }

    #[test]
    fn test_matrix_position() {
        let matrix = Transform::from_position(Vec3::new(4.0, 5.0, 6.0)).to_matrix();
        assert_eq!(matrix_position(&matrix), Vec3::new(4.0, 5.0, 6.0));
    }
}
